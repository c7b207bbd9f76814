//! Studio pipeline
//!
//! A draft moves through four stages: idea and lyrics, sound palette,
//! storyboard and storyboard images. Each stage writes the draft only once
//! the call has succeeded, so a failed stage leaves earlier results intact.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info};

use super::client::{generate_json, GenerativeModel};
use super::{Result, StudioError};
use crate::models::{
    Artist, Asset, PaletteSlot, StemCategory, StoryboardScene, StudioSubmission,
    SubmissionStatus, User, STORYBOARD_SCENES,
};

/// Work in progress for one studio creation. Clients hold the draft
/// between stages and send it back with each call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudioDraft {
    pub prompt: String,
    pub artist_id: String,
    #[serde(default)]
    pub creative_direction: Option<String>,
    #[serde(default)]
    pub lyrics: Option<String>,
    #[serde(default)]
    pub sound_palette: Vec<PaletteSlot>,
    #[serde(default)]
    pub storyboard: Vec<StoryboardScene>,
}

impl StudioDraft {
    pub fn new(prompt: impl Into<String>, artist_id: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            artist_id: artist_id.into(),
            ..Default::default()
        }
    }

    pub fn has_lyrics(&self) -> bool {
        self.lyrics.is_some()
    }

    /// Turn the draft into a pending submission by `user`
    pub fn into_submission(self, user: &User) -> Result<StudioSubmission> {
        let (Some(creative_direction), Some(lyrics)) = (self.creative_direction, self.lyrics)
        else {
            return Err(StudioError::InvalidStage(
                "idea and lyrics must be generated before submitting".into(),
            ));
        };

        Ok(StudioSubmission {
            id: uuid::Uuid::new_v4().to_string(),
            user_email: user.email.clone(),
            user_name: user.name.clone(),
            prompt: self.prompt,
            artist_id: self.artist_id,
            creative_direction,
            lyrics,
            sound_palette: self.sound_palette,
            storyboard: self.storyboard,
            status: SubmissionStatus::Pending,
            curator_comment: None,
            curator_rating: None,
            created_at: Utc::now(),
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IdeaAnswer {
    creative_direction: String,
    lyrics: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PaletteChoice {
    category: String,
    stem_id: String,
}

#[derive(Debug, Deserialize)]
struct PaletteAnswer {
    palette: Vec<PaletteChoice>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SceneAnswer {
    description: String,
    image_prompts: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct StoryboardAnswer {
    scenes: Vec<SceneAnswer>,
}

/// Runs draft stages against a generative model
pub struct StudioPipeline<'a> {
    model: &'a dyn GenerativeModel,
}

impl<'a> StudioPipeline<'a> {
    pub fn new(model: &'a dyn GenerativeModel) -> Self {
        Self { model }
    }

    /// Stage 1: creative direction and lyrics in the artist's voice
    pub async fn idea_and_lyrics(&self, draft: &mut StudioDraft, artist: &Artist) -> Result<()> {
        if draft.prompt.trim().is_empty() {
            return Err(StudioError::InvalidStage("prompt is empty".into()));
        }

        let prompt = format!(
            "You are {name}, a {genre} artist. Personality: {personality}.\n\
             A fan wants to make a song with you from this idea: \"{idea}\".\n\
             Write a short creative direction and full song lyrics.",
            name = artist.name,
            genre = artist.genre,
            personality = artist.personality,
            idea = draft.prompt.trim(),
        );
        let schema = json!({
            "type": "OBJECT",
            "properties": {
                "creativeDirection": { "type": "STRING" },
                "lyrics": { "type": "STRING" }
            },
            "required": ["creativeDirection", "lyrics"]
        });

        let answer: IdeaAnswer = generate_json(self.model, &prompt, &schema).await?;
        if answer.lyrics.trim().is_empty() {
            return Err(StudioError::EmptyResponse);
        }

        debug!("Generated lyrics for draft with {}", artist.id);
        draft.creative_direction = Some(answer.creative_direction);
        draft.lyrics = Some(answer.lyrics);
        draft.artist_id = artist.id.clone();
        Ok(())
    }

    /// Stage 2: one audio stem per category from the vault
    pub async fn sound_palette(&self, draft: &mut StudioDraft, vault: &[Asset]) -> Result<()> {
        let lyrics = require_lyrics(draft)?;

        let stems: Vec<Value> = vault
            .iter()
            .filter_map(|asset| {
                asset.stem().map(|category| {
                    json!({ "id": asset.id, "name": asset.name, "category": category.as_str() })
                })
            })
            .collect();
        if stems.is_empty() {
            return Err(StudioError::InvalidStage(
                "asset vault has no audio stems".into(),
            ));
        }

        let prompt = format!(
            "Pick one stem per category for a song with these lyrics:\n{}\n\nAvailable stems:\n{}",
            lyrics,
            Value::Array(stems)
        );
        let schema = json!({
            "type": "OBJECT",
            "properties": {
                "palette": {
                    "type": "ARRAY",
                    "items": {
                        "type": "OBJECT",
                        "properties": {
                            "category": { "type": "STRING" },
                            "stemId": { "type": "STRING" }
                        },
                        "required": ["category", "stemId"]
                    }
                }
            },
            "required": ["palette"]
        });

        let answer: PaletteAnswer = generate_json(self.model, &prompt, &schema).await?;
        draft.sound_palette = build_palette(&answer.palette, vault)?;
        Ok(())
    }

    /// Stage 3: a storyboard of exactly four scenes
    pub async fn storyboard(&self, draft: &mut StudioDraft, artist: &Artist) -> Result<()> {
        let lyrics = require_lyrics(draft)?;

        let prompt = format!(
            "Write a {scenes}-scene music video storyboard for {name} ({genre}).\n\
             Lyrics:\n{lyrics}\n\n\
             Each scene has a description and two image prompts.",
            scenes = STORYBOARD_SCENES,
            name = artist.name,
            genre = artist.genre,
            lyrics = lyrics,
        );
        let schema = json!({
            "type": "OBJECT",
            "properties": {
                "scenes": {
                    "type": "ARRAY",
                    "items": {
                        "type": "OBJECT",
                        "properties": {
                            "description": { "type": "STRING" },
                            "imagePrompts": { "type": "ARRAY", "items": { "type": "STRING" } }
                        },
                        "required": ["description", "imagePrompts"]
                    }
                }
            },
            "required": ["scenes"]
        });

        let answer: StoryboardAnswer = generate_json(self.model, &prompt, &schema).await?;
        draft.storyboard = build_storyboard(answer.scenes)?;
        Ok(())
    }

    /// Stage 4: render both image prompts of every scene
    pub async fn storyboard_images(&self, draft: &mut StudioDraft) -> Result<()> {
        if draft.storyboard.is_empty() {
            return Err(StudioError::InvalidStage(
                "storyboard must be generated before its images".into(),
            ));
        }

        let mut rendered = draft.storyboard.clone();
        for (i, scene) in rendered.iter_mut().enumerate() {
            for slot in 0..2 {
                let url = self.model.generate_image(&scene.image_prompts[slot]).await?;
                scene.image_urls[slot] = Some(url);
            }
            debug!("Rendered storyboard scene {}", i + 1);
        }

        info!("Rendered {} storyboard scenes", rendered.len());
        draft.storyboard = rendered;
        Ok(())
    }
}

fn require_lyrics(draft: &StudioDraft) -> Result<&str> {
    draft
        .lyrics
        .as_deref()
        .ok_or_else(|| StudioError::InvalidStage("lyrics must be generated first".into()))
}

/// Keep one known stem per category, filling unanswered categories from the vault
fn build_palette(choices: &[PaletteChoice], vault: &[Asset]) -> Result<Vec<PaletteSlot>> {
    let mut palette = Vec::new();

    for category in StemCategory::ALL {
        let chosen = choices
            .iter()
            .filter(|c| StemCategory::from_str(&c.category) == Some(category))
            .find(|c| {
                vault
                    .iter()
                    .any(|a| a.id == c.stem_id && a.stem() == Some(category))
            })
            .map(|c| c.stem_id.clone());

        let stem_id = chosen.or_else(|| {
            vault
                .iter()
                .find(|a| a.stem() == Some(category))
                .map(|a| a.id.clone())
        });

        if let Some(stem_id) = stem_id {
            palette.push(PaletteSlot { category, stem_id });
        }
    }

    if palette.is_empty() {
        return Err(StudioError::InvalidStage("sound palette is empty".into()));
    }
    Ok(palette)
}

fn build_storyboard(scenes: Vec<SceneAnswer>) -> Result<Vec<StoryboardScene>> {
    if scenes.len() < STORYBOARD_SCENES {
        return Err(StudioError::InvalidStage(format!(
            "storyboard has {} scenes, expected {}",
            scenes.len(),
            STORYBOARD_SCENES
        )));
    }

    scenes
        .into_iter()
        .take(STORYBOARD_SCENES)
        .map(|scene| {
            let mut prompts = scene.image_prompts.into_iter();
            match (prompts.next(), prompts.next()) {
                (Some(first), Some(second)) => Ok(StoryboardScene {
                    description: scene.description,
                    image_prompts: [first, second],
                    image_urls: [None, None],
                }),
                _ => Err(StudioError::InvalidStage(
                    "each scene needs two image prompts".into(),
                )),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AssetType;
    use crate::studio::fake::FakeModel;

    fn stem(id: &str, category: StemCategory) -> Asset {
        Asset {
            id: id.into(),
            name: id.into(),
            asset_type: AssetType::Audio,
            url: format!("/stems/{}.wav", id),
            stem_category: Some(category),
        }
    }

    fn vault() -> Vec<Asset> {
        vec![
            stem("d1", StemCategory::Drums),
            stem("d2", StemCategory::Drums),
            stem("b1", StemCategory::Bass),
            stem("m1", StemCategory::Melody),
        ]
    }

    fn artist() -> Artist {
        let mut artist = Artist::new("vela", "Vela");
        artist.genre = "synthwave".into();
        artist
    }

    fn scenes_json(count: usize) -> String {
        let scenes: Vec<Value> = (0..count)
            .map(|i| json!({ "description": format!("scene {}", i), "imagePrompts": ["a", "bb"] }))
            .collect();
        json!({ "scenes": scenes }).to_string()
    }

    const IDEA: &str = r#"{"creativeDirection": "neon rain", "lyrics": "la la"}"#;

    #[tokio::test]
    async fn test_full_pipeline() {
        let palette = r#"{"palette": [{"category": "drums", "stemId": "d2"}, {"category": "Bass", "stemId": "nope"}]}"#;
        let scenes = scenes_json(5);
        let model = FakeModel::new(&[IDEA, palette, scenes.as_str()]);
        let pipeline = StudioPipeline::new(&model);

        let mut draft = StudioDraft::new("rainy night drive", "vela");
        pipeline.idea_and_lyrics(&mut draft, &artist()).await.unwrap();
        assert_eq!(draft.lyrics.as_deref(), Some("la la"));

        pipeline.sound_palette(&mut draft, &vault()).await.unwrap();
        let ids: Vec<_> = draft.sound_palette.iter().map(|s| s.stem_id.as_str()).collect();
        // unknown bass stem falls back to the vault's first bass
        assert_eq!(ids, vec!["d2", "b1", "m1"]);

        pipeline.storyboard(&mut draft, &artist()).await.unwrap();
        assert_eq!(draft.storyboard.len(), STORYBOARD_SCENES);

        pipeline.storyboard_images(&mut draft).await.unwrap();
        assert!(draft.storyboard.iter().all(StoryboardScene::is_rendered));

        let user = User::new("fan@example.com", "Fan");
        let submission = draft.into_submission(&user).unwrap();
        assert_eq!(submission.user_email, "fan@example.com");
        assert_eq!(submission.status, SubmissionStatus::Pending);
        assert_eq!(submission.stem_for(StemCategory::Drums), Some("d2"));
    }

    #[tokio::test]
    async fn test_short_storyboard_keeps_earlier_stages() {
        let scenes = scenes_json(3);
        let model = FakeModel::new(&[IDEA, scenes.as_str()]);
        let pipeline = StudioPipeline::new(&model);

        let mut draft = StudioDraft::new("idea", "vela");
        pipeline.idea_and_lyrics(&mut draft, &artist()).await.unwrap();

        let err = pipeline.storyboard(&mut draft, &artist()).await.unwrap_err();
        assert!(matches!(err, StudioError::InvalidStage(_)));
        assert!(draft.storyboard.is_empty());
        assert_eq!(draft.lyrics.as_deref(), Some("la la"));
    }

    #[tokio::test]
    async fn test_failed_images_leave_storyboard() {
        let scenes = scenes_json(4);
        let model = FakeModel::new(&[IDEA, scenes.as_str()]).failing_images();
        let pipeline = StudioPipeline::new(&model);

        let mut draft = StudioDraft::new("idea", "vela");
        pipeline.idea_and_lyrics(&mut draft, &artist()).await.unwrap();
        pipeline.storyboard(&mut draft, &artist()).await.unwrap();

        assert!(pipeline.storyboard_images(&mut draft).await.is_err());
        assert_eq!(draft.storyboard.len(), 4);
        assert!(draft.storyboard.iter().all(|s| !s.is_rendered()));
    }

    #[tokio::test]
    async fn test_stages_need_lyrics() {
        let model = FakeModel::new(&[]);
        let pipeline = StudioPipeline::new(&model);
        let mut draft = StudioDraft::new("idea", "vela");

        assert!(pipeline.sound_palette(&mut draft, &vault()).await.is_err());
        assert!(pipeline.storyboard(&mut draft, &artist()).await.is_err());
        assert!(pipeline.storyboard_images(&mut draft).await.is_err());

        let user = User::new("fan@example.com", "Fan");
        assert!(draft.into_submission(&user).is_err());
    }

    #[tokio::test]
    async fn test_malformed_answer_is_error() {
        let model = FakeModel::new(&["{\"lyrics\": 3}"]);
        let pipeline = StudioPipeline::new(&model);
        let mut draft = StudioDraft::new("idea", "vela");

        let err = pipeline.idea_and_lyrics(&mut draft, &artist()).await.unwrap_err();
        assert!(matches!(err, StudioError::MalformedJson(_)));
        assert!(!draft.has_lyrics());
    }

    #[test]
    fn test_palette_without_stems_is_error() {
        assert!(build_palette(&[], &[]).is_err());
    }
}
