//! Studio submission model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::StemCategory;

/// Number of scenes in a video storyboard
pub const STORYBOARD_SCENES: usize = 4;

/// Review state of a submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SubmissionStatus {
    #[default]
    Pending,
    Showcased,
}

/// One stem chosen for a category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaletteSlot {
    pub category: StemCategory,
    pub stem_id: String,
}

/// One scene of the storyboard
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryboardScene {
    pub description: String,
    pub image_prompts: [String; 2],
    #[serde(default)]
    pub image_urls: [Option<String>; 2],
}

impl StoryboardScene {
    pub fn is_rendered(&self) -> bool {
        self.image_urls.iter().all(Option::is_some)
    }
}

/// A fan's studio creation, queued for curator review
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudioSubmission {
    pub id: String,
    pub user_email: String,
    pub user_name: String,
    pub prompt: String,
    /// Collaborating artist
    pub artist_id: String,
    #[serde(default)]
    pub creative_direction: String,
    #[serde(default)]
    pub lyrics: String,
    #[serde(default)]
    pub sound_palette: Vec<PaletteSlot>,
    #[serde(default)]
    pub storyboard: Vec<StoryboardScene>,
    #[serde(default)]
    pub status: SubmissionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub curator_comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub curator_rating: Option<u8>,
    pub created_at: DateTime<Utc>,
}

impl StudioSubmission {
    /// Stem chosen for a category, if any
    pub fn stem_for(&self, category: StemCategory) -> Option<&str> {
        self.sound_palette
            .iter()
            .find(|slot| slot.category == category)
            .map(|slot| slot.stem_id.as_str())
    }

    pub fn is_showcased(&self) -> bool {
        self.status == SubmissionStatus::Showcased
    }
}

/// Clamp a curator rating into 1..=5
pub fn clamp_rating(rating: u8) -> u8 {
    rating.clamp(1, 5)
}
