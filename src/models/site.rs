//! Site-wide singletons: page copy, footer, studio pricing, key placeholders

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Editable copy for a static page
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageContent {
    pub title: String,
    #[serde(default)]
    pub body: String,
}

/// Page key (e.g. "about") to its copy
pub type PageContents = BTreeMap<String, PageContent>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FooterLink {
    pub label: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FooterContent {
    #[serde(default)]
    pub tagline: String,
    #[serde(default)]
    pub copyright: String,
    #[serde(default)]
    pub links: Vec<FooterLink>,
}

/// A paid studio action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StudioAction {
    IdeaAndLyrics,
    SoundPalette,
    Storyboard,
    StoryboardImages,
    ImageGeneration,
    AgentChat,
}

/// Point price of each studio action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudioActionCosts {
    pub idea_and_lyrics: u32,
    pub sound_palette: u32,
    pub storyboard: u32,
    pub storyboard_images: u32,
    pub image_generation: u32,
    pub agent_chat: u32,
}

impl StudioActionCosts {
    pub fn cost_of(&self, action: StudioAction) -> u32 {
        match action {
            StudioAction::IdeaAndLyrics => self.idea_and_lyrics,
            StudioAction::SoundPalette => self.sound_palette,
            StudioAction::Storyboard => self.storyboard,
            StudioAction::StoryboardImages => self.storyboard_images,
            StudioAction::ImageGeneration => self.image_generation,
            StudioAction::AgentChat => self.agent_chat,
        }
    }
}

impl Default for StudioActionCosts {
    fn default() -> Self {
        Self {
            idea_and_lyrics: 10,
            sound_palette: 5,
            storyboard: 10,
            storyboard_images: 25,
            image_generation: 15,
            agent_chat: 1,
        }
    }
}

/// Admin-editable key placeholders. Never holds real secrets in the seed.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKeys {
    #[serde(default)]
    pub gen_ai: String,
    #[serde(default)]
    pub storage_bucket: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cost_of() {
        let costs = StudioActionCosts::default();
        assert_eq!(costs.cost_of(StudioAction::StoryboardImages), 25);
        assert_eq!(costs.cost_of(StudioAction::AgentChat), 1);
    }
}
