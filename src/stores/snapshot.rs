//! The persisted subset of content state and its typed decoder

use serde::{Deserialize, Serialize};

use crate::models::{
    ApiKeys, Artist, Asset, ConstellationItem, FooterContent, FriendArtist, NewsArticle,
    PageContents, Playlist, SmtVideo, SpotlightItem, StudioActionCosts, TeoApp,
};

/// Everything the content store writes to storage.
///
/// Gallery images and studio submissions are deliberately absent: they reset
/// on every load. `artists`, `page_contents` and `footer_content` carry no
/// serde default, so a blob missing any of them fails to decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedContent {
    pub artists: Vec<Artist>,
    pub page_contents: PageContents,
    pub footer_content: FooterContent,
    #[serde(default)]
    pub friend_artists: Vec<FriendArtist>,
    #[serde(default)]
    pub news_articles: Vec<NewsArticle>,
    #[serde(default)]
    pub playlists: Vec<Playlist>,
    #[serde(default)]
    pub constellation_items: Vec<ConstellationItem>,
    #[serde(default)]
    pub spotlight_items: Vec<SpotlightItem>,
    #[serde(default)]
    pub asset_vault: Vec<Asset>,
    #[serde(default)]
    pub teo_apps: Vec<TeoApp>,
    #[serde(default)]
    pub smt_videos: Vec<SmtVideo>,
    /// Weak references into the track index, in display order
    #[serde(default)]
    pub trending_track_ids: Vec<String>,
    #[serde(default)]
    pub hero_background_url: String,
    #[serde(default)]
    pub portal_url: String,
    #[serde(default)]
    pub studio_action_costs: StudioActionCosts,
    #[serde(default)]
    pub api_keys: ApiKeys,
}

impl PersistedContent {
    /// Decode a stored blob. Any structural mismatch is an error.
    pub fn decode(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
