//! Flat display records. None of these own anything.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstellationItem {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub link_url: String,
}

/// A music video
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmtVideo {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub video_url: String,
    #[serde(default)]
    pub thumbnail_url: String,
}

/// A companion app listed on the apps page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeoApp {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon_url: String,
    pub url: String,
}

/// An artist outside the label, linked from the friends page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendArtist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub genre: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub link_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsArticle {
    pub id: String,
    pub title: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub image_url: String,
}

/// Gallery entry. Volatile: never written to storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryImage {
    pub id: String,
    pub url: String,
    #[serde(default)]
    pub caption: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist_id: Option<String>,
}

/// A featured slot on the home page pointing at a track
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpotlightItem {
    pub id: String,
    /// Weak reference into the track index
    pub track_id: String,
    #[serde(default)]
    pub headline: String,
    #[serde(default)]
    pub blurb: String,
}
