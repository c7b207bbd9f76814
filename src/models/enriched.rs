//! Read-only track shapes derived from the artist tree

use serde::Serialize;

use super::{Artist, Release, ReleaseType, Tier, Track};

/// A track together with its owning release and artist
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedTrack {
    #[serde(flatten)]
    pub track: Track,
    pub artist_id: String,
    pub artist_name: String,
    pub release_id: String,
    pub release_title: String,
    pub release_type: ReleaseType,
    pub cover_image_url: String,
}

impl EnrichedTrack {
    pub fn new(track: &Track, release: &Release, artist: &Artist) -> Self {
        Self {
            track: track.clone(),
            artist_id: artist.id.clone(),
            artist_name: artist.name.clone(),
            release_id: release.id.clone(),
            release_title: release.title.clone(),
            release_type: release.release_type,
            cover_image_url: release.cover_image_url.clone(),
        }
    }

    pub fn id(&self) -> &str {
        &self.track.id
    }
}

/// Display row for the trending list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendingTrack {
    pub id: String,
    pub title: String,
    pub artist_name: String,
    pub release_title: String,
    pub cover_image_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_tier: Option<Tier>,
    /// Always "Track": a trending slot does not carry its release's format
    #[serde(rename = "type")]
    pub type_label: &'static str,
}

impl From<&EnrichedTrack> for TrendingTrack {
    fn from(entry: &EnrichedTrack) -> Self {
        Self {
            id: entry.track.id.clone(),
            title: entry.track.title.clone(),
            artist_name: entry.artist_name.clone(),
            release_title: entry.release_title.clone(),
            cover_image_url: entry.cover_image_url.clone(),
            src: entry.track.src.clone(),
            required_tier: entry.track.required_tier,
            type_label: "Track",
        }
    }
}
