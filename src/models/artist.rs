//! Artist model, with the releases and tracks it owns

use serde::{Deserialize, Serialize};

use super::Tier;

/// Release format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReleaseType {
    Album,
    #[serde(rename = "EP")]
    Ep,
    Single,
}

impl ReleaseType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReleaseType::Album => "Album",
            ReleaseType::Ep => "EP",
            ReleaseType::Single => "Single",
        }
    }
}

/// A single track. Owned by one release, referenced by id everywhere else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    pub id: String,
    pub title: String,
    /// Playable source url, if the track has been uploaded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    /// Minimum subscription tier needed to play
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_tier: Option<Tier>,
}

impl Track {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            src: None,
            required_tier: None,
        }
    }

    /// Whether a listener on `tier` may play this track
    pub fn is_playable_on(&self, tier: Tier) -> bool {
        self.required_tier.map_or(true, |required| tier >= required)
    }
}

/// An album, EP or single
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Release {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub release_type: ReleaseType,
    #[serde(default)]
    pub cover_image_url: String,
    #[serde(default)]
    pub tracks: Vec<Track>,
}

/// A label artist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub genre: String,
    /// Persona text used when the artist collaborates in the studio
    #[serde(default)]
    pub personality: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub header_image_url: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub releases: Vec<Release>,
    /// Gallery image urls
    #[serde(default)]
    pub gallery: Vec<String>,
}

impl Artist {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            genre: String::new(),
            personality: String::new(),
            image_url: String::new(),
            header_image_url: String::new(),
            bio: String::new(),
            releases: Vec::new(),
            gallery: Vec::new(),
        }
    }

    /// Iterate every track in discography order
    pub fn tracks(&self) -> impl Iterator<Item = (&Release, &Track)> {
        self.releases
            .iter()
            .flat_map(|release| release.tracks.iter().map(move |track| (release, track)))
    }

    pub fn track_count(&self) -> usize {
        self.releases.iter().map(|r| r.tracks.len()).sum()
    }
}
