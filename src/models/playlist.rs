//! Playlist model

use serde::{Deserialize, Serialize};

/// Where a playlist sits on the site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaylistCategory {
    Official,
    Curated,
    /// Receives studio submissions when a curator showcases them
    Showcase,
    Occasional,
    User,
}

impl PlaylistCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlaylistCategory::Official => "official",
            PlaylistCategory::Curated => "curated",
            PlaylistCategory::Showcase => "showcase",
            PlaylistCategory::Occasional => "occasional",
            PlaylistCategory::User => "user",
        }
    }
}

/// A playlist. Holds track ids only; tracks are owned by their release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Playlist {
    pub id: String,
    pub title: String,
    pub category: PlaylistCategory,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub cover_image_url: String,
    /// Weak references into the track index
    #[serde(default)]
    pub track_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_url: Option<String>,
}

impl Playlist {
    pub fn new(id: impl Into<String>, title: impl Into<String>, category: PlaylistCategory) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            category,
            description: String::new(),
            cover_image_url: String::new(),
            track_ids: Vec::new(),
            external_url: None,
        }
    }

    /// Append a track id unless already present. Returns true if it was added.
    pub fn push_unique(&mut self, track_id: &str) -> bool {
        if self.track_ids.iter().any(|id| id == track_id) {
            return false;
        }
        self.track_ids.push(track_id.to_string());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_unique() {
        let mut playlist = Playlist::new("p1", "Showcase", PlaylistCategory::Showcase);
        assert!(playlist.push_unique("s1"));
        assert!(!playlist.push_unique("s1"));
        assert_eq!(playlist.track_ids, vec!["s1".to_string()]);
    }

    #[test]
    fn test_category_wire_name() {
        let playlist = Playlist::new("p1", "Late Night", PlaylistCategory::Occasional);
        let json = serde_json::to_value(&playlist).unwrap();
        assert_eq!(json["category"], "occasional");
        assert!(json.get("externalUrl").is_none());
    }
}
