//! Track index - flat lookup from track id to its enriched record
//!
//! Playlists, spotlight slots and the trending list hold track ids only.
//! Every one of them resolves through this index, which is rebuilt from the
//! artist -> release -> track tree whenever the artist collection changes.

use std::collections::HashMap;

use tracing::debug;

use crate::models::{Artist, EnrichedTrack, TrendingTrack};

#[derive(Debug, Clone, Default)]
pub struct TrackIndex {
    tracks: HashMap<String, EnrichedTrack>,
}

impl TrackIndex {
    /// Build the index from the artist collection
    pub fn build(artists: &[Artist]) -> Self {
        let mut tracks = HashMap::new();

        for artist in artists {
            for (release, track) in artist.tracks() {
                // first occurrence wins if the tree holds a repeated id
                tracks
                    .entry(track.id.clone())
                    .or_insert_with(|| EnrichedTrack::new(track, release, artist));
            }
        }

        debug!("Indexed {} tracks from {} artists", tracks.len(), artists.len());
        Self { tracks }
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn get(&self, track_id: &str) -> Option<&EnrichedTrack> {
        self.tracks.get(track_id)
    }

    pub fn contains(&self, track_id: &str) -> bool {
        self.tracks.contains_key(track_id)
    }

    /// Resolve ids in order, silently dropping ones that no longer exist
    pub fn resolve<S: AsRef<str>>(&self, ids: &[S]) -> Vec<EnrichedTrack> {
        ids.iter()
            .filter_map(|id| self.tracks.get(id.as_ref()).cloned())
            .collect()
    }

    /// Project the trending id list into display rows
    pub fn trending<S: AsRef<str>>(&self, ids: &[S]) -> Vec<TrendingTrack> {
        ids.iter()
            .filter_map(|id| self.tracks.get(id.as_ref()))
            .map(TrendingTrack::from)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Release, ReleaseType, Track};

    fn artist_with(tracks: &[&str]) -> Artist {
        let mut artist = Artist::new("a1", "Vela Nox");
        artist.releases.push(Release {
            id: "r1".into(),
            title: "Midnight Grid".into(),
            release_type: ReleaseType::Album,
            cover_image_url: "/cover.jpg".into(),
            tracks: tracks.iter().map(|id| Track::new(*id, id.to_uppercase())).collect(),
        });
        artist
    }

    #[test]
    fn test_index_carries_owner_context() {
        let index = TrackIndex::build(&[artist_with(&["t1", "t2"])]);
        assert_eq!(index.len(), 2);

        let entry = index.get("t2").unwrap();
        assert_eq!(entry.artist_name, "Vela Nox");
        assert_eq!(entry.release_title, "Midnight Grid");
        assert_eq!(entry.cover_image_url, "/cover.jpg");
        assert_eq!(entry.track.title, "T2");
    }

    #[test]
    fn test_resolve_drops_dangling_ids() {
        let index = TrackIndex::build(&[artist_with(&["A"])]);
        let resolved = index.resolve(&["A", "B"]);
        let ids: Vec<&str> = resolved.iter().map(|t| t.id()).collect();
        assert_eq!(ids, vec!["A"]);
    }

    #[test]
    fn test_trending_flattens_type() {
        let index = TrackIndex::build(&[artist_with(&["t1", "t2"])]);
        let rows = index.trending(&["t2", "gone", "t1"]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, "t2");
        assert_eq!(rows[1].id, "t1");
        assert!(rows.iter().all(|r| r.type_label == "Track"));
    }

    #[test]
    fn test_empty_index() {
        let index = TrackIndex::build(&[]);
        assert!(index.is_empty());
        assert!(index.resolve::<&str>(&[]).is_empty());
        assert!(!index.contains("t1"));
    }
}
