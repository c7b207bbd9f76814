//! Playback selection - what is queued and where we are in it
//!
//! Audio decoding lives in the client's media stack. This only tracks the
//! queue and position, and never checks whether a track is streamable.

use serde::Serialize;

use crate::models::{Artist, EnrichedTrack, Release, Track};

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackQueue {
    tracks: Vec<EnrichedTrack>,
    index: usize,
}

impl PlaybackQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the queue with a single track
    pub fn play_single(&mut self, track: &Track, release: &Release, artist: &Artist) {
        self.tracks = vec![EnrichedTrack::new(track, release, artist)];
        self.index = 0;
    }

    /// Replace the queue with `tracks`. Empty input leaves the queue alone.
    pub fn play_many(&mut self, tracks: Vec<EnrichedTrack>) {
        if tracks.is_empty() {
            return;
        }
        self.tracks = tracks;
        self.index = 0;
    }

    /// Advance, wrapping to the start
    pub fn next(&mut self) {
        if self.tracks.is_empty() {
            return;
        }
        self.index = (self.index + 1) % self.tracks.len();
    }

    /// Step back, wrapping to the end
    pub fn previous(&mut self) {
        if self.tracks.is_empty() {
            return;
        }
        let len = self.tracks.len();
        self.index = (self.index + len - 1) % len;
    }

    pub fn clear(&mut self) {
        self.tracks.clear();
        self.index = 0;
    }

    /// Currently playing track, `None` when nothing is queued
    pub fn current(&self) -> Option<&EnrichedTrack> {
        self.tracks.get(self.index)
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn tracks(&self) -> &[EnrichedTrack] {
        &self.tracks
    }

    pub fn is_active(&self) -> bool {
        !self.tracks.is_empty()
    }
}
