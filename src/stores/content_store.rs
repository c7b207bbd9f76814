//! Content store - the single source of truth for catalog and site content
//!
//! All state sits behind one lock and every mutation is a single replacement
//! under it. Mutations to persisted collections write the persisted subset to
//! storage right after the in-memory change commits. Gallery images and studio
//! submissions are volatile and never written.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, info, warn};

use super::collection;
use super::notices::{SaveNotices, StoreNotice};
use super::{PersistedContent, PlaybackQueue, TrackIndex};
use crate::error::{Result, StoreError};
use crate::models::{
    clamp_rating, ApiKeys, Artist, Asset, ConstellationItem, EnrichedTrack, FooterContent,
    FriendArtist, GalleryImage, NewsArticle, PageContent, PageContents, Playlist,
    PlaylistCategory, Release, SmtVideo, SpotlightItem, StemCategory, StudioActionCosts,
    StudioSubmission, SubmissionStatus, TeoApp, TrendingTrack,
};
use crate::seed;
use crate::storage::{KeyValueStorage, CONTENT_STORAGE_KEY};

struct ContentState {
    persisted: PersistedContent,
    gallery_images: Vec<GalleryImage>,
    submissions: Vec<StudioSubmission>,
    /// Derived from `persisted.artists`
    track_index: TrackIndex,
}

impl ContentState {
    fn new(persisted: PersistedContent) -> Self {
        let track_index = TrackIndex::build(&persisted.artists);
        Self {
            persisted,
            gallery_images: seed::default_gallery(),
            submissions: Vec::new(),
            track_index,
        }
    }
}

pub struct ContentStore {
    storage: Arc<dyn KeyValueStorage>,
    state: RwLock<ContentState>,
    playback: RwLock<PlaybackQueue>,
    notices: SaveNotices,
}

impl ContentStore {
    /// Load content from storage, falling back to the seed data when the
    /// stored blob is missing or does not decode.
    pub fn open(storage: Arc<dyn KeyValueStorage>) -> Self {
        let persisted = load_content(storage.as_ref());
        let store = Self {
            storage,
            state: RwLock::new(ContentState::new(persisted)),
            playback: RwLock::new(PlaybackQueue::new()),
            notices: SaveNotices::new(),
        };

        {
            let state = store.state.read();
            info!(
                "Content store ready: {} artists, {} tracks, {} playlists",
                state.persisted.artists.len(),
                state.track_index.len(),
                state.persisted.playlists.len()
            );
            store.save(&state.persisted);
        }

        store
    }

    // ========== Persistence ==========

    fn save(&self, content: &PersistedContent) {
        let outcome = content
            .encode()
            .map_err(StoreError::from)
            .and_then(|raw| {
                self.storage
                    .set(CONTENT_STORAGE_KEY, &raw)
                    .map_err(StoreError::from)
            });

        match outcome {
            Ok(()) => self.notices.record_success(),
            Err(e) => self.notices.record_failure("content", &e),
        }
    }

    /// Apply `f` to the persisted content, then write it out
    fn mutate<R>(&self, f: impl FnOnce(&mut PersistedContent) -> Result<R>) -> Result<R> {
        let mut state = self.state.write();
        let result = f(&mut state.persisted)?;
        self.save(&state.persisted);
        Ok(result)
    }

    /// Like `mutate`, for removals: only writes when something was removed
    fn remove_where(&self, f: impl FnOnce(&mut PersistedContent) -> bool) -> bool {
        let mut state = self.state.write();
        let removed = f(&mut state.persisted);
        if removed {
            self.save(&state.persisted);
        }
        removed
    }

    /// Apply `f` to the artist collection, rebuild the track index, write out
    fn mutate_artists<R>(&self, f: impl FnOnce(&mut Vec<Artist>) -> Result<R>) -> Result<R> {
        let mut state = self.state.write();
        let result = f(&mut state.persisted.artists)?;
        let index = TrackIndex::build(&state.persisted.artists);
        state.track_index = index;
        self.save(&state.persisted);
        Ok(result)
    }

    /// Drain pending user-facing notices
    pub fn take_notices(&self) -> Vec<StoreNotice> {
        self.notices.take()
    }

    /// Copy of everything that is written to storage
    pub fn persisted_snapshot(&self) -> PersistedContent {
        self.state.read().persisted.clone()
    }

    /// Persisted content as pretty JSON
    pub fn export_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.state.read().persisted)?)
    }

    /// Replace all content with the seed data. Volatile collections reset too.
    pub fn reset_to_seed(&self) {
        let mut state = self.state.write();
        *state = ContentState::new(seed::default_content());
        self.save(&state.persisted);
        info!("Content reset to defaults");
    }

    // ========== Derived views ==========

    /// Look up a track by id. Dangling ids are `None`.
    pub fn track(&self, track_id: &str) -> Option<EnrichedTrack> {
        self.state.read().track_index.get(track_id).cloned()
    }

    pub fn track_count(&self) -> usize {
        self.state.read().track_index.len()
    }

    /// Resolve ids in order, dropping any that no longer exist
    pub fn resolve_tracks<S: AsRef<str>>(&self, ids: &[S]) -> Vec<EnrichedTrack> {
        self.state.read().track_index.resolve(ids)
    }

    /// Playable tracks of a playlist, or `None` if the playlist does not exist
    pub fn playlist_tracks(&self, playlist_id: &str) -> Option<Vec<EnrichedTrack>> {
        let state = self.state.read();
        collection::find(&state.persisted.playlists, playlist_id)
            .map(|playlist| state.track_index.resolve(&playlist.track_ids))
    }

    /// Spotlight slots paired with their tracks. Dangling slots are dropped.
    pub fn spotlight_tracks(&self) -> Vec<(SpotlightItem, EnrichedTrack)> {
        let state = self.state.read();
        state
            .persisted
            .spotlight_items
            .iter()
            .filter_map(|item| {
                state
                    .track_index
                    .get(&item.track_id)
                    .map(|track| (item.clone(), track.clone()))
            })
            .collect()
    }

    /// The trending list as display rows
    pub fn trending(&self) -> Vec<TrendingTrack> {
        let state = self.state.read();
        state.track_index.trending(&state.persisted.trending_track_ids)
    }

    /// Audio stems in the asset vault for a category
    pub fn stems(&self, category: StemCategory) -> Vec<Asset> {
        self.state
            .read()
            .persisted
            .asset_vault
            .iter()
            .filter(|asset| asset.stem() == Some(category))
            .cloned()
            .collect()
    }

    // ========== Artists ==========

    pub fn artists(&self) -> Vec<Artist> {
        self.state.read().persisted.artists.clone()
    }

    pub fn artist(&self, id: &str) -> Option<Artist> {
        collection::find(&self.state.read().persisted.artists, id).cloned()
    }

    pub fn add_artist(&self, artist: Artist) -> Result<()> {
        self.mutate_artists(|artists| collection::insert(artists, artist, "artist"))
    }

    pub fn update_artist(&self, artist: Artist) -> Result<()> {
        self.mutate_artists(|artists| collection::replace(artists, artist, "artist"))
    }

    pub fn delete_artist(&self, id: &str) -> bool {
        let mut state = self.state.write();
        if !collection::remove(&mut state.persisted.artists, id) {
            return false;
        }
        let index = TrackIndex::build(&state.persisted.artists);
        state.track_index = index;
        self.save(&state.persisted);
        true
    }

    /// Add a release to an artist's discography
    pub fn add_release(&self, artist_id: &str, release: Release) -> Result<()> {
        self.mutate_artists(|artists| {
            let artist = artists
                .iter_mut()
                .find(|a| a.id == artist_id)
                .ok_or_else(|| StoreError::not_found("artist", artist_id))?;
            if artist.releases.iter().any(|r| r.id == release.id) {
                return Err(StoreError::duplicate("release", release.id));
            }
            artist.releases.push(release);
            Ok(())
        })
    }

    /// Replace a release, wherever it lives
    pub fn update_release(&self, release: Release) -> Result<()> {
        self.mutate_artists(|artists| {
            let slot = artists
                .iter_mut()
                .flat_map(|a| a.releases.iter_mut())
                .find(|r| r.id == release.id)
                .ok_or_else(|| StoreError::not_found("release", release.id.clone()))?;
            *slot = release;
            Ok(())
        })
    }

    pub fn delete_release(&self, release_id: &str) -> bool {
        let mut state = self.state.write();
        let removed = state.persisted.artists.iter_mut().any(|artist| {
            let before = artist.releases.len();
            artist.releases.retain(|r| r.id != release_id);
            artist.releases.len() != before
        });
        if removed {
            let index = TrackIndex::build(&state.persisted.artists);
            state.track_index = index;
            self.save(&state.persisted);
        }
        removed
    }

    // ========== Playlists ==========

    pub fn playlists(&self) -> Vec<Playlist> {
        self.state.read().persisted.playlists.clone()
    }

    pub fn playlist(&self, id: &str) -> Option<Playlist> {
        collection::find(&self.state.read().persisted.playlists, id).cloned()
    }

    pub fn playlists_in(&self, category: PlaylistCategory) -> Vec<Playlist> {
        self.state
            .read()
            .persisted
            .playlists
            .iter()
            .filter(|p| p.category == category)
            .cloned()
            .collect()
    }

    pub fn add_playlist(&self, playlist: Playlist) -> Result<()> {
        self.mutate(|c| collection::insert(&mut c.playlists, playlist, "playlist"))
    }

    pub fn update_playlist(&self, playlist: Playlist) -> Result<()> {
        self.mutate(|c| collection::replace(&mut c.playlists, playlist, "playlist"))
    }

    pub fn delete_playlist(&self, id: &str) -> bool {
        self.remove_where(|c| collection::remove(&mut c.playlists, id))
    }

    // ========== Flat collections ==========

    pub fn friend_artists(&self) -> Vec<FriendArtist> {
        self.state.read().persisted.friend_artists.clone()
    }

    pub fn add_friend_artist(&self, friend: FriendArtist) -> Result<()> {
        self.mutate(|c| collection::insert(&mut c.friend_artists, friend, "friend artist"))
    }

    pub fn update_friend_artist(&self, friend: FriendArtist) -> Result<()> {
        self.mutate(|c| collection::replace(&mut c.friend_artists, friend, "friend artist"))
    }

    pub fn delete_friend_artist(&self, id: &str) -> bool {
        self.remove_where(|c| collection::remove(&mut c.friend_artists, id))
    }

    pub fn news_articles(&self) -> Vec<NewsArticle> {
        self.state.read().persisted.news_articles.clone()
    }

    pub fn add_news_article(&self, article: NewsArticle) -> Result<()> {
        self.mutate(|c| collection::insert(&mut c.news_articles, article, "news article"))
    }

    pub fn update_news_article(&self, article: NewsArticle) -> Result<()> {
        self.mutate(|c| collection::replace(&mut c.news_articles, article, "news article"))
    }

    pub fn delete_news_article(&self, id: &str) -> bool {
        self.remove_where(|c| collection::remove(&mut c.news_articles, id))
    }

    pub fn constellation_items(&self) -> Vec<ConstellationItem> {
        self.state.read().persisted.constellation_items.clone()
    }

    pub fn add_constellation_item(&self, item: ConstellationItem) -> Result<()> {
        self.mutate(|c| collection::insert(&mut c.constellation_items, item, "constellation item"))
    }

    pub fn update_constellation_item(&self, item: ConstellationItem) -> Result<()> {
        self.mutate(|c| collection::replace(&mut c.constellation_items, item, "constellation item"))
    }

    pub fn delete_constellation_item(&self, id: &str) -> bool {
        self.remove_where(|c| collection::remove(&mut c.constellation_items, id))
    }

    /// Replace the constellation wholesale with a reordered list
    pub fn reorder_constellation(&self, items: Vec<ConstellationItem>) {
        let mut state = self.state.write();
        state.persisted.constellation_items = items;
        self.save(&state.persisted);
    }

    pub fn spotlight_items(&self) -> Vec<SpotlightItem> {
        self.state.read().persisted.spotlight_items.clone()
    }

    pub fn add_spotlight_item(&self, item: SpotlightItem) -> Result<()> {
        self.mutate(|c| collection::insert(&mut c.spotlight_items, item, "spotlight item"))
    }

    pub fn update_spotlight_item(&self, item: SpotlightItem) -> Result<()> {
        self.mutate(|c| collection::replace(&mut c.spotlight_items, item, "spotlight item"))
    }

    pub fn delete_spotlight_item(&self, id: &str) -> bool {
        self.remove_where(|c| collection::remove(&mut c.spotlight_items, id))
    }

    pub fn assets(&self) -> Vec<Asset> {
        self.state.read().persisted.asset_vault.clone()
    }

    pub fn add_asset(&self, asset: Asset) -> Result<()> {
        self.mutate(|c| collection::insert(&mut c.asset_vault, asset, "asset"))
    }

    pub fn update_asset(&self, asset: Asset) -> Result<()> {
        self.mutate(|c| collection::replace(&mut c.asset_vault, asset, "asset"))
    }

    pub fn delete_asset(&self, id: &str) -> bool {
        self.remove_where(|c| collection::remove(&mut c.asset_vault, id))
    }

    pub fn teo_apps(&self) -> Vec<TeoApp> {
        self.state.read().persisted.teo_apps.clone()
    }

    pub fn add_teo_app(&self, app: TeoApp) -> Result<()> {
        self.mutate(|c| collection::insert(&mut c.teo_apps, app, "app"))
    }

    pub fn update_teo_app(&self, app: TeoApp) -> Result<()> {
        self.mutate(|c| collection::replace(&mut c.teo_apps, app, "app"))
    }

    pub fn delete_teo_app(&self, id: &str) -> bool {
        self.remove_where(|c| collection::remove(&mut c.teo_apps, id))
    }

    pub fn smt_videos(&self) -> Vec<SmtVideo> {
        self.state.read().persisted.smt_videos.clone()
    }

    pub fn add_smt_video(&self, video: SmtVideo) -> Result<()> {
        self.mutate(|c| collection::insert(&mut c.smt_videos, video, "video"))
    }

    pub fn update_smt_video(&self, video: SmtVideo) -> Result<()> {
        self.mutate(|c| collection::replace(&mut c.smt_videos, video, "video"))
    }

    pub fn delete_smt_video(&self, id: &str) -> bool {
        self.remove_where(|c| collection::remove(&mut c.smt_videos, id))
    }

    // ========== Site singletons ==========

    pub fn trending_track_ids(&self) -> Vec<String> {
        self.state.read().persisted.trending_track_ids.clone()
    }

    pub fn set_trending_track_ids(&self, ids: Vec<String>) {
        let mut state = self.state.write();
        state.persisted.trending_track_ids = ids;
        self.save(&state.persisted);
    }

    pub fn hero_background_url(&self) -> String {
        self.state.read().persisted.hero_background_url.clone()
    }

    pub fn set_hero_background(&self, url: String) {
        let mut state = self.state.write();
        state.persisted.hero_background_url = url;
        self.save(&state.persisted);
    }

    pub fn portal_url(&self) -> String {
        self.state.read().persisted.portal_url.clone()
    }

    pub fn set_portal_url(&self, url: String) {
        let mut state = self.state.write();
        state.persisted.portal_url = url;
        self.save(&state.persisted);
    }

    pub fn page_contents(&self) -> PageContents {
        self.state.read().persisted.page_contents.clone()
    }

    pub fn page_content(&self, key: &str) -> Option<PageContent> {
        self.state.read().persisted.page_contents.get(key).cloned()
    }

    pub fn set_page_content(&self, key: &str, content: PageContent) -> Result<()> {
        if key.trim().is_empty() {
            return Err(StoreError::EmptyField("page key"));
        }
        self.mutate(|c| {
            c.page_contents.insert(key.trim().to_string(), content);
            Ok(())
        })
    }

    pub fn footer_content(&self) -> FooterContent {
        self.state.read().persisted.footer_content.clone()
    }

    pub fn set_footer_content(&self, footer: FooterContent) {
        let mut state = self.state.write();
        state.persisted.footer_content = footer;
        self.save(&state.persisted);
    }

    pub fn studio_action_costs(&self) -> StudioActionCosts {
        self.state.read().persisted.studio_action_costs.clone()
    }

    pub fn set_studio_action_costs(&self, costs: StudioActionCosts) {
        let mut state = self.state.write();
        state.persisted.studio_action_costs = costs;
        self.save(&state.persisted);
    }

    pub fn api_keys(&self) -> ApiKeys {
        self.state.read().persisted.api_keys.clone()
    }

    pub fn set_api_keys(&self, keys: ApiKeys) {
        let mut state = self.state.write();
        state.persisted.api_keys = keys;
        self.save(&state.persisted);
    }

    // ========== Volatile: gallery ==========

    pub fn gallery_images(&self) -> Vec<GalleryImage> {
        self.state.read().gallery_images.clone()
    }

    pub fn add_gallery_image(&self, image: GalleryImage) -> Result<()> {
        collection::insert(&mut self.state.write().gallery_images, image, "gallery image")
    }

    pub fn update_gallery_image(&self, image: GalleryImage) -> Result<()> {
        collection::replace(&mut self.state.write().gallery_images, image, "gallery image")
    }

    pub fn delete_gallery_image(&self, id: &str) -> bool {
        collection::remove(&mut self.state.write().gallery_images, id)
    }

    // ========== Volatile: studio submissions ==========

    pub fn submissions(&self) -> Vec<StudioSubmission> {
        self.state.read().submissions.clone()
    }

    pub fn submission(&self, id: &str) -> Option<StudioSubmission> {
        collection::find(&self.state.read().submissions, id).cloned()
    }

    pub fn submissions_by(&self, email: &str) -> Vec<StudioSubmission> {
        self.state
            .read()
            .submissions
            .iter()
            .filter(|s| s.user_email.eq_ignore_ascii_case(email))
            .cloned()
            .collect()
    }

    pub fn add_submission(&self, submission: StudioSubmission) -> Result<()> {
        debug!("New studio submission {} from {}", submission.id, submission.user_email);
        collection::insert(&mut self.state.write().submissions, submission, "submission")
    }

    pub fn update_submission(&self, submission: StudioSubmission) -> Result<()> {
        collection::replace(&mut self.state.write().submissions, submission, "submission")
    }

    pub fn delete_submission(&self, id: &str) -> bool {
        collection::remove(&mut self.state.write().submissions, id)
    }

    /// Mark a submission as showcased and add it to every showcase playlist.
    ///
    /// Both collections change within one write section. Idempotent: the id
    /// is never added to a playlist that already holds it, and the status is
    /// set rather than toggled.
    pub fn showcase_submission(&self, id: &str, comment: &str, rating: u8) -> Result<()> {
        let mut state = self.state.write();
        let ContentState {
            persisted,
            submissions,
            ..
        } = &mut *state;

        let submission = submissions
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| StoreError::not_found("submission", id))?;
        submission.status = SubmissionStatus::Showcased;
        submission.curator_comment = Some(comment.to_string());
        submission.curator_rating = Some(clamp_rating(rating));

        let added = persisted
            .playlists
            .iter_mut()
            .filter(|p| p.category == PlaylistCategory::Showcase)
            .map(|p| p.push_unique(id))
            .filter(|added| *added)
            .count();

        info!("Showcased submission {} into {} playlist(s)", id, added);
        if added > 0 {
            self.save(persisted);
        }
        Ok(())
    }

    // ========== Playback ==========

    /// Queue a single track from the catalog
    pub fn play_track(&self, track_id: &str) -> Result<()> {
        let state = self.state.read();
        let found = state
            .persisted
            .artists
            .iter()
            .find_map(|artist| {
                artist
                    .tracks()
                    .find(|(_, track)| track.id == track_id)
                    .map(|(release, track)| (artist, release, track))
            })
            .ok_or_else(|| StoreError::not_found("track", track_id))?;

        let (artist, release, track) = found;
        self.playback.write().play_single(track, release, artist);
        Ok(())
    }

    /// Queue every resolvable track of a playlist. Returns the queue length.
    pub fn play_playlist(&self, playlist_id: &str) -> Result<usize> {
        let tracks = self
            .playlist_tracks(playlist_id)
            .ok_or_else(|| StoreError::not_found("playlist", playlist_id))?;
        let count = tracks.len();
        if count == 0 {
            warn!("Playlist {} has no playable tracks", playlist_id);
        }
        self.playback.write().play_many(tracks);
        Ok(count)
    }

    pub fn play_many(&self, tracks: Vec<EnrichedTrack>) {
        self.playback.write().play_many(tracks);
    }

    pub fn next_track(&self) {
        self.playback.write().next();
    }

    pub fn previous_track(&self) {
        self.playback.write().previous();
    }

    pub fn clear_playback(&self) {
        self.playback.write().clear();
    }

    pub fn now_playing(&self) -> Option<EnrichedTrack> {
        self.playback.read().current().cloned()
    }

    pub fn playback(&self) -> PlaybackQueue {
        self.playback.read().clone()
    }
}

fn load_content(storage: &dyn KeyValueStorage) -> PersistedContent {
    match storage.get(CONTENT_STORAGE_KEY) {
        Ok(Some(raw)) => match PersistedContent::decode(&raw) {
            Ok(content) => {
                debug!("Loaded stored content");
                content
            }
            Err(e) => {
                warn!("Stored content does not match the expected shape, using defaults: {}", e);
                seed::default_content()
            }
        },
        Ok(None) => {
            debug!("No stored content, using defaults");
            seed::default_content()
        }
        Err(e) => {
            warn!("Could not read stored content, using defaults: {}", e);
            seed::default_content()
        }
    }
}
