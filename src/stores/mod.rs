//! Content and user stores

mod collection;
mod content_store;
mod notices;
mod playback;
mod snapshot;
mod track_index;
mod user_store;

pub use content_store::ContentStore;
pub use notices::StoreNotice;
pub use playback::PlaybackQueue;
pub use snapshot::PersistedContent;
pub use track_index::TrackIndex;
pub use user_store::{Session, SignIn, UserStore};
