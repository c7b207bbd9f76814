//! Data models for the label site
//!
//! This module contains all the entities held by the content and user stores.

mod artist;
mod asset;
mod display;
mod enriched;
mod enums;
mod playlist;
mod site;
mod studio;
mod user;

pub use artist::{Artist, Release, ReleaseType, Track};
pub use asset::{Asset, AssetType};
pub use display::{
    ConstellationItem, FriendArtist, GalleryImage, NewsArticle, SmtVideo, SpotlightItem, TeoApp,
};
pub use enriched::{EnrichedTrack, TrendingTrack};
pub use enums::{StemCategory, Tier};
pub use playlist::{Playlist, PlaylistCategory};
pub use site::{
    ApiKeys, FooterContent, FooterLink, PageContent, PageContents, StudioAction, StudioActionCosts,
};
pub use studio::{
    clamp_rating, PaletteSlot, StoryboardScene, StudioSubmission, SubmissionStatus,
    STORYBOARD_SCENES,
};
pub use user::{ProjectContent, ProjectKind, User, UserProject};

/// An entity identified by an id unique within its collection
pub trait Identified {
    fn id(&self) -> &str;
}

macro_rules! impl_identified {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Identified for $ty {
                fn id(&self) -> &str {
                    &self.id
                }
            }
        )*
    };
}

impl_identified!(
    Artist,
    Asset,
    ConstellationItem,
    FriendArtist,
    GalleryImage,
    NewsArticle,
    Playlist,
    SmtVideo,
    SpotlightItem,
    StudioSubmission,
    TeoApp,
    UserProject,
);
