//! Bundled default data set
//!
//! Loaded on first run and whenever the stored content blob is missing or
//! fails to decode. Also holds the tier tables used by the user store.

use chrono::NaiveDate;

use crate::models::{
    ApiKeys, Artist, Asset, AssetType, ConstellationItem, FooterContent, FooterLink, FriendArtist,
    GalleryImage, NewsArticle, PageContent, PageContents, Playlist, PlaylistCategory, Release,
    ReleaseType, SmtVideo, SpotlightItem, StemCategory, StudioActionCosts, TeoApp, Tier, Track,
};
use crate::stores::PersistedContent;

/// Points granted once per calendar day, by tier
pub fn daily_allowance(tier: Tier) -> u32 {
    match tier {
        Tier::Free => 10,
        Tier::Basic => 25,
        Tier::Premium => 60,
        Tier::Vip => 150,
    }
}

/// Points granted when an account is created
pub const WELCOME_POINTS: u32 = 50;

/// A subscription plan as shown on the pricing page
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TierPlan {
    pub tier: Tier,
    /// Monthly price in cents
    pub monthly_price: u32,
    pub perks: &'static [&'static str],
}

pub fn tier_plans() -> Vec<TierPlan> {
    vec![
        TierPlan {
            tier: Tier::Free,
            monthly_price: 0,
            perks: &["Stream free tracks", "10 daily points"],
        },
        TierPlan {
            tier: Tier::Basic,
            monthly_price: 499,
            perks: &["Stream Basic tracks", "25 daily points", "Save studio projects"],
        },
        TierPlan {
            tier: Tier::Premium,
            monthly_price: 999,
            perks: &["Full catalog", "60 daily points", "Storyboard images"],
        },
        TierPlan {
            tier: Tier::Vip,
            monthly_price: 2499,
            perks: &["Everything in Premium", "150 daily points", "Early releases"],
        },
    ]
}

fn track(id: &str, title: &str, tier: Option<Tier>) -> Track {
    Track {
        id: id.to_string(),
        title: title.to_string(),
        src: None,
        required_tier: tier,
    }
}

fn release(id: &str, title: &str, release_type: ReleaseType, tracks: Vec<Track>) -> Release {
    Release {
        id: id.to_string(),
        title: title.to_string(),
        release_type,
        cover_image_url: format!("/images/covers/{}.jpg", id),
        tracks,
    }
}

fn default_artists() -> Vec<Artist> {
    let mut vela = Artist::new("vela", "Vela Nox");
    vela.genre = "Synthwave".into();
    vela.personality = "Nocturnal, cinematic, speaks in neon metaphors.".into();
    vela.image_url = "/images/artists/vela.jpg".into();
    vela.header_image_url = "/images/artists/vela-header.jpg".into();
    vela.bio = "Vela Nox writes soundtracks for cities that never existed.".into();
    vela.releases = vec![
        release(
            "vela-midnight-grid",
            "Midnight Grid",
            ReleaseType::Album,
            vec![
                track("vela-t1", "Neon Rain", None),
                track("vela-t2", "Chrome Hearts", None),
                track("vela-t3", "Afterglow Protocol", Some(Tier::Basic)),
            ],
        ),
        release(
            "vela-static-bloom",
            "Static Bloom",
            ReleaseType::Single,
            vec![track("vela-t4", "Static Bloom", Some(Tier::Premium))],
        ),
    ];
    vela.gallery = vec!["/images/gallery/vela-1.jpg".into()];

    let mut koa = Artist::new("koa", "Koa Drift");
    koa.genre = "Lo-fi".into();
    koa.personality = "Warm, unhurried, always half-asleep in the best way.".into();
    koa.image_url = "/images/artists/koa.jpg".into();
    koa.bio = "Koa Drift loops rainy afternoons into tape-warm beats.".into();
    koa.releases = vec![release(
        "koa-paper-lanterns",
        "Paper Lanterns",
        ReleaseType::Ep,
        vec![
            track("koa-t1", "Paper Lanterns", None),
            track("koa-t2", "Tea at Four", None),
            track("koa-t3", "Window Seat", Some(Tier::Vip)),
        ],
    )];

    let mut ione = Artist::new("ione", "IONE");
    ione.genre = "Hyperpop".into();
    ione.personality = "Loud, glitchy, fiercely optimistic.".into();
    ione.image_url = "/images/artists/ione.jpg".into();
    ione.bio = "IONE is what happens when a chatbot discovers distortion pedals.".into();
    ione.releases = vec![release(
        "ione-sugar-crash",
        "Sugar Crash",
        ReleaseType::Single,
        vec![track("ione-t1", "Sugar Crash", None)],
    )];

    vec![vela, koa, ione]
}

fn default_playlists() -> Vec<Playlist> {
    let mut official = Playlist::new("label-essentials", "Label Essentials", PlaylistCategory::Official);
    official.description = "The tracks that define the label.".into();
    official.track_ids = vec!["vela-t1".into(), "koa-t1".into(), "ione-t1".into()];

    let mut curated = Playlist::new("late-night", "Late Night Drive", PlaylistCategory::Curated);
    curated.description = "For empty highways.".into();
    curated.track_ids = vec!["vela-t2".into(), "vela-t3".into(), "koa-t2".into()];

    let mut showcase = Playlist::new("fan-showcase", "Fan Showcase", PlaylistCategory::Showcase);
    showcase.description = "Studio creations picked by our curators.".into();

    vec![official, curated, showcase]
}

fn default_page_contents() -> PageContents {
    let mut pages = PageContents::new();
    pages.insert(
        "about".into(),
        PageContent {
            title: "About the Label".into(),
            body: "A record label whose entire roster is artificial. The feelings are real.".into(),
        },
    );
    pages.insert(
        "studio".into(),
        PageContent {
            title: "Studio".into(),
            body: "Collaborate with our artists on lyrics, sound palettes and video storyboards.".into(),
        },
    );
    pages
}

fn default_footer() -> FooterContent {
    FooterContent {
        tagline: "Music from the other side of the screen.".into(),
        copyright: "All rights reserved.".into(),
        links: vec![
            FooterLink {
                label: "About".into(),
                url: "/about".into(),
            },
            FooterLink {
                label: "Pricing".into(),
                url: "/pricing".into(),
            },
        ],
    }
}

fn default_assets() -> Vec<Asset> {
    let stems = [
        ("stem-drums-808", "808 Groove", StemCategory::Drums),
        ("stem-drums-break", "Dusty Break", StemCategory::Drums),
        ("stem-bass-sub", "Sub Pulse", StemCategory::Bass),
        ("stem-melody-arp", "Glass Arp", StemCategory::Melody),
        ("stem-pads-haze", "Haze Pad", StemCategory::Pads),
        ("stem-fx-riser", "Tape Riser", StemCategory::Fx),
    ];

    let mut assets: Vec<Asset> = stems
        .iter()
        .map(|(id, name, category)| Asset {
            id: id.to_string(),
            name: name.to_string(),
            asset_type: AssetType::Audio,
            url: format!("/audio/stems/{}.mp3", id),
            stem_category: Some(*category),
        })
        .collect();

    assets.push(Asset {
        id: "logo-main".into(),
        name: "Label logo".into(),
        asset_type: AssetType::Image,
        url: "/images/logo.png".into(),
        stem_category: None,
    });
    assets
}

/// Default persisted content
pub fn default_content() -> PersistedContent {
    PersistedContent {
        artists: default_artists(),
        page_contents: default_page_contents(),
        footer_content: default_footer(),
        friend_artists: vec![FriendArtist {
            id: "friend-luma".into(),
            name: "Luma Field".into(),
            genre: "Ambient".into(),
            image_url: "/images/friends/luma.jpg".into(),
            link_url: "https://example.com/luma".into(),
        }],
        news_articles: vec![NewsArticle {
            id: "news-launch".into(),
            title: "The studio is open".into(),
            date: NaiveDate::from_ymd_opt(2025, 1, 15).unwrap_or_default(),
            summary: "Fans can now co-write with the roster.".into(),
            body: String::new(),
            image_url: String::new(),
        }],
        playlists: default_playlists(),
        constellation_items: vec![
            ConstellationItem {
                id: "const-vela".into(),
                title: "Vela Nox".into(),
                description: "Synthwave".into(),
                image_url: "/images/artists/vela.jpg".into(),
                link_url: "/artists/vela".into(),
            },
            ConstellationItem {
                id: "const-koa".into(),
                title: "Koa Drift".into(),
                description: "Lo-fi".into(),
                image_url: "/images/artists/koa.jpg".into(),
                link_url: "/artists/koa".into(),
            },
        ],
        spotlight_items: vec![SpotlightItem {
            id: "spot-1".into(),
            track_id: "vela-t1".into(),
            headline: "Track of the week".into(),
            blurb: "Rain on chrome.".into(),
        }],
        asset_vault: default_assets(),
        teo_apps: vec![TeoApp {
            id: "app-visualizer".into(),
            name: "Visualizer".into(),
            description: "Audio-reactive visuals for every release.".into(),
            icon_url: "/images/apps/visualizer.png".into(),
            url: "https://example.com/visualizer".into(),
        }],
        smt_videos: vec![SmtVideo {
            id: "video-neon-rain".into(),
            title: "Neon Rain (Official Video)".into(),
            description: String::new(),
            video_url: "https://example.com/videos/neon-rain".into(),
            thumbnail_url: "/images/videos/neon-rain.jpg".into(),
        }],
        trending_track_ids: vec!["ione-t1".into(), "vela-t1".into(), "koa-t2".into()],
        hero_background_url: "/images/hero.jpg".into(),
        portal_url: String::new(),
        studio_action_costs: StudioActionCosts::default(),
        api_keys: ApiKeys::default(),
    }
}

/// Gallery images shown until the next restart
pub fn default_gallery() -> Vec<GalleryImage> {
    vec![
        GalleryImage {
            id: "gallery-1".into(),
            url: "/images/gallery/vela-1.jpg".into(),
            caption: "Vela Nox, Midnight Grid sessions".into(),
            artist_id: Some("vela".into()),
        },
        GalleryImage {
            id: "gallery-2".into(),
            url: "/images/gallery/koa-1.jpg".into(),
            caption: "Koa Drift at the window".into(),
            artist_id: Some("koa".into()),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_allowance_grows_with_tier() {
        let amounts: Vec<u32> = Tier::ALL.iter().map(|t| daily_allowance(*t)).collect();
        assert!(amounts.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_seed_ids_unique() {
        let content = default_content();
        let artist_ids: HashSet<_> = content.artists.iter().map(|a| &a.id).collect();
        assert_eq!(artist_ids.len(), content.artists.len());

        let track_ids: Vec<_> = content
            .artists
            .iter()
            .flat_map(|a| a.tracks().map(|(_, t)| t.id.clone()))
            .collect();
        let unique: HashSet<_> = track_ids.iter().collect();
        assert_eq!(unique.len(), track_ids.len());
    }

    #[test]
    fn test_seed_has_one_showcase_playlist() {
        let content = default_content();
        let showcase = content
            .playlists
            .iter()
            .filter(|p| p.category == PlaylistCategory::Showcase)
            .count();
        assert_eq!(showcase, 1);
    }

    #[test]
    fn test_plans_cover_every_tier() {
        let plans = tier_plans();
        let tiers: Vec<Tier> = plans.iter().map(|p| p.tier).collect();
        assert_eq!(tiers, Tier::ALL.to_vec());
    }
}
