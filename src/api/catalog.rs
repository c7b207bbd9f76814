//! Catalog API routes: artists, tracks, trending and site content

use actix_web::{get, web, HttpResponse};
use serde_json::json;

use super::AppState;
use crate::error::{Result, StoreError};

/// GET /api/artists
#[get("/artists")]
pub async fn get_artists(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(state.content.artists())
}

/// GET /api/artists/{id}
#[get("/artists/{id}")]
pub async fn get_artist(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    let artist = state
        .content
        .artist(&id)
        .ok_or_else(|| StoreError::not_found("artist", id))?;
    Ok(HttpResponse::Ok().json(artist))
}

/// GET /api/tracks/{id}
#[get("/tracks/{id}")]
pub async fn get_track(state: web::Data<AppState>, path: web::Path<String>) -> Result<HttpResponse> {
    let id = path.into_inner();
    let track = state
        .content
        .track(&id)
        .ok_or_else(|| StoreError::not_found("track", id))?;
    Ok(HttpResponse::Ok().json(track))
}

/// GET /api/trending
#[get("/trending")]
pub async fn get_trending(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(state.content.trending())
}

/// GET /api/content
///
/// Everything the public pages render besides the catalog itself.
#[get("/content")]
pub async fn get_content(state: web::Data<AppState>) -> HttpResponse {
    let content = &state.content;
    let spotlight: Vec<_> = content
        .spotlight_tracks()
        .into_iter()
        .map(|(item, track)| json!({ "item": item, "track": track }))
        .collect();

    HttpResponse::Ok().json(json!({
        "heroBackgroundUrl": content.hero_background_url(),
        "portalUrl": content.portal_url(),
        "pageContents": content.page_contents(),
        "footerContent": content.footer_content(),
        "spotlight": spotlight,
        "friendArtists": content.friend_artists(),
        "newsArticles": content.news_articles(),
        "constellationItems": content.constellation_items(),
        "teoApps": content.teo_apps(),
        "smtVideos": content.smt_videos(),
        "galleryImages": content.gallery_images(),
        "studioActionCosts": content.studio_action_costs(),
    }))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(get_artists)
        .service(get_artist)
        .service(get_track)
        .service(get_trending)
        .service(get_content);
}
