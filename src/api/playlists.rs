//! Playlist API routes

use actix_web::{delete, get, post, put, web, HttpRequest, HttpResponse};
use serde::Deserialize;
use tracing::info;

use super::auth::require_admin;
use super::AppState;
use crate::error::{Result, StoreError};
use crate::models::{Playlist, PlaylistCategory};

#[derive(Debug, Deserialize)]
pub struct PlaylistsQuery {
    #[serde(default)]
    pub category: Option<PlaylistCategory>,
}

/// GET /api/playlists
#[get("")]
pub async fn get_playlists(
    state: web::Data<AppState>,
    query: web::Query<PlaylistsQuery>,
) -> HttpResponse {
    let playlists = match query.category {
        Some(category) => state.content.playlists_in(category),
        None => state.content.playlists(),
    };
    HttpResponse::Ok().json(playlists)
}

/// GET /api/playlists/{id}/tracks
#[get("/{id}/tracks")]
pub async fn get_playlist_tracks(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    let tracks = state
        .content
        .playlist_tracks(&id)
        .ok_or_else(|| StoreError::not_found("playlist", id))?;
    Ok(HttpResponse::Ok().json(tracks))
}

/// POST /api/playlists (admin)
#[post("")]
pub async fn create_playlist(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<Playlist>,
) -> Result<HttpResponse> {
    require_admin(&req, &state)?;
    let playlist = body.into_inner();
    if playlist.id.trim().is_empty() {
        return Err(StoreError::EmptyField("id"));
    }

    state.content.add_playlist(playlist.clone())?;
    info!("Created playlist {}", playlist.id);
    Ok(HttpResponse::Created().json(playlist))
}

/// PUT /api/playlists/{id} (admin)
#[put("/{id}")]
pub async fn update_playlist(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<Playlist>,
) -> Result<HttpResponse> {
    require_admin(&req, &state)?;
    let mut playlist = body.into_inner();
    playlist.id = path.into_inner();

    state.content.update_playlist(playlist.clone())?;
    Ok(HttpResponse::Ok().json(playlist))
}

/// DELETE /api/playlists/{id} (admin)
#[delete("/{id}")]
pub async fn delete_playlist(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    require_admin(&req, &state)?;
    let id = path.into_inner();
    if !state.content.delete_playlist(&id) {
        return Err(StoreError::not_found("playlist", id));
    }
    Ok(HttpResponse::NoContent().finish())
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(get_playlists)
        .service(get_playlist_tracks)
        .service(create_playlist)
        .service(update_playlist)
        .service(delete_playlist);
}
