//! Studio API routes
//!
//! Every call needs a signed-in fan. Paid stages check the balance before
//! calling the model and deduct the price only once the stage succeeded.

use actix_web::{post, web, HttpRequest, HttpResponse, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::auth::require_user;
use super::AppState;
use crate::error::StoreError;
use crate::models::{Artist, StudioAction, User, UserProject};
use crate::studio::{route_agent, GenerativeModel, Persona, StudioDraft, StudioPipeline};

#[derive(Debug, Deserialize)]
pub struct DraftBody {
    pub draft: StudioDraft,
}

#[derive(Debug, Deserialize)]
pub struct SubmitBody {
    pub draft: StudioDraft,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PromptBody {
    pub prompt: String,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StageResponse {
    pub draft: StudioDraft,
    pub points: u32,
}

/// Price of `action`, if `user` can afford it
fn price(state: &AppState, user: &User, action: StudioAction) -> std::result::Result<u32, StoreError> {
    let cost = state.content.studio_action_costs().cost_of(action);
    if user.points < cost {
        return Err(StoreError::InsufficientPoints {
            needed: cost,
            balance: user.points,
        });
    }
    Ok(cost)
}

fn draft_artist(state: &AppState, draft: &StudioDraft) -> std::result::Result<Artist, StoreError> {
    state
        .content
        .artist(&draft.artist_id)
        .ok_or_else(|| StoreError::not_found("artist", draft.artist_id.clone()))
}

/// POST /api/studio/idea
#[post("/idea")]
pub async fn idea(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<DraftBody>,
) -> Result<HttpResponse> {
    let user = require_user(&req, &state)?;
    let cost = price(&state, &user, StudioAction::IdeaAndLyrics)?;
    let mut draft = body.into_inner().draft;
    let artist = draft_artist(&state, &draft)?;

    StudioPipeline::new(state.studio.as_ref())
        .idea_and_lyrics(&mut draft, &artist)
        .await?;
    let points = state.users.charge_points(&user.email, cost)?;
    Ok(HttpResponse::Ok().json(StageResponse { draft, points }))
}

/// POST /api/studio/palette
#[post("/palette")]
pub async fn palette(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<DraftBody>,
) -> Result<HttpResponse> {
    let user = require_user(&req, &state)?;
    let cost = price(&state, &user, StudioAction::SoundPalette)?;
    let mut draft = body.into_inner().draft;

    StudioPipeline::new(state.studio.as_ref())
        .sound_palette(&mut draft, &state.content.assets())
        .await?;
    let points = state.users.charge_points(&user.email, cost)?;
    Ok(HttpResponse::Ok().json(StageResponse { draft, points }))
}

/// POST /api/studio/storyboard
#[post("/storyboard")]
pub async fn storyboard(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<DraftBody>,
) -> Result<HttpResponse> {
    let user = require_user(&req, &state)?;
    let cost = price(&state, &user, StudioAction::Storyboard)?;
    let mut draft = body.into_inner().draft;
    let artist = draft_artist(&state, &draft)?;

    StudioPipeline::new(state.studio.as_ref())
        .storyboard(&mut draft, &artist)
        .await?;
    let points = state.users.charge_points(&user.email, cost)?;
    Ok(HttpResponse::Ok().json(StageResponse { draft, points }))
}

/// POST /api/studio/storyboard-images
#[post("/storyboard-images")]
pub async fn storyboard_images(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<DraftBody>,
) -> Result<HttpResponse> {
    let user = require_user(&req, &state)?;
    let cost = price(&state, &user, StudioAction::StoryboardImages)?;
    let mut draft = body.into_inner().draft;

    StudioPipeline::new(state.studio.as_ref())
        .storyboard_images(&mut draft)
        .await?;
    let points = state.users.charge_points(&user.email, cost)?;
    Ok(HttpResponse::Ok().json(StageResponse { draft, points }))
}

/// POST /api/studio/submit
/// Files the draft for curation and keeps a copy in the fan's projects.
#[post("/submit")]
pub async fn submit(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<SubmitBody>,
) -> Result<HttpResponse> {
    let user = require_user(&req, &state)?;
    let SubmitBody { draft, title } = body.into_inner();
    let title = title.unwrap_or_else(|| draft.prompt.clone());

    let submission = draft.into_submission(&user)?;
    state.content.add_submission(submission.clone())?;
    state
        .users
        .add_project(&user.email, UserProject::studio_project(title, submission.clone()))?;

    info!("Submission {} filed by {}", submission.id, user.email);
    Ok(HttpResponse::Created().json(submission))
}

/// POST /api/studio/route
#[post("/route")]
pub async fn route(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<PromptBody>,
) -> Result<HttpResponse> {
    let user = require_user(&req, &state)?;
    let cost = price(&state, &user, StudioAction::AgentChat)?;
    if body.prompt.trim().is_empty() {
        return Err(StoreError::EmptyField("prompt").into());
    }

    let personas: Vec<Persona> = state
        .content
        .artists()
        .into_iter()
        .map(|a| Persona::new(a.id, a.name, a.personality))
        .collect();
    let agent_id = route_agent(state.studio.as_ref(), &body.prompt, &personas).await?;
    let points = state.users.charge_points(&user.email, cost)?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "agentId": agent_id,
        "points": points,
    })))
}

/// POST /api/studio/image
/// Generates one image and saves it to the fan's projects.
#[post("/image")]
pub async fn image(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<PromptBody>,
) -> Result<HttpResponse> {
    let user = require_user(&req, &state)?;
    let cost = price(&state, &user, StudioAction::ImageGeneration)?;
    let PromptBody { prompt, title } = body.into_inner();
    let prompt = prompt.trim().to_string();
    if prompt.is_empty() {
        return Err(StoreError::EmptyField("prompt").into());
    }

    let image_url = state.studio.generate_image(&prompt).await?;
    let title = title.unwrap_or_else(|| prompt.clone());
    let project = UserProject::saved_image(title, image_url, prompt);
    state.users.add_project(&user.email, project.clone())?;
    let points = state.users.charge_points(&user.email, cost)?;

    Ok(HttpResponse::Created().json(serde_json::json!({
        "project": project,
        "points": points,
    })))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(idea)
        .service(palette)
        .service(storyboard)
        .service(storyboard_images)
        .service(submit)
        .service(route)
        .service(image);
}
