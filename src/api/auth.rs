//! Session token handling and route guards
//!
//! The token travels in the `session_token` cookie, or in an
//! `Authorization: Bearer` header for clients without cookies.

use actix_web::cookie::{time::Duration as CookieDuration, Cookie};
use actix_web::{post, web, HttpRequest, HttpResponse};
use serde::Deserialize;

use super::AppState;
use crate::error::{Result, StoreError};
use crate::models::User;

pub const SESSION_COOKIE: &str = "session_token";
const SESSION_MAX_AGE: i64 = 7 * 24 * 3600; // 7 days in seconds

pub fn session_cookie(token: &str) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, token.to_string())
        .path("/")
        .http_only(true)
        .max_age(CookieDuration::seconds(SESSION_MAX_AGE))
        .finish()
}

pub fn expired_session_cookie() -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, "")
        .path("/")
        .max_age(CookieDuration::seconds(0))
        .http_only(true)
        .finish()
}

/// Cookie first, then the bearer header
pub fn session_token(req: &HttpRequest) -> Option<String> {
    if let Some(cookie) = req.cookie(SESSION_COOKIE) {
        if !cookie.value().is_empty() {
            return Some(cookie.value().to_string());
        }
    }

    let header = req.headers().get("Authorization")?.to_str().ok()?.trim();
    let token = header.strip_prefix("Bearer ").unwrap_or(header).trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

/// The signed-in user behind the request
pub fn require_user(req: &HttpRequest, state: &AppState) -> Result<User> {
    session_token(req)
        .and_then(|token| state.users.current_user(&token))
        .ok_or(StoreError::Unauthorized("sign in first"))
}

pub fn require_admin(req: &HttpRequest, state: &AppState) -> Result<()> {
    match session_token(req) {
        Some(token) if state.users.is_admin(&token) => Ok(()),
        _ => Err(StoreError::Unauthorized("admin access required")),
    }
}

#[derive(Debug, Deserialize)]
pub struct AdminLoginBody {
    pub passcode: String,
}

#[derive(Debug, Deserialize)]
pub struct GrantPointsBody {
    pub amount: u32,
}

/// POST /api/admin/login
#[post("/login")]
pub async fn admin_login(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<AdminLoginBody>,
) -> Result<HttpResponse> {
    let current = session_token(&req);
    let token = state
        .users
        .admin_log_in(current.as_deref(), &body.passcode)
        .ok_or(StoreError::Unauthorized("wrong passcode"))?;

    Ok(HttpResponse::Ok()
        .cookie(session_cookie(&token))
        .json(serde_json::json!({ "token": token })))
}

/// POST /api/admin/users/{email}/points
#[post("/users/{email}/points")]
pub async fn grant_points(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<GrantPointsBody>,
) -> Result<HttpResponse> {
    require_admin(&req, &state)?;
    let points = state.users.add_points(&path, body.amount)?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "points": points })))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(admin_login).service(grant_points);
}
