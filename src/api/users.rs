//! User API routes

use actix_web::{delete, get, post, web, HttpRequest, HttpResponse};
use serde::Deserialize;

use super::auth::{expired_session_cookie, require_user, session_cookie, session_token};
use super::AppState;
use crate::error::{Result, StoreError};
use crate::utils::dates;

#[derive(Debug, Deserialize)]
pub struct SignUpBody {
    pub email: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct LogInBody {
    pub email: String,
}

/// POST /api/users/signup
#[post("/signup")]
pub async fn sign_up(
    state: web::Data<AppState>,
    body: web::Json<SignUpBody>,
) -> Result<HttpResponse> {
    let signed = state.users.sign_up(&body.email, &body.name, dates::today())?;
    Ok(HttpResponse::Created()
        .cookie(session_cookie(&signed.token))
        .json(signed))
}

/// POST /api/users/login
#[post("/login")]
pub async fn log_in(
    state: web::Data<AppState>,
    body: web::Json<LogInBody>,
) -> Result<HttpResponse> {
    let signed = state.users.log_in(&body.email, dates::today())?;
    Ok(HttpResponse::Ok()
        .cookie(session_cookie(&signed.token))
        .json(signed))
}

/// POST /api/users/logout
#[post("/logout")]
pub async fn log_out(req: HttpRequest, state: web::Data<AppState>) -> HttpResponse {
    if let Some(token) = session_token(&req) {
        state.users.log_out(&token);
    }
    HttpResponse::Ok()
        .cookie(expired_session_cookie())
        .json(serde_json::json!({ "msg": "Logged out" }))
}

/// GET /api/users/me
/// Restores the session and grants the daily allowance on a new day.
#[get("/me")]
pub async fn me(req: HttpRequest, state: web::Data<AppState>) -> Result<HttpResponse> {
    let user = session_token(&req)
        .and_then(|token| state.users.rehydrate(&token, dates::today()))
        .ok_or(StoreError::Unauthorized("sign in first"))?;
    Ok(HttpResponse::Ok().json(user))
}

/// GET /api/users/me/projects
#[get("/me/projects")]
pub async fn my_projects(req: HttpRequest, state: web::Data<AppState>) -> Result<HttpResponse> {
    let user = require_user(&req, &state)?;
    Ok(HttpResponse::Ok().json(user.projects))
}

/// DELETE /api/users/me/projects/{id}
#[delete("/me/projects/{id}")]
pub async fn delete_my_project(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let user = require_user(&req, &state)?;
    let id = path.into_inner();
    if !state.users.delete_project(&user.email, &id) {
        return Err(StoreError::not_found("project", id));
    }
    Ok(HttpResponse::NoContent().finish())
}

/// GET /api/users/me/submissions
#[get("/me/submissions")]
pub async fn my_submissions(req: HttpRequest, state: web::Data<AppState>) -> Result<HttpResponse> {
    let user = require_user(&req, &state)?;
    Ok(HttpResponse::Ok().json(state.content.submissions_by(&user.email)))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(sign_up)
        .service(log_in)
        .service(log_out)
        .service(me)
        .service(my_projects)
        .service(delete_my_project)
        .service(my_submissions);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support;
    use crate::models::UserProject;
    use crate::seed::WELCOME_POINTS;
    use actix_web::{test, App};
    use serde_json::{json, Value};

    #[actix_web::test]
    async fn test_sign_up() {
        let state = test_support::state();
        let app = test::init_service(
            App::new()
                .app_data(state.clone())
                .configure(crate::api::configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/users/signup")
            .set_json(json!({ "email": "fan@example.com", "name": "Fan" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 201);
        assert!(resp
            .response()
            .cookies()
            .any(|c| c.name() == crate::api::auth::SESSION_COOKIE));
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["user"]["points"], WELCOME_POINTS);
        let token = body["token"].as_str().unwrap();
        assert_eq!(
            state.users.current_user(token).map(|u| u.email),
            Some("fan@example.com".to_string())
        );

        let req = test::TestRequest::post()
            .uri("/api/users/signup")
            .set_json(json!({ "email": "FAN@example.com", "name": "Again" }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 409);

        let req = test::TestRequest::post()
            .uri("/api/users/signup")
            .set_json(json!({ "email": "  ", "name": "Blank" }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 400);
    }

    #[actix_web::test]
    async fn test_each_client_sees_own_account() {
        let state = test_support::state();
        let a = test_support::sign_up(&state, "a@example.com");
        let b = test_support::sign_up(&state, "b@example.com");
        let app = test::init_service(
            App::new()
                .app_data(state.clone())
                .configure(crate::api::configure),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/users/me")
            .cookie(session_cookie(&a))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["email"], "a@example.com");

        let req = test::TestRequest::get()
            .uri("/api/users/me")
            .cookie(session_cookie(&b))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["email"], "b@example.com");

        let req = test::TestRequest::get().uri("/api/users/me").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 401);
    }

    #[actix_web::test]
    async fn test_log_in_and_out() {
        let state = test_support::state();
        let first = test_support::sign_up(&state, "fan@example.com");
        let app = test::init_service(
            App::new()
                .app_data(state.clone())
                .configure(crate::api::configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/users/logout")
            .cookie(session_cookie(&first))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 200);
        assert!(state.users.session(&first).is_none());

        let req = test::TestRequest::post()
            .uri("/api/users/login")
            .set_json(json!({ "email": "nobody@example.com" }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 404);

        let req = test::TestRequest::post()
            .uri("/api/users/login")
            .set_json(json!({ "email": "Fan@Example.com" }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["user"]["email"], "fan@example.com");
        assert!(state
            .users
            .current_user(body["token"].as_str().unwrap())
            .is_some());
    }

    #[actix_web::test]
    async fn test_my_projects() {
        let state = test_support::state();
        let token = test_support::sign_up(&state, "fan@example.com");
        let project = UserProject::saved_image("Cover", "data:,".into(), "neon".into());
        state
            .users
            .add_project("fan@example.com", project.clone())
            .unwrap();
        let app = test::init_service(
            App::new()
                .app_data(state.clone())
                .configure(crate::api::configure),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/users/me/projects")
            .cookie(session_cookie(&token))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body[0]["id"], project.id.as_str());

        let req = test::TestRequest::delete()
            .uri(&format!("/api/users/me/projects/{}", project.id))
            .cookie(session_cookie(&token))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 204);
        assert!(state.users.projects("fan@example.com").is_empty());

        let req = test::TestRequest::get()
            .uri("/api/users/me/submissions")
            .cookie(session_cookie(&token))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.as_array().map(Vec::len), Some(0));
    }
}
