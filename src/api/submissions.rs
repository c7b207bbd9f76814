//! Studio submission API routes

use actix_web::{get, post, web, HttpRequest, HttpResponse};
use serde::Deserialize;

use super::auth::require_admin;
use super::AppState;
use crate::error::{Result, StoreError};

#[derive(Debug, Deserialize)]
pub struct SubmissionsQuery {
    /// Only submissions by this fan
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ShowcaseBody {
    #[serde(default)]
    pub comment: String,
    pub rating: u8,
}

/// GET /api/submissions (admin)
#[get("")]
pub async fn get_submissions(
    req: HttpRequest,
    state: web::Data<AppState>,
    query: web::Query<SubmissionsQuery>,
) -> Result<HttpResponse> {
    require_admin(&req, &state)?;
    let submissions = match &query.email {
        Some(email) => state.content.submissions_by(email),
        None => state.content.submissions(),
    };
    Ok(HttpResponse::Ok().json(submissions))
}

/// POST /api/submissions/{id}/showcase (admin)
#[post("/{id}/showcase")]
pub async fn showcase_submission(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<ShowcaseBody>,
) -> Result<HttpResponse> {
    require_admin(&req, &state)?;
    let id = path.into_inner();
    state
        .content
        .showcase_submission(&id, &body.comment, body.rating)?;

    let submission = state
        .content
        .submission(&id)
        .ok_or_else(|| StoreError::not_found("submission", id))?;
    Ok(HttpResponse::Ok().json(submission))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(get_submissions).service(showcase_submission);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::auth::session_cookie;
    use crate::api::test_support;
    use crate::models::{StudioSubmission, SubmissionStatus};
    use actix_web::{test, App};
    use chrono::Utc;
    use serde_json::{json, Value};

    fn submission(id: &str, email: &str) -> StudioSubmission {
        StudioSubmission {
            id: id.into(),
            user_email: email.into(),
            user_name: "Fan".into(),
            prompt: "neon rain".into(),
            artist_id: "vela".into(),
            creative_direction: String::new(),
            lyrics: "la la".into(),
            sound_palette: Vec::new(),
            storyboard: Vec::new(),
            status: SubmissionStatus::Pending,
            curator_comment: None,
            curator_rating: None,
            created_at: Utc::now(),
        }
    }

    #[actix_web::test]
    async fn test_list_by_email() {
        let state = test_support::state();
        state
            .content
            .add_submission(submission("sub-a", "a@example.com"))
            .unwrap();
        state
            .content
            .add_submission(submission("sub-b", "b@example.com"))
            .unwrap();
        let admin = test_support::admin_token(&state);
        let app = test::init_service(
            App::new()
                .app_data(state.clone())
                .configure(crate::api::configure),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/submissions").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 401);

        let req = test::TestRequest::get()
            .uri("/api/submissions")
            .cookie(session_cookie(&admin))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.as_array().map(Vec::len), Some(2));

        let req = test::TestRequest::get()
            .uri("/api/submissions?email=b@example.com")
            .cookie(session_cookie(&admin))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body[0]["id"], "sub-b");
        assert_eq!(body.as_array().map(Vec::len), Some(1));
    }

    #[actix_web::test]
    async fn test_showcase() {
        let state = test_support::state();
        state
            .content
            .add_submission(submission("sub-a", "a@example.com"))
            .unwrap();
        let fan = test_support::sign_up(&state, "a@example.com");
        let admin = test_support::admin_token(&state);
        let app = test::init_service(
            App::new()
                .app_data(state.clone())
                .configure(crate::api::configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/submissions/sub-a/showcase")
            .cookie(session_cookie(&fan))
            .set_json(json!({ "comment": "Mine!", "rating": 5 }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 401);
        assert!(state.content.playlist("fan-showcase").unwrap().track_ids.is_empty());

        let req = test::TestRequest::post()
            .uri("/api/submissions/sub-a/showcase")
            .cookie(session_cookie(&admin))
            .set_json(json!({ "comment": "Lovely", "rating": 9 }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["status"], "Showcased");
        assert_eq!(body["curatorRating"], 5);

        let showcase = state.content.playlist("fan-showcase").unwrap();
        assert_eq!(showcase.track_ids, vec!["sub-a".to_string()]);

        let req = test::TestRequest::post()
            .uri("/api/submissions/nope/showcase")
            .cookie(session_cookie(&admin))
            .set_json(json!({ "rating": 3 }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 404);
    }
}
