//! REST API routes for the label site

pub mod auth;
pub mod catalog;
pub mod playlists;
pub mod studio;
pub mod submissions;
pub mod users;

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, ResponseError};

use crate::error::StoreError;
use crate::stores::{ContentStore, UserStore};
use crate::studio::{GenerativeModel, StudioError};

/// Stores and the studio model shared by every handler
pub struct AppState {
    pub content: ContentStore,
    pub users: UserStore,
    pub studio: Arc<dyn GenerativeModel>,
}

impl AppState {
    pub fn new(content: ContentStore, users: UserStore, studio: Arc<dyn GenerativeModel>) -> Self {
        Self {
            content,
            users,
            studio,
        }
    }
}

impl ResponseError for StoreError {
    fn status_code(&self) -> StatusCode {
        match self {
            StoreError::NotFound { .. } => StatusCode::NOT_FOUND,
            StoreError::DuplicateId { .. } | StoreError::DuplicateEmail(_) => StatusCode::CONFLICT,
            StoreError::EmptyField(_) => StatusCode::BAD_REQUEST,
            StoreError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            StoreError::InsufficientPoints { .. } => StatusCode::PAYMENT_REQUIRED,
            StoreError::Storage(_) | StoreError::Serialization(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": self.to_string(),
        }))
    }
}

impl ResponseError for StudioError {
    fn status_code(&self) -> StatusCode {
        match self {
            StudioError::NotConfigured => StatusCode::SERVICE_UNAVAILABLE,
            StudioError::InvalidStage(_) => StatusCode::BAD_REQUEST,
            StudioError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            StudioError::Http(_)
            | StudioError::Status { .. }
            | StudioError::EmptyResponse
            | StudioError::MalformedJson(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": self.to_string(),
        }))
    }
}

/// Configure all API routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            // Artists, tracks, trending and site content
            .configure(catalog::configure)
            // Playlist routes
            .service(web::scope("/playlists").configure(playlists::configure))
            // Studio submission routes
            .service(web::scope("/submissions").configure(submissions::configure))
            // User routes
            .service(web::scope("/users").configure(users::configure))
            // Generative studio routes
            .service(web::scope("/studio").configure(studio::configure))
            // Admin sign-in and grants
            .service(web::scope("/admin").configure(auth::configure)),
    );
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use actix_web::web;

    use super::AppState;
    use crate::storage::MemoryStorage;
    use crate::stores::{ContentStore, UserStore};
    use crate::studio::fake::FakeModel;
    use crate::utils::dates;

    /// Seeded state over in-memory storage, with a model that has no answers
    pub fn state() -> web::Data<AppState> {
        state_with(Arc::new(FakeModel::default()))
    }

    pub fn state_with(model: Arc<FakeModel>) -> web::Data<AppState> {
        let content = ContentStore::open(Arc::new(MemoryStorage::new()));
        let users = UserStore::open(
            Arc::new(MemoryStorage::new()),
            Arc::new(MemoryStorage::new()),
            "letmein",
        );
        web::Data::new(AppState::new(content, users, model))
    }

    /// Token of a fresh fan account
    pub fn sign_up(state: &AppState, email: &str) -> String {
        state
            .users
            .sign_up(email, "Fan", dates::today())
            .unwrap()
            .token
    }

    pub fn admin_token(state: &AppState) -> String {
        state.users.admin_log_in(None, "letmein").unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(
            StoreError::not_found("artist", "x").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            StoreError::duplicate("playlist", "x").status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            StoreError::EmptyField("email").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            StoreError::Unauthorized("admin access required").status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            StoreError::InsufficientPoints { needed: 5, balance: 1 }.status_code(),
            StatusCode::PAYMENT_REQUIRED
        );
        assert_eq!(
            StudioError::NotConfigured.status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            StudioError::Timeout { attempts: 3 }.status_code(),
            StatusCode::GATEWAY_TIMEOUT
        );
    }
}
