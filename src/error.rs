//! Error types for the content and user stores

use thiserror::Error;

use crate::storage::StorageError;

/// Result type for store operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Store operation errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// An entity with this id already exists in the collection
    #[error("{entity} already exists: {id}")]
    DuplicateId { entity: &'static str, id: String },

    /// No entity with this id
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Sign-up with an email that is already registered
    #[error("Email already registered: {0}")]
    DuplicateEmail(String),

    /// A required field was empty
    #[error("Required field is empty: {0}")]
    EmptyField(&'static str),

    /// No session, or the session lacks the needed role
    #[error("Not authorized: {0}")]
    Unauthorized(&'static str),

    /// Balance too low for a paid action
    #[error("Not enough points: {needed} needed, {balance} available")]
    InsufficientPoints { needed: u32, balance: u32 },

    /// Storage backend error
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        StoreError::NotFound {
            entity,
            id: id.into(),
        }
    }

    pub fn duplicate(entity: &'static str, id: impl Into<String>) -> Self {
        StoreError::DuplicateId {
            entity,
            id: id.into(),
        }
    }
}
