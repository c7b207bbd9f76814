//! Synchronous key-value storage backends
//!
//! The stores persist through [`KeyValueStorage`]. A backend may be
//! capacity-limited and fail a write with [`StorageError::QuotaExceeded`].

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use thiserror::Error;

/// Storage key for the persisted content blob
pub const CONTENT_STORAGE_KEY: &str = "label.content.v3";
/// Storage key for the user roster (users without their projects)
pub const USERS_STORAGE_KEY: &str = "label.users.v1";
/// Storage key for the email -> projects map
pub const PROJECTS_STORAGE_KEY: &str = "label.projects.v1";
/// Session-scoped key for the token -> session map
pub const SESSION_STORAGE_KEY: &str = "label.session";

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// Write would exceed the backend's capacity
    #[error("Storage quota exceeded: {needed} bytes needed, {limit} allowed")]
    QuotaExceeded { needed: usize, limit: usize },

    /// Storage is disabled or not reachable
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Durable or session-scoped string storage keyed by string
pub trait KeyValueStorage: Send + Sync {
    /// Read a value. Missing keys are `Ok(None)`.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a value, replacing any previous one
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove a value. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}
