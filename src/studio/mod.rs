//! Studio - generative-AI orchestration for fan creations
//!
//! The stores only ever see the final results of these calls, stored
//! verbatim in a `StudioSubmission` or `UserProject`.

mod client;
#[cfg(test)]
pub(crate) mod fake;
mod pipeline;
mod router;

pub use client::{generate_json, GenAiClient, GenerativeModel};
pub use pipeline::{StudioDraft, StudioPipeline};
pub use router::{pick_persona, route_agent, Persona};

use thiserror::Error;

/// Result type for studio operations
pub type Result<T> = std::result::Result<T, StudioError>;

/// Studio errors. Each one means a single stage did not complete.
#[derive(Debug, Error)]
pub enum StudioError {
    /// Studio has no API key configured
    #[error("Generative AI is not configured")]
    NotConfigured,

    /// Transport error
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Request timed out on every attempt
    #[error("Request timed out after {attempts} attempt(s)")]
    Timeout { attempts: u32 },

    /// Service answered with an error status
    #[error("Service returned {status}: {body}")]
    Status { status: u16, body: String },

    /// Service answered without usable content
    #[error("Empty response from service")]
    EmptyResponse,

    /// Structured output did not match the requested shape
    #[error("Malformed JSON in response: {0}")]
    MalformedJson(#[from] serde_json::Error),

    /// Stage cannot run or produced an unusable result
    #[error("Invalid studio stage: {0}")]
    InvalidStage(String),
}
