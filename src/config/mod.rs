//! Configuration module
//!
//! This module contains the application configuration structures and path management.

mod app_config;
mod paths;

pub use app_config::{AppConfig, GenAiConfig};
pub use paths::Paths;
