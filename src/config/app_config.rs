//! Application configuration
//!
//! This module handles settings stored in settings.json.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::Paths;

/// Generative-AI service settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenAiConfig {
    #[serde(default = "default_genai_base_url")]
    pub base_url: String,

    /// Empty disables the studio
    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_text_model")]
    pub text_model: String,

    #[serde(default = "default_image_model")]
    pub image_model: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Extra attempts after a timeout or 5xx
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

impl Default for GenAiConfig {
    fn default() -> Self {
        Self {
            base_url: default_genai_base_url(),
            api_key: String::new(),
            text_model: default_text_model(),
            image_model: default_image_model(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
        }
    }
}

/// Application configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    /// Byte limit for durable storage; `None` is unlimited
    #[serde(default = "default_storage_quota")]
    pub storage_quota_bytes: Option<usize>,

    /// Passcode for the admin console. Empty disables admin sign-in.
    #[serde(default)]
    pub admin_passcode: String,

    /// Origins allowed by CORS. Empty allows any.
    #[serde(default)]
    pub allowed_origins: Vec<String>,

    #[serde(default)]
    pub gen_ai: GenAiConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage_quota_bytes: default_storage_quota(),
            admin_passcode: String::new(),
            allowed_origins: Vec::new(),
            gen_ai: GenAiConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from file, writing defaults if none exists
    pub fn load(paths: &Paths) -> Result<Self> {
        let settings_path = paths.settings_path();

        if settings_path.exists() {
            let content =
                std::fs::read_to_string(&settings_path).context("Failed to read settings file")?;
            let config: AppConfig =
                serde_json::from_str(&content).context("Failed to parse settings file")?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save(paths)?;
            Ok(config)
        }
    }

    /// Save configuration to file
    pub fn save(&self, paths: &Paths) -> Result<()> {
        let content = serde_json::to_string_pretty(self).context("Failed to serialize settings")?;
        std::fs::write(paths.settings_path(), content).context("Failed to write settings file")?;
        Ok(())
    }

    /// Apply `LABELSITE_GENAI_API_KEY` and `LABELSITE_ADMIN_PASSCODE` if set
    pub fn apply_env(&mut self) {
        if let Ok(key) = std::env::var("LABELSITE_GENAI_API_KEY") {
            self.gen_ai.api_key = key;
        }
        if let Ok(passcode) = std::env::var("LABELSITE_ADMIN_PASSCODE") {
            self.admin_passcode = passcode;
        }
    }
}

// Default value functions for serde

fn default_storage_quota() -> Option<usize> {
    // same order of magnitude as browser local storage
    Some(5 * 1024 * 1024)
}

fn default_genai_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_text_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_image_model() -> String {
    "imagen-3.0-generate-002".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_max_retries() -> u32 {
    2
}
