//! Filesystem layout
//!
//! Everything lives under one config directory: `settings.json`, the
//! `storage/` blob directory and the default export target.

use anyhow::{Context, Result};
use once_cell::sync::OnceCell;
use std::path::{Path, PathBuf};
use std::sync::Arc;

static PATHS: OnceCell<Arc<Paths>> = OnceCell::new();

#[derive(Debug, Clone)]
pub struct Paths {
    config_dir: PathBuf,
}

impl Paths {
    /// Resolve the directory layout once per process
    pub fn init(config: Option<PathBuf>) -> Result<Arc<Paths>> {
        let paths = PATHS.get_or_try_init(|| Self::new(config).map(Arc::new))?;
        Ok(Arc::clone(paths))
    }

    /// `override_dir` wins over the platform config directory
    pub(crate) fn new(override_dir: Option<PathBuf>) -> Result<Self> {
        let config_dir = override_dir
            .or_else(|| {
                directories::ProjectDirs::from("", "", "labelsite")
                    .map(|dirs| dirs.config_dir().to_path_buf())
            })
            .unwrap_or_else(|| PathBuf::from(".labelsite"));

        let paths = Self { config_dir };
        for dir in [paths.config_dir.clone(), paths.storage_dir()] {
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
        }
        Ok(paths)
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn settings_path(&self) -> PathBuf {
        self.config_dir.join("settings.json")
    }

    /// Directory holding the durable key-value blobs
    pub fn storage_dir(&self) -> PathBuf {
        self.config_dir.join("storage")
    }

    /// Default target for `--export`
    pub fn export_path(&self) -> PathBuf {
        self.config_dir.join("content-export.json")
    }
}
