//! Engine configuration file parsing.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// On-disk configuration for a transcription engine.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Path to the combined filter/vocabulary resource blob.
    pub resources: PathBuf,

    /// Use the multilingual vocabulary table.
    #[serde(default)]
    pub multilingual: bool,

    /// Worker threads for spectrogram building; defaults to the machine's
    /// available parallelism when absent.
    #[serde(default)]
    pub workers: Option<usize>,

    /// Audio file to process when the caller does not name one.
    #[serde(default)]
    pub default_audio: Option<PathBuf>,
}

impl EngineConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(json).context("parse engine config")?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path_ref = path.as_ref();
        let json = std::fs::read_to_string(path_ref)
            .with_context(|| format!("read {}", path_ref.display()))?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            !self.resources.as_os_str().is_empty(),
            "resources path must not be empty"
        );
        if let Some(workers) = self.workers {
            anyhow::ensure!(workers > 0, "workers must be > 0");
        }
        Ok(())
    }

    /// Worker count to use, falling back to the machine's parallelism.
    #[must_use]
    pub fn effective_workers(&self) -> usize {
        self.workers
            .unwrap_or_else(|| std::thread::available_parallelism().map_or(1, |n| n.get()))
    }
}
