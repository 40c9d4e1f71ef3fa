use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sp_vision::LayoutConfig;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Where a batch reads its inputs and writes its artifacts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Vocabulary tables.
    pub data_dir: PathBuf,
    /// One sub-directory of PNG pages per match.
    pub frames_dir: PathBuf,
    /// JSON projection of committed matches.
    pub output_dir: PathBuf,
    /// Unrecognized features, by kind.
    pub failure_dir: PathBuf,
    /// Match id to known match facts.
    pub facts_file: PathBuf,
    /// Overrides the reference capture layout.
    pub layout: Option<LayoutConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            frames_dir: PathBuf::from("frames"),
            output_dir: PathBuf::from("output"),
            failure_dir: PathBuf::from("failures"),
            facts_file: PathBuf::from("facts.json"),
            layout: None,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            warn!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn layout(&self) -> LayoutConfig {
        self.layout.clone().unwrap_or_default()
    }
}
