use anyhow::{Context, Result};
use sp_vision::RecognitionMiss;
use std::path::PathBuf;
use tracing::debug;

/// Saves unrecognized features as `<root>/<kind>/<fingerprint>.png` so the
/// vocabulary tables can be extended offline.
#[derive(Debug, Clone)]
pub struct FailureCapture {
    root: PathBuf,
}

impl FailureCapture {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Write the miss's pixels, unless the same feature was saved before.
    pub fn save(&self, miss: &RecognitionMiss) -> Result<PathBuf> {
        let dir = self.root.join(miss.kind.as_str());
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;

        let path = dir.join(format!("{}.png", miss.fingerprint));
        if path.exists() {
            debug!("{} already captured", path.display());
            return Ok(path);
        }
        miss.image
            .save(&path)
            .with_context(|| format!("Failed to save {}", path.display()))?;
        debug!("Captured unrecognized {} at {}", miss.kind, path.display());
        Ok(path)
    }
}
