use anyhow::{Context, Result};
use sp_state::GameRecord;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Receives every coherent match of a batch.
pub trait MatchSink {
    fn commit(&mut self, record: &GameRecord) -> Result<()>;
}

/// Collects records in memory.
impl MatchSink for Vec<GameRecord> {
    fn commit(&mut self, record: &GameRecord) -> Result<()> {
        self.push(record.clone());
        Ok(())
    }
}

/// Writes each match as pretty JSON to `<dir>/<match id>.json`.
#[derive(Debug, Clone)]
pub struct JsonDirSink {
    dir: PathBuf,
}

impl JsonDirSink {
    pub fn new(dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    pub fn path_for(&self, match_id: &str) -> PathBuf {
        self.dir.join(format!("{}.json", match_id))
    }
}

impl MatchSink for JsonDirSink {
    fn commit(&mut self, record: &GameRecord) -> Result<()> {
        let path = self.path_for(&record.match_id);
        let json = serde_json::to_string_pretty(record)
            .with_context(|| format!("Failed to serialize match {}", record.match_id))?;
        std::fs::write(&path, json)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        debug!("Wrote {}", path.display());
        Ok(())
    }
}
