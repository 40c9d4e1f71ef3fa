use anyhow::{Context, Result};
use sp_state::MatchFacts;
use std::collections::HashMap;
use std::path::Path;
use tracing::{info, warn};

/// Load the match id to facts map. A missing file means nothing is known
/// about any match, so only self-consistency checks run.
pub fn load_facts(path: &Path) -> Result<HashMap<String, MatchFacts>> {
    if !path.exists() {
        warn!("No match facts at {}", path.display());
        return Ok(HashMap::new());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let facts: HashMap<String, MatchFacts> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    info!("Loaded facts for {} match(es)", facts.len());
    Ok(facts)
}
