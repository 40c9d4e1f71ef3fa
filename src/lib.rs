pub mod config;
pub mod diagnostics;
pub mod facts;
pub mod pipeline;
pub mod sink;

use anyhow::Result;
use sp_capture::replay::ScreenshotDir;
use sp_data::Vocabulary;
use sp_vision::FrameReader;
use std::path::Path;
use std::sync::Arc;

pub use config::Config;
pub use diagnostics::FailureCapture;
pub use facts::load_facts;
pub use pipeline::{BatchSummary, MatchError, Pipeline};
pub use sink::{JsonDirSink, MatchSink};

/// Process every match under the configured frames directory.
pub fn process(config: &Config) -> Result<BatchSummary> {
    let vocabulary = Arc::new(Vocabulary::load(&config.data_dir)?);
    let facts = load_facts(&config.facts_file)?;
    let sink = JsonDirSink::new(&config.output_dir)?;
    let frames = ScreenshotDir::open(&config.frames_dir)?;

    let reader = FrameReader::new(config.layout(), vocabulary);
    let mut pipeline = Pipeline::new(reader, facts, sink)
        .with_failure_capture(FailureCapture::new(&config.failure_dir));
    Ok(pipeline.process_batch(frames))
}

pub fn run() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sp_timeline=info,sp_vision=info,sp_state=info".into()),
        )
        .init();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "sp-timeline.json".to_string());
    let config = Config::load(Path::new(&config_path))?;
    process(&config)?;
    Ok(())
}
