use sp_capture::{CaptureError, CapturedFrame};
use sp_state::pagination::resolve_pages;
use sp_state::{GameRecord, MatchFacts, PaginationError, Timeline, TimelineEvent};
use sp_vision::{FrameError, FrameReader};
use std::collections::HashMap;
use tracing::{debug, info, warn};

use crate::diagnostics::FailureCapture;
use crate::sink::MatchSink;

/// Why a match was discarded.
#[derive(Debug, thiserror::Error)]
pub enum MatchError {
    #[error(transparent)]
    Capture(#[from] CaptureError),
    #[error("match {match_id} page {page}: {source}")]
    Frame {
        match_id: String,
        page: usize,
        #[source]
        source: FrameError,
    },
    #[error("match {match_id}: {source}")]
    Pagination {
        match_id: String,
        #[source]
        source: PaginationError,
    },
}

/// How a batch went, one count per match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub committed: usize,
    pub incoherent: usize,
    pub failed: usize,
}

/// Frames of the match currently being read.
struct MatchBuffer {
    match_id: String,
    frames: Vec<Vec<TimelineEvent>>,
    error: Option<MatchError>,
}

impl MatchBuffer {
    fn new(match_id: String) -> Self {
        Self {
            match_id,
            frames: Vec::new(),
            error: None,
        }
    }

    fn discard(&mut self, error: MatchError) {
        self.frames.clear();
        self.error = Some(error);
    }
}

/// Drives frames through recognition, pagination and validation, one match
/// at a time. A failure only costs the match it happened in.
pub struct Pipeline<S> {
    reader: FrameReader,
    facts: HashMap<String, MatchFacts>,
    sink: S,
    failures: Option<FailureCapture>,
}

impl<S: MatchSink> Pipeline<S> {
    pub fn new(reader: FrameReader, facts: HashMap<String, MatchFacts>, sink: S) -> Self {
        Self {
            reader,
            facts,
            sink,
            failures: None,
        }
    }

    pub fn with_failure_capture(mut self, failures: FailureCapture) -> Self {
        self.failures = Some(failures);
        self
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Process frames grouped contiguously per match, in capture order.
    pub fn process_batch<I>(&mut self, frames: I) -> BatchSummary
    where
        I: IntoIterator<Item = Result<CapturedFrame, CaptureError>>,
    {
        let mut summary = BatchSummary::default();
        let mut current: Option<MatchBuffer> = None;

        for item in frames {
            let (match_id, is_last) = match &item {
                Ok(frame) => (frame.match_id.as_str(), frame.is_last),
                Err(err) => (err.match_id.as_str(), err.is_last),
            };

            if current.as_ref().is_some_and(|b| b.match_id != match_id) {
                if let Some(buffer) = current.take() {
                    debug!("Match {} ended without a last page", buffer.match_id);
                    self.finish(buffer, &mut summary);
                }
            }
            let buffer = current.get_or_insert_with(|| MatchBuffer::new(match_id.to_string()));

            if buffer.error.is_none() {
                match item {
                    Ok(frame) => self.read_page(buffer, &frame),
                    Err(err) => buffer.discard(err.into()),
                }
            }

            if is_last {
                if let Some(buffer) = current.take() {
                    self.finish(buffer, &mut summary);
                }
            }
        }
        if let Some(buffer) = current.take() {
            self.finish(buffer, &mut summary);
        }

        info!(
            "Batch done: {} committed, {} incoherent, {} failed",
            summary.committed, summary.incoherent, summary.failed
        );
        summary
    }

    fn read_page(&self, buffer: &mut MatchBuffer, frame: &CapturedFrame) {
        match self.reader.read_frame(&frame.frame) {
            Ok(events) => {
                debug!(
                    "Match {} page {}: {} line(s)",
                    frame.match_id,
                    frame.page_index,
                    events.len()
                );
                buffer.frames.push(events);
            }
            Err(source) => {
                if let Some(failures) = &self.failures {
                    match failures.save(&source.source) {
                        Ok(path) => info!("Saved unrecognized feature to {}", path.display()),
                        Err(e) => warn!("Failed to capture unrecognized feature: {:#}", e),
                    }
                }
                buffer.discard(MatchError::Frame {
                    match_id: frame.match_id.clone(),
                    page: frame.page_index,
                    source,
                });
            }
        }
    }

    fn finish(&mut self, buffer: MatchBuffer, summary: &mut BatchSummary) {
        let MatchBuffer {
            match_id,
            frames,
            error,
        } = buffer;

        let record = match error {
            Some(err) => Err(err),
            None => self.assemble(&match_id, frames),
        };
        let record = match record {
            Ok(record) => record,
            Err(err) => {
                warn!("Match discarded: {}", err);
                summary.failed += 1;
                return;
            }
        };

        let flags = record.coherency();
        if !flags.is_coherent() {
            warn!("Match {} is incoherent: {:?}", match_id, flags);
            summary.incoherent += 1;
            return;
        }

        match self.sink.commit(&record) {
            Ok(()) => {
                info!(
                    "Committed match {} ({} events)",
                    match_id,
                    record.timeline.as_ref().map_or(0, Timeline::len)
                );
                summary.committed += 1;
            }
            Err(e) => {
                warn!("Failed to commit match {}: {:#}", match_id, e);
                summary.failed += 1;
            }
        }
    }

    /// Build the record of one match from its per-page events.
    ///
    /// Elapsed times missing after pagination are derived from the known
    /// start clock, or the first line's clock when none is known.
    pub fn assemble(
        &self,
        match_id: &str,
        frames: Vec<Vec<TimelineEvent>>,
    ) -> Result<GameRecord, MatchError> {
        let page_size = self.reader.layout().line_count;
        let events = resolve_pages(frames, page_size).map_err(|source| MatchError::Pagination {
            match_id: match_id.to_string(),
            source,
        })?;

        let facts = self.facts.get(match_id).cloned().unwrap_or_default();
        let mut timeline = Timeline::new(events);
        if let Some(start) = facts.start_clock.or_else(|| timeline.get(0).and_then(|e| e.time)) {
            timeline.normalize_elapsed_times(start);
        }
        Ok(GameRecord::new(match_id, timeline, facts))
    }
}
