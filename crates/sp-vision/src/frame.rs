use image::RgbaImage;
use sp_data::Vocabulary;
use sp_state::TimelineEvent;
use std::sync::Arc;
use tracing::debug;

use crate::extract::extract;
use crate::line::read_line;
use crate::recognizer::{RecognitionMiss, Recognizer};
use crate::LayoutConfig;

/// A strip of a frame could not be recognized.
#[derive(Debug, thiserror::Error)]
#[error("line {line}: {source}")]
pub struct FrameError {
    pub line: usize,
    #[source]
    pub source: RecognitionMiss,
}

/// Turns whole frames into their ordered, non-blank events.
#[derive(Debug, Clone)]
pub struct FrameReader {
    layout: LayoutConfig,
    recognizer: Recognizer,
}

impl FrameReader {
    pub fn new(layout: LayoutConfig, vocabulary: Arc<Vocabulary>) -> Self {
        Self {
            layout,
            recognizer: Recognizer::new(vocabulary),
        }
    }

    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Events of every non-blank strip, top to bottom. Stops at the first
    /// strip that fails recognition.
    pub fn read_frame(&self, frame: &RgbaImage) -> Result<Vec<TimelineEvent>, FrameError> {
        let mut events = Vec::new();
        for (line, strip) in extract(frame, &self.layout).into_iter().enumerate() {
            match read_line(strip, &self.layout, &self.recognizer) {
                Ok(Some(event)) => events.push(event),
                Ok(None) => {}
                Err(source) => return Err(FrameError { line, source }),
            }
        }
        debug!("Read {} line(s) from frame", events.len());
        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recognizer::FeatureKind;
    use crate::testing::Painter;
    use sp_data::Actor;
    use sp_state::Clock;

    #[test]
    fn test_blank_strips_dropped() {
        let layout = LayoutConfig::default();
        let mut painter = Painter::new(layout.clone());
        painter.line(0, Actor::Game, Some("3:30.0"), "game started.");
        painter.line(1, Actor::Spy, Some("3:28.4"), "spy enters conversation.");
        painter.line(5, Actor::Sniper, Some("3:20.0"), "sniper shot spy.");
        let (frame, vocabulary) = painter.finish();

        let reader = FrameReader::new(layout, Arc::new(vocabulary));
        let events = reader.read_frame(&frame).unwrap();
        let texts: Vec<_> = events.iter().map(|e| e.event_text.as_str()).collect();
        assert_eq!(
            texts,
            ["game started.", "spy enters conversation.", "sniper shot spy."]
        );
        assert_eq!(events[2].time, Some(Clock::from_tenths(2000)));
    }

    #[test]
    fn test_empty_frame() {
        let layout = LayoutConfig::default();
        let (frame, vocabulary) = Painter::new(layout.clone()).finish();
        let reader = FrameReader::new(layout, Arc::new(vocabulary));
        assert!(reader.read_frame(&frame).unwrap().is_empty());
    }

    #[test]
    fn test_error_names_line() {
        let layout = LayoutConfig::default();
        let mut painter = Painter::new(layout.clone());
        painter.line(0, Actor::Game, Some("3:30.0"), "game started.");
        painter.line(3, Actor::Spy, Some("3:10.0"), "sipped drink.");
        painter.forget_event("sipped drink.");
        let (frame, vocabulary) = painter.finish();

        let reader = FrameReader::new(layout, Arc::new(vocabulary));
        let err = reader.read_frame(&frame).unwrap_err();
        assert_eq!(err.line, 3);
        assert_eq!(err.source.kind, FeatureKind::EventText);
    }
}
