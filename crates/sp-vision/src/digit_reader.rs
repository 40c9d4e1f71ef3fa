use image::{DynamicImage, RgbaImage};
use sp_capture::PixelRect;
use sp_data::TimerFormat;
use sp_state::Clock;
use tracing::trace;

use crate::extract::{binarize, crop_ink, has_ink};
use crate::recognizer::{FeatureKind, RecognitionMiss, Recognizer};
use crate::LayoutConfig;

/// A timer column read in one of its two formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerReading {
    /// Time left on the match clock.
    Remaining(Clock),
    /// Time since the match started.
    Elapsed(Clock),
}

/// Reads the timer column of a line glyph by glyph.
pub struct DigitReader<'a> {
    layout: &'a LayoutConfig,
    recognizer: &'a Recognizer,
}

impl<'a> DigitReader<'a> {
    pub fn new(layout: &'a LayoutConfig, recognizer: &'a Recognizer) -> Self {
        Self { layout, recognizer }
    }

    /// Read a timer crop. An empty column means the line has no usable time.
    pub fn read_timer(&self, timer: &RgbaImage) -> Result<Option<TimerReading>, RecognitionMiss> {
        let ink = binarize(timer, self.layout.threshold);
        if !has_ink(&ink) {
            return Ok(None);
        }

        let probe = crop_ink(&ink, &self.layout.timer_probe);
        let format = self.recognizer.timer_format(&probe)?;
        let slots = match format {
            TimerFormat::Remaining => &self.layout.remaining_slots,
            TimerFormat::Elapsed => &self.layout.elapsed_slots,
        };

        let mut glyphs = String::with_capacity(slots.len());
        for &x in slots {
            let glyph = crop_ink(
                &ink,
                &PixelRect::new(x, 0, self.layout.digit_width, ink.height()),
            );
            if has_ink(&glyph) {
                glyphs.push(self.recognizer.digit(&glyph)?);
            } else {
                glyphs.push(' ');
            }
        }

        let clock = Clock::parse(&glyphs).ok_or_else(|| {
            RecognitionMiss::new(FeatureKind::Digit, DynamicImage::ImageRgba8(timer.clone()))
        })?;
        trace!("Timer '{}' read as {:?} {}", glyphs, format, clock);

        Ok(Some(match format {
            TimerFormat::Remaining => TimerReading::Remaining(clock),
            TimerFormat::Elapsed => TimerReading::Elapsed(clock),
        }))
    }
}
