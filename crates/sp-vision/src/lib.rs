mod digit_reader;
mod extract;
mod frame;
mod layout;
mod line;
mod portrait_matcher;
mod recognizer;

#[cfg(test)]
mod testing;

pub use digit_reader::{DigitReader, TimerReading};
pub use extract::{binarize, extract, extract_line, LineFeatures};
pub use frame::{FrameError, FrameReader};
pub use layout::{BandConfig, LayoutConfig, Span};
pub use line::read_line;
pub use portrait_matcher::PortraitCrop;
pub use recognizer::{FeatureKind, RecognitionMiss, Recognizer};
