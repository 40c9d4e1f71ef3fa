use image::{DynamicImage, GrayImage, RgbaImage};
use sp_data::{Actor, Book, Character, Fingerprint, Role, TimerFormat, Vocabulary};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Vocabulary a feature is looked up in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureKind {
    Digit,
    Actor,
    EventText,
    Portrait,
}

impl FeatureKind {
    /// Folder name used when saving unrecognized features.
    pub fn as_str(self) -> &'static str {
        match self {
            FeatureKind::Digit => "digit",
            FeatureKind::Actor => "actor",
            FeatureKind::EventText => "event_text",
            FeatureKind::Portrait => "portrait",
        }
    }
}

impl fmt::Display for FeatureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A feature whose fingerprint is not in its table. Carries the pixels so
/// the table can be extended offline.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unrecognized {kind} feature {fingerprint}")]
pub struct RecognitionMiss {
    pub kind: FeatureKind,
    pub fingerprint: Fingerprint,
    pub image: DynamicImage,
}

impl RecognitionMiss {
    pub(crate) fn new(kind: FeatureKind, image: DynamicImage) -> Self {
        Self {
            kind,
            fingerprint: Fingerprint::of(image.as_bytes()),
            image,
        }
    }
}

fn lookup<T: Clone>(
    table: &HashMap<Fingerprint, T>,
    kind: FeatureKind,
    image: DynamicImage,
) -> Result<T, RecognitionMiss> {
    let fingerprint = Fingerprint::of(image.as_bytes());
    match table.get(&fingerprint) {
        Some(value) => Ok(value.clone()),
        None => Err(RecognitionMiss {
            kind,
            fingerprint,
            image,
        }),
    }
}

/// Exact-match lookups of isolated features against the shared vocabulary.
#[derive(Debug, Clone)]
pub struct Recognizer {
    vocabulary: Arc<Vocabulary>,
}

impl Recognizer {
    pub fn new(vocabulary: Arc<Vocabulary>) -> Self {
        Self { vocabulary }
    }

    pub fn actor(&self, icon: &RgbaImage) -> Result<Actor, RecognitionMiss> {
        lookup(
            &self.vocabulary.actors,
            FeatureKind::Actor,
            DynamicImage::ImageRgba8(icon.clone()),
        )
    }

    pub fn event_text(&self, text: &GrayImage) -> Result<String, RecognitionMiss> {
        lookup(
            &self.vocabulary.events,
            FeatureKind::EventText,
            DynamicImage::ImageLuma8(text.clone()),
        )
    }

    pub fn portrait(&self, interior: &RgbaImage) -> Result<Character, RecognitionMiss> {
        lookup(
            &self.vocabulary.portraits,
            FeatureKind::Portrait,
            DynamicImage::ImageRgba8(interior.clone()),
        )
    }

    pub fn digit(&self, glyph: &GrayImage) -> Result<char, RecognitionMiss> {
        lookup(
            &self.vocabulary.digits,
            FeatureKind::Digit,
            DynamicImage::ImageLuma8(glyph.clone()),
        )
    }

    /// An unknown probe glyph is reported as a digit miss.
    pub fn timer_format(&self, probe: &GrayImage) -> Result<TimerFormat, RecognitionMiss> {
        lookup(
            &self.vocabulary.timer_formats,
            FeatureKind::Digit,
            DynamicImage::ImageLuma8(probe.clone()),
        )
    }

    /// `None` is the unassigned role.
    pub fn role(&self, border: [u8; 3]) -> Option<Role> {
        self.vocabulary.roles.get(&border).copied()
    }

    pub fn book(&self, color: [u8; 3]) -> Option<Book> {
        self.vocabulary.books.get(&color).copied()
    }
}
