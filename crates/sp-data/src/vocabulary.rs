use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::{Actor, Book, Character, Fingerprint, Role};

/// Which of the two clock layouts a timer region is drawn in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerFormat {
    /// Time left on the match clock, "M:SS.D".
    Remaining,
    /// Time since the match started, "SSS.D".
    Elapsed,
}

/// Entry of `roles.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleColor {
    pub color: [u8; 3],
    pub role: Role,
}

/// Entry of `books.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookColor {
    pub color: [u8; 3],
    pub book: Book,
}

/// Read-only fingerprint and color tables for every recognizable feature.
///
/// Loaded once at startup and shared by reference between matches.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    pub digits: HashMap<Fingerprint, char>,
    pub actors: HashMap<Fingerprint, Actor>,
    pub events: HashMap<Fingerprint, String>,
    pub portraits: HashMap<Fingerprint, Character>,
    pub timer_formats: HashMap<Fingerprint, TimerFormat>,
    pub roles: HashMap<[u8; 3], Role>,
    pub books: HashMap<[u8; 3], Book>,
}

impl Vocabulary {
    /// Load every table from the data directory.
    ///
    /// Expects `digits.json`, `actors.json`, `events.json`, `portraits.json`,
    /// `timer_formats.json`, `roles.json` and `books.json`. A missing file
    /// leaves its table empty, so lookups against it fail closed.
    pub fn load(data_dir: &Path) -> Result<Self> {
        let digits: HashMap<Fingerprint, String> = load_table(data_dir, "digits.json")?;
        let digits = digits
            .into_iter()
            .map(|(fp, glyph)| {
                let mut chars = glyph.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Ok((fp, c)),
                    _ => anyhow::bail!("digits.json: glyph for {} must be one character, got {:?}", fp, glyph),
                }
            })
            .collect::<Result<HashMap<_, _>>>()?;

        let roles: Vec<RoleColor> = load_table(data_dir, "roles.json")?;
        let books: Vec<BookColor> = load_table(data_dir, "books.json")?;

        let vocab = Self {
            digits,
            actors: load_table(data_dir, "actors.json")?,
            events: load_table(data_dir, "events.json")?,
            portraits: load_table(data_dir, "portraits.json")?,
            timer_formats: load_table(data_dir, "timer_formats.json")?,
            roles: roles.into_iter().map(|r| (r.color, r.role)).collect(),
            books: books.into_iter().map(|b| (b.color, b.book)).collect(),
        };

        tracing::info!(
            "Loaded vocabulary: {} digits, {} actors, {} event texts, {} portraits, {} timer formats, {} roles, {} books",
            vocab.digits.len(),
            vocab.actors.len(),
            vocab.events.len(),
            vocab.portraits.len(),
            vocab.timer_formats.len(),
            vocab.roles.len(),
            vocab.books.len(),
        );

        Ok(vocab)
    }
}

fn load_table<T: DeserializeOwned + Default>(data_dir: &Path, name: &str) -> Result<T> {
    let path = data_dir.join(name);
    if !path.exists() {
        tracing::warn!("No {} found at {}", name, path.display());
        return Ok(T::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}
