//! Reconciles the per-frame line lists of one match.
//!
//! The capture driver shoots every page twice: first with the remaining-time
//! clock, then with the elapsed-time clock. The final page is usually shot
//! again with the log scrolled to its end, so its head repeats the tail of
//! the page before it.

use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use tracing::debug;

use crate::TimelineEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MismatchField {
    EventText,
    Actor,
    CastName,
    LineCount,
}

impl fmt::Display for MismatchField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MismatchField::EventText => "event text",
            MismatchField::Actor => "actor",
            MismatchField::CastName => "cast",
            MismatchField::LineCount => "line count",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PaginationError {
    #[error("cannot pair {frames} frame(s) into remaining/elapsed views")]
    Parity { frames: usize },
    #[error("page {page} line {line}: remaining and elapsed views disagree on {field}")]
    Mismatch {
        page: usize,
        line: usize,
        field: MismatchField,
    },
}

/// Pair each remaining-time frame with the elapsed-time frame after it and
/// copy the elapsed readings across. Returns the remaining-time frames.
pub fn merge_elapsed_screenshots(
    frames: Vec<Vec<TimelineEvent>>,
) -> Result<Vec<Vec<TimelineEvent>>, PaginationError> {
    if frames.len() % 2 != 0 {
        return Err(PaginationError::Parity {
            frames: frames.len(),
        });
    }

    let mut merged = Vec::with_capacity(frames.len() / 2);
    let mut it = frames.into_iter();
    let mut page = 0;
    while let (Some(mut remaining), Some(elapsed)) = (it.next(), it.next()) {
        for (line, (r, e)) in remaining.iter_mut().zip(&elapsed).enumerate() {
            let (Some(_), Some(value)) = (r.time, e.elapsed_time()) else {
                continue;
            };
            let field = if r.event_text != e.event_text {
                Some(MismatchField::EventText)
            } else if r.actor != e.actor {
                Some(MismatchField::Actor)
            } else if r.cast_name() != e.cast_name() {
                Some(MismatchField::CastName)
            } else {
                None
            };
            if let Some(field) = field {
                return Err(PaginationError::Mismatch { page, line, field });
            }
            r.annotate_elapsed(value);
        }

        if remaining.len() != elapsed.len() {
            return Err(PaginationError::Mismatch {
                page,
                line: remaining.len().min(elapsed.len()),
                field: MismatchField::LineCount,
            });
        }

        merged.push(remaining);
        page += 1;
    }

    Ok(merged)
}

fn content_hash(event: &TimelineEvent) -> u64 {
    let mut h = DefaultHasher::new();
    event.hash(&mut h);
    h.finish()
}

/// Number of lines at the head of the last page that repeat the tail of the
/// page before it.
///
/// Only runs on more than one page of lines that divides into whole pages;
/// anything else returns 0. A real event repeated exactly across the page
/// boundary looks the same as capture overlap and is counted too.
pub fn find_overlap_last_page_index(events: &[TimelineEvent], page_size: usize) -> usize {
    let total = events.len();
    if page_size == 0 || total <= page_size || total % page_size != 0 {
        return 0;
    }

    let hashes: Vec<u64> = events[total - 2 * page_size..]
        .iter()
        .map(content_hash)
        .collect();
    let (previous, last) = hashes.split_at(page_size);

    (1..=page_size)
        .rev()
        .find(|&n| previous[page_size - n..] == last[..n])
        .unwrap_or(0)
}

/// Drop the repeated head of the last page.
pub fn remove_overlap(mut events: Vec<TimelineEvent>, page_size: usize) -> Vec<TimelineEvent> {
    let overlap = find_overlap_last_page_index(&events, page_size);
    if overlap > 0 {
        let start = events.len() - page_size;
        debug!("Dropping {} overlapping line(s) from the last page", overlap);
        events.drain(start..start + overlap);
    }
    events
}

/// Merge the view pairs, flatten the pages and trim capture overlap.
pub fn resolve_pages(
    frames: Vec<Vec<TimelineEvent>>,
    page_size: usize,
) -> Result<Vec<TimelineEvent>, PaginationError> {
    let pages = merge_elapsed_screenshots(frames)?;
    let events = pages.into_iter().flatten().collect();
    Ok(remove_overlap(events, page_size))
}
