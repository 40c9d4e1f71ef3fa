use serde::{Deserialize, Serialize};
use sp_data::Actor;
use std::ops::Index;

use crate::{Clock, TimelineCategory, TimelineEvent};

/// Seconds put back on the clock by one "45 seconds added to match." line.
pub const TIME_ADD: Clock = Clock::from_tenths(450);

/// The ordered lines of one match, earliest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timeline {
    events: Vec<TimelineEvent>,
}

impl Timeline {
    pub fn new(events: Vec<TimelineEvent>) -> Self {
        Self { events }
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&TimelineEvent> {
        self.events.get(index)
    }

    pub fn events(&self) -> &[TimelineEvent] {
        &self.events
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TimelineEvent> {
        self.events.iter()
    }

    /// Index of the first line equal to `event`.
    pub fn position(&self, event: &TimelineEvent) -> Option<usize> {
        self.events.iter().position(|e| e == event)
    }

    /// First line after `after` authored by `actor`.
    pub fn next_event_with_actor(
        &self,
        after: &TimelineEvent,
        actor: Actor,
    ) -> Option<&TimelineEvent> {
        let start = self.position(after)? + 1;
        self.events[start..].iter().find(|e| e.actor == actor)
    }

    /// Fill in elapsed-from-start for every line that has a clock reading but
    /// no elapsed value yet.
    ///
    /// `elapsed = start - (time - 45s * k)`, where `k` counts the time-add
    /// lines seen so far, the current line included.
    pub fn normalize_elapsed_times(&mut self, start: Clock) {
        let mut time_adds = 0;
        for event in &mut self.events {
            if event.category.contains(TimelineCategory::TIME_ADD) {
                time_adds += 1;
            }
            if let Some(time) = event.time {
                let added = Clock::from_tenths(TIME_ADD.tenths() * time_adds);
                event.annotate_elapsed(start - (time - added));
            }
        }
    }
}

impl Index<usize> for Timeline {
    type Output = TimelineEvent;

    fn index(&self, index: usize) -> &TimelineEvent {
        &self.events[index]
    }
}

impl<'a> IntoIterator for &'a Timeline {
    type Item = &'a TimelineEvent;
    type IntoIter = std::slice::Iter<'a, TimelineEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}
