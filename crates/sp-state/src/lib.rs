use serde::{Deserialize, Serialize};

mod category;
pub mod classify;
pub mod coherency;
mod event;
pub mod pagination;
mod timeline;

pub use category::TimelineCategory;
pub use coherency::{validate, CastMember, Coherency, MatchFacts};
pub use event::{Clock, Credit, Slots, TimelineEvent};
pub use pagination::PaginationError;
pub use timeline::{Timeline, TIME_ADD};

/// Everything known about one match once its frames have been assembled.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameRecord {
    pub match_id: String,
    pub timeline: Option<Timeline>,
    pub facts: MatchFacts,
}

impl GameRecord {
    pub fn new(match_id: impl Into<String>, timeline: Timeline, facts: MatchFacts) -> Self {
        Self {
            match_id: match_id.into(),
            timeline: Some(timeline),
            facts,
        }
    }

    /// Recomputed on every call.
    pub fn coherency(&self) -> Coherency {
        validate(self.timeline.as_ref(), &self.facts)
    }
}
