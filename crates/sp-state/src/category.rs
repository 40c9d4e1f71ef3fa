use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Semantic tags of a timeline line. A line may carry several at once.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
    pub struct TimelineCategory: u32 {
        const ACTION_TEST = 1 << 0;
        const ACTION_TRIGGERED = 1 << 1;
        const BANANA_BREAD = 1 << 2;
        const BOOKS = 1 << 3;
        const BRIEFCASE = 1 << 4;
        const CAST = 1 << 5;
        const CONVERSATION = 1 << 6;
        const DRINKS = 1 << 7;
        const GAME_START = 1 << 8;
        const GAME_END = 1 << 9;
        const MISSION_COMPLETE = 1 << 10;
        const MISSION_COUNTDOWN = 1 << 11;
        const MISSION_ENABLED = 1 << 12;
        const MISSION_PARTIAL = 1 << 13;
        const MISSION_SELECTED = 1 << 14;
        const OVERTIME = 1 << 15;
        const SNIPER_LIGHTS = 1 << 16;
        const SNIPER_SHOT = 1 << 17;
        const STATUES = 1 << 18;
        const TIME_ADD = 1 << 19;
        const WATCH = 1 << 20;
    }
}
