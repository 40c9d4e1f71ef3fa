use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use sp_data::{Character, Mission, Role};
use std::collections::BTreeSet;

use crate::timeline::TIME_ADD;
use crate::{Clock, Timeline, TimelineCategory, TimelineEvent};

bitflags! {
    /// Problems found when checking a timeline. Empty means coherent.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct Coherency: u32 {
        const NO_TIMELINE = 1 << 0;
        const CHARACTER_WITHOUT_ROLE = 1 << 1;
        const ROLE_WITHOUT_CHARACTER = 1 << 2;
        const NO_GAME_START = 1 << 3;
        const MULTIPLE_GAME_STARTS = 1 << 4;
        const NO_GAME_END = 1 << 5;
        const GUEST_COUNT_MISMATCH = 1 << 6;
        const CAST_MISMATCH = 1 << 7;
        const START_CLOCK_MISMATCH = 1 << 8;
        const TIME_REWIND = 1 << 9;
        const MISSING_BOOK_COLOR = 1 << 10;
        const SELECTED_MISSIONS_MISMATCH = 1 << 11;
        const PICKED_MISSIONS_MISMATCH = 1 << 12;
        const COMPLETED_MISSIONS_MISMATCH = 1 << 13;
        const MISSING_ELAPSED_TIME = 1 << 14;
    }
}

impl Coherency {
    pub fn is_coherent(self) -> bool {
        self.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CastMember {
    pub character: Character,
    pub role: Role,
}

/// Facts about a match known independently of its timeline.
///
/// Checks against a fact that is not known are skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchFacts {
    pub selected_missions: Option<BTreeSet<Mission>>,
    pub picked_missions: Option<BTreeSet<Mission>>,
    pub completed_missions: Option<BTreeSet<Mission>>,
    /// Number of cast credits announced at the start of the match.
    pub guest_count: Option<usize>,
    pub start_clock: Option<Clock>,
    pub cast: Option<Vec<CastMember>>,
}

fn missions_tagged(events: &[TimelineEvent], category: TimelineCategory) -> BTreeSet<Mission> {
    events
        .iter()
        .filter(|e| e.category.contains(category))
        .map(|e| e.mission)
        .filter(|m| *m != Mission::None)
        .collect()
}

fn check_missions(
    flags: &mut Coherency,
    events: &[TimelineEvent],
    category: TimelineCategory,
    expected: &Option<BTreeSet<Mission>>,
    flag: Coherency,
) {
    if let Some(expected) = expected {
        if missions_tagged(events, category) != *expected {
            *flags |= flag;
        }
    }
}

/// Check a timeline against itself and against the known match facts.
///
/// Every check runs; the result carries one flag per failed check.
pub fn validate(timeline: Option<&Timeline>, facts: &MatchFacts) -> Coherency {
    let events = timeline.map(Timeline::events).unwrap_or_default();
    let mut flags = Coherency::empty();

    if events.is_empty() {
        flags |= Coherency::NO_TIMELINE;
    }

    for credit in events.iter().flat_map(|e| e.cast.iter()) {
        match (credit.character, credit.role) {
            (Some(_), None) => flags |= Coherency::CHARACTER_WITHOUT_ROLE,
            (None, Some(_)) => flags |= Coherency::ROLE_WITHOUT_CHARACTER,
            _ => {}
        }
    }

    let starts = events
        .iter()
        .filter(|e| e.category.contains(TimelineCategory::GAME_START))
        .count();
    match starts {
        0 => flags |= Coherency::NO_GAME_START,
        1 => {}
        _ => flags |= Coherency::MULTIPLE_GAME_STARTS,
    }

    if !events
        .iter()
        .any(|e| e.category.contains(TimelineCategory::GAME_END))
    {
        flags |= Coherency::NO_GAME_END;
    }

    let cast_credits: Vec<_> = events
        .iter()
        .filter(|e| e.category.contains(TimelineCategory::CAST))
        .flat_map(|e| e.cast.iter().copied())
        .collect();

    if let Some(expected) = facts.guest_count {
        if cast_credits.len() != expected {
            flags |= Coherency::GUEST_COUNT_MISMATCH;
        }
    }

    if let Some(expected) = &facts.cast {
        let credited: BTreeSet<(Option<Character>, Option<Role>)> = cast_credits
            .iter()
            .map(|c| (c.character, c.role))
            .collect();
        let expected: BTreeSet<(Option<Character>, Option<Role>)> = expected
            .iter()
            .map(|m| (Some(m.character), Some(m.role)))
            .collect();
        if credited != expected {
            flags |= Coherency::CAST_MISMATCH;
        }
    }

    if let Some(start) = facts.start_clock {
        if events.first().and_then(|e| e.time) != Some(start) {
            flags |= Coherency::START_CLOCK_MISMATCH;
        }
    }

    // Remaining time only goes up through time-add lines; strip those out
    // and the clock must never run backwards.
    let mut time_adds = 0;
    let mut previous: Option<Clock> = None;
    for event in events {
        if event.category.contains(TimelineCategory::TIME_ADD) {
            time_adds += 1;
        }
        if let Some(time) = event.time {
            let adjusted = time - Clock::from_tenths(TIME_ADD.tenths() * time_adds);
            if previous.is_some_and(|p| adjusted > p) {
                flags |= Coherency::TIME_REWIND;
            }
            previous = Some(adjusted);
        }
    }

    if events.iter().any(|e| e.books.iter().any(Option::is_none)) {
        flags |= Coherency::MISSING_BOOK_COLOR;
    }

    check_missions(
        &mut flags,
        events,
        TimelineCategory::MISSION_SELECTED,
        &facts.selected_missions,
        Coherency::SELECTED_MISSIONS_MISMATCH,
    );
    check_missions(
        &mut flags,
        events,
        TimelineCategory::MISSION_ENABLED,
        &facts.picked_missions,
        Coherency::PICKED_MISSIONS_MISMATCH,
    );
    check_missions(
        &mut flags,
        events,
        TimelineCategory::MISSION_COMPLETE,
        &facts.completed_missions,
        Coherency::COMPLETED_MISSIONS_MISMATCH,
    );

    if events.iter().any(|e| e.elapsed_time().is_none()) {
        flags |= Coherency::MISSING_ELAPSED_TIME;
    }

    flags
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Credit, Slots};
    use sp_data::{Actor, Book};

    const START: i32 = 2100;

    fn line(actor: Actor, text: &str, tenths: i32) -> TimelineEvent {
        TimelineEvent::new(
            actor,
            Some(Clock::from_tenths(tenths)),
            text,
            Slots::Zero,
            Slots::Zero,
        )
    }

    fn cast_line(text: &str, character: Character, role: Role) -> TimelineEvent {
        TimelineEvent::new(
            Actor::Game,
            Some(Clock::from_tenths(START)),
            text,
            Slots::One(Credit {
                character: Some(character),
                role: Some(role),
            }),
            Slots::Zero,
        )
    }

    fn fixture_events() -> Vec<TimelineEvent> {
        vec![
            cast_line("spy cast.", Character::Boots, Role::Spy),
            cast_line("ambassador cast.", Character::Taft, Role::Ambassador),
            cast_line("civilian cast.", Character::Teal, Role::Civilian),
            line(Actor::Game, "bug ambassador selected.", START),
            line(Actor::Game, "seduce target selected.", START),
            line(Actor::Game, "bug ambassador enabled.", START),
            line(Actor::Game, "game started.", START),
            line(Actor::Spy, "spy enters conversation.", 2000),
            line(Actor::Spy, "bugged ambassador while walking.", 1800),
            TimelineEvent::new(
                Actor::Spy,
                Some(Clock::from_tenths(1700)),
                "get book from bookcase.",
                Slots::Zero,
                Slots::One(Some(Book::Green)),
            ),
            line(Actor::Game, "45 seconds added to match.", 2100),
            line(Actor::Sniper, "sniper shot spy.", 1900),
        ]
    }

    fn fixture_facts() -> MatchFacts {
        MatchFacts {
            selected_missions: Some([Mission::Bug, Mission::Seduce].into()),
            picked_missions: Some([Mission::Bug].into()),
            completed_missions: Some([Mission::Bug].into()),
            guest_count: Some(3),
            start_clock: Some(Clock::from_tenths(START)),
            cast: Some(vec![
                CastMember {
                    character: Character::Teal,
                    role: Role::Civilian,
                },
                CastMember {
                    character: Character::Boots,
                    role: Role::Spy,
                },
                CastMember {
                    character: Character::Taft,
                    role: Role::Ambassador,
                },
            ]),
        }
    }

    fn normalized(events: Vec<TimelineEvent>) -> Timeline {
        let mut timeline = Timeline::new(events);
        timeline.normalize_elapsed_times(Clock::from_tenths(START));
        timeline
    }

    #[test]
    fn test_fixture_is_coherent() {
        let timeline = normalized(fixture_events());
        assert_eq!(validate(Some(&timeline), &fixture_facts()), Coherency::empty());
    }

    #[test]
    fn test_missing_game_start() {
        let events = fixture_events()
            .into_iter()
            .filter(|e| e.event_text != "game started.")
            .collect();
        let timeline = normalized(events);
        assert_eq!(
            validate(Some(&timeline), &fixture_facts()),
            Coherency::NO_GAME_START
        );
    }

    #[test]
    fn test_no_timeline_reports_everything_at_once() {
        let flags = validate(None, &fixture_facts());
        assert!(flags.contains(
            Coherency::NO_TIMELINE
                | Coherency::NO_GAME_START
                | Coherency::NO_GAME_END
                | Coherency::GUEST_COUNT_MISMATCH
                | Coherency::CAST_MISMATCH
                | Coherency::START_CLOCK_MISMATCH
                | Coherency::SELECTED_MISSIONS_MISMATCH
        ));
        assert!(!flags.contains(Coherency::TIME_REWIND));
    }

    #[test]
    fn test_unknown_facts_are_skipped() {
        let timeline = normalized(fixture_events());
        assert!(validate(Some(&timeline), &MatchFacts::default()).is_coherent());
    }

    #[test]
    fn test_time_rewind() {
        let mut events = fixture_events();
        events.insert(8, line(Actor::Spy, "sipped drink.", 2050));
        let timeline = normalized(events);
        assert_eq!(
            validate(Some(&timeline), &fixture_facts()),
            Coherency::TIME_REWIND
        );
    }

    #[test]
    fn test_role_and_book_gaps() {
        let mut events = fixture_events();
        events.insert(
            8,
            TimelineEvent::new(
                Actor::Spy,
                Some(Clock::from_tenths(1900)),
                "spy leaves conversation.",
                Slots::Two(
                    Credit {
                        character: Some(Character::Duke),
                        role: None,
                    },
                    Credit {
                        character: None,
                        role: Some(Role::Civilian),
                    },
                ),
                Slots::Two(Some(Book::Blue), None),
            ),
        );
        let timeline = normalized(events);
        assert_eq!(
            validate(Some(&timeline), &fixture_facts()),
            Coherency::CHARACTER_WITHOUT_ROLE
                | Coherency::ROLE_WITHOUT_CHARACTER
                | Coherency::MISSING_BOOK_COLOR
        );
    }

    #[test]
    fn test_mission_and_roster_mismatches() {
        let mut facts = fixture_facts();
        facts.completed_missions = Some([Mission::Bug, Mission::Seduce].into());
        facts.guest_count = Some(4);
        facts.start_clock = Some(Clock::from_tenths(1800));
        let timeline = normalized(fixture_events());
        assert_eq!(
            validate(Some(&timeline), &facts),
            Coherency::COMPLETED_MISSIONS_MISMATCH
                | Coherency::GUEST_COUNT_MISMATCH
                | Coherency::START_CLOCK_MISMATCH
        );
    }

    #[test]
    fn test_missing_elapsed() {
        let mut events = fixture_events();
        events.push(TimelineEvent::new(
            Actor::Game,
            None,
            "overtime!",
            Slots::Zero,
            Slots::Zero,
        ));
        let timeline = normalized(events);
        assert_eq!(
            validate(Some(&timeline), &fixture_facts()),
            Coherency::MISSING_ELAPSED_TIME
        );
    }

    #[test]
    fn test_facts_from_json() {
        let facts: MatchFacts = serde_json::from_str(
            r#"{"selected_missions": ["bug", "inspect"], "start_clock": 210.0,
                "cast": [{"character": "teal", "role": "double_agent"}]}"#,
        )
        .unwrap();
        assert_eq!(
            facts.selected_missions,
            Some(BTreeSet::from([Mission::Bug, Mission::Inspect]))
        );
        assert_eq!(facts.start_clock, Some(Clock::from_tenths(2100)));
        assert_eq!(facts.guest_count, None);
    }
}
