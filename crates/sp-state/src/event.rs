use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sp_data::{ActionTest, Actor, Book, Character, Mission, Role};
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::classify::{classify, rewrite_delegated_purloin};
use crate::TimelineCategory;

/// Match clock reading with one decimal of precision, stored in tenths of a second.
///
/// Negative values are readings taken after the buzzer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Clock(i32);

impl Clock {
    pub const ZERO: Clock = Clock(0);

    pub const fn from_tenths(tenths: i32) -> Self {
        Self(tenths)
    }

    pub fn from_secs(secs: f64) -> Self {
        Self((secs * 10.0).round() as i32)
    }

    pub const fn tenths(self) -> i32 {
        self.0
    }

    pub fn as_secs(self) -> f64 {
        self.0 as f64 / 10.0
    }

    /// Parse "M:SS.D", "-:SS.D" or "SSS.D" (surrounding blanks ignored).
    /// Seconds after a minutes group must be below 60.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        let (negative, rest) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text),
        };
        let (minutes, seconds) = match rest.split_once(':') {
            Some(("", s)) => (0, s),
            Some((m, s)) => (parse_digits(m)?, s),
            None => (0, rest),
        };
        let (whole, tenth) = seconds.split_once('.')?;
        if tenth.len() != 1 || whole.is_empty() {
            return None;
        }
        let whole = parse_digits(whole)?;
        if rest.contains(':') && whole >= 60 {
            return None;
        }
        let tenths = (minutes * 60 + whole) * 10 + parse_digits(tenth)?;
        Some(Self(if negative { -tenths } else { tenths }))
    }
}

fn parse_digits(s: &str) -> Option<i32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

impl std::ops::Add for Clock {
    type Output = Clock;
    fn add(self, rhs: Clock) -> Clock {
        Clock(self.0 + rhs.0)
    }
}

impl std::ops::Sub for Clock {
    type Output = Clock;
    fn sub(self, rhs: Clock) -> Clock {
        Clock(self.0 - rhs.0)
    }
}

impl fmt::Display for Clock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let t = self.0.unsigned_abs();
        write!(f, "{}{}:{:02}.{}", sign, t / 600, (t / 10) % 60, t % 10)
    }
}

impl Serialize for Clock {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_secs())
    }
}

impl<'de> Deserialize<'de> for Clock {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        f64::deserialize(deserializer).map(Clock::from_secs)
    }
}

/// Zero, one or two items: the most a single timeline line can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "Vec<T>", try_from = "Vec<T>")]
#[serde(bound(serialize = "T: Clone + Serialize", deserialize = "T: Deserialize<'de>"))]
pub enum Slots<T> {
    #[default]
    Zero,
    One(T),
    Two(T, T),
}

impl<T> Slots<T> {
    pub fn len(&self) -> usize {
        match self {
            Slots::Zero => 0,
            Slots::One(_) => 1,
            Slots::Two(..) => 2,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Slots::Zero)
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        match (self, index) {
            (Slots::One(a), 0) | (Slots::Two(a, _), 0) => Some(a),
            (Slots::Two(_, b), 1) => Some(b),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        (0..self.len()).filter_map(move |i| self.get(i))
    }

    pub fn map<U>(&self, mut f: impl FnMut(&T) -> U) -> Slots<U> {
        match self {
            Slots::Zero => Slots::Zero,
            Slots::One(a) => Slots::One(f(a)),
            Slots::Two(a, b) => Slots::Two(f(a), f(b)),
        }
    }

    /// Like [`Slots::map`], stopping at the first error.
    pub fn try_map<U, E>(&self, mut f: impl FnMut(&T) -> Result<U, E>) -> Result<Slots<U>, E> {
        Ok(match self {
            Slots::Zero => Slots::Zero,
            Slots::One(a) => Slots::One(f(a)?),
            Slots::Two(a, b) => Slots::Two(f(a)?, f(b)?),
        })
    }
}

impl<T> TryFrom<Vec<T>> for Slots<T> {
    type Error = String;

    fn try_from(items: Vec<T>) -> Result<Self, Self::Error> {
        let count = items.len();
        let mut it = items.into_iter();
        match (it.next(), it.next(), it.next()) {
            (None, _, _) => Ok(Slots::Zero),
            (Some(a), None, _) => Ok(Slots::One(a)),
            (Some(a), Some(b), None) => Ok(Slots::Two(a, b)),
            _ => Err(format!("a timeline line holds at most 2 items, got {}", count)),
        }
    }
}

impl<T: Clone> From<Slots<T>> for Vec<T> {
    fn from(slots: Slots<T>) -> Self {
        slots.iter().cloned().collect()
    }
}

/// One cast portrait on a line: who it shows and the role its border marks.
///
/// Keeping both in one slot keeps character and role arity equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Credit {
    pub character: Option<Character>,
    pub role: Option<Role>,
}

/// A single classified timeline line.
///
/// Equality and hashing ignore `elapsed_time`, which is an annotation added
/// after assembly rather than part of the line's identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineEvent {
    pub actor: Actor,
    pub time: Option<Clock>,
    pub event_text: String,
    pub cast: Slots<Credit>,
    pub books: Slots<Option<Book>>,
    pub category: TimelineCategory,
    pub mission: Mission,
    pub action_test: ActionTest,
    elapsed_time: Option<Clock>,
}

impl TimelineEvent {
    /// Build a line from recognized features and classify its text.
    pub fn new(
        actor: Actor,
        time: Option<Clock>,
        event_text: impl Into<String>,
        cast: Slots<Credit>,
        books: Slots<Option<Book>>,
    ) -> Self {
        let mut event_text = event_text.into();
        if let Some(rewritten) = rewrite_delegated_purloin(&event_text, &cast) {
            event_text = rewritten;
        }
        let classification = classify(&event_text, actor);

        Self {
            actor,
            time,
            event_text,
            cast,
            books,
            category: classification.category,
            mission: classification.mission,
            action_test: classification.action_test,
            elapsed_time: None,
        }
    }

    pub fn elapsed_time(&self) -> Option<Clock> {
        self.elapsed_time
    }

    /// Record the elapsed-from-start value. Only the first annotation sticks;
    /// returns `false` if the line already had one.
    pub fn annotate_elapsed(&mut self, elapsed: Clock) -> bool {
        if self.elapsed_time.is_some() {
            return false;
        }
        self.elapsed_time = Some(elapsed);
        true
    }

    pub fn cast_name(&self) -> Slots<Option<Character>> {
        self.cast.map(|c| c.character)
    }

    pub fn role(&self) -> Slots<Option<Role>> {
        self.cast.map(|c| c.role)
    }
}

impl PartialEq for TimelineEvent {
    fn eq(&self, other: &Self) -> bool {
        self.actor == other.actor
            && self.time == other.time
            && self.event_text == other.event_text
            && self.cast == other.cast
            && self.books == other.books
            && self.category == other.category
            && self.mission == other.mission
            && self.action_test == other.action_test
    }
}

impl Eq for TimelineEvent {}

impl Hash for TimelineEvent {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.actor.hash(state);
        self.time.hash(state);
        self.event_text.hash(state);
        self.cast.hash(state);
        self.books.hash(state);
        self.category.hash(state);
        self.mission.hash(state);
        self.action_test.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;

    fn hash_of(e: &TimelineEvent) -> u64 {
        let mut h = DefaultHasher::new();
        e.hash(&mut h);
        h.finish()
    }

    #[test]
    fn test_clock_parse() {
        assert_eq!(Clock::parse("2:30.0"), Some(Clock::from_tenths(1500)));
        assert_eq!(Clock::parse(" 12.5"), Some(Clock::from_tenths(125)));
        assert_eq!(Clock::parse("123.4"), Some(Clock::from_tenths(1234)));
        assert_eq!(Clock::parse("-:03.2"), Some(Clock::from_tenths(-32)));
        assert_eq!(Clock::parse("0:00.0"), Some(Clock::ZERO));
        assert_eq!(Clock::parse("2:3a.0"), None);
        assert_eq!(Clock::parse("230"), None);
        assert_eq!(Clock::parse("1:75.0"), None);
        assert_eq!(Clock::parse("-:60.0"), None);
        assert_eq!(Clock::parse("1:59.9"), Some(Clock::from_tenths(1199)));
        assert_eq!(Clock::parse("75.0"), Some(Clock::from_tenths(750)));
        assert_eq!(Clock::parse(""), None);
    }

    #[test]
    fn test_clock_display() {
        assert_eq!(Clock::from_tenths(1500).to_string(), "2:30.0");
        assert_eq!(Clock::from_tenths(-32).to_string(), "-0:03.2");
        assert_eq!(Clock::from_secs(61.25).tenths(), 613);
    }

    #[test]
    fn test_slots_from_vec() {
        assert_eq!(Slots::try_from(Vec::<u8>::new()), Ok(Slots::Zero));
        assert_eq!(Slots::try_from(vec![1, 2]), Ok(Slots::Two(1, 2)));
        assert!(Slots::try_from(vec![1, 2, 3]).is_err());
        assert_eq!(Vec::from(Slots::One(4)), vec![4]);
    }

    #[test]
    fn test_slots_try_map() {
        let doubled: Result<_, ()> = Slots::Two(1, 2).try_map(|v| Ok(v * 2));
        assert_eq!(doubled, Ok(Slots::Two(2, 4)));
        let failed = Slots::Two(1, 2).try_map(|v| if *v > 1 { Err(*v) } else { Ok(*v) });
        assert_eq!(failed, Err(2));
    }

    #[test]
    fn test_hash_ignores_elapsed() {
        let cast = Slots::One(Credit {
            character: Some(Character::Teal),
            role: Some(Role::Civilian),
        });
        let original = TimelineEvent::new(
            Actor::Game,
            Some(Clock::from_tenths(2100)),
            "civilian cast.",
            cast,
            Slots::Zero,
        );
        let mut copy = original.clone();
        assert!(copy.annotate_elapsed(Clock::from_tenths(15)));
        assert!(!copy.annotate_elapsed(Clock::from_tenths(99)));
        assert_eq!(copy.elapsed_time(), Some(Clock::from_tenths(15)));

        assert_eq!(original, copy);
        assert_eq!(hash_of(&original), hash_of(&copy));
    }

    #[test]
    fn test_cast_and_role_arity() {
        let event = TimelineEvent::new(
            Actor::Spy,
            Some(Clock::from_tenths(900)),
            "spy enters conversation.",
            Slots::Two(
                Credit {
                    character: Some(Character::Boots),
                    role: Some(Role::Spy),
                },
                Credit {
                    character: Some(Character::Duke),
                    role: None,
                },
            ),
            Slots::Zero,
        );
        assert_eq!(event.cast_name().len(), event.role().len());
        assert_eq!(event.role().get(1), Some(&None));
    }

    #[test]
    fn test_event_json_projection() {
        let mut event = TimelineEvent::new(
            Actor::Spy,
            Some(Clock::from_tenths(1234)),
            "action test green: contact double agent",
            Slots::Zero,
            Slots::One(Some(Book::Blue)),
        );
        event.annotate_elapsed(Clock::from_tenths(866));
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["time"], 123.4);
        assert_eq!(json["elapsed_time"], 86.6);
        assert_eq!(json["books"], serde_json::json!(["blue"]));
        assert_eq!(json["mission"], "contact");

        let back: TimelineEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
    }
}
