use serde::{Deserialize, Serialize};
use std::fmt;

mod fingerprint;
mod vocabulary;

pub use fingerprint::Fingerprint;
pub use vocabulary::{BookColor, RoleColor, TimerFormat, Vocabulary};

/// Who authored a timeline line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Actor {
    Spy,
    Sniper,
    Game,
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Actor::Spy => "spy",
            Actor::Sniper => "sniper",
            Actor::Game => "game",
        })
    }
}

/// Party guests and staff that can appear as cast portraits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Character {
    Alice,
    Bling,
    Boots,
    Carlos,
    Damon,
    Disney,
    Duke,
    Helen,
    Irish,
    Morgan,
    Oprah,
    Plain,
    Queen,
    Rocker,
    Salmon,
    Sari,
    Sergio,
    Sikh,
    Smallman,
    Taft,
    Teal,
    Toby,
    Wheels,
}

impl Character {
    /// Name as printed inside timeline text.
    pub fn display_name(self) -> &'static str {
        match self {
            Character::Alice => "alice",
            Character::Bling => "bling",
            Character::Boots => "boots",
            Character::Carlos => "carlos",
            Character::Damon => "damon",
            Character::Disney => "disney",
            Character::Duke => "duke",
            Character::Helen => "helen",
            Character::Irish => "irish",
            Character::Morgan => "morgan",
            Character::Oprah => "oprah",
            Character::Plain => "plain",
            Character::Queen => "queen",
            Character::Rocker => "rocker",
            Character::Salmon => "salmon",
            Character::Sari => "sari",
            Character::Sergio => "sergio",
            Character::Sikh => "sikh",
            Character::Smallman => "smallman",
            Character::Taft => "taft",
            Character::Teal => "teal",
            Character::Toby => "toby",
            Character::Wheels => "wheels",
        }
    }
}

/// Role a cast member plays in the match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Spy,
    Ambassador,
    DoubleAgent,
    SuspectedDoubleAgent,
    SeductionTarget,
    Civilian,
    Staff,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Book {
    Blue,
    Green,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Mission {
    #[default]
    None,
    Bug,
    Contact,
    Transfer,
    Swap,
    Inspect,
    Seduce,
    Purloin,
    Fingerprint,
}

/// Outcome of an action test, ordered from "no test" to the worst outcome.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum ActionTest {
    #[default]
    NoAT,
    Green,
    White,
    Ignored,
    Red,
    Canceled,
}

impl ActionTest {
    /// Parse the color word of an "action test <color>:" line.
    pub fn from_color(word: &str) -> Option<Self> {
        match word {
            "green" => Some(ActionTest::Green),
            "white" => Some(ActionTest::White),
            "ignored" => Some(ActionTest::Ignored),
            "red" => Some(ActionTest::Red),
            "canceled" => Some(ActionTest::Canceled),
            _ => None,
        }
    }
}
