//! Timeline text classification.
//!
//! Lines are classified by an ordered list of rules. Every rule whose
//! predicate holds is applied, top to bottom, to one accumulator, so a later
//! rule can add category bits on top of an earlier match (the generic
//! "statue" rule adds `STATUES` to an already partial inspection), or fill
//! in a mission an earlier rule left unresolved. Fingerprinting overrides
//! whatever mission the handled object suggested.

use sp_data::{ActionTest, Actor, Mission};
use tracing::trace;

use crate::event::{Credit, Slots};
use crate::TimelineCategory;

/// Result of classifying one line of timeline text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub category: TimelineCategory,
    pub mission: Mission,
    pub action_test: ActionTest,
}

impl Default for Classification {
    fn default() -> Self {
        Self {
            category: TimelineCategory::empty(),
            mission: Mission::None,
            action_test: ActionTest::NoAT,
        }
    }
}

impl Classification {
    fn tag(&mut self, category: TimelineCategory) {
        self.category |= category;
    }

    /// Set the mission unless an earlier rule already resolved one.
    fn fill_mission(&mut self, mission: Mission) {
        if self.mission == Mission::None {
            self.mission = mission;
        }
    }

    /// Replace the mission chosen so far.
    fn set_mission(&mut self, mission: Mission) {
        if mission != Mission::None {
            self.mission = mission;
        }
    }
}

struct Rule {
    name: &'static str,
    when: fn(&str, Actor) -> bool,
    then: fn(&mut Classification, &str),
}

/// Mission names as they appear after "action test <color>:",
/// "action triggered:" and before " selected." / " enabled.".
const MISSION_PHRASES: &[(&str, Mission)] = &[
    ("bug ambassador", Mission::Bug),
    ("contact double agent", Mission::Contact),
    ("transfer microfilm", Mission::Transfer),
    ("swap statue", Mission::Swap),
    ("inspect statues", Mission::Inspect),
    ("inspect 1 statue", Mission::Inspect),
    ("inspect 2 statues", Mission::Inspect),
    ("inspect 3 statues", Mission::Inspect),
    ("seduce target", Mission::Seduce),
    ("purloin guest list", Mission::Purloin),
    ("fingerprint ambassador", Mission::Fingerprint),
];

const MISSION_COMPLETIONS: &[(&str, Mission)] = &[
    ("bugged ambassador while standing.", Mission::Bug),
    ("bugged ambassador while walking.", Mission::Bug),
    ("double agent contacted.", Mission::Contact),
    ("transferred microfilm.", Mission::Transfer),
    ("statue swapped.", Mission::Swap),
    ("all statues inspected.", Mission::Inspect),
    ("target seduced.", Mission::Seduce),
    ("guest list purloined.", Mission::Purloin),
    ("fingerprinted ambassador.", Mission::Fingerprint),
];

const MISSION_PARTIALS: &[(&str, Mission)] = &[
    ("begin planting bug while standing.", Mission::Bug),
    ("begin planting bug while walking.", Mission::Bug),
    ("failed planting bug while standing.", Mission::Bug),
    ("failed planting bug while walking.", Mission::Bug),
    ("real banana bread started.", Mission::Contact),
    ("real banana bread uttered.", Mission::Contact),
    ("hid microfilm in book.", Mission::Transfer),
    ("removed microfilm from book.", Mission::Transfer),
    ("statue swap pending.", Mission::Swap),
    ("held statue inspected.", Mission::Inspect),
    ("left statue inspected.", Mission::Inspect),
    ("right statue inspected.", Mission::Inspect),
    ("guest list purloin pending.", Mission::Purloin),
    ("guest list return uncertain.", Mission::Purloin),
    ("fingerprinted statue.", Mission::Fingerprint),
    ("fingerprinted book.", Mission::Fingerprint),
    ("fingerprinted drink.", Mission::Fingerprint),
    ("fingerprinted briefcase.", Mission::Fingerprint),
    ("fingerprinted cupcake.", Mission::Fingerprint),
];

const GAME_ENDINGS: &[&str] = &[
    "sniper shot spy.",
    "sniper shot civilian.",
    "sniper shot ambassador.",
    "sniper shot double agent.",
    "sniper shot suspected double agent.",
    "sniper shot seduction target.",
    "sniper shot staff.",
    "spy ran out of time.",
    "missions completed successfully.",
];

const DELEGATED_PURLOIN: &str = "delegated purloin to";

fn lookup(table: &[(&str, Mission)], text: &str) -> Option<Mission> {
    table.iter().find(|(t, _)| *t == text).map(|(_, m)| *m)
}

fn mission_phrase(phrase: &str) -> Mission {
    lookup(MISSION_PHRASES, phrase.trim()).unwrap_or(Mission::None)
}

/// Split "action test <color>: <phrase>" into its outcome and mission phrase.
fn parse_action_test(text: &str) -> Option<(ActionTest, &str)> {
    let rest = text.strip_prefix("action test ")?;
    let (color, phrase) = rest.split_once(':')?;
    Some((ActionTest::from_color(color.trim())?, phrase.trim()))
}

const RULES: &[Rule] = &[
    Rule {
        name: "game start",
        when: |t, _| t == "game started.",
        then: |c, _| c.tag(TimelineCategory::GAME_START),
    },
    Rule {
        name: "game end",
        when: |t, _| GAME_ENDINGS.contains(&t),
        then: |c, _| c.tag(TimelineCategory::GAME_END),
    },
    Rule {
        name: "sniper shot",
        when: |t, _| t.starts_with("sniper shot "),
        then: |c, _| c.tag(TimelineCategory::SNIPER_SHOT),
    },
    Rule {
        name: "cast",
        when: |t, _| t.ends_with(" cast."),
        then: |c, _| c.tag(TimelineCategory::CAST),
    },
    Rule {
        name: "mission selected",
        when: |t, _| t.ends_with(" selected."),
        then: |c, t| {
            c.tag(TimelineCategory::MISSION_SELECTED);
            c.fill_mission(mission_phrase(&t[..t.len() - " selected.".len()]));
        },
    },
    Rule {
        name: "mission enabled",
        when: |t, _| t.ends_with(" enabled."),
        then: |c, t| {
            c.tag(TimelineCategory::MISSION_ENABLED);
            c.fill_mission(mission_phrase(&t[..t.len() - " enabled.".len()]));
        },
    },
    Rule {
        name: "mission complete",
        when: |t, _| lookup(MISSION_COMPLETIONS, t).is_some(),
        then: |c, t| {
            c.tag(TimelineCategory::MISSION_COMPLETE);
            if let Some(m) = lookup(MISSION_COMPLETIONS, t) {
                c.fill_mission(m);
            }
        },
    },
    Rule {
        name: "mission partial",
        when: |t, _| lookup(MISSION_PARTIALS, t).is_some(),
        then: |c, t| {
            c.tag(TimelineCategory::MISSION_PARTIAL);
            if let Some(m) = lookup(MISSION_PARTIALS, t) {
                c.fill_mission(m);
            }
        },
    },
    Rule {
        name: "flirt progress",
        when: |t, _| t.starts_with("flirt with seduction target:"),
        then: |c, _| {
            c.tag(TimelineCategory::MISSION_PARTIAL);
            c.fill_mission(Mission::Seduce);
        },
    },
    Rule {
        name: "action test",
        when: |t, _| parse_action_test(t).is_some(),
        then: |c, t| {
            if let Some((outcome, phrase)) = parse_action_test(t) {
                c.tag(TimelineCategory::ACTION_TEST);
                c.action_test = outcome;
                c.fill_mission(mission_phrase(phrase));
            }
        },
    },
    Rule {
        name: "action triggered",
        when: |t, _| t.starts_with("action triggered:"),
        then: |c, t| {
            c.tag(TimelineCategory::ACTION_TRIGGERED);
            c.fill_mission(mission_phrase(&t["action triggered:".len()..]));
        },
    },
    Rule {
        name: "mission countdown",
        when: |t, _| t.starts_with("missions completed.") || t == "missions reset.",
        then: |c, _| c.tag(TimelineCategory::MISSION_COUNTDOWN),
    },
    Rule {
        name: "delegated purloin",
        when: |t, _| t.starts_with(DELEGATED_PURLOIN) || t == "delegating purloin guest list.",
        then: |c, _| {
            c.tag(TimelineCategory::MISSION_PARTIAL);
            c.fill_mission(Mission::Purloin);
        },
    },
    Rule {
        name: "pending",
        when: |t, _| t.ends_with(" pending."),
        then: |c, _| {
            if !c.category.contains(TimelineCategory::MISSION_COUNTDOWN) {
                c.tag(TimelineCategory::MISSION_PARTIAL);
            }
        },
    },
    Rule {
        name: "bug",
        when: |t, _| t.contains("bug"),
        then: |c, _| c.fill_mission(Mission::Bug),
    },
    Rule {
        name: "seduce",
        when: |t, _| t.contains("flirt") || t.contains("seduc"),
        then: |c, _| c.fill_mission(Mission::Seduce),
    },
    Rule {
        name: "purloin",
        when: |t, _| t.contains("purloin") || t.contains("guest list"),
        then: |c, _| c.fill_mission(Mission::Purloin),
    },
    Rule {
        name: "fingerprint",
        when: |t, _| t.contains("fingerprint"),
        then: |c, _| c.set_mission(Mission::Fingerprint),
    },
    Rule {
        name: "microfilm",
        when: |t, _| t.contains("microfilm"),
        then: |c, _| c.fill_mission(Mission::Transfer),
    },
    Rule {
        name: "conversation",
        when: |t, _| t.contains("conversation"),
        then: |c, _| c.tag(TimelineCategory::CONVERSATION),
    },
    Rule {
        name: "banana bread",
        when: |t, _| t.contains("banana bread"),
        then: |c, _| c.tag(TimelineCategory::BANANA_BREAD),
    },
    Rule {
        name: "statue",
        when: |t, _| t.contains("statue"),
        then: |c, _| c.tag(TimelineCategory::STATUES),
    },
    Rule {
        name: "book",
        when: |t, _| t.contains("book"),
        then: |c, _| c.tag(TimelineCategory::BOOKS),
    },
    Rule {
        name: "drink",
        when: |t, _| t.contains("drink"),
        then: |c, _| c.tag(TimelineCategory::DRINKS),
    },
    Rule {
        name: "watch",
        when: |t, _| t.contains("watch"),
        then: |c, _| c.tag(TimelineCategory::WATCH),
    },
    Rule {
        name: "briefcase",
        when: |t, _| t.contains("briefcase"),
        then: |c, _| c.tag(TimelineCategory::BRIEFCASE),
    },
    Rule {
        name: "time add",
        when: |t, _| t == "45 seconds added to match.",
        then: |c, _| c.tag(TimelineCategory::TIME_ADD),
    },
    Rule {
        name: "overtime",
        when: |t, _| t.starts_with("overtime"),
        then: |c, _| c.tag(TimelineCategory::OVERTIME),
    },
    Rule {
        name: "sniper lights",
        when: |t, a| a == Actor::Sniper && t.starts_with("marked "),
        then: |c, _| c.tag(TimelineCategory::SNIPER_LIGHTS),
    },
];

/// Classify one line of timeline text.
pub fn classify(text: &str, actor: Actor) -> Classification {
    let mut acc = Classification::default();
    for rule in RULES {
        if (rule.when)(text, actor) {
            trace!("rule '{}' matched {:?}", rule.name, text);
            (rule.then)(&mut acc, text);
        }
    }
    acc
}

/// Delegated purloin lines show the delegate's portrait where the name goes;
/// put the recognized name back into the text.
pub fn rewrite_delegated_purloin(text: &str, cast: &Slots<Credit>) -> Option<String> {
    if !text.starts_with(DELEGATED_PURLOIN) {
        return None;
    }
    let character = cast.iter().find_map(|c| c.character)?;
    Some(format!("{} {}.", DELEGATED_PURLOIN, character.display_name()))
}
