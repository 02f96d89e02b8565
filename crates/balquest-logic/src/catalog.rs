//! The immutable content catalog: scenes, choices, responses, badges.
//!
//! Content is authored once as static JSON, deserialized at startup,
//! and never mutated during a session. The engine only ever reads it
//! by id. [`validate`] audits a loaded catalog for the content-integrity
//! problems that would otherwise surface as hard engine errors mid-game
//! (a choice without a response, a response naming a badge that does
//! not exist, and so on).
//!
//! ```
//! use balquest_logic::catalog::{Catalog, validate};
//!
//! let json = r#"{
//!     "scenes": [{
//!         "id": "s1", "day": 1, "is_core": true, "text": "...",
//!         "choices": [{"id": "a", "label": "A", "subtext": "",
//!                      "category": "rest", "points": 5, "bubble_effect": 1}],
//!         "responses": {"a": {"message": "Nice."}}
//!     }],
//!     "badges": [],
//!     "quotes": []
//! }"#;
//! let catalog: Catalog = serde_json::from_str(json).unwrap();
//! assert!(validate(&catalog).is_empty());
//! ```

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::habits::Habit;

/// Exhaustive classification of the kind of life-activity a choice
/// represents. Drives the insight engine's per-category tallies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChoiceCategory {
    Rest,
    Work,
    Social,
    Scroll,
    Neutral,
}

impl ChoiceCategory {
    pub fn all() -> [ChoiceCategory; 5] {
        [
            ChoiceCategory::Rest,
            ChoiceCategory::Work,
            ChoiceCategory::Social,
            ChoiceCategory::Scroll,
            ChoiceCategory::Neutral,
        ]
    }
}

/// A selectable option within a scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    /// Unique within the owning scene.
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub subtext: String,
    pub category: ChoiceCategory,
    /// Points delta. All shipped content uses deltas >= 0, but the
    /// engine does not assume non-negativity.
    pub points: i32,
    /// Mood delta applied to the bubble score (signed).
    pub bubble_effect: i32,
}

/// Feedback shown after a choice is resolved.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Response {
    /// Message template; `{name}` is substituted with the player name
    /// at display time.
    pub message: String,
    /// Optional flavor line shown under the message.
    #[serde(default)]
    pub quote: Option<String>,
    /// Badge id to award, if any. Awarded at most once per session.
    #[serde(default)]
    pub badge: Option<String>,
    /// Per-habit overrides of `message`. The first selected habit (in
    /// the player's selection order) with a non-empty entry wins.
    #[serde(default)]
    pub habit_messages: BTreeMap<Habit, String>,
}

/// Kind of mid-scene observation an alert makes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Time,
    Pattern,
    Reflection,
}

/// How the bubble "feels" while delivering an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BubbleExpression {
    Curious,
    Concerned,
    Supportive,
    Celebratory,
}

/// A timed observation that appears while a scene is on screen.
///
/// Pass-through display data: the core never runs a timer, the
/// presentation layer schedules the delay itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedAlert {
    pub delay_seconds: u32,
    pub message: String,
    pub kind: AlertKind,
    #[serde(default)]
    pub expression: Option<BubbleExpression>,
}

/// One content node: a story beat with a fixed menu of choices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub id: String,
    /// Day 1..3. Scenes are authored in day order.
    pub day: u8,
    /// Core scenes bypass habit filtering and are always shown.
    #[serde(default)]
    pub is_core: bool,
    /// Time-of-day label, e.g. "16:30". Display data only.
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    /// Short lead-in line, may be empty.
    #[serde(default)]
    pub intro: String,
    /// Main body; paragraphs separated by blank lines.
    pub text: String,
    /// Habits this scene is relevant to, for filtering and
    /// personalization. Empty means "matches nothing" (a core scene
    /// survives anyway).
    #[serde(default)]
    pub relevant_habits: Vec<Habit>,
    #[serde(default)]
    pub timed_alert: Option<TimedAlert>,
    /// Ordered menu presented to the player.
    pub choices: Vec<Choice>,
    /// Response table keyed by choice id.
    pub responses: BTreeMap<String, Response>,
}

impl Scene {
    /// Body text split into display paragraphs.
    pub fn paragraphs(&self) -> Vec<&str> {
        self.text
            .split("\n\n")
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect()
    }

    /// Look up a choice on this scene by id.
    pub fn choice(&self, choice_id: &str) -> Option<&Choice> {
        self.choices.iter().find(|c| c.id == choice_id)
    }
}

/// An unlockable achievement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Badge {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Icon name for whichever front-end renders this.
    pub icon: String,
}

/// The full static content set for a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    /// All scenes in authored (day-ordered) sequence.
    pub scenes: Vec<Scene>,
    /// Badge definitions referenced by scene responses.
    pub badges: Vec<Badge>,
    /// Motivational flavor quotes for presentation flourishes.
    #[serde(default)]
    pub quotes: Vec<String>,
}

impl Catalog {
    /// Scenes belonging to a specific day, in authored order.
    pub fn scenes_for_day(&self, day: u8) -> Vec<&Scene> {
        self.scenes.iter().filter(|s| s.day == day).collect()
    }

    /// All core scenes, in authored order.
    pub fn core_scenes(&self) -> Vec<&Scene> {
        self.scenes.iter().filter(|s| s.is_core).collect()
    }

    /// Badge definition by id.
    pub fn badge(&self, badge_id: &str) -> Option<&Badge> {
        self.badges.iter().find(|b| b.id == badge_id)
    }
}

/// Content-integrity problem found in a catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// No scenes at all.
    Empty,
    /// Two scenes share an id.
    DuplicateSceneId(String),
    /// A scene offers no choices.
    NoChoices(String),
    /// Two choices within one scene share an id.
    DuplicateChoiceId { scene: String, choice: String },
    /// A choice has no entry in its scene's response table.
    MissingResponse { scene: String, choice: String },
    /// A response is keyed to a choice id the scene does not offer.
    OrphanResponse { scene: String, choice: String },
    /// A response awards a badge that is not in the badge list.
    UnknownBadge { scene: String, badge: String },
    /// Day outside the 1..=3 range.
    DayOutOfRange { scene: String, day: u8 },
    /// A scene's day is lower than a preceding scene's day.
    DayOrderViolation { scene: String, day: u8 },
    /// Two badge definitions share an id.
    DuplicateBadgeId(String),
}

/// Audit a catalog, returning every integrity problem found.
///
/// A valid shipped catalog returns an empty list; anything else means
/// broken content, not a user-input problem, and should stop startup.
pub fn validate(catalog: &Catalog) -> Vec<CatalogError> {
    let mut errors = Vec::new();

    if catalog.scenes.is_empty() {
        errors.push(CatalogError::Empty);
    }

    let mut badge_ids = HashSet::new();
    for badge in &catalog.badges {
        if !badge_ids.insert(badge.id.as_str()) {
            errors.push(CatalogError::DuplicateBadgeId(badge.id.clone()));
        }
    }

    let mut scene_ids = HashSet::new();
    let mut max_day_seen = 0u8;
    for scene in &catalog.scenes {
        if !scene_ids.insert(scene.id.as_str()) {
            errors.push(CatalogError::DuplicateSceneId(scene.id.clone()));
        }

        if !(1..=3).contains(&scene.day) {
            errors.push(CatalogError::DayOutOfRange {
                scene: scene.id.clone(),
                day: scene.day,
            });
        }
        if scene.day < max_day_seen {
            errors.push(CatalogError::DayOrderViolation {
                scene: scene.id.clone(),
                day: scene.day,
            });
        }
        max_day_seen = max_day_seen.max(scene.day);

        if scene.choices.is_empty() {
            errors.push(CatalogError::NoChoices(scene.id.clone()));
        }

        let mut choice_ids = HashSet::new();
        for choice in &scene.choices {
            if !choice_ids.insert(choice.id.as_str()) {
                errors.push(CatalogError::DuplicateChoiceId {
                    scene: scene.id.clone(),
                    choice: choice.id.clone(),
                });
            }
            if !scene.responses.contains_key(&choice.id) {
                errors.push(CatalogError::MissingResponse {
                    scene: scene.id.clone(),
                    choice: choice.id.clone(),
                });
            }
        }

        for (choice_id, response) in &scene.responses {
            if !choice_ids.contains(choice_id.as_str()) {
                errors.push(CatalogError::OrphanResponse {
                    scene: scene.id.clone(),
                    choice: choice_id.clone(),
                });
            }
            if let Some(badge) = &response.badge {
                if !badge_ids.contains(badge.as_str()) {
                    errors.push(CatalogError::UnknownBadge {
                        scene: scene.id.clone(),
                        badge: badge.clone(),
                    });
                }
            }
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    /// The catalog shipped with the game.
    const CATALOG_JSON: &str = include_str!("../../../data/catalog.json");

    fn minimal_scene(id: &str, day: u8) -> Scene {
        let choice = Choice {
            id: "only".into(),
            label: "Only option".into(),
            subtext: String::new(),
            category: ChoiceCategory::Neutral,
            points: 0,
            bubble_effect: 0,
        };
        let mut responses = BTreeMap::new();
        responses.insert(
            "only".into(),
            Response {
                message: "Done.".into(),
                ..Response::default()
            },
        );
        Scene {
            id: id.into(),
            day,
            is_core: false,
            time: None,
            location: None,
            intro: String::new(),
            text: "Something happens.".into(),
            relevant_habits: Vec::new(),
            timed_alert: None,
            choices: vec![choice],
            responses,
        }
    }

    #[test]
    fn shipped_catalog_parses_and_validates() {
        let catalog: Catalog = serde_json::from_str(CATALOG_JSON).unwrap();
        let errors = validate(&catalog);
        assert!(errors.is_empty(), "shipped catalog is broken: {errors:?}");
        assert_eq!(catalog.scenes.len(), 16);
        assert_eq!(catalog.badges.len(), 10);
        assert_eq!(catalog.quotes.len(), 8);
    }

    #[test]
    fn shipped_catalog_day_structure() {
        let catalog: Catalog = serde_json::from_str(CATALOG_JSON).unwrap();
        assert_eq!(catalog.scenes_for_day(1).len(), 6);
        assert_eq!(catalog.scenes_for_day(2).len(), 5);
        assert_eq!(catalog.scenes_for_day(3).len(), 5);
        // Core scenes anchor every day.
        for day in 1..=3 {
            assert!(
                catalog.scenes_for_day(day).iter().any(|s| s.is_core),
                "day {day} has no core scene"
            );
        }
    }

    #[test]
    fn empty_catalog_rejected() {
        let catalog = Catalog {
            scenes: Vec::new(),
            badges: Vec::new(),
            quotes: Vec::new(),
        };
        assert!(validate(&catalog).contains(&CatalogError::Empty));
    }

    #[test]
    fn missing_response_detected() {
        let mut scene = minimal_scene("s1", 1);
        scene.responses.clear();
        let catalog = Catalog {
            scenes: vec![scene],
            badges: Vec::new(),
            quotes: Vec::new(),
        };
        assert!(validate(&catalog).contains(&CatalogError::MissingResponse {
            scene: "s1".into(),
            choice: "only".into(),
        }));
    }

    #[test]
    fn orphan_response_detected() {
        let mut scene = minimal_scene("s1", 1);
        scene.responses.insert(
            "ghost".into(),
            Response {
                message: "Never shown.".into(),
                ..Response::default()
            },
        );
        let catalog = Catalog {
            scenes: vec![scene],
            badges: Vec::new(),
            quotes: Vec::new(),
        };
        assert!(validate(&catalog).contains(&CatalogError::OrphanResponse {
            scene: "s1".into(),
            choice: "ghost".into(),
        }));
    }

    #[test]
    fn unknown_badge_detected() {
        let mut scene = minimal_scene("s1", 1);
        scene.responses.get_mut("only").unwrap().badge = Some("no-such-badge".into());
        let catalog = Catalog {
            scenes: vec![scene],
            badges: Vec::new(),
            quotes: Vec::new(),
        };
        assert!(validate(&catalog).contains(&CatalogError::UnknownBadge {
            scene: "s1".into(),
            badge: "no-such-badge".into(),
        }));
    }

    #[test]
    fn day_order_violation_detected() {
        let catalog = Catalog {
            scenes: vec![minimal_scene("s1", 2), minimal_scene("s2", 1)],
            badges: Vec::new(),
            quotes: Vec::new(),
        };
        assert!(validate(&catalog).contains(&CatalogError::DayOrderViolation {
            scene: "s2".into(),
            day: 1,
        }));
    }

    #[test]
    fn duplicate_ids_detected() {
        let catalog = Catalog {
            scenes: vec![minimal_scene("s1", 1), minimal_scene("s1", 1)],
            badges: Vec::new(),
            quotes: Vec::new(),
        };
        assert!(validate(&catalog).contains(&CatalogError::DuplicateSceneId("s1".into())));
    }

    #[test]
    fn paragraphs_split_on_blank_lines() {
        let mut scene = minimal_scene("s1", 1);
        scene.text = "First paragraph.\n\nSecond one.\n\n".into();
        assert_eq!(scene.paragraphs(), vec!["First paragraph.", "Second one."]);
    }

    #[test]
    fn habit_message_keys_deserialize() {
        let json = r#"{
            "message": "Generic.",
            "habit_messages": {"less-phone": "Personal.", "take-breaks": ""}
        }"#;
        let response: Response = serde_json::from_str(json).unwrap();
        assert_eq!(
            response.habit_messages.get(&crate::habits::Habit::LessPhone),
            Some(&"Personal.".to_string())
        );
    }
}
