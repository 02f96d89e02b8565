//! Player-selected self-improvement goals.
//!
//! Habits are chosen once during onboarding and never change for the
//! rest of the session. They drive two things only: which scenes the
//! habit filter keeps, and which personalized response message (if any)
//! overrides the generic one. They carry no numeric weight of their own.

use serde::{Deserialize, Serialize};

/// A self-improvement goal the player can commit to during onboarding.
///
/// Serialized as kebab-case ids in the content catalog
/// (`"less-phone"`, `"take-breaks"`, ...).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum Habit {
    /// Spend less time on the phone.
    LessPhone,
    /// Take enough breaks during the day.
    TakeBreaks,
    /// Get to bed on time.
    SleepOnTime,
    /// Move more.
    MoreExercise,
    /// Finish the tasks that were started.
    FinishTasks,
    /// Keep time that is just for yourself.
    PersonalTime,
}

impl Habit {
    /// Number of selectable habits. The habit filter's pass-through
    /// threshold (`selected >= COUNT - 1`) is derived from this.
    pub const COUNT: usize = 6;

    /// All habits in declaration order.
    pub fn all() -> [Habit; Habit::COUNT] {
        [
            Habit::LessPhone,
            Habit::TakeBreaks,
            Habit::SleepOnTime,
            Habit::MoreExercise,
            Habit::FinishTasks,
            Habit::PersonalTime,
        ]
    }

    /// Stable catalog id, matching the serde representation.
    pub fn id(self) -> &'static str {
        match self {
            Habit::LessPhone => "less-phone",
            Habit::TakeBreaks => "take-breaks",
            Habit::SleepOnTime => "sleep-on-time",
            Habit::MoreExercise => "more-exercise",
            Habit::FinishTasks => "finish-tasks",
            Habit::PersonalTime => "personal-time",
        }
    }

    /// Human-readable onboarding label.
    pub fn label(self) -> &'static str {
        match self {
            Habit::LessPhone => "Less time on my phone",
            Habit::TakeBreaks => "Taking enough breaks",
            Habit::SleepOnTime => "Getting to bed on time",
            Habit::MoreExercise => "Moving more",
            Habit::FinishTasks => "Finishing my tasks",
            Habit::PersonalTime => "Keeping time for myself",
        }
    }

    /// Icon name for the onboarding screen (maps to the icon set used
    /// by whichever front-end renders this).
    pub fn icon(self) -> &'static str {
        match self {
            Habit::LessPhone => "Smartphone",
            Habit::TakeBreaks => "Coffee",
            Habit::SleepOnTime => "Moon",
            Habit::MoreExercise => "Activity",
            Habit::FinishTasks => "CheckSquare",
            Habit::PersonalTime => "Sun",
        }
    }
}
