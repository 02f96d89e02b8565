//! The canonical session state and its phase machine vocabulary.
//!
//! One [`GameState`] exists per session. It is only ever replaced
//! wholesale by the transition engine — no other component writes to
//! it, and a restart swaps in a fresh [`initial_game_state`].

use serde::{Deserialize, Serialize};

use crate::catalog::{ChoiceCategory, Scene};
use crate::habits::Habit;

/// Lower clamp bound for the bubble score.
pub const BUBBLE_MIN: i32 = -10;
/// Upper clamp bound for the bubble score.
pub const BUBBLE_MAX: i32 = 10;
/// Starting bubble score: solidly content.
pub const BUBBLE_START: i32 = 6;

/// Where in the session flow the player currently is.
///
/// Flow: `Welcome → Name → Habits → BubbleIntro → Playing ⇄ DayEnd →
/// Reflection → Results`, with restart as a reset edge back to
/// `Welcome` from anywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GamePhase {
    Welcome,
    Name,
    Habits,
    BubbleIntro,
    Playing,
    DayEnd,
    Reflection,
    Results,
}

/// One entry in the append-only choice log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoiceRecord {
    pub scene_id: String,
    pub choice_id: String,
    pub category: ChoiceCategory,
}

/// The single mutable aggregate for a session.
///
/// Fields past `phase` only carry meaning once the phase that sets
/// them has been passed (e.g. `filtered_scenes` is empty until habits
/// are submitted); the engine's phase guards make it impossible to
/// observe them earlier through any engine operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub phase: GamePhase,
    /// Set once during onboarding; used for `{name}` substitution.
    pub player_name: String,
    /// Ordered habit selection, immutable after onboarding.
    pub selected_habits: Vec<Habit>,
    /// Scene sequence computed once from the habit selection.
    pub filtered_scenes: Vec<Scene>,
    /// Cursor into `filtered_scenes`; `0 <= index <= len`.
    pub current_scene_index: usize,
    /// 1..=3; equals the current scene's day while playing.
    pub current_day: u8,
    /// Append-only log, one entry per resolved scene.
    pub choices: Vec<ChoiceRecord>,
    pub points: i32,
    /// Mood accumulator, clamped to `[BUBBLE_MIN, BUBBLE_MAX]`.
    pub bubble_score: i32,
    /// Earned badge ids in first-earned order, no duplicates.
    pub badges: Vec<String>,
    /// Derived progress through the current day's scene block, 0..=1.
    pub day_progress: f32,
}

/// A fresh session at the welcome screen.
pub fn initial_game_state() -> GameState {
    GameState {
        phase: GamePhase::Welcome,
        player_name: String::new(),
        selected_habits: Vec::new(),
        filtered_scenes: Vec::new(),
        current_scene_index: 0,
        current_day: 1,
        choices: Vec::new(),
        points: 0,
        bubble_score: BUBBLE_START,
        badges: Vec::new(),
        day_progress: 0.0,
    }
}

impl GameState {
    /// The scene the cursor points at, if the cursor is in bounds.
    pub fn current_scene(&self) -> Option<&Scene> {
        self.filtered_scenes.get(self.current_scene_index)
    }
}
