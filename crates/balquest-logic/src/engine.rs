//! The transition engine: pure reducers over [`GameState`].
//!
//! Every operation takes the current state by reference and returns a
//! fresh state (or an error, leaving the caller's state untouched —
//! reject-before-mutate). The presentation layer feeds user events in
//! one at a time; nothing here blocks, suspends, or reads a clock.
//!
//! Resolving a choice is deliberately a two-step sequence: resolve →
//! show feedback → dismiss → advance. [`resolve_choice`] applies the
//! scoring and logging but leaves the cursor alone; the cursor, day,
//! and phase move only in [`dismiss_response`].

use std::fmt;

use crate::catalog::{Catalog, Choice, Response};
use crate::filter::filter_scenes;
use crate::habits::Habit;
use crate::state::{
    initial_game_state, ChoiceRecord, GamePhase, GameState, BUBBLE_MAX, BUBBLE_MIN,
};

/// Why a transition was rejected.
///
/// `MissingResponse`, `NoScenesAfterFilter`, and `CursorOutOfBounds`
/// indicate broken content, not user input; they cannot occur with a
/// catalog that passes [`crate::catalog::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Operation is not legal in the current phase.
    InvalidPhase {
        expected: GamePhase,
        found: GamePhase,
    },
    /// Submitted player name is empty after trimming.
    EmptyPlayerName,
    /// Submitted habit list is empty.
    EmptyHabitSelection,
    /// The habit filter produced no scenes at all.
    NoScenesAfterFilter,
    /// Submitted choice does not belong to the current scene.
    UnknownChoice { scene: String, choice: String },
    /// The current scene's response table has no entry for the choice.
    MissingResponse { scene: String, choice: String },
    /// The current scene was already resolved this visit.
    ChoiceAlreadyResolved { scene: String },
    /// Dismissal requested but no choice has been resolved yet.
    NoPendingResponse,
    /// Scene cursor points past the filtered sequence.
    CursorOutOfBounds { index: usize, len: usize },
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::InvalidPhase { expected, found } => {
                write!(f, "expected phase {expected:?}, but session is in {found:?}")
            }
            EngineError::EmptyPlayerName => write!(f, "player name must not be empty"),
            EngineError::EmptyHabitSelection => {
                write!(f, "at least one habit must be selected")
            }
            EngineError::NoScenesAfterFilter => {
                write!(f, "habit filter produced an empty scene sequence")
            }
            EngineError::UnknownChoice { scene, choice } => {
                write!(f, "choice '{choice}' does not belong to scene '{scene}'")
            }
            EngineError::MissingResponse { scene, choice } => {
                write!(f, "scene '{scene}' has no response for choice '{choice}'")
            }
            EngineError::ChoiceAlreadyResolved { scene } => {
                write!(f, "scene '{scene}' was already resolved")
            }
            EngineError::NoPendingResponse => {
                write!(f, "no resolved choice is waiting to be dismissed")
            }
            EngineError::CursorOutOfBounds { index, len } => {
                write!(f, "scene cursor {index} out of bounds (sequence length {len})")
            }
        }
    }
}

/// Outcome of resolving a choice: the new state plus the feedback the
/// presentation layer should show before dismissal.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub state: GameState,
    /// The raw response record (quote, badge id, message templates).
    pub response: Response,
    /// Fully resolved display message: habit override applied, `{name}`
    /// substituted.
    pub message: String,
}

fn expect_phase(state: &GameState, expected: GamePhase) -> Result<(), EngineError> {
    if state.phase == expected {
        Ok(())
    } else {
        Err(EngineError::InvalidPhase {
            expected,
            found: state.phase,
        })
    }
}

/// Welcome → Name.
pub fn start(state: &GameState) -> Result<GameState, EngineError> {
    expect_phase(state, GamePhase::Welcome)?;
    let mut next = state.clone();
    next.phase = GamePhase::Name;
    Ok(next)
}

/// Name → Habits. Stores the trimmed player name.
pub fn submit_name(state: &GameState, name: &str) -> Result<GameState, EngineError> {
    expect_phase(state, GamePhase::Name)?;
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(EngineError::EmptyPlayerName);
    }
    let mut next = state.clone();
    next.player_name = trimmed.to_string();
    next.phase = GamePhase::Habits;
    Ok(next)
}

/// Habits → BubbleIntro. Fixes the habit selection and computes the
/// session's scene sequence exactly once.
pub fn submit_habits(
    state: &GameState,
    habits: &[Habit],
    catalog: &Catalog,
) -> Result<GameState, EngineError> {
    expect_phase(state, GamePhase::Habits)?;
    if habits.is_empty() {
        return Err(EngineError::EmptyHabitSelection);
    }

    // Ordered set: first occurrence wins, order preserved.
    let mut selected = Vec::new();
    for &habit in habits {
        if !selected.contains(&habit) {
            selected.push(habit);
        }
    }

    let filtered = filter_scenes(&catalog.scenes, &selected);
    let first_day = match filtered.first() {
        Some(scene) => scene.day,
        None => return Err(EngineError::NoScenesAfterFilter),
    };

    let mut next = state.clone();
    next.selected_habits = selected;
    next.filtered_scenes = filtered;
    next.current_scene_index = 0;
    next.current_day = first_day;
    next.day_progress = 0.0;
    next.phase = GamePhase::BubbleIntro;
    Ok(next)
}

/// BubbleIntro → Playing.
pub fn start_playing(state: &GameState) -> Result<GameState, EngineError> {
    expect_phase(state, GamePhase::BubbleIntro)?;
    let mut next = state.clone();
    next.phase = GamePhase::Playing;
    Ok(next)
}

/// Resolve a choice on the current scene.
///
/// Validates that the choice actually belongs to the scene and that
/// the scene has not been resolved already, then applies the score
/// deltas (bubble clamped to `[-10, 10]`), awards the badge at most
/// once, appends to the choice log, and recomputes day progress.
/// The phase stays `Playing`; advancing happens on dismissal.
pub fn resolve_choice(
    state: &GameState,
    choice: &Choice,
) -> Result<Resolution, EngineError> {
    expect_phase(state, GamePhase::Playing)?;
    let scene = state
        .current_scene()
        .ok_or(EngineError::CursorOutOfBounds {
            index: state.current_scene_index,
            len: state.filtered_scenes.len(),
        })?;

    if let Some(last) = state.choices.last() {
        if last.scene_id == scene.id {
            return Err(EngineError::ChoiceAlreadyResolved {
                scene: scene.id.clone(),
            });
        }
    }

    // Trust the scene's own copy of the choice, not the caller's.
    let owned = scene.choice(&choice.id).ok_or_else(|| EngineError::UnknownChoice {
        scene: scene.id.clone(),
        choice: choice.id.clone(),
    })?;
    let response = scene
        .responses
        .get(&owned.id)
        .ok_or_else(|| EngineError::MissingResponse {
            scene: scene.id.clone(),
            choice: owned.id.clone(),
        })?
        .clone();

    let record = ChoiceRecord {
        scene_id: scene.id.clone(),
        choice_id: owned.id.clone(),
        category: owned.category,
    };
    let points = owned.points;
    let bubble_effect = owned.bubble_effect;

    let mut next = state.clone();
    next.points += points;
    next.bubble_score = (next.bubble_score + bubble_effect).clamp(BUBBLE_MIN, BUBBLE_MAX);
    if let Some(badge) = &response.badge {
        if !next.badges.contains(badge) {
            next.badges.push(badge.clone());
        }
    }
    next.choices.push(record);
    next.day_progress = day_progress_at(&next.filtered_scenes, next.current_scene_index);

    let message = resolve_message(&response, &next.selected_habits, &next.player_name);
    Ok(Resolution {
        state: next,
        response,
        message,
    })
}

/// Dismiss the feedback for the resolved current scene and advance.
///
/// - Last scene resolved → `Reflection`.
/// - Next scene is on a new day → `DayEnd`, cursor not advanced yet.
/// - Otherwise → advance within the day, stay `Playing`.
pub fn dismiss_response(state: &GameState) -> Result<GameState, EngineError> {
    expect_phase(state, GamePhase::Playing)?;
    let scene = state
        .current_scene()
        .ok_or(EngineError::CursorOutOfBounds {
            index: state.current_scene_index,
            len: state.filtered_scenes.len(),
        })?;

    let resolved = state
        .choices
        .last()
        .is_some_and(|last| last.scene_id == scene.id);
    if !resolved {
        return Err(EngineError::NoPendingResponse);
    }

    let mut next = state.clone();
    let next_index = state.current_scene_index + 1;
    if next_index >= state.filtered_scenes.len() {
        next.phase = GamePhase::Reflection;
    } else if state.filtered_scenes[next_index].day != scene.day {
        next.phase = GamePhase::DayEnd;
    } else {
        next.current_scene_index = next_index;
    }
    Ok(next)
}

/// DayEnd → Playing: step onto the next day's first scene.
pub fn continue_next_day(state: &GameState) -> Result<GameState, EngineError> {
    expect_phase(state, GamePhase::DayEnd)?;
    let next_index = state.current_scene_index + 1;
    let scene = state
        .filtered_scenes
        .get(next_index)
        .ok_or(EngineError::CursorOutOfBounds {
            index: next_index,
            len: state.filtered_scenes.len(),
        })?;

    let mut next = state.clone();
    next.current_scene_index = next_index;
    next.current_day = scene.day;
    next.day_progress = 0.0;
    next.phase = GamePhase::Playing;
    Ok(next)
}

/// DayEnd → Reflection: the player stops early after a completed day.
pub fn end_game(state: &GameState) -> Result<GameState, EngineError> {
    expect_phase(state, GamePhase::DayEnd)?;
    let mut next = state.clone();
    next.phase = GamePhase::Reflection;
    Ok(next)
}

/// Reflection → Results.
pub fn view_results(state: &GameState) -> Result<GameState, EngineError> {
    expect_phase(state, GamePhase::Reflection)?;
    let mut next = state.clone();
    next.phase = GamePhase::Results;
    Ok(next)
}

/// Full reset: identical to a brand-new session.
pub fn restart() -> GameState {
    initial_game_state()
}

/// Resolve the display message for a response: the first selected habit
/// (in selection order) with a non-empty override wins, then `{name}`
/// is substituted.
pub fn resolve_message(
    response: &Response,
    selected_habits: &[Habit],
    player_name: &str,
) -> String {
    let template = selected_habits
        .iter()
        .find_map(|habit| {
            response
                .habit_messages
                .get(habit)
                .filter(|message| !message.is_empty())
        })
        .unwrap_or(&response.message);
    template.replace("{name}", player_name)
}

/// Progress through the current day's scene block after resolving the
/// scene at `index`: `(position within block + 1) / block size`.
/// Defined as 0 when the block is empty.
fn day_progress_at(scenes: &[crate::catalog::Scene], index: usize) -> f32 {
    let Some(current) = scenes.get(index) else {
        return 0.0;
    };
    let block_size = scenes.iter().filter(|s| s.day == current.day).count();
    if block_size == 0 {
        return 0.0;
    }
    let position = scenes[..=index]
        .iter()
        .filter(|s| s.day == current.day)
        .count();
    position as f32 / block_size as f32
}
