//! Pure game logic for Balance Quest.
//!
//! Balance Quest is a branching-choice story: over three simulated
//! days the player resolves everyday scenes, and each choice nudges a
//! bounded mood score (the "bubble"), a points total, and a badge set.
//! This crate is the whole engine — a content catalog shape, a habit
//! filter, a phase state machine, and read-only insight derivations —
//! with no UI, no I/O, no clocks, and no randomness. Functions take
//! plain data and return results, making them unit-testable and
//! portable across any front-end.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`habits`] | The closed set of player-selectable goals |
//! | [`catalog`] | Scenes, choices, responses, badges + integrity audit |
//! | [`filter`] | Habit-based scene selection (core scenes, eye-opener) |
//! | [`state`] | The session aggregate and phase vocabulary |
//! | [`engine`] | Pure transition reducers: onboarding, play loop, reset |
//! | [`insights`] | Category stats, pattern observations, mood bands |
//!
//! A session is driven entirely by the presentation layer calling
//! [`engine`] functions with typed events:
//!
//! ```
//! use balquest_logic::engine;
//! use balquest_logic::habits::Habit;
//! use balquest_logic::state::{initial_game_state, GamePhase};
//! # use std::collections::BTreeMap;
//! # use balquest_logic::catalog::{Catalog, Choice, ChoiceCategory, Response, Scene};
//! # let mut responses = BTreeMap::new();
//! # responses.insert("go".to_string(), Response { message: "Done, {name}.".into(), ..Response::default() });
//! # let catalog = Catalog {
//! #     scenes: vec![Scene {
//! #         id: "first".into(), day: 1, is_core: true, time: None, location: None,
//! #         intro: String::new(), text: "A scene.".into(), relevant_habits: vec![],
//! #         timed_alert: None,
//! #         choices: vec![Choice { id: "go".into(), label: "Go".into(), subtext: String::new(),
//! #                                category: ChoiceCategory::Rest, points: 5, bubble_effect: 1 }],
//! #         responses,
//! #     }],
//! #     badges: vec![], quotes: vec![],
//! # };
//!
//! let state = initial_game_state();
//! let state = engine::start(&state).unwrap();
//! let state = engine::submit_name(&state, "Sam").unwrap();
//! let state = engine::submit_habits(&state, &[Habit::LessPhone], &catalog).unwrap();
//! let state = engine::start_playing(&state).unwrap();
//!
//! let choice = state.current_scene().unwrap().choices[0].clone();
//! let resolution = engine::resolve_choice(&state, &choice).unwrap();
//! assert_eq!(resolution.message, "Done, Sam.");
//!
//! let state = engine::dismiss_response(&resolution.state).unwrap();
//! assert_eq!(state.phase, GamePhase::Reflection);
//! ```

pub mod catalog;
pub mod engine;
pub mod filter;
pub mod habits;
pub mod insights;
pub mod state;
