//! Balance Quest Headless Session Harness
//!
//! Validates pure game logic and shipped content without a UI.
//! Runs entirely in-process — no terminal prompts, no rendering.
//!
//! Usage:
//!   cargo run -p balquest-simtest
//!   cargo run -p balquest-simtest -- --verbose

use balquest_logic::catalog::{self, Catalog, ChoiceCategory};
use balquest_logic::engine::{self, EngineError};
use balquest_logic::filter::{filter_scenes, EYE_OPENER_THRESHOLD, PASS_THROUGH_THRESHOLD};
use balquest_logic::habits::Habit;
use balquest_logic::insights::{self, BubbleState};
use balquest_logic::state::{
    initial_game_state, GamePhase, GameState, BUBBLE_MAX, BUBBLE_MIN, BUBBLE_START,
};

// ── Content catalog (same JSON the CLI ships) ───────────────────────────
const CATALOG_JSON: &str = include_str!("../../../data/catalog.json");

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn main() {
    let verbose = std::env::args().any(|a| a == "--verbose");
    println!("=== Balance Quest Session Harness ===\n");

    let catalog: Catalog = match serde_json::from_str(CATALOG_JSON) {
        Ok(c) => c,
        Err(e) => {
            println!("✗ catalog_parse: JSON parse error: {}", e);
            std::process::exit(1);
        }
    };

    let mut results = Vec::new();

    // 1. Content catalog integrity
    results.extend(validate_catalog(&catalog, verbose));

    // 2. Habit filter sweep
    results.extend(validate_filter(&catalog, verbose));

    // 3. Full sessions, one per habit
    results.extend(validate_full_sessions(&catalog, verbose));

    // 4. Scroll-heavy session: bubble decay, insights, mood bands
    results.extend(validate_scroll_session(&catalog, verbose));

    // 5. Early exit at a day boundary
    results.extend(validate_early_exit(&catalog, verbose));

    // 6. Rejection paths
    results.extend(validate_rejections(&catalog, verbose));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

// ── 1. Content Catalog ──────────────────────────────────────────────────

fn validate_catalog(catalog: &Catalog, verbose: bool) -> Vec<TestResult> {
    println!("--- Content Catalog ---");
    let mut results = Vec::new();

    let errors = catalog::validate(catalog);
    results.push(TestResult {
        name: "catalog_integrity".into(),
        passed: errors.is_empty(),
        detail: if errors.is_empty() {
            "no integrity problems".into()
        } else {
            format!("{} problems: {:?}", errors.len(), errors)
        },
    });

    results.push(TestResult {
        name: "catalog_scene_count".into(),
        passed: catalog.scenes.len() == 16,
        detail: format!("{} scenes loaded", catalog.scenes.len()),
    });

    // Three days, each anchored by at least one core scene.
    let mut day_ok = true;
    let mut day_detail = Vec::new();
    for day in 1..=3u8 {
        let scenes = catalog.scenes_for_day(day);
        let cores = scenes.iter().filter(|s| s.is_core).count();
        day_ok &= !scenes.is_empty() && cores > 0;
        day_detail.push(format!("day{}={}({}core)", day, scenes.len(), cores));
    }
    results.push(TestResult {
        name: "catalog_day_structure".into(),
        passed: day_ok,
        detail: day_detail.join(" "),
    });

    // Every habit is relevant to at least one non-core scene, so every
    // selection personalizes the route.
    let uncovered: Vec<_> = Habit::all()
        .into_iter()
        .filter(|h| {
            !catalog
                .scenes
                .iter()
                .any(|s| !s.is_core && s.relevant_habits.contains(h))
        })
        .collect();
    results.push(TestResult {
        name: "catalog_habit_coverage".into(),
        passed: uncovered.is_empty(),
        detail: if uncovered.is_empty() {
            "every habit matches at least one optional scene".into()
        } else {
            format!("habits with no optional scene: {:?}", uncovered)
        },
    });

    // Every category appears somewhere, otherwise insights can never fire.
    let missing_categories: Vec<_> = ChoiceCategory::all()
        .into_iter()
        .filter(|cat| {
            !catalog
                .scenes
                .iter()
                .flat_map(|s| &s.choices)
                .any(|c| c.category == *cat)
        })
        .collect();
    results.push(TestResult {
        name: "catalog_category_coverage".into(),
        passed: missing_categories.is_empty(),
        detail: if missing_categories.is_empty() {
            "all five categories represented".into()
        } else {
            format!("unused categories: {:?}", missing_categories)
        },
    });

    // Some badge must be reachable through a response.
    let awardable = catalog
        .scenes
        .iter()
        .flat_map(|s| s.responses.values())
        .filter_map(|r| r.badge.as_ref())
        .count();
    results.push(TestResult {
        name: "catalog_badges_reachable".into(),
        passed: awardable > 0,
        detail: format!("{} responses award a badge", awardable),
    });

    // Timed alerts carry positive delays.
    let bad_alerts = catalog
        .scenes
        .iter()
        .filter_map(|s| s.timed_alert.as_ref())
        .filter(|a| a.delay_seconds == 0 || a.message.is_empty())
        .count();
    results.push(TestResult {
        name: "catalog_alerts_sane".into(),
        passed: bad_alerts == 0,
        detail: format!("{} malformed timed alerts", bad_alerts),
    });

    if verbose {
        println!("  Scenes per day:");
        for day in 1..=3u8 {
            let ids: Vec<_> = catalog
                .scenes_for_day(day)
                .iter()
                .map(|s| s.id.clone())
                .collect();
            println!("    day {}: {}", day, ids.join(", "));
        }
    }

    results
}

// ── 2. Habit Filter ─────────────────────────────────────────────────────

fn validate_filter(catalog: &Catalog, verbose: bool) -> Vec<TestResult> {
    println!("--- Habit Filter ---");
    let mut results = Vec::new();

    // Single-habit sweep: every route keeps the core scenes, stays in
    // day order, and (at most EYE_OPENER_THRESHOLD habits) carries at
    // least one scene outside the selection.
    for habit in Habit::all() {
        let route = filter_scenes(&catalog.scenes, &[habit]);
        let cores = catalog.core_scenes().len();
        let kept_cores = route.iter().filter(|s| s.is_core).count();
        let ordered = route.windows(2).all(|w| w[0].day <= w[1].day);
        let has_eye_opener = route
            .iter()
            .any(|s| !s.is_core && !s.relevant_habits.contains(&habit));
        results.push(TestResult {
            name: format!("filter_single_{}", habit.id()),
            passed: kept_cores == cores && ordered && has_eye_opener,
            detail: format!(
                "{} scenes, cores {}/{}, ordered={}, eye_opener={}",
                route.len(),
                kept_cores,
                cores,
                ordered,
                has_eye_opener
            ),
        });
    }

    // At or above the pass-through threshold the full sequence survives.
    let broad: Vec<Habit> = Habit::all()
        .into_iter()
        .take(PASS_THROUGH_THRESHOLD)
        .collect();
    let route = filter_scenes(&catalog.scenes, &broad);
    results.push(TestResult {
        name: "filter_pass_through".into(),
        passed: route.len() == catalog.scenes.len(),
        detail: format!(
            "{} habits keep {}/{} scenes",
            broad.len(),
            route.len(),
            catalog.scenes.len()
        ),
    });

    // A pair selection stays below pass-through but above core-only.
    let pair = [Habit::LessPhone, Habit::SleepOnTime];
    let route = filter_scenes(&catalog.scenes, &pair);
    let cores = catalog.core_scenes().len();
    results.push(TestResult {
        name: "filter_pair_selective".into(),
        passed: route.len() > cores && route.len() < catalog.scenes.len(),
        detail: format!(
            "pair keeps {} scenes (cores {}, total {})",
            route.len(),
            cores,
            catalog.scenes.len()
        ),
    });

    // Eye-opener only rides along for narrow selections.
    let three: Vec<Habit> = Habit::all().into_iter().take(EYE_OPENER_THRESHOLD + 1).collect();
    let route = filter_scenes(&catalog.scenes, &three);
    let strays = route
        .iter()
        .filter(|s| !s.is_core && !s.relevant_habits.iter().any(|h| three.contains(h)))
        .count();
    results.push(TestResult {
        name: "filter_no_eye_opener_above_threshold".into(),
        passed: strays == 0,
        detail: format!("{} non-matching optional scenes with {} habits", strays, three.len()),
    });

    if verbose {
        for habit in Habit::all() {
            let route = filter_scenes(&catalog.scenes, &[habit]);
            println!("  {:14} -> {} scenes", habit.id(), route.len());
        }
    }

    results
}

// ── 3. Full Sessions ────────────────────────────────────────────────────

/// Drive a session end to end, picking choices with `pick`, and check
/// the step invariants the whole way. Returns the final Results state.
fn drive_session(
    catalog: &Catalog,
    habits: &[Habit],
    pick: impl Fn(&GameState) -> usize,
    results: &mut Vec<TestResult>,
    tag: &str,
) -> Option<GameState> {
    let state = initial_game_state();
    let state = match engine::start(&state)
        .and_then(|s| engine::submit_name(&s, "Harness"))
        .and_then(|s| engine::submit_habits(&s, habits, catalog))
        .and_then(|s| engine::start_playing(&s))
    {
        Ok(s) => s,
        Err(e) => {
            results.push(TestResult {
                name: format!("{}_onboarding", tag),
                passed: false,
                detail: format!("onboarding failed: {}", e),
            });
            return None;
        }
    };

    let route_len = state.filtered_scenes.len();
    let mut state = state;
    let mut steps = 0usize;
    let mut invariants_ok = true;
    let mut detail = String::new();

    loop {
        steps += 1;
        if steps > route_len + 1 {
            invariants_ok = false;
            detail = "session did not terminate".into();
            break;
        }

        let index = pick(&state);
        let choice = match state.current_scene() {
            Some(scene) => scene.choices[index % scene.choices.len()].clone(),
            None => {
                invariants_ok = false;
                detail = "cursor out of bounds mid-session".into();
                break;
            }
        };
        state = match engine::resolve_choice(&state, &choice) {
            Ok(resolution) => {
                if resolution.message.contains("{name}") {
                    invariants_ok = false;
                    detail = format!("unsubstituted template: {}", resolution.message);
                    break;
                }
                resolution.state
            }
            Err(e) => {
                invariants_ok = false;
                detail = format!("resolve failed: {}", e);
                break;
            }
        };

        if !(BUBBLE_MIN..=BUBBLE_MAX).contains(&state.bubble_score)
            || !(0.0..=1.0).contains(&state.day_progress)
            || state.choices.len() != steps
        {
            invariants_ok = false;
            detail = format!(
                "invariant broken at step {}: bubble={} progress={} log={}",
                steps,
                state.bubble_score,
                state.day_progress,
                state.choices.len()
            );
            break;
        }

        state = match engine::dismiss_response(&state) {
            Ok(s) => s,
            Err(e) => {
                invariants_ok = false;
                detail = format!("dismiss failed: {}", e);
                break;
            }
        };
        match state.phase {
            GamePhase::Playing => {}
            GamePhase::DayEnd => match engine::continue_next_day(&state) {
                Ok(s) => state = s,
                Err(e) => {
                    invariants_ok = false;
                    detail = format!("day continue failed: {}", e);
                    break;
                }
            },
            GamePhase::Reflection => break,
            other => {
                invariants_ok = false;
                detail = format!("unexpected phase {:?}", other);
                break;
            }
        }
    }

    let completed = invariants_ok && state.phase == GamePhase::Reflection;
    results.push(TestResult {
        name: format!("{}_playthrough", tag),
        passed: completed && state.choices.len() == route_len,
        detail: if completed {
            format!(
                "{} scenes resolved, points={} bubble={}",
                state.choices.len(),
                state.points,
                state.bubble_score
            )
        } else {
            detail
        },
    });

    engine::view_results(&state).ok()
}

fn validate_full_sessions(catalog: &Catalog, verbose: bool) -> Vec<TestResult> {
    println!("--- Full Sessions ---");
    let mut results = Vec::new();

    for habit in Habit::all() {
        let tag = format!("session_{}", habit.id());
        if let Some(final_state) =
            drive_session(catalog, &[habit], |_| 0, &mut results, &tag)
        {
            // Shipped content only has non-negative point deltas.
            let badge_unique = {
                let mut seen = Vec::new();
                final_state.badges.iter().all(|b| {
                    let fresh = !seen.contains(b);
                    seen.push(b.clone());
                    fresh
                })
            };
            results.push(TestResult {
                name: format!("{}_final_state", tag),
                passed: final_state.phase == GamePhase::Results
                    && final_state.points >= 0
                    && badge_unique,
                detail: format!(
                    "points={} badges={:?}",
                    final_state.points, final_state.badges
                ),
            });
            if verbose {
                let stats = insights::calculate_stats(&final_state.choices);
                println!(
                    "  {:14} rest={} work={} social={} scroll={} neutral={}",
                    habit.id(),
                    stats.rest,
                    stats.work,
                    stats.social,
                    stats.scroll,
                    stats.neutral
                );
            }
        }
    }

    // Restart from Results is a full reset.
    results.push(TestResult {
        name: "restart_resets_everything".into(),
        passed: engine::restart() == initial_game_state(),
        detail: "restart state equals initial state".into(),
    });

    results
}

// ── 4. Scroll-Heavy Session ─────────────────────────────────────────────

fn validate_scroll_session(catalog: &Catalog, _verbose: bool) -> Vec<TestResult> {
    println!("--- Scroll-Heavy Session ---");
    let mut results = Vec::new();

    // Prefer scroll choices, fall back to the first option.
    let pick = |state: &GameState| -> usize {
        state
            .current_scene()
            .and_then(|scene| {
                scene
                    .choices
                    .iter()
                    .position(|c| c.category == ChoiceCategory::Scroll)
            })
            .unwrap_or(0)
    };

    if let Some(final_state) = drive_session(
        catalog,
        &[Habit::LessPhone],
        pick,
        &mut results,
        "session_scroll_heavy",
    ) {
        let stats = insights::calculate_stats(&final_state.choices);
        results.push(TestResult {
            name: "scroll_choices_taken".into(),
            passed: stats.scroll >= 3,
            detail: format!("{} scroll choices on the less-phone route", stats.scroll),
        });

        // Scrolling drags the bubble below its start.
        results.push(TestResult {
            name: "scroll_bubble_decays".into(),
            passed: final_state.bubble_score < BUBBLE_START,
            detail: format!(
                "bubble {} after scroll-heavy run (start {})",
                final_state.bubble_score, BUBBLE_START
            ),
        });

        let insights = insights::pattern_insights(&final_state.choices);
        results.push(TestResult {
            name: "scroll_insight_fires".into(),
            passed: !insights.is_empty()
                && insights.len() <= 3
                && insights[0].contains("phone"),
            detail: format!("{:?}", insights),
        });

        let band = BubbleState::from_score(final_state.bubble_score);
        results.push(TestResult {
            name: "scroll_band_consistent".into(),
            passed: !band.label().is_empty()
                && BubbleState::from_score(BUBBLE_MAX) == BubbleState::Energetic
                && BubbleState::from_score(BUBBLE_MIN) == BubbleState::OutOfBalance,
            detail: format!("final band: {}", band.label()),
        });
    }

    results
}

// ── 5. Early Exit ───────────────────────────────────────────────────────

fn validate_early_exit(catalog: &Catalog, _verbose: bool) -> Vec<TestResult> {
    println!("--- Early Exit ---");
    let mut results = Vec::new();

    let state = initial_game_state();
    let session = engine::start(&state)
        .and_then(|s| engine::submit_name(&s, "Harness"))
        .and_then(|s| engine::submit_habits(&s, &[Habit::MoreExercise], catalog))
        .and_then(|s| engine::start_playing(&s));
    let mut state = match session {
        Ok(s) => s,
        Err(e) => {
            results.push(TestResult {
                name: "early_exit_onboarding".into(),
                passed: false,
                detail: format!("onboarding failed: {}", e),
            });
            return results;
        }
    };

    // Play to the first day boundary, then stop.
    let mut day_one_scenes = 0usize;
    let outcome = loop {
        let choice = match state.current_scene() {
            Some(scene) => scene.choices[0].clone(),
            None => break Err("cursor out of bounds".to_string()),
        };
        state = match engine::resolve_choice(&state, &choice) {
            Ok(r) => r.state,
            Err(e) => break Err(format!("resolve failed: {}", e)),
        };
        day_one_scenes += 1;
        state = match engine::dismiss_response(&state) {
            Ok(s) => s,
            Err(e) => break Err(format!("dismiss failed: {}", e)),
        };
        match state.phase {
            GamePhase::Playing => {}
            GamePhase::DayEnd => break Ok(()),
            other => break Err(format!("unexpected phase {:?}", other)),
        }
    };

    results.push(TestResult {
        name: "early_exit_reaches_day_end".into(),
        passed: outcome.is_ok(),
        detail: match &outcome {
            Ok(()) => format!("day boundary after {} scenes", day_one_scenes),
            Err(e) => e.clone(),
        },
    });
    if outcome.is_err() {
        return results;
    }

    let ended = engine::end_game(&state).and_then(|s| engine::view_results(&s));
    match ended {
        Ok(final_state) => {
            let insights = insights::pattern_insights(&final_state.choices);
            results.push(TestResult {
                name: "early_exit_results_over_partial_log".into(),
                passed: final_state.phase == GamePhase::Results
                    && final_state.choices.len() == day_one_scenes
                    && insights.len() <= 3,
                detail: format!(
                    "{} choices logged, {} insights",
                    final_state.choices.len(),
                    insights.len()
                ),
            });
        }
        Err(e) => {
            results.push(TestResult {
                name: "early_exit_results_over_partial_log".into(),
                passed: false,
                detail: format!("end_game/view_results failed: {}", e),
            });
        }
    }

    results
}

// ── 6. Rejection Paths ──────────────────────────────────────────────────

fn validate_rejections(catalog: &Catalog, _verbose: bool) -> Vec<TestResult> {
    println!("--- Rejection Paths ---");
    let mut results = Vec::new();

    let welcome = initial_game_state();
    results.push(TestResult {
        name: "reject_out_of_phase".into(),
        passed: matches!(
            engine::submit_name(&welcome, "Harness"),
            Err(EngineError::InvalidPhase { .. })
        ) && matches!(
            engine::dismiss_response(&welcome),
            Err(EngineError::InvalidPhase { .. })
        ),
        detail: "non-welcome operations rejected at welcome".into(),
    });

    let named = engine::start(&welcome).and_then(|s| engine::submit_name(&s, "   "));
    results.push(TestResult {
        name: "reject_blank_name".into(),
        passed: named == Err(EngineError::EmptyPlayerName),
        detail: format!("{:?}", named.err()),
    });

    let no_habits = engine::start(&welcome)
        .and_then(|s| engine::submit_name(&s, "Harness"))
        .and_then(|s| engine::submit_habits(&s, &[], catalog));
    results.push(TestResult {
        name: "reject_empty_habit_selection".into(),
        passed: no_habits == Err(EngineError::EmptyHabitSelection),
        detail: format!("{:?}", no_habits.err()),
    });

    let playing = engine::start(&welcome)
        .and_then(|s| engine::submit_name(&s, "Harness"))
        .and_then(|s| engine::submit_habits(&s, &[Habit::LessPhone], catalog))
        .and_then(|s| engine::start_playing(&s));
    match playing {
        Ok(state) => {
            let foreign = balquest_logic::catalog::Choice {
                id: "no-such-choice".into(),
                label: "Foreign".into(),
                subtext: String::new(),
                category: ChoiceCategory::Rest,
                points: 5,
                bubble_effect: 1,
            };
            let rejected = engine::resolve_choice(&state, &foreign);
            results.push(TestResult {
                name: "reject_foreign_choice".into(),
                passed: matches!(rejected, Err(EngineError::UnknownChoice { .. })),
                detail: format!("{:?}", rejected.err()),
            });

            results.push(TestResult {
                name: "reject_dismiss_without_resolve".into(),
                passed: engine::dismiss_response(&state) == Err(EngineError::NoPendingResponse),
                detail: "dismissal requires a resolved choice".into(),
            });

            let first = match state.current_scene() {
                Some(scene) => scene.choices[0].clone(),
                None => {
                    results.push(TestResult {
                        name: "reject_double_resolve".into(),
                        passed: false,
                        detail: "cursor out of bounds".into(),
                    });
                    return results;
                }
            };
            match engine::resolve_choice(&state, &first) {
                Ok(resolution) => {
                    let again = engine::resolve_choice(&resolution.state, &first);
                    results.push(TestResult {
                        name: "reject_double_resolve".into(),
                        passed: matches!(
                            again,
                            Err(EngineError::ChoiceAlreadyResolved { .. })
                        ),
                        detail: format!("{:?}", again.err()),
                    });
                }
                Err(e) => {
                    results.push(TestResult {
                        name: "reject_double_resolve".into(),
                        passed: false,
                        detail: format!("first resolve failed: {}", e),
                    });
                }
            }
        }
        Err(e) => {
            results.push(TestResult {
                name: "reject_paths_setup".into(),
                passed: false,
                detail: format!("onboarding failed: {}", e),
            });
        }
    }

    results
}
