//! Balance Quest terminal front-end.
//!
//! All game rules live in `balquest-logic`; this binary only renders
//! state and feeds typed events back into the engine. The content
//! catalog is compiled in and validated before the first screen.

use std::fmt;
use std::io::{self, BufRead, Write};

use balquest_logic::catalog::{self, Catalog, Scene, TimedAlert};
use balquest_logic::engine::{self, EngineError};
use balquest_logic::habits::Habit;
use balquest_logic::insights::{self, BubbleState};
use balquest_logic::state::{
    initial_game_state, GamePhase, GameState, BUBBLE_MAX, BUBBLE_MIN,
};
use rand::seq::SliceRandom;

const CATALOG_JSON: &str = include_str!("../../../data/catalog.json");

#[derive(Debug)]
enum CliError {
    Io(io::Error),
    Content(String),
    Engine(EngineError),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Io(e) => write!(f, "terminal I/O failed: {}", e),
            CliError::Content(msg) => write!(f, "broken content catalog: {}", msg),
            CliError::Engine(e) => write!(f, "engine rejected a transition: {}", e),
        }
    }
}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        CliError::Io(e)
    }
}

impl From<EngineError> for CliError {
    fn from(e: EngineError) -> Self {
        CliError::Engine(e)
    }
}

fn main() {
    if let Err(e) = run() {
        eprintln!("balquest: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), CliError> {
    let catalog: Catalog = serde_json::from_str(CATALOG_JSON)
        .map_err(|e| CliError::Content(format!("JSON parse error: {}", e)))?;
    let problems = catalog::validate(&catalog);
    if !problems.is_empty() {
        return Err(CliError::Content(format!("{:?}", problems)));
    }

    let stdin = io::stdin();
    let mut input = stdin.lock();

    loop {
        let again = play_session(&catalog, &mut input)?;
        if !again {
            break;
        }
    }
    println!("\nBye! Take care of your bubble.");
    Ok(())
}

/// One complete session, welcome through results. Returns whether the
/// player asked to go again.
fn play_session(catalog: &Catalog, input: &mut impl BufRead) -> Result<bool, CliError> {
    let mut state = initial_game_state();

    show_welcome();
    wait_for_enter(input, "Press Enter to begin")?;
    state = engine::start(&state)?;

    state = read_name(&state, input)?;
    state = read_habits(&state, catalog, input)?;

    show_bubble_intro(&state);
    wait_for_enter(input, "Press Enter when you're ready")?;
    state = engine::start_playing(&state)?;

    loop {
        match state.phase {
            GamePhase::Playing => {
                state = play_scene(&state, catalog, input)?;
            }
            GamePhase::DayEnd => {
                show_day_end(&state);
                if ask_yes_no(input, "Continue to the next day? [y/n]")? {
                    state = engine::continue_next_day(&state)?;
                } else {
                    state = engine::end_game(&state)?;
                }
            }
            GamePhase::Reflection => {
                show_reflection(&state);
                wait_for_enter(input, "Press Enter to see your results")?;
                state = engine::view_results(&state)?;
            }
            GamePhase::Results => {
                show_results(&state, catalog);
                return ask_yes_no(input, "Play again? [y/n]");
            }
            other => {
                return Err(CliError::Engine(EngineError::InvalidPhase {
                    expected: GamePhase::Playing,
                    found: other,
                }))
            }
        }
    }
}

// ── Onboarding screens ──────────────────────────────────────────────────

fn show_welcome() {
    println!("╔══════════════════════════════════╗");
    println!("║          BALANCE QUEST           ║");
    println!("║   three days, your choices       ║");
    println!("╚══════════════════════════════════╝");
    println!();
    println!("Over the next three (simulated) days you'll run into everyday");
    println!("situations. Every choice nudges your balance bubble.");
    println!();
}

fn read_name(state: &GameState, input: &mut impl BufRead) -> Result<GameState, CliError> {
    loop {
        let name = prompt(input, "What's your name?")?;
        match engine::submit_name(state, &name) {
            Ok(next) => return Ok(next),
            Err(EngineError::EmptyPlayerName) => {
                println!("A name helps the story talk to you. Try again.");
            }
            Err(e) => return Err(e.into()),
        }
    }
}

fn read_habits(
    state: &GameState,
    catalog: &Catalog,
    input: &mut impl BufRead,
) -> Result<GameState, CliError> {
    println!("\nHi {}! What would you like to work on?", state.player_name);
    for (i, habit) in Habit::all().iter().enumerate() {
        println!("  {}. {}", i + 1, habit.label());
    }
    loop {
        let line = prompt(input, "Pick one or more (e.g. 1,3):")?;
        let picked: Vec<Habit> = line
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter_map(|tok| tok.parse::<usize>().ok())
            .filter_map(|n| Habit::all().get(n.wrapping_sub(1)).copied())
            .collect();
        match engine::submit_habits(state, &picked, catalog) {
            Ok(next) => return Ok(next),
            Err(EngineError::EmptyHabitSelection) => {
                println!("That didn't match any goal. Use the numbers above.");
            }
            Err(e) => return Err(e.into()),
        }
    }
}

fn show_bubble_intro(state: &GameState) {
    println!("\nThis is your balance bubble:");
    println!("{}", bubble_meter(state.bubble_score));
    println!("It grows when your choices feed you, and shrinks when they");
    println!("drain you. There are no wrong answers, only honest ones.");
    println!(
        "\nYour route has {} scenes across {} days.",
        state.filtered_scenes.len(),
        state
            .filtered_scenes
            .last()
            .map(|s| s.day)
            .unwrap_or(state.current_day)
    );
}

// ── Play loop ───────────────────────────────────────────────────────────

fn play_scene(
    state: &GameState,
    catalog: &Catalog,
    input: &mut impl BufRead,
) -> Result<GameState, CliError> {
    let scene = state
        .current_scene()
        .ok_or(EngineError::CursorOutOfBounds {
            index: state.current_scene_index,
            len: state.filtered_scenes.len(),
        })?
        .clone();

    show_scene(&scene, state.current_day);
    if let Some(alert) = &scene.timed_alert {
        show_alert(alert);
    }

    for (i, choice) in scene.choices.iter().enumerate() {
        println!("  {}. {}", i + 1, choice.label);
        if !choice.subtext.is_empty() {
            println!("     {}", choice.subtext);
        }
    }

    let choice = loop {
        let line = prompt(input, "Your choice:")?;
        let picked = line
            .trim()
            .parse::<usize>()
            .ok()
            .and_then(|n| scene.choices.get(n.wrapping_sub(1)));
        match picked {
            Some(c) => break c.clone(),
            None => println!("Pick a number between 1 and {}.", scene.choices.len()),
        }
    };

    let badges_before = state.badges.len();
    let resolution = engine::resolve_choice(state, &choice)?;

    println!("\n{}", resolution.message);
    if let Some(quote) = &resolution.response.quote {
        println!("  » {}", quote);
    }
    if resolution.state.badges.len() > badges_before {
        if let Some(id) = resolution.state.badges.last() {
            if let Some(badge) = catalog.badge(id) {
                println!("\n  ★ Badge earned: {} — {}", badge.name, badge.description);
            }
        }
    }
    println!("\n{}", bubble_meter(resolution.state.bubble_score));

    wait_for_enter(input, "Press Enter to continue")?;
    Ok(engine::dismiss_response(&resolution.state)?)
}

fn show_scene(scene: &Scene, day: u8) {
    println!("\n────────────────────────────────────");
    let mut header = format!("Day {}", day);
    if let Some(time) = &scene.time {
        header.push_str(&format!(" · {}", time));
    }
    if let Some(location) = &scene.location {
        header.push_str(&format!(" · {}", location));
    }
    println!("{}", header);
    println!("────────────────────────────────────");
    if !scene.intro.is_empty() {
        println!("{}\n", scene.intro);
    }
    for paragraph in scene.paragraphs() {
        println!("{}\n", paragraph);
    }
}

fn show_alert(alert: &TimedAlert) {
    // The delay is a hint for animated front-ends; in a terminal the
    // bubble just chimes in before the choices.
    println!("  (your bubble) {}", alert.message);
    println!();
}

// ── End-of-day and results screens ──────────────────────────────────────

fn show_day_end(state: &GameState) {
    let band = BubbleState::from_score(state.bubble_score);
    println!("\n═══ End of day {} ═══", state.current_day);
    println!("Points so far: {}", state.points);
    println!("{}", bubble_meter(state.bubble_score));
    println!("{}", band.description());
}

fn show_reflection(state: &GameState) {
    let stats = insights::calculate_stats(&state.choices);
    println!("\n═══ Looking back, {} ═══", state.player_name);
    println!(
        "You made {} choices: {} rest, {} work, {} social, {} scrolling, {} neutral.",
        stats.total(),
        stats.rest,
        stats.work,
        stats.social,
        stats.scroll,
        stats.neutral
    );
    for insight in insights::pattern_insights(&state.choices) {
        println!("  • {}", insight);
    }
}

fn show_results(state: &GameState, catalog: &Catalog) {
    let band = BubbleState::from_score(state.bubble_score);
    println!("\n╔══════════════════════════════════╗");
    println!("║             RESULTS              ║");
    println!("╚══════════════════════════════════╝");
    println!("Points: {}", state.points);
    println!("Bubble: {} — {}", band.label(), band.description());
    println!("{}", bubble_meter(state.bubble_score));
    if state.badges.is_empty() {
        println!("No badges this time.");
    } else {
        println!("Badges:");
        for id in &state.badges {
            if let Some(badge) = catalog.badge(id) {
                println!("  ★ {} — {}", badge.name, badge.description);
            }
        }
    }
    if let Some(quote) = catalog.quotes.choose(&mut rand::thread_rng()) {
        println!("\n“{}”", quote);
    }
}

// ── Terminal helpers ────────────────────────────────────────────────────

fn bubble_meter(score: i32) -> String {
    let width = (BUBBLE_MAX - BUBBLE_MIN) as usize;
    let filled = (score - BUBBLE_MIN).clamp(0, width as i32) as usize;
    format!(
        "  [{}{}] {:+}",
        "●".repeat(filled),
        "·".repeat(width - filled),
        score
    )
}

fn prompt(input: &mut impl BufRead, label: &str) -> Result<String, CliError> {
    print!("{} ", label);
    io::stdout().flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn wait_for_enter(input: &mut impl BufRead, label: &str) -> Result<(), CliError> {
    let _ = prompt(input, label)?;
    Ok(())
}

fn ask_yes_no(input: &mut impl BufRead, label: &str) -> Result<bool, CliError> {
    loop {
        let answer = prompt(input, label)?.to_lowercase();
        match answer.as_str() {
            "y" | "yes" => return Ok(true),
            "n" | "no" => return Ok(false),
            _ => println!("Please answer y or n."),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bubble_meter_spans_full_range() {
        let width = (BUBBLE_MAX - BUBBLE_MIN) as usize;
        assert!(bubble_meter(BUBBLE_MIN).contains(&"·".repeat(width)));
        assert!(bubble_meter(BUBBLE_MAX).contains(&"●".repeat(width)));
        assert!(bubble_meter(0).contains("+0"));
    }

    #[test]
    fn shipped_catalog_loads_for_the_cli() {
        let catalog: Catalog = serde_json::from_str(CATALOG_JSON).unwrap();
        assert!(catalog::validate(&catalog).is_empty());
        assert!(!catalog.quotes.is_empty());
    }
}
