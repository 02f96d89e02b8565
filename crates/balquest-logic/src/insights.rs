//! Read-only derivations over the choice log and bubble score.
//!
//! Everything here is pure, idempotent, and safe to call at any time
//! — during play for the live mood display, or at the end for the
//! results screen. An empty choice log is not an error: stats come
//! back all-zero and the insight list comes back empty.

use serde::{Deserialize, Serialize};

use crate::catalog::ChoiceCategory;
use crate::state::ChoiceRecord;

/// Per-category tally of the choice log. Counters always sum to the
/// log length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CategoryStats {
    pub rest: u32,
    pub work: u32,
    pub social: u32,
    pub scroll: u32,
    pub neutral: u32,
}

impl CategoryStats {
    pub fn total(&self) -> u32 {
        self.rest + self.work + self.social + self.scroll + self.neutral
    }

    pub fn count(&self, category: ChoiceCategory) -> u32 {
        match category {
            ChoiceCategory::Rest => self.rest,
            ChoiceCategory::Work => self.work,
            ChoiceCategory::Social => self.social,
            ChoiceCategory::Scroll => self.scroll,
            ChoiceCategory::Neutral => self.neutral,
        }
    }
}

/// Tally the choice log by category.
pub fn calculate_stats(choices: &[ChoiceRecord]) -> CategoryStats {
    let mut stats = CategoryStats::default();
    for record in choices {
        match record.category {
            ChoiceCategory::Rest => stats.rest += 1,
            ChoiceCategory::Work => stats.work += 1,
            ChoiceCategory::Social => stats.social += 1,
            ChoiceCategory::Scroll => stats.scroll += 1,
            ChoiceCategory::Neutral => stats.neutral += 1,
        }
    }
    stats
}

/// Pattern observations over the choice log: a fixed, ordered list of
/// threshold predicates on category proportions, capped at the first
/// three that hold. Declaration order is the only priority.
pub fn pattern_insights(choices: &[ChoiceRecord]) -> Vec<String> {
    let stats = calculate_stats(choices);
    let total = choices.len() as u32;
    if total == 0 {
        return Vec::new();
    }

    // (predicate, observation), evaluated in order. Proportions are
    // compared with integer arithmetic to keep boundaries exact.
    let candidates: [(bool, &str); 5] = [
        (
            stats.scroll * 100 >= total * 30,
            "You often reached for your phone to unwind. That's very recognizable!",
        ),
        (
            stats.rest * 100 >= total * 30,
            "You made deliberate time for rest. Good for your energy!",
        ),
        (
            stats.work * 100 >= total * 40,
            "You were productive. Don't forget to unwind as well.",
        ),
        (
            stats.social * 100 >= total * 25,
            "Social connections mattered to you. That's great!",
        ),
        (
            stats.rest * 100 < total * 15,
            "You took few breaks. Rest helps your brain recover.",
        ),
    ];

    candidates
        .into_iter()
        .filter(|(holds, _)| *holds)
        .take(3)
        .map(|(_, text)| text.to_string())
        .collect()
}

/// The five ordered mood bands of the bubble.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BubbleState {
    Energetic,
    Content,
    Attention,
    Tired,
    OutOfBalance,
}

/// Coarse three-color mapping for simple renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BubbleColor {
    Green,
    Orange,
    Red,
}

impl BubbleState {
    /// Band for a bubble score. Total over the whole clamped range and
    /// beyond: `>= 8` energetic, `>= 4` content, `>= 0` attention,
    /// `>= -4` tired, everything below out of balance.
    pub fn from_score(score: i32) -> BubbleState {
        if score >= 8 {
            BubbleState::Energetic
        } else if score >= 4 {
            BubbleState::Content
        } else if score >= 0 {
            BubbleState::Attention
        } else if score >= -4 {
            BubbleState::Tired
        } else {
            BubbleState::OutOfBalance
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            BubbleState::Energetic => "Full of Energy",
            BubbleState::Content => "Content",
            BubbleState::Attention => "Needs Attention",
            BubbleState::Tired => "Tired",
            BubbleState::OutOfBalance => "Out of Balance",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            BubbleState::Energetic => "Your bubble feels great! Keep it up.",
            BubbleState::Content => "Your balance is good. Nicely done!",
            BubbleState::Attention => "Your bubble is starting to dim. Quick check-in?",
            BubbleState::Tired => "Your bubble is drooping. Maybe time for some rest?",
            BubbleState::OutOfBalance => "Your bubble is small and dull. Time for a change.",
        }
    }

    pub fn color(self) -> BubbleColor {
        match self {
            BubbleState::Energetic | BubbleState::Content => BubbleColor::Green,
            BubbleState::Attention | BubbleState::Tired => BubbleColor::Orange,
            BubbleState::OutOfBalance => BubbleColor::Red,
        }
    }
}
