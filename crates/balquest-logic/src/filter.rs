//! Habit-based scene filtering.
//!
//! Computed exactly once, at the end of onboarding, from the final habit
//! selection. The filter only ever subsets the authored scene list — it
//! never reorders — so day numbers stay non-decreasing in the output.
//!
//! Selection rules:
//! - Selecting all-but-at-most-one habit passes the full list through
//!   unchanged.
//! - Core scenes are always kept.
//! - Scenes whose `relevant_habits` intersect the selection are kept.
//! - With a narrow selection (<= 2 habits), exactly one non-matching,
//!   non-core scene is admitted as an "eye-opener": the first one
//!   encountered in authored order.

use crate::catalog::Scene;
use crate::habits::Habit;

/// Selections at or above `Habit::COUNT - 1` see everything.
pub const PASS_THROUGH_THRESHOLD: usize = Habit::COUNT - 1;

/// Selections this small get one eye-opener scene outside their goals.
pub const EYE_OPENER_THRESHOLD: usize = 2;

/// Compute the scene sequence for a session from the player's habits.
pub fn filter_scenes(all: &[Scene], selected: &[Habit]) -> Vec<Scene> {
    if selected.len() >= PASS_THROUGH_THRESHOLD {
        return all.to_vec();
    }

    let mut filtered = Vec::new();
    let mut has_eye_opener = false;

    for scene in all {
        if scene.is_core {
            filtered.push(scene.clone());
            continue;
        }

        let matches = scene
            .relevant_habits
            .iter()
            .any(|habit| selected.contains(habit));

        if matches {
            filtered.push(scene.clone());
        } else if !has_eye_opener && selected.len() <= EYE_OPENER_THRESHOLD {
            filtered.push(scene.clone());
            has_eye_opener = true;
        }
    }

    filtered
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::catalog::{Choice, ChoiceCategory, Response};

    fn scene(id: &str, day: u8, is_core: bool, habits: &[Habit]) -> Scene {
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
            is_core,
            time: None,
            location: None,
            intro: String::new(),
            text: "Something happens.".into(),
            relevant_habits: habits.to_vec(),
            timed_alert: None,
            choices: vec![choice],
            responses,
        }
    }

    #[test]
    fn pass_through_at_threshold() {
        let all = vec![
            scene("a", 1, false, &[Habit::LessPhone]),
            scene("b", 1, false, &[Habit::MoreExercise]),
            scene("c", 2, true, &[]),
        ];
        // COUNT - 1 = 5 habits selected: everything passes, order kept.
        let selected = [
            Habit::LessPhone,
            Habit::TakeBreaks,
            Habit::SleepOnTime,
            Habit::MoreExercise,
            Habit::FinishTasks,
        ];
        assert_eq!(filter_scenes(&all, &selected), all);
    }

    #[test]
    fn core_scenes_always_kept() {
        let all = vec![
            scene("core1", 1, true, &[]),
            scene("skip", 1, false, &[Habit::MoreExercise]),
            scene("core2", 2, true, &[Habit::MoreExercise]),
        ];
        // 3 selected habits: above the eye-opener threshold, so the
        // non-matching scene is simply dropped.
        let selected = [Habit::LessPhone, Habit::TakeBreaks, Habit::FinishTasks];
        let filtered = filter_scenes(&all, &selected);
        let ids: Vec<&str> = filtered.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["core1", "core2"]);
    }

    #[test]
    fn matching_scenes_kept_in_order() {
        let all = vec![
            scene("a", 1, false, &[Habit::LessPhone]),
            scene("b", 1, false, &[Habit::SleepOnTime, Habit::LessPhone]),
            scene("c", 2, false, &[Habit::MoreExercise]),
        ];
        let selected = [Habit::LessPhone, Habit::TakeBreaks, Habit::FinishTasks];
        let filtered = filter_scenes(&all, &selected);
        let ids: Vec<&str> = filtered.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn one_eye_opener_for_narrow_selections() {
        let all = vec![
            scene("match", 1, false, &[Habit::LessPhone]),
            scene("other1", 1, false, &[Habit::MoreExercise]),
            scene("other2", 2, false, &[Habit::MoreExercise]),
        ];
        let selected = [Habit::LessPhone];
        let filtered = filter_scenes(&all, &selected);
        let ids: Vec<&str> = filtered.iter().map(|s| s.id.as_str()).collect();
        // First non-matching scene admitted once, second dropped.
        assert_eq!(ids, vec!["match", "other1"]);
    }

    #[test]
    fn no_eye_opener_above_two_habits() {
        let all = vec![
            scene("match", 1, false, &[Habit::LessPhone]),
            scene("other", 1, false, &[Habit::MoreExercise]),
        ];
        let selected = [Habit::LessPhone, Habit::TakeBreaks, Habit::FinishTasks];
        let filtered = filter_scenes(&all, &selected);
        let ids: Vec<&str> = filtered.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["match"]);
    }

    #[test]
    fn day_order_preserved() {
        let all = vec![
            scene("d1", 1, true, &[]),
            scene("d1b", 1, false, &[Habit::LessPhone]),
            scene("d2", 2, false, &[Habit::LessPhone]),
            scene("d3", 3, true, &[]),
        ];
        let filtered = filter_scenes(&all, &[Habit::LessPhone]);
        let days: Vec<u8> = filtered.iter().map(|s| s.day).collect();
        let mut sorted = days.clone();
        sorted.sort_unstable();
        assert_eq!(days, sorted);
    }

    #[test]
    fn three_scene_scenario() {
        // Scene 1 core+matching, scene 2 non-core non-matching,
        // scene 3 core: a 3-habit selection keeps 1 and 3 in day order.
        let all = vec![
            scene("s1", 1, true, &[Habit::LessPhone]),
            scene("s2", 1, false, &[Habit::MoreExercise]),
            scene("s3", 2, true, &[]),
        ];
        let selected = [Habit::LessPhone, Habit::TakeBreaks, Habit::FinishTasks];
        let filtered = filter_scenes(&all, &selected);
        let ids: Vec<&str> = filtered.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["s1", "s3"]);
        assert_eq!(filtered[0].day, 1);
        assert_eq!(filtered[1].day, 2);
    }

    #[test]
    fn three_scene_scenario_single_habit() {
        // Same catalog, single-habit selection: both core scenes are
        // always included, and the non-matching scene rides along as
        // the eye-opener.
        let all = vec![
            scene("s1", 1, true, &[Habit::LessPhone]),
            scene("s2", 1, false, &[Habit::MoreExercise]),
            scene("s3", 2, true, &[]),
        ];
        let filtered = filter_scenes(&all, &[Habit::LessPhone]);
        let ids: Vec<&str> = filtered.iter().map(|s| s.id.as_str()).collect();
        assert!(ids.contains(&"s1"));
        assert!(ids.contains(&"s3"));
        let days: Vec<u8> = filtered.iter().map(|s| s.day).collect();
        let mut sorted = days.clone();
        sorted.sort_unstable();
        assert_eq!(days, sorted);
    }
}
