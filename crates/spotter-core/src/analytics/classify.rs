//! Keyword classification of exercise names.
//!
//! Two features share the same case-insensitive substring matching but use
//! it differently: [`exercise_balance`] puts every exercise occurrence into
//! exactly one movement bucket, while [`body_part_heat_map`] lets a name count
//! toward every body part it mentions ("Romanian Deadlift" trains back and
//! legs).

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::Serialize;

use super::{in_window, user_exercises};
use crate::models::{Session, UserId};

const PUSH_KEYWORDS: &[&str] = &["chest", "bench", "press", "shoulder", "tricep", "overhead"];
const PULL_KEYWORDS: &[&str] = &["back", "pull", "row", "bicep", "curl", "deadlift"];
const LEGS_KEYWORDS: &[&str] = &["squat", "leg", "lunge", "calf"];

/// Body parts shown on the heat map with the keywords that mark them
pub const HEAT_MAP_BODY_PARTS: [(&str, &[&str]); 6] = [
    ("Chest", &["chest", "bench", "fly", "push-up", "crossover"]),
    ("Back", &["back", "row", "pull", "deadlift", "lat "]),
    (
        "Shoulders",
        &["shoulder", "overhead", "lateral", "delt", "arnold", "shrug"],
    ),
    ("Arms", &["curl", "bicep", "tricep", "skull", "hammer", "dip"]),
    ("Legs", &["squat", "leg", "lunge", "calf", "deadlift"]),
    ("Core", &["plank", "crunch", "twist", "ab ", "abs", "raise"]),
];

static PUSH: LazyLock<Regex> = LazyLock::new(|| keyword_pattern(PUSH_KEYWORDS));
static PULL: LazyLock<Regex> = LazyLock::new(|| keyword_pattern(PULL_KEYWORDS));
static LEGS: LazyLock<Regex> = LazyLock::new(|| keyword_pattern(LEGS_KEYWORDS));
static HEAT_MAP: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    HEAT_MAP_BODY_PARTS
        .iter()
        .map(|(body_part, keywords)| (*body_part, keyword_pattern(keywords)))
        .collect()
});

fn keyword_pattern(keywords: &[&str]) -> Regex {
    let alternatives: Vec<String> = keywords.iter().map(|k| regex::escape(k)).collect();
    Regex::new(&format!("(?i){}", alternatives.join("|"))).expect("Invalid keyword regex")
}

/// Movement bucket used by the push/pull/legs balance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MovementPattern {
    Push,
    Pull,
    Legs,
    Other,
}

/// Classify an exercise name; Push wins over Pull, Pull over Legs.
pub fn classify_movement(exercise_name: &str) -> MovementPattern {
    if PUSH.is_match(exercise_name) {
        MovementPattern::Push
    } else if PULL.is_match(exercise_name) {
        MovementPattern::Pull
    } else if LEGS.is_match(exercise_name) {
        MovementPattern::Legs
    } else {
        MovementPattern::Other
    }
}

/// Share of exercise occurrences per movement bucket, in whole percent
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ExerciseBalance {
    pub push: u32,
    pub pull: u32,
    pub legs: u32,
    pub other: u32,
}

impl ExerciseBalance {
    pub const fn total(&self) -> u32 {
        self.push + self.pull + self.legs + self.other
    }
}

/// Push/pull/legs/other split of everything `user_id` has logged.
///
/// Percentages use largest-remainder rounding so they always add up to 100
/// when there is any data, and are all 0 otherwise.
pub fn exercise_balance(sessions: &[Session], user_id: &UserId) -> ExerciseBalance {
    let mut counts = [0usize; 4];
    for (_, exercise) in user_exercises(sessions, user_id) {
        let slot = match classify_movement(&exercise.exercise_name) {
            MovementPattern::Push => 0,
            MovementPattern::Pull => 1,
            MovementPattern::Legs => 2,
            MovementPattern::Other => 3,
        };
        counts[slot] += 1;
    }

    let [push, pull, legs, other] = whole_percentages(counts);
    ExerciseBalance {
        push,
        pull,
        legs,
        other,
    }
}

fn whole_percentages(counts: [usize; 4]) -> [u32; 4] {
    let total: usize = counts.iter().sum();
    if total == 0 {
        return [0; 4];
    }

    let mut shares = [0u32; 4];
    let mut remainders = Vec::with_capacity(counts.len());
    for (slot, &count) in counts.iter().enumerate() {
        let scaled = count * 100;
        shares[slot] = u32::try_from(scaled / total).unwrap_or(100);
        remainders.push((scaled % total, slot));
    }

    let assigned: u32 = shares.iter().sum();
    let leftover = usize::try_from(100u32.saturating_sub(assigned)).unwrap_or(0);
    remainders.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
    for &(_, slot) in remainders.iter().take(leftover) {
        shares[slot] += 1;
    }
    shares
}

/// How hard one body part was trained within the window
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatMapCell {
    pub body_part: &'static str,
    pub trained: bool,
    /// Matching exercise occurrences
    pub count: usize,
    /// `count` relative to the busiest body part, 0.0..=1.0
    pub intensity: f64,
}

/// Body parts trained by `user_id` in the last `window_days` days.
pub fn body_part_heat_map(
    sessions: &[Session],
    user_id: &UserId,
    today: NaiveDate,
    window_days: u32,
) -> Vec<HeatMapCell> {
    let mut counts = vec![0usize; HEAT_MAP.len()];

    for (session, exercise) in user_exercises(sessions, user_id) {
        if !in_window(session.date, today, window_days) {
            continue;
        }
        for (slot, (_, pattern)) in HEAT_MAP.iter().enumerate() {
            if pattern.is_match(&exercise.exercise_name) {
                counts[slot] += 1;
            }
        }
    }

    let busiest = counts.iter().copied().max().unwrap_or(0).max(1);
    HEAT_MAP
        .iter()
        .zip(counts)
        .map(|((body_part, _), count)| HeatMapCell {
            body_part: *body_part,
            trained: count > 0,
            count,
            intensity: ratio(count, busiest),
        })
        .collect()
}

#[allow(clippy::cast_precision_loss)] // counts are small
fn ratio(count: usize, busiest: usize) -> f64 {
    count as f64 / busiest as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::fixtures::{date, entry, exercise, session, solo, user};

    #[test]
    fn classify_is_case_insensitive_and_exclusive() {
        assert_eq!(classify_movement("BENCH PRESS"), MovementPattern::Push);
        assert_eq!(classify_movement("Leg Press"), MovementPattern::Push);
        assert_eq!(classify_movement("Romanian Deadlift"), MovementPattern::Pull);
        assert_eq!(classify_movement("Barbell Curl"), MovementPattern::Pull);
        assert_eq!(classify_movement("squat"), MovementPattern::Legs);
        assert_eq!(classify_movement("Calf Raise"), MovementPattern::Legs);
        assert_eq!(classify_movement("Running"), MovementPattern::Other);
    }

    #[test]
    fn balance_sums_to_hundred() {
        let sam = user("sam", "Sam");
        let sessions = vec![session(
            date(2024, 1, 1),
            "Full Body",
            vec![entry(
                &sam,
                vec![
                    exercise("Bench Press", &[(80.0, 5)]),
                    exercise("Barbell Row", &[(60.0, 8)]),
                    exercise("Squat", &[(100.0, 5)]),
                ],
            )],
        )];

        let balance = exercise_balance(&sessions, &sam.id);
        assert_eq!(balance.total(), 100);
        assert_eq!(balance.other, 0);
        assert!(balance.push >= 33 && balance.pull >= 33 && balance.legs >= 33);
    }

    #[test]
    fn balance_is_zero_without_data() {
        let sam = user("sam", "Sam");
        assert_eq!(exercise_balance(&[], &sam.id), ExerciseBalance::default());
    }

    #[test]
    fn balance_counts_occurrences() {
        let sam = user("sam", "Sam");
        let sessions = vec![
            solo(&sam, date(2024, 1, 3), "Squat", &[(100.0, 5)]),
            solo(&sam, date(2024, 1, 2), "Squat", &[(100.0, 5)]),
            solo(&sam, date(2024, 1, 1), "Running", &[(0.0, 1)]),
            solo(&sam, date(2024, 1, 1), "Pull-ups", &[(0.0, 10)]),
        ];
        let balance = exercise_balance(&sessions, &sam.id);
        assert_eq!(
            balance,
            ExerciseBalance {
                push: 0,
                pull: 25,
                legs: 50,
                other: 25,
            }
        );
    }

    #[test]
    fn whole_percentages_assigns_leftover_to_largest_remainder() {
        assert_eq!(whole_percentages([2, 1, 0, 0]), [67, 33, 0, 0]);
        assert_eq!(whole_percentages([1, 1, 1, 0]).iter().sum::<u32>(), 100);
        assert_eq!(whole_percentages([0, 0, 0, 7]), [0, 0, 0, 100]);
    }

    #[test]
    fn heat_map_allows_overlapping_body_parts() {
        let sam = user("sam", "Sam");
        let today = date(2024, 6, 10);
        let sessions = vec![
            solo(&sam, date(2024, 6, 9), "Romanian Deadlift", &[(100.0, 8)]),
            solo(&sam, date(2024, 6, 8), "Squat", &[(120.0, 5)]),
            solo(&sam, date(2024, 5, 1), "Bench Press", &[(80.0, 5)]),
        ];

        let cells = body_part_heat_map(&sessions, &sam.id, today, 7);
        let cell = |name: &str| cells.iter().find(|c| c.body_part == name).unwrap();

        assert_eq!(cell("Legs").count, 2);
        assert!((cell("Legs").intensity - 1.0).abs() < f64::EPSILON);
        assert_eq!(cell("Back").count, 1);
        assert!((cell("Back").intensity - 0.5).abs() < f64::EPSILON);
        assert!(!cell("Chest").trained);
        assert_eq!(cell("Chest").intensity, 0.0);
    }

    #[test]
    fn heat_map_window_ends_today() {
        let sam = user("sam", "Sam");
        let today = date(2024, 3, 31);
        let mut sessions = (24..=31)
            .map(|day| solo(&sam, date(2024, 3, day), "Squat", &[(100.0, 5)]))
            .collect::<Vec<_>>();
        sessions.push(solo(&sam, date(2024, 4, 2), "Squat", &[(100.0, 5)]));

        let cells = body_part_heat_map(&sessions, &sam.id, today, 7);
        let legs = cells.iter().find(|c| c.body_part == "Legs").unwrap();
        assert_eq!(legs.count, 7);
    }

    #[test]
    fn heat_map_without_data_has_zero_intensity() {
        let sam = user("sam", "Sam");
        let cells = body_part_heat_map(&[], &sam.id, date(2024, 1, 1), 7);
        assert_eq!(cells.len(), HEAT_MAP_BODY_PARTS.len());
        assert!(cells.iter().all(|c| !c.trained && c.intensity == 0.0));
    }
}
