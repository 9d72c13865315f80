//! Per-exercise progress series

use std::collections::{BTreeSet, HashMap, HashSet};

use chrono::NaiveDate;
use serde::Serialize;

use super::user_exercises;
use crate::models::{Session, UserId};

/// One point of an exercise progress chart
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProgressPoint {
    pub date: NaiveDate,
    pub max_weight: f64,
    pub total_volume: f64,
}

/// How much history [`exercise_progress`] returns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressOptions {
    /// Ignore `limit` and return every match
    pub all_time: bool,
    /// Number of most recent sessions to keep
    pub limit: usize,
}

impl Default for ProgressOptions {
    fn default() -> Self {
        Self {
            all_time: false,
            limit: 20,
        }
    }
}

/// A user's max weight over time for one exercise
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonSeries {
    pub user_id: UserId,
    pub user_name: String,
    /// Oldest first
    pub points: Vec<SeriesPoint>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub max_weight: f64,
}

/// Names of every exercise `user_id` has performed, sorted.
pub fn exercises_for_user(sessions: &[Session], user_id: &UserId) -> BTreeSet<String> {
    user_exercises(sessions, user_id)
        .map(|(_, exercise)| exercise.exercise_name.clone())
        .collect()
}

/// The `k` exercises `user_id` performed in the most sessions.
///
/// Ties keep the order in which the exercises were first seen.
pub fn top_exercises(sessions: &[Session], user_id: &UserId, k: usize) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for session in sessions {
        let mut seen: HashSet<&str> = HashSet::new();
        for entry in session.entries_for(user_id) {
            for exercise in &entry.exercises {
                let name = exercise.exercise_name.as_str();
                if !seen.insert(name) {
                    continue;
                }
                match index.get(name) {
                    Some(&slot) => counts[slot].1 += 1,
                    None => {
                        index.insert(name.to_string(), counts.len());
                        counts.push((name.to_string(), 1));
                    }
                }
            }
        }
    }

    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.truncate(k);
    counts
}

/// Max weight and volume of `exercise_name` per session, newest first.
pub fn exercise_progress(
    sessions: &[Session],
    user_id: &UserId,
    exercise_name: &str,
    options: ProgressOptions,
) -> Vec<ProgressPoint> {
    let points = sessions.iter().flat_map(|session| {
        session
            .entries_for(user_id)
            .filter_map(move |entry| entry.exercise(exercise_name))
            .map(move |exercise| ProgressPoint {
                date: session.date,
                max_weight: exercise.max_weight(),
                total_volume: exercise.total_volume(),
            })
    });

    if options.all_time {
        points.collect()
    } else {
        points.take(options.limit).collect()
    }
}

/// Chronological max-weight series for each of `user_ids` on one exercise.
///
/// Series come back in the order of `user_ids`; users with no data get an
/// empty series.
pub fn comparison_series(
    sessions: &[Session],
    exercise_name: &str,
    user_ids: &[UserId],
) -> Vec<ComparisonSeries> {
    user_ids
        .iter()
        .map(|user_id| {
            let mut user_name = String::new();
            let mut points = Vec::new();
            for session in sessions {
                for entry in session.entries_for(user_id) {
                    if let Some(exercise) = entry.exercise(exercise_name) {
                        if user_name.is_empty() {
                            user_name.clone_from(&entry.user_name);
                        }
                        points.push(SeriesPoint {
                            date: session.date,
                            max_weight: exercise.max_weight(),
                        });
                    }
                }
            }
            points.sort_by_key(|point| point.date);
            ComparisonSeries {
                user_id: user_id.clone(),
                user_name,
                points,
            }
        })
        .collect()
}
