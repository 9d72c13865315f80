//! Workout analytics computed over fetched sessions.
//!
//! Every function here is pure: it reads a slice of [`Session`]s (newest
//! first, as returned by the record store) and never mutates it. Functions
//! that depend on the current date take `today` explicitly so results are
//! reproducible in tests.

mod achievements;
mod classify;
mod leaderboard;
mod progress;
mod stats;

pub use achievements::{achievements, day_streak, Achievements, Badge};
pub use classify::{
    body_part_heat_map, classify_movement, exercise_balance, ExerciseBalance, HeatMapCell,
    MovementPattern, HEAT_MAP_BODY_PARTS,
};
pub use leaderboard::{leaderboard, personal_records, LeaderboardEntry, PersonalRecord};
pub use progress::{
    comparison_series, exercise_progress, exercises_for_user, top_exercises, ComparisonSeries,
    ProgressOptions, ProgressPoint, SeriesPoint,
};
pub use stats::{dashboard_stats, gym_days_in_window, in_window, window_start, DashboardStats};

use crate::models::{Exercise, Session, UserId};

/// Maximum leaderboard length
pub const LEADERBOARD_SIZE: usize = 10;

/// Every exercise entry `user_id` logged, paired with its session.
fn user_exercises<'a>(
    sessions: &'a [Session],
    user_id: &'a UserId,
) -> impl Iterator<Item = (&'a Session, &'a Exercise)> + 'a {
    sessions.iter().flat_map(move |session| {
        session
            .entries_for(user_id)
            .flat_map(move |entry| entry.exercises.iter().map(move |exercise| (session, exercise)))
    })
}
