use std::collections::BTreeSet;

use chrono::{Days, NaiveDate};
use serde::Serialize;

use super::{exercises_for_user, user_exercises};
use crate::models::{Session, UserId};

const HEAVY_LIFT_KG: f64 = 100.0;
const EXPLORER_EXERCISES: usize = 10;

/// Milestones a user can unlock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Badge {
    WeekStreak,
    MonthStreak,
    TenSessions,
    FiftySessions,
    HundredSessions,
    HeavyLifter,
    ExerciseExplorer,
}

impl Badge {
    pub const fn title(self) -> &'static str {
        match self {
            Self::WeekStreak => "Week Warrior",
            Self::MonthStreak => "Iron Month",
            Self::TenSessions => "Getting Started",
            Self::FiftySessions => "Regular",
            Self::HundredSessions => "Centurion",
            Self::HeavyLifter => "Heavy Lifter",
            Self::ExerciseExplorer => "Explorer",
        }
    }

    pub const fn emoji(self) -> &'static str {
        match self {
            Self::WeekStreak => "🔥",
            Self::MonthStreak => "📅",
            Self::TenSessions => "🎯",
            Self::FiftySessions => "💪",
            Self::HundredSessions => "🏆",
            Self::HeavyLifter => "🏋️",
            Self::ExerciseExplorer => "🧭",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::WeekStreak => "Trained 7 days in a row",
            Self::MonthStreak => "Trained 30 days in a row",
            Self::TenSessions => "Logged 10 sessions",
            Self::FiftySessions => "Logged 50 sessions",
            Self::HundredSessions => "Logged 100 sessions",
            Self::HeavyLifter => "Lifted 100 kg or more in a single set",
            Self::ExerciseExplorer => "Tried 10 different exercises",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Achievements {
    pub streak_days: u32,
    pub total_sessions: usize,
    pub distinct_exercises: usize,
    pub badges: Vec<Badge>,
}

/// Consecutive training days ending today or yesterday.
///
/// Sessions dated after `today` are ignored. A most recent session older
/// than yesterday means the streak is broken and the result is 0.
pub fn day_streak(sessions: &[Session], user_id: &UserId, today: NaiveDate) -> u32 {
    let dates: BTreeSet<NaiveDate> = sessions
        .iter()
        .filter(|session| session.date <= today && session.includes(user_id))
        .map(|session| session.date)
        .collect();

    let Some(&latest) = dates.last() else {
        return 0;
    };
    let yesterday = today.checked_sub_days(Days::new(1)).unwrap_or(today);
    if latest < yesterday {
        return 0;
    }

    let mut streak = 0;
    let mut expected = latest;
    for &date in dates.iter().rev() {
        if date != expected {
            break;
        }
        streak += 1;
        match expected.checked_sub_days(Days::new(1)) {
            Some(previous) => expected = previous,
            None => break,
        }
    }
    streak
}

/// Streak, session totals and unlocked badges for `user_id`.
pub fn achievements(sessions: &[Session], user_id: &UserId, today: NaiveDate) -> Achievements {
    let streak_days = day_streak(sessions, user_id, today);
    let total_sessions = sessions
        .iter()
        .filter(|session| session.includes(user_id))
        .count();
    let distinct_exercises = exercises_for_user(sessions, user_id).len();
    let heavy = user_exercises(sessions, user_id)
        .flat_map(|(_, exercise)| &exercise.sets)
        .any(|set| set.weight >= HEAVY_LIFT_KG);

    let earned = [
        (Badge::WeekStreak, streak_days >= 7),
        (Badge::MonthStreak, streak_days >= 30),
        (Badge::TenSessions, total_sessions >= 10),
        (Badge::FiftySessions, total_sessions >= 50),
        (Badge::HundredSessions, total_sessions >= 100),
        (Badge::HeavyLifter, heavy),
        (Badge::ExerciseExplorer, distinct_exercises >= EXPLORER_EXERCISES),
    ];

    Achievements {
        streak_days,
        total_sessions,
        distinct_exercises,
        badges: earned
            .into_iter()
            .filter_map(|(badge, unlocked)| unlocked.then_some(badge))
            .collect(),
    }
}
