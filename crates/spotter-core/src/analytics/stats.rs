//! Headline numbers for a user's dashboard

use std::collections::HashSet;

use chrono::{Datelike, Days, NaiveDate};
use serde::Serialize;

use super::exercises_for_user;
use crate::models::{Session, UserId};

/// First calendar date inside a trailing window of `window_days` days ending at `today`
pub fn window_start(today: NaiveDate, window_days: u32) -> NaiveDate {
    today
        .checked_sub_days(Days::new(u64::from(window_days.saturating_sub(1))))
        .unwrap_or(NaiveDate::MIN)
}

/// Whether `date` falls in the `window_days` days ending at `today`, inclusive
pub fn in_window(date: NaiveDate, today: NaiveDate, window_days: u32) -> bool {
    window_start(today, window_days) <= date && date <= today
}

/// Distinct days `user_id` trained in the trailing window
pub fn gym_days_in_window(
    sessions: &[Session],
    user_id: &UserId,
    today: NaiveDate,
    window_days: u32,
) -> usize {
    sessions
        .iter()
        .filter(|session| {
            in_window(session.date, today, window_days) && session.includes(user_id)
        })
        .map(|session| session.date)
        .collect::<HashSet<_>>()
        .len()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub gym_days_last_30: usize,
    pub total_workouts: usize,
    pub exercises_tracked: usize,
    pub sessions_this_month: usize,
}

/// Summary cards shown above the progress charts
pub fn dashboard_stats(sessions: &[Session], user_id: &UserId, today: NaiveDate) -> DashboardStats {
    let mine = || sessions.iter().filter(|session| session.includes(user_id));
    DashboardStats {
        gym_days_last_30: gym_days_in_window(sessions, user_id, today, 30),
        total_workouts: mine().count(),
        exercises_tracked: exercises_for_user(sessions, user_id).len(),
        sessions_this_month: mine()
            .filter(|session| {
                session.date.year() == today.year() && session.date.month() == today.month()
            })
            .count(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::fixtures::{date, entry, exercise, session, solo, user};

    #[test]
    fn gym_days_counts_distinct_dates_in_window() {
        let sam = user("sam", "Sam");
        let alex = user("alex", "Alex");
        let today = date(2024, 3, 31);
        let sessions = vec![
            solo(&sam, date(2024, 3, 30), "Squat", &[(100.0, 5)]),
            solo(&sam, date(2024, 3, 30), "Bench Press", &[(80.0, 5)]),
            solo(&sam, date(2024, 3, 2), "Squat", &[(100.0, 5)]),
            solo(&sam, date(2024, 3, 1), "Squat", &[(100.0, 5)]),
            solo(&alex, date(2024, 3, 15), "Squat", &[(100.0, 5)]),
        ];
        assert_eq!(gym_days_in_window(&sessions, &sam.id, today, 30), 2);
        assert_eq!(gym_days_in_window(&sessions, &alex.id, today, 30), 1);
    }

    #[test]
    fn dashboard_stats_summarise_user() {
        let sam = user("sam", "Sam");
        let alex = user("alex", "Alex");
        let today = date(2024, 4, 10);
        let sessions = vec![
            session(
                date(2024, 4, 9),
                "Legs",
                vec![
                    entry(&alex, vec![exercise("Squat", &[(150.0, 3)])]),
                    entry(&sam, vec![exercise("Squat", &[(100.0, 5)])]),
                ],
            ),
            solo(&sam, date(2024, 4, 2), "Lunges", &[(20.0, 10)]),
            solo(&sam, date(2024, 3, 28), "Squat", &[(95.0, 5)]),
        ];

        let stats = dashboard_stats(&sessions, &sam.id, today);
        assert_eq!(
            stats,
            DashboardStats {
                gym_days_last_30: 3,
                total_workouts: 3,
                exercises_tracked: 2,
                sessions_this_month: 2,
            }
        );
    }

    #[test]
    fn window_start_saturates() {
        assert_eq!(window_start(date(2024, 1, 8), 7), date(2024, 1, 2));
        assert_eq!(window_start(date(2024, 1, 8), 1), date(2024, 1, 8));
        assert_eq!(window_start(date(2024, 1, 8), 0), date(2024, 1, 8));
        assert_eq!(window_start(NaiveDate::MIN, 7), NaiveDate::MIN);
    }

    #[test]
    fn window_covers_exactly_window_days_up_to_today() {
        let sam = user("sam", "Sam");
        let today = date(2024, 3, 31);
        let daily = (1..=31)
            .map(|day| solo(&sam, date(2024, 3, day), "Squat", &[(100.0, 5)]))
            .collect::<Vec<_>>();
        assert_eq!(gym_days_in_window(&daily, &sam.id, today, 30), 30);

        assert!(in_window(date(2024, 3, 2), today, 30));
        assert!(!in_window(date(2024, 3, 1), today, 30));
        assert!(!in_window(date(2024, 4, 1), today, 30));

        let future = vec![solo(&sam, date(2024, 5, 1), "Squat", &[(100.0, 5)])];
        assert_eq!(gym_days_in_window(&future, &sam.id, today, 30), 0);
    }
}
