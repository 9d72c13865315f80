use std::path::Path;

use chrono::NaiveDate;
use serde::Serialize;
use spotter_core::analytics::{
    achievements, body_part_heat_map, comparison_series, dashboard_stats, exercise_balance,
    exercise_progress, leaderboard, personal_records, top_exercises, Achievements,
    DashboardStats, ExerciseBalance, HeatMapCell, ProgressOptions,
};
use spotter_core::util::local_today;
use spotter_core::{Session, User, UserId};

use crate::commands::common::{format_weight, open_app, print_json, resolve_user};
use crate::error::CliError;

const HEAT_MAP_WINDOW_DAYS: u32 = 7;
const TOP_EXERCISES: usize = 5;

#[derive(Debug, Serialize)]
pub struct TopExercise {
    pub exercise_name: String,
    pub sessions: usize,
}

/// Everything `spotter stats` shows for one profile
#[derive(Debug, Serialize)]
pub struct StatsReport {
    pub user_name: String,
    pub dashboard: DashboardStats,
    pub achievements: Achievements,
    pub balance: ExerciseBalance,
    pub heat_map: Vec<HeatMapCell>,
    pub top_exercises: Vec<TopExercise>,
}

impl StatsReport {
    pub fn build(sessions: &[Session], user: &User, today: NaiveDate) -> Self {
        Self {
            user_name: user.name.clone(),
            dashboard: dashboard_stats(sessions, &user.id, today),
            achievements: achievements(sessions, &user.id, today),
            balance: exercise_balance(sessions, &user.id),
            heat_map: body_part_heat_map(sessions, &user.id, today, HEAT_MAP_WINDOW_DAYS),
            top_exercises: top_exercises(sessions, &user.id, TOP_EXERCISES)
                .into_iter()
                .map(|(exercise_name, sessions)| TopExercise {
                    exercise_name,
                    sessions,
                })
                .collect(),
        }
    }

    pub fn lines(&self) -> Vec<String> {
        let dashboard = &self.dashboard;
        let mut lines = vec![
            self.user_name.clone(),
            format!(
                "  Gym days (30d): {}   Workouts: {}   Exercises: {}   This month: {}",
                dashboard.gym_days_last_30,
                dashboard.total_workouts,
                dashboard.exercises_tracked,
                dashboard.sessions_this_month
            ),
            format!("  Streak: {} days", self.achievements.streak_days),
            format!(
                "  Balance: push {}%  pull {}%  legs {}%  other {}%",
                self.balance.push, self.balance.pull, self.balance.legs, self.balance.other
            ),
        ];

        let trained = self
            .heat_map
            .iter()
            .filter(|cell| cell.trained)
            .map(|cell| format!("{} x{}", cell.body_part, cell.count))
            .collect::<Vec<_>>();
        if trained.is_empty() {
            lines.push(format!("  Last {HEAT_MAP_WINDOW_DAYS} days: rest week"));
        } else {
            lines.push(format!(
                "  Last {HEAT_MAP_WINDOW_DAYS} days: {}",
                trained.join(", ")
            ));
        }

        if !self.top_exercises.is_empty() {
            lines.push("  Top exercises:".to_string());
            for top in &self.top_exercises {
                lines.push(format!("    {:<22} {} sessions", top.exercise_name, top.sessions));
            }
        }
        if !self.achievements.badges.is_empty() {
            lines.push("  Badges:".to_string());
            for badge in &self.achievements.badges {
                lines.push(format!(
                    "    {} {} - {}",
                    badge.emoji(),
                    badge.title(),
                    badge.description()
                ));
            }
        }
        lines
    }
}

pub async fn run_stats(
    user: Option<&str>,
    as_json: bool,
    db_path: &Path,
    config_path: &Path,
) -> Result<(), CliError> {
    let app = open_app(db_path, config_path).await?;
    let user = app.user_or_active(user)?;
    let report = StatsReport::build(app.service.sessions(), &user, local_today());

    if as_json {
        return print_json(&report);
    }
    for line in report.lines() {
        println!("{line}");
    }
    Ok(())
}

pub async fn run_leaderboard(
    exercise: &str,
    as_json: bool,
    db_path: &Path,
    config_path: &Path,
) -> Result<(), CliError> {
    let app = open_app(db_path, config_path).await?;
    let entries = leaderboard(app.service.sessions(), exercise.trim());

    if as_json {
        return print_json(&entries);
    }
    if entries.is_empty() {
        println!("Nobody has logged {} yet.", exercise.trim());
    }
    for (rank, entry) in entries.iter().enumerate() {
        println!(
            "{:>2}. {:<16} {:>7} kg  {}",
            rank + 1,
            entry.user_name,
            format_weight(entry.max_weight),
            entry.date
        );
    }
    Ok(())
}

pub async fn run_records(
    user: Option<&str>,
    as_json: bool,
    db_path: &Path,
    config_path: &Path,
) -> Result<(), CliError> {
    let app = open_app(db_path, config_path).await?;
    let user = app.user_or_active(user)?;
    let records = personal_records(app.service.sessions(), &user.id);

    if as_json {
        return print_json(&records);
    }
    if records.is_empty() {
        println!("No records for {} yet.", user.name);
    }
    for record in &records {
        println!(
            "{:<22} {:>7} kg  {}",
            record.exercise_name,
            format_weight(record.weight),
            record.date
        );
    }
    Ok(())
}

pub struct ProgressArgs<'a> {
    pub exercise: &'a str,
    pub user: Option<&'a str>,
    pub limit: usize,
    pub all: bool,
    pub json: bool,
}

pub async fn run_progress(
    args: ProgressArgs<'_>,
    db_path: &Path,
    config_path: &Path,
) -> Result<(), CliError> {
    let app = open_app(db_path, config_path).await?;
    let user = app.user_or_active(args.user)?;
    let points = exercise_progress(
        app.service.sessions(),
        &user.id,
        args.exercise.trim(),
        ProgressOptions {
            all_time: args.all,
            limit: args.limit,
        },
    );

    if args.json {
        return print_json(&points);
    }
    if points.is_empty() {
        println!("{} has not logged {} yet.", user.name, args.exercise.trim());
    }
    for point in &points {
        println!(
            "{}  max {:>7} kg  volume {:>8} kg",
            point.date,
            format_weight(point.max_weight),
            format_weight(point.total_volume)
        );
    }
    Ok(())
}

pub async fn run_compare(
    exercise: &str,
    users: &[String],
    as_json: bool,
    db_path: &Path,
    config_path: &Path,
) -> Result<(), CliError> {
    let app = open_app(db_path, config_path).await?;
    let user_ids = users
        .iter()
        .map(|query| resolve_user(app.service.users(), query).map(|user| user.id))
        .collect::<Result<Vec<UserId>, CliError>>()?;
    let series = comparison_series(app.service.sessions(), exercise.trim(), &user_ids);

    if as_json {
        return print_json(&series);
    }
    for (query, entry) in users.iter().zip(&series) {
        let name = if entry.user_name.is_empty() {
            query.as_str()
        } else {
            entry.user_name.as_str()
        };
        let points = entry
            .points
            .iter()
            .map(|point| format!("{} {}", point.date, format_weight(point.max_weight)))
            .collect::<Vec<_>>();
        if points.is_empty() {
            println!("{name}: no data");
        } else {
            println!("{name}: {}", points.join("  "));
        }
    }
    Ok(())
}
