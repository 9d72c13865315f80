//! Cross-user leaderboards and personal records

use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;

use super::{user_exercises, LEADERBOARD_SIZE};
use crate::models::{Session, UserId};

/// A user's best lift on one exercise
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardEntry {
    pub user_id: UserId,
    pub user_name: String,
    pub user_avatar: String,
    pub max_weight: f64,
    pub date: NaiveDate,
}

/// Heaviest weight a user ever logged for one exercise
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersonalRecord {
    pub exercise_name: String,
    pub weight: f64,
    /// Earliest date the record weight was reached
    pub date: NaiveDate,
}

/// Top lifters for `exercise_name`, one entry per user, heaviest first.
///
/// Equal weights keep the order in which users first appear in `sessions`.
pub fn leaderboard(sessions: &[Session], exercise_name: &str) -> Vec<LeaderboardEntry> {
    let mut entries: Vec<LeaderboardEntry> = Vec::new();
    let mut index: HashMap<&UserId, usize> = HashMap::new();

    for session in sessions {
        for participant in &session.participants {
            let Some(exercise) = participant.exercise(exercise_name) else {
                continue;
            };
            let candidate = LeaderboardEntry {
                user_id: participant.user_id.clone(),
                user_name: participant.user_name.clone(),
                user_avatar: participant.user_avatar.clone(),
                max_weight: exercise.max_weight(),
                date: session.date,
            };
            match index.get(&participant.user_id) {
                Some(&slot) => {
                    if candidate.max_weight > entries[slot].max_weight {
                        entries[slot] = candidate;
                    }
                }
                None => {
                    index.insert(&participant.user_id, entries.len());
                    entries.push(candidate);
                }
            }
        }
    }

    entries.sort_by(|a, b| b.max_weight.total_cmp(&a.max_weight));
    entries.truncate(LEADERBOARD_SIZE);
    entries
}

/// Every exercise `user_id` has done with its best weight, heaviest first.
pub fn personal_records(sessions: &[Session], user_id: &UserId) -> Vec<PersonalRecord> {
    let mut records: Vec<PersonalRecord> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for (session, exercise) in user_exercises(sessions, user_id) {
        let weight = exercise.max_weight();
        let name = exercise.exercise_name.as_str();
        match index.get(name) {
            Some(&slot) => {
                let record = &mut records[slot];
                let improves = match weight.total_cmp(&record.weight) {
                    Ordering::Greater => true,
                    Ordering::Equal => session.date < record.date,
                    Ordering::Less => false,
                };
                if improves {
                    record.weight = weight;
                    record.date = session.date;
                }
            }
            None => {
                index.insert(name, records.len());
                records.push(PersonalRecord {
                    exercise_name: name.to_string(),
                    weight,
                    date: session.date,
                });
            }
        }
    }

    records.sort_by(|a, b| b.weight.total_cmp(&a.weight));
    records
}
