//! Gym session model

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{Reaction, User, UserId};

record_id!(
    /// A unique identifier for a logged gym session
    SessionId
);

/// One set of an exercise
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExerciseSet {
    /// 1-based position within the exercise
    pub set_number: u32,
    /// Weight in kg
    #[serde(default)]
    pub weight: f64,
    #[serde(default)]
    pub reps: u32,
}

impl ExerciseSet {
    /// A zeroed set at the given position
    #[must_use]
    pub const fn blank(set_number: u32) -> Self {
        Self {
            set_number,
            weight: 0.0,
            reps: 0,
        }
    }

    /// Weight multiplied by reps
    #[must_use]
    pub fn volume(&self) -> f64 {
        self.weight * f64::from(self.reps)
    }
}

/// An exercise performed by one participant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    pub exercise_name: String,
    #[serde(default)]
    pub sets: Vec<ExerciseSet>,
}

impl Exercise {
    /// Create an exercise holding a single blank set
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            exercise_name: name.into(),
            sets: vec![ExerciseSet::blank(1)],
        }
    }

    /// Heaviest set weight, or 0 when there are no sets
    #[must_use]
    pub fn max_weight(&self) -> f64 {
        self.sets.iter().map(|set| set.weight).fold(0.0, f64::max)
    }

    /// Sum of weight x reps across all sets
    #[must_use]
    pub fn total_volume(&self) -> f64 {
        self.sets.iter().map(ExerciseSet::volume).sum()
    }

    /// Rewrite set numbers so they run 1..=n in list order
    pub fn renumber_sets(&mut self) {
        for (index, set) in self.sets.iter_mut().enumerate() {
            set.set_number = u32::try_from(index + 1).unwrap_or(u32::MAX);
        }
    }
}

/// A participant's part of a session.
///
/// Name and avatar are copied from the [`User`] when the session is created
/// and never follow later profile edits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantData {
    pub user_id: UserId,
    pub user_name: String,
    #[serde(default)]
    pub user_avatar: String,
    #[serde(default)]
    pub exercises: Vec<Exercise>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl ParticipantData {
    /// Snapshot a user's identity with no exercises
    #[must_use]
    pub fn snapshot(user: &User) -> Self {
        Self {
            user_id: user.id.clone(),
            user_name: user.name.clone(),
            user_avatar: user.avatar.clone(),
            exercises: Vec::new(),
            notes: None,
        }
    }

    /// First exercise entry with the given name
    #[must_use]
    pub fn exercise(&self, name: &str) -> Option<&Exercise> {
        self.exercises
            .iter()
            .find(|exercise| exercise.exercise_name == name)
    }
}

/// A logged gym session shared within a sync group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    pub sync_code: String,
    pub created_by: UserId,
    pub creator_name: String,
    #[serde(default)]
    pub creator_avatar: String,
    /// Calendar date the workout happened
    pub date: NaiveDate,
    /// Body part label (e.g. "Chest")
    #[serde(rename = "type")]
    pub body_part: String,
    #[serde(default)]
    pub participants: Vec<ParticipantData>,
    /// Attached after fetch; not a column of the sessions collection
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reactions: Vec<Reaction>,
    #[serde(default)]
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Participant entries belonging to `user_id`
    pub fn entries_for<'a>(
        &'a self,
        user_id: &'a UserId,
    ) -> impl Iterator<Item = &'a ParticipantData> + 'a {
        self.participants
            .iter()
            .filter(move |participant| &participant.user_id == user_id)
    }

    /// Whether `user_id` took part in this session
    #[must_use]
    pub fn includes(&self, user_id: &UserId) -> bool {
        self.entries_for(user_id).next().is_some()
    }

    /// Only the creator may delete a session
    #[must_use]
    pub fn can_delete(&self, user_id: &UserId) -> bool {
        &self.created_by == user_id
    }
}
