//! Built-in exercise catalog and per-group custom exercises

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Body part labels a session can be logged under
pub const BODY_PARTS: [&str; 8] = [
    "Chest",
    "Back",
    "Shoulders",
    "Arms",
    "Legs",
    "Core/Abs",
    "Cardio",
    "Full Body",
];

/// Built-in exercises for a body part (empty for unknown labels)
pub fn catalog_exercises(body_part: &str) -> &'static [&'static str] {
    match body_part {
        "Chest" => &[
            "Bench Press",
            "Incline Bench Press",
            "Dumbbell Press",
            "Chest Fly",
            "Push-ups",
            "Cable Crossover",
        ],
        "Back" => &[
            "Deadlift",
            "Pull-ups",
            "Barbell Row",
            "Lat Pulldown",
            "Seated Row",
            "T-Bar Row",
        ],
        "Shoulders" => &[
            "Overhead Press",
            "Lateral Raise",
            "Front Raise",
            "Rear Delt Fly",
            "Arnold Press",
            "Shrugs",
        ],
        "Arms" => &[
            "Barbell Curl",
            "Tricep Dips",
            "Hammer Curl",
            "Skull Crushers",
            "Cable Curl",
            "Tricep Pushdown",
        ],
        "Legs" => &[
            "Squat",
            "Leg Press",
            "Romanian Deadlift",
            "Lunges",
            "Leg Curl",
            "Calf Raise",
        ],
        "Core/Abs" => &[
            "Plank",
            "Crunches",
            "Russian Twist",
            "Leg Raises",
            "Ab Wheel",
            "Cable Crunch",
        ],
        "Cardio" => &[
            "Running",
            "Cycling",
            "Rowing",
            "Elliptical",
            "Swimming",
            "Jump Rope",
        ],
        "Full Body" => &[
            "Burpees",
            "Kettlebell Swing",
            "Clean and Press",
            "Thrusters",
            "Mountain Climbers",
        ],
        _ => &[],
    }
}

/// One row of the `custom_exercises` collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomExerciseRow {
    pub body_part: String,
    pub exercise_name: String,
}

/// Custom exercise names registered per body part, in registration order.
///
/// Append-only: names are never removed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomExerciseRegistry(BTreeMap<String, Vec<String>>);

impl CustomExerciseRegistry {
    /// Build a registry from store rows, skipping duplicates
    pub fn from_rows(rows: impl IntoIterator<Item = CustomExerciseRow>) -> Self {
        let mut registry = Self::default();
        for row in rows {
            registry.register(&row.body_part, &row.exercise_name);
        }
        registry
    }

    /// Add `name` under `body_part`; returns false if it was already present
    pub fn register(&mut self, body_part: &str, name: &str) -> bool {
        let names = self.0.entry(body_part.to_string()).or_default();
        if names.iter().any(|existing| existing == name) {
            return false;
        }
        names.push(name.to_string());
        true
    }

    #[must_use]
    pub fn contains(&self, body_part: &str, name: &str) -> bool {
        self.names(body_part).iter().any(|existing| existing == name)
    }

    /// Custom names registered for `body_part`
    #[must_use]
    pub fn names(&self, body_part: &str) -> &[String] {
        self.0.get(body_part).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.values().all(Vec::is_empty)
    }

    /// Iterate over `(body_part, names)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0
            .iter()
            .map(|(body_part, names)| (body_part.as_str(), names.as_slice()))
    }
}

/// Catalog exercises followed by the group's custom ones
pub fn available_exercises(body_part: &str, custom: &CustomExerciseRegistry) -> Vec<String> {
    catalog_exercises(body_part)
        .iter()
        .map(ToString::to_string)
        .chain(custom.names(body_part).iter().cloned())
        .collect()
}
