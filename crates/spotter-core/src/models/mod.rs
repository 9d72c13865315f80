//! Data models for Spotter

/// Declares a string-backed record identifier.
///
/// New identifiers are UUID v7 (time-sortable), but any non-empty string read
/// back from the record store is accepted as-is.
macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            serde::Serialize,
            serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new unique ID using UUID v7
            #[must_use]
            pub fn new() -> Self {
                Self(uuid::Uuid::now_v7().to_string())
            }

            /// Get the string representation of this ID
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = crate::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Err(crate::Error::InvalidInput(format!(
                        "{} must not be empty",
                        stringify!($name)
                    )));
                }
                Ok(Self(trimmed.to_string()))
            }
        }
    };
}

mod catalog;
mod local;
mod reaction;
mod session;
mod user;

pub use catalog::{
    available_exercises, catalog_exercises, CustomExerciseRegistry, CustomExerciseRow, BODY_PARTS,
};
pub use local::{LocalProfile, DEFAULT_SYNC_CODE};
pub use reaction::{Reaction, ReactionId, ReactionPayload};
pub use session::{Exercise, ExerciseSet, ParticipantData, Session, SessionId};
pub use user::{
    display_avatar, is_valid_image_ref, User, UserId, AVATAR_PLACEHOLDERS, DEFAULT_AVATAR,
};
