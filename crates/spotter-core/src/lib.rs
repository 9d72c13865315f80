//! spotter-core - Core library for Spotter
//!
//! This crate contains the shared models, workout analytics, the session
//! editor, record store backends, and the group service used by the CLI.

pub mod analytics;
pub mod config;
pub mod db;
pub mod editor;
pub mod error;
pub mod models;
pub mod reactions;
pub mod services;
pub mod store;
pub mod sync;
pub mod util;

pub use error::{Error, Result, ValidationError};
pub use models::{
    Exercise, ExerciseSet, LocalProfile, ParticipantData, Reaction, ReactionId, Session,
    SessionId, User, UserId,
};
