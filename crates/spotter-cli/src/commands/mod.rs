pub mod common;
pub mod completions;
pub mod config;
pub mod exercises;
pub mod log;
pub mod profile;
pub mod react;
pub mod sessions;
pub mod stats;
pub mod watch;
