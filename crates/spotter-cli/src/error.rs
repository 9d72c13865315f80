use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] spotter_core::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error(
        "No active profile. Run `spotter profile create <NAME>` or `spotter profile select <NAME>`."
    )]
    NoActiveProfile,
    #[error("Profile not found: {0}")]
    ProfileNotFound(String),
    #[error("Session not found for id/prefix: {0}")]
    SessionNotFound(String),
    #[error("{0}")]
    Ambiguous(String),
    #[error("Invalid set '{0}': expected [PROFILE@]EXERCISE=WEIGHTxREPS[,WEIGHTxREPS...]")]
    InvalidSetSpec(String),
    #[error("Invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),
    #[error("{0} is not a participant; add them with --with")]
    UnknownParticipant(String),
    #[error("Nothing to update; pass --name or --avatar")]
    NothingToUpdate,
    #[error("Refusing to {0} without --yes")]
    ConfirmationRequired(String),
    #[error(
        "GIF reactions are not configured. Run `spotter config init --giphy-api-key <KEY>` or set GIPHY_API_KEY."
    )]
    GiphyNotConfigured,
    #[error("No GIF at position {0}; run without --pick to list candidates")]
    GifNotFound(usize),
    #[error("Pass --category, --search or --trending")]
    MissingReactionTopic,
}

impl CliError {
    /// Lift core confirmation errors into the CLI's `--yes` hint
    pub fn from_core(error: spotter_core::Error) -> Self {
        match error {
            spotter_core::Error::ConfirmationRequired(action) => Self::ConfirmationRequired(action),
            spotter_core::Error::Validation(spotter_core::ValidationError::NoActiveUser) => {
                Self::NoActiveProfile
            }
            other => Self::Core(other),
        }
    }
}
