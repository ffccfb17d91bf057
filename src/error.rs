use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("malformed vote row: {0}")]
    MalformedRow(String),
}

#[derive(Debug, Error)]
pub enum MemoryError {
    #[error("local vote memory unavailable: {0}")]
    Io(#[from] std::io::Error),

    #[error("local vote memory is corrupt: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WizardError {
    #[error("you already voted, use `again` to vote again")]
    AlreadyVoted,

    #[error("that choice is not available at step {0}")]
    WrongStep(u8),

    #[error("round must be between {min} and {max}, got {got}")]
    InvalidRound { got: u32, min: u32, max: u32 },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("empty command, type `help` for the list of commands")]
    Empty,

    #[error("unknown command `{0}`, type `help` for the list of commands")]
    Unknown(String),

    #[error("`{0}` needs an argument")]
    MissingArgument(&'static str),

    #[error("{0}")]
    InvalidArgument(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Failures the user is told about. Neither kind ends the session.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to fetch votes: {0}")]
    Fetch(#[source] StoreError),

    #[error("failed to cast vote: {0}")]
    Submit(#[source] StoreError),

    #[error(transparent)]
    Wizard(#[from] WizardError),
}
