use std::fmt;
use thiserror::Error;

/// Errors raised while driving a page action
#[derive(Debug, Error)]
pub enum PageError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Server returned status {status}: {body}")]
    Server { status: u16, body: String },

    #[error("Response is missing expected field `{field}`")]
    MissingField { field: &'static str },

    #[error("Malformed response: {0}")]
    Contract(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Coarse failure taxonomy used for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Validation,
    Transport,
    Server,
    Contract,
    Internal,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FailureKind::Validation => "validation",
            FailureKind::Transport => "transport",
            FailureKind::Server => "server",
            FailureKind::Contract => "contract",
            FailureKind::Internal => "internal",
        };
        f.write_str(name)
    }
}

impl PageError {
    pub fn kind(&self) -> FailureKind {
        match self {
            PageError::Validation(_) => FailureKind::Validation,
            PageError::Transport(_) => FailureKind::Transport,
            PageError::Server { .. } => FailureKind::Server,
            PageError::MissingField { .. } | PageError::Contract(_) => FailureKind::Contract,
            PageError::InvalidState(_)
            | PageError::Config(_)
            | PageError::Internal(_)
            | PageError::Other(_) => FailureKind::Internal,
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        PageError::Validation(msg.into())
    }
}

impl From<serde_json::Error> for PageError {
    fn from(e: serde_json::Error) -> Self {
        PageError::Contract(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PageError>;
