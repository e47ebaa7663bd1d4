use std::fmt::Display;
use thiserror::Error;

/// Text shown when a transport failure carries no message of its own
pub const UNKNOWN_ERROR: &str = "An unknown error occurred";

/// Everything that can go wrong during one exchange with the backend.
///
/// The `Display` output is the human-readable text the UI surfaces, so
/// `Rejected` renders the backend's `detail` verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The request never produced a response (unreachable host, reset, timeout)
    #[error("{0}")]
    Transport(String),

    /// The backend answered with a non-success status
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// A success response without the field the exchange needs
    #[error("Backend response is missing `{field}`")]
    MalformedResponse { field: &'static str },

    #[error("Only .pdf files are supported: {0}")]
    UnsupportedFile(String),

    #[error("Could not read {path}: {reason}")]
    ReadFile { path: String, reason: String },
}

impl ApiError {
    pub fn transport(err: impl Display) -> Self {
        let message = err.to_string();
        if message.trim().is_empty() {
            ApiError::Transport(UNKNOWN_ERROR.to_string())
        } else {
            ApiError::Transport(message)
        }
    }

    /// HTTP status for rejections, `None` for everything else
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::transport(err)
    }
}
