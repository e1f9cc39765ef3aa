use thiserror::Error;

use crate::api::ApiError;

/// Shown when a failure carries no usable text.
pub const SOMETHING_WENT_WRONG: &str = "Something went wrong.";

#[derive(Debug, Clone, Error)]
pub enum AppError {
    /// The backend said no; the text is its own.
    #[error("{0}")]
    Rejected(String),

    #[error("{0}")]
    Transport(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl AppError {
    /// Text to put in front of the user, never empty.
    pub fn user_message(&self) -> String {
        let message = self.to_string();
        if message.trim().is_empty() {
            SOMETHING_WENT_WRONG.to_string()
        } else {
            message
        }
    }
}

impl From<ApiError> for AppError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Rejected(detail) => AppError::Rejected(detail),
            other => AppError::Transport(other.to_string()),
        }
    }
}
