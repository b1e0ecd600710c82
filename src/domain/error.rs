//! Normalized failure of a single API request.
//!
//! Every hook stores one of these on failure. The three kinds are surfaced
//! to the user the same way; they differ only in what was observed on the
//! wire, which [`RequestError::code`] exposes as a stable string.

use thiserror::Error;

use super::http_status::status_text;

/// Sentinel code carried by [`RequestError::Unexpected`].
pub const UNEXPECTED_ERROR: &str = "UNEXPECTED_ERROR";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RequestError {
    /// A response arrived with a status outside 2xx.
    #[error("Request failed with status code {status} ({status_text})")]
    Http { status: u16, status_text: &'static str, body: String },

    /// The request never got a response.
    #[error("Network error: {message}")]
    Transport { message: String, timed_out: bool },

    /// Anything not recognized as an HTTP or transport failure.
    #[error("An unexpected error occurred: {message}")]
    Unexpected { message: String },
}

impl RequestError {
    pub fn http(status: u16, body: impl Into<String>) -> Self {
        Self::Http { status, status_text: status_text(status), body: body.into() }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport { message: message.into(), timed_out: false }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Transport { message: message.into(), timed_out: true }
    }

    pub fn unexpected(message: impl ToString) -> Self {
        Self::Unexpected { message: message.to_string() }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Http { status, .. } if (400..500).contains(status) => "ERR_BAD_REQUEST",
            Self::Http { .. } => "ERR_BAD_RESPONSE",
            Self::Transport { timed_out: true, .. } => "ECONNABORTED",
            Self::Transport { .. } => "ERR_NETWORK",
            Self::Unexpected { .. } => UNEXPECTED_ERROR,
        }
    }

    /// Text of the failure notification for this error.
    pub fn notice(&self) -> String {
        match self {
            Self::Http { status, status_text, .. } => format!("Error {status}: {status_text}"),
            Self::Transport { .. } | Self::Unexpected { .. } => "Network error".to_string(),
        }
    }
}
