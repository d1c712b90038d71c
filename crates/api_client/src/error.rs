//! Error types for API operations.

use thiserror::Error;

/// Errors that can occur while talking to the backend API.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The request never produced a response (connection, timeout, body read).
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered with a non-2xx status.
    #[error(
        "Request failed with status {status}: {}",
        .message.as_deref().unwrap_or("no error message")
    )]
    Status {
        /// HTTP status code.
        status: u16,
        /// The body's `error` field, when the body carried one.
        message: Option<String>,
    },

    /// The body's `status` field was not `"success"`.
    #[error("Request rejected: {}", .message.as_deref().unwrap_or("no error message"))]
    Rejected {
        /// The body's `error` field, when the body carried one.
        message: Option<String>,
    },

    /// The body was not JSON or did not have the expected shape.
    #[error("Invalid response from {endpoint}: {message}")]
    Decode {
        /// Endpoint path.
        endpoint: String,
        /// Decoder message.
        message: String,
    },

    /// A request URL could not be built.
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl {
        /// Offending URL.
        url: String,
        /// Reason.
        reason: String,
    },
}

impl ApiError {
    /// Create a decode error.
    pub fn decode<E: Into<String>, M: ToString>(endpoint: E, message: M) -> Self {
        Self::Decode {
            endpoint: endpoint.into(),
            message: message.to_string(),
        }
    }

    /// Create an invalid URL error.
    pub fn invalid_url<U: Into<String>, R: Into<String>>(url: U, reason: R) -> Self {
        Self::InvalidUrl {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// The error message the server put in the response body, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Status { message, .. } | Self::Rejected { message } => message.as_deref(),
            _ => None,
        }
    }

    /// HTTP status of the response, for errors that had one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// True when the request reached the server and got an answer.
    pub fn is_server_response(&self) -> bool {
        matches!(self, Self::Status { .. } | Self::Rejected { .. })
    }
}

/// Result type for API operations.
pub type ApiResult<T> = std::result::Result<T, ApiError>;
