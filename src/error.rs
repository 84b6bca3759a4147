//! Error types shared by the API clients, controllers and flows.

use thiserror::Error;

/// Everything that can go wrong between a dashboard screen and the backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DashboardError {
    /// No usable bearer token at call time. The request was never sent.
    #[error("Not authenticated: {0}")]
    Authentication(String),

    /// The backend answered with a non-2xx status.
    #[error("Request failed ({status}): {message}")]
    Request { status: u16, message: String },

    /// Client-side field checks rejected a payload before submission.
    #[error("Invalid input: {0}")]
    Validation(String),

    /// The acting role may not perform the action.
    #[error("Permission denied: {0}")]
    Permission(String),

    /// The request never produced a status (connection refused, DNS, IO).
    #[error("Network error: {0}")]
    Transport(String),

    /// The backend answered 2xx but the body did not match the expected shape.
    #[error("Unexpected response: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Config(String),

    /// A delete for this screen is already in flight.
    #[error("A delete of {id} is already in progress")]
    DeleteInProgress { id: String },

    /// A flow operation was called from a state that does not allow it.
    #[error("Invalid state: {0}")]
    InvalidState(String),
}

impl DashboardError {
    /// Text suitable for an inline banner.
    pub fn user_message(&self) -> String {
        match self {
            Self::Authentication(_) => {
                "Your session has expired. Please sign in again.".to_string()
            }
            Self::Request { status, message } if message.trim().is_empty() => {
                format!("The server returned an error ({status}).")
            }
            Self::Request { message, .. } => message.clone(),
            Self::Permission(_) => "You do not have access to perform this action.".to_string(),
            Self::Transport(_) => {
                "Could not reach the server. Check your connection and try again.".to_string()
            }
            other => other.to_string(),
        }
    }

    /// HTTP status for `Request` errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Request { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for DashboardError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            Self::Request {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else {
            Self::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for DashboardError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

impl From<url::ParseError> for DashboardError {
    fn from(err: url::ParseError) -> Self {
        Self::Config(format!("invalid URL: {err}"))
    }
}

impl From<std::io::Error> for DashboardError {
    fn from(err: std::io::Error) -> Self {
        Self::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_error_prefers_backend_message() {
        let err = DashboardError::Request {
            status: 409,
            message: "Admission already processed".to_string(),
        };
        assert_eq!(err.user_message(), "Admission already processed");
        assert_eq!(err.status(), Some(409));
    }

    #[test]
    fn empty_request_message_falls_back_to_status() {
        let err = DashboardError::Request {
            status: 500,
            message: "  ".to_string(),
        };
        assert_eq!(err.user_message(), "The server returned an error (500).");
    }

    #[test]
    fn validation_message_is_shown_verbatim() {
        let err = DashboardError::Validation("title is required".to_string());
        assert_eq!(err.user_message(), "Invalid input: title is required");
        assert_eq!(err.status(), None);
    }
}
