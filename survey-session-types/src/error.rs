use serde::{Deserialize, Serialize};

/// An error reported by the survey backend.
///
/// Carries the backend's message so it can be shown to the respondent. Transport
/// failures (connection refused, undecodable body) are folded into the same shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    pub message: String,

    /// HTTP status, when the failure came from a response.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl ApiError {
    /// Create an error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: None,
        }
    }

    /// Attach an HTTP status.
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Check if the backend reported the resource as missing.
    pub fn is_not_found(&self) -> bool {
        self.status == Some(404)
    }
}

/// Error type for the non-backend collaborators (credentials, renderers, encoders).
#[derive(Debug, thiserror::Error)]
pub enum CollaboratorError {
    /// The respondent cancelled (Ctrl+C, closed window, etc.)
    #[error("Cancelled by user")]
    Cancelled,

    /// Collaborator-specific failure (I/O, encoder limits, auth provider down, etc.)
    #[error("Collaborator error: {0}")]
    Failed(#[from] anyhow::Error),
}

impl CollaboratorError {
    /// Create a failure from any error type.
    pub fn failed(err: impl Into<anyhow::Error>) -> Self {
        Self::Failed(err.into())
    }

    /// Check if this error represents user cancellation.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}
