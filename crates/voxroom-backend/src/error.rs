use thiserror::Error;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("backend returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl BackendError {
    /// Text suitable for showing to the user: the backend's own error string
    /// when it sent one, otherwise the transport error.
    pub fn user_message(&self) -> String {
        match self {
            Self::Status { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
