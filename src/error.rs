use crate::Value;

/// Error type returned by this crate.
#[derive(Debug, thiserror::Error)]
pub enum LunexError {
    /// Invalid client construction or request input (missing base URL,
    /// malformed header, zero timeout). Never retried.
    #[error("configuration error: {0}")]
    Configuration(String),
    /// Connectivity failure from `reqwest` (DNS, refused connection, broken
    /// body stream). Retryable.
    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),
    /// The attempt did not settle within the configured timeout. Retryable.
    #[error("Request timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },
    /// Non-success HTTP status. Never retried.
    #[error("HTTP {status} - {status_text}")]
    Http {
        /// Response status code.
        status: u16,
        /// Canonical reason phrase for `status`, empty when unknown.
        status_text: String,
        /// Parsed error body: JSON when the response declared JSON, raw text otherwise.
        details: Value,
    },
    /// A success-status body could not be parsed per its declared content type.
    #[error("parse error (status {status}): {message}")]
    Parse { status: u16, message: String },
}

impl LunexError {
    /// Whether the retry loop may recover from this error with another attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Timeout { .. })
    }

    /// HTTP status associated with the error, if a response was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } | Self::Parse { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Parsed error body for [`LunexError::Http`].
    pub fn details(&self) -> Option<&Value> {
        match self {
            Self::Http { details, .. } => Some(details),
            _ => None,
        }
    }

    /// Stable error kind name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "ConfigurationError",
            Self::Transport(_) => "TransportError",
            Self::Timeout { .. } => "TimeoutError",
            Self::Http { .. } => "HttpError",
            Self::Parse { .. } => "ParseError",
        }
    }
}
