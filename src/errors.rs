//! Error types for supportdesk
//!
//! Two layers of errors live here:
//! - [`DeskError`]: crate-level failures (configuration, I/O, invalid
//!   invariants) that callers are expected to handle or abort on.
//! - [`ModelError`]: the reason code returned from every model-invocation
//!   boundary. These never escape the public classify/retrieve/respond entry
//!   points; callers pick a fallback when they see one.

use thiserror::Error;

/// Main error type for supportdesk
#[derive(Error, Debug)]
pub enum DeskError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Chunk windowing that cannot advance
    #[error("Invalid chunking: overlap {overlap} must be smaller than size {size} (and size > 0)")]
    InvalidChunking { size: usize, overlap: usize },

    /// Vector index construction errors
    #[error("Vector index error: {0}")]
    IndexError(String),

    /// HTTP client construction errors
    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Model failures that reached a place where no fallback exists
    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Result type alias for crate operations
pub type Result<T> = std::result::Result<T, DeskError>;

/// Reason code for a failed model invocation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    /// Backend failed to initialize; fallback is permanent for the process
    #[error("{backend} unavailable: {reason}")]
    Unavailable { backend: String, reason: String },

    /// A single call to a loaded backend failed
    #[error("{backend} inference failed: {reason}")]
    Inference { backend: String, reason: String },

    /// Transport failure, timeout, or non-2xx response
    #[error("{backend} network failure: {reason}")]
    Network { backend: String, reason: String },

    /// Backend answered but not in the expected schema
    #[error("{backend} returned unparseable output: {reason}")]
    Parse { backend: String, reason: String },

    /// Backend refused the call for capacity, billing, or rate limits
    #[error("{backend} quota exceeded: {reason}")]
    QuotaExceeded { backend: String, reason: String },
}

/// Result type alias for model invocations
pub type ModelResult<T> = std::result::Result<T, ModelError>;

/// Short machine-readable category of a [`ModelError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelErrorKind {
    Unavailable,
    Inference,
    Network,
    Parse,
    QuotaExceeded,
}

impl ModelError {
    pub fn unavailable(backend: impl Into<String>, reason: impl ToString) -> Self {
        Self::Unavailable {
            backend: backend.into(),
            reason: reason.to_string(),
        }
    }

    pub fn inference(backend: impl Into<String>, reason: impl ToString) -> Self {
        Self::Inference {
            backend: backend.into(),
            reason: reason.to_string(),
        }
    }

    pub fn network(backend: impl Into<String>, reason: impl ToString) -> Self {
        Self::Network {
            backend: backend.into(),
            reason: reason.to_string(),
        }
    }

    pub fn parse(backend: impl Into<String>, reason: impl ToString) -> Self {
        Self::Parse {
            backend: backend.into(),
            reason: reason.to_string(),
        }
    }

    pub fn quota(backend: impl Into<String>, reason: impl ToString) -> Self {
        Self::QuotaExceeded {
            backend: backend.into(),
            reason: reason.to_string(),
        }
    }

    /// Category of this failure
    pub fn kind(&self) -> ModelErrorKind {
        match self {
            Self::Unavailable { .. } => ModelErrorKind::Unavailable,
            Self::Inference { .. } => ModelErrorKind::Inference,
            Self::Network { .. } => ModelErrorKind::Network,
            Self::Parse { .. } => ModelErrorKind::Parse,
            Self::QuotaExceeded { .. } => ModelErrorKind::QuotaExceeded,
        }
    }

    /// Whether this is a capacity/billing refusal
    pub fn is_quota(&self) -> bool {
        self.kind() == ModelErrorKind::QuotaExceeded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DeskError::InvalidChunking {
            size: 50,
            overlap: 50,
        };
        assert!(err.to_string().contains("50"));
    }

    #[test]
    fn test_model_error_kind() {
        let err = ModelError::quota("chat", "HTTP 429");
        assert_eq!(err.kind(), ModelErrorKind::QuotaExceeded);
        assert!(err.is_quota());
        assert!(err.to_string().contains("HTTP 429"));

        let err = ModelError::network("scraper", "timeout");
        assert!(!err.is_quota());
    }

    #[test]
    fn test_model_error_converts_to_desk_error() {
        let err: DeskError = ModelError::unavailable("embedder", "no weights").into();
        assert!(err.to_string().contains("embedder unavailable"));
    }
}
