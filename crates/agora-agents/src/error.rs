//! Error types for the agora-agents crate.
//!
//! Decision policies never fail: every error defined here is recovered
//! inside the language-model policy and replaced by a fallback action.
//! The variants exist so backends can report precisely what went wrong
//! before the fallback is taken.

/// Errors reported by a completion backend or by prompt rendering.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// No API key was configured for the backend.
    #[error("missing credentials for {backend} backend")]
    MissingCredentials {
        /// Human-readable backend name.
        backend: String,
    },

    /// The HTTP request could not be sent or timed out.
    #[error("{backend} request failed: {message}")]
    Request {
        /// Human-readable backend name.
        backend: String,
        /// Description of the transport failure.
        message: String,
    },

    /// The backend answered with a non-success status.
    #[error("{backend} returned {status}: {body}")]
    Status {
        /// Human-readable backend name.
        backend: String,
        /// HTTP status code.
        status: u16,
        /// Response body, for diagnostics.
        body: String,
    },

    /// The response body did not have the expected shape.
    #[error("malformed {backend} response: {reason}")]
    MalformedResponse {
        /// Human-readable backend name.
        backend: String,
        /// What was missing or wrong.
        reason: String,
    },

    /// The prompt template could not be loaded or rendered.
    #[error("prompt template error: {0}")]
    Prompt(String),
}
