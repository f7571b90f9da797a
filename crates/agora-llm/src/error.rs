//! Error types for backend construction.
//!
//! Failures during a completion call are reported as
//! [`agora_agents::BackendError`] so the household policy can fall back;
//! this module covers only what can go wrong before the first call.

/// Errors that can occur while creating a completion backend.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// The HTTP client could not be built.
    #[error("failed to build HTTP client: {source}")]
    Client {
        /// The underlying reqwest error.
        #[from]
        source: reqwest::Error,
    },

    /// The configured API URL is empty.
    #[error("LLM API URL must not be empty")]
    MissingUrl,
}
