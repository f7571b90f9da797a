//! Error types for the engine binary.
//!
//! [`EngineError`] is the top-level error type that wraps every failure
//! mode during startup, the run, and result persistence.

use crate::export::ExportError;

/// Top-level error for the engine binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: agora_core::ConfigError,
    },

    /// The simulation could not be built.
    #[error("simulation error: {source}")]
    Simulation {
        /// The underlying simulation error.
        #[from]
        source: agora_core::SimulationError,
    },

    /// The completion backend could not be created.
    #[error("LLM backend error: {source}")]
    Llm {
        /// The underlying backend construction error.
        #[from]
        source: agora_llm::LlmError,
    },

    /// Writing result files failed.
    #[error("export error: {source}")]
    Export {
        /// The underlying export error.
        #[from]
        source: ExportError,
    },
}
