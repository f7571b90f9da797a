//! HTTP completion backends for the Agora economy simulation.
//!
//! Implements [`agora_agents::CompletionBackend`] for OpenAI-compatible and
//! Anthropic APIs using a blocking `reqwest` client.
//!
//! # Modules
//!
//! - [`backend`] -- The two backends and the [`create_backend`] factory
//! - [`error`] -- Construction errors ([`LlmError`])

pub mod backend;
pub mod error;

pub use backend::{AnthropicBackend, OpenAiBackend, create_backend};
pub use error::LlmError;
