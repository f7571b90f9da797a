//! Agents and decision policies for the Agora economy simulation.
//!
//! This crate holds everything an agent does on its own: remembering
//! rounds, reacting to news, and choosing actions. Applying those actions
//! to wealth and the market is the engine core's job.
//!
//! # Modules
//!
//! - [`agent`] -- The [`Agent`] type and its wealth operations
//! - [`error`] -- Completion backend errors ([`BackendError`])
//! - [`memory`] -- Bounded FIFO decision history ([`Memory`])
//! - [`policy`] -- The [`DecisionPolicy`] trait, its four implementations,
//!   prompt rendering and the [`CompletionBackend`] protocol

pub mod agent;
pub mod error;
pub mod memory;
pub mod policy;

// Re-export primary types at crate root for convenience.
pub use agent::{Agent, AgentParams};
pub use error::BackendError;
pub use memory::{DEFAULT_MEMORY_LENGTH, Memory};
pub use policy::{
    BusinessPolicy, CompletionBackend, DecisionContext, DecisionPolicy, GenerationParams,
    GovernmentPolicy, LlmPolicy, PromptRenderer, RuleBasedPolicy,
};
