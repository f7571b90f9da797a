//! Decision policies: how an agent turns a snapshot into an action.
//!
//! Every agent holds one boxed [`DecisionPolicy`]. The economy calls it
//! once per round through [`crate::Agent::decide`] and applies the returned
//! [`Decision`] itself; policies never touch wealth or market state.
//!
//! # Policies
//!
//! - [`household::RuleBasedPolicy`] -- buy on falling prices, sell on rising
//! - [`llm::LlmPolicy`] -- asks a [`CompletionBackend`], with fallbacks
//! - [`business::BusinessPolicy`] -- produce or reprice at random
//! - [`government::GovernmentPolicy`] -- toggles UBI on inequality thresholds

pub mod business;
pub mod government;
pub mod household;
pub mod llm;
pub mod prompt;

use core::fmt;

use rand::rngs::SmallRng;

use agora_types::{Decision, EnvironmentSnapshot, GoodId, RiskDisposition};

use crate::error::BackendError;
use crate::memory::Memory;

pub use business::BusinessPolicy;
pub use government::GovernmentPolicy;
pub use household::RuleBasedPolicy;
pub use llm::LlmPolicy;
pub use prompt::PromptRenderer;

/// Everything a policy may look at when deciding.
#[derive(Debug, Clone, Copy)]
pub struct DecisionContext<'a> {
    /// The round's shared view of the economy.
    pub snapshot: &'a EnvironmentSnapshot,
    /// The deciding agent's wealth.
    pub wealth: f64,
    /// The deciding agent's risk disposition.
    pub risk: RiskDisposition,
    /// The deciding agent's memory, not yet including this round.
    pub memory: &'a Memory,
    /// The good this agent trades.
    pub good: &'a GoodId,
}

/// Maps a round's context to exactly one decision.
///
/// Implementations draw all randomness from the supplied `rng` so that
/// runs are reproducible from a seed.
pub trait DecisionPolicy: fmt::Debug + Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Choose this round's action.
    fn decide(&self, ctx: &DecisionContext<'_>, rng: &mut SmallRng) -> Decision;
}

// ---------------------------------------------------------------------------
// Completion backend protocol
// ---------------------------------------------------------------------------

/// Sampling parameters forwarded to a completion backend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationParams {
    /// Upper bound on generated tokens.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f64,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_tokens: 64,
            temperature: 0.7,
        }
    }
}

/// A text-completion service that answers a single prompt.
///
/// Calls may block on the network. Failures are returned, never panicked,
/// and the caller decides how to recover.
pub trait CompletionBackend: Send + Sync {
    /// Human-readable backend name for logging.
    fn name(&self) -> &str;

    /// Send `prompt` and return the free-text answer.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] on missing credentials, transport failures,
    /// non-success responses, or responses without text.
    fn complete(&self, prompt: &str, params: &GenerationParams) -> Result<String, BackendError>;
}
