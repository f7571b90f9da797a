//! Business policy: produce or reprice with equal odds.

use rand::Rng;
use rand::rngs::SmallRng;

use agora_types::{ActionType, Decision};

use super::{DecisionContext, DecisionPolicy};

/// Probability that a business reprices instead of producing.
pub const ADJUST_PRICE_PROBABILITY: f64 = 0.5;

/// Business policy independent of market state.
#[derive(Debug, Clone, Copy, Default)]
pub struct BusinessPolicy;

impl BusinessPolicy {
    /// Create the policy.
    pub const fn new() -> Self {
        Self
    }
}

impl DecisionPolicy for BusinessPolicy {
    fn name(&self) -> &'static str {
        "business"
    }

    fn decide(&self, ctx: &DecisionContext<'_>, rng: &mut SmallRng) -> Decision {
        let action = if rng.random::<f64>() < ADJUST_PRICE_PROBABILITY {
            ActionType::AdjustPrice
        } else {
            ActionType::Produce
        };
        Decision::on(action, ctx.good.clone())
    }
}
