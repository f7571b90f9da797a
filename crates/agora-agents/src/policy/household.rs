//! Rule-based household policy.
//!
//! A household compares the current price of its good with the price it
//! remembers from last round: cheaper means buy, dearer means sell, equal
//! (or nothing remembered) means hold. Risk takers then invest with a fixed
//! probability regardless of the price comparison.

use core::cmp::Ordering;

use rand::Rng;
use rand::rngs::SmallRng;

use agora_types::{ActionType, Decision, RiskDisposition};

use super::{DecisionContext, DecisionPolicy};

/// Probability that a risk taker overrides its price-trend action with
/// `invest`.
pub const RISK_TAKER_INVEST_PROBABILITY: f64 = 0.2;

/// Buy-low, sell-high household policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleBasedPolicy;

impl RuleBasedPolicy {
    /// Create the policy.
    pub const fn new() -> Self {
        Self
    }
}

impl DecisionPolicy for RuleBasedPolicy {
    fn name(&self) -> &'static str {
        "rule_based"
    }

    fn decide(&self, ctx: &DecisionContext<'_>, rng: &mut SmallRng) -> Decision {
        price_trend_decision(ctx, rng)
    }
}

/// The rule-based household decision, shared with the language-model
/// policy when no backend is configured.
pub fn price_trend_decision(ctx: &DecisionContext<'_>, rng: &mut SmallRng) -> Decision {
    let mut action = trend_action(ctx);
    if ctx.risk == RiskDisposition::RiskTaker && rng.random_bool(RISK_TAKER_INVEST_PROBABILITY) {
        action = ActionType::Invest;
    }
    Decision::on(action, ctx.good.clone())
}

/// Compare the current price with the remembered one.
fn trend_action(ctx: &DecisionContext<'_>) -> ActionType {
    let Some(current) = ctx.snapshot.price_of(ctx.good) else {
        return ActionType::Hold;
    };
    let previous = ctx.memory.last_price(ctx.good).unwrap_or(current);
    match current.partial_cmp(&previous) {
        Some(Ordering::Less) => ActionType::Buy,
        Some(Ordering::Greater) => ActionType::Sell,
        Some(Ordering::Equal) | None => ActionType::Hold,
    }
}
