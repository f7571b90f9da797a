//! Government policy: react to household inequality.
//!
//! Above [`UBI_ENABLE_THRESHOLD`] the government switches universal basic
//! income on, below [`UBI_DISABLE_THRESHOLD`] it switches it off, and in
//! between it leaves policy alone.

use rand::rngs::SmallRng;

use agora_types::{ActionType, Decision};

use super::{DecisionContext, DecisionPolicy};

/// Gini above which UBI is enabled (0.5).
pub const UBI_ENABLE_THRESHOLD: f64 = 0.5;

/// Gini below which UBI is disabled (0.3).
pub const UBI_DISABLE_THRESHOLD: f64 = 0.3;

/// Threshold rule on the snapshot Gini coefficient.
#[derive(Debug, Clone, Copy, Default)]
pub struct GovernmentPolicy;

impl GovernmentPolicy {
    /// Create the policy.
    pub const fn new() -> Self {
        Self
    }

    /// The action the threshold rule prescribes for `gini`.
    ///
    /// An undefined (NaN) coefficient leaves policy alone.
    pub const fn action_for(gini: f64) -> ActionType {
        if gini > UBI_ENABLE_THRESHOLD {
            ActionType::EnableUbi
        } else if gini < UBI_DISABLE_THRESHOLD {
            ActionType::DisableUbi
        } else {
            ActionType::NoOp
        }
    }
}

impl DecisionPolicy for GovernmentPolicy {
    fn name(&self) -> &'static str {
        "government"
    }

    fn decide(&self, ctx: &DecisionContext<'_>, _rng: &mut SmallRng) -> Decision {
        Decision::bare(Self::action_for(ctx.snapshot.gini))
    }
}
