//! Enumeration types for the Agora economy simulation.

use core::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Action vocabulary
// ---------------------------------------------------------------------------

/// An economic action chosen by an agent for one round.
///
/// The vocabulary is fixed; which subset an agent may choose depends on its
/// role. The serialized labels are the ones used in logs, exports and LLM
/// prompts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum ActionType {
    /// Buy one unit of a good at the current price.
    #[serde(rename = "buy")]
    Buy,
    /// Sell one unit of a good at the current price.
    #[serde(rename = "sell")]
    Sell,
    /// Keep the current position.
    #[serde(rename = "hold")]
    Hold,
    /// Put wealth aside; no state change.
    #[serde(rename = "save")]
    Save,
    /// Invest wealth for a small guaranteed return.
    #[serde(rename = "invest")]
    Invest,
    /// Produce one unit of a good (businesses).
    #[serde(rename = "produce")]
    Produce,
    /// Reprice a good by a random factor (businesses).
    #[serde(rename = "adjust_price")]
    AdjustPrice,
    /// Turn universal basic income on (government).
    #[serde(rename = "enable_UBI")]
    EnableUbi,
    /// Turn universal basic income off (government).
    #[serde(rename = "disable_UBI")]
    DisableUbi,
    /// Leave everything unchanged (government).
    #[serde(rename = "no-op")]
    NoOp,
}

impl ActionType {
    /// Every action, in vocabulary order.
    pub const ALL: [Self; 10] = [
        Self::Buy,
        Self::Sell,
        Self::Hold,
        Self::Save,
        Self::Invest,
        Self::Produce,
        Self::AdjustPrice,
        Self::EnableUbi,
        Self::DisableUbi,
        Self::NoOp,
    ];

    /// The household options offered to a language model, in match priority.
    pub const LLM_OPTIONS: [Self; 4] = [Self::Buy, Self::Sell, Self::Save, Self::Invest];

    /// The household actions a failed language-model call falls back to.
    pub const FALLBACK_OPTIONS: [Self; 5] =
        [Self::Buy, Self::Sell, Self::Save, Self::Invest, Self::Hold];

    /// The label used in logs, exports and prompts.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Buy => "buy",
            Self::Sell => "sell",
            Self::Hold => "hold",
            Self::Save => "save",
            Self::Invest => "invest",
            Self::Produce => "produce",
            Self::AdjustPrice => "adjust_price",
            Self::EnableUbi => "enable_UBI",
            Self::DisableUbi => "disable_UBI",
            Self::NoOp => "no-op",
        }
    }

    /// Look an action up by its label.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|action| action.as_str() == label)
    }

    /// Whether an agent of `role` may choose this action.
    pub const fn allowed_for(self, role: AgentRole) -> bool {
        match role {
            AgentRole::Household => matches!(
                self,
                Self::Buy | Self::Sell | Self::Hold | Self::Save | Self::Invest
            ),
            AgentRole::Business => matches!(self, Self::Produce | Self::AdjustPrice),
            AgentRole::Government => {
                matches!(self, Self::EnableUbi | Self::DisableUbi | Self::NoOp)
            }
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Agent traits
// ---------------------------------------------------------------------------

/// How much risk an agent is willing to take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum RiskDisposition {
    /// Avoids risk.
    Cautious,
    /// Neither seeks nor avoids risk.
    Neutral,
    /// Occasionally invests regardless of price movement.
    RiskTaker,
}

impl RiskDisposition {
    /// The label used in configuration files and prompts.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cautious => "cautious",
            Self::Neutral => "neutral",
            Self::RiskTaker => "risk_taker",
        }
    }
}

impl fmt::Display for RiskDisposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An agent's emotional state.
///
/// Recorded in memory for extension; no decision policy reads it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum Mood {
    /// The resting state.
    #[default]
    Neutral,
    /// Upbeat about the economy.
    Optimistic,
    /// Shaken by bad news.
    Pessimistic,
}

/// The role an agent plays in the economy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum AgentRole {
    /// Trades goods, receives UBI, pays wealth tax, counted in the Gini.
    Household,
    /// Produces and reprices goods.
    Business,
    /// Sets policy in reaction to inequality.
    Government,
}

// ---------------------------------------------------------------------------
// Controller phase
// ---------------------------------------------------------------------------

/// Lifecycle phase of the simulation controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum ControllerPhase {
    /// Just constructed or reset; no round has run and the run flag is off.
    Fresh,
    /// The run flag is on and the round limit is not reached.
    Running,
    /// The run flag is off after at least one round.
    Paused,
    /// The configured round limit has been reached.
    Done,
}
