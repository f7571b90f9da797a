//! Records reported by the economy to observers and exporters.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{ActionType, ControllerPhase, Mood, RiskDisposition};
use crate::ids::{AgentId, GoodId};
use crate::snapshot::PolicyState;

/// Exported view of a single agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct AgentRecord {
    /// Agent identifier (`7`, `B3`, `GOV`).
    #[ts(type = "string")]
    pub id: AgentId,
    /// Current wealth.
    pub wealth: f64,
    /// Risk disposition.
    pub risk: RiskDisposition,
    /// Current mood.
    pub mood: Mood,
    /// Action chosen in the most recent round, if any.
    pub last_action: Option<ActionType>,
}

/// Outcome of one economy round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct RoundSummary {
    /// The round that was played (0-based).
    pub round: u64,
    /// The headline published this round.
    pub news: String,
    /// Whether a market shock hit this round.
    pub shock: bool,
    /// Household buys executed.
    pub buys: u32,
    /// Household buys rejected for lack of wealth.
    pub blocked_buys: u32,
    /// Household sells executed.
    pub sells: u32,
    /// Household investments made.
    pub investments: u32,
    /// Units produced by businesses.
    pub produced: u32,
    /// Business price adjustments.
    pub price_adjustments: u32,
    /// Policy switches in force after the government acted.
    pub policies: PolicyState,
    /// Total UBI paid to households.
    pub ubi_paid: f64,
    /// Total wealth tax collected from households.
    pub tax_collected: f64,
    /// Prices after the market update.
    #[ts(type = "Record<string, number>")]
    pub prices: BTreeMap<GoodId, f64>,
    /// Household Gini coefficient after the round.
    pub gini: f64,
}

/// Owned, serializable view of the whole simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct StateSnapshot {
    /// Number of completed rounds.
    pub round: u64,
    /// Configured round limit.
    pub max_rounds: u64,
    /// Controller lifecycle phase.
    pub phase: ControllerPhase,
    /// Policy switches currently in force.
    pub policies: PolicyState,
    /// Current prices.
    #[ts(type = "Record<string, number>")]
    pub prices: BTreeMap<GoodId, f64>,
    /// Full price history per good, one entry per completed round.
    #[ts(type = "Record<string, Array<number>>")]
    pub price_history: BTreeMap<GoodId, Vec<f64>>,
    /// Household Gini per completed round.
    pub gini_history: Vec<f64>,
    /// Every agent in population order.
    pub agents: Vec<AgentRecord>,
}
