//! Per-round views shared between the economy and agent policies.
//!
//! An [`EnvironmentSnapshot`] is assembled once per round before any agent
//! acts. Agents read it, choose a [`Decision`], and remember the round as a
//! [`MemoryEntry`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{ActionType, Mood};
use crate::ids::GoodId;

/// Policy switches currently in force.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PolicyState {
    /// Whether universal basic income is paid at the end of each round.
    pub ubi: bool,
}

/// What every agent observes at the start of a round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct EnvironmentSnapshot {
    /// The round about to be played (0-based).
    pub round: u64,
    /// Price of every good before this round's trades.
    #[ts(type = "Record<string, number>")]
    pub prices: BTreeMap<GoodId, f64>,
    /// The headline published this round.
    pub news: String,
    /// Whether a market shock was announced this round.
    pub shock: bool,
    /// Policy switches in force when the round started.
    pub policies: PolicyState,
    /// Household Gini coefficient before this round's actions.
    pub gini: f64,
}

impl EnvironmentSnapshot {
    /// Price of `good`, if the market lists it.
    pub fn price_of(&self, good: &GoodId) -> Option<f64> {
        self.prices.get(good).copied()
    }
}

/// An agent's choice for one round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Decision {
    /// What the agent does.
    pub action: ActionType,
    /// The good the action applies to, when it concerns one.
    pub good: Option<GoodId>,
}

impl Decision {
    /// An action that concerns no particular good.
    pub const fn bare(action: ActionType) -> Self {
        Self { action, good: None }
    }

    /// An action on `good`.
    pub const fn on(action: ActionType, good: GoodId) -> Self {
        Self {
            action,
            good: Some(good),
        }
    }
}

/// One remembered round in an agent's bounded history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct MemoryEntry {
    /// Round the entry was recorded in.
    pub round: u64,
    /// Prices the agent saw that round.
    #[ts(type = "Record<string, number>")]
    pub prices: BTreeMap<GoodId, f64>,
    /// The action the agent chose.
    pub action: ActionType,
    /// The agent's mood at decision time.
    pub mood: Mood,
}
