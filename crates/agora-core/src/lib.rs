//! Engine core for the Agora economy simulation.
//!
//! This crate owns everything with round-to-round state: the market and its
//! pricing rule, the economy's round loop, the inequality metric, and the
//! controller that wraps them for batch and interactive drivers.
//!
//! # Modules
//!
//! - [`config`] -- Typed configuration loaded from `agora-config.yaml`
//! - [`controller`] -- [`Simulation`] state machine, observers, state views
//! - [`economy`] -- The per-round control loop ([`Economy`])
//! - [`inequality`] -- Gini coefficient over household wealth
//! - [`market`] -- Goods, supply/demand pricing, price history
//! - [`news`] -- Per-round headlines ([`NewsSource`], [`SyntheticNews`])
//! - [`population`] -- Building agents from configuration

pub mod config;
pub mod controller;
pub mod economy;
pub mod inequality;
pub mod market;
pub mod news;
pub mod population;

// Re-export primary types at crate root for convenience.
pub use config::{ConfigError, LlmBackendKind, LlmConfig, SimulationConfig};
pub use controller::{NoOpObserver, RoundObserver, Simulation, SimulationError, SimulationState};
pub use economy::{Economy, PolicySettings, Population};
pub use inequality::gini;
pub use market::{Good, Market};
pub use news::{Headline, NewsSource, SyntheticNews};
pub use population::build_population;
