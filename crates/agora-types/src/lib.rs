//! Shared type definitions for the Agora economy simulation.
//!
//! This crate is the single source of truth for the data model shared by
//! the agents, the engine core and external consumers (exporters and the
//! dashboard). Exported records flow downstream to `TypeScript` via `ts-rs`.
//!
//! # Modules
//!
//! - [`ids`] -- Identifiers for agents and goods
//! - [`enums`] -- Action vocabulary, risk dispositions, moods, roles, phases
//! - [`snapshot`] -- Per-round environment snapshot, decisions and memory entries
//! - [`structs`] -- Read-only records for round summaries and state export

pub mod enums;
pub mod ids;
pub mod snapshot;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{ActionType, AgentRole, ControllerPhase, Mood, RiskDisposition};
pub use ids::{AgentId, GoodId, ParseAgentIdError};
pub use snapshot::{Decision, EnvironmentSnapshot, MemoryEntry, PolicyState};
pub use structs::{AgentRecord, RoundSummary, StateSnapshot};
