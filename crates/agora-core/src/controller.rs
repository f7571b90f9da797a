//! Simulation controller: reset, step, run and pause around an [`Economy`].
//!
//! The controller owns the configuration, the economy and the single seeded
//! random source. Its lifecycle is a small state machine
//! ([`ControllerPhase`]):
//!
//! - **Fresh** -- after construction or [`Simulation::reset`]
//! - **Running** -- the run flag is on and rounds remain
//! - **Paused** -- the run flag is off after at least one round
//! - **Done** -- the configured round limit has been reached
//!
//! [`Simulation::step`] ignores the run flag so a driver can single-step a
//! paused simulation; [`Simulation::run`] only advances while the flag is on.

use std::convert::Infallible;
use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::SmallRng;
use tracing::info;

use agora_agents::{Agent, BackendError, CompletionBackend};
use agora_types::{ControllerPhase, PolicyState, RoundSummary, StateSnapshot};

use crate::config::{ConfigError, SimulationConfig};
use crate::economy::{Economy, PolicySettings};
use crate::market::Market;
use crate::news::SyntheticNews;
use crate::population::build_population;

/// Errors that can occur when building or rebuilding a simulation.
#[derive(Debug, thiserror::Error)]
pub enum SimulationError {
    /// The configuration is invalid.
    #[error("configuration error: {source}")]
    Config {
        /// The underlying configuration error.
        #[from]
        source: ConfigError,
    },

    /// The household prompt template could not be prepared.
    #[error("prompt error: {source}")]
    Prompt {
        /// The underlying prompt error.
        #[from]
        source: BackendError,
    },
}

/// Borrowed, read-only view of the simulation for observers and exporters.
#[derive(Debug, Clone, Copy)]
pub struct SimulationState<'a> {
    /// Number of completed rounds.
    pub round: u64,
    /// Configured round limit.
    pub max_rounds: u64,
    /// Controller lifecycle phase.
    pub phase: ControllerPhase,
    /// Households, in population order.
    pub households: &'a [Agent],
    /// Businesses, in population order.
    pub businesses: &'a [Agent],
    /// The government.
    pub government: &'a Agent,
    /// The market, including price histories.
    pub market: &'a Market,
    /// Policy switches in force.
    pub policies: PolicyState,
    /// Closing Gini of every completed round.
    pub gini_history: &'a [f64],
}

impl SimulationState<'_> {
    /// Every agent: households, businesses, then the government.
    pub fn agents(&self) -> impl Iterator<Item = &Agent> {
        self.households
            .iter()
            .chain(self.businesses.iter())
            .chain(core::iter::once(self.government))
    }

    /// Owned, serializable copy of this view.
    pub fn to_snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            round: self.round,
            max_rounds: self.max_rounds,
            phase: self.phase,
            policies: self.policies,
            prices: self.market.prices(),
            price_history: self.market.histories().clone(),
            gini_history: self.gini_history.to_vec(),
            agents: self.agents().map(Agent::record).collect(),
        }
    }
}

/// Called after every round completed by [`Simulation::run_with`].
pub trait RoundObserver {
    /// Error that aborts the run.
    type Error;

    /// Observe a completed round.
    ///
    /// # Errors
    ///
    /// An error stops the run after this round; the simulation itself stays
    /// consistent and can be resumed.
    fn on_round(
        &mut self,
        summary: &RoundSummary,
        state: &SimulationState<'_>,
    ) -> Result<(), Self::Error>;
}

/// An observer that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpObserver;

impl RoundObserver for NoOpObserver {
    type Error = Infallible;

    fn on_round(
        &mut self,
        _summary: &RoundSummary,
        _state: &SimulationState<'_>,
    ) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// The simulation controller.
pub struct Simulation {
    config: SimulationConfig,
    backend: Option<Arc<dyn CompletionBackend>>,
    economy: Economy,
    rng: SmallRng,
    running: bool,
    done: bool,
}

impl core::fmt::Debug for Simulation {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Simulation")
            .field("round", &self.economy.round())
            .field("running", &self.running)
            .field("done", &self.done)
            .field("backend", &self.backend.as_ref().map(|b| b.name().to_owned()))
            .finish_non_exhaustive()
    }
}

impl Simulation {
    /// Validate `config` and build a fresh simulation.
    ///
    /// `backend` drives language-model households when `llm.enabled` is set;
    /// without one they decide by rules.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::Config`] for an invalid configuration, or
    /// [`SimulationError::Prompt`] if a prompt template cannot be loaded.
    pub fn new(
        config: SimulationConfig,
        backend: Option<Arc<dyn CompletionBackend>>,
    ) -> Result<Self, SimulationError> {
        config.validate()?;
        let economy = build_economy(&config, backend.as_ref())?;
        let rng = SmallRng::seed_from_u64(config.simulation.seed);
        Ok(Self {
            config,
            backend,
            economy,
            rng,
            running: false,
            done: false,
        })
    }

    /// Rebuild all state from the configuration and reseed the random
    /// source. The controller returns to [`ControllerPhase::Fresh`].
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::Prompt`] if a prompt template file has
    /// become unreadable since construction.
    pub fn reset(&mut self) -> Result<(), SimulationError> {
        self.economy = build_economy(&self.config, self.backend.as_ref())?;
        self.rng = SmallRng::seed_from_u64(self.config.simulation.seed);
        self.running = false;
        self.done = false;
        info!(seed = self.config.simulation.seed, "Simulation reset");
        Ok(())
    }

    /// Replace the configuration and reset.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::Config`] and leaves the simulation
    /// untouched if `config` is invalid.
    pub fn set_config(&mut self, config: SimulationConfig) -> Result<(), SimulationError> {
        config.validate()?;
        let economy = build_economy(&config, self.backend.as_ref())?;
        self.config = config;
        self.economy = economy;
        self.rng = SmallRng::seed_from_u64(self.config.simulation.seed);
        self.running = false;
        self.done = false;
        info!(seed = self.config.simulation.seed, "Configuration replaced");
        Ok(())
    }

    /// Play one round unless done.
    ///
    /// Returns the round's summary, or `None` if the round limit had
    /// already been reached.
    pub fn step(&mut self) -> Option<RoundSummary> {
        if self.done {
            return None;
        }
        let summary = self.economy.step(&mut self.rng);
        if self.economy.round() >= self.config.simulation.rounds {
            self.done = true;
            info!(
                round = self.economy.round(),
                gini = %summary.gini,
                "Round limit reached"
            );
        }
        Some(summary)
    }

    /// Step while running and not done, at most `max_steps` times
    /// (default: the configured round limit).
    ///
    /// Returns the number of rounds played.
    pub fn run(&mut self, max_steps: Option<u64>) -> u64 {
        match self.run_with(max_steps, &mut NoOpObserver) {
            Ok(steps) => steps,
            Err(never) => match never {},
        }
    }

    /// Like [`Simulation::run`], calling `observer` after every round.
    ///
    /// # Errors
    ///
    /// Returns the observer's error; rounds played before it remain applied.
    pub fn run_with<O: RoundObserver>(
        &mut self,
        max_steps: Option<u64>,
        observer: &mut O,
    ) -> Result<u64, O::Error> {
        let limit = max_steps.unwrap_or(self.config.simulation.rounds);
        let mut steps: u64 = 0;
        while steps < limit && self.running && !self.done {
            let Some(summary) = self.step() else {
                break;
            };
            steps = steps.saturating_add(1);
            observer.on_round(&summary, &self.state())?;
        }
        Ok(steps)
    }

    /// Turn the run flag on or off without touching simulation state.
    pub fn set_running(&mut self, running: bool) {
        self.running = running;
    }

    /// Whether the run flag is on.
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// Whether the round limit has been reached.
    pub const fn is_done(&self) -> bool {
        self.done
    }

    /// Current lifecycle phase.
    pub const fn phase(&self) -> ControllerPhase {
        if self.done {
            ControllerPhase::Done
        } else if self.running {
            ControllerPhase::Running
        } else if self.economy.round() == 0 {
            ControllerPhase::Fresh
        } else {
            ControllerPhase::Paused
        }
    }

    /// Number of completed rounds.
    pub const fn round(&self) -> u64 {
        self.economy.round()
    }

    /// The configuration in force.
    pub const fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// The underlying economy.
    pub const fn economy(&self) -> &Economy {
        &self.economy
    }

    /// Borrowed read-only view for observers and exporters.
    pub fn state(&self) -> SimulationState<'_> {
        SimulationState {
            round: self.economy.round(),
            max_rounds: self.config.simulation.rounds,
            phase: self.phase(),
            households: self.economy.households(),
            businesses: self.economy.businesses(),
            government: self.economy.government(),
            market: self.economy.market(),
            policies: self.economy.policies(),
            gini_history: self.economy.gini_history(),
        }
    }

    /// Owned, serializable copy of the current state.
    pub fn snapshot(&self) -> StateSnapshot {
        self.state().to_snapshot()
    }
}

fn build_economy(
    config: &SimulationConfig,
    backend: Option<&Arc<dyn CompletionBackend>>,
) -> Result<Economy, SimulationError> {
    let population = build_population(config, backend)?;
    let market = Market::new(&config.market.goods, config.market.initial_price);
    let news = SyntheticNews::new(&config.news.custom_headlines);
    Ok(Economy::new(
        population,
        market,
        Box::new(news),
        PolicySettings::from(&config.policy),
    ))
}
