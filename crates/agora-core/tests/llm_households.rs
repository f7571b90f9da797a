//! Simulations whose households consult an injected completion backend.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use agora_agents::{BackendError, CompletionBackend, GenerationParams};
use agora_core::{Simulation, SimulationConfig};
use agora_types::ActionType;

struct Counting {
    reply: &'static str,
    calls: AtomicU64,
}

impl CompletionBackend for Counting {
    fn name(&self) -> &str {
        "counting"
    }

    fn complete(&self, prompt: &str, params: &GenerationParams) -> Result<String, BackendError> {
        assert!(prompt.contains("Options: buy, sell, save, invest"));
        assert_eq!(params.max_tokens, 32);
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.reply.to_owned())
    }
}

struct Down;

impl CompletionBackend for Down {
    fn name(&self) -> &str {
        "down"
    }

    fn complete(&self, _prompt: &str, _params: &GenerationParams) -> Result<String, BackendError> {
        Err(BackendError::Status {
            backend: "down".to_owned(),
            status: 503,
            body: "unavailable".to_owned(),
        })
    }
}

fn llm_config(households: u32, rounds: u64) -> SimulationConfig {
    let mut config = SimulationConfig::default();
    config.simulation.households = households;
    config.simulation.businesses = 0;
    config.simulation.rounds = rounds;
    config.llm.enabled = true;
    config.llm.max_tokens = 32;
    config
}

#[test]
fn every_household_asks_the_backend_each_round() {
    let backend = Arc::new(Counting {
        reply: "Definitely save.",
        calls: AtomicU64::new(0),
    });
    let shared: Arc<dyn CompletionBackend> = Arc::clone(&backend) as Arc<dyn CompletionBackend>;
    let mut sim = Simulation::new(llm_config(4, 3), Some(shared)).unwrap();
    sim.set_running(true);
    assert_eq!(sim.run(None), 3);
    assert_eq!(backend.calls.load(Ordering::SeqCst), 12);
    for household in sim.economy().households() {
        assert_eq!(household.last_action(), Some(ActionType::Save));
        assert!((household.wealth() - 1000.0).abs() < 1e-9);
    }
}

#[test]
fn failing_backend_still_completes_every_round() {
    let mut sim = Simulation::new(llm_config(10, 20), Some(Arc::new(Down))).unwrap();
    sim.set_running(true);
    assert_eq!(sim.run(None), 20);
    assert!(sim.is_done());
    for household in sim.economy().households() {
        let action = household.last_action().unwrap();
        assert!(ActionType::FALLBACK_OPTIONS.contains(&action));
    }
}
