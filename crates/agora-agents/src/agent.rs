//! The agent: identity, wealth, memory, and a boxed decision policy.
//!
//! An [`Agent`] separates deciding from applying. [`Agent::perceive`] and
//! [`Agent::decide`] only update the agent's own mood, memory and last
//! action; wealth changes come from the economy through the `credit`,
//! `debit` and `grow` methods.
//!
//! Memory is written by `perceive`. Each call files the previous round's
//! observation together with the action taken on it, so a decision always
//! compares the current round against what the agent saw last round.

use std::collections::BTreeMap;

use rand::rngs::SmallRng;

use agora_types::{
    ActionType, AgentId, AgentRecord, Decision, EnvironmentSnapshot, GoodId, MemoryEntry, Mood,
    RiskDisposition,
};

use crate::memory::Memory;
use crate::policy::{DecisionContext, DecisionPolicy};

/// Parameters for creating an [`Agent`].
#[derive(Debug, Clone)]
pub struct AgentParams {
    /// Unique identifier.
    pub id: AgentId,
    /// Starting wealth.
    pub wealth: f64,
    /// Risk disposition.
    pub risk: RiskDisposition,
    /// The good this agent trades.
    pub good: GoodId,
    /// Number of rounds remembered.
    pub memory_length: usize,
}

/// A decision-making participant in the economy.
#[derive(Debug)]
pub struct Agent {
    id: AgentId,
    wealth: f64,
    risk: RiskDisposition,
    mood: Mood,
    memory: Memory,
    last_action: Option<ActionType>,
    observed: Option<Observation>,
    good: GoodId,
    policy: Box<dyn DecisionPolicy>,
}

/// The current round as perceived, waiting for its action.
#[derive(Debug, Clone)]
struct Observation {
    round: u64,
    prices: BTreeMap<GoodId, f64>,
    mood: Mood,
    action: Option<ActionType>,
}

impl Agent {
    /// Create an agent driven by `policy`.
    pub fn new(params: AgentParams, policy: Box<dyn DecisionPolicy>) -> Self {
        Self {
            id: params.id,
            wealth: params.wealth,
            risk: params.risk,
            mood: Mood::Neutral,
            memory: Memory::new(params.memory_length),
            last_action: None,
            observed: None,
            good: params.good,
            policy,
        }
    }

    /// Agent identifier.
    pub const fn id(&self) -> AgentId {
        self.id
    }

    /// Current wealth.
    pub const fn wealth(&self) -> f64 {
        self.wealth
    }

    /// Risk disposition.
    pub const fn risk(&self) -> RiskDisposition {
        self.risk
    }

    /// Current mood.
    pub const fn mood(&self) -> Mood {
        self.mood
    }

    /// Remembered rounds.
    pub const fn memory(&self) -> &Memory {
        &self.memory
    }

    /// Action chosen in the most recent round.
    pub const fn last_action(&self) -> Option<ActionType> {
        self.last_action
    }

    /// The good this agent trades.
    pub const fn good(&self) -> &GoodId {
        &self.good
    }

    /// Name of the driving policy.
    pub fn policy_name(&self) -> &'static str {
        self.policy.name()
    }

    /// Observe a new round.
    ///
    /// Files the previous round into memory if the agent acted on it, then
    /// sets the mood from the news: a shock makes the agent pessimistic and
    /// any other headline calms it. The round being perceived is remembered
    /// at the next call.
    pub fn perceive(&mut self, snapshot: &EnvironmentSnapshot) {
        if let Some(Observation {
            round,
            prices,
            mood,
            action: Some(action),
        }) = self.observed.take()
        {
            self.memory.push(MemoryEntry {
                round,
                prices,
                action,
                mood,
            });
        }
        self.mood = if snapshot.shock {
            Mood::Pessimistic
        } else {
            Mood::Neutral
        };
        self.observed = Some(Observation {
            round: snapshot.round,
            prices: snapshot.prices.clone(),
            mood: self.mood,
            action: None,
        });
    }

    /// Choose this round's action.
    ///
    /// The policy sees memory up to the previous round. Deciding without
    /// perceiving first leaves memory untouched.
    pub fn decide(&mut self, snapshot: &EnvironmentSnapshot, rng: &mut SmallRng) -> Decision {
        let ctx = DecisionContext {
            snapshot,
            wealth: self.wealth,
            risk: self.risk,
            memory: &self.memory,
            good: &self.good,
        };
        let decision = self.policy.decide(&ctx, rng);
        self.last_action = Some(decision.action);
        if let Some(observed) = self.observed.as_mut() {
            observed.action = Some(decision.action);
        }
        decision
    }

    /// Add `amount` to wealth.
    pub fn credit(&mut self, amount: f64) {
        self.wealth += amount;
    }

    /// Subtract `amount` from wealth.
    pub fn debit(&mut self, amount: f64) {
        self.wealth -= amount;
    }

    /// Multiply wealth by `factor`.
    pub fn grow(&mut self, factor: f64) {
        self.wealth *= factor;
    }

    /// Exported view of this agent.
    pub fn record(&self) -> AgentRecord {
        AgentRecord {
            id: self.id,
            wealth: self.wealth,
            risk: self.risk,
            mood: self.mood,
            last_action: self.last_action,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeMap;

    use agora_types::PolicyState;
    use rand::SeedableRng;

    use super::*;
    use crate::policy::{GovernmentPolicy, RuleBasedPolicy};

    fn household(risk: RiskDisposition) -> Agent {
        Agent::new(
            AgentParams {
                id: AgentId::Household(0),
                wealth: 1000.0,
                risk,
                good: GoodId::from("GoodA"),
                memory_length: 3,
            },
            Box::new(RuleBasedPolicy::new()),
        )
    }

    fn snapshot(round: u64, price: f64, shock: bool) -> EnvironmentSnapshot {
        EnvironmentSnapshot {
            round,
            prices: BTreeMap::from([(GoodId::from("GoodA"), price)]),
            news: "Sudden market crash!".to_owned(),
            shock,
            policies: PolicyState::default(),
            gini: 0.0,
        }
    }

    #[test]
    fn falling_prices_hold_then_buy() {
        let mut agent = household(RiskDisposition::Cautious);
        let mut rng = SmallRng::seed_from_u64(1);
        let mut price = 100.0;
        let mut actions = Vec::new();
        for round in 0..6_u64 {
            let snap = snapshot(round, price, false);
            agent.perceive(&snap);
            actions.push(agent.decide(&snap, &mut rng).action);
            price -= 1.0;
        }
        assert_eq!(actions.first(), Some(&ActionType::Hold));
        assert!(actions.iter().skip(1).all(|a| *a == ActionType::Buy));
        assert_eq!(agent.last_action(), Some(ActionType::Buy));
    }

    #[test]
    fn perceive_files_the_previous_round() {
        let mut agent = household(RiskDisposition::Neutral);
        let mut rng = SmallRng::seed_from_u64(2);

        let first = snapshot(0, 100.0, true);
        agent.perceive(&first);
        agent.decide(&first, &mut rng);
        assert!(agent.memory().is_empty());

        agent.perceive(&snapshot(1, 104.0, false));
        let filed = agent.memory().last().unwrap();
        assert_eq!(filed.round, 0);
        assert_eq!(filed.action, ActionType::Hold);
        assert_eq!(filed.mood, Mood::Pessimistic);
        assert_eq!(agent.memory().last_price(&GoodId::from("GoodA")), Some(100.0));
    }

    #[test]
    fn memory_is_bounded_and_records_decisions() {
        let mut agent = household(RiskDisposition::Neutral);
        let mut rng = SmallRng::seed_from_u64(2);
        for round in 0..6_u64 {
            let snap = snapshot(round, 100.0, false);
            agent.perceive(&snap);
            agent.decide(&snap, &mut rng);
        }
        assert_eq!(agent.memory().len(), 3);
        let last = agent.memory().last().unwrap();
        assert_eq!(last.round, 4);
        assert_eq!(last.action, ActionType::Hold);
    }

    #[test]
    fn deciding_without_perceiving_remembers_nothing() {
        let mut agent = household(RiskDisposition::Neutral);
        let mut rng = SmallRng::seed_from_u64(3);
        for round in 0..3_u64 {
            agent.decide(&snapshot(round, 100.0, false), &mut rng);
        }
        assert!(agent.memory().is_empty());
        assert_eq!(agent.last_action(), Some(ActionType::Hold));
    }

    #[test]
    fn shocks_sour_the_mood() {
        let mut agent = household(RiskDisposition::Neutral);
        agent.perceive(&snapshot(0, 100.0, true));
        assert_eq!(agent.mood(), Mood::Pessimistic);
        agent.perceive(&snapshot(1, 100.0, false));
        assert_eq!(agent.mood(), Mood::Neutral);
    }

    #[test]
    fn wealth_operations() {
        let mut agent = household(RiskDisposition::Neutral);
        agent.debit(100.0);
        agent.credit(50.0);
        agent.grow(1.01);
        assert!((agent.wealth() - 959.5).abs() < 1e-9);
        let record = agent.record();
        assert_eq!(record.id, AgentId::Household(0));
        assert!((record.wealth - 959.5).abs() < 1e-9);
        assert_eq!(record.last_action, None);
    }

    #[test]
    fn government_decides_without_a_good() {
        let mut gov = Agent::new(
            AgentParams {
                id: AgentId::Government,
                wealth: 0.0,
                risk: RiskDisposition::Neutral,
                good: GoodId::from("GoodA"),
                memory_length: 5,
            },
            Box::new(GovernmentPolicy::new()),
        );
        let mut rng = SmallRng::seed_from_u64(0);
        let decision = gov.decide(&snapshot(0, 100.0, false), &mut rng);
        assert_eq!(decision.action, ActionType::DisableUbi);
        assert!(decision.good.is_none());
        assert_eq!(gov.policy_name(), "government");
    }
}
