//! Building the agent population from configuration.
//!
//! Households are numbered `0..n` and take risk dispositions round-robin
//! from the configured set. They are language-model backed when
//! `llm.enabled` is set (falling back to rules if no backend is supplied)
//! and rule-based otherwise. Businesses are `B0..Bn`, neutral, with the
//! configured business wealth. The government is `GOV` with no wealth.

use std::sync::Arc;
use tracing::info;

use agora_agents::{
    Agent, AgentParams, BusinessPolicy, CompletionBackend, DecisionPolicy, GenerationParams,
    GovernmentPolicy, LlmPolicy, PromptRenderer, RuleBasedPolicy,
};
use agora_types::{AgentId, GoodId, RiskDisposition};

use crate::config::{ConfigError, LlmConfig, SimulationConfig};
use crate::controller::SimulationError;
use crate::economy::Population;

/// Build every agent described by `config`.
///
/// `backend` is shared by all language-model backed households.
///
/// # Errors
///
/// Returns [`SimulationError::Config`] if no good is configured, or
/// [`SimulationError::Prompt`] if a configured prompt template cannot be
/// loaded.
pub fn build_population(
    config: &SimulationConfig,
    backend: Option<&Arc<dyn CompletionBackend>>,
) -> Result<Population, SimulationError> {
    let good = config
        .primary_good()
        .cloned()
        .ok_or_else(|| ConfigError::Invalid {
            field: "market.goods",
            reason: "at least one good is required".to_owned(),
        })?;
    let memory_length = config.agents.memory_length;

    let household_policy = HouseholdPolicyFactory::new(&config.llm, backend)?;
    let households = config
        .agents
        .risk_dispositions
        .iter()
        .cycle()
        .zip(0..config.simulation.households)
        .map(|(&risk, n)| {
            Agent::new(
                AgentParams {
                    id: AgentId::Household(n),
                    wealth: config.agents.household_wealth,
                    risk,
                    good: good.clone(),
                    memory_length,
                },
                household_policy.make(),
            )
        })
        .collect();

    let businesses = (0..config.simulation.businesses)
        .map(|n| {
            Agent::new(
                AgentParams {
                    id: AgentId::Business(n),
                    wealth: config.agents.business_wealth,
                    risk: RiskDisposition::Neutral,
                    good: good.clone(),
                    memory_length,
                },
                Box::new(BusinessPolicy::new()),
            )
        })
        .collect();

    let government = government_agent(good, memory_length);

    info!(
        households = config.simulation.households,
        businesses = config.simulation.businesses,
        household_policy = household_policy.name(),
        "Population built"
    );

    Ok(Population {
        households,
        businesses,
        government,
    })
}

/// The singleton government agent.
pub fn government_agent(good: GoodId, memory_length: usize) -> Agent {
    Agent::new(
        AgentParams {
            id: AgentId::Government,
            wealth: 0.0,
            risk: RiskDisposition::Neutral,
            good,
            memory_length,
        },
        Box::new(GovernmentPolicy::new()),
    )
}

/// Produces one household policy per household.
enum HouseholdPolicyFactory {
    Rules,
    Llm {
        backend: Option<Arc<dyn CompletionBackend>>,
        prompt: Arc<PromptRenderer>,
        params: GenerationParams,
    },
}

impl HouseholdPolicyFactory {
    fn new(
        llm: &LlmConfig,
        backend: Option<&Arc<dyn CompletionBackend>>,
    ) -> Result<Self, SimulationError> {
        if !llm.enabled {
            return Ok(Self::Rules);
        }
        let prompt = match &llm.prompt_template {
            Some(path) => PromptRenderer::from_file(path)?,
            None => PromptRenderer::new()?,
        };
        Ok(Self::Llm {
            backend: backend.cloned(),
            prompt: Arc::new(prompt),
            params: GenerationParams {
                max_tokens: llm.max_tokens,
                temperature: llm.temperature,
            },
        })
    }

    const fn name(&self) -> &'static str {
        match self {
            Self::Rules => "rule_based",
            Self::Llm { .. } => "llm",
        }
    }

    fn make(&self) -> Box<dyn DecisionPolicy> {
        match self {
            Self::Rules => Box::new(RuleBasedPolicy::new()),
            Self::Llm {
                backend,
                prompt,
                params,
            } => Box::new(LlmPolicy::new(backend.clone(), Arc::clone(prompt), *params)),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {

    use super::*;

    fn small_config() -> SimulationConfig {
        let mut config = SimulationConfig::default();
        config.simulation.households = 5;
        config.simulation.businesses = 2;
        config
    }

    #[test]
    fn builds_numbered_agents_with_round_robin_risk() {
        let population = build_population(&small_config(), None).unwrap();
        let ids: Vec<AgentId> = population.households.iter().map(Agent::id).collect();
        assert_eq!(ids, (0..5).map(AgentId::Household).collect::<Vec<_>>());
        let risks: Vec<RiskDisposition> = population.households.iter().map(Agent::risk).collect();
        assert_eq!(
            risks,
            vec![
                RiskDisposition::Cautious,
                RiskDisposition::Neutral,
                RiskDisposition::RiskTaker,
                RiskDisposition::Cautious,
                RiskDisposition::Neutral,
            ]
        );
        assert!(population.households.iter().all(|h| (h.wealth() - 1000.0).abs() < 1e-9));
        assert!(population.households.iter().all(|h| h.policy_name() == "rule_based"));
    }

    #[test]
    fn businesses_and_government() {
        let population = build_population(&small_config(), None).unwrap();
        let ids: Vec<String> = population
            .businesses
            .iter()
            .map(|b| b.id().to_string())
            .collect();
        assert_eq!(ids, vec!["B0", "B1"]);
        assert!(population.businesses.iter().all(|b| (b.wealth() - 5000.0).abs() < 1e-9));
        assert_eq!(population.government.id(), AgentId::Government);
        assert!(population.government.wealth().abs() < 1e-9);
    }

    #[test]
    fn llm_households_without_backend() {
        let mut config = small_config();
        config.llm.enabled = true;
        let population = build_population(&config, None).unwrap();
        assert!(population.households.iter().all(|h| h.policy_name() == "llm"));
    }

    #[test]
    fn missing_prompt_template_is_an_error() {
        let mut config = small_config();
        config.llm.enabled = true;
        config.llm.prompt_template = Some("/nonexistent/household.j2".into());
        assert!(matches!(
            build_population(&config, None),
            Err(SimulationError::Prompt { .. })
        ));
    }
}
