//! Language-model backed household policy.
//!
//! Without a backend the policy behaves exactly like
//! [`RuleBasedPolicy`](super::RuleBasedPolicy). With one, it renders a
//! prompt, scans the answer for the first household option it mentions and
//! falls back to a uniformly random household action whenever anything
//! goes wrong. Failures never leave this module.

use std::sync::Arc;

use rand::rngs::SmallRng;
use rand::seq::IndexedRandom;
use tracing::{debug, warn};

use agora_types::{ActionType, Decision};

use super::household::price_trend_decision;
use super::prompt::PromptRenderer;
use super::{CompletionBackend, DecisionContext, DecisionPolicy, GenerationParams};
use crate::error::BackendError;

/// Household policy that consults a completion backend.
pub struct LlmPolicy {
    backend: Option<Arc<dyn CompletionBackend>>,
    prompt: Arc<PromptRenderer>,
    params: GenerationParams,
}

impl core::fmt::Debug for LlmPolicy {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LlmPolicy")
            .field("backend", &self.backend.as_ref().map(|b| b.name().to_owned()))
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

impl LlmPolicy {
    /// Create a policy. `None` as backend means rule-based behavior.
    pub fn new(
        backend: Option<Arc<dyn CompletionBackend>>,
        prompt: Arc<PromptRenderer>,
        params: GenerationParams,
    ) -> Self {
        Self {
            backend,
            prompt,
            params,
        }
    }

    /// Whether a backend is configured.
    pub const fn has_backend(&self) -> bool {
        self.backend.is_some()
    }

    fn ask(
        &self,
        backend: &dyn CompletionBackend,
        ctx: &DecisionContext<'_>,
    ) -> Result<ActionType, BackendError> {
        let prompt = self
            .prompt
            .render(ctx.risk, ctx.wealth, &ctx.snapshot.news)?;
        let reply = backend.complete(&prompt, &self.params)?;
        let action = parse_reply(&reply);
        debug!(
            round = ctx.snapshot.round,
            backend = backend.name(),
            action = %action,
            "completion parsed"
        );
        Ok(action)
    }
}

impl DecisionPolicy for LlmPolicy {
    fn name(&self) -> &'static str {
        "llm"
    }

    fn decide(&self, ctx: &DecisionContext<'_>, rng: &mut SmallRng) -> Decision {
        let Some(backend) = self.backend.as_deref() else {
            return price_trend_decision(ctx, rng);
        };
        let action = match self.ask(backend, ctx) {
            Ok(action) => action,
            Err(e) => {
                let fallback = random_household_action(rng);
                warn!(
                    round = ctx.snapshot.round,
                    backend = backend.name(),
                    error = %e,
                    fallback = %fallback,
                    "completion failed, using random fallback action"
                );
                fallback
            }
        };
        Decision::on(action, ctx.good.clone())
    }
}

/// Find the first household option mentioned in `reply`.
///
/// Matching is a case-insensitive substring search in the order buy, sell,
/// save, invest. An answer naming none of them means hold.
pub fn parse_reply(reply: &str) -> ActionType {
    let lowered = reply.to_lowercase();
    ActionType::LLM_OPTIONS
        .into_iter()
        .find(|option| lowered.contains(option.as_str()))
        .unwrap_or(ActionType::Hold)
}

/// Uniformly random household action used when a backend fails.
pub fn random_household_action(rng: &mut SmallRng) -> ActionType {
    ActionType::FALLBACK_OPTIONS
        .choose(rng)
        .copied()
        .unwrap_or(ActionType::Hold)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    use agora_types::{EnvironmentSnapshot, GoodId, PolicyState, RiskDisposition};
    use rand::SeedableRng;

    use super::*;
    use crate::memory::Memory;

    struct Scripted {
        reply: String,
        prompts: Mutex<Vec<String>>,
    }

    impl CompletionBackend for Scripted {
        fn name(&self) -> &str {
            "scripted"
        }

        fn complete(&self, prompt: &str, _params: &GenerationParams) -> Result<String, BackendError> {
            self.prompts.lock().unwrap().push(prompt.to_owned());
            Ok(self.reply.clone())
        }
    }

    struct Failing;

    impl CompletionBackend for Failing {
        fn name(&self) -> &str {
            "failing"
        }

        fn complete(&self, _prompt: &str, _params: &GenerationParams) -> Result<String, BackendError> {
            Err(BackendError::MissingCredentials {
                backend: "failing".to_owned(),
            })
        }
    }

    fn snapshot() -> EnvironmentSnapshot {
        EnvironmentSnapshot {
            round: 4,
            prices: BTreeMap::from([(GoodId::from("GoodA"), 100.0)]),
            news: "Interest rates fell today.".to_owned(),
            shock: false,
            policies: PolicyState::default(),
            gini: 0.0,
        }
    }

    fn decide_with(policy: &LlmPolicy, seed: u64) -> Decision {
        let snap = snapshot();
        let good = GoodId::from("GoodA");
        let memory = Memory::default();
        let ctx = DecisionContext {
            snapshot: &snap,
            wealth: 1000.0,
            risk: RiskDisposition::Neutral,
            memory: &memory,
            good: &good,
        };
        let mut rng = SmallRng::seed_from_u64(seed);
        policy.decide(&ctx, &mut rng)
    }

    fn renderer() -> Arc<PromptRenderer> {
        Arc::new(PromptRenderer::new().unwrap())
    }

    #[test]
    fn reply_matching_is_ordered_and_case_insensitive() {
        assert_eq!(parse_reply("I would SELL now"), ActionType::Sell);
        assert_eq!(parse_reply("Invest or buy?"), ActionType::Buy);
        assert_eq!(parse_reply("save, then invest"), ActionType::Save);
        assert_eq!(parse_reply("wait and see"), ActionType::Hold);
        assert_eq!(parse_reply(""), ActionType::Hold);
    }

    #[test]
    fn without_backend_behaves_like_rules() {
        let policy = LlmPolicy::new(None, renderer(), GenerationParams::default());
        assert!(!policy.has_backend());
        assert_eq!(decide_with(&policy, 3).action, ActionType::Hold);
    }

    #[test]
    fn backend_reply_drives_the_decision() {
        let backend = Arc::new(Scripted {
            reply: "I think I will invest.".to_owned(),
            prompts: Mutex::new(Vec::new()),
        });
        let policy = LlmPolicy::new(
            Some(Arc::clone(&backend) as Arc<dyn CompletionBackend>),
            renderer(),
            GenerationParams::default(),
        );
        let decision = decide_with(&policy, 0);
        assert_eq!(decision.action, ActionType::Invest);
        assert_eq!(decision.good, Some(GoodId::from("GoodA")));
        let prompts = backend.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        let prompt = prompts.first().unwrap();
        assert!(prompt.contains("Interest rates fell today."));
        assert!(prompt.contains("neutral"));
    }

    #[test]
    fn backend_failure_falls_back_to_a_household_action() {
        let policy = LlmPolicy::new(
            Some(Arc::new(Failing) as Arc<dyn CompletionBackend>),
            renderer(),
            GenerationParams::default(),
        );
        for seed in 0..50_u64 {
            let action = decide_with(&policy, seed).action;
            assert!(ActionType::FALLBACK_OPTIONS.contains(&action));
        }
    }

    #[test]
    fn fallback_is_seed_deterministic() {
        let mut a = SmallRng::seed_from_u64(11);
        let mut b = SmallRng::seed_from_u64(11);
        let first: Vec<ActionType> = (0..20).map(|_| random_household_action(&mut a)).collect();
        let second: Vec<ActionType> = (0..20).map(|_| random_household_action(&mut b)).collect();
        assert_eq!(first, second);
    }
}
