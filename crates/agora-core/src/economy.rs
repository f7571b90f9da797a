//! The economy: one round of perception, decision, application, policy,
//! pricing and measurement.
//!
//! Each call to [`Economy::step`] runs these phases in order:
//!
//! 1. **News** -- draw the round's headline from the [`NewsSource`].
//! 2. **Snapshot** -- capture prices, news, policies and the opening Gini.
//! 3. **Agents** -- households then businesses, in population order, each
//!    perceive the snapshot, decide, and have their decision applied. Later
//!    agents' trades accumulate on top of earlier ones.
//! 4. **Government** -- decide on the same snapshot and update the policy
//!    switches; a change takes effect this round.
//! 5. **Transfers** -- credit UBI to households if enabled, then debit the
//!    wealth tax if enabled.
//! 6. **Market** -- update prices, record, clear.
//! 7. **Measure** -- append the closing household Gini and advance the
//!    round counter.
//!
//! Nothing in a round can fail. Decisions outside the agent's role, or that
//! name no good or an unknown good, are logged and skipped.

use rand::rngs::SmallRng;
use tracing::{debug, info, warn};

use agora_agents::Agent;
use agora_types::{
    ActionType, Decision, EnvironmentSnapshot, GoodId, PolicyState, RoundSummary,
};

use crate::config::PolicyConfig;
use crate::inequality::gini;
use crate::market::Market;
use crate::news::NewsSource;

/// Wealth multiplier for `invest` (×1.01).
pub const INVEST_RETURN: f64 = 1.01;

/// Static policy parameters for a run.
#[derive(Debug, Clone, PartialEq)]
pub struct PolicySettings {
    /// Whether UBI is in force before the government first acts.
    pub initial_ubi: bool,
    /// UBI credited to each household per round while enabled.
    pub ubi_amount: f64,
    /// Whether households pay a wealth tax.
    pub wealth_tax_enabled: bool,
    /// Fraction of non-negative wealth taxed per round.
    pub wealth_tax_rate: f64,
    /// Whether shock headlines can occur.
    pub shocks_enabled: bool,
}

impl From<&PolicyConfig> for PolicySettings {
    fn from(config: &PolicyConfig) -> Self {
        Self {
            initial_ubi: config.ubi_enabled,
            ubi_amount: config.ubi_amount,
            wealth_tax_enabled: config.wealth_tax_enabled,
            wealth_tax_rate: config.wealth_tax_rate,
            shocks_enabled: config.market_shocks_enabled,
        }
    }
}

/// The agents that make up an economy.
#[derive(Debug)]
pub struct Population {
    /// Households, in population order.
    pub households: Vec<Agent>,
    /// Businesses, in population order.
    pub businesses: Vec<Agent>,
    /// The singleton government.
    pub government: Agent,
}

/// Per-round action counters.
#[derive(Debug, Default)]
struct Tally {
    buys: u32,
    blocked_buys: u32,
    sells: u32,
    investments: u32,
    produced: u32,
    price_adjustments: u32,
    disallowed: u32,
}

/// Owns the population, the market, the policy switches and the Gini
/// history, and advances them one round at a time.
#[derive(Debug)]
pub struct Economy {
    households: Vec<Agent>,
    businesses: Vec<Agent>,
    government: Agent,
    market: Market,
    news_source: Box<dyn NewsSource>,
    policies: PolicyState,
    settings: PolicySettings,
    gini_history: Vec<f64>,
    round: u64,
}

impl Economy {
    /// Assemble an economy at round zero.
    pub fn new(
        population: Population,
        market: Market,
        news_source: Box<dyn NewsSource>,
        settings: PolicySettings,
    ) -> Self {
        Self {
            households: population.households,
            businesses: population.businesses,
            government: population.government,
            market,
            news_source,
            policies: PolicyState {
                ubi: settings.initial_ubi,
            },
            settings,
            gini_history: Vec::new(),
            round: 0,
        }
    }

    /// Play one round. See the module docs for the phase order.
    pub fn step(&mut self, rng: &mut SmallRng) -> RoundSummary {
        let round = self.round;

        let headline = self
            .news_source
            .headline(round, self.settings.shocks_enabled, rng);
        if headline.shock {
            info!(round, news = %headline.text, "Market shock");
        }

        let snapshot = EnvironmentSnapshot {
            round,
            prices: self.market.prices(),
            news: headline.text,
            shock: headline.shock,
            policies: self.policies,
            gini: self.current_gini(),
        };

        let mut tally = Tally::default();
        for agent in self.households.iter_mut().chain(self.businesses.iter_mut()) {
            agent.perceive(&snapshot);
            let decision = agent.decide(&snapshot, rng);
            apply_decision(agent, &decision, &mut self.market, rng, &mut tally);
        }

        self.government.perceive(&snapshot);
        let decision = self.government.decide(&snapshot, rng);
        self.apply_government(decision.action, snapshot.gini);

        let ubi_paid = self.pay_ubi();
        let tax_collected = self.collect_tax();

        self.market.close_round();

        let closing_gini = self.current_gini();
        if closing_gini.is_nan() {
            warn!(round, "Household wealth is no longer finite, Gini undefined");
        }
        self.gini_history.push(closing_gini);
        self.round = self.round.saturating_add(1);

        let summary = RoundSummary {
            round,
            news: snapshot.news,
            shock: snapshot.shock,
            buys: tally.buys,
            blocked_buys: tally.blocked_buys,
            sells: tally.sells,
            investments: tally.investments,
            produced: tally.produced,
            price_adjustments: tally.price_adjustments,
            policies: self.policies,
            ubi_paid,
            tax_collected,
            prices: self.market.prices(),
            gini: closing_gini,
        };
        debug!(
            round,
            buys = summary.buys,
            blocked = summary.blocked_buys,
            sells = summary.sells,
            invest = summary.investments,
            produced = summary.produced,
            disallowed = tally.disallowed,
            ubi = summary.policies.ubi,
            gini = closing_gini,
            "Round complete"
        );
        summary
    }

    fn apply_government(&mut self, action: ActionType, gini: f64) {
        let ubi = match action {
            ActionType::EnableUbi => true,
            ActionType::DisableUbi => false,
            ActionType::NoOp => return,
            other => {
                warn!(round = self.round, action = %other, "Government chose a non-policy action");
                return;
            }
        };
        if self.policies.ubi != ubi {
            info!(round = self.round, ubi, gini, "UBI policy changed");
        }
        self.policies.ubi = ubi;
    }

    fn pay_ubi(&mut self) -> f64 {
        if !self.policies.ubi {
            return 0.0;
        }
        let amount = self.settings.ubi_amount;
        let mut paid = 0.0;
        for household in &mut self.households {
            household.credit(amount);
            paid += amount;
        }
        paid
    }

    fn collect_tax(&mut self) -> f64 {
        if !self.settings.wealth_tax_enabled {
            return 0.0;
        }
        let rate = self.settings.wealth_tax_rate;
        let mut collected = 0.0;
        for household in &mut self.households {
            let tax = household.wealth().max(0.0) * rate;
            household.debit(tax);
            collected += tax;
        }
        collected
    }

    /// Gini coefficient of current household wealth.
    pub fn current_gini(&self) -> f64 {
        gini(&self.household_wealths())
    }

    /// Current wealth of every household, in population order.
    pub fn household_wealths(&self) -> Vec<f64> {
        self.households.iter().map(Agent::wealth).collect()
    }

    /// Number of completed rounds.
    pub const fn round(&self) -> u64 {
        self.round
    }

    /// Households, in population order.
    pub fn households(&self) -> &[Agent] {
        &self.households
    }

    /// Businesses, in population order.
    pub fn businesses(&self) -> &[Agent] {
        &self.businesses
    }

    /// The government.
    pub const fn government(&self) -> &Agent {
        &self.government
    }

    /// Every agent: households, businesses, then the government.
    pub fn agents(&self) -> impl Iterator<Item = &Agent> {
        self.households
            .iter()
            .chain(self.businesses.iter())
            .chain(core::iter::once(&self.government))
    }

    /// The market.
    pub const fn market(&self) -> &Market {
        &self.market
    }

    /// Policy switches currently in force.
    pub const fn policies(&self) -> PolicyState {
        self.policies
    }

    /// Closing household Gini of every completed round.
    pub fn gini_history(&self) -> &[f64] {
        &self.gini_history
    }
}

/// Apply one household or business decision to its agent and the market.
///
/// Actions the agent's role may not take are logged and skipped.
fn apply_decision(
    agent: &mut Agent,
    decision: &Decision,
    market: &mut Market,
    rng: &mut SmallRng,
    tally: &mut Tally,
) {
    let role = agent.id().role();
    if !decision.action.allowed_for(role) {
        warn!(agent_id = %agent.id(), ?role, action = %decision.action, "Action not open to this role, skipped");
        tally.disallowed = tally.disallowed.saturating_add(1);
        return;
    }
    match decision.action {
        ActionType::Hold | ActionType::Save => {}
        ActionType::Invest => {
            agent.grow(INVEST_RETURN);
            tally.investments = tally.investments.saturating_add(1);
        }
        ActionType::Buy => {
            if let Some((good, price)) = traded_good(agent, decision, market) {
                buy(agent, good, price, market, tally);
            }
        }
        ActionType::Sell => {
            if let Some((good, price)) = traded_good(agent, decision, market) {
                agent.credit(price);
                market.add_supply(good);
                tally.sells = tally.sells.saturating_add(1);
            }
        }
        ActionType::Produce => {
            if let Some((good, _)) = traded_good(agent, decision, market) {
                market.add_supply(good);
                tally.produced = tally.produced.saturating_add(1);
            }
        }
        ActionType::AdjustPrice => {
            if let Some((good, _)) = traded_good(agent, decision, market) {
                market.reprice(good, rng);
                tally.price_adjustments = tally.price_adjustments.saturating_add(1);
            }
        }
        // Government-only; rejected by the role check above.
        ActionType::EnableUbi | ActionType::DisableUbi | ActionType::NoOp => {}
    }
}

/// The listed good a decision trades and its current price.
fn traded_good<'d>(
    agent: &Agent,
    decision: &'d Decision,
    market: &Market,
) -> Option<(&'d GoodId, f64)> {
    let Some(good) = decision.good.as_ref() else {
        warn!(agent_id = %agent.id(), action = %decision.action, "Decision names no good, skipped");
        return None;
    };
    let Some(price) = market.price(good) else {
        warn!(agent_id = %agent.id(), %good, action = %decision.action, "Decision names an unknown good, skipped");
        return None;
    };
    Some((good, price))
}

fn buy(agent: &mut Agent, good: &GoodId, price: f64, market: &mut Market, tally: &mut Tally) {
    if agent.wealth() > price {
        agent.debit(price);
        market.add_demand(good);
        tally.buys = tally.buys.saturating_add(1);
    } else {
        debug!(agent_id = %agent.id(), %good, wealth = agent.wealth(), price, "Buy blocked");
        tally.blocked_buys = tally.blocked_buys.saturating_add(1);
    }
}
