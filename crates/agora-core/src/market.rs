//! Goods, the supply/demand pricing rule, and price history.
//!
//! Within a round, agents' trades accumulate supply and demand counters on
//! each [`Good`]. At the end of the round the market closes in a fixed
//! order: update every price from the round's net demand, record the new
//! price, then clear the counters. The recorded price is what next round's
//! agents observe.

use std::collections::BTreeMap;

use rand::Rng;
use rand::rngs::SmallRng;

use agora_types::GoodId;

/// Drift applied when a round sees no demand at all (×1.05).
///
/// A good nobody buys gets dearer regardless of supply. This is a modelling
/// peculiarity kept as specified.
pub const IDLE_DRIFT: f64 = 1.05;

/// Price sensitivity to relative excess demand.
pub const SENSITIVITY: f64 = 0.01;

/// Lowest price a good can settle at after an update.
pub const PRICE_FLOOR: f64 = 1.0;

/// Lower bound of the business repricing factor.
pub const REPRICE_MIN: f64 = 0.95;

/// Upper bound of the business repricing factor.
pub const REPRICE_MAX: f64 = 1.05;

/// A tradable good.
#[derive(Debug, Clone, PartialEq)]
pub struct Good {
    /// Current price; positive.
    pub price: f64,
    /// Units offered this round.
    pub supply: u32,
    /// Units bought this round.
    pub demand: u32,
}

impl Good {
    /// A good at `price` with empty counters.
    pub const fn new(price: f64) -> Self {
        Self {
            price,
            supply: 0,
            demand: 0,
        }
    }

    /// Apply the pricing rule to this round's counters.
    ///
    /// No demand multiplies the price by [`IDLE_DRIFT`]. Otherwise the price
    /// moves by `SENSITIVITY * (demand - supply) / max(supply, 1)`. The
    /// result never drops below [`PRICE_FLOOR`].
    pub fn update_price(&mut self) {
        let factor = if self.demand == 0 {
            IDLE_DRIFT
        } else {
            excess_demand_factor(self.demand, self.supply)
        };
        self.price = (self.price * factor).max(PRICE_FLOOR);
    }

    /// Reset the round's counters.
    pub const fn clear(&mut self) {
        self.supply = 0;
        self.demand = 0;
    }
}

/// `1 + SENSITIVITY * (demand - supply) / max(supply, 1)`.
fn excess_demand_factor(demand: u32, supply: u32) -> f64 {
    let net = f64::from(demand) - f64::from(supply);
    let relative = net / f64::from(supply.max(1));
    relative.mul_add(SENSITIVITY, 1.0)
}

/// The market: goods keyed by name plus their price histories.
#[derive(Debug, Clone, PartialEq)]
pub struct Market {
    goods: BTreeMap<GoodId, Good>,
    history: BTreeMap<GoodId, Vec<f64>>,
}

impl Market {
    /// Open a market listing every good in `goods` at `initial_price`.
    pub fn new<'a>(goods: impl IntoIterator<Item = &'a GoodId>, initial_price: f64) -> Self {
        let mut listed = BTreeMap::new();
        let mut history = BTreeMap::new();
        for good in goods {
            listed.insert(good.clone(), Good::new(initial_price));
            history.insert(good.clone(), Vec::new());
        }
        Self {
            goods: listed,
            history,
        }
    }

    /// Look up a good.
    pub fn good(&self, id: &GoodId) -> Option<&Good> {
        self.goods.get(id)
    }

    /// Current price of a good.
    pub fn price(&self, id: &GoodId) -> Option<f64> {
        self.goods.get(id).map(|good| good.price)
    }

    /// Current price of every good.
    pub fn prices(&self) -> BTreeMap<GoodId, f64> {
        self.goods
            .iter()
            .map(|(id, good)| (id.clone(), good.price))
            .collect()
    }

    /// Count one unit of demand. Returns `false` for an unknown good.
    pub fn add_demand(&mut self, id: &GoodId) -> bool {
        self.goods.get_mut(id).is_some_and(|good| {
            good.demand = good.demand.saturating_add(1);
            true
        })
    }

    /// Count one unit of supply. Returns `false` for an unknown good.
    pub fn add_supply(&mut self, id: &GoodId) -> bool {
        self.goods.get_mut(id).is_some_and(|good| {
            good.supply = good.supply.saturating_add(1);
            true
        })
    }

    /// Multiply a good's price by a uniform random factor in
    /// `REPRICE_MIN..=REPRICE_MAX`.
    ///
    /// Returns the new price, or `None` for an unknown good.
    pub fn reprice(&mut self, id: &GoodId, rng: &mut SmallRng) -> Option<f64> {
        let good = self.goods.get_mut(id)?;
        let factor = rng.random_range(REPRICE_MIN..=REPRICE_MAX);
        good.price *= factor;
        Some(good.price)
    }

    /// Apply the pricing rule to every good.
    pub fn update_prices(&mut self) {
        for good in self.goods.values_mut() {
            good.update_price();
        }
    }

    /// Append every good's current price to its history.
    pub fn record(&mut self) {
        for (id, good) in &self.goods {
            if let Some(series) = self.history.get_mut(id) {
                series.push(good.price);
            }
        }
    }

    /// Reset every good's counters.
    pub fn clear(&mut self) {
        for good in self.goods.values_mut() {
            good.clear();
        }
    }

    /// End-of-round sequence: update, record, clear.
    pub fn close_round(&mut self) {
        self.update_prices();
        self.record();
        self.clear();
    }

    /// Price history of one good, one entry per closed round.
    pub fn history(&self, id: &GoodId) -> Option<&[f64]> {
        self.history.get(id).map(Vec::as_slice)
    }

    /// Price histories of every good.
    pub const fn histories(&self) -> &BTreeMap<GoodId, Vec<f64>> {
        &self.history
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::SeedableRng;

    use super::*;

    fn close(a: Option<f64>, b: f64) -> bool {
        a.is_some_and(|a| (a - b).abs() < 1e-9)
    }

    fn market() -> (Market, GoodId) {
        let good = GoodId::from("GoodA");
        (Market::new([&good], 100.0), good)
    }

    #[test]
    fn idle_good_inflates_five_percent() {
        let (mut market, good) = market();
        market.add_supply(&good);
        market.add_supply(&good);
        market.close_round();
        assert!(close(market.price(&good), 105.0));
    }

    #[test]
    fn excess_demand_raises_price() {
        let (mut market, good) = market();
        for _ in 0..3 {
            market.add_demand(&good);
        }
        market.add_supply(&good);
        market.close_round();
        // 100 * (1 + 0.01 * (3 - 1) / 1) = 102
        assert!(close(market.price(&good), 102.0));
    }

    #[test]
    fn excess_supply_lowers_price() {
        let (mut market, good) = market();
        market.add_demand(&good);
        for _ in 0..4 {
            market.add_supply(&good);
        }
        market.close_round();
        // 100 * (1 + 0.01 * (1 - 4) / 4) = 99.25
        assert!(close(market.price(&good), 99.25));
    }

    #[test]
    fn demand_without_supply_uses_unit_base() {
        let (mut market, good) = market();
        market.add_demand(&good);
        market.add_demand(&good);
        market.close_round();
        assert!(close(market.price(&good), 102.0));
    }

    #[test]
    fn price_is_floored_at_one() {
        let mut good = Good::new(1.001);
        good.demand = 1;
        good.supply = 500;
        good.update_price();
        assert!(close(Some(good.price), PRICE_FLOOR));
    }

    #[test]
    fn close_round_records_then_clears() {
        let (mut market, good) = market();
        market.add_demand(&good);
        market.close_round();
        market.close_round();
        let history = market.history(&good).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history.last().copied(), market.price(&good));
        let state = market.good(&good).unwrap();
        assert_eq!((state.supply, state.demand), (0, 0));
    }

    #[test]
    fn unknown_goods_are_rejected() {
        let (mut market, _) = market();
        let missing = GoodId::from("Nope");
        let mut rng = SmallRng::seed_from_u64(1);
        assert!(!market.add_demand(&missing));
        assert!(!market.add_supply(&missing));
        assert!(market.reprice(&missing, &mut rng).is_none());
    }

    #[test]
    fn reprice_stays_within_five_percent() {
        let (mut market, good) = market();
        let mut rng = SmallRng::seed_from_u64(3);
        for _ in 0..100 {
            let before = market.price(&good).unwrap();
            let after = market.reprice(&good, &mut rng).unwrap();
            let ratio = after / before;
            assert!(
                (REPRICE_MIN - 1e-12..=REPRICE_MAX + 1e-12).contains(&ratio),
                "ratio {ratio}"
            );
        }
    }
}
