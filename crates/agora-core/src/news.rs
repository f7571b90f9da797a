//! Per-round news generation.
//!
//! The economy treats a headline as an opaque string handed to every agent,
//! plus a flag saying whether it was a shock. [`SyntheticNews`] draws from
//! fixed headline pools; other sources can be plugged in through
//! [`NewsSource`].

use core::fmt;

use rand::Rng;
use rand::rngs::SmallRng;
use rand::seq::IndexedRandom;

/// Chance per round of a shock headline when shocks are enabled.
pub const SHOCK_PROBABILITY: f64 = 0.05;

/// Rounds between quarterly reports.
pub const QUARTERLY_INTERVAL: u64 = 50;

/// Headline published on quarterly rounds.
pub const QUARTERLY_REPORT: &str = "Quarterly economic report released.";

/// Built-in routine headlines.
pub const ROUTINE_HEADLINES: [&str; 7] = [
    "Interest rates rose today.",
    "Interest rates fell today.",
    "Government announced new stimulus.",
    "Major bank failure reported.",
    "Tech innovation boosts productivity.",
    "Trade war escalates.",
    "No significant news today.",
];

/// Built-in shock headlines.
pub const SHOCK_HEADLINES: [&str; 5] = [
    "Sudden market crash!",
    "Unexpected boom!",
    "Currency devaluation.",
    "Pandemic outbreak.",
    "Energy crisis.",
];

/// One round's news.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Headline {
    /// The headline text.
    pub text: String,
    /// Whether the headline is a shock.
    pub shock: bool,
}

/// A producer of one headline per round.
pub trait NewsSource: fmt::Debug + Send {
    /// Produce the headline for `round`.
    fn headline(&mut self, round: u64, shocks_enabled: bool, rng: &mut SmallRng) -> Headline;
}

/// Headlines drawn from the built-in pools.
#[derive(Debug, Clone)]
pub struct SyntheticNews {
    routine: Vec<String>,
}

impl SyntheticNews {
    /// A feed using the built-in routine pool plus `custom` headlines.
    pub fn new(custom: &[String]) -> Self {
        let routine = ROUTINE_HEADLINES
            .iter()
            .map(|&text| text.to_owned())
            .chain(custom.iter().cloned())
            .collect();
        Self { routine }
    }

    /// The routine headline pool.
    pub fn routine(&self) -> &[String] {
        &self.routine
    }
}

impl Default for SyntheticNews {
    fn default() -> Self {
        Self::new(&[])
    }
}

impl NewsSource for SyntheticNews {
    fn headline(&mut self, round: u64, shocks_enabled: bool, rng: &mut SmallRng) -> Headline {
        if shocks_enabled && rng.random_bool(SHOCK_PROBABILITY) {
            let text = SHOCK_HEADLINES.choose(rng).copied().unwrap_or(QUARTERLY_REPORT);
            return Headline {
                text: text.to_owned(),
                shock: true,
            };
        }
        if round.checked_rem(QUARTERLY_INTERVAL) == Some(0) {
            return Headline {
                text: QUARTERLY_REPORT.to_owned(),
                shock: false,
            };
        }
        let text = self
            .routine
            .choose(rng)
            .cloned()
            .unwrap_or_else(|| QUARTERLY_REPORT.to_owned());
        Headline { text, shock: false }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn quarterly_rounds_report_without_shocks() {
        let mut news = SyntheticNews::default();
        let mut rng = SmallRng::seed_from_u64(1);
        for round in [0_u64, 50, 100, 950] {
            let headline = news.headline(round, false, &mut rng);
            assert_eq!(headline.text, QUARTERLY_REPORT);
            assert!(!headline.shock);
        }
    }

    #[test]
    fn routine_rounds_draw_from_the_pool() {
        let mut news = SyntheticNews::new(&["Local bakery expands.".to_owned()]);
        let mut rng = SmallRng::seed_from_u64(2);
        assert_eq!(news.routine().len(), 8);
        for round in 1..200_u64 {
            if round % QUARTERLY_INTERVAL == 0 {
                continue;
            }
            let headline = news.headline(round, false, &mut rng);
            assert!(news.routine().contains(&headline.text));
            assert!(!headline.shock);
        }
    }

    #[test]
    fn shocks_occur_only_when_enabled() {
        let mut news = SyntheticNews::default();
        let mut rng = SmallRng::seed_from_u64(3);
        let shocks = (1..2000_u64)
            .filter(|&round| news.headline(round, true, &mut rng).shock)
            .count();
        assert!(shocks > 40 && shocks < 200, "got {shocks} shocks");

        let mut rng = SmallRng::seed_from_u64(3);
        assert!((1..2000_u64).all(|round| !news.headline(round, false, &mut rng).shock));
    }

    #[test]
    fn shock_headlines_come_from_the_shock_pool() {
        let mut news = SyntheticNews::default();
        let mut rng = SmallRng::seed_from_u64(4);
        for round in 1..2000_u64 {
            let headline = news.headline(round, true, &mut rng);
            if headline.shock {
                assert!(SHOCK_HEADLINES.contains(&headline.text.as_str()));
            }
        }
    }
}
