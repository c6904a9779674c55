//! Counter-offer strategies.
//!
//! A strategy decides how far a counter-offer moves from the rate currently
//! on the table toward the party's own target rate.

use serde::{Deserialize, Serialize};

/// How far a counter-offer concedes toward the target rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CounterStrategy {
    /// Meet in the middle.
    #[default]
    Split,
    /// Move 75% of the way toward the target.
    Aggressive,
    /// Move 25% of the way toward the target.
    Conservative,
}

impl CounterStrategy {
    /// Share of the gap between current and target rate that the counter covers.
    #[must_use]
    pub const fn step(&self) -> f64 {
        match self {
            Self::Split => 0.5,
            Self::Aggressive => 0.75,
            Self::Conservative => 0.25,
        }
    }

    /// Unrounded counter rate for the given current and target rates.
    #[must_use]
    pub fn counter_rate(&self, current: f64, target: f64) -> f64 {
        match self {
            Self::Split => (current + target) / 2.0,
            Self::Aggressive | Self::Conservative => self.step().mul_add(target - current, current),
        }
    }

    /// Counter rate rounded to the nearest whole currency unit.
    #[must_use]
    pub fn counter_rate_whole(&self, current: f64, target: f64) -> f64 {
        self.counter_rate(current, target).round()
    }
}

impl std::fmt::Display for CounterStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Split => write!(f, "split"),
            Self::Aggressive => write!(f, "aggressive"),
            Self::Conservative => write!(f, "conservative"),
        }
    }
}

impl std::str::FromStr for CounterStrategy {
    type Err = crate::CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "split" => Ok(Self::Split),
            "aggressive" => Ok(Self::Aggressive),
            "conservative" => Ok(Self::Conservative),
            other => Err(crate::CoreError::validation(
                "strategy",
                format!("unknown strategy '{other}'"),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use test_case::test_case;

    #[test]
    fn strategy_default_is_split() {
        assert_eq!(CounterStrategy::default(), CounterStrategy::Split);
    }

    #[test_case(CounterStrategy::Split, 100.0, 80.0, 90.0 ; "split down")]
    #[test_case(CounterStrategy::Split, 90.0, 80.0, 85.0 ; "split second round")]
    #[test_case(CounterStrategy::Aggressive, 100.0, 80.0, 85.0 ; "aggressive down")]
    #[test_case(CounterStrategy::Conservative, 100.0, 80.0, 95.0 ; "conservative down")]
    #[test_case(CounterStrategy::Aggressive, 60.0, 100.0, 90.0 ; "aggressive up")]
    #[test_case(CounterStrategy::Conservative, 60.0, 100.0, 70.0 ; "conservative up")]
    fn counter_rate_whole(strategy: CounterStrategy, current: f64, target: f64, expected: f64) {
        let rate = strategy.counter_rate_whole(current, target);
        assert!((rate - expected).abs() < f64::EPSILON, "got {rate}");
    }

    #[test]
    fn counter_rate_rounds_half_up() {
        // (85 + 80) / 2 = 82.5
        let rate = CounterStrategy::Split.counter_rate_whole(85.0, 80.0);
        assert!((rate - 83.0).abs() < f64::EPSILON);
    }

    #[test]
    fn strategy_serialization() {
        let json = serde_json::to_string(&CounterStrategy::Conservative).unwrap();
        assert_eq!(json, "\"conservative\"");
        let parsed: CounterStrategy = serde_json::from_str("\"aggressive\"").unwrap();
        assert_eq!(parsed, CounterStrategy::Aggressive);
    }

    #[test]
    fn strategy_from_str() {
        assert_eq!("Split".parse::<CounterStrategy>().unwrap(), CounterStrategy::Split);
        assert!("greedy".parse::<CounterStrategy>().is_err());
    }

    proptest! {
        #[test]
        fn split_lands_between_distinct_rates(a in 1u32..10_000, gap in 2u32..5_000) {
            let low = f64::from(a);
            let high = f64::from(a + gap);
            for (current, target) in [(low, high), (high, low)] {
                let rate = CounterStrategy::Split.counter_rate_whole(current, target);
                prop_assert!(rate > low && rate < high, "{rate} not in ({low}, {high})");
            }
        }

        #[test]
        fn every_strategy_stays_within_gap(current in 1.0f64..10_000.0, target in 1.0f64..10_000.0) {
            for strategy in [CounterStrategy::Split, CounterStrategy::Aggressive, CounterStrategy::Conservative] {
                let rate = strategy.counter_rate(current, target);
                prop_assert!(rate >= current.min(target) - 1e-9);
                prop_assert!(rate <= current.max(target) + 1e-9);
            }
        }
    }
}
