//! Engine configuration.
//!
//! Every field has a default matching the marketplace's standard behavior, so
//! a configuration file only needs to name what it overrides.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::EngineError;

/// Default number of rounds before a negotiation stops countering.
pub const DEFAULT_MAX_ROUNDS: u32 = 3;

/// Default gap (percent of target) at which a rate is close enough to accept.
pub const DEFAULT_ACCEPT_WITHIN_PERCENT: f64 = 5.0;

/// Score bands used by the decision policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecisionThresholds {
    /// Minimum score for automatic acceptance (when the contractor allows it).
    pub auto_accept_score: u32,
    /// Scores below this are declined.
    pub decline_below: u32,
    /// Lowest score that is suggested to a human.
    pub suggest_from: u32,
    /// Lowest score that triggers an automatic counter-offer.
    pub counter_from: u32,
}

impl Default for DecisionThresholds {
    fn default() -> Self {
        Self {
            auto_accept_score: 85,
            decline_below: 30,
            suggest_from: 50,
            counter_from: 60,
        }
    }
}

/// Configuration for the matching and negotiation engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Rounds allowed before countering stops.
    pub max_rounds: u32,
    /// Rates within this percentage of the target are accepted.
    pub accept_within_percent: f64,
    /// Decision policy bands.
    pub thresholds: DecisionThresholds,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_rounds: DEFAULT_MAX_ROUNDS,
            accept_within_percent: DEFAULT_ACCEPT_WITHIN_PERCENT,
            thresholds: DecisionThresholds::default(),
        }
    }
}

impl EngineConfig {
    /// Creates a new configuration builder.
    #[must_use]
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::default()
    }

    /// Parses and validates a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self, EngineError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| EngineError::InvalidConfig(format!("malformed JSON: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates a JSON configuration file.
    pub fn load(path: &Path) -> Result<Self, EngineError> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            EngineError::InvalidConfig(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_json_str(&json)
    }

    /// Checks that the configuration is usable.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.max_rounds == 0 {
            return Err(EngineError::InvalidConfig(
                "max_rounds must be at least 1".into(),
            ));
        }
        if !self.accept_within_percent.is_finite() || self.accept_within_percent < 0.0 {
            return Err(EngineError::InvalidConfig(format!(
                "accept_within_percent must be a non-negative number, got {}",
                self.accept_within_percent
            )));
        }
        let t = &self.thresholds;
        if !(t.decline_below <= t.suggest_from && t.suggest_from <= t.auto_accept_score) {
            return Err(EngineError::InvalidConfig(format!(
                "thresholds must satisfy decline_below <= suggest_from <= auto_accept_score, got {} / {} / {}",
                t.decline_below, t.suggest_from, t.auto_accept_score
            )));
        }
        Ok(())
    }
}

/// Builder for [`EngineConfig`].
#[derive(Debug, Clone, Default)]
pub struct EngineConfigBuilder {
    config: EngineConfig,
}

impl EngineConfigBuilder {
    /// Sets the round limit.
    #[must_use]
    pub const fn max_rounds(mut self, max_rounds: u32) -> Self {
        self.config.max_rounds = max_rounds;
        self
    }

    /// Sets the acceptance gap in percent.
    #[must_use]
    pub const fn accept_within_percent(mut self, percent: f64) -> Self {
        self.config.accept_within_percent = percent;
        self
    }

    /// Sets the decision thresholds.
    #[must_use]
    pub const fn thresholds(mut self, thresholds: DecisionThresholds) -> Self {
        self.config.thresholds = thresholds;
        self
    }

    /// Builds and validates the configuration.
    pub fn build(self) -> Result<EngineConfig, EngineError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
