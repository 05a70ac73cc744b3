//! Actor population configuration

use crate::error::ConfigResult;
use crate::validation::{validate_ratio, Validatable};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the virtual actor population
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ActorsConfig {
    /// Whether this component runs at all
    #[serde(default = "crate::domains::utils::default_true")]
    pub enabled: bool,

    /// Maximum number of concurrent virtual actors. Zero is a legal
    /// boundary case and yields an all-zero report.
    #[serde(default = "default_count")]
    pub count: usize,

    /// Probability that a leaderboard-update event triggers an
    /// out-of-band leaderboard check
    #[serde(default = "default_leaderboard_check_probability")]
    pub leaderboard_check_probability: f64,

    /// Probability that a rejected submission triggers a resubmission
    #[serde(default = "default_resubmit_probability")]
    pub resubmit_probability: f64,

    /// Fixed backoff before a realtime reconnect attempt
    #[serde(
        with = "crate::domains::utils::serde_duration",
        default = "default_reconnect_backoff"
    )]
    pub reconnect_backoff: Duration,
}

impl Default for ActorsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            count: default_count(),
            leaderboard_check_probability: default_leaderboard_check_probability(),
            resubmit_probability: default_resubmit_probability(),
            reconnect_backoff: default_reconnect_backoff(),
        }
    }
}

impl Validatable for ActorsConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_ratio(
            self.leaderboard_check_probability,
            "leaderboard_check_probability",
            self.domain_name(),
        )?;
        validate_ratio(
            self.resubmit_probability,
            "resubmit_probability",
            self.domain_name(),
        )?;

        if self.reconnect_backoff.is_zero() {
            return Err(self.validation_error("reconnect_backoff must be greater than 0"));
        }

        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "actors"
    }
}

fn default_count() -> usize {
    25
}

fn default_leaderboard_check_probability() -> f64 {
    0.30
}

fn default_resubmit_probability() -> f64 {
    0.50
}

fn default_reconnect_backoff() -> Duration {
    Duration::from_secs(5)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_actors_is_legal() {
        let mut config = ActorsConfig::default();
        config.count = 0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_probability_bounds() {
        let mut config = ActorsConfig::default();
        config.resubmit_probability = 1.1;
        assert!(config.validate().is_err());
    }
}
