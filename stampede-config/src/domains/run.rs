//! Run-wide parameters

use crate::error::ConfigResult;
use crate::validation::{validate_positive, Validatable};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Run-wide configuration shared by every component
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Total run duration
    #[serde(
        with = "crate::domains::utils::serde_duration",
        default = "default_duration"
    )]
    pub duration: Duration,

    /// Grace period after the stop signal before forced teardown
    #[serde(
        with = "crate::domains::utils::serde_duration",
        default = "default_grace_period"
    )]
    pub grace_period: Duration,

    /// Optional RNG seed; a fixed seed reproduces every weighted draw
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            duration: default_duration(),
            grace_period: default_grace_period(),
            seed: None,
        }
    }
}

impl Validatable for RunConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_positive(self.duration.as_secs(), "duration", self.domain_name())?;
        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "run"
    }
}

fn default_duration() -> Duration {
    Duration::from_secs(60)
}

fn default_grace_period() -> Duration {
    Duration::from_secs(5)
}
