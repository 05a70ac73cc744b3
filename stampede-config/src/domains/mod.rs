//! Domain-specific configuration modules

pub mod actors;
pub mod logging;
pub mod monitor;
pub mod output;
pub mod queries;
pub mod run;
pub mod submissions;
pub mod target;
pub mod utils;

use crate::error::ConfigResult;
use crate::validation::Validatable;
use serde::{Deserialize, Serialize};

/// Main Stampede configuration combining all domains
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StampedeConfig {
    /// Run-wide parameters (duration, seed, grace period)
    #[serde(default)]
    pub run: run::RunConfig,

    /// Target platform endpoints
    #[serde(default)]
    pub target: target::TargetConfig,

    /// Actor population configuration
    #[serde(default)]
    pub actors: actors::ActorsConfig,

    /// Submission load generator configuration
    #[serde(default)]
    pub submissions: submissions::SubmissionsConfig,

    /// Query load generator configuration
    #[serde(default)]
    pub queries: queries::QueriesConfig,

    /// Resource & health monitor configuration
    #[serde(default)]
    pub monitor: monitor::MonitorConfig,

    /// Report output configuration
    #[serde(default)]
    pub output: output::OutputConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: logging::LoggingConfig,
}

impl StampedeConfig {
    /// Validate all domain configurations
    pub fn validate_all(&self) -> ConfigResult<()> {
        self.run.validate()?;
        self.target.validate()?;
        self.actors.validate()?;
        self.submissions.validate()?;
        self.queries.validate()?;
        self.monitor.validate()?;
        self.output.validate()?;
        self.logging.validate()?;
        Ok(())
    }

    /// Generate a sample configuration file
    pub fn generate_sample() -> String {
        let config = StampedeConfig::default();
        serde_yaml::to_string(&config).unwrap_or_else(|_| "# Failed to generate sample config".to_string())
    }
}
