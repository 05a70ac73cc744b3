//! Resource & health monitor configuration

use crate::error::ConfigResult;
use crate::validation::{validate_ratio, Validatable};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the resource & health monitor
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Whether this component runs at all
    #[serde(default = "crate::domains::utils::default_true")]
    pub enabled: bool,

    /// Sampling interval
    #[serde(
        with = "crate::domains::utils::serde_duration",
        default = "default_interval"
    )]
    pub interval: Duration,

    /// Substring used to heuristically match the target service process.
    /// No match is normal degraded mode, never an error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub process_name: Option<String>,

    /// Alert thresholds evaluated on every tick
    #[serde(default)]
    pub thresholds: AlertThresholds,
}

/// Per-metric alert thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertThresholds {
    /// CPU usage percent above which a warning fires
    pub cpu_percent: f32,

    /// Memory usage percent above which a warning fires
    pub memory_percent: f32,

    /// Disk usage percent above which a critical alert fires
    pub disk_percent: f32,

    /// Health probe round-trip above which a warning fires, in ms
    pub response_time_ms: u64,

    /// Fraction of errored probes above which a warning fires
    pub error_rate: f64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval: default_interval(),
            process_name: None,
            thresholds: AlertThresholds::default(),
        }
    }
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            cpu_percent: 80.0,
            memory_percent: 85.0,
            disk_percent: 90.0,
            response_time_ms: 2000,
            error_rate: 0.10,
        }
    }
}

impl Validatable for MonitorConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.interval.is_zero() {
            return Err(self.validation_error("interval must be greater than 0"));
        }
        self.thresholds.validate()?;
        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "monitor"
    }
}

impl Validatable for AlertThresholds {
    fn validate(&self) -> ConfigResult<()> {
        for (value, name) in [
            (self.cpu_percent, "cpu_percent"),
            (self.memory_percent, "memory_percent"),
            (self.disk_percent, "disk_percent"),
        ] {
            if !(0.0..=100.0).contains(&value) {
                return Err(self.validation_error(format!(
                    "{} must be between 0 and 100, got {}",
                    name, value
                )));
            }
        }

        validate_ratio(self.error_rate, "error_rate", self.domain_name())?;
        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "monitor.thresholds"
    }
}

fn default_interval() -> Duration {
    Duration::from_secs(5)
}
