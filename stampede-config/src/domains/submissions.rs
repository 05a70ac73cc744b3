//! Submission load generator configuration

use crate::error::ConfigResult;
use crate::validation::{validate_positive, Validatable};
use serde::{Deserialize, Serialize};

/// Configuration for the submission flood
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SubmissionsConfig {
    /// Whether this component runs at all
    #[serde(default = "crate::domains::utils::default_true")]
    pub enabled: bool,

    /// Target submissions per second across all workers
    #[serde(default = "default_rate_per_sec")]
    pub rate_per_sec: u32,

    /// Worker count. Zero is a legal boundary case.
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Correctness mix for generated payloads
    #[serde(default)]
    pub mix: VariantMix,
}

/// Weighted mix of code-sample variants sent by the flood
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VariantMix {
    pub correct: f64,
    pub wrong_answer: f64,
    pub compile_error: f64,
    pub timeout: f64,
}

impl VariantMix {
    /// A mix that only ever sends correct solutions
    pub fn all_correct() -> Self {
        Self {
            correct: 1.0,
            wrong_answer: 0.0,
            compile_error: 0.0,
            timeout: 0.0,
        }
    }

    fn total(&self) -> f64 {
        self.correct + self.wrong_answer + self.compile_error + self.timeout
    }
}

impl Default for SubmissionsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            rate_per_sec: default_rate_per_sec(),
            workers: default_workers(),
            mix: VariantMix::default(),
        }
    }
}

impl Default for VariantMix {
    fn default() -> Self {
        Self {
            correct: 0.85,
            wrong_answer: 0.10,
            compile_error: 0.03,
            timeout: 0.02,
        }
    }
}

impl Validatable for SubmissionsConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_positive(self.rate_per_sec, "rate_per_sec", self.domain_name())?;
        self.mix.validate()?;
        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "submissions"
    }
}

impl Validatable for VariantMix {
    fn validate(&self) -> ConfigResult<()> {
        for (value, name) in [
            (self.correct, "correct"),
            (self.wrong_answer, "wrong_answer"),
            (self.compile_error, "compile_error"),
            (self.timeout, "timeout"),
        ] {
            if value < 0.0 {
                return Err(self.validation_error(format!("{} cannot be negative", name)));
            }
        }

        // Allow minor float slack around 1.0
        if (self.total() - 1.0).abs() > 1e-6 {
            return Err(self.validation_error(format!(
                "variant weights must sum to 1.0, got {}",
                self.total()
            )));
        }

        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "submissions.mix"
    }
}

fn default_rate_per_sec() -> u32 {
    10
}

fn default_workers() -> usize {
    4
}
