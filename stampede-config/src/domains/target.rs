//! Target platform configuration

use crate::error::ConfigResult;
use crate::validation::{validate_required_string, validate_url, Validatable};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Endpoints and client settings for the platform under test
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetConfig {
    /// Base URL of the platform API
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// WebSocket URL of the realtime channel; empty disables realtime
    #[serde(default = "default_realtime_url")]
    pub realtime_url: String,

    /// Directory holding the pre-generated fixture files
    #[serde(default = "default_fixture_path")]
    pub fixture_path: PathBuf,

    /// Timeout for read-style API calls
    #[serde(
        with = "crate::domains::utils::serde_duration",
        default = "default_request_timeout"
    )]
    pub request_timeout: Duration,

    /// Timeout for submission creation (the judge may be slow to accept)
    #[serde(
        with = "crate::domains::utils::serde_duration",
        default = "default_submission_timeout"
    )]
    pub submission_timeout: Duration,

    /// User agent string
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            realtime_url: default_realtime_url(),
            fixture_path: default_fixture_path(),
            request_timeout: default_request_timeout(),
            submission_timeout: default_submission_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

impl Validatable for TargetConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_url(&self.api_url, "api_url", self.domain_name())?;
        if !self.realtime_url.is_empty() {
            validate_url(&self.realtime_url, "realtime_url", self.domain_name())?;
        }
        validate_required_string(&self.user_agent, "user_agent", self.domain_name())?;

        if self.request_timeout.is_zero() || self.submission_timeout.is_zero() {
            return Err(self.validation_error("timeouts must be greater than 0"));
        }

        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "target"
    }
}

fn default_api_url() -> String {
    "http://localhost:3000/api".to_string()
}

fn default_realtime_url() -> String {
    "ws://localhost:3000/ws".to_string()
}

fn default_fixture_path() -> PathBuf {
    PathBuf::from("./fixtures")
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_submission_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_user_agent() -> String {
    "Stampede/0.3".to_string()
}
