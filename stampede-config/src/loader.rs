//! Configuration loading and environment variable handling

use crate::domains::StampedeConfig;
use crate::error::{ConfigError, ConfigResult};
use std::path::Path;
use tracing::debug;

/// Configuration loader with environment variable support
pub struct ConfigLoader {
    /// Environment variable prefix
    prefix: String,
}

impl ConfigLoader {
    /// Create a new config loader with default prefix
    pub fn new() -> Self {
        Self {
            prefix: "STAMPEDE".to_string(),
        }
    }

    /// Create a new config loader with custom prefix
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Load configuration from a YAML file with environment overrides
    pub fn from_file(&self, path: impl AsRef<Path>) -> ConfigResult<StampedeConfig> {
        let content = std::fs::read_to_string(path)?;
        let mut config: StampedeConfig = serde_yaml::from_str(&content)?;

        self.apply_env_overrides(&mut config)?;
        config.validate_all()?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env(&self) -> ConfigResult<StampedeConfig> {
        let mut config = StampedeConfig::default();
        self.apply_env_overrides(&mut config)?;
        config.validate_all()?;
        Ok(config)
    }

    /// Load configuration with fallback chain
    pub fn load(&self, config_path: Option<impl AsRef<Path>>) -> ConfigResult<StampedeConfig> {
        match config_path {
            Some(path) => self.from_file(path),
            None => self.from_env(),
        }
    }

    /// Apply environment variable overrides to configuration
    fn apply_env_overrides(&self, config: &mut StampedeConfig) -> ConfigResult<()> {
        if let Ok(url) = self.get_env_var("API_URL") {
            debug!("Overriding target.api_url from environment");
            config.target.api_url = url;
        }

        if let Ok(url) = self.get_env_var("REALTIME_URL") {
            config.target.realtime_url = url;
        }

        if let Ok(path) = self.get_env_var("FIXTURE_PATH") {
            config.target.fixture_path = path.into();
        }

        if let Ok(duration) = self.get_env_var("DURATION_SECONDS") {
            let seconds: u64 = duration
                .parse()
                .map_err(|e| ConfigError::EnvError(format!("Invalid DURATION_SECONDS: {}", e)))?;
            config.run.duration = std::time::Duration::from_secs(seconds);
        }

        if let Ok(seed) = self.get_env_var("SEED") {
            let seed: u64 = seed
                .parse()
                .map_err(|e| ConfigError::EnvError(format!("Invalid SEED: {}", e)))?;
            config.run.seed = Some(seed);
        }

        if let Ok(count) = self.get_env_var("ACTOR_COUNT") {
            config.actors.count = count
                .parse()
                .map_err(|e| ConfigError::EnvError(format!("Invalid ACTOR_COUNT: {}", e)))?;
        }

        if let Ok(rate) = self.get_env_var("SUBMISSION_RATE") {
            config.submissions.rate_per_sec = rate
                .parse()
                .map_err(|e| ConfigError::EnvError(format!("Invalid SUBMISSION_RATE: {}", e)))?;
        }

        if let Ok(workers) = self.get_env_var("SUBMISSION_WORKERS") {
            config.submissions.workers = workers
                .parse()
                .map_err(|e| ConfigError::EnvError(format!("Invalid SUBMISSION_WORKERS: {}", e)))?;
        }

        if let Ok(connections) = self.get_env_var("QUERY_CONNECTIONS") {
            config.queries.connections = connections
                .parse()
                .map_err(|e| ConfigError::EnvError(format!("Invalid QUERY_CONNECTIONS: {}", e)))?;
        }

        if let Ok(dir) = self.get_env_var("OUTPUT_DIR") {
            config.output.directory = dir.into();
        }

        if let Ok(level) = self.get_env_var("LOG_LEVEL") {
            use std::str::FromStr;
            config.logging.level = crate::domains::logging::LogLevel::from_str(&level)
                .map_err(|_| ConfigError::EnvError(format!("Invalid LOG_LEVEL: {}", level)))?;
        }

        Ok(())
    }

    /// Get environment variable with prefix
    fn get_env_var(&self, name: &str) -> Result<String, std::env::VarError> {
        std::env::var(format!("{}_{}", self.prefix, name))
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "run:\n  duration: 30\nactors:\n  count: 3\nsubmissions:\n  rate_per_sec: 20"
        )
        .unwrap();

        let config = ConfigLoader::new().from_file(file.path()).unwrap();
        assert_eq!(config.run.duration.as_secs(), 30);
        assert_eq!(config.actors.count, 3);
        assert_eq!(config.submissions.rate_per_sec, 20);
        // Untouched domains keep defaults
        assert_eq!(config.queries.connections, 5);
    }

    #[test]
    fn test_invalid_file_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "run:\n  duration: 0").unwrap();

        assert!(ConfigLoader::new().from_file(file.path()).is_err());
    }

    #[test]
    fn test_env_override() {
        // Custom prefix keeps this test isolated from the real environment
        std::env::set_var("STAMPEDE_TEST_ACTOR_COUNT", "7");
        let config = ConfigLoader::with_prefix("STAMPEDE_TEST").from_env().unwrap();
        assert_eq!(config.actors.count, 7);
        std::env::remove_var("STAMPEDE_TEST_ACTOR_COUNT");
    }
}
