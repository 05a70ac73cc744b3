//! Query load generator configuration

use crate::error::ConfigResult;
use crate::validation::{validate_positive, Validatable};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for the datastore query load
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QueriesConfig {
    /// Whether this component runs at all
    #[serde(default = "crate::domains::utils::default_true")]
    pub enabled: bool,

    /// Number of independent persistent connections
    #[serde(default = "default_connections")]
    pub connections: usize,

    /// Maximum queries issued per connection
    #[serde(default = "default_queries_per_connection")]
    pub queries_per_connection: u64,

    /// Optional source datastore to copy into the isolated working file.
    /// When absent, a minimal schema plus seed rows is bootstrapped so the
    /// test is runnable standalone.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_path: Option<PathBuf>,
}

impl Default for QueriesConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            connections: default_connections(),
            queries_per_connection: default_queries_per_connection(),
            source_path: None,
        }
    }
}

impl Validatable for QueriesConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_positive(
            self.queries_per_connection,
            "queries_per_connection",
            self.domain_name(),
        )?;
        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "queries"
    }
}

fn default_connections() -> usize {
    5
}

fn default_queries_per_connection() -> u64 {
    1000
}
