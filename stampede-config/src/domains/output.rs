//! Report output configuration

use crate::error::ConfigResult;
use crate::validation::Validatable;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where and how run artifacts are written
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory receiving the JSON reports and CSV export
    #[serde(default = "default_directory")]
    pub directory: PathBuf,

    /// Whether to mirror the summary on the console
    #[serde(default = "crate::domains::utils::default_true")]
    pub console: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_directory(),
            console: true,
        }
    }
}

impl Validatable for OutputConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.directory.as_os_str().is_empty() {
            return Err(self.validation_error("directory cannot be empty"));
        }
        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "output"
    }
}

fn default_directory() -> PathBuf {
    PathBuf::from("./stampede-reports")
}
