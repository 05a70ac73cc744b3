//! Fixture loading errors

use std::path::PathBuf;
use thiserror::Error;

/// Errors while loading the fixture set. All of these are setup errors:
/// the run must not start without a usable fixture pool.
#[derive(Error, Debug)]
pub enum FixtureError {
    #[error("Fixture file missing: {0}")]
    Missing(PathBuf),

    #[error("Failed to read fixture file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse fixture file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Fixture pool '{0}' is empty")]
    EmptyPool(&'static str),
}
