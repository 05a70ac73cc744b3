//! Component error types

use thiserror::Error;

/// Errors a component can surface to the orchestrator.
///
/// Only `Setup` aborts the run; everything else is absorbed into the
/// component's own report and the run continues.
#[derive(Error, Debug)]
pub enum ComponentError {
    /// Pre-load validation failed; the run must not start
    #[error("setup/validation failed: {0}")]
    Setup(String),

    /// The component's control logic failed mid-run
    #[error("component failed: {0}")]
    Failed(String),
}

/// Errors constructing a weighted selection table
#[derive(Error, Debug, PartialEq)]
pub enum SelectionError {
    #[error("weighted selection requires at least one option")]
    Empty,

    #[error("weighted selection requires a positive total weight, got {0}")]
    NonPositiveTotal(f64),
}
