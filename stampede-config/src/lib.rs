//! Domain-driven run configuration for Stampede
//!
//! Configuration is split by functional domain (target, actors, submissions,
//! queries, monitor, output), with validation, defaults, and environment
//! variable support. A loaded [`StampedeConfig`] is immutable for the whole
//! run and shared read-only by every component.

pub mod error;
pub mod loader;
pub mod validation;

pub mod domains;

pub use error::{ConfigError, ConfigResult};
pub use loader::ConfigLoader;

pub use domains::{
    actors::ActorsConfig, logging::LoggingConfig, monitor::MonitorConfig, output::OutputConfig,
    queries::QueriesConfig, run::RunConfig, submissions::SubmissionsConfig, target::TargetConfig,
    StampedeConfig,
};

pub use domains::utils::serde_duration;
