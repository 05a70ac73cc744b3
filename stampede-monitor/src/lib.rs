//! Resource & health monitor
//!
//! Samples host resources and probes application health on a fixed tick,
//! evaluates alert thresholds per tick, and derives deterministic
//! recommendations at the end of the run. Observation only; it never
//! generates load beyond the health probe.

pub mod alerts;
pub mod collector;
pub mod monitor;
pub mod probe;
pub mod recommend;

pub use collector::ResourceCollector;
pub use monitor::ResourceHealthMonitor;
