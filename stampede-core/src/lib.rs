//! Shared building blocks for the Stampede load engine
//!
//! Everything that more than one generator needs lives here: request
//! counters and response-time aggregates, the fixed-bucket histogram,
//! seedable weighted random selection, the closed worker-event type, the
//! common component contract, stop-signal coordination, and the health
//! vocabulary (metric samples, alerts, recommendations).

pub mod aggregate;
pub mod component;
pub mod error;
pub mod events;
pub mod health;
pub mod metrics;
pub mod report;
pub mod selection;
pub mod shutdown;

pub use aggregate::EventAggregator;
pub use component::{Capabilities, LoadComponent};
pub use error::ComponentError;
pub use events::WorkerEvent;
pub use health::{Alert, AlertKind, HealthStatus, MetricSample, Priority, Recommendation, Severity};
pub use metrics::{RequestTotals, ResponseTimeHistogram, ResponseTimeStats, UnitStats};
pub use report::ComponentReport;
pub use selection::{roll, seeded_rng, WeightedChoice};
pub use shutdown::{StopController, StopSignal};
