//! Worker-to-aggregator messages
//!
//! Workers never touch shared counters. Each worker owns its local state
//! and reports immutable results over a typed channel to the single
//! aggregating owner, which serializes all aggregation writes. The message
//! set is closed so receivers match exhaustively.

use crate::health::MetricSample;
use crate::metrics::UnitStats;

/// Result messages flowing from worker units to their aggregator
#[derive(Debug, Clone)]
pub enum WorkerEvent {
    /// A submission was created and acknowledged by the platform
    SubmissionCompleted {
        unit_id: String,
        response_time_ms: u64,
        language: String,
        problem_id: i64,
        verdict: String,
    },

    /// A submission attempt failed (network error, timeout, or rejection)
    SubmissionFailed {
        unit_id: String,
        response_time_ms: u64,
        error: String,
    },

    /// A non-submission request finished (actor actions, query statements)
    ActionCompleted {
        unit_id: String,
        action: &'static str,
        response_time_ms: u64,
        success: bool,
    },

    /// A unit's final local counters, flushed when its loop exits
    WorkerStats { stats: UnitStats },

    /// One monitoring tick's measurements
    MetricsUpdate { sample: Box<MetricSample> },
}

impl WorkerEvent {
    /// Identifier of the unit that produced this event, when it has one
    pub fn unit_id(&self) -> Option<&str> {
        match self {
            WorkerEvent::SubmissionCompleted { unit_id, .. } => Some(unit_id),
            WorkerEvent::SubmissionFailed { unit_id, .. } => Some(unit_id),
            WorkerEvent::ActionCompleted { unit_id, .. } => Some(unit_id),
            WorkerEvent::WorkerStats { stats } => Some(&stats.id),
            WorkerEvent::MetricsUpdate { .. } => None,
        }
    }
}
