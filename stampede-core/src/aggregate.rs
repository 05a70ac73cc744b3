//! The single aggregating owner of worker results
//!
//! Workers send immutable [`WorkerEvent`]s; one aggregator per component
//! folds them into counters, the histogram, distributions, and per-unit
//! stats. Nothing else ever writes these values, so no locking is needed.

use crate::events::WorkerEvent;
use crate::health::MetricSample;
use crate::metrics::{RequestTotals, ResponseTimeHistogram, ResponseTimeStats, UnitStats};
use crate::report::ComponentReport;
use std::collections::BTreeMap;

/// Cap on retained per-request error strings; past this only the counters
/// keep growing
const MAX_RECORDED_ERRORS: usize = 1000;

/// Folds worker events into report state
#[derive(Debug, Default)]
pub struct EventAggregator {
    pub totals: RequestTotals,
    pub response_times: ResponseTimeStats,
    pub histogram: ResponseTimeHistogram,
    pub distributions: BTreeMap<String, BTreeMap<String, u64>>,
    pub samples: Vec<MetricSample>,
    pub errors: Vec<String>,
    pub submissions_sent: u64,
    pub submissions_processed: u64,
    units: BTreeMap<String, UnitStats>,
}

impl EventAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, event: WorkerEvent) {
        match event {
            WorkerEvent::SubmissionCompleted {
                unit_id,
                response_time_ms,
                language,
                problem_id,
                verdict,
            } => {
                self.record(&unit_id, response_time_ms, true);
                self.submissions_sent += 1;
                self.submissions_processed += 1;
                self.count_in("language", language);
                self.count_in("problem", problem_id.to_string());
                self.count_in("verdict", verdict);
            }

            WorkerEvent::SubmissionFailed {
                unit_id,
                response_time_ms,
                error,
            } => {
                self.record(&unit_id, response_time_ms, false);
                self.submissions_sent += 1;
                self.push_error(error);
            }

            WorkerEvent::ActionCompleted {
                unit_id,
                action,
                response_time_ms,
                success,
            } => {
                self.record(&unit_id, response_time_ms, success);
                self.count_in("action", action.to_string());
                if action == "submit" {
                    self.submissions_sent += 1;
                    if success {
                        self.submissions_processed += 1;
                    }
                }
            }

            // Authoritative final counters replace whatever was built up
            // incrementally for that unit
            WorkerEvent::WorkerStats { stats } => {
                self.units.insert(stats.id.clone(), stats);
            }

            WorkerEvent::MetricsUpdate { sample } => {
                self.samples.push(*sample);
            }
        }
    }

    /// Move everything into a component report
    pub fn finish(self, report: &mut ComponentReport) {
        report.totals = self.totals;
        report.response_times = self.response_times;
        report.histogram = Some(self.histogram);
        report.distributions = self.distributions;
        report.units = self.units.into_values().collect();
        report.samples = self.samples;
        report.errors = self.errors;
        report.extra.insert(
            "submissions_sent".to_string(),
            serde_json::json!(self.submissions_sent),
        );
        report.extra.insert(
            "submissions_processed".to_string(),
            serde_json::json!(self.submissions_processed),
        );
    }

    fn record(&mut self, unit_id: &str, response_time_ms: u64, success: bool) {
        self.totals.record(success);
        self.response_times.record(response_time_ms);
        self.histogram.record(response_time_ms);
        self.units
            .entry(unit_id.to_string())
            .or_insert_with(|| UnitStats::new(unit_id))
            .record(response_time_ms, success);
    }

    fn count_in(&mut self, distribution: &str, key: String) {
        *self
            .distributions
            .entry(distribution.to_string())
            .or_default()
            .entry(key)
            .or_insert(0) += 1;
    }

    fn push_error(&mut self, error: String) {
        if self.errors.len() < MAX_RECORDED_ERRORS {
            self.errors.push(error);
        }
    }

    pub fn latest_sample(&self) -> Option<&MetricSample> {
        self.samples.last()
    }

    /// Live progress line, emitted periodically while the component runs
    pub fn log_progress(&self, component: &str) {
        tracing::info!(
            component,
            requests = self.totals.total,
            failed = self.totals.failed,
            success_rate = %self.totals.success_rate_display(),
            avg_response_ms = format!("{:.1}", self.response_times.avg_ms()),
            "progress"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn action(unit: &str, ms: u64, success: bool) -> WorkerEvent {
        WorkerEvent::ActionCompleted {
            unit_id: unit.to_string(),
            action: "leaderboard",
            response_time_ms: ms,
            success,
        }
    }

    #[test]
    fn test_counter_identity_holds() {
        let mut agg = EventAggregator::new();
        agg.apply(action("a-1", 10, true));
        agg.apply(action("a-1", 20, false));
        agg.apply(action("a-2", 30, true));

        assert_eq!(agg.totals.total, 3);
        assert_eq!(agg.totals.successful + agg.totals.failed, agg.totals.total);
        assert_eq!(agg.histogram.total(), agg.response_times.count);
    }

    #[test]
    fn test_submission_counters() {
        let mut agg = EventAggregator::new();
        agg.apply(WorkerEvent::SubmissionCompleted {
            unit_id: "w-1".into(),
            response_time_ms: 42,
            language: "rust".into(),
            problem_id: 7,
            verdict: "accepted".into(),
        });
        agg.apply(WorkerEvent::SubmissionFailed {
            unit_id: "w-1".into(),
            response_time_ms: 5000,
            error: "timeout".into(),
        });

        assert_eq!(agg.submissions_sent, 2);
        assert_eq!(agg.submissions_processed, 1);
        assert_eq!(agg.distributions["language"]["rust"], 1);
        assert_eq!(agg.errors, vec!["timeout".to_string()]);
    }

    #[test]
    fn test_submit_action_counts_as_submission() {
        let mut agg = EventAggregator::new();
        agg.apply(WorkerEvent::ActionCompleted {
            unit_id: "a-1".into(),
            action: "submit",
            response_time_ms: 80,
            success: true,
        });
        assert_eq!(agg.submissions_sent, 1);
        assert_eq!(agg.submissions_processed, 1);
    }

    #[test]
    fn test_worker_stats_replace_incremental_unit() {
        let mut agg = EventAggregator::new();
        agg.apply(action("a-1", 10, true));

        let mut authoritative = UnitStats::new("a-1");
        authoritative.record(10, true);
        authoritative.record(99, true);
        agg.apply(WorkerEvent::WorkerStats {
            stats: authoritative,
        });

        let mut report = ComponentReport::new("actors");
        agg.finish(&mut report);
        assert_eq!(report.units.len(), 1);
        assert_eq!(report.units[0].totals.total, 2);
    }
}
