//! The merged run report

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use stampede_config::StampedeConfig;
use stampede_core::health::{Alert, Recommendation};
use stampede_core::{ComponentReport, RequestTotals, ResponseTimeStats};

/// Everything one run produced, merged across components.
///
/// Built once when the run ends; the JSON writer and console mirror both
/// render from this single structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub generated_at: DateTime<Utc>,
    pub started_at: DateTime<Utc>,
    pub duration_secs: f64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    /// Echo of the effective configuration
    pub config: serde_json::Value,

    /// Totals merged across every component
    pub overall: RequestTotals,
    pub response_times: ResponseTimeStats,

    pub components: Vec<ComponentReport>,
}

impl RunReport {
    pub fn build(
        config: &StampedeConfig,
        started_at: DateTime<Utc>,
        components: Vec<ComponentReport>,
    ) -> Self {
        let mut overall = RequestTotals::default();
        let mut response_times = ResponseTimeStats::default();
        for component in &components {
            overall.merge(&component.totals);
            response_times.merge(&component.response_times);
        }

        let generated_at = Utc::now();
        Self {
            generated_at,
            started_at,
            duration_secs: (generated_at - started_at).num_milliseconds() as f64 / 1000.0,
            seed: config.run.seed,
            config: serde_json::to_value(config).unwrap_or_default(),
            overall,
            response_times,
            components,
        }
    }

    pub fn component(&self, name: &str) -> Option<&ComponentReport> {
        self.components.iter().find(|c| c.component == name)
    }

    pub fn alerts(&self) -> impl Iterator<Item = &Alert> {
        self.components.iter().flat_map(|c| c.alerts.iter())
    }

    pub fn recommendations(&self) -> impl Iterator<Item = &Recommendation> {
        self.components.iter().flat_map(|c| c.recommendations.iter())
    }

    pub fn all_completed(&self) -> bool {
        self.components.iter().all(|c| c.completed)
    }

    /// Short multi-line text for logs and the console header
    pub fn executive_summary(&self) -> String {
        let mut lines = Vec::new();
        lines.push(format!(
            "run of {:.1}s, {} requests, {} success rate",
            self.duration_secs,
            self.overall.total,
            self.overall.success_rate_display()
        ));
        lines.push(format!(
            "response times: avg {:.1}ms, min {}ms, max {}ms",
            self.response_times.avg_ms(),
            self.response_times.min_ms.unwrap_or(0),
            self.response_times.max_ms.unwrap_or(0),
        ));

        for component in &self.components {
            let status = if component.completed { "ok" } else { "FAILED" };
            lines.push(format!(
                "  {}: {} requests, {} success, {}",
                component.component,
                component.totals.total,
                component.totals.success_rate_display(),
                status
            ));
        }

        let alerts = self.alerts().count();
        if alerts > 0 {
            lines.push(format!("{} alert(s) fired", alerts));
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn component(name: &str, total: u64, successful: u64) -> ComponentReport {
        let mut report = ComponentReport::new(name);
        report.totals = RequestTotals {
            total,
            successful,
            failed: total - successful,
        };
        report
    }

    #[test]
    fn test_overall_totals_merge_components() {
        let config = StampedeConfig::default();
        let report = RunReport::build(
            &config,
            Utc::now(),
            vec![component("actors", 100, 98), component("submissions", 50, 50)],
        );

        assert_eq!(report.overall.total, 150);
        assert_eq!(report.overall.successful, 148);
        assert_eq!(report.overall.failed, 2);
        assert!(report.all_completed());
    }

    #[test]
    fn test_summary_marks_failed_components() {
        let config = StampedeConfig::default();
        let mut failed = component("queries", 10, 5);
        failed.completed = false;

        let report = RunReport::build(&config, Utc::now(), vec![failed]);
        assert!(!report.all_completed());
        assert!(report.executive_summary().contains("FAILED"));
    }

    #[test]
    fn test_report_round_trips_through_json() {
        let config = StampedeConfig::default();
        let mut timed = component("actors", 3, 3);
        let mut histogram = stampede_core::ResponseTimeHistogram::default();
        for ms in [40, 250, 7_000] {
            histogram.record(ms);
        }
        timed.histogram = Some(histogram);

        let report = RunReport::build(&config, Utc::now(), vec![timed]);

        let json = serde_json::to_string(&report).unwrap();
        let parsed: RunReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.overall, report.overall);
        assert_eq!(parsed.components.len(), 1);
        assert_eq!(parsed.components[0].histogram, Some(histogram));
    }
}
