//! Per-component report structure

use crate::health::{Alert, MetricSample, Recommendation};
use crate::metrics::{RequestTotals, ResponseTimeHistogram, ResponseTimeStats, UnitStats};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The structured result of one component's run.
///
/// Computed once by the component's aggregating task when its loop ends;
/// never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentReport {
    pub component: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,

    /// False when the component's control logic failed mid-run
    pub completed: bool,

    pub totals: RequestTotals,
    pub response_times: ResponseTimeStats,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub histogram: Option<ResponseTimeHistogram>,

    /// Named categorical distributions, e.g. "verdict" -> {accepted: 10, ...}
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub distributions: BTreeMap<String, BTreeMap<String, u64>>,

    /// Per-unit breakdown (one entry per actor/worker/connection)
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub units: Vec<UnitStats>,

    /// Raw time series (monitor only)
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub samples: Vec<MetricSample>,

    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub alerts: Vec<Alert>,

    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub recommendations: Vec<Recommendation>,

    /// Recorded non-fatal error descriptions
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub errors: Vec<String>,

    /// Component-specific payload (e.g. per-category query timings)
    #[serde(skip_serializing_if = "serde_json::Map::is_empty", default)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ComponentReport {
    pub fn new(component: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            component: component.into(),
            started_at: now,
            finished_at: now,
            completed: true,
            totals: RequestTotals::default(),
            response_times: ResponseTimeStats::default(),
            histogram: None,
            distributions: BTreeMap::new(),
            units: Vec::new(),
            samples: Vec::new(),
            alerts: Vec::new(),
            recommendations: Vec::new(),
            errors: Vec::new(),
            extra: serde_json::Map::new(),
        }
    }

    /// Bump a named categorical distribution
    pub fn count_in(&mut self, distribution: &str, key: impl Into<String>) {
        *self
            .distributions
            .entry(distribution.to_string())
            .or_default()
            .entry(key.into())
            .or_insert(0) += 1;
    }

    pub fn duration_secs(&self) -> f64 {
        (self.finished_at - self.started_at).num_milliseconds() as f64 / 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_report_serializes_lean() {
        let report = ComponentReport::new("submissions");
        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("units").is_none());
        assert!(json.get("alerts").is_none());
        assert_eq!(json["completed"], true);
    }

    #[test]
    fn test_distribution_counting() {
        let mut report = ComponentReport::new("submissions");
        report.count_in("language", "rust");
        report.count_in("language", "rust");
        report.count_in("language", "python");
        assert_eq!(report.distributions["language"]["rust"], 2);
        assert_eq!(report.distributions["language"]["python"], 1);
    }
}
