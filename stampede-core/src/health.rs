//! Health vocabulary shared between the monitor and the reporter:
//! metric samples, alerts, and recommendations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One timestamped measurement. Append-only once recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSample {
    pub timestamp: DateTime<Utc>,
    pub cpu: CpuMetrics,
    pub memory: MemoryMetrics,
    pub disk: DiskMetrics,
    pub network: NetworkMetrics,
    pub load: LoadMetrics,
    /// Best-effort target-process metrics; absent in degraded mode
    pub process: Option<ProcessMetrics>,
    pub api: ApiProbe,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CpuMetrics {
    pub usage_percent: f32,
    pub idle_percent: f32,
    pub cores: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MemoryMetrics {
    pub used_bytes: u64,
    pub free_bytes: u64,
    pub used_percent: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DiskMetrics {
    pub used_bytes: u64,
    pub free_bytes: u64,
    pub used_percent: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NetworkMetrics {
    pub rx_bytes_per_sec: u64,
    pub tx_bytes_per_sec: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LoadMetrics {
    pub one: f64,
    pub five: f64,
    pub fifteen: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessMetrics {
    pub name: String,
    pub cpu_percent: f32,
    pub memory_bytes: u64,
}

/// Classification of one application-health probe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ApiProbe {
    pub status: HealthStatus,
    pub response_time_ms: Option<u64>,
    pub http_status: Option<u16>,
}

/// A recorded threshold breach. Immutable, never removed mid-run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    #[serde(rename = "type")]
    pub kind: AlertKind,
    pub severity: Severity,
    pub message: String,
    pub value: f64,
    pub threshold: f64,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertKind {
    HighCpuUsage,
    HighMemoryUsage,
    HighDiskUsage,
    SlowResponse,
    HighErrorRate,
    ApiError,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Critical,
}

/// A rule-derived operational note in the final report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub priority: Priority,
    pub category: String,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alert_kind_wire_format() {
        let kind = serde_json::to_string(&AlertKind::HighCpuUsage).unwrap();
        assert_eq!(kind, "\"HIGH_CPU_USAGE\"");

        let severity = serde_json::to_string(&Severity::Warning).unwrap();
        assert_eq!(severity, "\"warning\"");
    }

    #[test]
    fn test_health_status_wire_format() {
        let status = serde_json::to_string(&HealthStatus::Degraded).unwrap();
        assert_eq!(status, "\"degraded\"");
    }
}
