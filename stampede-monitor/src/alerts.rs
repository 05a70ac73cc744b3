//! Per-tick threshold evaluation
//!
//! Resource breaches are warnings; disk exhaustion and hard API errors
//! are critical. Critical alerts get logged the moment they fire.

use chrono::Utc;
use stampede_config::domains::monitor::AlertThresholds;
use stampede_core::health::{Alert, AlertKind, HealthStatus, MetricSample, Severity};
use tracing::error;

/// Evaluate one sample against the thresholds. `probe_error_rate` is the
/// running fraction of errored health probes this run.
pub fn evaluate(
    sample: &MetricSample,
    thresholds: &AlertThresholds,
    probe_error_rate: f64,
) -> Vec<Alert> {
    let mut alerts = Vec::new();
    let now = Utc::now();

    if sample.cpu.usage_percent > thresholds.cpu_percent {
        alerts.push(Alert {
            kind: AlertKind::HighCpuUsage,
            severity: Severity::Warning,
            message: format!(
                "cpu usage {:.1}% exceeds {:.1}%",
                sample.cpu.usage_percent, thresholds.cpu_percent
            ),
            value: sample.cpu.usage_percent as f64,
            threshold: thresholds.cpu_percent as f64,
            timestamp: now,
        });
    }

    if sample.memory.used_percent > thresholds.memory_percent {
        alerts.push(Alert {
            kind: AlertKind::HighMemoryUsage,
            severity: Severity::Warning,
            message: format!(
                "memory usage {:.1}% exceeds {:.1}%",
                sample.memory.used_percent, thresholds.memory_percent
            ),
            value: sample.memory.used_percent as f64,
            threshold: thresholds.memory_percent as f64,
            timestamp: now,
        });
    }

    if sample.disk.used_percent > thresholds.disk_percent {
        alerts.push(Alert {
            kind: AlertKind::HighDiskUsage,
            severity: Severity::Critical,
            message: format!(
                "disk usage {:.1}% exceeds {:.1}%",
                sample.disk.used_percent, thresholds.disk_percent
            ),
            value: sample.disk.used_percent as f64,
            threshold: thresholds.disk_percent as f64,
            timestamp: now,
        });
    }

    if let Some(response_time) = sample.api.response_time_ms {
        if response_time > thresholds.response_time_ms {
            alerts.push(Alert {
                kind: AlertKind::SlowResponse,
                severity: Severity::Warning,
                message: format!(
                    "health probe took {}ms, threshold {}ms",
                    response_time, thresholds.response_time_ms
                ),
                value: response_time as f64,
                threshold: thresholds.response_time_ms as f64,
                timestamp: now,
            });
        }
    }

    if sample.api.status == HealthStatus::Error {
        alerts.push(Alert {
            kind: AlertKind::ApiError,
            severity: Severity::Critical,
            message: "health probe failed hard".to_string(),
            value: 1.0,
            threshold: 0.0,
            timestamp: now,
        });
    }

    if probe_error_rate > thresholds.error_rate {
        alerts.push(Alert {
            kind: AlertKind::HighErrorRate,
            severity: Severity::Warning,
            message: format!(
                "probe error rate {:.1}% exceeds {:.1}%",
                probe_error_rate * 100.0,
                thresholds.error_rate * 100.0
            ),
            value: probe_error_rate,
            threshold: thresholds.error_rate,
            timestamp: now,
        });
    }

    for alert in alerts.iter().filter(|a| a.severity == Severity::Critical) {
        error!(kind = ?alert.kind, message = %alert.message, "critical alert");
    }

    alerts
}

#[cfg(test)]
mod tests {
    use super::*;
    use stampede_core::health::{
        ApiProbe, CpuMetrics, DiskMetrics, LoadMetrics, MemoryMetrics, NetworkMetrics,
    };

    fn quiet_sample() -> MetricSample {
        MetricSample {
            timestamp: Utc::now(),
            cpu: CpuMetrics {
                usage_percent: 20.0,
                idle_percent: 80.0,
                cores: 8,
            },
            memory: MemoryMetrics {
                used_bytes: 4 << 30,
                free_bytes: 12 << 30,
                used_percent: 25.0,
            },
            disk: DiskMetrics {
                used_bytes: 100 << 30,
                free_bytes: 400 << 30,
                used_percent: 20.0,
            },
            network: NetworkMetrics::default(),
            load: LoadMetrics::default(),
            process: None,
            api: ApiProbe {
                status: HealthStatus::Healthy,
                response_time_ms: Some(12),
                http_status: Some(200),
            },
        }
    }

    #[test]
    fn test_quiet_sample_raises_nothing() {
        let alerts = evaluate(&quiet_sample(), &AlertThresholds::default(), 0.0);
        assert!(alerts.is_empty());
    }

    #[test]
    fn test_cpu_over_threshold_is_exactly_one_warning() {
        let mut sample = quiet_sample();
        sample.cpu.usage_percent = 85.0;

        let alerts = evaluate(&sample, &AlertThresholds::default(), 0.0);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].kind, AlertKind::HighCpuUsage);
        assert_eq!(alerts[0].severity, Severity::Warning);
        assert_eq!(alerts[0].value, 85.0);
        assert_eq!(alerts[0].threshold, 80.0);
    }

    #[test]
    fn test_disk_and_api_error_are_critical() {
        let mut sample = quiet_sample();
        sample.disk.used_percent = 95.0;
        sample.api.status = HealthStatus::Error;

        let alerts = evaluate(&sample, &AlertThresholds::default(), 0.0);
        let critical: Vec<_> = alerts
            .iter()
            .filter(|a| a.severity == Severity::Critical)
            .collect();
        assert_eq!(critical.len(), 2);
    }

    #[test]
    fn test_error_rate_breach() {
        let alerts = evaluate(&quiet_sample(), &AlertThresholds::default(), 0.25);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].kind, AlertKind::HighErrorRate);
    }
}
