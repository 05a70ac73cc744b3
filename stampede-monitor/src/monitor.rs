//! The monitor component
//!
//! One task samples, probes, and evaluates thresholds on a fixed tick.
//! It owns every counter it writes, so the loop needs no locking.

use crate::alerts;
use crate::collector::ResourceCollector;
use crate::probe::probe_health;
use crate::recommend;
use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use stampede_config::MonitorConfig;
use stampede_core::health::{HealthStatus, MetricSample};
use stampede_core::{
    Capabilities, ComponentError, ComponentReport, EventAggregator, LoadComponent, RequestTotals,
    StopSignal, WorkerEvent,
};
use stampede_http::PlatformApi;
use std::sync::Arc;
use tokio::time::MissedTickBehavior;
use tracing::info;

pub struct ResourceHealthMonitor {
    config: MonitorConfig,
    api: Arc<dyn PlatformApi>,
}

impl ResourceHealthMonitor {
    pub fn new(config: MonitorConfig, api: Arc<dyn PlatformApi>) -> Self {
        Self { config, api }
    }
}

#[async_trait]
impl LoadComponent for ResourceHealthMonitor {
    fn name(&self) -> &'static str {
        "monitor"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            observes_only: true,
            ..Default::default()
        }
    }

    async fn run(&mut self, mut stop: StopSignal) -> Result<ComponentReport, ComponentError> {
        let mut report = ComponentReport::new(self.name());

        let mut collector = ResourceCollector::new(self.config.process_name.clone());
        let mut aggregator = EventAggregator::new();
        let mut alerts = Vec::new();
        let mut probes = RequestTotals::default();

        let mut interval = tokio::time::interval(self.config.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            interval_ms = self.config.interval.as_millis() as u64,
            process = self.config.process_name.as_deref().unwrap_or("-"),
            "monitor running"
        );

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let probe = probe_health(
                        self.api.as_ref(),
                        self.config.thresholds.response_time_ms,
                    )
                    .await;
                    let healthy = probe.status != HealthStatus::Error;
                    probes.record(healthy);
                    match probe.response_time_ms {
                        Some(response_time_ms) => aggregator.apply(WorkerEvent::ActionCompleted {
                            unit_id: "monitor".to_string(),
                            action: "health_probe",
                            response_time_ms,
                            success: healthy,
                        }),
                        // No round trip to time; keep the failure out of
                        // the response-time aggregates
                        None => aggregator.totals.record(false),
                    }

                    let sample = MetricSample {
                        timestamp: Utc::now(),
                        cpu: collector.cpu(),
                        memory: collector.memory(),
                        disk: collector.disk(),
                        network: collector.network(),
                        load: collector.load(),
                        process: collector.process(),
                        api: probe,
                    };

                    let error_rate = if probes.total == 0 {
                        0.0
                    } else {
                        probes.failed as f64 / probes.total as f64
                    };
                    alerts.extend(alerts::evaluate(
                        &sample,
                        &self.config.thresholds,
                        error_rate,
                    ));

                    aggregator.apply(WorkerEvent::MetricsUpdate {
                        sample: Box::new(sample),
                    });
                }
                _ = stop.wait() => break,
            }
        }

        aggregator.finish(&mut report);
        report.alerts = alerts;
        report.recommendations = recommend::recommendations(&report.samples, &report.alerts);
        report.finished_at = Utc::now();

        let samples = &report.samples;
        let count = samples.len().max(1) as f64;
        let avg_cpu = samples.iter().map(|s| s.cpu.usage_percent as f64).sum::<f64>() / count;
        let peak_cpu = samples
            .iter()
            .map(|s| s.cpu.usage_percent as f64)
            .fold(0.0, f64::max);
        let avg_memory = samples
            .iter()
            .map(|s| s.memory.used_percent as f64)
            .sum::<f64>()
            / count;
        let peak_memory = samples
            .iter()
            .map(|s| s.memory.used_percent as f64)
            .fold(0.0, f64::max);

        report.extra.insert(
            "resource_summary".to_string(),
            json!({
                "samples": samples.len(),
                "avg_cpu_percent": avg_cpu,
                "peak_cpu_percent": peak_cpu,
                "avg_memory_percent": avg_memory,
                "peak_memory_percent": peak_memory,
                "avg_response_ms": report.response_times.avg_ms(),
                "peak_response_ms": report.response_times.max_ms,
                "probe_errors": probes.failed,
                "uptime_secs": report.duration_secs(),
            }),
        );

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stampede_core::health::Severity;
    use stampede_core::StopController;
    use stampede_http::MockPlatform;
    use std::time::Duration;

    fn monitor(api: Arc<dyn PlatformApi>) -> ResourceHealthMonitor {
        let mut config = MonitorConfig::default();
        config.interval = Duration::from_secs(1);
        ResourceHealthMonitor::new(config, api)
    }

    #[tokio::test(start_paused = true)]
    async fn test_monitor_samples_on_every_tick() {
        let api = Arc::new(MockPlatform::new());
        let mut monitor = monitor(api);

        let controller = StopController::new();
        let signal = controller.subscribe();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(3_500)).await;
            controller.signal();
        });

        let report = monitor.run(signal).await.unwrap();

        assert!(report.completed);
        // First tick fires immediately, then once per second
        assert!(report.samples.len() >= 3);
        assert_eq!(report.totals.total as usize, report.samples.len());
        assert!(report.alerts.is_empty() || !report.samples.is_empty());

        let summary = &report.extra["resource_summary"];
        assert!(
            summary["peak_memory_percent"].as_f64().unwrap()
                >= summary["avg_memory_percent"].as_f64().unwrap()
        );
        assert!(
            summary["peak_cpu_percent"].as_f64().unwrap()
                >= summary["avg_cpu_percent"].as_f64().unwrap()
        );
        assert!(summary["avg_response_ms"].is_number());
        assert!(summary.get("peak_response_ms").is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_failing_probes_raise_critical_alerts() {
        let api = Arc::new(MockPlatform::new().with_failing_health());
        let mut monitor = monitor(api);

        let controller = StopController::new();
        let signal = controller.subscribe();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(2_500)).await;
            controller.signal();
        });

        let report = monitor.run(signal).await.unwrap();

        assert!(report.completed);
        assert!(report
            .alerts
            .iter()
            .any(|a| a.severity == Severity::Critical));
        assert!(report
            .recommendations
            .iter()
            .any(|r| r.category == "stability"));
        assert_eq!(report.totals.failed, report.totals.total);
        assert!(report.totals.failed > 0);

        // Probes that never completed carry no round-trip time and must
        // not appear as zero-ms samples
        assert_eq!(report.response_times.count, 0);
        assert_eq!(report.response_times.min_ms, None);
    }
}
