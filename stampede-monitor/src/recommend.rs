//! End-of-run recommendation rules
//!
//! Deterministic: the same samples and alerts always produce the same
//! recommendations, in the same order.

use stampede_core::health::{Alert, MetricSample, Priority, Recommendation, Severity};

pub fn recommendations(samples: &[MetricSample], alerts: &[Alert]) -> Vec<Recommendation> {
    let mut out = Vec::new();

    if samples.is_empty() {
        return out;
    }

    let count = samples.len() as f64;
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

    let response_times: Vec<u64> = samples
        .iter()
        .filter_map(|s| s.api.response_time_ms)
        .collect();
    let avg_response = if response_times.is_empty() {
        0.0
    } else {
        response_times.iter().sum::<u64>() as f64 / response_times.len() as f64
    };

    if avg_cpu > 70.0 {
        out.push(Recommendation {
            priority: Priority::High,
            category: "scaling".to_string(),
            message: format!(
                "average cpu {:.1}% over the run; add capacity or reduce per-node load",
                avg_cpu
            ),
        });
    }

    if peak_cpu > 90.0 {
        out.push(Recommendation {
            priority: Priority::Critical,
            category: "scaling".to_string(),
            message: format!("cpu peaked at {:.1}%; the host saturates under this load", peak_cpu),
        });
    }

    if avg_memory > 75.0 {
        out.push(Recommendation {
            priority: Priority::Medium,
            category: "memory".to_string(),
            message: format!(
                "average memory {:.1}%; check for leaks or oversized caches",
                avg_memory
            ),
        });
    }

    if avg_response > 1000.0 {
        out.push(Recommendation {
            priority: Priority::High,
            category: "performance".to_string(),
            message: format!(
                "average health-probe round-trip {:.0}ms; investigate slow paths",
                avg_response
            ),
        });
    }

    if alerts.iter().any(|a| a.severity == Severity::Critical) {
        out.push(Recommendation {
            priority: Priority::High,
            category: "stability".to_string(),
            message: "critical alerts fired during the run; review them before raising load"
                .to_string(),
        });
    }

    if out.is_empty() {
        out.push(Recommendation {
            priority: Priority::Low,
            category: "health".to_string(),
            message: "resources stayed within thresholds for the whole run".to_string(),
        });
    }

    out
}
