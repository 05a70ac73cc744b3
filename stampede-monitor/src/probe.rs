//! Application health probe

use stampede_core::health::{ApiProbe, HealthStatus};
use stampede_http::PlatformApi;
use std::time::Instant;

/// Probe the health endpoint and classify the result.
///
/// 2xx under the response-time threshold is healthy; a slow or non-2xx
/// answer is degraded; a transport failure or 5xx is an error.
pub async fn probe_health(api: &dyn PlatformApi, slow_after_ms: u64) -> ApiProbe {
    let started = Instant::now();
    let result = api.health().await;
    let elapsed = started.elapsed().as_millis() as u64;

    match result {
        Ok(response) if response.ok() => {
            let status = if elapsed > slow_after_ms {
                HealthStatus::Degraded
            } else {
                HealthStatus::Healthy
            };
            ApiProbe {
                status,
                response_time_ms: Some(elapsed),
                http_status: Some(response.status),
            }
        }

        Ok(response) if response.status >= 500 => ApiProbe {
            status: HealthStatus::Error,
            response_time_ms: Some(elapsed),
            http_status: Some(response.status),
        },

        Ok(response) => ApiProbe {
            status: HealthStatus::Degraded,
            response_time_ms: Some(elapsed),
            http_status: Some(response.status),
        },

        // A timed-out probe still measured a round trip; a refused
        // connection never had one
        Err(error) => ApiProbe {
            status: HealthStatus::Error,
            response_time_ms: error.is_timeout().then_some(elapsed),
            http_status: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stampede_http::MockPlatform;

    #[tokio::test]
    async fn test_fast_ok_probe_is_healthy() {
        let mock = MockPlatform::new();
        let probe = probe_health(&mock, 2000).await;
        assert_eq!(probe.status, HealthStatus::Healthy);
        assert_eq!(probe.http_status, Some(200));
    }

    #[tokio::test]
    async fn test_transport_failure_is_error() {
        let mock = MockPlatform::new().with_failing_health();
        let probe = probe_health(&mock, 2000).await;
        assert_eq!(probe.status, HealthStatus::Error);
        assert_eq!(probe.response_time_ms, None);
    }

    #[tokio::test]
    async fn test_timed_out_probe_keeps_its_round_trip() {
        let mock =
            MockPlatform::new().with_health_timeout(std::time::Duration::from_millis(30));
        let probe = probe_health(&mock, 2000).await;
        assert_eq!(probe.status, HealthStatus::Error);
        assert!(probe.response_time_ms.unwrap() >= 30);
        assert_eq!(probe.http_status, None);
    }

    #[tokio::test]
    async fn test_slow_ok_probe_is_degraded() {
        let mock = MockPlatform::new().with_latency(std::time::Duration::from_millis(20));
        // Threshold of zero classifies any measurable round-trip as slow
        let probe = probe_health(&mock, 0).await;
        assert_eq!(probe.status, HealthStatus::Degraded);
    }
}
