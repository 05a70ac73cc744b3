//! Scriptable in-process platform stand-in
//!
//! Lets generators run against a platform that is not there: every
//! endpoint answers locally after an optional simulated latency, and
//! failure modes can be switched on per endpoint family.

use crate::errors::ApiError;
use crate::types::{ApiResponse, PlatformApi, SubmissionRequest};
use serde_json::json;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// In-process mock of the platform API
#[derive(Debug, Default)]
pub struct MockPlatform {
    latency: Option<Duration>,
    health_timeout: Option<Duration>,
    fail_health: bool,
    fail_submissions: bool,
    rejected_token: Option<String>,
    verdict: Option<String>,

    pub submissions_created: AtomicU64,
    pub health_probes: AtomicU64,
    pub auth_checks: AtomicU64,
    pub reads: AtomicU64,
}

impl MockPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate per-call latency
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// All health probes return a network error
    pub fn with_failing_health(mut self) -> Self {
        self.fail_health = true;
        self
    }

    /// All health probes hang for the given duration, then time out
    pub fn with_health_timeout(mut self, timeout: Duration) -> Self {
        self.health_timeout = Some(timeout);
        self
    }

    /// All submission creations return HTTP 500
    pub fn with_failing_submissions(mut self) -> Self {
        self.fail_submissions = true;
        self
    }

    /// The given token fails authentication
    pub fn with_rejected_token(mut self, token: impl Into<String>) -> Self {
        self.rejected_token = Some(token.into());
        self
    }

    /// Verdict attached to every accepted submission (default "accepted")
    pub fn with_verdict(mut self, verdict: impl Into<String>) -> Self {
        self.verdict = Some(verdict.into());
        self
    }

    async fn pause(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }
}

#[async_trait::async_trait]
impl PlatformApi for MockPlatform {
    async fn health(&self) -> Result<ApiResponse, ApiError> {
        self.health_probes.fetch_add(1, Ordering::Relaxed);
        self.pause().await;

        if let Some(timeout) = self.health_timeout {
            tokio::time::sleep(timeout).await;
            return Err(ApiError::Timeout(timeout.as_millis() as u64));
        }

        if self.fail_health {
            return Err(ApiError::MockRefused("health endpoint down".into()));
        }

        Ok(ApiResponse {
            status: 200,
            body: json!({"status": "ok"}),
        })
    }

    async fn auth_status(&self, token: &str) -> Result<ApiResponse, ApiError> {
        self.auth_checks.fetch_add(1, Ordering::Relaxed);
        self.pause().await;

        if self.rejected_token.as_deref() == Some(token) {
            return Err(ApiError::AuthRejected(401));
        }

        Ok(ApiResponse {
            status: 200,
            body: json!({"authenticated": true}),
        })
    }

    async fn create_submission(
        &self,
        _token: &str,
        request: &SubmissionRequest,
    ) -> Result<ApiResponse, ApiError> {
        self.pause().await;

        if self.fail_submissions {
            return Ok(ApiResponse {
                status: 500,
                body: json!({"error": "judge unavailable"}),
            });
        }

        let id = self.submissions_created.fetch_add(1, Ordering::Relaxed) + 1;
        Ok(ApiResponse {
            status: 201,
            body: json!({
                "id": id,
                "problemId": request.problem_id,
                "language": request.language,
                "verdict": self.verdict.as_deref().unwrap_or("accepted"),
            }),
        })
    }

    async fn leaderboard(&self, _token: &str) -> Result<ApiResponse, ApiError> {
        self.reads.fetch_add(1, Ordering::Relaxed);
        self.pause().await;
        Ok(ApiResponse {
            status: 200,
            body: json!({"rows": []}),
        })
    }

    async fn problem(&self, _token: &str, problem_id: i64) -> Result<ApiResponse, ApiError> {
        self.reads.fetch_add(1, Ordering::Relaxed);
        self.pause().await;
        Ok(ApiResponse {
            status: 200,
            body: json!({"id": problem_id, "title": "mock problem"}),
        })
    }

    async fn submissions(&self, _token: &str, team_id: i64) -> Result<ApiResponse, ApiError> {
        self.reads.fetch_add(1, Ordering::Relaxed);
        self.pause().await;
        Ok(ApiResponse {
            status: 200,
            body: json!({"teamId": team_id, "submissions": []}),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_counts_submissions() {
        let mock = MockPlatform::new();
        let request = SubmissionRequest {
            problem_id: 1,
            language: "rust".into(),
            source: "fn main() {}".into(),
        };

        let first = mock.create_submission("tok", &request).await.unwrap();
        let second = mock.create_submission("tok", &request).await.unwrap();

        assert!(first.ok());
        assert_eq!(second.body["id"], 2);
        assert_eq!(mock.submissions_created.load(Ordering::Relaxed), 2);
    }

    #[tokio::test]
    async fn test_mock_auth_rejection() {
        let mock = MockPlatform::new().with_rejected_token("bad");
        assert!(mock.auth_status("good").await.is_ok());
        assert!(matches!(
            mock.auth_status("bad").await,
            Err(ApiError::AuthRejected(401))
        ));
    }

    #[tokio::test]
    async fn test_failing_submissions_report_status() {
        let mock = MockPlatform::new().with_failing_submissions();
        let request = SubmissionRequest {
            problem_id: 1,
            language: "rust".into(),
            source: String::new(),
        };
        let response = mock.create_submission("tok", &request).await.unwrap();
        assert!(!response.ok());
    }
}
