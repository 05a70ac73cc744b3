//! reqwest-backed platform client

use crate::errors::ApiError;
use crate::types::{ApiResponse, PlatformApi, SubmissionRequest};
use reqwest::{Client, RequestBuilder};
use serde_json::Value as JsonValue;
use stampede_config::TargetConfig;
use tracing::debug;

/// HTTP client bound to one target platform deployment.
///
/// Read-style calls use the configured request timeout; submission
/// creation uses the longer submission timeout since the judge pipeline
/// may be slow to acknowledge under load.
#[derive(Debug, Clone)]
pub struct PlatformClient {
    base_url: String,
    client: Client,
    submission_client: Client,
    request_timeout_ms: u64,
    submission_timeout_ms: u64,
}

impl PlatformClient {
    pub fn new(config: &TargetConfig) -> Result<Self, ApiError> {
        url::Url::parse(&config.api_url)
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", config.api_url, e)))?;

        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(&config.user_agent)
            .build()?;

        let submission_client = Client::builder()
            .timeout(config.submission_timeout)
            .user_agent(&config.user_agent)
            .build()?;

        debug!(
            api_url = %config.api_url,
            request_timeout_s = config.request_timeout.as_secs(),
            submission_timeout_s = config.submission_timeout.as_secs(),
            "platform client created"
        );

        Ok(Self {
            base_url: config.api_url.trim_end_matches('/').to_string(),
            client,
            submission_client,
            request_timeout_ms: config.request_timeout.as_millis() as u64,
            submission_timeout_ms: config.submission_timeout.as_millis() as u64,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn execute(
        &self,
        request: RequestBuilder,
        timeout_ms: u64,
    ) -> Result<ApiResponse, ApiError> {
        let response = request.send().await.map_err(|error| {
            if error.is_timeout() {
                ApiError::Timeout(timeout_ms)
            } else {
                ApiError::Network(error)
            }
        })?;
        let status = response.status().as_u16();

        // Non-JSON bodies degrade to a JSON string rather than an error;
        // callers only care about status plus whatever fields parse
        let body = match response.json::<JsonValue>().await {
            Ok(json) => json,
            Err(_) => JsonValue::Null,
        };

        Ok(ApiResponse { status, body })
    }
}

#[async_trait::async_trait]
impl PlatformApi for PlatformClient {
    async fn health(&self) -> Result<ApiResponse, ApiError> {
        self.execute(self.client.get(self.url("/health")), self.request_timeout_ms)
            .await
    }

    async fn auth_status(&self, token: &str) -> Result<ApiResponse, ApiError> {
        let response = self
            .execute(
                self.client.get(self.url("/auth/me")).bearer_auth(token),
                self.request_timeout_ms,
            )
            .await?;

        if response.status == 401 || response.status == 403 {
            return Err(ApiError::AuthRejected(response.status));
        }

        Ok(response)
    }

    async fn create_submission(
        &self,
        token: &str,
        request: &SubmissionRequest,
    ) -> Result<ApiResponse, ApiError> {
        self.execute(
            self.submission_client
                .post(self.url("/submissions"))
                .bearer_auth(token)
                .json(request),
            self.submission_timeout_ms,
        )
        .await
    }

    async fn leaderboard(&self, token: &str) -> Result<ApiResponse, ApiError> {
        self.execute(
            self.client.get(self.url("/leaderboard")).bearer_auth(token),
            self.request_timeout_ms,
        )
        .await
    }

    async fn problem(&self, token: &str, problem_id: i64) -> Result<ApiResponse, ApiError> {
        self.execute(
            self.client
                .get(self.url(&format!("/problems/{}", problem_id)))
                .bearer_auth(token),
            self.request_timeout_ms,
        )
        .await
    }

    async fn submissions(&self, token: &str, team_id: i64) -> Result<ApiResponse, ApiError> {
        self.execute(
            self.client
                .get(self.url("/submissions"))
                .query(&[("teamId", team_id)])
                .bearer_auth(token),
            self.request_timeout_ms,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_base_url_rejected() {
        let mut config = TargetConfig::default();
        config.api_url = "not a url".to_string();
        assert!(matches!(
            PlatformClient::new(&config),
            Err(ApiError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_url_joining_strips_trailing_slash() {
        let mut config = TargetConfig::default();
        config.api_url = "http://localhost:3000/api/".to_string();
        let client = PlatformClient::new(&config).unwrap();
        assert_eq!(client.url("/health"), "http://localhost:3000/api/health");
    }
}
