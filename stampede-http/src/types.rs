//! Platform API surface

use crate::errors::ApiError;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// A completed API exchange
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: u16,
    pub body: JsonValue,
}

impl ApiResponse {
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Payload for the submission-creation endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionRequest {
    pub problem_id: i64,
    pub language: String,
    pub source: String,
}

/// The client-side view of the platform under test.
///
/// Write access is limited to submission creation; everything else is
/// read-only. Lifecycle-control endpoints are deliberately absent.
#[async_trait::async_trait]
pub trait PlatformApi: Send + Sync {
    /// Lightweight health probe
    async fn health(&self) -> Result<ApiResponse, ApiError>;

    /// Validate a bearer token / established session
    async fn auth_status(&self, token: &str) -> Result<ApiResponse, ApiError>;

    /// Create a submission
    async fn create_submission(
        &self,
        token: &str,
        request: &SubmissionRequest,
    ) -> Result<ApiResponse, ApiError>;

    /// Current leaderboard
    async fn leaderboard(&self, token: &str) -> Result<ApiResponse, ApiError>;

    /// One problem's detail view
    async fn problem(&self, token: &str, problem_id: i64) -> Result<ApiResponse, ApiError>;

    /// A team's submission list
    async fn submissions(&self, token: &str, team_id: i64) -> Result<ApiResponse, ApiError>;
}
