//! HTTP client for the contest platform under test
//!
//! All outbound API traffic goes through the [`PlatformApi`] trait so load
//! generators stay independent of the wire client. The real implementation
//! is [`client::PlatformClient`]; [`mock::MockPlatform`] provides a
//! scriptable in-process stand-in.

pub mod client;
pub mod errors;
pub mod mock;
pub mod types;

pub use client::PlatformClient;
pub use errors::ApiError;
pub use mock::MockPlatform;
pub use types::{ApiResponse, PlatformApi, SubmissionRequest};
