//! Gitpod API layer - environment listing, deletion and runner lookup
//!
//! This module provides:
//! - Wire types for the gitpod.v1 Connect/JSON endpoints
//! - EnvironmentApi trait for API abstraction
//! - GitpodClient implementation over reqwest
//! - MockEnvironmentApi, a scripted in-memory implementation for tests
//!   (unit tests, or the `test-util` feature)

pub mod gitpod;
#[cfg(any(test, feature = "test-util"))]
pub mod mock;
pub mod types;

use async_trait::async_trait;

pub use gitpod::{GitpodClient, GitpodConfig};
#[cfg(any(test, feature = "test-util"))]
pub use mock::MockEnvironmentApi;
pub use types::{
    Environment, EnvironmentFilter, EnvironmentPhase, ListEnvironmentsRequest, ListEnvironmentsResponse,
    PaginationRequest, RunnerKind,
};

/// The remote operations a cleanup run needs
#[async_trait]
pub trait EnvironmentApi: Send + Sync {
    /// Fetch one page of environments
    async fn list_environments(&self, request: &ListEnvironmentsRequest) -> Result<ListEnvironmentsResponse, ApiError>;

    /// Delete a single environment
    async fn delete_environment(&self, environment_id: &str, organization_id: &str) -> Result<(), ApiError>;

    /// Look up the kind of runner hosting environments
    async fn get_runner_kind(&self, runner_id: &str) -> Result<RunnerKind, ApiError>;
}

/// Errors that can occur talking to the Gitpod API
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Rate limited (HTTP 429)")]
    RateLimited,

    #[error("API error {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Client setup failed: {0}")]
    Client(String),
}

impl ApiError {
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, ApiError::RateLimited)
    }
}
