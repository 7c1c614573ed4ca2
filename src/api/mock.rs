//! Scripted in-memory EnvironmentApi
//!
//! Pages are keyed by the page token that requests them. Failures can be queued
//! ahead of list calls and per environment for delete calls. Every call is
//! recorded so tests can assert on what reached the "server".

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::api::types::{Environment, ListEnvironmentsRequest, ListEnvironmentsResponse, PaginationResponse, RunnerKind};
use crate::api::{ApiError, EnvironmentApi};

#[derive(Debug, Default)]
struct MockState {
    pages: HashMap<Option<String>, ListEnvironmentsResponse>,
    list_failures: VecDeque<ApiError>,
    delete_results: HashMap<String, VecDeque<Result<(), ApiError>>>,
    runners: HashMap<String, RunnerKind>,
    list_requests: Vec<ListEnvironmentsRequest>,
    delete_calls: Vec<String>,
    runner_calls: Vec<String>,
}

/// Cloneable handle; clones share the same script and call log
#[derive(Debug, Clone, Default)]
pub struct MockEnvironmentApi {
    state: Arc<Mutex<MockState>>,
}

impl MockEnvironmentApi {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Serve `environments` for requests carrying `token`, pointing at `next`
    pub fn with_page(self, token: Option<&str>, environments: Vec<Environment>, next: Option<&str>) -> Self {
        let response = ListEnvironmentsResponse {
            environments,
            pagination: PaginationResponse {
                next_token: next.map(str::to_string),
            },
        };
        self.state().pages.insert(token.map(str::to_string), response);
        self
    }

    /// Fail the next list call with `error`; queued failures are consumed in order
    pub fn with_list_error(self, error: ApiError) -> Self {
        self.state().list_failures.push_back(error);
        self
    }

    /// Script the outcomes of successive deletes of `environment_id`; once
    /// exhausted, further deletes succeed
    pub fn with_delete_results(self, environment_id: &str, results: Vec<Result<(), ApiError>>) -> Self {
        self.state()
            .delete_results
            .insert(environment_id.to_string(), results.into_iter().collect());
        self
    }

    pub fn with_runner(self, runner_id: &str, kind: RunnerKind) -> Self {
        self.state().runners.insert(runner_id.to_string(), kind);
        self
    }

    pub fn list_requests(&self) -> Vec<ListEnvironmentsRequest> {
        self.state().list_requests.clone()
    }

    pub fn delete_calls(&self) -> Vec<String> {
        self.state().delete_calls.clone()
    }

    pub fn runner_calls(&self) -> Vec<String> {
        self.state().runner_calls.clone()
    }

    /// Total number of calls of any kind
    pub fn call_count(&self) -> usize {
        let state = self.state();
        state.list_requests.len() + state.delete_calls.len() + state.runner_calls.len()
    }
}

#[async_trait]
impl EnvironmentApi for MockEnvironmentApi {
    async fn list_environments(&self, request: &ListEnvironmentsRequest) -> Result<ListEnvironmentsResponse, ApiError> {
        let mut state = self.state();
        state.list_requests.push(request.clone());

        if let Some(error) = state.list_failures.pop_front() {
            return Err(error);
        }

        state
            .pages
            .get(&request.pagination.page_token)
            .cloned()
            .ok_or_else(|| ApiError::Status {
                status: 400,
                message: format!("unknown page token {:?}", request.pagination.page_token),
            })
    }

    async fn delete_environment(&self, environment_id: &str, _organization_id: &str) -> Result<(), ApiError> {
        let mut state = self.state();
        state.delete_calls.push(environment_id.to_string());

        state
            .delete_results
            .get_mut(environment_id)
            .and_then(VecDeque::pop_front)
            .unwrap_or(Ok(()))
    }

    async fn get_runner_kind(&self, runner_id: &str) -> Result<RunnerKind, ApiError> {
        let mut state = self.state();
        state.runner_calls.push(runner_id.to_string());

        state.runners.get(runner_id).copied().ok_or_else(|| ApiError::Status {
            status: 404,
            message: format!("runner {} not found", runner_id),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::PaginationRequest;

    fn request(token: Option<&str>) -> ListEnvironmentsRequest {
        ListEnvironmentsRequest {
            organization_id: "org-1".to_string(),
            pagination: PaginationRequest {
                page_size: 100,
                page_token: token.map(str::to_string),
            },
            filter: None,
        }
    }

    #[tokio::test]
    async fn test_pages_keyed_by_token() {
        let mock = MockEnvironmentApi::new()
            .with_page(None, vec![Environment::default()], Some("p2"))
            .with_page(Some("p2"), vec![], None);

        let first = mock.list_environments(&request(None)).await.unwrap();
        assert_eq!(first.environments.len(), 1);
        assert_eq!(first.pagination.next_token.as_deref(), Some("p2"));

        let second = mock.list_environments(&request(Some("p2"))).await.unwrap();
        assert!(second.environments.is_empty());
        assert_eq!(mock.list_requests().len(), 2);
    }

    #[tokio::test]
    async fn test_queued_list_failure_consumed_once() {
        let mock = MockEnvironmentApi::new()
            .with_page(None, vec![], None)
            .with_list_error(ApiError::RateLimited);

        assert!(mock.list_environments(&request(None)).await.unwrap_err().is_rate_limit());
        assert!(mock.list_environments(&request(None)).await.is_ok());
    }

    #[tokio::test]
    async fn test_scripted_deletes_then_success() {
        let mock = MockEnvironmentApi::new().with_delete_results("env-1", vec![Err(ApiError::RateLimited)]);

        assert!(mock.delete_environment("env-1", "org-1").await.is_err());
        assert!(mock.delete_environment("env-1", "org-1").await.is_ok());
        assert!(mock.delete_environment("env-2", "org-1").await.is_ok());
        assert_eq!(mock.delete_calls(), vec!["env-1", "env-1", "env-2"]);
    }

    #[tokio::test]
    async fn test_clones_share_call_log() {
        let mock = MockEnvironmentApi::new().with_runner("r1", RunnerKind::Remote);
        let handle = mock.clone();

        assert_eq!(mock.get_runner_kind("r1").await.unwrap(), RunnerKind::Remote);
        assert!(mock.get_runner_kind("r2").await.is_err());
        assert_eq!(handle.runner_calls(), vec!["r1", "r2"]);
        assert_eq!(handle.call_count(), 2);
    }
}
