//! Walks ListEnvironments to completion and collects deletion candidates.
//!
//! Pagination is a small state machine: `Start` requests the first page, each
//! response either moves to `Next(token)` or, when the server omits the
//! token, to `Exhausted`.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use log::{debug, error, info, warn};

use crate::api::{
    ApiError, Environment, EnvironmentApi, EnvironmentFilter, ListEnvironmentsRequest, ListEnvironmentsResponse,
    PaginationRequest, RunnerKind,
};
use crate::domain::Candidate;
use crate::eligibility::EligibilityPolicy;
use crate::retry::RetryPolicy;

pub const PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageCursor {
    Start,
    Next(String),
    Exhausted,
}

impl PageCursor {
    /// Cursor following a response carrying `next_token`
    pub fn after(next_token: Option<String>) -> Self {
        match next_token {
            Some(token) if !token.is_empty() => PageCursor::Next(token),
            _ => PageCursor::Exhausted,
        }
    }

    pub fn token(&self) -> Option<&str> {
        match self {
            PageCursor::Next(token) => Some(token),
            PageCursor::Start | PageCursor::Exhausted => None,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self, PageCursor::Exhausted)
    }
}

pub struct Lister<'a> {
    api: &'a dyn EnvironmentApi,
    policy: &'a EligibilityPolicy,
    retry: &'a RetryPolicy,
    remote_runners_only: bool,
}

impl<'a> Lister<'a> {
    pub fn new(api: &'a dyn EnvironmentApi, policy: &'a EligibilityPolicy, retry: &'a RetryPolicy) -> Self {
        Self {
            api,
            policy,
            retry,
            remote_runners_only: false,
        }
    }

    /// Only keep environments hosted on remote runners
    pub fn remote_runners_only(mut self, enabled: bool) -> Self {
        self.remote_runners_only = enabled;
        self
    }

    /// Every eligible environment of `organization_id`, in first-seen order
    pub async fn collect(&self, organization_id: &str, now: DateTime<Utc>) -> Result<Vec<Candidate>, ApiError> {
        let result = self.walk(organization_id, now).await;
        if let Err(e) = &result {
            error!("Error listing environments: {}", e);
        }
        result
    }

    async fn walk(&self, organization_id: &str, now: DateTime<Utc>) -> Result<Vec<Candidate>, ApiError> {
        let mut candidates = Vec::new();
        let mut seen = HashSet::new();
        let mut cursor = PageCursor::Start;
        let mut pages = 0usize;

        while !cursor.is_exhausted() {
            let response = self.fetch_page(organization_id, &cursor).await?;
            pages += 1;
            debug!(
                "Fetched page {} with {} environments",
                pages,
                response.environments.len()
            );

            for env in &response.environments {
                if !seen.insert(env.id.clone()) {
                    debug!("Environment {} already seen, skipping", env.id);
                    continue;
                }
                if let Some(candidate) = self.consider(env, now).await {
                    candidates.push(candidate);
                }
            }

            let next = PageCursor::after(response.pagination.next_token);
            if next.token().is_some() && next.token() == cursor.token() {
                return Err(ApiError::InvalidResponse(format!(
                    "pagination cursor {:?} did not advance",
                    next.token()
                )));
            }
            cursor = next;
        }

        info!(
            "Scanned {} environments over {} pages, {} eligible for deletion",
            seen.len(),
            pages,
            candidates.len()
        );
        Ok(candidates)
    }

    fn request(&self, organization_id: &str, cursor: &PageCursor) -> ListEnvironmentsRequest {
        ListEnvironmentsRequest {
            organization_id: organization_id.to_string(),
            pagination: PaginationRequest {
                page_size: PAGE_SIZE,
                page_token: cursor.token().map(str::to_string),
            },
            filter: Some(EnvironmentFilter {
                status_phases: self.policy.phases.clone(),
            }),
        }
    }

    async fn fetch_page(&self, organization_id: &str, cursor: &PageCursor) -> Result<ListEnvironmentsResponse, ApiError> {
        let request = self.request(organization_id, cursor);
        let response = self
            .retry
            .run("ListEnvironments", || self.api.list_environments(&request))
            .await?;
        self.retry.pace().await;
        Ok(response)
    }

    async fn consider(&self, env: &Environment, now: DateTime<Utc>) -> Option<Candidate> {
        let verdict = self.policy.evaluate(env, now);
        if !verdict.is_eligible() {
            debug!("Keeping environment {}: {}", env.id, verdict);
            return None;
        }

        if self.remote_runners_only && !self.on_remote_runner(env).await {
            debug!("Keeping environment {}: not on a remote runner", env.id);
            return None;
        }

        let reference = self.policy.reference_time(env)?;
        let candidate = Candidate::from_environment(env, reference, now);
        debug!(
            "Environment {} inactive for {} days, marked for deletion",
            candidate.id, candidate.inactive_days
        );
        Some(candidate)
    }

    async fn on_remote_runner(&self, env: &Environment) -> bool {
        let Some(runner_id) = env.metadata.runner_id.as_deref() else {
            return false;
        };

        let result = self
            .retry
            .run("GetRunner", || self.api.get_runner_kind(runner_id))
            .await;
        self.retry.pace().await;

        match result {
            Ok(kind) => kind == RunnerKind::Remote,
            Err(e) => {
                warn!("Error getting runner {} for environment {}: {}", runner_id, env.id, e);
                false
            }
        }
    }
}
