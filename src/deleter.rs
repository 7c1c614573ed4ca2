//! Deletes environments one at a time.

use log::{debug, warn};

use crate::api::{ApiError, EnvironmentApi};
use crate::domain::{Candidate, DeletionReport};
use crate::retry::RetryPolicy;

pub struct Deleter<'a> {
    api: &'a dyn EnvironmentApi,
    retry: &'a RetryPolicy,
}

impl<'a> Deleter<'a> {
    pub fn new(api: &'a dyn EnvironmentApi, retry: &'a RetryPolicy) -> Self {
        Self { api, retry }
    }

    /// Delete one environment, backing off on rate limits
    pub async fn delete(&self, environment_id: &str, organization_id: &str) -> Result<(), ApiError> {
        let result = self
            .retry
            .run("DeleteEnvironment", || {
                self.api.delete_environment(environment_id, organization_id)
            })
            .await;

        match result {
            Ok(()) => {
                debug!("Deleted environment {}", environment_id);
                self.retry.pace().await;
                Ok(())
            }
            Err(e) => {
                debug!("Delete of environment {} failed: {}", environment_id, e);
                Err(e)
            }
        }
    }

    /// Delete every candidate in order; failures are recorded and skipped
    pub async fn delete_all(&self, candidates: Vec<Candidate>, organization_id: &str) -> DeletionReport {
        let mut report = DeletionReport::default();
        for candidate in candidates {
            report = match self.delete(&candidate.id, organization_id).await {
                Ok(()) => report.record_success(candidate),
                Err(e) => {
                    warn!("Failed to delete environment {}: {}", candidate.id, e);
                    report.record_failure(candidate, e.to_string())
                }
            };
        }
        report
    }
}
