//! Run outcome types.
//!
//! This module defines the result types for a cleanup run.

use crate::domain::Candidate;

/// Candidate that could not be deleted, with the reason
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedDeletion {
    pub candidate: Candidate,
    pub error: String,
}

/// Result of the delete batch: successes and failures, both in list order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeletionReport {
    pub deleted: Vec<Candidate>,
    pub failed: Vec<FailedDeletion>,
}

impl DeletionReport {
    pub fn record_success(mut self, candidate: Candidate) -> Self {
        self.deleted.push(candidate);
        self
    }

    pub fn record_failure(mut self, candidate: Candidate, error: impl Into<String>) -> Self {
        self.failed.push(FailedDeletion {
            candidate,
            error: error.into(),
        });
        self
    }

    pub fn attempted(&self) -> usize {
        self.deleted.len() + self.failed.len()
    }
}

/// Aggregate inactivity over deleted environments
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InactivityStats {
    pub count: usize,
    pub average_days: f64,
    pub oldest_days: u64,
    pub newest_days: u64,
}

impl InactivityStats {
    /// None for an empty slice
    pub fn from_candidates(candidates: &[Candidate]) -> Option<Self> {
        let oldest_days = candidates.iter().map(|c| c.inactive_days).max()?;
        let newest_days = candidates.iter().map(|c| c.inactive_days).min()?;
        let total: u64 = candidates.iter().map(|c| c.inactive_days).sum();

        Some(Self {
            count: candidates.len(),
            average_days: total as f64 / candidates.len() as f64,
            oldest_days,
            newest_days,
        })
    }
}

/// Outcome of a whole run, as published to the CI runner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    pub success: bool,
    pub report: DeletionReport,
    /// Why the run aborted, for failed runs
    pub error: Option<String>,
}

impl RunOutcome {
    pub fn completed(report: DeletionReport) -> Self {
        Self {
            success: true,
            report,
            error: None,
        }
    }

    /// Aborted run; nothing counts as deleted
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            report: DeletionReport::default(),
            error: Some(error.into()),
        }
    }

    pub fn deleted_count(&self) -> usize {
        self.report.deleted.len()
    }

    /// Average inactive days of deleted environments, 0 when none were deleted
    pub fn avg_days_inactive(&self) -> f64 {
        InactivityStats::from_candidates(&self.report.deleted)
            .map(|s| s.average_days)
            .unwrap_or(0.0)
    }
}
