//! Deletion candidates.

use chrono::{DateTime, Utc};

use crate::api::Environment;
use crate::eligibility::inactive_days;

/// Placeholder for missing display values
pub const NOT_AVAILABLE: &str = "N/A";

/// An eligible environment, projected to what deletion and reporting need.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub id: String,
    pub project_url: String,
    pub last_started: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
    pub creator: String,
    pub inactive_days: u64,
}

impl Candidate {
    /// Project `env`, measuring inactivity from `reference`
    pub fn from_environment(env: &Environment, reference: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        Self {
            id: env.id.clone(),
            project_url: env.project_url().unwrap_or(NOT_AVAILABLE).to_string(),
            last_started: env.metadata.last_started_at,
            created_at: env.metadata.created_at,
            creator: env.creator_id().unwrap_or(NOT_AVAILABLE).to_string(),
            inactive_days: inactive_days(reference, now),
        }
    }
}
