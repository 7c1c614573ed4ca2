//! Which environments may be deleted.
//!
//! An environment is eligible when its phase is in the accepted set, it has no
//! uncommitted or unpushed git work, and its reference timestamp lies strictly
//! before `now - older_than_days`.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::api::{Environment, EnvironmentPhase};

const MS_PER_DAY: u64 = 24 * 60 * 60 * 1000;

/// Timestamp the age check is measured from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceTimestamp {
    /// Last start, or creation time for environments that never started
    #[default]
    LastStarted,
    Created,
}

/// Result of evaluating one environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Eligible,
    WrongPhase(EnvironmentPhase),
    ChangedFiles(u32),
    UnpushedCommits(u32),
    TooRecent(DateTime<Utc>),
    NoTimestamp,
}

impl Verdict {
    pub fn is_eligible(&self) -> bool {
        matches!(self, Verdict::Eligible)
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verdict::Eligible => write!(f, "eligible"),
            Verdict::WrongPhase(phase) => write!(f, "phase is {}", phase),
            Verdict::ChangedFiles(n) => write!(f, "{} changed files", n),
            Verdict::UnpushedCommits(n) => write!(f, "{} unpushed commits", n),
            Verdict::TooRecent(at) => write!(f, "active at {}", at.to_rfc3339()),
            Verdict::NoTimestamp => write!(f, "no reference timestamp"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EligibilityPolicy {
    pub older_than_days: u32,
    pub reference: ReferenceTimestamp,
    pub phases: Vec<EnvironmentPhase>,
}

impl EligibilityPolicy {
    /// Stopped environments, aged from their last start
    pub fn new(older_than_days: u32) -> Self {
        Self {
            older_than_days,
            reference: ReferenceTimestamp::default(),
            phases: vec![EnvironmentPhase::Stopped],
        }
    }

    pub fn with_reference(mut self, reference: ReferenceTimestamp) -> Self {
        self.reference = reference;
        self
    }

    pub fn with_phases(mut self, phases: Vec<EnvironmentPhase>) -> Self {
        self.phases = phases;
        self
    }

    /// Latest reference time that still counts as stale; None when the
    /// threshold reaches past the representable date range
    pub fn cutoff(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        TimeDelta::try_days(i64::from(self.older_than_days)).and_then(|age| now.checked_sub_signed(age))
    }

    pub fn reference_time(&self, env: &Environment) -> Option<DateTime<Utc>> {
        match self.reference {
            ReferenceTimestamp::LastStarted => env.metadata.last_started_at.or(env.metadata.created_at),
            ReferenceTimestamp::Created => env.metadata.created_at,
        }
    }

    pub fn evaluate(&self, env: &Environment, now: DateTime<Utc>) -> Verdict {
        if !self.phases.contains(&env.phase()) {
            return Verdict::WrongPhase(env.phase());
        }

        let changed = env.changed_files();
        if changed > 0 {
            return Verdict::ChangedFiles(changed);
        }

        let unpushed = env.unpushed_commits();
        if unpushed > 0 {
            return Verdict::UnpushedCommits(unpushed);
        }

        match (self.reference_time(env), self.cutoff(now)) {
            (None, _) => Verdict::NoTimestamp,
            (Some(at), Some(cutoff)) if at < cutoff => Verdict::Eligible,
            (Some(at), _) => Verdict::TooRecent(at),
        }
    }
}

/// Whole days between `since` and `now`, rounded up
pub fn inactive_days(since: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
    let ms = (now - since).num_milliseconds().unsigned_abs();
    ms.div_ceil(MS_PER_DAY)
}
