//! Domain types for a cleanup run.

pub mod candidate;
pub mod outcome;

pub use candidate::{Candidate, NOT_AVAILABLE};
pub use outcome::{DeletionReport, FailedDeletion, InactivityStats, RunOutcome};
