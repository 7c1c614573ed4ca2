//! envsweep - deletes stale Gitpod environments
//!
//! Lists an organization's environments, keeps those that are stopped, carry no
//! uncommitted or unpushed work and have been inactive past a threshold, and
//! deletes them one at a time.

pub mod api;
pub mod cleanup;
pub mod config;
pub mod deleter;
pub mod domain;
pub mod eligibility;
pub mod error;
pub mod lister;
pub mod logging;
pub mod report;
pub mod retry;
pub mod sink;

pub use error::{Result, SweepError};
