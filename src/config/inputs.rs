//! Run inputs (Layer 1).
//!
//! Read from the hosting environment through an `InputSource`. Under GitHub
//! Actions an input `NAME` arrives as `INPUT_NAME`; the bare name is accepted
//! too so the binary can run from cron or a shell.

use std::collections::HashMap;

use crate::error::{Result, SweepError};

pub const GITPOD_TOKEN: &str = "GITPOD_TOKEN";
pub const ORGANIZATION_ID: &str = "ORGANIZATION_ID";
pub const OLDER_THAN_DAYS: &str = "OLDER_THAN_DAYS";
pub const PRINT_SUMMARY: &str = "PRINT_SUMMARY";

pub const DEFAULT_OLDER_THAN_DAYS: u32 = 10;

/// Where run inputs come from
pub trait InputSource {
    /// Raw value of input `name`, if set
    fn get(&self, name: &str) -> Option<String>;
}

/// Process environment, `INPUT_<NAME>` first
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvInputs;

impl EnvInputs {
    fn action_key(name: &str) -> String {
        format!("INPUT_{}", name.replace(' ', "_").to_uppercase())
    }
}

impl InputSource for EnvInputs {
    fn get(&self, name: &str) -> Option<String> {
        std::env::var(Self::action_key(name))
            .ok()
            .filter(|v| !v.trim().is_empty())
            .or_else(|| std::env::var(name).ok())
    }
}

impl InputSource for HashMap<String, String> {
    fn get(&self, name: &str) -> Option<String> {
        HashMap::get(self, name).cloned()
    }
}

/// Validated inputs for one run
#[derive(Clone, PartialEq, Eq)]
pub struct CleanupConfig {
    pub token: String,
    pub organization_id: String,
    pub older_than_days: u32,
    pub print_summary: bool,
}

impl CleanupConfig {
    pub fn from_inputs(source: &dyn InputSource) -> Result<Self> {
        let token = required(source, GITPOD_TOKEN)?;
        let organization_id = required(source, ORGANIZATION_ID)?;

        let older_than_days = match optional(source, OLDER_THAN_DAYS) {
            Some(raw) => parse_days(&raw)?,
            None => DEFAULT_OLDER_THAN_DAYS,
        };

        let print_summary = match optional(source, PRINT_SUMMARY) {
            Some(raw) => parse_bool(PRINT_SUMMARY, &raw)?,
            None => false,
        };

        Ok(Self {
            token,
            organization_id,
            older_than_days,
            print_summary,
        })
    }
}

// The token stays out of logs
impl std::fmt::Debug for CleanupConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CleanupConfig")
            .field("organization_id", &self.organization_id)
            .field("older_than_days", &self.older_than_days)
            .field("print_summary", &self.print_summary)
            .finish_non_exhaustive()
    }
}

fn optional(source: &dyn InputSource, name: &str) -> Option<String> {
    source
        .get(name)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required(source: &dyn InputSource, name: &str) -> Result<String> {
    optional(source, name).ok_or_else(|| SweepError::MissingInput(name.to_string()))
}

fn parse_days(raw: &str) -> Result<u32> {
    let days: i64 = raw
        .parse()
        .map_err(|_| SweepError::invalid_input(OLDER_THAN_DAYS, format!("'{}' is not an integer", raw)))?;

    if days < 0 {
        return Err(SweepError::invalid_input(
            OLDER_THAN_DAYS,
            format!("must not be negative, got {}", days),
        ));
    }

    u32::try_from(days).map_err(|_| SweepError::invalid_input(OLDER_THAN_DAYS, format!("{} is too large", days)))
}

/// YAML 1.2 core schema booleans, as GitHub Actions accepts them
fn parse_bool(name: &str, raw: &str) -> Result<bool> {
    match raw {
        "true" | "True" | "TRUE" => Ok(true),
        "false" | "False" | "FALSE" => Ok(false),
        _ => Err(SweepError::invalid_input(
            name,
            format!("'{}' is not one of true|True|TRUE|false|False|FALSE", raw),
        )),
    }
}
