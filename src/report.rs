//! Markdown summary of a cleanup run.

use std::fmt::Write;

use chrono::{DateTime, Utc};

use crate::domain::{Candidate, InactivityStats, NOT_AVAILABLE};

pub const SUMMARY_HEADING: &str = "Environment Cleanup Summary";

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryReport<'a> {
    stats: InactivityStats,
    deleted: &'a [Candidate],
}

impl<'a> SummaryReport<'a> {
    /// None when nothing was deleted
    pub fn new(deleted: &'a [Candidate]) -> Option<Self> {
        let stats = InactivityStats::from_candidates(deleted)?;
        Some(Self { stats, deleted })
    }

    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "# {}\n", SUMMARY_HEADING);

        out.push_str("| Metric | Value |\n| --- | --- |\n");
        let _ = writeln!(out, "| Total Environments Cleaned | {} |", self.stats.count);
        let _ = writeln!(out, "| Average Days Inactive | {:.1} days |", self.stats.average_days);
        let _ = writeln!(out, "| Oldest Last Start | {} days ago |", self.stats.oldest_days);
        let _ = writeln!(out, "| Newest Last Start | {} days ago |", self.stats.newest_days);

        out.push_str("\n## Deleted Environments\n\n");
        out.push_str("| Environment ID | Project | Last Activity | Created | Creator | Days Inactive |\n");
        out.push_str("| --- | --- | --- | --- | --- | --- |\n");
        for env in self.deleted {
            let _ = writeln!(
                out,
                "| {} | {} | {} | {} | {} | {} days |",
                cell(&env.id),
                cell(&env.project_url),
                date(env.last_started),
                date(env.created_at),
                cell(&env.creator),
                env.inactive_days
            );
        }
        out
    }
}

fn date(at: Option<DateTime<Utc>>) -> String {
    at.map(|t| t.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

// Pipes and newlines would break the table row
fn cell(text: &str) -> String {
    text.replace('|', "\\|").replace(['\n', '\r'], " ")
}
