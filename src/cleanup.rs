//! One cleanup run: validate inputs, list, delete, report.
//!
//! Input validation happens before the API client is even built, so a bad
//! input never reaches the network. Listing failures abort the run; delete
//! failures only skip the affected environment.

use chrono::{DateTime, Utc};
use log::{error, info, warn};

use crate::api::{ApiError, EnvironmentApi};
use crate::config::{CleanupConfig, InputSource, Settings};
use crate::deleter::Deleter;
use crate::domain::{DeletionReport, RunOutcome};
use crate::error::Result;
use crate::lister::Lister;
use crate::report::SummaryReport;
use crate::sink::OutputSink;

pub const OUTPUT_SUCCESS: &str = "success";
pub const OUTPUT_DELETED_COUNT: &str = "deleted_count";
pub const OUTPUT_AVG_DAYS_INACTIVE: &str = "avg_days_inactive";

/// List stale environments and delete them
pub async fn sweep(
    api: &dyn EnvironmentApi,
    config: &CleanupConfig,
    settings: &Settings,
    now: DateTime<Utc>,
) -> std::result::Result<DeletionReport, ApiError> {
    let policy = settings.eligibility_policy(config.older_than_days);
    let retry = settings.retry_policy();

    let candidates = Lister::new(api, &policy, &retry)
        .remote_runners_only(settings.eligibility.remote_runners_only)
        .collect(&config.organization_id, now)
        .await?;

    info!(
        "Found {} environments inactive for more than {} days to delete",
        candidates.len(),
        config.older_than_days
    );

    let report = Deleter::new(api, &retry)
        .delete_all(candidates, &config.organization_id)
        .await;

    if !report.failed.is_empty() {
        info!(
            "{} of {} environments could not be deleted",
            report.failed.len(),
            report.attempted()
        );
    }
    Ok(report)
}

/// Run a full cleanup and publish its outputs.
///
/// `connect` builds the API client once the inputs are known to be valid.
/// The returned error covers only failures to publish the outputs; a failed
/// run is an `Ok` outcome with `success == false`.
pub async fn run<A, C>(
    inputs: &dyn InputSource,
    settings: &Settings,
    sink: &mut dyn OutputSink,
    connect: C,
    now: DateTime<Utc>,
) -> Result<RunOutcome>
where
    A: EnvironmentApi,
    C: FnOnce(&CleanupConfig) -> std::result::Result<A, ApiError>,
{
    let (outcome, print_summary) = match execute(inputs, settings, connect, now).await {
        Ok((config, report)) => (RunOutcome::completed(report), config.print_summary),
        Err(e) => {
            error!("{}", e);
            (RunOutcome::failed(e.to_string()), false)
        }
    };

    publish(&outcome, sink)?;

    // Deletions already happened; a lost summary must not fail the run
    if print_summary {
        if let Some(report) = SummaryReport::new(&outcome.report.deleted) {
            if let Err(e) = sink.write_summary(&report.to_markdown()) {
                warn!("Failed to write run summary: {}", e);
            }
        }
    }

    if outcome.success {
        info!("Successfully deleted {} environments", outcome.deleted_count());
    }
    Ok(outcome)
}

async fn execute<A, C>(
    inputs: &dyn InputSource,
    settings: &Settings,
    connect: C,
    now: DateTime<Utc>,
) -> Result<(CleanupConfig, DeletionReport)>
where
    A: EnvironmentApi,
    C: FnOnce(&CleanupConfig) -> std::result::Result<A, ApiError>,
{
    let config = CleanupConfig::from_inputs(inputs)?;
    log::debug!("Running with {:?}", config);

    let api = connect(&config)?;
    let report = sweep(&api, &config, settings, now).await?;
    Ok((config, report))
}

/// Emit the named outputs for `outcome`
pub fn publish(outcome: &RunOutcome, sink: &mut dyn OutputSink) -> Result<()> {
    sink.set_output(OUTPUT_SUCCESS, if outcome.success { "true" } else { "false" })?;
    sink.set_output(OUTPUT_DELETED_COUNT, &outcome.deleted_count().to_string())?;
    sink.set_output(OUTPUT_AVG_DAYS_INACTIVE, &format!("{:.1}", outcome.avg_days_inactive()))?;
    Ok(())
}
