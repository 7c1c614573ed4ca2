//! CLI definition using clap.
//!
//! Run inputs come from the environment; the command line only carries
//! process-level switches.

use clap::Parser;
use std::path::PathBuf;

/// envsweep - delete stale, stopped Gitpod environments
///
/// Reads GITPOD_TOKEN, ORGANIZATION_ID, OLDER_THAN_DAYS and PRINT_SUMMARY from
/// the environment (or their INPUT_-prefixed GitHub Actions form).
#[derive(Parser, Debug)]
#[command(name = "envsweep")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional settings file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}
