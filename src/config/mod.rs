//! Configuration system for envsweep.
//!
//! Two layers:
//! 1. Run inputs (GITPOD_TOKEN, ORGANIZATION_ID, ...) from the environment
//! 2. Tuning settings (~/.config/envsweep/envsweep.yml or ./envsweep.yml)

pub use self::inputs::{
    CleanupConfig, DEFAULT_OLDER_THAN_DAYS, EnvInputs, GITPOD_TOKEN, InputSource, OLDER_THAN_DAYS, ORGANIZATION_ID,
    PRINT_SUMMARY,
};
pub use self::settings::{ApiSettings, EligibilitySettings, RetrySettings, Settings};

mod inputs;
mod settings;
