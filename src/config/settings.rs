//! Tuning settings (Layer 2).
//!
//! Loaded from YAML; every field has a default so an absent file, or a file
//! naming only a few keys, is fine.

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::api::gitpod::{DEFAULT_API_URL, GitpodConfig};
use crate::api::EnvironmentPhase;
use crate::eligibility::{EligibilityPolicy, ReferenceTimestamp};
use crate::retry::RetryPolicy;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Gitpod API connection.
    pub api: ApiSettings,

    /// Backoff and pacing of API calls.
    pub retry: RetrySettings,

    /// What counts as stale.
    pub eligibility: EligibilitySettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    pub base_url: String,
    pub timeout_ms: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout_ms: 30_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    pub base_delay_ms: u64,
    pub max_retries: u32,
    pub call_delay_ms: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            base_delay_ms: 2000,
            max_retries: 3,
            call_delay_ms: 2000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EligibilitySettings {
    pub reference: ReferenceTimestamp,
    pub phases: Vec<EnvironmentPhase>,
    pub remote_runners_only: bool,
}

impl Default for EligibilitySettings {
    fn default() -> Self {
        Self {
            reference: ReferenceTimestamp::LastStarted,
            phases: vec![EnvironmentPhase::Stopped],
            remote_runners_only: false,
        }
    }
}

impl Settings {
    /// Load settings with fallback chain.
    ///
    /// Search order:
    /// 1. Explicit path if provided
    /// 2. ~/.config/envsweep/envsweep.yml
    /// 3. ./envsweep.yml
    /// 4. Defaults
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        let project_name = env!("CARGO_PKG_NAME");

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join(project_name).join(format!("{}.yml", project_name));
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(settings) => return Ok(settings),
                    Err(e) => {
                        log::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        let local_config = PathBuf::from(format!("{}.yml", project_name));
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(settings) => return Ok(settings),
                Err(e) => {
                    log::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        log::debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;
        let settings: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;
        settings.validate()?;

        log::info!("Loaded config from: {}", path.as_ref().display());
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        if self.api.base_url.trim().is_empty() {
            eyre::bail!("api.base_url must not be empty");
        }
        if self.eligibility.phases.is_empty() {
            eyre::bail!("eligibility.phases must name at least one phase");
        }
        Ok(())
    }

    pub fn client_config(&self) -> GitpodConfig {
        GitpodConfig {
            base_url: self.api.base_url.clone(),
            timeout: Duration::from_millis(self.api.timeout_ms),
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            Duration::from_millis(self.retry.base_delay_ms),
            self.retry.max_retries,
            Duration::from_millis(self.retry.call_delay_ms),
        )
    }

    pub fn eligibility_policy(&self, older_than_days: u32) -> EligibilityPolicy {
        EligibilityPolicy::new(older_than_days)
            .with_reference(self.eligibility.reference)
            .with_phases(self.eligibility.phases.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.api.base_url, DEFAULT_API_URL);
        assert_eq!(settings.retry_policy(), RetryPolicy::default());
        assert_eq!(settings.eligibility.phases, vec![EnvironmentPhase::Stopped]);
        assert!(!settings.eligibility.remote_runners_only);
    }

    #[test]
    fn test_partial_yaml() {
        let settings: Settings = serde_yaml::from_str(
            r#"
retry:
  max_retries: 5
eligibility:
  reference: created
  phases: [stopped, unspecified]
"#,
        )
        .unwrap();

        assert_eq!(settings.retry.max_retries, 5);
        assert_eq!(settings.retry.base_delay_ms, 2000);
        assert_eq!(settings.api.timeout_ms, 30_000);

        let policy = settings.eligibility_policy(7);
        assert_eq!(policy.older_than_days, 7);
        assert_eq!(policy.reference, ReferenceTimestamp::Created);
        assert_eq!(
            policy.phases,
            vec![EnvironmentPhase::Stopped, EnvironmentPhase::Unspecified]
        );
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "api:\n  base_url: http://localhost:3000/api\n  timeout_ms: 500").unwrap();

        let settings = Settings::load(Some(&file.path().to_path_buf())).unwrap();
        let client = settings.client_config();
        assert_eq!(client.base_url, "http://localhost:3000/api");
        assert_eq!(client.timeout, Duration::from_millis(500));
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let path = PathBuf::from("/nonexistent/envsweep.yml");
        assert!(Settings::load(Some(&path)).is_err());
    }

    #[test]
    fn test_empty_phases_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "eligibility:\n  phases: []").unwrap();
        assert!(Settings::load_from_file(file.path()).is_err());
    }

    #[test]
    fn test_retry_policy_from_settings() {
        let settings = Settings {
            retry: RetrySettings {
                base_delay_ms: 0,
                max_retries: 1,
                call_delay_ms: 0,
            },
            ..Default::default()
        };
        assert_eq!(settings.retry_policy(), RetryPolicy::immediate(1));
    }
}
