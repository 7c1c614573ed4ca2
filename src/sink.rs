//! Where run outputs and the summary go.
//!
//! Under GitHub Actions outputs are appended to the file named by
//! `GITHUB_OUTPUT` and the summary to `GITHUB_STEP_SUMMARY`. Without those,
//! both are printed to stdout.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{Result, SweepError};

const MULTILINE_DELIMITER: &str = "ENVSWEEP_EOF";

pub trait OutputSink {
    /// Publish a named output value
    fn set_output(&mut self, name: &str, value: &str) -> Result<()>;

    /// Publish the markdown run summary
    fn write_summary(&mut self, markdown: &str) -> Result<()>;
}

#[derive(Debug, Clone, Default)]
pub struct ActionsSink {
    output_path: Option<PathBuf>,
    summary_path: Option<PathBuf>,
}

impl ActionsSink {
    pub fn new(output_path: Option<PathBuf>, summary_path: Option<PathBuf>) -> Self {
        Self {
            output_path,
            summary_path,
        }
    }

    pub fn from_env() -> Self {
        let path = |var: &str| std::env::var_os(var).filter(|v| !v.is_empty()).map(PathBuf::from);
        Self::new(path("GITHUB_OUTPUT"), path("GITHUB_STEP_SUMMARY"))
    }

    fn append(path: &Path, text: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| SweepError::Output(format!("Failed to open {}: {}", path.display(), e)))?;
        file.write_all(text.as_bytes())
            .map_err(|e| SweepError::Output(format!("Failed to write {}: {}", path.display(), e)))
    }
}

/// `name=value`, or the heredoc form for values spanning lines
pub fn format_output(name: &str, value: &str) -> String {
    if value.contains('\n') || value.contains('\r') {
        format!("{name}<<{MULTILINE_DELIMITER}\n{value}\n{MULTILINE_DELIMITER}\n")
    } else {
        format!("{name}={value}\n")
    }
}

impl OutputSink for ActionsSink {
    fn set_output(&mut self, name: &str, value: &str) -> Result<()> {
        let line = format_output(name, value);
        match &self.output_path {
            Some(path) => Self::append(path, &line),
            None => {
                print!("{}", line);
                Ok(())
            }
        }
    }

    fn write_summary(&mut self, markdown: &str) -> Result<()> {
        match &self.summary_path {
            Some(path) => Self::append(path, markdown),
            None => {
                println!("{}", markdown);
                Ok(())
            }
        }
    }
}

/// Keeps everything in memory
#[cfg(any(test, feature = "test-util"))]
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    pub outputs: Vec<(String, String)>,
    pub summaries: Vec<String>,
}

#[cfg(any(test, feature = "test-util"))]
impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last value published under `name`
    pub fn output(&self, name: &str) -> Option<&str> {
        self.outputs
            .iter()
            .rev()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

#[cfg(any(test, feature = "test-util"))]
impl OutputSink for MemorySink {
    fn set_output(&mut self, name: &str, value: &str) -> Result<()> {
        self.outputs.push((name.to_string(), value.to_string()));
        Ok(())
    }

    fn write_summary(&mut self, markdown: &str) -> Result<()> {
        self.summaries.push(markdown.to_string());
        Ok(())
    }
}
