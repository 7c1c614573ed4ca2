//! Logging setup on top of env_logger.
//!
//! On a GitHub Actions runner records are written as workflow commands so
//! warnings and errors show up as annotations on the run.

use std::io::Write;

use log::Level;

/// Default filter: our crate at info, or debug when asked for
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose { "envsweep=debug" } else { "envsweep=info" }
}

/// Workflow command prefix for a log level
pub fn workflow_command(level: Level) -> &'static str {
    match level {
        Level::Error => "::error::",
        Level::Warn => "::warning::",
        Level::Info => "",
        Level::Debug | Level::Trace => "::debug::",
    }
}

/// Escape message data for a workflow command
pub fn escape_command_data(message: &str) -> String {
    message.replace('%', "%25").replace('\r', "%0D").replace('\n', "%0A")
}

fn on_actions_runner() -> bool {
    std::env::var("GITHUB_ACTIONS").is_ok_and(|v| v == "true")
}

/// Install the global logger; `RUST_LOG` overrides the default filter
pub fn init_logging(verbose: bool) {
    let verbose = verbose || std::env::var("RUNNER_DEBUG").is_ok_and(|v| v == "1");
    let env = env_logger::Env::default().default_filter_or(default_filter(verbose));
    let mut builder = env_logger::Builder::from_env(env);

    if on_actions_runner() {
        builder.format(|buf, record| {
            let message = record.args().to_string();
            match record.level() {
                Level::Info => writeln!(buf, "{}", message),
                level => writeln!(buf, "{}{}", workflow_command(level), escape_command_data(&message)),
            }
        });
    } else {
        builder.format_timestamp_secs();
    }

    builder.init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter() {
        assert_eq!(default_filter(false), "envsweep=info");
        assert_eq!(default_filter(true), "envsweep=debug");
    }

    #[test]
    fn test_workflow_commands() {
        assert_eq!(workflow_command(Level::Error), "::error::");
        assert_eq!(workflow_command(Level::Warn), "::warning::");
        assert_eq!(workflow_command(Level::Info), "");
        assert_eq!(workflow_command(Level::Trace), "::debug::");
    }

    #[test]
    fn test_escape_command_data() {
        assert_eq!(escape_command_data("50% done\nnext"), "50%25 done%0Anext");
        assert_eq!(escape_command_data("plain"), "plain");
    }
}
