//! CLI error type and its conversion to miette reports.

use fob_plugin_webfont::WebfontError;
use fob_webfont_config::ConfigError;
use miette::Report;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    /// Options could not be loaded or are invalid
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The plugin aborted the build
    #[error(transparent)]
    Plugin(#[from] WebfontError),

    /// The build finished but reported errors
    #[error("Build failed with {errors} error(s)")]
    BuildFailed { errors: usize },

    #[error("Directory not found: {}", .0.display())]
    DirNotFound(PathBuf),

    #[error("File watcher error: {0}")]
    Watch(#[from] notify::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convert a CLI error into a report for `main`.
pub fn cli_error_to_miette(err: CliError) -> Report {
    match err {
        CliError::Plugin(e) => Report::new(e),
        CliError::Config(e) => match e.hint() {
            Some(hint) => miette::miette!(help = hint.to_string(), "Configuration error: {}", e),
            None => miette::miette!("Configuration error: {}", e),
        },
        CliError::BuildFailed { errors } => miette::miette!(
            help = "Fix the errors listed above or rerun with --verbose",
            "Build failed with {} error(s)",
            errors
        ),
        _ => miette::miette!("{}", err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_errors_carry_hints() {
        let report = cli_error_to_miette(CliError::from(ConfigError::MissingFiles));
        assert_eq!(
            report.to_string(),
            "Configuration error: Require `files` options"
        );
        assert!(report.help().is_some());
    }

    #[test]
    fn plugin_errors_keep_their_diagnostic_code() {
        let report = cli_error_to_miette(CliError::from(WebfontError::generation("bad")));
        assert_eq!(
            report.code().map(|c| c.to_string()).as_deref(),
            Some("fob::webfont::generation")
        );
    }
}
