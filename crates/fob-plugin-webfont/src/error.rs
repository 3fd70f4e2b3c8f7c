//! Error types for webfont generation

use fob_webfont_config::ConfigError;
use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the webfont plugin
#[derive(Error, Debug, Diagnostic)]
pub enum WebfontError {
    /// Required options missing or malformed at construction
    #[error("{0}")]
    #[diagnostic(code(fob::webfont::config))]
    Config(#[from] ConfigError),

    /// The external options file named by `config` could not be merged
    #[error("Failed to load external webfont config: {source}")]
    #[diagnostic(
        code(fob::webfont::external_config),
        help("Check the file referenced by the `config` option")
    )]
    ExternalConfig {
        #[source]
        source: ConfigError,
    },

    /// The font generator rejected the input
    #[error("Font generation failed: {message}")]
    #[diagnostic(code(fob::webfont::generation))]
    Generation {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// Failed to spawn the generator process
    #[error("Failed to spawn font generator '{program}': {source}")]
    #[diagnostic(
        code(fob::webfont::spawn_failed),
        help("Install Node.js and the `webfont` package: npm install -D webfont")
    )]
    GeneratorSpawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Generator process exited with non-zero status
    #[error("Font generator exited with code {exit_code}")]
    #[diagnostic(code(fob::webfont::generator_exit))]
    GeneratorExit {
        exit_code: i32,
        #[help]
        stderr: String,
    },

    /// Generator process timed out
    #[error("Font generator timed out after {timeout_secs} seconds")]
    #[diagnostic(
        code(fob::webfont::timeout),
        help("Increase the generator timeout or reduce the number of icons")
    )]
    GeneratorTimeout { timeout_secs: u64 },

    /// Output from the generator exceeded maximum allowed size
    #[error("Generator output too large: {actual_bytes} bytes (max: {max_bytes} bytes)")]
    #[diagnostic(code(fob::webfont::output_too_large))]
    OutputTooLarge {
        actual_bytes: usize,
        max_bytes: usize,
    },

    /// Generator output could not be decoded
    #[error("Failed to decode generator output: {source}")]
    #[diagnostic(
        code(fob::webfont::malformed_output),
        help("The generator bridge printed something other than its JSON result")
    )]
    MalformedOutput {
        #[source]
        source: serde_json::Error,
    },

    /// A generator-supplied name could not be mapped to a destination file
    #[error("Invalid output path '{name}': {reason}")]
    #[diagnostic(code(fob::webfont::invalid_output_path))]
    InvalidOutputPath { name: String, reason: String },

    /// Writing an output file failed
    #[error("Failed to write {}: {source}", .path.display())]
    #[diagnostic(
        code(fob::webfont::write_failed),
        help("Check that the destination directory is writable")
    )]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The change detector could not watch a path or reported an error
    #[error("File watcher error{}: {source}", .path.as_ref().map(|p| format!(" for {}", p.display())).unwrap_or_default())]
    #[diagnostic(code(fob::webfont::watch), severity(Warning))]
    Watch {
        path: Option<PathBuf>,
        #[source]
        source: notify::Error,
    },
}

impl WebfontError {
    pub fn generation(message: impl Into<String>) -> Self {
        Self::Generation {
            message: message.into(),
            help: None,
        }
    }

    pub fn spawn_failed(program: impl Into<String>, source: std::io::Error) -> Self {
        Self::GeneratorSpawn {
            program: program.into(),
            source,
        }
    }

    pub fn generator_exit(exit_code: i32, stderr: String) -> Self {
        Self::GeneratorExit { exit_code, stderr }
    }

    pub fn timeout(timeout_secs: u64) -> Self {
        Self::GeneratorTimeout { timeout_secs }
    }

    pub fn output_too_large(actual_bytes: usize, max_bytes: usize) -> Self {
        Self::OutputTooLarge {
            actual_bytes,
            max_bytes,
        }
    }

    pub fn invalid_output_path(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidOutputPath {
            name: name.into(),
            reason: reason.into(),
        }
    }

    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }

    pub fn watch(path: Option<PathBuf>, source: notify::Error) -> Self {
        Self::Watch { path, source }
    }

    /// Generation and write failures share one policy: propagate when bailing,
    /// otherwise record them on the compilation.
    pub fn is_build_failure(&self) -> bool {
        !matches!(self, Self::Config(_) | Self::Watch { .. })
    }
}
