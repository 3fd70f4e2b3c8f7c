//! Error types for option validation and loading.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Require `files` options")]
    MissingFiles,

    #[error("Require `dest` options")]
    MissingDest,

    #[error("invalid config value for `{field}`")]
    InvalidValue { field: String, hint: Option<String> },

    // Options-file loading errors
    #[error("file not found: {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("unsupported options file format: {extension}")]
    UnsupportedFormat { extension: String },

    #[error("failed to load options file {}: {message}", .path.display())]
    Load { path: PathBuf, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConfigError {
    /// Additional guidance for the user, if any.
    pub fn hint(&self) -> Option<&str> {
        match self {
            ConfigError::MissingFiles => {
                Some("Pass one glob or a list of globs matching the SVG icons")
            }
            ConfigError::MissingDest => {
                Some("Pass an output directory or a `{ fontsDir, stylesDir }` record")
            }
            ConfigError::InvalidValue { hint, .. } => hint.as_deref(),
            ConfigError::UnsupportedFormat { .. } => {
                Some("Use a .json, .toml, .yaml/.yml or extension-less rc file")
            }
            _ => None,
        }
    }
}
