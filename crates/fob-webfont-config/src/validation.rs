//! Pluggable option validation strategies
//!
//! Schema validation runs when the plugin is constructed. Filesystem validation
//! is opt-in and used by the CLI `check` command.

use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Result};
use crate::options::{TemplateKind, WebfontOptions};

/// Trait for pluggable option validation strategies
pub trait ConfigValidator {
    fn validate(&self, options: &WebfontOptions) -> Result<()>;
}

/// Required-field validation (no filesystem checks)
///
/// # Example
///
/// ```
/// use fob_webfont_config::{ConfigValidator, SchemaValidator, WebfontOptions};
///
/// let options = WebfontOptions::new("icons/*.svg", "dist/fonts");
/// SchemaValidator.validate(&options).unwrap();
/// ```
pub struct SchemaValidator;

impl ConfigValidator for SchemaValidator {
    fn validate(&self, options: &WebfontOptions) -> Result<()> {
        if options.files.is_empty() {
            return Err(ConfigError::MissingFiles);
        }

        match &options.dest {
            None => return Err(ConfigError::MissingDest),
            Some(dest) if dest.is_empty() => return Err(ConfigError::MissingDest),
            Some(_) => {}
        }

        if let Some(template) = &options.template {
            if template.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "template".to_string(),
                    hint: Some("Remove the empty `template` or name a template".to_string()),
                });
            }
        }

        if let Some(name) = &options.font_name {
            if name.trim().is_empty() || name.contains(['/', '\\']) {
                return Err(ConfigError::InvalidValue {
                    field: "fontName".to_string(),
                    hint: Some("Use a plain file name without path separators".to_string()),
                });
            }
        }

        Ok(())
    }
}

/// Filesystem validator
///
/// Runs schema validation first, then checks that the external options file
/// and a custom template exist relative to `root`.
pub struct FsValidator {
    root: PathBuf,
}

impl FsValidator {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }
}

impl ConfigValidator for FsValidator {
    fn validate(&self, options: &WebfontOptions) -> Result<()> {
        SchemaValidator.validate(options)?;

        if let Some(config) = &options.config {
            let path = self.root.join(config);
            if !path.exists() {
                return Err(ConfigError::NotFound { path });
            }
        }

        if let Some(TemplateKind::Custom(template)) = options.template_kind() {
            let path = self.root.join(template);
            if !path.exists() {
                return Err(ConfigError::NotFound { path });
            }
        }

        Ok(())
    }
}

/// Convenience function for schema-only validation
pub fn validate(options: &WebfontOptions) -> Result<()> {
    SchemaValidator.validate(options)
}

/// Convenience function for filesystem validation
pub fn validate_fs(options: &WebfontOptions, root: impl AsRef<Path>) -> Result<()> {
    FsValidator::new(root).validate(options)
}
