//! Options-file loading and merging.
//!
//! Files are read with figment. The provider is chosen from the extension;
//! extension-less rc files (`.webfontrc`) are parsed as YAML, which also
//! accepts JSON. Script configs (`webfont.config.js`) cannot be read here and
//! are left to the generator.

use std::path::{Path, PathBuf};

use figment::providers::{Format, Json, Serialized, Toml, Yaml};
use figment::Figment;
use tracing::debug;

use crate::error::{ConfigError, Result};
use crate::options::WebfontOptions;

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
}

/// True for files figment can parse.
pub fn is_data_file(path: &Path) -> bool {
    matches!(
        extension(path).as_deref(),
        Some("json") | Some("toml") | Some("yaml") | Some("yml") | None
    )
}

fn file_figment(path: &Path) -> Result<Figment> {
    if !path.exists() {
        return Err(ConfigError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let figment = match extension(path).as_deref() {
        Some("json") => Figment::from(Json::file(path)),
        Some("toml") => Figment::from(Toml::file(path)),
        Some("yaml") | Some("yml") | None => Figment::from(Yaml::file(path)),
        Some(other) => {
            return Err(ConfigError::UnsupportedFormat {
                extension: other.to_string(),
            });
        }
    };

    Ok(figment)
}

fn load_error(path: &Path, err: figment::Error) -> ConfigError {
    ConfigError::Load {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

/// Load options from a file without validating them.
///
/// The CLI layers its flags over the result before validation.
pub fn load_options_file(path: impl AsRef<Path>) -> Result<WebfontOptions> {
    let path = path.as_ref();
    let options = file_figment(path)?
        .extract::<WebfontOptions>()
        .map_err(|e| load_error(path, e))?;
    debug!("[fob-webfont] loaded options from {}", path.display());
    Ok(options)
}

impl WebfontOptions {
    /// Merge the external options file named by `config`, if any.
    ///
    /// File values act as defaults; anything set inline wins. `config` itself
    /// is preserved so the generator can report it back.
    ///
    /// `root` resolves a relative `config` path. The file must exist; one
    /// that is not a data file (JSON, TOML, YAML) is not merged and the
    /// options are returned unchanged for the generator to load it.
    pub fn merge_config_file(&self, root: &Path) -> Result<WebfontOptions> {
        let Some(config) = &self.config else {
            return Ok(self.clone());
        };

        let path = resolve(root, config);
        if !path.exists() {
            return Err(ConfigError::NotFound { path });
        }
        if !is_data_file(&path) {
            debug!(
                "[fob-webfont] {} is loaded by the generator",
                path.display()
            );
            return Ok(self.clone());
        }

        let merged = file_figment(&path)?
            .merge(Serialized::defaults(self))
            .extract::<WebfontOptions>()
            .map_err(|e| load_error(&path, e))?;

        debug!(
            "[fob-webfont] merged external options from {}",
            path.display()
        );
        Ok(merged)
    }
}

fn resolve(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}
