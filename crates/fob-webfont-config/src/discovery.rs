//! File-based options discovery for CLI use
//!
//! Library users build [`WebfontOptions`] directly or through
//! [`WebfontOptions::from_value`].

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::{ConfigError, Result};
use crate::loading::load_options_file;
use crate::options::WebfontOptions;

/// Options file names searched in the project root, in order
pub const CONFIG_FILE_NAMES: &[&str] = &[
    "webfont.toml",
    "webfont.json",
    ".webfontrc",
    ".webfontrc.json",
];

/// Finds and loads plugin options from conventional locations.
///
/// # Example
///
/// ```no_run
/// use fob_webfont_config::ConfigDiscovery;
///
/// let options = ConfigDiscovery::new(".").load().unwrap();
/// ```
pub struct ConfigDiscovery {
    root: PathBuf,
}

impl ConfigDiscovery {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Find an options file in the root directory
    ///
    /// Searches in this order:
    /// 1. `webfont.toml`
    /// 2. `webfont.json`
    /// 3. `.webfontrc` (YAML or JSON)
    /// 4. `.webfontrc.json`
    /// 5. package.json (`webfont` field)
    pub fn find(&self) -> Option<PathBuf> {
        for name in CONFIG_FILE_NAMES {
            let path = self.root.join(name);
            if path.exists() {
                return Some(path);
            }
        }

        let pkg_path = self.root.join("package.json");
        if let Ok(content) = fs::read_to_string(&pkg_path) {
            if let Ok(parsed) = serde_json::from_str::<Value>(&content) {
                if parsed.get("webfont").is_some_and(|v| !v.is_null()) {
                    return Some(pkg_path);
                }
            }
        }

        None
    }

    /// Load options from the discovered file.
    ///
    /// The result is not validated; callers apply overrides first.
    pub fn load(&self) -> Result<WebfontOptions> {
        let path = self.find().ok_or_else(|| ConfigError::NotFound {
            path: self.root.join(CONFIG_FILE_NAMES[0]),
        })?;
        self.load_from(&path)
    }

    /// Load options from a specific file path
    pub fn load_from(&self, path: &Path) -> Result<WebfontOptions> {
        if path.file_name() == Some(std::ffi::OsStr::new("package.json")) {
            return self.load_from_package_json(path);
        }

        load_options_file(path)
    }

    fn load_from_package_json(&self, path: &Path) -> Result<WebfontOptions> {
        let content = fs::read_to_string(path)?;

        let parsed: Value =
            serde_json::from_str(&content).map_err(|e| ConfigError::InvalidValue {
                field: "package.json".to_string(),
                hint: Some(format!("Invalid JSON: {}", e)),
            })?;

        let value = parsed
            .get("webfont")
            .filter(|v| !v.is_null())
            .ok_or_else(|| ConfigError::InvalidValue {
                field: "webfont".to_string(),
                hint: Some("Add a 'webfont' field to your package.json".to_string()),
            })?;

        serde_json::from_value(value.clone()).map_err(|e| ConfigError::InvalidValue {
            field: "webfont".to_string(),
            hint: Some(e.to_string()),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}
