//! Resolving plugin options from an options file and flags.

use std::path::{Path, PathBuf};

use fob_webfont_config::{validate, ConfigDiscovery, Destination, FilesPattern, WebfontOptions};
use tracing::debug;

use crate::cli::OptionArgs;
use crate::error::{CliError, Result};

/// Options plus the directory they are relative to.
#[derive(Debug, Clone)]
pub struct ResolvedOptions {
    pub root: PathBuf,
    pub options: WebfontOptions,
    /// File the options were loaded from, if any
    pub source: Option<PathBuf>,
}

/// Load options for `args` and validate them.
///
/// The file named by `--config` is required to exist. Without it the project
/// root is searched; finding nothing is fine as long as flags supply `files`
/// and `dest`.
pub fn resolve(args: &OptionArgs) -> Result<ResolvedOptions> {
    let root = project_root(args.cwd.as_deref())?;
    let discovery = ConfigDiscovery::new(&root);

    let source = match &args.config {
        Some(path) => Some(absolute(&root, path)),
        None => discovery.find(),
    };

    let mut options = match &source {
        Some(path) => {
            debug!("loading options from {}", path.display());
            discovery.load_from(path)?
        }
        None => WebfontOptions::default(),
    };

    apply_overrides(&mut options, args);
    validate(&options)?;

    Ok(ResolvedOptions {
        root,
        options,
        source,
    })
}

/// Flags win over file values. `--dest` replaces only the fonts directory of
/// a `{ fontsDir, stylesDir, css }` record.
fn apply_overrides(options: &mut WebfontOptions, args: &OptionArgs) {
    if !args.files.is_empty() {
        options.files = FilesPattern::from(args.files.clone());
    }
    if let Some(dest) = &args.dest {
        match &mut options.dest {
            // Keep the file's stylesheet location
            Some(Destination::Split { fonts_dir, .. }) => *fonts_dir = dest.clone(),
            other => *other = Some(Destination::Dir(dest.clone())),
        }
    }
    if let Some(template) = &args.template {
        options.template = Some(template.clone());
    }
    if let Some(dir) = &args.dest_template {
        options.dest_template = Some(dir.clone());
    }
    if let Some(name) = &args.font_name {
        options.font_name = Some(name.clone());
    }
}

fn project_root(cwd: Option<&Path>) -> Result<PathBuf> {
    let current = std::env::current_dir()?;
    let root = match cwd {
        Some(dir) => absolute(&current, dir),
        None => current,
    };

    if !root.is_dir() {
        return Err(CliError::DirNotFound(root));
    }
    Ok(root)
}

fn absolute(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
