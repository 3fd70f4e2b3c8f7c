//! Mapping generator outputs onto destination files and writing them.

use std::path::{Path, PathBuf};

use fob_webfont_config::{ConfigError, FontFormat, TemplateKind, WebfontOptions};
use futures::future::try_join_all;
use indexmap::IndexMap;
use path_clean::PathClean;
use tracing::debug;

use crate::error::WebfontError;
use crate::generator::{GenerationResult, OutputContent};

/// Output keys that describe the run rather than carry file contents
const METADATA_KEYS: &[&str] = &[
    "config",
    "usedBuildInTemplate",
    "usedBuildInStylesTemplate",
    "glyphsData",
    "fontsData",
];

/// What a generator output key holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputKind {
    /// Written to the fonts directory
    Font(FontFormat),
    /// The rendered template, written to the stylesheet location
    Stylesheet,
    /// Any other key, written to the fonts directory under its own extension
    Other(String),
}

impl OutputKind {
    /// Classify an output key. Metadata keys yield `None`.
    pub fn from_key(key: &str) -> Option<Self> {
        if METADATA_KEYS.contains(&key) {
            return None;
        }

        let kind = match key {
            "svg" => OutputKind::Font(FontFormat::Svg),
            "ttf" => OutputKind::Font(FontFormat::Ttf),
            "eot" => OutputKind::Font(FontFormat::Eot),
            "woff" => OutputKind::Font(FontFormat::Woff),
            "woff2" => OutputKind::Font(FontFormat::Woff2),
            "css" | "styles" | "template" => OutputKind::Stylesheet,
            other => OutputKind::Other(other.to_string()),
        };
        Some(kind)
    }
}

/// One file to write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedWrite {
    pub kind: OutputKind,
    /// Absolute destination
    pub path: PathBuf,
    pub contents: Vec<u8>,
}

/// Compute the destination of every output entry.
///
/// Relative destinations resolve against `root`. When two entries land on the
/// same path the later one wins, so no path is written twice.
pub fn plan_outputs(
    result: &GenerationResult,
    options: &WebfontOptions,
    root: &Path,
) -> Result<Vec<PlannedWrite>, WebfontError> {
    let dest = options
        .dest
        .as_ref()
        .filter(|dest| !dest.is_empty())
        .ok_or(ConfigError::MissingDest)?;

    let font_name = resolved_font_name(result, options);
    let font_dir = resolve(root, dest.fonts_dir());
    let mut planned: IndexMap<PathBuf, PlannedWrite> = IndexMap::new();

    for (key, content) in &result.outputs {
        let Some(kind) = OutputKind::from_key(key) else {
            continue;
        };

        match (&kind, content) {
            (OutputKind::Stylesheet, OutputContent::Single(bytes)) => {
                let path = stylesheet_path(result, options, root, font_name)?;
                insert(&mut planned, kind.clone(), path, bytes.clone());
            }
            (_, OutputContent::Single(bytes)) => {
                let path = font_dir.join(format!("{}.{}", font_name, key));
                insert(&mut planned, kind.clone(), path, bytes.clone());
            }
            (_, OutputContent::Named(files)) => {
                for file in files {
                    let path = font_dir.join(named_file(&file.name)?);
                    insert(&mut planned, kind.clone(), path, file.contents.clone());
                }
            }
        }
    }

    debug!(
        "[fob-webfont] planned {} output file(s) for '{}'",
        planned.len(),
        font_name
    );
    Ok(planned.into_values().collect())
}

/// Write every planned file concurrently, creating parent directories.
///
/// Resolves once all writes have settled; the first failure is returned.
pub async fn write_outputs(writes: &[PlannedWrite]) -> Result<Vec<PathBuf>, WebfontError> {
    let pending = writes.iter().map(|write| async move {
        if let Some(parent) = write.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| WebfontError::write(parent, e))?;
        }
        tokio::fs::write(&write.path, &write.contents)
            .await
            .map_err(|e| WebfontError::write(&write.path, e))?;
        Ok::<_, WebfontError>(write.path.clone())
    });

    try_join_all(pending).await
}

fn resolved_font_name<'a>(result: &'a GenerationResult, options: &'a WebfontOptions) -> &'a str {
    if !result.font_name().is_empty() {
        return result.font_name();
    }
    options.font_name.as_deref().unwrap_or("webfont")
}

fn stylesheet_path(
    result: &GenerationResult,
    options: &WebfontOptions,
    root: &Path,
    font_name: &str,
) -> Result<PathBuf, WebfontError> {
    let dest = options.dest.as_ref().ok_or(ConfigError::MissingDest)?;

    if let Some(file) = dest.stylesheet_file() {
        return Ok(resolve(root, file));
    }

    let dir = options
        .dest_template
        .as_deref()
        .or_else(|| dest.styles_dir())
        .unwrap_or_else(|| dest.fonts_dir());

    let template = result
        .config
        .template
        .as_deref()
        .or(options.template.as_deref())
        .unwrap_or("css");

    // The generator's flag decides; the template name is only a fallback
    let file_name = match TemplateKind::classify(template) {
        TemplateKind::Builtin(id) => format!("{}.{}", font_name, id),
        TemplateKind::Custom(_) if result.used_builtin_template => {
            format!("{}.css", font_name)
        }
        TemplateKind::Custom(path) => path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .ok_or_else(|| {
                WebfontError::invalid_output_path(template, "template path has no file name")
            })?,
    };

    Ok(resolve(root, dir).join(file_name))
}

fn named_file(name: &str) -> Result<PathBuf, WebfontError> {
    if name.contains('\0') {
        return Err(WebfontError::invalid_output_path(
            name.replace('\0', "\\0"),
            "name contains null byte",
        ));
    }

    Path::new(name)
        .file_name()
        .map(PathBuf::from)
        .ok_or_else(|| WebfontError::invalid_output_path(name, "name has no file component"))
}

fn insert(
    planned: &mut IndexMap<PathBuf, PlannedWrite>,
    kind: OutputKind,
    path: PathBuf,
    contents: Vec<u8>,
) {
    let path = path.clean();
    if planned.shift_remove(&path).is_some() {
        debug!(
            "[fob-webfont] output {} produced twice, keeping the last",
            path.display()
        );
    }
    planned.insert(path.clone(), PlannedWrite { kind, path, contents });
}

pub(crate) fn resolve(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.clean()
    } else {
        root.join(path).clean()
    }
}
