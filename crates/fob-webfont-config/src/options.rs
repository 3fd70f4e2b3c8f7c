//! Plugin option types.
//!
//! Field names are camelCase on the wire so the same document can be handed to
//! the font generator unchanged. Keys this crate does not interpret are kept
//! in [`WebfontOptions::extra`] and forwarded verbatim.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{ConfigError, Result};
use crate::validation::validate;

/// Stylesheet templates bundled with the generator.
pub const BUILTIN_TEMPLATES: &[&str] = &["css", "scss", "sass", "less", "styl", "json"];

/// User-supplied plugin configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebfontOptions {
    /// Glob pattern(s) matching the source icons
    #[serde(default, skip_serializing_if = "FilesPattern::is_empty")]
    pub files: FilesPattern,

    /// Where fonts and the stylesheet are written
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dest: Option<Destination>,

    /// Built-in template name (`css`, `scss`, ...) or path to a custom template
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,

    /// Directory the stylesheet is written to instead of the font directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dest_template: Option<PathBuf>,

    /// External options file consumed by the generator
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<PathBuf>,

    /// Abort the host build on generation errors. `None` inherits the host setting.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bail: Option<bool>,

    /// Base name of the font files; the generator defaults it to `webfont`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_name: Option<String>,

    /// Font formats to produce. `None` leaves the choice to the generator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formats: Option<Vec<FontFormat>>,

    /// Generator options passed through untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl WebfontOptions {
    /// Create options with the two required fields set.
    ///
    /// # Example
    ///
    /// ```
    /// use fob_webfont_config::WebfontOptions;
    ///
    /// let options = WebfontOptions::new("icons/*.svg", "dist/fonts").with_template("scss");
    /// assert_eq!(options.template.as_deref(), Some("scss"));
    /// ```
    pub fn new(files: impl Into<FilesPattern>, dest: impl Into<Destination>) -> Self {
        Self {
            files: files.into(),
            dest: Some(dest.into()),
            ..Self::default()
        }
    }

    /// Deserialize and validate options from a JSON value.
    ///
    /// # Example
    ///
    /// ```
    /// use fob_webfont_config::WebfontOptions;
    /// use serde_json::json;
    ///
    /// let options = WebfontOptions::from_value(json!({
    ///     "files": "icons/*.svg",
    ///     "dest": { "fontsDir": "dist/fonts", "stylesDir": "dist/css" },
    ///     "normalize": true
    /// }))
    /// .unwrap();
    ///
    /// assert_eq!(options.extra["normalize"], json!(true));
    /// ```
    pub fn from_value(value: Value) -> Result<Self> {
        let options: WebfontOptions =
            serde_json::from_value(value).map_err(|e| ConfigError::InvalidValue {
                field: "options".to_string(),
                hint: Some(e.to_string()),
            })?;
        validate(&options)?;
        Ok(options)
    }

    /// Serialize to the JSON document handed to the font generator.
    pub fn to_value(&self) -> Result<Value> {
        serde_json::to_value(self).map_err(|e| ConfigError::InvalidValue {
            field: "options".to_string(),
            hint: Some(e.to_string()),
        })
    }

    /// Set the stylesheet template: a built-in name or a template file path.
    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }

    /// Write the stylesheet to `dir` instead of the font directory.
    pub fn with_dest_template(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dest_template = Some(dir.into());
        self
    }

    /// Point the generator at an external options file.
    ///
    /// The file becomes a build dependency, so editing it triggers a rebuild.
    pub fn with_config(mut self, path: impl Into<PathBuf>) -> Self {
        self.config = Some(path.into());
        self
    }

    /// Override the host's bail setting for generation errors.
    pub fn with_bail(mut self, bail: bool) -> Self {
        self.bail = Some(bail);
        self
    }

    pub fn with_font_name(mut self, name: impl Into<String>) -> Self {
        self.font_name = Some(name.into());
        self
    }

    /// Add a pass-through option for the generator.
    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Classify the configured template, if any.
    pub fn template_kind(&self) -> Option<TemplateKind<'_>> {
        self.template.as_deref().map(TemplateKind::classify)
    }
}

/// One glob or an ordered list of globs.
///
/// Accepts either a string or an array of strings on the wire.
///
/// # Example
///
/// ```
/// use fob_webfont_config::FilesPattern;
///
/// let files = FilesPattern::from(vec!["icons/*.svg", "brand/**/*.svg"]);
/// assert_eq!(files.patterns(), vec!["icons/*.svg", "brand/**/*.svg"]);
/// assert!(!files.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilesPattern {
    One(String),
    Many(Vec<String>),
}

impl FilesPattern {
    /// The patterns in configuration order.
    pub fn patterns(&self) -> Vec<&str> {
        match self {
            FilesPattern::One(pattern) => vec![pattern.as_str()],
            FilesPattern::Many(patterns) => patterns.iter().map(String::as_str).collect(),
        }
    }

    /// True when no non-blank pattern is present.
    pub fn is_empty(&self) -> bool {
        self.patterns().iter().all(|p| p.trim().is_empty())
    }
}

impl Default for FilesPattern {
    fn default() -> Self {
        FilesPattern::Many(Vec::new())
    }
}

impl From<&str> for FilesPattern {
    fn from(pattern: &str) -> Self {
        FilesPattern::One(pattern.to_string())
    }
}

impl From<String> for FilesPattern {
    fn from(pattern: String) -> Self {
        FilesPattern::One(pattern)
    }
}

impl From<Vec<String>> for FilesPattern {
    fn from(patterns: Vec<String>) -> Self {
        FilesPattern::Many(patterns)
    }
}

impl From<Vec<&str>> for FilesPattern {
    fn from(patterns: Vec<&str>) -> Self {
        FilesPattern::Many(patterns.into_iter().map(str::to_string).collect())
    }
}

/// Output location: one directory for everything, or separate font and
/// stylesheet locations.
///
/// A plain string deserializes to [`Destination::Dir`]; a
/// `{ fontsDir, stylesDir, css }` record deserializes to
/// [`Destination::Split`].
///
/// # Example
///
/// ```
/// use fob_webfont_config::Destination;
/// use serde_json::json;
/// use std::path::Path;
///
/// let dest: Destination = serde_json::from_value(json!({
///     "fontsDir": "public/fonts",
///     "stylesDir": "src/styles"
/// }))
/// .unwrap();
///
/// assert_eq!(dest.fonts_dir(), Path::new("public/fonts"));
/// assert_eq!(dest.styles_dir(), Some(Path::new("src/styles")));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Destination {
    /// Fonts and stylesheet share one directory
    Dir(PathBuf),
    /// Fonts and stylesheet are placed separately
    #[serde(rename_all = "camelCase")]
    Split {
        fonts_dir: PathBuf,
        /// Stylesheet directory; defaults to `fonts_dir`
        #[serde(default, skip_serializing_if = "Option::is_none")]
        styles_dir: Option<PathBuf>,
        /// Exact stylesheet file path; wins over every other naming rule
        #[serde(default, skip_serializing_if = "Option::is_none")]
        css: Option<PathBuf>,
    },
}

impl Destination {
    /// Directory every font file is written to.
    pub fn fonts_dir(&self) -> &Path {
        match self {
            Destination::Dir(dir) => dir,
            Destination::Split { fonts_dir, .. } => fonts_dir,
        }
    }

    /// Separate stylesheet directory, when one was configured.
    pub fn styles_dir(&self) -> Option<&Path> {
        match self {
            Destination::Dir(_) => None,
            Destination::Split { styles_dir, .. } => styles_dir.as_deref(),
        }
    }

    /// Exact stylesheet path, when one was configured.
    pub fn stylesheet_file(&self) -> Option<&Path> {
        match self {
            Destination::Dir(_) => None,
            Destination::Split { css, .. } => css.as_deref(),
        }
    }

    /// True when the fonts directory is blank, which validation rejects.
    pub fn is_empty(&self) -> bool {
        self.fonts_dir().as_os_str().is_empty()
    }
}

impl From<&str> for Destination {
    fn from(dir: &str) -> Self {
        Destination::Dir(PathBuf::from(dir))
    }
}

impl From<PathBuf> for Destination {
    fn from(dir: PathBuf) -> Self {
        Destination::Dir(dir)
    }
}

impl From<&Path> for Destination {
    fn from(dir: &Path) -> Self {
        Destination::Dir(dir.to_path_buf())
    }
}

/// Font container formats the generator can emit.
///
/// Serialized in lowercase (`"woff2"`), matching the generator's `formats` option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontFormat {
    Svg,
    Ttf,
    Eot,
    Woff,
    Woff2,
}

impl FontFormat {
    /// File extension, also the key of this format in a generation result.
    pub fn extension(&self) -> &'static str {
        match self {
            FontFormat::Svg => "svg",
            FontFormat::Ttf => "ttf",
            FontFormat::Eot => "eot",
            FontFormat::Woff => "woff",
            FontFormat::Woff2 => "woff2",
        }
    }
}

/// A template option resolved to either a bundled template or a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateKind<'a> {
    /// One of [`BUILTIN_TEMPLATES`]
    Builtin(&'a str),
    /// Anything else, treated as a path to a template file
    Custom(&'a Path),
}

impl<'a> TemplateKind<'a> {
    /// Classify a `template` option value by name.
    ///
    /// # Example
    ///
    /// ```
    /// use fob_webfont_config::TemplateKind;
    ///
    /// assert!(TemplateKind::classify("scss").is_builtin());
    /// assert!(!TemplateKind::classify("templates/icons.hbs").is_builtin());
    /// ```
    pub fn classify(template: &'a str) -> Self {
        if BUILTIN_TEMPLATES.contains(&template) {
            TemplateKind::Builtin(template)
        } else {
            TemplateKind::Custom(Path::new(template))
        }
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self, TemplateKind::Builtin(_))
    }
}
