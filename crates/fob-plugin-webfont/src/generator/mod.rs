//! Font generator abstraction and its result type.
//!
//! Glyph conversion, font encoding and stylesheet templating happen inside the
//! generator. The plugin only consumes a [`GenerationResult`].

mod node;

pub use node::NodeGenerator;

use crate::error::WebfontError;
use async_trait::async_trait;
use fob_webfont_config::WebfontOptions;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

/// Produces font files and a stylesheet from plugin options.
#[async_trait]
pub trait FontGenerator: Send + Sync + 'static {
    async fn generate(&self, options: &WebfontOptions) -> Result<GenerationResult, WebfontError>;
}

#[async_trait]
impl<T: FontGenerator + ?Sized> FontGenerator for Arc<T> {
    async fn generate(&self, options: &WebfontOptions) -> Result<GenerationResult, WebfontError> {
        (**self).generate(options).await
    }
}

/// Output of one generator run.
///
/// `outputs` maps an output key (`svg`, `ttf`, `eot`, `woff`, `woff2`, `css`,
/// `styles`, `template`, ...) to its contents in the order the generator
/// produced them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResult {
    #[serde(default)]
    pub outputs: IndexMap<String, OutputContent>,

    pub config: ResolvedConfig,

    #[serde(
        default,
        alias = "usedBuildInTemplate",
        alias = "usedBuildInStylesTemplate"
    )]
    pub used_builtin_template: bool,

    /// Icon sources the generator read
    #[serde(default, rename = "glyphsData")]
    pub glyphs: Vec<SourceRef>,

    /// Font sources the generator read
    #[serde(default, rename = "fontsData")]
    pub fonts: Vec<SourceRef>,
}

impl GenerationResult {
    pub fn new(font_name: impl Into<String>) -> Self {
        Self {
            config: ResolvedConfig {
                font_name: font_name.into(),
                ..ResolvedConfig::default()
            },
            ..Self::default()
        }
    }

    pub fn with_output(mut self, key: impl Into<String>, content: impl Into<OutputContent>) -> Self {
        self.outputs.insert(key.into(), content.into());
        self
    }

    pub fn font_name(&self) -> &str {
        &self.config.font_name
    }
}

/// Options as resolved by the generator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedConfig {
    pub font_name: String,

    /// Built-in template id or custom template path
    #[serde(default)]
    pub template: Option<String>,

    /// External options file the generator loaded
    #[serde(default)]
    pub config: Option<PathBuf>,
}

/// Contents of one output key: a single buffer or a list of named files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OutputContent {
    Single(Vec<u8>),
    /// Written one file per entry, e.g. multi-file TTF
    Named(Vec<NamedBuffer>),
}

impl OutputContent {
    /// Total byte count across all entries
    pub fn len(&self) -> usize {
        match self {
            OutputContent::Single(bytes) => bytes.len(),
            OutputContent::Named(files) => files.iter().map(|f| f.contents.len()).sum(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<Vec<u8>> for OutputContent {
    fn from(bytes: Vec<u8>) -> Self {
        OutputContent::Single(bytes)
    }
}

impl From<&[u8]> for OutputContent {
    fn from(bytes: &[u8]) -> Self {
        OutputContent::Single(bytes.to_vec())
    }
}

impl From<String> for OutputContent {
    fn from(text: String) -> Self {
        OutputContent::Single(text.into_bytes())
    }
}

impl From<&str> for OutputContent {
    fn from(text: &str) -> Self {
        OutputContent::Single(text.as_bytes().to_vec())
    }
}

impl From<Vec<NamedBuffer>> for OutputContent {
    fn from(files: Vec<NamedBuffer>) -> Self {
        OutputContent::Named(files)
    }
}

/// A generator output that names its own file.
///
/// `name` is a file name, not a path; it is joined to the output's directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedBuffer {
    pub name: String,
    pub contents: Vec<u8>,
}

impl NamedBuffer {
    pub fn new(name: impl Into<String>, contents: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            contents: contents.into(),
        }
    }
}

/// A source file the generator read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceRef {
    /// Relative paths resolve against the plugin root
    pub src_path: PathBuf,
}

impl SourceRef {
    pub fn new(src_path: impl Into<PathBuf>) -> Self {
        Self {
            src_path: src_path.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_bridge_document() {
        let result: GenerationResult = serde_json::from_value(json!({
            "config": { "fontName": "webfont", "template": "css", "config": null },
            "usedBuildInTemplate": true,
            "glyphsData": [{ "srcPath": "/icons/avatar.svg" }],
            "outputs": {
                "svg": [60, 115, 118, 103],
                "ttf": [{ "name": "webfont-bold.ttf", "contents": [0, 1] }]
            }
        }))
        .unwrap();

        assert_eq!(result.font_name(), "webfont");
        assert!(result.used_builtin_template);
        assert_eq!(result.glyphs, vec![SourceRef::new("/icons/avatar.svg")]);
        assert!(result.fonts.is_empty());
        assert_eq!(result.outputs["svg"], OutputContent::Single(b"<svg".to_vec()));
        assert_eq!(
            result.outputs["ttf"],
            OutputContent::Named(vec![NamedBuffer::new("webfont-bold.ttf", vec![0, 1])])
        );
    }

    #[test]
    fn accepts_legacy_styles_template_flag() {
        let result: GenerationResult = serde_json::from_value(json!({
            "config": { "fontName": "icons" },
            "usedBuildInStylesTemplate": true
        }))
        .unwrap();
        assert!(result.used_builtin_template);
        assert!(result.outputs.is_empty());
    }

    #[test]
    fn output_content_length() {
        let named = OutputContent::Named(vec![
            NamedBuffer::new("a.ttf", vec![1, 2]),
            NamedBuffer::new("b.ttf", vec![3]),
        ]);
        assert_eq!(named.len(), 3);
        assert!(OutputContent::from("").is_empty());
    }
}
