#![allow(dead_code)]

use std::path::{Component, Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use fob_plugin_webfont::config::{TemplateKind, WebfontOptions};
use fob_plugin_webfont::{
    FontGenerator, GenerationResult, NamedBuffer, OutputContent, SourceRef, WebfontError,
};
use tempfile::TempDir;
use walkdir::WalkDir;

/// Deterministic stand-in for the `webfont` package.
///
/// Reads every `.svg` under the glob's base directory and fails on files that
/// do not look like SVG.
#[derive(Clone, Default)]
pub struct FakeGenerator {
    calls: Arc<AtomicUsize>,
    active: Arc<AtomicUsize>,
    max_active: Arc<AtomicUsize>,
    named_ttf: bool,
    delay: Option<Duration>,
}

impl FakeGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_named_ttf(mut self) -> Self {
        self.named_ttf = true;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn max_concurrent(&self) -> usize {
        self.max_active.load(Ordering::SeqCst)
    }

    fn produce(&self, options: &WebfontOptions) -> Result<GenerationResult, WebfontError> {
        let mut sources = Vec::new();
        for pattern in options.files.patterns() {
            let base = glob_base(pattern);
            for entry in WalkDir::new(&base).sort_by_file_name() {
                let entry = entry.map_err(|e| WebfontError::generation(e.to_string()))?;
                if entry.path().extension().is_some_and(|ext| ext == "svg") {
                    sources.push(entry.path().to_path_buf());
                }
            }
        }

        if sources.is_empty() {
            return Err(WebfontError::generation("Files glob patterns specified did not match any files"));
        }

        let mut glyphs = Vec::new();
        let mut svg = String::new();
        for path in &sources {
            let content = std::fs::read_to_string(path)
                .map_err(|e| WebfontError::generation(e.to_string()))?;
            if !content.contains("<svg") {
                return Err(WebfontError::generation(format!(
                    "Invalid SVG: {}",
                    path.display()
                )));
            }
            svg.push_str(content.trim());
            glyphs.push(glyph_name(path));
        }

        let font_name = options
            .font_name
            .clone()
            .unwrap_or_else(|| "webfont".to_string());
        let template = options.template.clone().unwrap_or_else(|| "css".to_string());

        let mut css = String::new();
        let used_builtin = match TemplateKind::classify(&template) {
            TemplateKind::Builtin(_) => true,
            TemplateKind::Custom(path) => {
                let header = std::fs::read_to_string(path)
                    .map_err(|e| WebfontError::generation(e.to_string()))?;
                css.push_str(&header);
                false
            }
        };
        for glyph in &glyphs {
            css.push_str(&format!(".{}-{} {{}}\n", font_name, glyph));
        }

        let mut result = GenerationResult::new(font_name.clone()).with_output("svg", svg);
        for format in ["eot", "woff", "woff2"] {
            result = result.with_output(format, font_bytes(format, &glyphs));
        }
        let ttf = font_bytes("ttf", &glyphs);
        result = if self.named_ttf {
            result.with_output(
                "ttf",
                OutputContent::Named(vec![
                    NamedBuffer::new(format!("{}-regular.ttf", font_name), ttf.clone()),
                    NamedBuffer::new(format!("nested/{}-bold.ttf", font_name), ttf),
                ]),
            )
        } else {
            result.with_output("ttf", ttf)
        };
        result = result.with_output("css", css);

        result.config.template = Some(template);
        result.config.config = options.config.clone();
        result.used_builtin_template = used_builtin;
        result.glyphs = sources.into_iter().map(SourceRef::new).collect();
        Ok(result)
    }
}

#[async_trait]
impl FontGenerator for FakeGenerator {
    async fn generate(&self, options: &WebfontOptions) -> Result<GenerationResult, WebfontError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let active = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active.fetch_max(active, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let result = self.produce(options);

        self.active.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

fn glob_base(pattern: &str) -> PathBuf {
    let mut base = PathBuf::new();
    for component in Path::new(pattern).components() {
        if let Component::Normal(part) = component {
            let part = part.to_string_lossy();
            if part.contains(['*', '?', '[', '{']) {
                break;
            }
        }
        base.push(component);
    }
    base
}

fn glyph_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn font_bytes(format: &str, glyphs: &[String]) -> Vec<u8> {
    format!("{}:{}", format, glyphs.join(",")).into_bytes()
}

pub const AVATAR: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24"><circle cx="12" cy="8" r="4"/></svg>"#;
pub const BELL: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24"><path d="M12 22a2 2 0 0 0 2-2h-4a2 2 0 0 0 2 2z"/></svg>"#;

/// A temporary project with an `icons/` directory holding two icons.
pub struct Project {
    pub dir: TempDir,
}

impl Project {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let project = Self { dir };
        project.write("icons/avatar.svg", AVATAR);
        project.write("icons/bell.svg", BELL);
        project
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }

    pub fn write(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.path(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, content).unwrap();
        path
    }

    pub fn icons_glob(&self) -> String {
        format!("{}/icons/*.svg", self.root().display())
    }

    pub fn options(&self) -> WebfontOptions {
        WebfontOptions::new(self.icons_glob(), self.path("dist/fonts"))
    }

    pub fn read(&self, relative: &str) -> Vec<u8> {
        std::fs::read(self.path(relative)).unwrap()
    }
}
