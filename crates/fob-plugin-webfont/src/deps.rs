//! Dependency tracking.
//!
//! After each successful generation the plugin records which files and
//! directories influenced the output. The host watches them; a change to any
//! of them makes the next watch cycle regenerate.

use std::collections::{BTreeSet, HashSet};
use std::hash::BuildHasher;
use std::path::{Component, Path, PathBuf};

use fob_webfont_config::{TemplateKind, WebfontOptions};
use indexmap::IndexSet;

use crate::generator::GenerationResult;
use crate::output::resolve;

/// Files and directories the last successful generation depended on.
///
/// Both sets keep insertion order and hold each path once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencySet {
    files: IndexSet<PathBuf>,
    contexts: IndexSet<PathBuf>,
}

impl DependencySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a single file. Returns false if it was already tracked.
    pub fn add_file(&mut self, path: impl Into<PathBuf>) -> bool {
        self.files.insert(path.into())
    }

    /// Track a directory and everything below it.
    pub fn add_context(&mut self, path: impl Into<PathBuf>) -> bool {
        self.contexts.insert(path.into())
    }

    /// Tracked files in insertion order
    pub fn files(&self) -> impl Iterator<Item = &Path> {
        self.files.iter().map(PathBuf::as_path)
    }

    pub fn contexts(&self) -> impl Iterator<Item = &Path> {
        self.contexts.iter().map(PathBuf::as_path)
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.contexts.is_empty()
    }

    /// True if `path` is a tracked file or lies inside a tracked directory.
    pub fn tracks(&self, path: &Path) -> bool {
        self.files.contains(path) || self.contexts.iter().any(|dir| path.starts_with(dir))
    }

    /// First path in `paths` that [`tracks`](Self::tracks) matches.
    pub fn first_tracked<'a, I>(&self, paths: I) -> Option<&'a Path>
    where
        I: IntoIterator<Item = &'a PathBuf>,
    {
        paths
            .into_iter()
            .map(PathBuf::as_path)
            .find(|path| self.tracks(path))
    }

    /// Track the directory each `files` pattern searches.
    ///
    /// Done before the first generation so a failed build still watches the
    /// icon directories and a fix to a broken icon triggers a rebuild.
    pub fn seed_sources(&mut self, options: &WebfontOptions, root: &Path) {
        for pattern in options.files.patterns() {
            let base = glob_base(pattern);
            if base.as_path() == Path::new(pattern) {
                self.add_file(resolve(root, &base));
            } else {
                self.add_context(resolve(root, &base));
            }
        }
    }

    /// Record what a generation depended on.
    ///
    /// Adds the external options file when one was used, the custom template
    /// when the built-in one was not, and the parent directory of every icon
    /// and font source.
    pub fn record(&mut self, result: &GenerationResult, options: &WebfontOptions, root: &Path) {
        let config = result.config.config.as_deref().or(options.config.as_deref());
        if let Some(config) = config {
            self.add_file(resolve(root, config));
        }

        if !result.used_builtin_template {
            if let Some(TemplateKind::Custom(template)) = options.template_kind() {
                self.add_file(resolve(root, template));
            }
        }

        for source in result.glyphs.iter().chain(&result.fonts) {
            let src = resolve(root, &source.src_path);
            if let Some(dir) = src.parent() {
                self.add_context(dir.to_path_buf());
            }
        }
    }

    /// Copy both sets into the host's collections.
    pub fn export_to<F, C>(&self, files: &mut F, contexts: &mut C)
    where
        F: DependencyCollection + ?Sized,
        C: DependencyCollection + ?Sized,
    {
        for path in &self.files {
            files.add_dependency(path);
        }
        for path in &self.contexts {
            contexts.add_dependency(path);
        }
    }
}

/// Leading components of `pattern` that contain no glob syntax.
pub(crate) fn glob_base(pattern: &str) -> PathBuf {
    let mut base = PathBuf::new();
    for component in Path::new(pattern).components() {
        if let Component::Normal(part) = component {
            if part.to_string_lossy().contains(['*', '?', '[', '{']) {
                break;
            }
        }
        base.push(component);
    }
    base
}

/// A host collection that can receive dependency paths.
///
/// List-like collections skip paths they already hold, so exporting twice
/// does not create duplicates.
pub trait DependencyCollection {
    fn add_dependency(&mut self, path: &Path);
}

impl DependencyCollection for Vec<PathBuf> {
    fn add_dependency(&mut self, path: &Path) {
        if !self.iter().any(|existing| existing == path) {
            self.push(path.to_path_buf());
        }
    }
}

impl<S: BuildHasher> DependencyCollection for HashSet<PathBuf, S> {
    fn add_dependency(&mut self, path: &Path) {
        if !self.contains(path) {
            self.insert(path.to_path_buf());
        }
    }
}

impl<S: BuildHasher> DependencyCollection for IndexSet<PathBuf, S> {
    fn add_dependency(&mut self, path: &Path) {
        if !self.contains(path) {
            self.insert(path.to_path_buf());
        }
    }
}

impl DependencyCollection for BTreeSet<PathBuf> {
    fn add_dependency(&mut self, path: &Path) {
        if !self.contains(path) {
            self.insert(path.to_path_buf());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::SourceRef;
    use rustc_hash::FxHashSet;

    fn generated() -> GenerationResult {
        let mut result = GenerationResult::new("icons");
        result.glyphs = vec![
            SourceRef::new("icons/avatar.svg"),
            SourceRef::new("icons/bell.svg"),
            SourceRef::new("/shared/logo.svg"),
        ];
        result
    }

    #[test]
    fn records_source_directories_once() {
        let mut deps = DependencySet::new();
        let options = WebfontOptions::new("icons/*.svg", "out");
        deps.record(&generated(), &options, Path::new("/p"));

        let contexts: Vec<_> = deps.contexts().collect();
        assert_eq!(contexts, vec![Path::new("/p/icons"), Path::new("/shared")]);
        assert_eq!(deps.files().count(), 0);
    }

    #[test]
    fn seeds_glob_base_directories() {
        let mut deps = DependencySet::new();
        let mut options = WebfontOptions::new("icons/*.svg", "out");
        options.files = vec!["icons/*.svg", "/shared/brand/**/*.svg", "*.svg", "logo.svg"].into();
        deps.seed_sources(&options, Path::new("/p"));

        let contexts: Vec<_> = deps.contexts().collect();
        assert_eq!(
            contexts,
            vec![Path::new("/p/icons"), Path::new("/shared/brand"), Path::new("/p")]
        );
        assert_eq!(deps.files().collect::<Vec<_>>(), vec![Path::new("/p/logo.svg")]);
        assert!(deps.tracks(Path::new("/p/icons/broken.svg")));
    }

    #[test]
    fn glob_base_stops_at_first_pattern() {
        assert_eq!(glob_base("icons/*.svg"), PathBuf::from("icons"));
        assert_eq!(glob_base("assets/{a,b}/x.svg"), PathBuf::from("assets"));
        assert_eq!(glob_base("logo.svg"), PathBuf::from("logo.svg"));
    }

    #[test]
    fn records_config_and_custom_template() {
        let mut deps = DependencySet::new();
        let options = WebfontOptions::new("icons/*.svg", "out")
            .with_config("webfont.config.json")
            .with_template("templates/icons.css.njk");
        deps.record(&generated(), &options, Path::new("/p"));

        let files: Vec<_> = deps.files().collect();
        assert_eq!(
            files,
            vec![
                Path::new("/p/webfont.config.json"),
                Path::new("/p/templates/icons.css.njk"),
            ]
        );
    }

    #[test]
    fn builtin_template_is_not_a_dependency() {
        let mut deps = DependencySet::new();
        let options = WebfontOptions::new("icons/*.svg", "out").with_template("scss");
        let mut result = generated();
        result.used_builtin_template = true;
        deps.record(&result, &options, Path::new("/p"));
        assert_eq!(deps.files().count(), 0);
    }

    #[test]
    fn tracks_files_and_paths_inside_contexts() {
        let mut deps = DependencySet::new();
        deps.add_file("/p/webfont.json");
        deps.add_context("/p/icons");

        assert!(deps.tracks(Path::new("/p/webfont.json")));
        assert!(deps.tracks(Path::new("/p/icons/new.svg")));
        assert!(!deps.tracks(Path::new("/p/src/main.rs")));
        assert!(!deps.tracks(Path::new("/p/icons-old/a.svg")));
    }

    #[test]
    fn export_is_duplicate_free() {
        let mut deps = DependencySet::new();
        deps.add_file("/p/a.json");
        deps.add_context("/p/icons");

        let mut files = vec![PathBuf::from("/p/a.json")];
        let mut contexts: FxHashSet<PathBuf> = FxHashSet::default();
        deps.export_to(&mut files, &mut contexts);
        deps.export_to(&mut files, &mut contexts);

        assert_eq!(files, vec![PathBuf::from("/p/a.json")]);
        assert_eq!(contexts.len(), 1);

        let mut ordered = BTreeSet::new();
        let mut indexed: IndexSet<PathBuf> = IndexSet::new();
        deps.export_to(&mut ordered, &mut indexed);
        assert!(ordered.contains(Path::new("/p/a.json")));
        assert!(indexed.contains(Path::new("/p/icons")));
    }
}
