//! Host build tool interface.
//!
//! A host drives plugins through four hooks. Each build or rebuild gets a fresh
//! [`Compilation`] that the hooks read from and report into.

use std::error::Error;
use std::path::PathBuf;

use async_trait::async_trait;
use indexmap::IndexSet;
use miette::Diagnostic;
use rustc_hash::FxHashSet;
use serde::Serialize;

use crate::error::WebfontError;

pub type HookResult = Result<(), WebfontError>;

/// A plugin that participates in the host's build lifecycle.
#[async_trait]
pub trait LifecyclePlugin: Send + Sync {
    fn name(&self) -> &'static str;

    /// Before the first one-shot build
    async fn first_build(&self, compilation: &mut Compilation) -> HookResult;

    /// Before every rebuild in watch mode, including the first
    async fn watch_cycle(&self, compilation: &mut Compilation) -> HookResult;

    /// After a build completes
    async fn build_finished(&self, compilation: &mut Compilation) -> HookResult;

    /// When watch mode ends
    async fn watch_closed(&self);
}

/// State of one build as seen by plugins.
#[derive(Debug, Default)]
pub struct Compilation {
    /// Host-level bail setting, used when a plugin has none of its own
    pub bail: bool,

    /// Errors and warnings plugins reported during this build
    pub diagnostics: Vec<HostDiagnostic>,

    /// Files whose change should trigger a rebuild
    pub file_dependencies: IndexSet<PathBuf>,

    /// Directories watched recursively for the same purpose
    pub context_dependencies: IndexSet<PathBuf>,

    /// Paths the host saw change since the previous build
    pub modified_files: FxHashSet<PathBuf>,

    pub removed_files: FxHashSet<PathBuf>,
}

impl Compilation {
    pub fn new(bail: bool) -> Self {
        Self {
            bail,
            ..Self::default()
        }
    }

    /// A rebuild triggered by the given changes
    pub fn rebuild<M, R>(bail: bool, modified: M, removed: R) -> Self
    where
        M: IntoIterator<Item = PathBuf>,
        R: IntoIterator<Item = PathBuf>,
    {
        Self {
            bail,
            modified_files: modified.into_iter().collect(),
            removed_files: removed.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn push_error(&mut self, plugin: &str, error: &WebfontError) {
        self.diagnostics.push(HostDiagnostic::from_error(plugin, error));
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    /// Every changed or removed path
    pub fn changed_paths(&self) -> impl Iterator<Item = &PathBuf> {
        self.modified_files.iter().chain(self.removed_files.iter())
    }
}

/// How a [`HostDiagnostic`] should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// A problem reported into a compilation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostDiagnostic {
    /// Name of the reporting plugin
    pub plugin: String,
    pub severity: Severity,
    pub message: String,
    /// Suggested fix, when the error carries one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
    /// Messages of the error's source chain, outermost first
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub causes: Vec<String>,
}

impl HostDiagnostic {
    /// Convert an error, keeping its miette severity and help text.
    pub fn from_error(plugin: &str, error: &WebfontError) -> Self {
        let severity = match error.severity() {
            Some(miette::Severity::Warning) | Some(miette::Severity::Advice) => Severity::Warning,
            _ => Severity::Error,
        };

        let mut causes = Vec::new();
        let mut source = error.source();
        while let Some(cause) = source {
            causes.push(cause.to_string());
            source = cause.source();
        }

        Self {
            plugin: plugin.to_string(),
            severity,
            message: error.to_string(),
            help: error.help().map(|h| h.to_string()),
            causes,
        }
    }
}

impl std::fmt::Display for HostDiagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.plugin, self.message)
    }
}
