//! Watches the paths a build depends on.
//!
//! The watch set follows the compilation's file and context dependencies and
//! is refreshed after every build, so newly tracked directories are picked up.

use crate::error::Result;
use crate::ui;
use fob_plugin_webfont::Compilation;
use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileChange {
    Modified(PathBuf),
    Created(PathBuf),
    Removed(PathBuf),
}

impl FileChange {
    pub fn path(&self) -> &Path {
        match self {
            FileChange::Modified(p) | FileChange::Created(p) | FileChange::Removed(p) => p,
        }
    }

    pub fn is_removal(&self) -> bool {
        matches!(self, FileChange::Removed(_))
    }
}

/// Split changes into the modified and removed lists a rebuild expects.
///
/// Each path is reported once; its last change decides the list.
pub fn partition(changes: Vec<FileChange>) -> (Vec<PathBuf>, Vec<PathBuf>) {
    let mut modified: Vec<PathBuf> = Vec::new();
    let mut removed: Vec<PathBuf> = Vec::new();

    for change in changes {
        let path = change.path().to_path_buf();
        modified.retain(|p| p != &path);
        removed.retain(|p| p != &path);
        if change.is_removal() {
            removed.push(path);
        } else {
            modified.push(path);
        }
    }

    (modified, removed)
}

/// Debounced watcher over a compilation's dependencies.
///
/// Lives for the whole watch session. Events that arrive while a build runs
/// stay queued in the channel and drive the next rebuild.
pub struct DependencyWatcher {
    watcher: RecommendedWatcher,
    watched: HashMap<PathBuf, RecursiveMode>,
}

impl DependencyWatcher {
    /// Start a watcher with nothing watched yet.
    pub fn new(debounce_ms: u64) -> Result<(Self, mpsc::Receiver<FileChange>)> {
        let (tx, rx) = mpsc::channel(100);

        let debounce_duration = Duration::from_millis(debounce_ms);
        let mut last_event: Option<(PathBuf, Instant)> = None;

        let watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            let Ok(event) = res else {
                return;
            };
            for path in &event.paths {
                let now = Instant::now();
                let repeated = last_event.as_ref().is_some_and(|(last_path, last_time)| {
                    last_path == path && now.duration_since(*last_time) < debounce_duration
                });
                if repeated {
                    continue;
                }
                last_event = Some((path.clone(), now));

                let change = match event.kind {
                    notify::EventKind::Create(_) => FileChange::Created(path.clone()),
                    notify::EventKind::Modify(_) => FileChange::Modified(path.clone()),
                    notify::EventKind::Remove(_) => FileChange::Removed(path.clone()),
                    _ => continue,
                };

                let _ = tx.blocking_send(change);
            }
        })?;

        Ok((
            Self {
                watcher,
                watched: HashMap::new(),
            },
            rx,
        ))
    }

    /// Watch every file dependency and, recursively, every context dependency
    /// of `compilation`, and stop watching paths it no longer lists.
    ///
    /// Paths that cannot be watched are reported and skipped.
    pub fn update(&mut self, compilation: &Compilation) {
        let wanted: HashMap<PathBuf, RecursiveMode> = compilation
            .file_dependencies
            .iter()
            .map(|path| (path.clone(), RecursiveMode::NonRecursive))
            .chain(
                compilation
                    .context_dependencies
                    .iter()
                    .map(|path| (path.clone(), RecursiveMode::Recursive)),
            )
            .collect();

        let stale: Vec<PathBuf> = self
            .watched
            .iter()
            .filter(|(path, mode)| wanted.get(*path) != Some(*mode))
            .map(|(path, _)| path.clone())
            .collect();
        for path in stale {
            self.watched.remove(&path);
            if let Err(e) = self.watcher.unwatch(&path) {
                tracing::debug!("unwatch {}: {}", path.display(), e);
            }
        }

        for (path, mode) in wanted {
            if self.watched.contains_key(&path) {
                continue;
            }
            match self.watcher.watch(&path, mode) {
                Ok(()) => {
                    self.watched.insert(path, mode);
                }
                Err(e) => ui::warning(&format!("Cannot watch {}: {}", path.display(), e)),
            }
        }
    }

    /// Number of paths being watched
    pub fn watched(&self) -> usize {
        self.watched.len()
    }

    pub fn is_watching(&self, path: &Path) -> bool {
        self.watched.contains_key(path)
    }
}
