//! Plugin-owned change detection.
//!
//! Used with [`WatchStrategy::Owned`] when the host does not report which
//! files changed between rebuilds.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::deps::DependencySet;
use crate::diagnostics::DiagnosticsSink;
use crate::error::WebfontError;
use crate::host::HostDiagnostic;
use crate::PLUGIN_NAME;

/// How the plugin learns that its dependencies changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WatchStrategy {
    /// The host reports changed paths on each watch cycle
    #[default]
    Host,
    /// The plugin watches its dependencies itself and regenerates out of band
    Owned,
}

/// A one-shot watcher over a [`DependencySet`].
///
/// The first create, modify or remove event under a tracked path invokes the
/// callback. Later events are ignored; arm a new detector to watch again.
pub struct ChangeDetector {
    watcher: Option<RecommendedWatcher>,
    fired: Arc<AtomicBool>,
}

impl ChangeDetector {
    /// Start watching every tracked file and context directory.
    ///
    /// Paths that cannot be watched are reported to `sink` and skipped.
    pub fn arm<F>(deps: &DependencySet, sink: Arc<dyn DiagnosticsSink>, on_change: F) -> Self
    where
        F: FnOnce(PathBuf) + Send + 'static,
    {
        let fired = Arc::new(AtomicBool::new(false));
        let callback = Mutex::new(Some(on_change));
        let fired_flag = Arc::clone(&fired);
        let event_sink = Arc::clone(&sink);

        let handler = move |res: notify::Result<Event>| match res {
            Ok(event) => {
                if !matches!(
                    event.kind,
                    EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
                ) {
                    return;
                }
                let Some(path) = event.paths.first().cloned() else {
                    return;
                };
                if fired_flag.swap(true, Ordering::SeqCst) {
                    return;
                }
                if let Some(callback) = callback.lock().take() {
                    debug!("[fob-webfont] change detected: {}", path.display());
                    callback(path);
                }
            }
            Err(err) => report(event_sink.as_ref(), WebfontError::watch(None, err)),
        };

        let mut watcher = match notify::recommended_watcher(handler) {
            Ok(watcher) => watcher,
            Err(err) => {
                report(sink.as_ref(), WebfontError::watch(None, err));
                return Self {
                    watcher: None,
                    fired,
                };
            }
        };

        let targets = deps
            .files()
            .map(|path| (path, RecursiveMode::NonRecursive))
            .chain(deps.contexts().map(|path| (path, RecursiveMode::Recursive)));

        for (path, mode) in targets {
            if let Err(err) = watcher.watch(path, mode) {
                report(
                    sink.as_ref(),
                    WebfontError::watch(Some(path.to_path_buf()), err),
                );
            }
        }

        Self {
            watcher: Some(watcher),
            fired,
        }
    }

    /// Stop watching. Safe to call more than once.
    pub fn close(&mut self) {
        self.fired.store(true, Ordering::SeqCst);
        if self.watcher.take().is_some() {
            debug!("[fob-webfont] change detector closed");
        }
    }

    /// True while watching and not yet fired
    pub fn is_armed(&self) -> bool {
        self.watcher.is_some() && !self.fired.load(Ordering::SeqCst)
    }
}

impl Drop for ChangeDetector {
    fn drop(&mut self) {
        self.close();
    }
}

impl std::fmt::Debug for ChangeDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeDetector")
            .field("armed", &self.is_armed())
            .finish()
    }
}

fn report(sink: &dyn DiagnosticsSink, error: WebfontError) {
    warn!("[fob-webfont] {}", error);
    sink.report(HostDiagnostic::from_error(PLUGIN_NAME, &error));
}
