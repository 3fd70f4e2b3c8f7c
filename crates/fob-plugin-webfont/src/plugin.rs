//! The webfont plugin and its lifecycle hooks.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Weak};

use async_trait::async_trait;
use fob_webfont_config::{validate, WebfontOptions};
use parking_lot::Mutex;
use rustc_hash::FxHashSet;
use tracing::{debug, info, warn};

use crate::deps::DependencySet;
use crate::diagnostics::{DiagnosticsSink, TracingSink};
use crate::error::WebfontError;
use crate::generator::{FontGenerator, NodeGenerator};
use crate::host::{Compilation, HookResult, HostDiagnostic, LifecyclePlugin};
use crate::output::{plan_outputs, write_outputs};
use crate::watch::{ChangeDetector, WatchStrategy};
use crate::PLUGIN_NAME;

/// What one successful generation produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationSummary {
    /// Font name as resolved by the generator
    pub font_name: String,
    /// Written files in output order
    pub written: Vec<PathBuf>,
}

#[derive(Debug)]
struct PluginState {
    first_run: bool,
    need_regenerate: bool,
    dependencies: DependencySet,
    /// Diagnostics from out-of-band regenerations, flushed into the next compilation
    pending: Vec<HostDiagnostic>,
    /// Files the last generation wrote; changes to them are not icon changes
    written: FxHashSet<PathBuf>,
    watching: bool,
    generations: usize,
}

impl Default for PluginState {
    fn default() -> Self {
        Self {
            first_run: true,
            need_regenerate: true,
            dependencies: DependencySet::new(),
            pending: Vec::new(),
            written: FxHashSet::default(),
            watching: false,
            generations: 0,
        }
    }
}

struct Inner<G> {
    options: WebfontOptions,
    root: PathBuf,
    generator: G,
    strategy: WatchStrategy,
    sink: Arc<dyn DiagnosticsSink>,
    state: Mutex<PluginState>,
    /// Held for the whole of a generation
    generation: tokio::sync::Mutex<()>,
    detector: Mutex<Option<ChangeDetector>>,
}

/// Generates an icon font from SVG sources as part of a host build.
///
/// Clones share state, so a clone handed to the host and one kept by the
/// caller observe the same dependencies and regeneration flag.
///
/// # Example
///
/// ```no_run
/// use fob_plugin_webfont::{Compilation, LifecyclePlugin, WebfontPlugin};
/// use fob_webfont_config::WebfontOptions;
///
/// # async fn run() -> Result<(), fob_plugin_webfont::WebfontError> {
/// let plugin = WebfontPlugin::new(
///     WebfontOptions::new("icons/*.svg", "dist/fonts").with_template("scss"),
/// )?;
///
/// let mut compilation = Compilation::new(false);
/// plugin.first_build(&mut compilation).await?;
/// plugin.build_finished(&mut compilation).await?;
/// # Ok(())
/// # }
/// ```
pub struct WebfontPlugin<G: FontGenerator = NodeGenerator> {
    inner: Arc<Inner<G>>,
}

impl<G: FontGenerator> Clone for WebfontPlugin<G> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl WebfontPlugin<NodeGenerator> {
    /// Create a plugin that runs the `webfont` npm package from the current
    /// directory.
    ///
    /// Fails with [`WebfontError::Config`] when `files` or `dest` is missing.
    pub fn new(options: WebfontOptions) -> Result<Self, WebfontError> {
        validate(&options)?;
        let root = current_dir();
        let generator = NodeGenerator::new(&root);
        Self::builder(options, generator).with_root(root).build()
    }
}

impl<G: FontGenerator> WebfontPlugin<G> {
    /// Start building a plugin around a custom [`FontGenerator`].
    ///
    /// # Example
    ///
    /// ```no_run
    /// use fob_plugin_webfont::{NodeGenerator, WatchStrategy, WebfontPlugin};
    /// use fob_webfont_config::WebfontOptions;
    ///
    /// # fn run() -> Result<(), fob_plugin_webfont::WebfontError> {
    /// let plugin = WebfontPlugin::builder(
    ///     WebfontOptions::new("icons/*.svg", "dist/fonts"),
    ///     NodeGenerator::new("/srv/app").with_timeout(120),
    /// )
    /// .with_root("/srv/app")
    /// .with_strategy(WatchStrategy::Owned)
    /// .build()?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn builder(options: WebfontOptions, generator: G) -> WebfontPluginBuilder<G> {
        WebfontPluginBuilder {
            options,
            generator,
            root: None,
            strategy: WatchStrategy::default(),
            sink: None,
        }
    }

    /// Run one generation now, outside any hook.
    ///
    /// Waits for an in-flight generation to finish first.
    pub async fn generate(&self) -> Result<GenerationSummary, WebfontError> {
        let _guard = self.inner.generation.lock().await;
        self.inner.generate_locked().await
    }

    /// Options the plugin was built with
    pub fn options(&self) -> &WebfontOptions {
        &self.inner.options
    }

    /// Directory relative paths resolve against
    pub fn root(&self) -> &Path {
        &self.inner.root
    }

    pub fn strategy(&self) -> WatchStrategy {
        self.inner.strategy
    }

    /// Snapshot of what the last successful generation depended on
    pub fn dependencies(&self) -> DependencySet {
        self.inner.state.lock().dependencies.clone()
    }

    /// True when a tracked path changed and the next watch cycle will regenerate.
    pub fn needs_regeneration(&self) -> bool {
        self.inner.state.lock().need_regenerate
    }

    /// Number of successful generations so far
    pub fn generations(&self) -> usize {
        self.inner.state.lock().generations
    }

    /// True while a plugin-owned change detector is armed
    pub fn is_watching(&self) -> bool {
        self.inner
            .detector
            .lock()
            .as_ref()
            .is_some_and(ChangeDetector::is_armed)
    }
}

impl<G: FontGenerator> Inner<G> {
    /// Generate, write and record dependencies. Caller holds `generation`.
    async fn generate_locked(&self) -> Result<GenerationSummary, WebfontError> {
        self.state.lock().need_regenerate = false;

        match self.run().await {
            Ok(summary) => Ok(summary),
            Err(err) => {
                self.state.lock().need_regenerate = true;
                Err(err)
            }
        }
    }

    async fn run(&self) -> Result<GenerationSummary, WebfontError> {
        let options = self
            .options
            .merge_config_file(&self.root)
            .map_err(|source| WebfontError::ExternalConfig { source })?;

        let result = self.generator.generate(&options).await?;
        let writes = plan_outputs(&result, &options, &self.root)?;
        let written = write_outputs(&writes).await?;

        {
            let mut state = self.state.lock();
            state.dependencies.record(&result, &options, &self.root);
            state.written = written.iter().cloned().collect();
            state.generations += 1;
        }

        info!(
            "[fob-webfont] generated '{}' ({} files)",
            result.font_name(),
            written.len()
        );

        Ok(GenerationSummary {
            font_name: result.font_name().to_string(),
            written,
        })
    }

    /// Generate for a hook and apply the bail policy to a failure.
    async fn run_for_hook(&self, compilation: &mut Compilation) -> HookResult {
        let result = {
            let _guard = self.generation.lock().await;
            self.generate_locked().await
        };
        self.settle(result, compilation)
    }

    fn settle(
        &self,
        result: Result<GenerationSummary, WebfontError>,
        compilation: &mut Compilation,
    ) -> HookResult {
        let err = match result {
            Ok(_) => return Ok(()),
            Err(err) => err,
        };

        let bail = self.options.bail.unwrap_or(compilation.bail);
        if bail && err.is_build_failure() {
            return Err(err);
        }

        warn!("[fob-webfont] {}", err);
        compilation.push_error(PLUGIN_NAME, &err);
        Ok(())
    }

    fn flush_pending(&self, compilation: &mut Compilation) {
        let pending = std::mem::take(&mut self.state.lock().pending);
        compilation.diagnostics.extend(pending);
    }

    /// Replace the owned detector with one armed on the current dependencies.
    fn arm_detector(self: &Arc<Self>) {
        let mut slot = self.detector.lock();
        if let Some(mut previous) = slot.take() {
            previous.close();
        }

        let dependencies = {
            let state = self.state.lock();
            if !state.watching {
                return;
            }
            state.dependencies.clone()
        };

        let handle = tokio::runtime::Handle::try_current().ok();
        let weak: Weak<Self> = Arc::downgrade(self);

        let detector = ChangeDetector::arm(&dependencies, Arc::clone(&self.sink), move |path| {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            debug!(
                "[fob-webfont] {} changed, regenerating",
                path.display()
            );
            inner.state.lock().need_regenerate = true;
            if let Some(handle) = handle {
                handle.spawn(inner.regenerate_out_of_band());
            }
        });

        *slot = Some(detector);
    }

    /// Regenerate in response to the owned detector.
    ///
    /// Skipped while another generation runs; `need_regenerate` stays set and
    /// the next watch cycle picks it up.
    async fn regenerate_out_of_band(self: Arc<Self>) {
        let result = {
            let Ok(_guard) = self.generation.try_lock() else {
                debug!("[fob-webfont] generation in flight, deferring change");
                return;
            };
            if !self.state.lock().need_regenerate {
                return;
            }
            self.generate_locked().await
        };

        if let Err(err) = result {
            warn!("[fob-webfont] {}", err);
            let diagnostic = HostDiagnostic::from_error(PLUGIN_NAME, &err);
            {
                // Reported through `pending`; only a new change should retry
                let mut state = self.state.lock();
                state.need_regenerate = false;
                if !state.pending.contains(&diagnostic) {
                    state.pending.push(diagnostic.clone());
                }
            }
            self.sink.report(diagnostic);
        }

        self.arm_detector();
    }

    fn close_detector(&self) {
        self.state.lock().watching = false;
        if let Some(mut detector) = self.detector.lock().take() {
            detector.close();
        }
    }
}

#[async_trait]
impl<G: FontGenerator> LifecyclePlugin for WebfontPlugin<G> {
    fn name(&self) -> &'static str {
        PLUGIN_NAME
    }

    async fn first_build(&self, compilation: &mut Compilation) -> HookResult {
        self.inner.flush_pending(compilation);
        self.inner.run_for_hook(compilation).await
    }

    async fn watch_cycle(&self, compilation: &mut Compilation) -> HookResult {
        let first = {
            let mut state = self.inner.state.lock();
            state.watching = true;
            std::mem::replace(&mut state.first_run, false)
        };
        if first {
            self.inner.flush_pending(compilation);
            return self.inner.run_for_hook(compilation).await;
        }

        // A generation started out of band must finish before deciding
        let guard = self.inner.generation.lock().await;
        self.inner.flush_pending(compilation);

        let regenerate = {
            let mut state = self.inner.state.lock();
            if self.inner.strategy == WatchStrategy::Host {
                let changed = compilation
                    .changed_paths()
                    .filter(|path| !state.written.contains(*path));
                if let Some(path) = state.dependencies.first_tracked(changed) {
                    debug!("[fob-webfont] dependency changed: {}", path.display());
                    state.need_regenerate = true;
                }
            }
            state.need_regenerate
        };

        if !regenerate {
            debug!("[fob-webfont] no icon changes, skipping generation");
            return Ok(());
        }

        let result = self.inner.generate_locked().await;
        drop(guard);
        self.inner.settle(result, compilation)
    }

    async fn build_finished(&self, compilation: &mut Compilation) -> HookResult {
        let dependencies = self.dependencies();
        dependencies.export_to(
            &mut compilation.file_dependencies,
            &mut compilation.context_dependencies,
        );

        if self.inner.strategy == WatchStrategy::Owned {
            self.inner.arm_detector();
        }
        Ok(())
    }

    async fn watch_closed(&self) {
        self.inner.close_detector();
        debug!("[fob-webfont] watch closed");
    }
}

/// Builder for [`WebfontPlugin`] with a custom generator.
pub struct WebfontPluginBuilder<G> {
    options: WebfontOptions,
    generator: G,
    root: Option<PathBuf>,
    strategy: WatchStrategy,
    sink: Option<Arc<dyn DiagnosticsSink>>,
}

impl<G: FontGenerator> WebfontPluginBuilder<G> {
    /// Directory relative destinations and sources resolve against
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    /// Choose who watches the dependencies. Defaults to [`WatchStrategy::Host`].
    pub fn with_strategy(mut self, strategy: WatchStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Where out-of-band diagnostics go besides the next compilation.
    ///
    /// Defaults to [`TracingSink`].
    pub fn with_sink(mut self, sink: impl DiagnosticsSink + 'static) -> Self {
        self.sink = Some(Arc::new(sink));
        self
    }

    /// Validate the options and create the plugin.
    ///
    /// The directories the `files` patterns search are tracked from the start,
    /// so a first build that fails still has something to watch.
    pub fn build(self) -> Result<WebfontPlugin<G>, WebfontError> {
        validate(&self.options)?;

        let root = self.root.unwrap_or_else(current_dir);
        let mut state = PluginState::default();
        state.dependencies.seed_sources(&self.options, &root);

        Ok(WebfontPlugin {
            inner: Arc::new(Inner {
                options: self.options,
                root,
                generator: self.generator,
                strategy: self.strategy,
                sink: self.sink.unwrap_or_else(|| Arc::new(TracingSink)),
                state: Mutex::new(state),
                generation: tokio::sync::Mutex::new(()),
                detector: Mutex::new(None),
            }),
        })
    }
}

fn current_dir() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}
