//! A minimal host that drives lifecycle plugins.

use std::path::PathBuf;
use std::sync::Arc;

use fob_plugin_webfont::{Compilation, LifecyclePlugin};
use tracing::debug;

use crate::error::Result;

/// Runs every registered plugin through the build lifecycle.
///
/// Plugins run in registration order. A hook error aborts the build and is
/// returned as is.
pub struct BuildDriver {
    plugins: Vec<Arc<dyn LifecyclePlugin>>,
    bail: bool,
}

impl BuildDriver {
    pub fn new(bail: bool) -> Self {
        Self {
            plugins: Vec::new(),
            bail,
        }
    }

    pub fn with_plugin(mut self, plugin: impl LifecyclePlugin + 'static) -> Self {
        self.plugins.push(Arc::new(plugin));
        self
    }

    pub fn bail(&self) -> bool {
        self.bail
    }

    /// One-shot build
    pub async fn run(&self) -> Result<Compilation> {
        let mut compilation = Compilation::new(self.bail);
        for plugin in &self.plugins {
            debug!("first_build: {}", plugin.name());
            plugin.first_build(&mut compilation).await?;
        }
        self.finish(&mut compilation).await?;
        Ok(compilation)
    }

    /// One watch-mode rebuild for the given changes
    pub async fn watch_cycle(
        &self,
        modified: Vec<PathBuf>,
        removed: Vec<PathBuf>,
    ) -> Result<Compilation> {
        let mut compilation = Compilation::rebuild(self.bail, modified, removed);
        for plugin in &self.plugins {
            debug!("watch_cycle: {}", plugin.name());
            plugin.watch_cycle(&mut compilation).await?;
        }
        self.finish(&mut compilation).await?;
        Ok(compilation)
    }

    /// End watch mode
    pub async fn close(&self) {
        for plugin in &self.plugins {
            plugin.watch_closed().await;
        }
    }

    async fn finish(&self, compilation: &mut Compilation) -> Result<()> {
        for plugin in &self.plugins {
            plugin.build_finished(compilation).await?;
        }
        Ok(())
    }
}
