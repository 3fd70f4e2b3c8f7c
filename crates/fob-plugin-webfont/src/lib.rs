//! Icon webfont generation for fob builds.
//!
//! The plugin hands its options to a [`FontGenerator`], writes the font files
//! and stylesheet it returns, and tracks the icon directories so watch-mode
//! rebuilds regenerate only when icons change.
//!
//! ## Lifecycle
//!
//! ```text
//! first_build / watch_cycle → generate → plan_outputs → write_outputs
//!                                              ↓
//! build_finished → export DependencySet → host watches icon dirs
//! ```
//!
//! A watch cycle whose changed paths miss every tracked file and directory
//! skips generation entirely.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use fob_plugin_webfont::{Compilation, LifecyclePlugin, WebfontPlugin};
//! use fob_webfont_config::WebfontOptions;
//! use serde_json::json;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let options = WebfontOptions::from_value(json!({
//!     "files": "src/icons/**/*.svg",
//!     "dest": { "fontsDir": "dist/fonts", "stylesDir": "src/styles" },
//!     "template": "scss",
//!     "fontName": "app-icons"
//! }))?;
//!
//! let plugin = WebfontPlugin::new(options)?;
//! let mut compilation = Compilation::new(true);
//! plugin.first_build(&mut compilation).await?;
//! plugin.build_finished(&mut compilation).await?;
//! # Ok(())
//! # }
//! ```

mod deps;
mod diagnostics;
mod error;
mod generator;
mod host;
mod output;
mod plugin;
mod watch;

pub use deps::{DependencyCollection, DependencySet};
pub use diagnostics::{CollectingSink, DiagnosticsSink, TracingSink};
pub use error::WebfontError;
pub use generator::{
    FontGenerator, GenerationResult, NamedBuffer, NodeGenerator, OutputContent, ResolvedConfig,
    SourceRef,
};
pub use host::{Compilation, HookResult, HostDiagnostic, LifecyclePlugin, Severity};
pub use output::{plan_outputs, write_outputs, OutputKind, PlannedWrite};
pub use plugin::{GenerationSummary, WebfontPlugin, WebfontPluginBuilder};
pub use watch::{ChangeDetector, WatchStrategy};

pub use fob_webfont_config as config;

/// Name the plugin reports diagnostics under
pub const PLUGIN_NAME: &str = "webfont-plugin";
