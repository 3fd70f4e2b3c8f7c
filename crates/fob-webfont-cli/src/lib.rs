//! Command-line host for the webfont plugin.
//!
//! Runs [`fob_plugin_webfont::WebfontPlugin`] through a small build driver so
//! icon fonts can be generated without a full bundler:
//!
//! - [`cli`] - Argument definitions
//! - [`config`] - Options file discovery and flag overrides
//! - [`driver`] - Lifecycle host
//! - [`watcher`] - Dependency watching for `watch`
//! - [`error`], [`logger`], [`ui`] - Ambient plumbing
//!
//! # Example
//!
//! ```no_run
//! use fob_webfont_cli::{cli::OptionArgs, config};
//!
//! let args = OptionArgs {
//!     files: vec!["icons/*.svg".to_string()],
//!     dest: Some("dist/fonts".into()),
//!     ..OptionArgs::default()
//! };
//! let resolved = config::resolve(&args)?;
//! assert_eq!(resolved.options.files.patterns(), vec!["icons/*.svg"]);
//! # Ok::<(), fob_webfont_cli::CliError>(())
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod driver;
pub mod error;
pub mod logger;
pub mod ui;
pub mod watcher;

pub use error::{CliError, Result};
