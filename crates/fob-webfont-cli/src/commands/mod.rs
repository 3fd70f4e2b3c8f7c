//! Command implementations.
//!
//! - [`build`] - One-shot generation
//! - [`watch`] - Regenerate on change until interrupted
//! - [`check`] - Options validation
//!
//! Each command provides an `execute` function taking its parsed arguments.

pub mod build;
pub mod check;
pub mod watch;

pub use build::execute as build_execute;
pub use check::execute as check_execute;
pub use watch::execute as watch_execute;

use crate::cli::BuildArgs;
use crate::config::ResolvedOptions;
use crate::error::Result;
use crate::ui;
use fob_plugin_webfont::{Compilation, NodeGenerator, Severity, WatchStrategy, WebfontPlugin};

/// Plugin running the Node.js generator from the project root.
pub(crate) fn build_plugin(
    resolved: &ResolvedOptions,
    args: &BuildArgs,
    strategy: WatchStrategy,
) -> Result<WebfontPlugin> {
    let generator = NodeGenerator::new(&resolved.root)
        .with_program(args.node.clone())
        .with_timeout(args.timeout);

    let plugin = WebfontPlugin::builder(resolved.options.clone(), generator)
        .with_root(&resolved.root)
        .with_strategy(strategy)
        .build()?;
    Ok(plugin)
}

/// Print a compilation's diagnostics and return how many are errors.
pub(crate) fn report(compilation: &Compilation) -> usize {
    let mut errors = 0;
    for diagnostic in &compilation.diagnostics {
        match diagnostic.severity {
            Severity::Error => {
                errors += 1;
                ui::error(&diagnostic.to_string());
            }
            Severity::Warning => ui::warning(&diagnostic.to_string()),
        }
        for cause in &diagnostic.causes {
            eprintln!("    caused by: {}", cause);
        }
        if let Some(help) = &diagnostic.help {
            eprintln!("    help: {}", help);
        }
    }
    errors
}
