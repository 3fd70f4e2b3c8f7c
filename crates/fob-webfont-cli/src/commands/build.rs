//! `fob-webfont build`: generate the font once.

use crate::cli::BuildArgs;
use crate::commands::{build_plugin, report};
use crate::config;
use crate::driver::BuildDriver;
use crate::error::{CliError, Result};
use crate::ui;
use fob_plugin_webfont::WatchStrategy;
use std::time::Instant;

/// Execute the build command.
///
/// Generation errors are printed as diagnostics. Unless `--bail` (or the
/// options' own `bail`) aborted the build first, the command still fails when
/// any error was reported.
pub async fn execute(args: BuildArgs) -> Result<()> {
    let start_time = Instant::now();

    ui::info("Loading options...");
    let resolved = config::resolve(&args.options)?;
    if let Some(source) = &resolved.source {
        ui::info(&format!("Using {}", source.display()));
    }

    let plugin = build_plugin(&resolved, &args, WatchStrategy::Host)?;
    let driver = BuildDriver::new(args.bail).with_plugin(plugin.clone());

    ui::info("Generating webfont...");
    let compilation = driver.run().await?;

    let errors = report(&compilation);
    if errors > 0 {
        return Err(CliError::BuildFailed { errors });
    }

    let dependencies = plugin.dependencies();
    ui::success(&format!(
        "Webfont generated in {}ms ({} tracked path(s))",
        start_time.elapsed().as_millis(),
        dependencies.files().count() + dependencies.contexts().count()
    ));
    Ok(())
}
