//! `fob-webfont check`: validate options without generating.

use crate::cli::CheckArgs;
use crate::config;
use crate::error::Result;
use crate::ui;
use fob_webfont_config::validate_fs;

/// Execute the check command.
///
/// Loads options the same way `build` does, then checks that the files
/// they reference exist.
pub async fn execute(args: CheckArgs) -> Result<()> {
    ui::info("Checking options...");

    let resolved = config::resolve(&args.options)?;
    match &resolved.source {
        Some(source) => ui::info(&format!("Loaded {}", source.display())),
        None => ui::warning("No options file found, using command-line flags only"),
    }

    validate_fs(&resolved.options, &resolved.root)?;

    for pattern in resolved.options.files.patterns() {
        ui::success(&format!("  files: {}", pattern));
    }
    if let Some(dest) = &resolved.options.dest {
        ui::success(&format!("  fonts: {}", dest.fonts_dir().display()));
    }

    if args.print {
        println!("{}", serde_json::to_string_pretty(&resolved.options)?);
    }

    ui::success("Options are valid!");
    Ok(())
}
