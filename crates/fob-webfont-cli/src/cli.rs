//! Command-line interface definition.
//!
//! - `fob-webfont build` - Generate the webfont once
//! - `fob-webfont watch` - Regenerate whenever icons change
//! - `fob-webfont check` - Validate options without generating

use clap::{Args, Parser, Subcommand, ValueEnum};
use fob_plugin_webfont::WatchStrategy;
use std::path::PathBuf;

/// Generate icon webfonts from SVG files
#[derive(Parser, Debug)]
#[command(
    name = "fob-webfont",
    version,
    about = "Generate icon webfonts and stylesheets from SVG icons",
    long_about = "Runs the webfont plugin the way a fob build would: one-shot with `build`,\n\
                  or as a long-running watcher with `watch` that regenerates only when\n\
                  icons, the external config or a custom template change."
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate fonts and stylesheet once
    Build(BuildArgs),

    /// Generate, then regenerate on icon changes until Ctrl+C
    Watch(WatchArgs),

    /// Validate options and referenced files
    Check(CheckArgs),
}

/// Options shared by every command
///
/// Flags override values from the options file.
#[derive(Args, Debug, Clone, Default)]
pub struct OptionArgs {
    /// Options file (default: webfont.toml, webfont.json, .webfontrc or package.json "webfont")
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Project root; relative paths resolve against it
    #[arg(long, value_name = "DIR")]
    pub cwd: Option<PathBuf>,

    /// Glob matching the SVG icons (repeatable)
    #[arg(short, long = "files", value_name = "GLOB")]
    pub files: Vec<String>,

    /// Output directory for fonts and stylesheet
    #[arg(short, long, value_name = "DIR")]
    pub dest: Option<PathBuf>,

    /// Built-in template (css, scss, sass, less, styl, json) or template file
    #[arg(short, long)]
    pub template: Option<String>,

    /// Directory the stylesheet is written to
    #[arg(long, value_name = "DIR")]
    pub dest_template: Option<PathBuf>,

    #[arg(long)]
    pub font_name: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct BuildArgs {
    #[command(flatten)]
    pub options: OptionArgs,

    /// Abort on the first generation error
    #[arg(long)]
    pub bail: bool,

    /// Node.js executable used to run the `webfont` package
    #[arg(long, default_value = "node", value_name = "PATH")]
    pub node: String,

    /// Generator timeout in seconds
    #[arg(long, default_value_t = 60, value_name = "SECS")]
    pub timeout: u64,
}

#[derive(Args, Debug, Clone)]
pub struct WatchArgs {
    #[command(flatten)]
    pub build: BuildArgs,

    /// Delay in milliseconds used to batch file events into one rebuild
    #[arg(long, default_value_t = 100, value_name = "MS")]
    pub debounce: u64,

    /// Who detects icon changes
    #[arg(long, value_enum, default_value_t = StrategyArg::Host)]
    pub strategy: StrategyArg,
}

#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    #[command(flatten)]
    pub options: OptionArgs,

    /// Print the resolved options as JSON
    #[arg(long)]
    pub print: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyArg {
    /// This CLI watches dependencies and reports changes to the plugin
    Host,
    /// The plugin watches its own dependencies
    Owned,
}

impl From<StrategyArg> for WatchStrategy {
    fn from(value: StrategyArg) -> Self {
        match value {
            StrategyArg::Host => WatchStrategy::Host,
            StrategyArg::Owned => WatchStrategy::Owned,
        }
    }
}
