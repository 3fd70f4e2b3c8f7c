//! `fob-webfont watch`: regenerate on change until Ctrl+C.
//!
//! One watcher runs for the whole session. After each build its watch set is
//! refreshed from the dependencies the plugin exported.

use crate::cli::WatchArgs;
use crate::commands::{build_plugin, report};
use crate::config;
use crate::driver::BuildDriver;
use crate::error::Result;
use crate::ui;
use crate::watcher::{partition, DependencyWatcher, FileChange};
use fob_plugin_webfont::{Compilation, WatchStrategy};
use std::time::Duration;
use tokio::signal;
use tokio::sync::mpsc;

/// Execute the watch command.
///
/// Build failures are reported and watching continues.
pub async fn execute(args: WatchArgs) -> Result<()> {
    let resolved = config::resolve(&args.build.options)?;
    let strategy = WatchStrategy::from(args.strategy);

    let plugin = build_plugin(&resolved, &args.build, strategy)?;
    let driver = BuildDriver::new(args.build.bail).with_plugin(plugin);

    ui::info("Generating webfont...");
    let mut last = match driver.watch_cycle(Vec::new(), Vec::new()).await {
        Ok(compilation) => {
            announce(&compilation);
            compilation
        }
        Err(e) => {
            driver.close().await;
            return Err(e);
        }
    };

    if strategy == WatchStrategy::Owned {
        ui::info("The plugin watches its own dependencies");
    }

    let (mut watcher, mut rx) = DependencyWatcher::new(args.debounce)?;
    watcher.update(&last);
    tracing::debug!("watching {} path(s)", watcher.watched());
    ui::info("Press Ctrl+C to stop");

    loop {
        tokio::select! {
            Some(change) = rx.recv() => {
                let changes = collect_batch(change, &mut rx, args.debounce).await;
                let (modified, removed) = partition(changes);

                // The watcher keeps running, so edits made during this build
                // are queued for the next one
                match driver.watch_cycle(modified, removed).await {
                    Ok(compilation) => {
                        announce(&compilation);
                        last = compilation;
                        watcher.update(&last);
                    }
                    Err(e) => ui::error(&format!("Build aborted: {}", e)),
                }
            }
            _ = signal::ctrl_c() => {
                ui::info("Shutting down...");
                break;
            }
        }
    }

    driver.close().await;
    Ok(())
}

/// Gather events arriving within the debounce window into one rebuild.
async fn collect_batch(
    first: FileChange,
    rx: &mut mpsc::Receiver<FileChange>,
    debounce_ms: u64,
) -> Vec<FileChange> {
    tokio::time::sleep(Duration::from_millis(debounce_ms)).await;

    let mut changes = vec![first];
    while let Ok(change) = rx.try_recv() {
        changes.push(change);
    }
    changes
}

fn announce(compilation: &Compilation) {
    if report(compilation) == 0 {
        ui::success("Webfont is up to date");
    }
}
