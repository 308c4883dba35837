//! Watch a directory until interrupted

use crate::util;
use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use pollwatch_core::{HandlerRegistry, WatchConfig};
use pollwatch_watcher::{FileSink, LogSink, StdoutSink, Watcher};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

pub async fn run(
    config_path: &Path,
    root: &Path,
    recursive: bool,
    log_file: Option<&Path>,
) -> Result<()> {
    let config = WatchConfig::load(config_path)
        .with_context(|| format!("Failed to load configuration from {}", config_path.display()))?;
    let registry = HandlerRegistry::from_config(&config)?;
    info!(
        "Loaded {} handler(s) from {}",
        registry.len(),
        config_path.display()
    );

    let sink: Arc<dyn LogSink> = match log_file {
        Some(path) => Arc::new(
            FileSink::open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?,
        ),
        None => Arc::new(StdoutSink),
    };

    let mut watcher = Watcher::builder(root)
        .recursive(recursive)
        .exclude(config.exclude.iter().cloned())
        .sink(sink)
        .build(registry.clone())?;

    watcher
        .start()
        .with_context(|| format!("Failed to start watching {}", root.display()))?;

    println!(
        "{} {} {}",
        "Watching".green().bold(),
        root.display(),
        if recursive { "(recursive)".dimmed().to_string() } else { String::new() }
    );
    util::print_handlers(&registry, &config.exclude);
    if let Some(path) = log_file {
        println!("{}: {}", "Log".dimmed(), path.display());
    }
    println!("{}", "Press Ctrl-C to stop".dimmed());

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl-C")?;

    println!("{}", "Stopping...".yellow());

    // stop() joins the polling thread, which may be waiting on a script
    tokio::task::spawn_blocking(move || watcher.stop())
        .await
        .context("Stop task failed")??;

    println!("{} Stopped", "✓".green());
    Ok(())
}
