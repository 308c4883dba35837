//! Validate a configuration file

use crate::util;
use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use pollwatch_core::{HandlerRegistry, WatchConfig};
use std::path::Path;

pub async fn run(config_path: &Path) -> Result<()> {
    let config = WatchConfig::load(config_path)
        .with_context(|| format!("Invalid configuration {}", config_path.display()))?;
    let registry = HandlerRegistry::from_config(&config)?;

    println!("{}", "Configuration".bold());
    println!("{}: {}\n", "Location".dimmed(), config_path.display().dimmed());

    util::print_handlers(&registry, &config.exclude);

    println!(
        "\n{} {} handler(s) OK",
        "✓".green(),
        registry.len()
    );
    Ok(())
}
