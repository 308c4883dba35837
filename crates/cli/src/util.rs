//! Shared utilities for CLI commands

use owo_colors::OwoColorize;
use pollwatch_core::HandlerRegistry;
use tracing_subscriber::EnvFilter;

/// Install the stderr diagnostics subscriber
///
/// `RUST_LOG` wins when set; otherwise only warnings are shown, or debug
/// output from pollwatch itself with `--verbose`.
pub fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "warn,pollwatch=debug,pollwatch_core=debug,pollwatch_watcher=debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Print handlers in registration order, then exclude patterns
pub fn print_handlers(registry: &HandlerRegistry, exclude: &[String]) {
    println!("{}", "[handlers]".yellow());
    for (index, rule) in registry.rules().iter().enumerate() {
        println!(
            "  {} {} {} {} {}",
            format!("#{}", index + 1).dimmed(),
            rule.pattern().cyan(),
            format!("[{}]", rule.actions()).dimmed(),
            "->".dimmed(),
            rule.script().display()
        );
    }

    if !exclude.is_empty() {
        println!("{}", "[exclude]".yellow());
        for pattern in exclude {
            println!("  {}", pattern.cyan());
        }
    }
}
