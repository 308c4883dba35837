//! pollwatch CLI

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cmd;
mod util;

/// pollwatch - run scripts when files in a directory change
#[derive(Parser)]
#[command(name = "pollwatch")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable debug diagnostics on stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Watch a directory and run handler scripts on changes
    Watch {
        /// Handler configuration file (.toml or .json)
        config: PathBuf,
        /// Directory to watch
        path: PathBuf,
        /// Include subfolders
        #[arg(short, long)]
        recursive: bool,
        /// Append log lines to this file instead of stdout
        #[arg(long)]
        log_file: Option<PathBuf>,
    },
    /// Validate a configuration file and list its handlers
    Check {
        /// Handler configuration file (.toml or .json)
        config: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    util::init_tracing(cli.verbose);

    match cli.command {
        Commands::Watch {
            config,
            path,
            recursive,
            log_file,
        } => cmd::watch::run(&config, &path, recursive, log_file.as_deref()).await,
        Commands::Check { config } => cmd::check::run(&config).await,
    }
}
