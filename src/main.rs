//! snip - Terminal Code Snippet Manager
//!
//! A command-line tool for saving, searching and reusing code snippets.
//! Snippets live in a local SQLite database (`~/.snipdb/snippets.db` unless
//! `SNIP_DB_PATH` says otherwise).

use clap::Parser;
use color_eyre::Result;
use tracing_subscriber::EnvFilter;

mod cli;
mod config;
mod models;

use cli::Cli;
use config::Config;

/// Diagnostics go to stderr so `snip cat` output stays pipe friendly
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing();

    let cli = Cli::parse();
    let config = Config::from_env();

    cli::execute(cli, &config)
}
