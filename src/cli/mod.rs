//! CLI Module for snip
//! Argument parsing and dispatch. Every command opens the snippet store,
//! runs one operation sequence against it and prints the outcome.

pub mod clipboard;
pub mod commands;
pub mod editor;
pub mod render;

use crate::config::Config;
use crate::models::SnippetStore;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;

#[derive(Debug, Parser)]
#[command(
    name = "snip",
    version,
    about = "snip is a fast CLI code snippet manager",
    long_about = "A fast command-line tool to save, search, view, and reuse your code snippets, all from your terminal."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Save a snippet from stdin
    Save {
        title: String,
        /// Comma-separated tags
        #[arg(short, long, default_value = "")]
        tags: String,
    },
    /// Save a snippet using interactive prompts
    SaveInteractive,
    /// List all snippets
    List,
    /// Search snippets by title, tags, or content
    Search {
        query: String,
        /// Only show snippets carrying this tag
        #[arg(short, long, default_value = "")]
        tag: String,
    },
    /// Print snippet content to stdout
    Cat { id: String },
    /// Copy snippet content to clipboard
    Copy { id: String },
    /// Edit a snippet in your default editor
    Edit { id: String },
    /// Delete a snippet
    Delete {
        id: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
    /// Export snippets to JSON, Markdown, or plain text
    Export {
        /// Export format (json, markdown, text)
        #[arg(short, long, default_value = "json")]
        format: String,
        /// Output file path (default: auto-generated)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Import snippets from a JSON export file
    Import {
        file: Option<PathBuf>,
        /// File to import from
        #[arg(short = 'f', long = "file")]
        file_flag: Option<PathBuf>,
        /// Skip confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Show statistics about your snippets
    Stats,
    /// Initialize the snip database
    Init,
    /// Show version information
    Version,
}

/// Runs one parsed command.
///
/// Only failing to open the database is returned as an error. Problems
/// inside a command are printed and the process still exits cleanly.
pub fn execute(cli: Cli, config: &Config) -> color_eyre::Result<()> {
    debug!(command = ?cli.command, db = %config.db_path.display(), "dispatching");

    let result = match cli.command {
        Commands::Version => {
            commands::version(config);
            Ok(())
        }
        Commands::Init => {
            let existed = config.data_dir().exists();
            let store = SnippetStore::open(&config.db_path)?;
            commands::init(config, &store, existed)
        }
        command => {
            let store = SnippetStore::open(&config.db_path)?;
            run(command, &store)
        }
    };

    if let Err(e) = result {
        render::error(&format!("{:#}", e));
    }

    Ok(())
}

fn run(command: Commands, store: &SnippetStore) -> anyhow::Result<()> {
    match command {
        Commands::Save { title, tags } => commands::save(store, &title, &tags),
        Commands::SaveInteractive => commands::save_interactive(store),
        Commands::List => commands::list(store),
        Commands::Search { query, tag } => commands::search(store, &query, &tag),
        Commands::Cat { id } => commands::cat(store, &id),
        Commands::Copy { id } => commands::copy(store, &id),
        Commands::Edit { id } => commands::edit(store, &id),
        Commands::Delete { id, force } => commands::delete(store, &id, force),
        Commands::Export { format, output } => commands::export(store, &format, output),
        Commands::Import {
            file,
            file_flag,
            yes,
        } => commands::import(store, file.or(file_flag).unwrap_or_default(), yes),
        Commands::Stats => commands::stats(store),
        // Handled in `execute` without going through here
        Commands::Init | Commands::Version => Ok(()),
    }
}
