//! snipmark - search captured pages and re-find snippets in them
//!
//! Talks to the search/index backend and drives the relocator against local
//! pages.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod cli;
mod commands;

use cli::{Cli, Commands};
use snipmark_core::Config;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("snipmark=info,snipmark_core=info"));
    if cli.log_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr))
            .with(filter)
            .init();
    }

    // Load configuration
    let config = Config::load()?;

    // Execute command
    match cli.command {
        Commands::Search { query, json } => commands::search::execute(&query, json, &config).await,
        Commands::Index { file, url, title } => {
            commands::index::execute(&file, &url, title, &config).await
        }
        Commands::Locate {
            file,
            snippet,
            scope,
            json,
        } => commands::locate::execute(&file, &snippet, scope.into(), json, &config),
        Commands::Open { file, url, snippet } => {
            commands::open::execute(&file, &url, &snippet, &config).await
        }
        Commands::Config { path } => commands::config::execute(path, &config),
        Commands::Version => {
            println!("snipmark {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
