//! CLI argument definitions using clap derive macros.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use snipmark_core::HighlightScope;

/// Search captured pages and re-find snippets in them
#[derive(Parser, Debug)]
#[command(name = "snipmark")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Emit logs as JSON lines
    #[arg(long, global = true, env = "SNIPMARK_LOG_JSON")]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Query the search backend
    Search {
        /// Search text
        query: String,

        /// Print raw results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Extract a text page and submit it for indexing
    Index {
        /// Page file (plain text, blank-line separated blocks)
        file: PathBuf,

        /// Address the page was captured from
        #[arg(long)]
        url: String,

        /// Page title (defaults to the file name)
        #[arg(long)]
        title: Option<String>,
    },

    /// Find and highlight a snippet in a local page
    Locate {
        /// Page file
        file: PathBuf,

        /// Snippet text to re-find
        #[arg(long, short)]
        snippet: String,

        /// How much of the page to highlight
        #[arg(long, value_enum, default_value_t = ScopeArg::Exact)]
        scope: ScopeArg,

        /// Print the outcome as JSON
        #[arg(long)]
        json: bool,
    },

    /// Open a page on an in-memory surface and run the full relocation flow
    Open {
        /// Page file
        file: PathBuf,

        /// Address to serve the page under
        #[arg(long)]
        url: String,

        /// Snippet text to re-find
        #[arg(long, short)]
        snippet: String,
    },

    /// Show effective configuration
    Config {
        /// Print the config file path only
        #[arg(long)]
        path: bool,
    },

    /// Show version information
    Version,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ScopeArg {
    /// Wrap the matched text in a mark
    Exact,
    /// Highlight the enclosing paragraph, list item or heading
    Block,
}

impl From<ScopeArg> for HighlightScope {
    fn from(scope: ScopeArg) -> Self {
        match scope {
            ScopeArg::Exact => HighlightScope::ExactSpan,
            ScopeArg::Block => HighlightScope::ContainingBlock,
        }
    }
}
