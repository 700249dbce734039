//! Command implementations for snipmark CLI.
//!
//! Each submodule implements one subcommand.

pub mod config;
pub mod index;
pub mod locate;
pub mod open;
pub mod search;

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;

use snipmark_core::status::{StatusKind, StatusLine};
use snipmark_core::Document;

/// Read a plain-text page and build its document.
///
/// The document title is `title` when given, else the file stem.
pub(crate) fn load_page(path: &Path, title: Option<&str>) -> Result<Document> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read page {}", path.display()))?;
    let title = title.map(str::to_string).unwrap_or_else(|| page_title(path));
    Ok(Document::from_text(title, &text))
}

pub(crate) fn page_title(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "untitled".to_string())
}

pub(crate) fn print_status(line: &StatusLine) {
    let text = match line.kind {
        StatusKind::Info => line.text.cyan(),
        StatusKind::Success => line.text.green(),
        StatusKind::Error => line.text.red(),
    };
    println!("{}", text);
}
