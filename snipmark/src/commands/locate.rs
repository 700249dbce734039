//! Relocate a snippet in a local page.

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use std::path::Path;

use snipmark_core::dom::ContentDocument;
use snipmark_core::{Config, Document, HighlightScope, RelocationOutcome, Relocator};

use super::load_page;

#[derive(Debug, Serialize)]
struct LocateReport<'a> {
    #[serde(flatten)]
    outcome: &'a RelocationOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

pub fn execute(
    file: &Path,
    snippet: &str,
    scope: HighlightScope,
    json: bool,
    config: &Config,
) -> Result<()> {
    let mut doc = load_page(file, None)?;
    let outcome = Relocator::new(&config.relocator).locate(&mut doc, snippet, scope);

    if json {
        let report = LocateReport {
            outcome: &outcome,
            text: outcome.node().map(|node| doc.text_content(node)),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_outcome(&doc, &outcome);
    Ok(())
}

pub(crate) fn print_outcome(doc: &Document, outcome: &RelocationOutcome) {
    let label = match outcome {
        RelocationOutcome::Marked { .. } => "Marked".green().bold(),
        RelocationOutcome::Block { .. } => "Highlighted block".green().bold(),
        RelocationOutcome::ScrolledOnly { .. } => "Scrolled to match".yellow().bold(),
        RelocationOutcome::NotFound => {
            println!("{}", "Snippet not found".red());
            return;
        }
    };

    match outcome.phrase() {
        Some(phrase) => println!("{} {}", label, format!("{:?}", phrase).dimmed()),
        None => println!("{}", label),
    }
    if let Some(node) = outcome.node() {
        let tag = doc.tag_name(node).unwrap_or("#text").to_ascii_lowercase();
        println!("  <{}> {}", tag.cyan(), doc.text_content(node));
    }
}
