//! Full open-then-wait-then-inject flow against an in-memory surface.

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use snipmark_core::dom::ContentDocument;
use snipmark_core::host::MemoryHost;
use snipmark_core::orchestrator::mailbox;
use snipmark_core::{
    Config, Document, Orchestrator, OrchestratorHandle, RelocationRequest, Relocator,
};

use super::load_page;

/// Extra time allowed on top of the settle delay.
const WAIT_MARGIN: Duration = Duration::from_secs(5);
const POLL_INTERVAL: Duration = Duration::from_millis(50);

pub async fn execute(file: &Path, url: &str, snippet: &str, config: &Config) -> Result<()> {
    let page = load_page(file, None)?;
    println!(
        "{} {} (settle {} ms)",
        "Opening".cyan(),
        url,
        config.orchestrator.settle_delay_ms
    );

    let doc = run(page, url, snippet, config).await?;
    let highlighted = doc.highlighted();
    if highlighted.is_empty() {
        match doc.scrolled_to() {
            Some(target) => println!(
                "{} {}",
                "Scrolled to match".yellow().bold(),
                doc.text_content(target.node)
            ),
            None => println!("{}", "Snippet not found".red()),
        }
        return Ok(());
    }
    for node in highlighted {
        let tag = doc.tag_name(node).unwrap_or("#text").to_ascii_lowercase();
        println!("{} <{}> {}", "Highlighted".green().bold(), tag.cyan(), doc.text_content(node));
    }
    Ok(())
}

/// Serve `page` under `url`, relocate `snippet` in it and return the result.
pub(crate) async fn run(
    page: Document,
    url: &str,
    snippet: &str,
    config: &Config,
) -> Result<Document> {
    let (sink, inbox) = mailbox();
    let host = Arc::new(
        MemoryHost::new(sink, Relocator::new(&config.relocator))
            .with_auto_complete()
            .with_page(url, page),
    );
    let handle = Orchestrator::new(host.clone(), config, inbox).spawn();

    let ack = handle.relocate(RelocationRequest::new(url, snippet));
    if !ack.success {
        anyhow::bail!("Orchestrator rejected the request");
    }

    let waited = tokio::time::timeout(
        config.settle_delay() + WAIT_MARGIN,
        wait_for_injection(&host, &handle),
    )
    .await;
    handle.shutdown();
    waited.context("Timed out waiting for the page to settle")??;

    let (surface, _) = host
        .surfaces()
        .await
        .into_iter()
        .next()
        .context("No surface was opened")?;
    host.document(surface)
        .await
        .context("Surface closed before it could be read")
}

async fn wait_for_injection(host: &MemoryHost, handle: &OrchestratorHandle) -> Result<()> {
    loop {
        if host.inject_calls() > 0 && handle.pending().await?.is_empty() {
            debug!("Injection finished");
            return Ok(());
        }
        tokio::time::sleep(POLL_INTERVAL).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = "# Mills\n\nThe mill was built in 1821 and ground grain for the village.";

    #[tokio::test(start_paused = true)]
    async fn test_run_marks_snippet() {
        let page = Document::from_text("Mills", PAGE);
        let snippet = "built in 1821 and ground grain";
        let doc = run(page, "https://a.test/mills", snippet, &Config::default())
            .await
            .unwrap();

        let marks = doc.marks();
        assert_eq!(marks.len(), 1);
        assert_eq!(doc.text_content(marks[0]), "built in 1821 and ground grain");
        assert_eq!(doc.scrolled_to().map(|t| t.node), Some(marks[0]));
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_without_match_leaves_page() {
        let page = Document::from_text("Mills", PAGE);
        let before = page.snapshot();
        let doc = run(page, "https://a.test/mills", "steam engines everywhere", &Config::default())
            .await
            .unwrap();

        assert_eq!(doc.snapshot(), before);
        assert!(doc.highlighted().is_empty());
    }
}
