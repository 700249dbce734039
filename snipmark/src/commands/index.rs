//! Page capture and indexing.

use anyhow::Result;
use std::path::Path;
use tracing::debug;

use snipmark_core::client::BackendClient;
use snipmark_core::status::StatusLine;
use snipmark_core::types::{IndexRequest, PageCapture};
use snipmark_core::Config;

use super::{load_page, print_status};

pub async fn execute(
    file: &Path,
    url: &str,
    title: Option<String>,
    config: &Config,
) -> Result<()> {
    print_status(&StatusLine::extracting());

    let doc = load_page(file, title.as_deref())?;
    let Some(capture) = capture(&doc, url) else {
        anyhow::bail!("{}", StatusLine::extraction_failed());
    };
    debug!(url = %capture.url, chars = capture.text.len(), "Captured page");

    let title = capture.title.clone();
    let client = BackendClient::new(&config.backend)?;
    let resp = match client.index(&IndexRequest::from(capture)).await {
        Ok(resp) => resp,
        Err(e) => anyhow::bail!("{}", StatusLine::failed(&e)),
    };

    if resp.is_already_indexed() {
        print_status(&StatusLine::already_indexed(&title));
    } else {
        print_status(&StatusLine::indexed(resp.chunks, &title));
    }
    Ok(())
}

/// Visible text of a page, or `None` if there is none.
fn capture(doc: &snipmark_core::Document, url: &str) -> Option<PageCapture> {
    let text = doc.inner_text();
    if text.trim().is_empty() {
        return None;
    }
    Some(PageCapture {
        text,
        url: url.to_string(),
        title: doc.title().to_string(),
    })
}
