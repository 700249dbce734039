//! Backend search.

use anyhow::Result;
use colored::Colorize;

use snipmark_core::client::BackendClient;
use snipmark_core::status::StatusLine;
use snipmark_core::types::SearchHit;
use snipmark_core::Config;

use super::print_status;

pub async fn execute(query: &str, json: bool, config: &Config) -> Result<()> {
    let client = BackendClient::new(&config.backend)?;

    if !json {
        print_status(&StatusLine::searching());
    }
    let hits = match client.search(query).await {
        Ok(hits) => hits,
        Err(e) => anyhow::bail!("{}", StatusLine::search_failed(&e)),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&hits)?);
        return Ok(());
    }

    print_status(&StatusLine::found(hits.len()));
    for (i, hit) in hits.iter().enumerate() {
        println!();
        print_hit(i + 1, hit);
    }
    Ok(())
}

fn print_hit(rank: usize, hit: &SearchHit) {
    println!("{} {}", format!("{}.", rank).dimmed(), hit.title.cyan().bold());
    println!("   {}", hit.url.blue().underline());
    println!("   {}", hit.snippet);
}
