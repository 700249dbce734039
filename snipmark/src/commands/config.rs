//! Show effective configuration.

use anyhow::{Context, Result};
use colored::Colorize;

use snipmark_core::Config;

pub fn execute(path_only: bool, config: &Config) -> Result<()> {
    let path = Config::config_path();
    if path_only {
        println!("{}", path.display());
        return Ok(());
    }

    let note = if path.exists() {
        format!("# {}", path.display())
    } else {
        format!("# {} (not found, using defaults)", path.display())
    };
    println!("{}", note.dimmed());
    print!(
        "{}",
        toml::to_string_pretty(config).context("Failed to serialize config")?
    );
    Ok(())
}
