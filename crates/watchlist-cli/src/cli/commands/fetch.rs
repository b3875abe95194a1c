//! `getwatchlist <urlOrProfile> [key=value ...]`: resolve, fetch, print CSV.

use anyhow::{Context, Result};
use std::io;
use watchlist_core::config::ToolConfig;
use watchlist_core::fetch::{fetch, CurlOptions};
use watchlist_core::profile_store::ProfileStores;
use watchlist_core::project::project;
use watchlist_core::settings::{resolve, Settings};

/// Each stage fails the whole invocation, with its own message prefix.
pub fn run_fetch(cfg: &ToolConfig, source: &str, overrides: &[String]) -> Result<()> {
    let settings = load_settings(cfg, source, overrides).context("Error getting settings")?;

    let text = fetch(&settings, CurlOptions::from_config(cfg))
        .context("Error fetching watch list")?;

    let stdout = io::stdout();
    project(&text, &settings, stdout.lock()).context("Error outputting watch list")?;
    Ok(())
}

fn load_settings(cfg: &ToolConfig, source: &str, overrides: &[String]) -> Result<Settings> {
    let stores = ProfileStores::load(&cfg.default_store_path(), &cfg.local_store_path())?;
    let settings = resolve(&stores, source, overrides)?;
    tracing::debug!(url = %settings.url, delimiter = ?settings.delimiter, "settings resolved");
    Ok(settings)
}
