//! `getwatchlist --list-profiles`: print saved profile names.

use anyhow::{Context, Result};
use watchlist_core::config::ToolConfig;
use watchlist_core::profile_store::ProfileStores;

pub fn run_list_profiles(cfg: &ToolConfig) -> Result<()> {
    let stores = ProfileStores::load(&cfg.default_store_path(), &cfg.local_store_path())
        .context("Error reading profiles")?;
    for name in stores.list_profiles() {
        println!("{name}");
    }
    Ok(())
}
