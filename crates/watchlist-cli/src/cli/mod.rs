//! CLI for getwatchlist.

mod commands;
mod report;

pub use report::ErrorChannel;

use anyhow::Result;
use clap::Parser;
use watchlist_core::config::ToolConfig;

use commands::{run_fetch, run_list_profiles};

pub const NOT_ENOUGH_ARGUMENTS: &str =
    "Not enough arguments passed. At least a URL or profile name is required.";

/// Fetch a remote watchlist and print it as CSV.
#[derive(Debug, Parser)]
#[command(name = "getwatchlist")]
#[command(about = "Fetch a remote watchlist and print it as normalized CSV", long_about = None)]
pub struct Cli {
    /// Print the saved profile names (default and local stores) and exit.
    #[arg(long)]
    pub list_profiles: bool,

    /// Watchlist URL (http, https or ftp) or the name of a saved profile.
    pub source: Option<String>,

    /// Setting overrides as key=value, e.g. relevantFieldCol=2 delimiter=,
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub overrides: Vec<String>,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn run(self, cfg: &ToolConfig) -> Result<()> {
        if self.list_profiles {
            return run_list_profiles(cfg);
        }
        let Some(source) = self.source else {
            anyhow::bail!(NOT_ENOUGH_ARGUMENTS);
        };
        run_fetch(cfg, &source, &self.overrides)
    }
}
