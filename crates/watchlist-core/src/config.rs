use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// File name shared by the shipped (default) and operator (local) profile stores.
pub const STORE_FILE_NAME: &str = "getwatchlist.conf";

/// How failures are reported to whoever invoked the tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorFormat {
    /// Splunk when `SPLUNK_HOME` is set, plain text otherwise.
    #[default]
    Auto,
    Plain,
    Splunk,
}

/// Tool configuration loaded from `~/.config/getwatchlist/config.toml`.
///
/// Every key is optional; a missing file yields the defaults below.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    /// Path of the shipped profile store. Defaults to `<exe dir>/../default/getwatchlist.conf`.
    pub default_store: Option<PathBuf>,
    /// Path of the operator profile store. Defaults to `<exe dir>/../local/getwatchlist.conf`.
    pub local_store: Option<PathBuf>,
    /// Connect timeout for HTTP/FTP in seconds (None = libcurl default).
    pub connect_timeout_secs: Option<u64>,
    /// Whole-transfer timeout in seconds (None = no limit).
    pub timeout_secs: Option<u64>,
    /// Error reporting channel.
    pub error_format: ErrorFormat,
    /// Append logs to this file instead of stderr.
    pub log_file: Option<PathBuf>,
}

impl ToolConfig {
    /// Resolved default store path.
    pub fn default_store_path(&self) -> PathBuf {
        self.default_store
            .clone()
            .unwrap_or_else(|| app_relative("default"))
    }

    /// Resolved local store path.
    pub fn local_store_path(&self) -> PathBuf {
        self.local_store
            .clone()
            .unwrap_or_else(|| app_relative("local"))
    }
}

/// `<exe dir>/../<dir>/getwatchlist.conf`, the layout of an app bundle where the
/// binary lives in `bin/` next to `default/` and `local/`.
fn app_relative(dir: &str) -> PathBuf {
    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."));
    exe_dir.join("..").join(dir).join(STORE_FILE_NAME)
}

/// Existing `config.toml` under the XDG config dirs, if any. Without a home
/// directory there is nowhere to look, which is not an error.
pub fn config_path() -> Option<PathBuf> {
    match xdg::BaseDirectories::with_prefix("getwatchlist") {
        Ok(xdg_dirs) => xdg_dirs.find_config_file("config.toml"),
        Err(e) => {
            tracing::debug!("no XDG base directories ({}); using built-in config", e);
            None
        }
    }
}

/// Load configuration from disk. A missing file yields defaults; nothing is created.
pub fn load() -> Result<ToolConfig> {
    match config_path() {
        Some(path) => load_from(&path),
        None => Ok(ToolConfig::default()),
    }
}

pub fn load_from(path: &Path) -> Result<ToolConfig> {
    let data = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: ToolConfig =
        toml::from_str(&data).with_context(|| format!("parse {}", path.display()))?;
    Ok(cfg)
}
