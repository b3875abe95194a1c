//! Watchlist retrieval over HTTP(S) or FTP.
//!
//! Uses the curl crate (libcurl) with one `Easy` handle per fetch; credentials
//! and proxy are set on that handle only. The body is returned with blank and
//! comment lines removed.

mod filter;
mod ftp;
mod http;

pub use filter::filter_lines;

use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::config::ToolConfig;
use crate::settings::Settings;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Invalid URL or profile name not found: `{0}`")]
    InvalidSource(String),

    #[error("Unsupported protocol: {0}")]
    UnsupportedProtocol(String),

    #[error(transparent)]
    Transport(#[from] curl::Error),

    #[error("GET {url} returned HTTP {code}")]
    Http { url: String, code: u32 },
}

/// Transfer knobs that do not come from the profile.
#[derive(Debug, Clone, Copy, Default)]
pub struct CurlOptions {
    pub connect_timeout: Option<Duration>,
    pub timeout: Option<Duration>,
}

impl CurlOptions {
    pub fn from_config(cfg: &ToolConfig) -> Self {
        Self {
            connect_timeout: cfg.connect_timeout_secs.map(Duration::from_secs),
            timeout: cfg.timeout_secs.map(Duration::from_secs),
        }
    }

    fn apply(&self, easy: &mut curl::easy::Easy) -> Result<(), curl::Error> {
        if let Some(d) = self.connect_timeout {
            easy.connect_timeout(d)?;
        }
        if let Some(d) = self.timeout {
            easy.timeout(d)?;
        }
        Ok(())
    }
}

/// Supported source protocols.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    Http,
    Ftp,
}

/// Pick the protocol from the URL scheme. A string with no scheme (for example
/// an unknown profile name) is `InvalidSource`.
pub fn protocol_for(url: &str) -> Result<Protocol, FetchError> {
    match scheme_of(url).as_str() {
        "http" | "https" => Ok(Protocol::Http),
        "ftp" => Ok(Protocol::Ftp),
        "" => Err(FetchError::InvalidSource(url.to_string())),
        other => Err(FetchError::UnsupportedProtocol(other.to_string())),
    }
}

/// Lowercased scheme of `url`. When the URL does not parse as a whole, the text
/// before the first `:` still counts if it is a well-formed scheme, so a broken
/// `http://` URL fails in the transfer rather than as an unknown profile.
fn scheme_of(url: &str) -> String {
    if let Ok(parsed) = Url::parse(url) {
        return parsed.scheme().to_string();
    }
    match url.split_once(':') {
        Some((scheme, _)) if is_scheme(scheme) => scheme.to_ascii_lowercase(),
        _ => String::new(),
    }
}

fn is_scheme(s: &str) -> bool {
    let mut chars = s.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// Fetch `settings.url` and return its text without blank or comment lines.
pub fn fetch(settings: &Settings, curl: CurlOptions) -> Result<String, FetchError> {
    let protocol = protocol_for(&settings.url)?;
    tracing::info!(url = %settings.url, ?protocol, "fetching watchlist");

    let raw = match protocol {
        Protocol::Http => http::fetch_http(settings, curl)?,
        Protocol::Ftp => ftp::fetch_ftp(settings, curl)?,
    };
    let text = filter_lines(&raw, &settings.comment);
    tracing::debug!(
        bytes = raw.len(),
        kept_bytes = text.len(),
        "watchlist fetched and filtered"
    );
    Ok(text)
}

/// Run the transfer and collect the body.
fn perform(easy: &mut curl::easy::Easy) -> Result<Vec<u8>, curl::Error> {
    let mut body = Vec::new();
    {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| {
            body.extend_from_slice(data);
            Ok(data.len())
        })?;
        transfer.perform()?;
    }
    Ok(body)
}
