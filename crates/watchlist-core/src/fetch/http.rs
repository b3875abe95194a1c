//! HTTP/HTTPS GET with optional basic auth and proxy.

use super::{perform, CurlOptions, FetchError};
use crate::settings::Settings;

/// GET `settings.url`. Credentials are attached when either the user or the
/// password is set; libcurl only sends them to the host of that URL.
pub(super) fn fetch_http(settings: &Settings, curl: CurlOptions) -> Result<Vec<u8>, FetchError> {
    let mut easy = curl::easy::Easy::new();
    easy.url(&settings.url)?;
    easy.follow_location(true)?;
    easy.max_redirections(10)?;
    curl.apply(&mut easy)?;

    if !settings.auth_user.is_empty() || !settings.auth_pass.is_empty() {
        let mut auth = curl::easy::Auth::new();
        auth.basic(true);
        easy.http_auth(&auth)?;
        easy.username(&settings.auth_user)?;
        easy.password(&settings.auth_pass)?;
    }

    if let Some(proxy) = proxy_url(settings) {
        tracing::debug!(%proxy, "using proxy");
        easy.proxy(&proxy)?;
    }

    let body = perform(&mut easy)?;

    let code = easy.response_code()?;
    if !(200..300).contains(&code) {
        return Err(FetchError::Http {
            url: settings.url.clone(),
            code,
        });
    }
    Ok(body)
}

/// The proxy is always registered as a plain `http://` proxy, whatever the
/// scheme of the watchlist URL.
fn proxy_url(settings: &Settings) -> Option<String> {
    let host = settings.proxy_host.as_str();
    if host.is_empty() {
        return None;
    }
    let port = settings.proxy_port.as_str();
    if port.is_empty() {
        Some(format!("http://{host}"))
    } else {
        Some(format!("http://{host}:{port}"))
    }
}
