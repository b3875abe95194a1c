//! FTP retrieval in ASCII mode.

use url::Url;

use super::{perform, CurlOptions, FetchError};
use crate::settings::Settings;

const ANONYMOUS_USER: &str = "anonymous";
const ANONYMOUS_PASS: &str = "pass";

/// RETR the path of `settings.url` from the server root, logging in
/// anonymously unless a user or password is configured. Every line comes back
/// terminated by `\n`.
pub(super) fn fetch_ftp(settings: &Settings, curl: CurlOptions) -> Result<Vec<u8>, FetchError> {
    let (user, pass) = credentials(settings);

    let mut easy = curl::easy::Easy::new();
    let url = request_url(&settings.url);
    easy.url(&url)?;
    easy.username(user)?;
    easy.password(pass)?;
    curl.apply(&mut easy)?;

    tracing::debug!(user, %url, "ftp login");
    let body = perform(&mut easy)?;
    Ok(reterminate(&body))
}

fn credentials(settings: &Settings) -> (&str, &str) {
    if settings.auth_user.is_empty() && settings.auth_pass.is_empty() {
        (ANONYMOUS_USER, ANONYMOUS_PASS)
    } else {
        (settings.auth_user.as_str(), settings.auth_pass.as_str())
    }
}

/// libcurl form of `url`: a leading `%2F` makes the path absolute instead of
/// relative to the login directory, and `;type=A` selects ASCII transfers.
fn request_url(url: &str) -> String {
    match Url::parse(url) {
        Ok(mut parsed) => {
            let path = format!("/%2F{};type=A", parsed.path().trim_start_matches('/'));
            parsed.set_path(&path);
            parsed.into()
        }
        Err(_) => format!("{url};type=A"),
    }
}

/// Strip each line's `\r\n` or `\n` and end it with a single `\n`.
fn reterminate(body: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(body.len());
    for line in body.split_inclusive(|b| *b == b'\n') {
        let line = line.strip_suffix(b"\n").unwrap_or(line);
        let line = line.strip_suffix(b"\r").unwrap_or(line);
        out.extend_from_slice(line);
        out.push(b'\n');
    }
    out
}
