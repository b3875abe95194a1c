//! Integration tests: fetch from local HTTP/FTP servers and project to CSV.

mod common;

use watchlist_core::fetch::{fetch, CurlOptions, FetchError};
use watchlist_core::profile_store::{ProfileStores, Store};
use watchlist_core::project::project;
use watchlist_core::settings::{resolve, Settings};

const FEED: &[u8] = b"# Example blocklist\n# updated hourly\n\nip_address\tcategory\n1.1.1.1\tmalware\n2.2.2.2\xa0\tspam\n";

fn opts() -> CurlOptions {
    CurlOptions {
        connect_timeout: Some(std::time::Duration::from_secs(5)),
        timeout: Some(std::time::Duration::from_secs(10)),
    }
}

#[test]
fn http_fetch_filters_comments_and_blank_lines() {
    let server = common::http_server::start(FEED);
    let settings = Settings {
        url: format!("{}list.txt", server.url),
        ..Settings::default()
    };
    let text = fetch(&settings, opts()).unwrap();
    assert_eq!(
        text,
        "ip_address\tcategory\n1.1.1.1\tmalware\n2.2.2.2\u{a0}\tspam\n"
    );
    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].starts_with("GET /list.txt HTTP/1.1"));
    assert!(!requests[0].to_ascii_lowercase().contains("authorization:"));
}

#[test]
fn http_fetch_then_project_end_to_end() {
    let server = common::http_server::start(FEED);
    let stores = ProfileStores {
        default: Store::parse(&format!(
            "[example]\nurl = {}feed\ncategoryCol = 2\nignoreFirstLine = true\nfeed = example\n",
            server.url
        ))
        .unwrap(),
        local: Store::default(),
    };
    let settings = resolve(&stores, "EXAMPLE", &[]).unwrap();
    let text = fetch(&settings, opts()).unwrap();
    let mut out = Vec::new();
    let rows = project(&text, &settings, &mut out).unwrap();
    assert_eq!(rows, 2);
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "ip_address,category,feed\n1.1.1.1,malware,example\n2.2.2.2,spam,example\n"
    );
}

#[test]
fn http_basic_auth_is_sent() {
    let server = common::http_server::start(b"1.1.1.1\n");
    let settings = Settings {
        url: server.url.clone(),
        auth_user: "user".to_string(),
        auth_pass: "pass".to_string(),
        ..Settings::default()
    };
    fetch(&settings, opts()).unwrap();
    let request = server.requests().remove(0);
    assert!(
        request.contains("Authorization: Basic dXNlcjpwYXNz"),
        "request was: {request}"
    );
}

#[test]
fn http_proxy_receives_absolute_request() {
    let proxy = common::http_server::start(b"9.9.9.9\n");
    let (host, port) = proxy.addr.split_once(':').unwrap();
    let settings = Settings {
        url: "http://watchlist.invalid/feed.txt".to_string(),
        proxy_host: host.to_string(),
        proxy_port: port.to_string(),
        ..Settings::default()
    };
    let text = fetch(&settings, opts()).unwrap();
    assert_eq!(text, "9.9.9.9\n");
    let request = proxy.requests().remove(0);
    assert!(
        request.starts_with("GET http://watchlist.invalid/feed.txt HTTP/1.1"),
        "request was: {request}"
    );
}

#[test]
fn http_error_status_fails() {
    let server = common::http_server::start_with_status(b"gone", "404 Not Found");
    let settings = Settings {
        url: server.url.clone(),
        ..Settings::default()
    };
    match fetch(&settings, opts()) {
        Err(FetchError::Http { code, .. }) => assert_eq!(code, 404),
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn unreachable_host_is_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    let settings = Settings {
        url: format!("http://127.0.0.1:{port}/"),
        ..Settings::default()
    };
    let err = fetch(&settings, opts()).unwrap_err();
    assert!(matches!(err, FetchError::Transport(_)));

    let message = err.to_string();
    let report = format!("{:#}", anyhow::Error::new(err).context("Error fetching watch list"));
    assert_eq!(report, format!("Error fetching watch list: {message}"));
}

#[test]
fn ftp_anonymous_fetch_filters_lines() {
    let server = common::ftp_server::start(b"# header\r\n\r\n1.1.1.1\r\n  \r\n2.2.2.2\r\n");
    let settings = Settings {
        url: format!("ftp://127.0.0.1:{}/list.txt", server.port),
        ..Settings::default()
    };
    let text = fetch(&settings, opts()).unwrap();
    assert_eq!(text, "1.1.1.1\n2.2.2.2\n");

    let commands = server.commands();
    assert!(commands.iter().any(|c| c == "USER anonymous"), "{commands:?}");
    assert!(commands.iter().any(|c| c == "PASS pass"), "{commands:?}");
    assert!(commands.iter().any(|c| c == "TYPE A"), "{commands:?}");
    assert!(!commands.iter().any(|c| c == "TYPE I"), "{commands:?}");
    assert!(commands.iter().any(|c| c == "CWD /"), "{commands:?}");
    assert!(commands.iter().any(|c| c == "RETR list.txt"), "{commands:?}");
}

#[test]
fn ftp_uses_configured_credentials() {
    let server = common::ftp_server::start(b"3.3.3.3\n");
    let settings = Settings {
        url: format!("ftp://127.0.0.1:{}/list.txt", server.port),
        auth_user: "feeds".to_string(),
        auth_pass: "s3cret".to_string(),
        ..Settings::default()
    };
    assert_eq!(fetch(&settings, opts()).unwrap(), "3.3.3.3\n");
    let commands = server.commands();
    assert!(commands.iter().any(|c| c == "USER feeds"), "{commands:?}");
    assert!(commands.iter().any(|c| c == "PASS s3cret"), "{commands:?}");
}
