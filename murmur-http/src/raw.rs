//! Opt-in wire logging under the `http.raw` target, enabled with `MURMUR_HTTP_RAW=1`.
use reqwest::header::HeaderMap;
use reqwest::{Method, StatusCode, Url};
use std::env;

const RAW_ENV: &str = "MURMUR_HTTP_RAW";
const RAW_MAX_BODY: usize = 64 * 1024;
const REDACTED: &str = "<redacted>";
const SENSITIVE_HEADERS: [&str; 2] = ["cookie", "set-cookie"];

pub(crate) fn enabled() -> bool {
    env::var(RAW_ENV)
        .is_ok_and(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
}

fn visible_headers(headers: &HeaderMap) -> Vec<(String, String)> {
    headers
        .iter()
        .map(|(name, value)| {
            let shown = if SENSITIVE_HEADERS
                .iter()
                .any(|s| name.as_str().eq_ignore_ascii_case(s))
            {
                REDACTED.to_string()
            } else {
                value.to_str().unwrap_or_default().to_string()
            };
            (name.as_str().to_string(), shown)
        })
        .collect()
}

fn shell_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', r"'\''"))
}

/// Paste-able reproduction of a request. Cookie values never appear.
pub(crate) fn curl(method: &Method, url: &Url, headers: &HeaderMap) -> String {
    let mut cmd = format!("curl -X{method}");
    for (name, value) in visible_headers(headers) {
        cmd.push_str(" -H ");
        cmd.push_str(&shell_quote(&format!("{name}: {value}")));
    }
    cmd.push(' ');
    cmd.push_str(&shell_quote(url.as_str()));
    cmd
}

pub(crate) fn log_request(req_id: &str, method: &Method, url: &Url, headers: Option<&HeaderMap>) {
    let none = HeaderMap::new();
    let curl = curl(method, url, headers.unwrap_or(&none));
    tracing::debug!(target: "http.raw", %req_id, %curl, "request");
}

pub(crate) fn log_response(
    req_id: &str,
    status: StatusCode,
    elapsed_ms: u64,
    headers: &HeaderMap,
    body: &[u8],
) {
    let truncated = body.len() > RAW_MAX_BODY;
    let text = String::from_utf8_lossy(&body[..body.len().min(RAW_MAX_BODY)]);
    tracing::info!(
        target: "http.raw",
        %req_id,
        %status,
        elapsed_ms,
        headers = ?visible_headers(headers),
        body = %text,
        truncated,
        "response"
    );
}
