//! Small GET client with bounded retries and structured request logging.
//!
//! - Per-request options: headers, query params, timeout, retry budget
//! - Client options: user agent, connect timeout and an optional proxy
//! - 429/5xx and transport failures retry with exponential backoff (`Retry-After` wins)
//! - `MURMUR_HTTP_RAW=1` adds curl-style request and full response lines (target `http.raw`)
//!
//! ```no_run
//! # async fn demo() -> Result<(), murmur_http::HttpError> {
//! let client = murmur_http::HttpClient::new("https://www.tiktok.com")?;
//! let page = client
//!     .get_text("@someone/video/1", murmur_http::RequestOpts::default())
//!     .await?;
//! # let _ = page;
//! # Ok(()) }
//! ```
use reqwest::header::HeaderMap;
use reqwest::{Client, Method, Proxy, Url};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tokio::time::sleep;

mod error;
mod raw;
mod retry;

pub use error::HttpError;
pub use reqwest::{StatusCode, header};

use error::{error_message, snippet};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const DEFAULT_RETRIES: usize = 1;
const UPSTREAM_ID_HEADERS: [&str; 2] = ["x-tt-logid", "x-request-id"];

static REQUEST_SEQ: AtomicU64 = AtomicU64::new(1);

/// Per-request overrides.
///
/// ```
/// use murmur_http::RequestOpts;
/// use std::time::Duration;
///
/// let opts = RequestOpts {
///     timeout: Some(Duration::from_secs(30)),
///     query: Some(vec![("aweme_id", "42".into())]),
///     ..Default::default()
/// };
///
/// assert_eq!(opts.retries, None);
/// assert!(!opts.allow_absolute);
/// ```
#[derive(Clone, Debug, Default)]
pub struct RequestOpts<'a> {
    pub timeout: Option<Duration>,
    pub retries: Option<usize>,
    pub headers: Option<HeaderMap>,
    pub query: Option<Vec<(&'a str, Cow<'a, str>)>>,
    /// Use `path` as-is when it parses as an absolute URL instead of joining it to the base.
    pub allow_absolute: bool,
}

/// Settings baked into the underlying `reqwest::Client`.
#[derive(Clone, Debug, Default)]
pub struct ClientOptions {
    pub user_agent: Option<String>,
    /// Proxy for both http and https. `None` connects directly and ignores proxy env vars.
    pub proxy: Option<String>,
    pub connect_timeout: Option<Duration>,
}

#[derive(Clone)]
pub struct HttpClient {
    base: Url,
    inner: Client,
    pub default_timeout: Duration,
    pub max_retries: usize,
}

struct Fetched {
    req_id: String,
    bytes: Vec<u8>,
}

struct Exchange {
    status: StatusCode,
    headers: HeaderMap,
    bytes: Vec<u8>,
}

impl HttpClient {
    /// Client anchored at `base` with default options.
    ///
    /// ```no_run
    /// use murmur_http::{HttpClient, HttpError};
    /// use std::time::Duration;
    ///
    /// let client = HttpClient::new("https://www.tiktok.com")?;
    /// assert_eq!(client.default_timeout, Duration::from_secs(15));
    /// assert_eq!(client.max_retries, 1);
    /// # Ok::<(), HttpError>(())
    /// ```
    pub fn new(base: &str) -> Result<Self, HttpError> {
        Self::with_options(base, ClientOptions::default())
    }

    pub fn with_options(base: &str, options: ClientOptions) -> Result<Self, HttpError> {
        let base = Url::parse(base).map_err(|e| HttpError::Url(e.to_string()))?;

        let mut builder = Client::builder()
            .connect_timeout(options.connect_timeout.unwrap_or(DEFAULT_CONNECT_TIMEOUT));
        if let Some(ua) = &options.user_agent {
            builder = builder.user_agent(ua.as_str());
        }
        builder = match &options.proxy {
            Some(proxy) => {
                let proxy = Proxy::all(proxy.as_str()).map_err(|e| HttpError::Build(e.to_string()))?;
                builder.proxy(proxy)
            }
            // Proxy env vars are resolved by the settings loader.
            None => builder.no_proxy(),
        };
        let inner = builder.build().map_err(|e| HttpError::Build(e.to_string()))?;

        Ok(Self {
            base,
            inner,
            default_timeout: DEFAULT_TIMEOUT,
            max_retries: DEFAULT_RETRIES,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    /// Retries after the first attempt; `0` disables retrying.
    pub fn with_retries(mut self, retries: usize) -> Self {
        self.max_retries = retries;
        self
    }

    /// GET and decode a JSON body.
    pub async fn get_json<T>(&self, path: &str, opts: RequestOpts<'_>) -> Result<T, HttpError>
    where
        T: DeserializeOwned,
    {
        let fetched = self.fetch(path, opts).await?;
        serde_json::from_slice(&fetched.bytes).map_err(|e| {
            let body = snippet(&fetched.bytes);
            tracing::warn!(
                req_id = %fetched.req_id,
                line = e.line(),
                column = e.column(),
                error = %e,
                body = %body,
                "http.decode_failed"
            );
            HttpError::Decode(e.to_string(), body)
        })
    }

    /// GET a body as text (lossy UTF-8).
    pub async fn get_text(&self, path: &str, opts: RequestOpts<'_>) -> Result<String, HttpError> {
        let fetched = self.fetch(path, opts).await?;
        Ok(String::from_utf8_lossy(&fetched.bytes).into_owned())
    }

    fn resolve_url(&self, path: &str, allow_absolute: bool) -> Result<Url, HttpError> {
        if allow_absolute {
            if let Ok(url) = Url::parse(path) {
                return Ok(url);
            }
        }
        self.base.join(path).map_err(|e| HttpError::Url(e.to_string()))
    }

    async fn fetch(&self, path: &str, opts: RequestOpts<'_>) -> Result<Fetched, HttpError> {
        let url = self.resolve_url(path, opts.allow_absolute)?;
        let timeout = opts.timeout.unwrap_or(self.default_timeout);
        let max_retries = opts.retries.unwrap_or(self.max_retries);
        let mut retry = 0usize;

        loop {
            let req_id = format!("r{}", REQUEST_SEQ.fetch_add(1, Ordering::Relaxed));

            let delay = match self.send_once(&req_id, &url, &opts, timeout).await {
                Ok(exchange) if exchange.status.is_success() => {
                    return Ok(Fetched {
                        req_id,
                        bytes: exchange.bytes,
                    });
                }
                Ok(Exchange {
                    status,
                    headers,
                    bytes,
                }) => {
                    let message = error_message(&bytes);
                    if !retry::is_retryable(status) || retry >= max_retries {
                        let request_id = upstream_id(&headers);
                        tracing::debug!(%req_id, %status, %message, upstream_id = %request_id, "http.failed");
                        return Err(HttpError::Api {
                            status,
                            message,
                            request_id,
                        });
                    }
                    retry += 1;
                    let delay = retry::delay_for_status(status, &headers, retry);
                    tracing::warn!(
                        %req_id,
                        %status,
                        retry,
                        max_retries,
                        delay_ms = delay.as_millis() as u64,
                        %message,
                        "http.retry"
                    );
                    delay
                }
                Err(message) => {
                    if retry >= max_retries {
                        tracing::warn!(%req_id, retry, %message, "http.network_failed");
                        return Err(HttpError::Network(message));
                    }
                    retry += 1;
                    let delay = retry::backoff(retry);
                    tracing::warn!(
                        %req_id,
                        retry,
                        max_retries,
                        delay_ms = delay.as_millis() as u64,
                        %message,
                        "http.retry_network"
                    );
                    delay
                }
            };
            sleep(delay).await;
        }
    }

    /// One round trip. Transport failures (send or body read) come back as the error text.
    async fn send_once(
        &self,
        req_id: &str,
        url: &Url,
        opts: &RequestOpts<'_>,
        timeout: Duration,
    ) -> Result<Exchange, String> {
        let mut request = self.inner.get(url.clone()).timeout(timeout);
        if let Some(query) = &opts.query {
            let pairs: Vec<(&str, &str)> = query.iter().map(|(k, v)| (*k, v.as_ref())).collect();
            request = request.query(&pairs);
        }
        if let Some(headers) = &opts.headers {
            request = request.headers(headers.clone());
        }

        tracing::debug!(
            %req_id,
            host = url.host_str().unwrap_or("-"),
            path = url.path(),
            query = ?opts.query,
            timeout_ms = timeout.as_millis() as u64,
            "http.request"
        );
        if raw::enabled() {
            raw::log_request(req_id, &Method::GET, url, opts.headers.as_ref());
        }

        let started = Instant::now();
        let response = request.send().await.map_err(|e| e.to_string())?;
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.bytes().await.map_err(|e| e.to_string())?.to_vec();
        let elapsed_ms = started.elapsed().as_millis() as u64;

        tracing::debug!(
            %req_id,
            %status,
            elapsed_ms,
            body_len = bytes.len(),
            upstream_id = %upstream_id(&headers),
            "http.response"
        );
        tracing::trace!(%req_id, body = %snippet(&bytes), "http.response_body");
        if raw::enabled() {
            raw::log_response(req_id, status, elapsed_ms, &headers, &bytes);
        }

        Ok(Exchange {
            status,
            headers,
            bytes,
        })
    }
}

fn upstream_id(headers: &HeaderMap) -> String {
    UPSTREAM_ID_HEADERS
        .iter()
        .find_map(|name| headers.get(*name)?.to_str().ok())
        .unwrap_or("-")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::{ACCEPT, HeaderValue};
    use wiremock::matchers::{header as header_eq, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn get_json_sends_query_and_headers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/comment/list/"))
            .and(query_param("aweme_id", "42"))
            .and(header_eq("accept", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
            .mount(&server)
            .await;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let client = HttpClient::new(&server.uri()).unwrap();
        let got: serde_json::Value = client
            .get_json(
                "api/comment/list/",
                RequestOpts {
                    headers: Some(headers),
                    query: Some(vec![("aweme_id", "42".into())]),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(got["ok"], true);
    }

    #[tokio::test]
    async fn retries_server_errors_then_reports_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/flaky"))
            .respond_with(
                ResponseTemplate::new(503)
                    .insert_header("x-tt-logid", "abc123")
                    .set_body_string("busy"),
            )
            .expect(2)
            .mount(&server)
            .await;

        let client = HttpClient::new(&server.uri()).unwrap().with_retries(1);
        let err = client
            .get_text("flaky", RequestOpts::default())
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(StatusCode::SERVICE_UNAVAILABLE));
        assert!(matches!(err, HttpError::Api { ref request_id, .. } if request_id == "abc123"));
    }

    #[tokio::test]
    async fn client_errors_are_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpClient::new(&server.uri()).unwrap().with_retries(3);
        let err = client
            .get_text("missing", RequestOpts::default())
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
    }

    #[tokio::test]
    async fn absolute_paths_bypass_the_base() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/elsewhere"))
            .respond_with(ResponseTemplate::new(200).set_body_string("hi"))
            .mount(&server)
            .await;

        let client = HttpClient::new("https://www.tiktok.com").unwrap();
        let body = client
            .get_text(
                &format!("{}/elsewhere", server.uri()),
                RequestOpts {
                    allow_absolute: true,
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(body, "hi");
    }

    #[tokio::test]
    async fn undecodable_json_is_a_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let client = HttpClient::new(&server.uri()).unwrap();
        let err = client
            .get_json::<serde_json::Value>("x", RequestOpts::default())
            .await
            .unwrap_err();
        assert!(matches!(err, HttpError::Decode(_, ref body) if body == "<html>"));
    }
}
