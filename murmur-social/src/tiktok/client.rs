//! Best-effort, unauthenticated comment retrieval.
//!
//! Strategies run in order: the mobile share page (comments embedded in
//! `SIGI_STATE`), an oEmbed probe that only confirms the URL resolves, and the
//! public `comment/list` endpoint. Any failure is logged and the next strategy
//! tried; when all of them come up empty the caller gets an empty list.
use async_trait::async_trait;
use murmur_config::Settings;
use murmur_http::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue};
use murmur_http::{ClientOptions, HttpClient, HttpError, RequestOpts, StatusCode};
use serde_json::Value;
use std::time::Duration;

use super::links::{parse_aweme_id_from_url, to_mobile_url};
use super::page::{comments_from_api, comments_from_sigi, sigi_state};
use crate::source::CommentSource;

pub const DEFAULT_WEB_BASE: &str = "https://www.tiktok.com";

const HTML_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml";
const JSON_ACCEPT: &str = "application/json";

#[derive(Clone)]
pub struct TikTokClient {
    http: HttpClient,
}

impl TikTokClient {
    pub fn new(settings: &Settings) -> Result<Self, HttpError> {
        Self::with_base(settings, DEFAULT_WEB_BASE)
    }

    /// Anchor the oEmbed and API probes at `web_base` instead of tiktok.com.
    pub fn with_base(settings: &Settings, web_base: &str) -> Result<Self, HttpError> {
        let http = HttpClient::with_options(
            web_base,
            ClientOptions {
                user_agent: Some(settings.user_agent.clone()),
                proxy: settings.proxy.clone(),
                connect_timeout: None,
            },
        )?
        .with_timeout(Duration::from_secs(settings.timeout_seconds));
        Ok(Self { http })
    }

    /// Run every strategy in order and return the first non-empty comment list.
    pub async fn fetch(&self, url: &str, max_items: usize) -> Vec<Value> {
        let aweme_id = parse_aweme_id_from_url(url);
        if aweme_id.is_empty() {
            tracing::warn!(%url, "could not parse aweme_id from URL; live retrieval may fail");
        }

        match self.try_mobile_page(url).await {
            Ok(records) if !records.is_empty() => return truncate(records, max_items),
            Ok(_) => tracing::debug!(%url, "mobile page carried no comments"),
            Err(e) => tracing::debug!(%url, error = %e, "mobile page strategy failed"),
        }

        match self.probe_oembed(url).await {
            Ok(true) => tracing::info!(%url, "oEmbed probe succeeded, but it never carries comments"),
            Ok(false) => tracing::debug!(%url, "oEmbed does not know this URL"),
            Err(e) => tracing::debug!(%url, error = %e, "oEmbed probe failed"),
        }

        if !aweme_id.is_empty() {
            let records = self.try_public_api(&aweme_id, max_items).await;
            if !records.is_empty() {
                return truncate(records, max_items);
            }
        }

        tracing::info!(%url, "no live comments could be retrieved without credentials");
        Vec::new()
    }

    async fn try_mobile_page(&self, url: &str) -> Result<Vec<Value>, HttpError> {
        let mobile = to_mobile_url(url);
        let html = self
            .http
            .get_text(
                &mobile,
                RequestOpts {
                    headers: Some(accept(HTML_ACCEPT)),
                    allow_absolute: true,
                    ..Default::default()
                },
            )
            .await?;

        Ok(sigi_state(&html)
            .map(|state| comments_from_sigi(&state))
            .unwrap_or_default())
    }

    async fn probe_oembed(&self, url: &str) -> Result<bool, HttpError> {
        let result = self
            .http
            .get_text(
                "oembed",
                RequestOpts {
                    query: Some(vec![("url", url.into())]),
                    ..Default::default()
                },
            )
            .await;
        match result {
            Ok(_) => Ok(true),
            Err(e) if e.status() == Some(StatusCode::NOT_FOUND) => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn try_public_api(&self, aweme_id: &str, max_items: usize) -> Vec<Value> {
        let count = max_items.to_string();
        let result: Result<Value, HttpError> = self
            .http
            .get_json(
                "api/comment/list/",
                RequestOpts {
                    headers: Some(accept(JSON_ACCEPT)),
                    query: Some(vec![("aweme_id", aweme_id.into()), ("count", count.into())]),
                    ..Default::default()
                },
            )
            .await;
        match result {
            Ok(body) => comments_from_api(&body),
            Err(e) => {
                tracing::debug!(%aweme_id, error = %e, "comment list endpoint unavailable");
                Vec::new()
            }
        }
    }
}

#[async_trait]
impl CommentSource for TikTokClient {
    async fn fetch_comments(&self, url: &str, max_items: usize) -> Vec<Value> {
        self.fetch(url, max_items).await
    }
}

fn accept(value: &'static str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(value));
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
    headers
}

fn truncate(mut records: Vec<Value>, max_items: usize) -> Vec<Value> {
    records.truncate(max_items);
    records
}
