use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

const SNIPPET_MAX: usize = 500;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("invalid URL: {0}")]
    Url(String),
    #[error("client build failed: {0}")]
    Build(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("decode error: {0}, body_snippet: {1}")]
    Decode(String, String),
    #[error("server returned {status}: {message} (upstream id {request_id})")]
    Api {
        status: StatusCode,
        message: String,
        request_id: String,
    },
}

impl HttpError {
    /// HTTP status for [`HttpError::Api`]; `None` for transport and decode failures.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            HttpError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    status_msg: String,
    #[serde(default)]
    message: String,
    #[serde(default)]
    error: String,
}

/// Readable reason from an error body: TikTok's `status_msg`, then the generic
/// `message`/`error` fields, then the raw body snippet.
pub(crate) fn error_message(body: &[u8]) -> String {
    serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|b| {
            [b.status_msg, b.message, b.error]
                .into_iter()
                .find(|m| !m.is_empty())
        })
        .unwrap_or_else(|| snippet(body))
}

/// Lossy UTF-8 prefix of `body`, cut on a char boundary.
pub(crate) fn snippet(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    if text.len() <= SNIPPET_MAX {
        return text.into_owned();
    }
    let cut = (0..=SNIPPET_MAX)
        .rev()
        .find(|i| text.is_char_boundary(*i))
        .unwrap_or(0);
    format!("{}...", &text[..cut])
}
