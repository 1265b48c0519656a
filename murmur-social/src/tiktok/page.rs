//! Pull raw comment lists out of page HTML and API responses.
//!
//! Shapes vary by locale and snapshot, so each lookup tries a few known paths and
//! reads anything unexpected as "no comments".
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

use super::resolve::is_blank;

/// Top-level SIGI_STATE entries that may carry a `comments` collection.
const SIGI_COMMENT_ROOTS: [&str; 2] = ["CommentItem", "Comments"];

fn sigi_state_re() -> &'static Regex {
    static SIGI_STATE_RE: OnceLock<Regex> = OnceLock::new();
    SIGI_STATE_RE.get_or_init(|| {
        Regex::new(r#"(?is)<script[^>]+id="SIGI_STATE"[^>]*>(.*?)</script>"#)
            .expect("valid SIGI_STATE regex")
    })
}

/// Parse the JSON embedded in `<script id="SIGI_STATE">`, if any.
pub fn sigi_state(html: &str) -> Option<Value> {
    let caps = sigi_state_re().captures(html)?;
    match serde_json::from_str(caps[1].trim()) {
        Ok(v) => Some(v),
        Err(e) => {
            tracing::debug!(error = %e, "SIGI_STATE is not valid JSON");
            None
        }
    }
}

/// Comments from a SIGI_STATE document. The collection may be an array or an
/// object keyed by comment id; only object entries are kept.
pub fn comments_from_sigi(state: &Value) -> Vec<Value> {
    let found = SIGI_COMMENT_ROOTS
        .iter()
        .filter_map(|root| state.get(*root)?.get("comments"))
        .find(|comments| !is_blank(comments));

    let entries: Vec<&Value> = match found {
        Some(Value::Array(list)) => list.iter().collect(),
        Some(Value::Object(map)) => map.values().collect(),
        _ => Vec::new(),
    };
    entries
        .into_iter()
        .filter(|entry| entry.is_object())
        .cloned()
        .collect()
}

/// Comments from a `comment/list` API body: `{comments: [...]}` or `{data: {comments: [...]}}`.
pub fn comments_from_api(body: &Value) -> Vec<Value> {
    if let Some(list) = body.get("comments").and_then(Value::as_array) {
        return list.clone();
    }
    body.get("data")
        .and_then(|data| data.get("comments"))
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default()
}
