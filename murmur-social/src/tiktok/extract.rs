//! Raw comment payload → [`CanonicalComment`].
//!
//! Every field is derived independently from its candidate keys in [`keys`].
//! String fields take the first non-blank candidate; counts, timestamps and the
//! pin flag take the first present candidate so a literal `0`/`false` is kept.
use serde_json::Value;

use super::keys;
use super::resolve::{
    coerce_count, first_present, is_blank, resolve, resolve_string, stringify, truthy,
};
use super::types::CanonicalComment;
use super::user::normalize_user;

/// Mobile deep-link prefix used when a payload carries no share URL.
pub const SHARE_URL_PREFIX: &str = "https://m.tiktok.com/v";

/// Build the canonical record for one raw comment. Never fails.
pub fn normalize_comment(raw: &Value, source_url: &str) -> CanonicalComment {
    let aweme_id = resolve_string(raw, keys::AWEME_ID);
    let comment_id = resolve_string(raw, keys::COMMENT_ID);
    let share_url = share_url(raw, &aweme_id, &comment_id, source_url);

    CanonicalComment {
        author_pinned: first_present(raw, keys::AUTHOR_PIN).is_some_and(truthy),
        language: resolve_string(raw, keys::LANGUAGE),
        create_time: coerce_count(first_present(raw, keys::CREATE_TIME)),
        like_count: coerce_count(first_present(raw, keys::LIKE_COUNT)),
        reply_count: coerce_count(first_present(raw, keys::REPLY_COUNT)),
        text: resolve_string(raw, keys::TEXT),
        user: resolve(raw, keys::USER)
            .map(normalize_user)
            .unwrap_or_default(),
        aweme_id,
        comment_id,
        share_url,
    }
}

/// Whether `raw` looks enough like a comment to be worth normalizing: an object
/// with a non-blank text-bearing or identity key.
pub fn is_comment_like(raw: &Value) -> bool {
    raw.is_object() && (resolve(raw, keys::TEXT).is_some() || resolve(raw, keys::COMMENT_ID).is_some())
}

/// Filter and normalize a batch fetched for `source_url`, preserving order.
pub fn normalize_batch<'a, I>(items: I, source_url: &str) -> Vec<CanonicalComment>
where
    I: IntoIterator<Item = &'a Value>,
{
    let mut dropped = 0usize;
    let records: Vec<CanonicalComment> = items
        .into_iter()
        .filter(|raw| {
            let keep = is_comment_like(raw);
            if !keep {
                dropped += 1;
            }
            keep
        })
        .map(|raw| normalize_comment(raw, source_url))
        .collect();

    if dropped > 0 {
        tracing::debug!(source_url, dropped, kept = records.len(), "dropped non-comment items");
    }
    records
}

/// `<prefix>/<aweme_id>.html?share_comment_id=<comment_id>`.
pub fn deep_link(aweme_id: &str, comment_id: &str) -> String {
    format!("{SHARE_URL_PREFIX}/{aweme_id}.html?share_comment_id={comment_id}")
}

fn share_url(raw: &Value, aweme_id: &str, comment_id: &str, source_url: &str) -> String {
    let provided = raw
        .get(keys::SHARE_INFO)
        .filter(|info| info.is_object())
        .and_then(|info| info.get(keys::SHARE_URL))
        .filter(|url| !is_blank(url));
    if let Some(url) = provided {
        return stringify(url);
    }
    if !aweme_id.is_empty() && !comment_id.is_empty() {
        return deep_link(aweme_id, comment_id);
    }
    source_url.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tiktok::types::CanonicalUser;
    use serde_json::json;

    const SOURCE: &str = "https://tiktok.com/x";

    #[test]
    fn full_snake_case_payload() {
        let raw = json!({
            "cid": "7301",
            "aweme_id": "7171782248281165058",
            "text": "first!",
            "comment_language": "en",
            "create_time": 1700000000,
            "digg_count": "41",
            "reply_comment_total": 2,
            "author_pin": true,
            "user": {
                "nickname": "Ana",
                "unique_id": "ana.k",
                "avatar_thumb": { "url_list": ["https://p16.example/a.jpeg"] }
            },
            "share_info": { "url": "https://www.tiktok.com/@ana.k/video/1?c=7301" }
        });

        let record = normalize_comment(&raw, SOURCE);
        assert!(record.author_pinned);
        assert_eq!(record.aweme_id, "7171782248281165058");
        assert_eq!(record.comment_id, "7301");
        assert_eq!(record.language, "en");
        assert_eq!(record.create_time, 1_700_000_000);
        assert_eq!(record.like_count, 41);
        assert_eq!(record.reply_count, 2);
        assert_eq!(record.text, "first!");
        assert_eq!(record.user.nickname, "Ana");
        assert_eq!(record.user.avatar_urls, vec!["https://p16.example/a.jpeg"]);
        assert_eq!(record.share_url, "https://www.tiktok.com/@ana.k/video/1?c=7301");
    }

    #[test]
    fn camel_case_payload_with_author() {
        let raw = json!({
            "id": 99,
            "awemeId": 123,
            "content": "hola",
            "lang": "es",
            "createTime": "1690000000",
            "likes": 7,
            "replies": "0",
            "isPinned": 1,
            "author": { "displayName": "Luz", "username": "luz" }
        });

        let record = normalize_comment(&raw, SOURCE);
        assert!(record.author_pinned);
        assert_eq!(record.aweme_id, "123");
        assert_eq!(record.comment_id, "99");
        assert_eq!(record.text, "hola");
        assert_eq!(record.language, "es");
        assert_eq!(record.create_time, 1_690_000_000);
        assert_eq!(record.like_count, 7);
        assert_eq!(record.reply_count, 0);
        assert_eq!(record.user.nickname, "Luz");
        assert_eq!(record.user.unique_id, "luz");
        assert_eq!(record.share_url, deep_link("123", "99"));
    }

    #[test]
    fn first_candidate_wins() {
        let raw = json!({ "aweme_id": "first", "awemeId": "second", "cid": "1" });
        assert_eq!(normalize_comment(&raw, SOURCE).aweme_id, "first");
    }

    #[test]
    fn literal_zero_and_false_are_respected() {
        let raw = json!({
            "cid": "1",
            "author_pin": false,
            "isPinned": true,
            "digg_count": 0,
            "like_count": 50
        });
        let record = normalize_comment(&raw, SOURCE);
        assert!(!record.author_pinned);
        assert_eq!(record.like_count, 0);
    }

    #[test]
    fn numeric_coercion_rules() {
        let time = |v: Value| normalize_comment(&json!({ "create_time": v }), SOURCE).create_time;
        assert_eq!(time(json!("12345")), 12345);
        assert_eq!(time(json!("12a45")), 0);
        assert_eq!(time(json!(-5)), 0);
        assert_eq!(time(json!(3.7)), 0);
        assert_eq!(normalize_comment(&json!({}), SOURCE).create_time, 0);
    }

    #[test]
    fn share_url_is_synthesized_from_ids() {
        let raw = json!({ "aweme_id": "123", "cid": "456" });
        assert_eq!(
            normalize_comment(&raw, SOURCE).share_url,
            "https://m.tiktok.com/v/123.html?share_comment_id=456"
        );
    }

    #[test]
    fn share_url_falls_back_to_source() {
        let raw = json!({ "cid": "456", "share_info": { "url": "" } });
        assert_eq!(normalize_comment(&raw, SOURCE).share_url, SOURCE);

        let raw = json!({ "cid": "456", "share_info": "https://not-a-mapping" });
        assert_eq!(normalize_comment(&raw, "").share_url, "");
    }

    #[test]
    fn totality_over_malformed_inputs() {
        let inputs = [
            json!({}),
            json!(null),
            json!("not a mapping"),
            json!([1, 2, 3]),
            json!({
                "user": "bob",
                "share_info": [1],
                "create_time": { "nested": true },
                "digg_count": [10],
                "text": { "rich": "text" },
                "author_pin": "yes",
                "cid": null
            }),
            json!({ "author": { "avatarThumb": 4, "avatar_thumb": { "url_list": { "0": "x" } } } }),
        ];
        for raw in &inputs {
            let record = normalize_comment(raw, SOURCE);
            assert_eq!(record.create_time, 0);
            assert_eq!(record.like_count, 0);
            assert!(!record.share_url.is_empty());
            let value = serde_json::to_value(&record).unwrap();
            assert_eq!(value.as_object().unwrap().len(), 10);
        }

        let odd = normalize_comment(&inputs[4], SOURCE);
        assert_eq!(odd.text, r#"{"rich":"text"}"#);
        assert!(odd.author_pinned);
        assert_eq!(odd.user, CanonicalUser::default());
    }

    #[test]
    fn normalizing_canonical_output_is_stable() {
        let raw = json!({
            "id": "55",
            "videoId": "900",
            "comment": "again",
            "timestamp": 1600000000,
            "likes": "3",
            "pinned": true,
            "author": {
                "nickname": "Kai",
                "uid": 42,
                "avatarThumb": { "urlList": [" http://k/1.jpg "] }
            }
        });
        let first = normalize_comment(&raw, SOURCE);
        let refed = serde_json::to_value(&first).unwrap();
        assert_eq!(normalize_comment(&refed, SOURCE), first);
        assert_eq!(normalize_comment(&refed, "https://elsewhere"), first);
    }

    #[test]
    fn validity_filter() {
        assert!(!is_comment_like(&json!({ "text": "" })));
        assert!(is_comment_like(&json!({ "text": "hi" })));
        assert!(is_comment_like(&json!({ "id": "5" })));
        assert!(is_comment_like(&json!({ "comment_id": 8 })));
        assert!(!is_comment_like(&json!({})));
        assert!(!is_comment_like(&json!("not a mapping")));
        assert!(!is_comment_like(&json!({ "cid": 0, "content": null, "user": { "nickname": "x" } })));
    }

    #[test]
    fn batch_filters_and_keeps_order() {
        let items = vec![
            json!({ "cid": "1", "text": "a" }),
            json!("garbage"),
            json!({ "text": "" }),
            json!({ "cid": "2", "text": "b" }),
        ];
        let records = normalize_batch(&items, SOURCE);
        let ids: Vec<&str> = records.iter().map(|r| r.comment_id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
    }
}
