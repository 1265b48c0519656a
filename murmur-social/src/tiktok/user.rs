//! Author block normalization.
use serde_json::Value;

use super::keys;
use super::resolve::{Extractor, first_non_empty, resolve_string};
use super::types::CanonicalUser;

/// Avatar shapes in precedence order: snake_case thumb, camelCase thumb, single URL.
const AVATAR_EXTRACTORS: &[Extractor<Value, String>] =
    &[snake_avatar_thumb, camel_avatar_thumb, single_avatar];

/// Map any author payload onto a [`CanonicalUser`]. Non-objects give an empty user.
pub fn normalize_user(raw: &Value) -> CanonicalUser {
    if !raw.is_object() {
        return CanonicalUser::default();
    }
    CanonicalUser {
        nickname: resolve_string(raw, keys::NICKNAME),
        unique_id: resolve_string(raw, keys::UNIQUE_ID),
        avatar_urls: first_non_empty(raw, AVATAR_EXTRACTORS),
    }
}

fn snake_avatar_thumb(user: &Value) -> Option<Vec<String>> {
    let (thumb, list) = keys::AVATAR_THUMB_SNAKE;
    url_list(user.get(thumb)?.get(list)?)
}

fn camel_avatar_thumb(user: &Value) -> Option<Vec<String>> {
    let (thumb, list) = keys::AVATAR_THUMB_CAMEL;
    url_list(user.get(thumb)?.get(list)?)
}

fn single_avatar(user: &Value) -> Option<Vec<String>> {
    keys::AVATAR_SINGLE
        .iter()
        .filter_map(|key| user.get(*key)?.as_str())
        .map(str::trim)
        .find(|url| !url.is_empty())
        .map(|url| vec![url.to_string()])
}

fn url_list(list: &Value) -> Option<Vec<String>> {
    let urls = list
        .as_array()?
        .iter()
        .filter_map(Value::as_str)
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .map(str::to_owned)
        .collect();
    Some(urls)
}
