//! Field lookup and coercion over untyped JSON mappings.
//!
//! Nothing here returns an error: a wrong shape reads as "absent" and every
//! coercion has a total default.
use serde_json::Value;

/// Signature shared by the ordered extractors fed to [`first_non_empty`].
pub type Extractor<I, T> = fn(&I) -> Option<Vec<T>>;

/// `true` for values that count as missing when picking a candidate:
/// `null`, `""`, `[]`, `{}`, numeric zero and `false`.
pub fn is_blank(v: &Value) -> bool {
    match v {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f == 0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

/// JSON truthiness; the inverse of [`is_blank`].
pub fn truthy(v: &Value) -> bool {
    !is_blank(v)
}

/// First candidate key whose value is present and not blank.
///
/// Non-object input yields `None` for every key.
///
/// ```
/// use murmur_social::tiktok::resolve::resolve;
/// use serde_json::json;
///
/// let raw = json!({ "aweme_id": "", "awemeId": "77" });
/// assert_eq!(resolve(&raw, &["aweme_id", "awemeId"]), Some(&json!("77")));
/// assert_eq!(resolve(&json!("nope"), &["aweme_id"]), None);
/// ```
pub fn resolve<'a>(raw: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    let map = raw.as_object()?;
    keys.iter()
        .filter_map(|key| map.get(*key))
        .find(|v| !is_blank(v))
}

/// First candidate key that is present and not `null`, even if it holds `0`,
/// `false` or `""`. Numeric and boolean fields use this so literal zeros win.
pub fn first_present<'a>(raw: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    let map = raw.as_object()?;
    keys.iter()
        .filter_map(|key| map.get(*key))
        .find(|v| !v.is_null())
}

/// Render a scalar as text. Arrays and objects become compact JSON.
pub fn stringify(v: &Value) -> String {
    match v {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

/// [`resolve`] then [`stringify`], defaulting to `""`.
pub fn resolve_string(raw: &Value, keys: &[&str]) -> String {
    resolve(raw, keys).map(stringify).unwrap_or_default()
}

/// Conservative count/timestamp coercion.
///
/// Non-negative JSON integers pass through. Strings must be all ASCII digits and
/// fit in a `u64`. Floats, negatives, booleans and everything else become `0`.
pub fn coerce_count(v: Option<&Value>) -> u64 {
    match v {
        Some(Value::Number(n)) => n.as_u64().unwrap_or(0),
        Some(Value::String(s)) if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) => {
            s.parse().unwrap_or(0)
        }
        _ => 0,
    }
}

/// Run `extractors` in order and return the first non-empty result, or `[]`.
pub fn first_non_empty<I, T>(input: &I, extractors: &[Extractor<I, T>]) -> Vec<T> {
    extractors
        .iter()
        .filter_map(|extract| extract(input))
        .find(|found| !found.is_empty())
        .unwrap_or_default()
}
