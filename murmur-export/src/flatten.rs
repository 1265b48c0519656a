use serde_json::Value;

/// Follow a dot-path (`user.avatar_thumb.url_list`) through nested objects.
pub fn walk_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(value, |cur, part| cur.as_object()?.get(part))
}

/// One cell per field. Arrays and objects become compact JSON, `null` and missing
/// paths become `""`.
pub fn flatten_record<S: AsRef<str>>(value: &Value, fields: &[S]) -> Vec<String> {
    fields
        .iter()
        .map(|field| match walk_path(value, field.as_ref()) {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        })
        .collect()
}
