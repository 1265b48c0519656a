//! The run input file: `{ "startUrls": [...], "sampleComments": { "<url>": [...] } }`.
//!
//! `sampleComments` lets a run replay recorded payloads for a URL when the live
//! fetch comes back empty, which keeps offline runs deterministic.
use murmur_common::{MurmurError, Result};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunInput {
    #[serde(default)]
    start_urls: Value,
    #[serde(default)]
    sample_comments: Value,
}

impl RunInput {
    /// Read and parse an input file. The top level must be a JSON object.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(MurmurError::Input(format!(
                "input file not found: {}",
                path.display()
            )));
        }
        let raw = std::fs::read_to_string(path)
            .map_err(|e| MurmurError::Input(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        let value: Value =
            serde_json::from_str(raw).map_err(|e| MurmurError::Input(e.to_string()))?;
        if !value.is_object() {
            return Err(MurmurError::Input(
                "input JSON must be an object with keys like 'startUrls' and optional 'sampleComments'"
                    .into(),
            ));
        }
        serde_json::from_value(value).map_err(|e| MurmurError::Input(e.to_string()))
    }

    /// String entries of `startUrls`, in file order. Non-strings are skipped, and
    /// anything other than a list (or null) counts as no URLs.
    pub fn start_urls(&self) -> Vec<String> {
        let list = match &self.start_urls {
            Value::Array(list) => list,
            Value::Null => return Vec::new(),
            other => {
                tracing::warn!(kind = %json_kind(other), "ignoring non-list startUrls");
                return Vec::new();
            }
        };
        list.iter()
            .filter_map(Value::as_str)
            .map(str::to_owned)
            .collect()
    }

    /// Sample payloads keyed by URL. Entries that are not lists are dropped.
    pub fn into_samples(self) -> HashMap<String, Vec<Value>> {
        let by_url = match self.sample_comments {
            Value::Object(map) => map,
            Value::Null => return HashMap::new(),
            other => {
                tracing::warn!(kind = %json_kind(&other), "ignoring non-object sampleComments");
                return HashMap::new();
            }
        };
        by_url
            .into_iter()
            .filter_map(|(url, items)| match items {
                Value::Array(list) => Some((url, list)),
                other => {
                    tracing::warn!(%url, kind = %json_kind(&other), "ignoring non-list sample comments");
                    None
                }
            })
            .collect()
    }
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
