//! Loader for scraper settings with file + environment overlays.
//!
//! Settings come from an optional file (`settings.json`, or YAML/TOML by suffix)
//! merged with `MURMUR__`-prefixed environment variables. `${VAR}` placeholders in
//! string values are expanded before the typed [`Settings`] are built, and every
//! field has a default so a missing file is not an error.
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;

pub mod input;

pub use input::RunInput;

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;
const PROXY_ENV_FALLBACKS: [&str; 2] = ["HTTP_PROXY", "HTTPS_PROXY"];

/// Desktop Chrome on Windows; the mobile share page serves its lightest payload to it.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Settings {
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    /// Proxy URL applied to every live request. Falls back to `HTTP_PROXY` / `HTTPS_PROXY`.
    #[serde(default)]
    pub proxy: Option<String>,
    /// Maximum number of comments kept per video.
    #[serde(default = "default_max_items")]
    pub max_items: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_seconds: default_timeout_seconds(),
            proxy: None,
            max_items: default_max_items(),
        }
    }
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.into()
}
fn default_timeout_seconds() -> u64 {
    15
}
fn default_max_items() -> usize {
    100
}

/// Expand `$VAR`/`${VAR}` until the text stops changing, so variables that point at
/// other variables resolve. Cycles stop after a fixed number of passes.
fn expand_env_str(raw: &str) -> String {
    let mut current = raw.to_string();
    for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
        match shellexpand::env(&current) {
            Ok(next) if next.as_ref() != current.as_str() => current = next.into_owned(),
            _ => break,
        }
    }
    current
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) if s.contains('$') => *s = expand_env_str(s),
        Value::Array(items) => items.iter_mut().for_each(expand_env_in_value),
        Value::Object(map) => map.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

fn proxy_from_env() -> Option<String> {
    PROXY_ENV_FALLBACKS
        .iter()
        .filter_map(|name| std::env::var(name).ok())
        .map(|raw| raw.trim().to_string())
        .find(|raw| !raw.is_empty())
}

/// Builder hides the `config` crate wiring (settings file + env overrides).
pub struct SettingsLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
}

impl Default for SettingsLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsLoader {
    /// Start with no file sources; `MURMUR__` env overrides are applied on [`load`](Self::load)
    /// and every field falls back to its default.
    ///
    /// ```
    /// use murmur_config::SettingsLoader;
    ///
    /// let settings = SettingsLoader::new()
    ///     .with_json_str(r#"{ "max_items": 25 }"#)
    ///     .load()
    ///     .expect("valid settings");
    ///
    /// assert_eq!(settings.max_items, 25);
    /// assert_eq!(settings.timeout_seconds, 15);
    /// ```
    pub fn new() -> Self {
        Self {
            builder: Config::builder(),
        }
    }

    /// Attach a settings file; the `config` crate infers the format by suffix.
    /// A missing file is skipped so defaults apply.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "settings file missing, using defaults");
        }
        self.builder = self.builder.add_source(File::from(path).required(false));
        self
    }

    /// Allow tests/CLI to merge inline JSON snippets.
    pub fn with_json_str(mut self, json: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(json, config::FileFormat::Json));
        self
    }

    /// Consume the builder and deserialize the merged sources into [`Settings`].
    pub fn load(self) -> Result<Settings, ConfigError> {
        // Environment is added last so it wins over every file source.
        let cfg = self
            .builder
            .add_source(
                Environment::with_prefix("MURMUR")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        let mut typed: Settings =
            serde_json::from_value(v).map_err(|e| ConfigError::Message(e.to_string()))?;

        typed.proxy = typed
            .proxy
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .or_else(proxy_from_env);
        if typed.timeout_seconds == 0 {
            return Err(ConfigError::Message(
                "timeout_seconds must be greater than zero".into(),
            ));
        }

        Ok(typed)
    }
}
