//! Process-wide `tracing` setup for the `murmur` binary and integration tests.
//!
//! [`init_logging`] installs one subscriber: a daily rolling file sink plus an
//! optional `stderr` mirror, both in the same encoding and behind one
//! `EnvFilter`. The first call wins; later calls only return the log path.

use std::env;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::Context;
use chrono::Local;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt};

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();
static LOG_PATH: OnceLock<PathBuf> = OnceLock::new();

const LOG_DIR_ENV: &str = "MURMUR_LOG_DIR";

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Used for the default directory and the log file name.
    pub app_name: &'static str,
    /// Explicit log directory. Otherwise `MURMUR_LOG_DIR`, then `~/.local/share/<app_name>`.
    pub log_dir: Option<PathBuf>,
    /// Mirror every event to `stderr`.
    pub emit_stderr: bool,
    pub format: LogFormat,
    /// Filter used when `RUST_LOG` is unset.
    pub default_filter: &'static str,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            app_name: "murmur",
            log_dir: None,
            emit_stderr: false,
            format: LogFormat::Text,
            default_filter: "info",
        }
    }
}

impl LogConfig {
    /// Directory the rolling file lives in.
    pub fn directory(&self) -> PathBuf {
        if let Some(dir) = &self.log_dir {
            return expand_home(dir);
        }
        match env::var(LOG_DIR_ENV) {
            Ok(dir) if !dir.trim().is_empty() => expand_home(Path::new(dir.trim())),
            _ => home_dir()
                .map(|home| home.join(".local").join("share").join(self.app_name))
                .unwrap_or_else(|| PathBuf::from(".").join(self.app_name)),
        }
    }

    /// File name the daily appender writes today: `<app>.log.YYYY-MM-DD`.
    pub fn todays_file_name(&self) -> String {
        format!("{}.log.{}", self.app_name, Local::now().format("%Y-%m-%d"))
    }
}

/// Install the global subscriber and return today's log file path.
pub fn init_logging(config: LogConfig) -> anyhow::Result<PathBuf> {
    if let Some(path) = LOG_PATH.get() {
        return Ok(path.clone());
    }

    let dir = config.directory();
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create log directory {}", dir.display()))?;
    let path = dir.join(config.todays_file_name());

    let (file_writer, guard) =
        tracing_appender::non_blocking(rolling::daily(&dir, format!("{}.log", config.app_name)));
    let _ = LOG_GUARD.set(guard);

    let mut sinks = vec![sink(config.format, file_writer, false)];
    if config.emit_stderr {
        sinks.push(sink(config.format, std::io::stderr, true));
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.default_filter));

    tracing_subscriber::registry()
        .with(sinks)
        .with(filter)
        .try_init()
        .context("failed to install tracing subscriber")?;

    let _ = LOG_PATH.set(path.clone());
    Ok(path)
}

fn sink<W>(format: LogFormat, writer: W, ansi: bool) -> BoxedLayer
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    match format {
        LogFormat::Text => fmt::layer().with_writer(writer).with_ansi(ansi).boxed(),
        LogFormat::Json => fmt::layer().json().with_writer(writer).boxed(),
    }
}

fn home_dir() -> Option<PathBuf> {
    env::var_os("HOME").filter(|h| !h.is_empty()).map(PathBuf::from)
}

fn expand_home(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), home_dir()) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}
