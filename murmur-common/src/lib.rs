//! Common types and utilities shared across Murmur crates.
//!
//! This crate defines the shared error type, the export format selector, and the
//! observability helpers used throughout the Murmur workspace. It stays
//! dependency-minimal so every crate can depend on it without pulling in the
//! HTTP or CLI stacks.
//!
//! # Overview
//!
//! - [`observability`]: Centralised tracing/logging initialisation
//! - [`MurmurError`] and [`Result`]: Shared error handling
//! - [`OutputFormat`]: Which file format the exporter writes
//!
//! # Examples
//!
//! Picking an export format from an output path:
//!
//! ```rust
//! use murmur_common::OutputFormat;
//!
//! assert_eq!(OutputFormat::infer("out/comments.csv", None), OutputFormat::Csv);
//! assert_eq!(OutputFormat::infer("out/comments.txt", None), OutputFormat::Json);
//! assert_eq!(
//!     OutputFormat::infer("out/comments.csv", Some(OutputFormat::Jsonl)),
//!     OutputFormat::Jsonl
//! );
//! ```
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

pub mod observability;

/// Preferred output format for exported comment records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// A single pretty-printed JSON array.
    Json,
    /// One compact JSON object per line.
    Jsonl,
    /// Flattened rows with a fixed header.
    Csv,
}

impl OutputFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Jsonl => "jsonl",
            OutputFormat::Csv => "csv",
        }
    }

    /// Resolve the format for `path`. An explicit choice always wins; otherwise the
    /// file suffix decides and anything unrecognised falls back to JSON.
    pub fn infer<P: AsRef<Path>>(path: P, forced: Option<OutputFormat>) -> OutputFormat {
        if let Some(format) = forced {
            return format;
        }
        let suffix = path
            .as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());
        match suffix.as_deref() {
            Some("jsonl") => OutputFormat::Jsonl,
            Some("csv") => OutputFormat::Csv,
            _ => OutputFormat::Json,
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = MurmurError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "jsonl" => Ok(OutputFormat::Jsonl),
            "csv" => Ok(OutputFormat::Csv),
            other => Err(MurmurError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Error types used across the Murmur system.
#[derive(thiserror::Error, Debug)]
pub enum MurmurError {
    /// The run input (URL list / sample payloads) could not be read.
    #[error("Input error: {0}")]
    Input(String),

    /// An export format name that the exporter does not know.
    #[error("Unsupported export format: {0}")]
    UnsupportedFormat(String),

    /// No video URLs were supplied on the command line or in the input file.
    #[error("No video URLs provided")]
    NoUrls,
}

/// Convenient alias for results that use [`MurmurError`].
pub type Result<T> = std::result::Result<T, MurmurError>;
