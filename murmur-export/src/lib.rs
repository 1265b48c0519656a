//! Record export to JSON, JSONL or CSV.
//!
//! JSON output is buffered and written as one pretty array on [`Exporter::close`];
//! JSONL and CSV stream one line per record. CSV columns come from a fixed list of
//! dot-paths so nested records flatten into a stable header.
pub mod csv;
pub mod exporter;
pub mod flatten;

pub use exporter::{ExportError, Exporter};
pub use flatten::{flatten_record, walk_path};
