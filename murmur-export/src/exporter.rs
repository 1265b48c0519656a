use murmur_common::OutputFormat;
use serde::Serialize;
use serde_json::Value;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::csv::write_row;
use crate::flatten::flatten_record;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to serialize record: {0}")]
    Serialize(#[from] serde_json::Error),
}

enum Sink {
    Buffer(Vec<Value>),
    Lines(BufWriter<File>),
    Csv(BufWriter<File>),
}

/// Writes serialized records to a single output file.
pub struct Exporter {
    path: PathBuf,
    fields: Vec<String>,
    sink: Sink,
    written: usize,
}

impl Exporter {
    /// Open `path` for `format`, creating parent directories. CSV writes its header
    /// (`fields`) immediately; JSON writes nothing until [`close`](Self::close).
    pub fn create<P, S>(path: P, format: OutputFormat, fields: &[S]) -> Result<Self, ExportError>
    where
        P: AsRef<Path>,
        S: AsRef<str>,
    {
        let path = path.as_ref().to_path_buf();
        let io_err = |source| ExportError::Io {
            path: path.clone(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let fields: Vec<String> = fields.iter().map(|f| f.as_ref().to_owned()).collect();
        let sink = match format {
            OutputFormat::Json => Sink::Buffer(Vec::new()),
            OutputFormat::Jsonl => Sink::Lines(BufWriter::new(File::create(&path).map_err(io_err)?)),
            OutputFormat::Csv => {
                let mut out = BufWriter::new(File::create(&path).map_err(io_err)?);
                write_row(&mut out, &fields).map_err(io_err)?;
                Sink::Csv(out)
            }
        };

        tracing::debug!(path = %path.display(), %format, "exporter opened");
        Ok(Self {
            path,
            fields,
            sink,
            written: 0,
        })
    }

    /// Records accepted so far.
    pub fn written(&self) -> usize {
        self.written
    }

    pub fn write_one<T: Serialize>(&mut self, record: &T) -> Result<(), ExportError> {
        let value = serde_json::to_value(record)?;
        let path = &self.path;
        let io_err = |source| ExportError::Io {
            path: path.clone(),
            source,
        };
        match &mut self.sink {
            Sink::Buffer(rows) => rows.push(value),
            Sink::Lines(out) => {
                serde_json::to_writer(&mut *out, &value)?;
                out.write_all(b"\n").map_err(io_err)?;
            }
            Sink::Csv(out) => {
                let row = flatten_record(&value, &self.fields);
                write_row(&mut *out, &row).map_err(io_err)?;
            }
        }
        self.written += 1;
        Ok(())
    }

    pub fn write_many<'a, T, I>(&mut self, records: I) -> Result<(), ExportError>
    where
        T: Serialize + 'a,
        I: IntoIterator<Item = &'a T>,
    {
        records
            .into_iter()
            .try_for_each(|record| self.write_one(record))
    }

    /// Flush everything to disk and return the output path.
    pub fn close(self) -> Result<PathBuf, ExportError> {
        let path = self.path;
        let io_err = |source| ExportError::Io {
            path: path.clone(),
            source,
        };
        match self.sink {
            Sink::Buffer(rows) => {
                let mut out = BufWriter::new(File::create(&path).map_err(io_err)?);
                serde_json::to_writer_pretty(&mut out, &rows)?;
                out.write_all(b"\n").map_err(io_err)?;
                out.flush().map_err(io_err)?;
            }
            Sink::Lines(mut out) | Sink::Csv(mut out) => out.flush().map_err(io_err)?,
        }
        tracing::debug!(path = %path.display(), written = self.written, "exporter closed");
        Ok(path)
    }
}
