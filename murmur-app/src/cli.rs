use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use murmur_common::OutputFormat;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Json,
    Jsonl,
    Csv,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Json => OutputFormat::Json,
            FormatArg::Jsonl => OutputFormat::Jsonl,
            FormatArg::Csv => OutputFormat::Csv,
        }
    }
}

#[derive(Debug, Clone, Parser)]
#[command(
    name = "murmur",
    version,
    about = "Extract structured comments from TikTok video URLs or a local sample file"
)]
pub struct Cli {
    /// TikTok video URL (repeatable). Overrides `startUrls` from the input file.
    #[arg(long = "url", short = 'u')]
    pub urls: Vec<String>,
    /// JSON file with `{ "startUrls": [...], "sampleComments": {...} }`.
    #[arg(long, short = 'i', default_value = "data/sample_input.json")]
    pub input_file: PathBuf,
    /// Settings file (JSON, YAML or TOML).
    #[arg(long, short = 's', default_value = "config/settings.json")]
    pub settings: PathBuf,
    /// Output path; the suffix picks the format unless `--format` is given.
    #[arg(long, short = 'o', default_value = "data/output_example.json")]
    pub out: PathBuf,
    /// Maximum comments per video (overrides settings).
    #[arg(long)]
    pub max_items: Option<usize>,
    /// Force the output format.
    #[arg(long, value_enum)]
    pub format: Option<FormatArg>,
    /// Emit JSON-encoded logs.
    #[arg(long)]
    pub log_json: bool,
}

impl Cli {
    pub fn output_format(&self) -> OutputFormat {
        OutputFormat::infer(&self.out, self.format.map(Into::into))
    }
}
