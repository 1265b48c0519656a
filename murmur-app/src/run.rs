//! One pass over the requested videos: fetch, fall back to samples, normalize, export.
use std::collections::HashSet;
use std::path::PathBuf;

use anyhow::{Context, Result};
use murmur_common::{MurmurError, OutputFormat};
use murmur_config::{RunInput, Settings, SettingsLoader};
use murmur_export::Exporter;
use murmur_social::source::{CommentSource, SampleComments};
use murmur_social::tiktok::{EXPORT_FIELDS, TikTokClient, normalize_batch};

use crate::cli::Cli;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub out: PathBuf,
    pub format: OutputFormat,
    pub urls: usize,
    pub written: usize,
}

/// Load settings, build the live client and process every URL.
pub async fn run(cli: Cli) -> Result<RunSummary> {
    let settings = SettingsLoader::new()
        .with_file(&cli.settings)
        .load()
        .with_context(|| format!("failed to load settings from {}", cli.settings.display()))?;

    let live = TikTokClient::new(&settings).context("failed to build HTTP client")?;
    run_with_source(&cli, &settings, &live).await
}

/// The run loop against an arbitrary live source.
pub async fn run_with_source(
    cli: &Cli,
    settings: &Settings,
    live: &dyn CommentSource,
) -> Result<RunSummary> {
    let input = RunInput::load(&cli.input_file).unwrap_or_else(|e| {
        tracing::warn!(path = %cli.input_file.display(), error = %e, "failed to load input file");
        RunInput::default()
    });

    let candidates = if cli.urls.is_empty() {
        input.start_urls()
    } else {
        cli.urls.clone()
    };
    let urls = unique_urls(candidates);
    if urls.is_empty() {
        tracing::error!("no video URLs provided; use --url or add 'startUrls' to the input file");
        return Err(MurmurError::NoUrls.into());
    }

    let samples = SampleComments::new(input.into_samples());
    let max_items = cli.max_items.unwrap_or(settings.max_items);
    let format = cli.output_format();

    let mut exporter = Exporter::create(&cli.out, format, &EXPORT_FIELDS)
        .with_context(|| format!("failed to open output {}", cli.out.display()))?;

    for url in &urls {
        tracing::info!(%url, "processing video");

        let mut raw = live.fetch_comments(url, max_items).await;
        if raw.is_empty() && samples.contains(url) {
            tracing::info!(%url, "falling back to local sample comments");
            raw = samples.fetch_comments(url, max_items).await;
        }

        let records = normalize_batch(&raw, url);
        match exporter.write_many(&records) {
            Ok(()) => tracing::info!(%url, count = records.len(), "comments written"),
            Err(e) => tracing::error!(%url, error = %e, "failed to write comments"),
        }
    }

    let written = exporter.written();
    let out = exporter
        .close()
        .with_context(|| format!("failed to finalize output {}", cli.out.display()))?;
    tracing::info!(total = written, out = %out.display(), %format, "all done");

    Ok(RunSummary {
        out,
        format,
        urls: urls.len(),
        written,
    })
}

/// Drop blank entries and repeats, keeping the first occurrence of each URL.
pub fn unique_urls<I>(urls: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    urls.into_iter()
        .filter(|url| !url.trim().is_empty())
        .filter(|url| seen.insert(url.clone()))
        .collect()
}
