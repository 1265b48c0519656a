use anyhow::Result;
use clap::Parser;
use murmur_app::cli::Cli;
use murmur_app::run;
use murmur_common::observability::{LogConfig, LogFormat, init_logging};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(LogConfig {
        emit_stderr: true,
        format: if cli.log_json {
            LogFormat::Json
        } else {
            LogFormat::Text
        },
        ..LogConfig::default()
    })?;

    run::run(cli).await?;
    Ok(())
}
