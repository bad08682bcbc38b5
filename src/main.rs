use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use yt_transcript::output::{self, ErrorRecord};
use yt_transcript::{Cli, Config, TranscriptPipeline};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries only the JSON result
    let default_filter = if cli.verbose {
        "yt_transcript=debug"
    } else {
        "yt_transcript=warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let outcome = match cli.input.as_deref() {
        Some(input) => run(&cli, input).await,
        None => Err("Missing URL or video ID".to_string()),
    };

    let printed = match outcome {
        Ok(record) => output::print_json(&record).map(|_| ExitCode::SUCCESS),
        Err(message) => output::print_json(&ErrorRecord::new(message)).map(|_| ExitCode::FAILURE),
    };

    printed.unwrap_or_else(|err| {
        tracing::error!("Failed to write result: {:#}", err);
        ExitCode::FAILURE
    })
}

async fn run(cli: &Cli, input: &str) -> Result<output::OutputRecord, String> {
    // Bad input is reported before any config or client setup
    let video_id = yt_transcript::resolve(input).map_err(|err| err.to_string())?;

    let config = Config::load(cli.config.as_deref()).map_err(|err| format!("{:#}", err))?;
    let pipeline = TranscriptPipeline::new(&config).map_err(|err| format!("{:#}", err))?;

    pipeline.run_for(&video_id).await.map_err(|err| err.to_string())
}
