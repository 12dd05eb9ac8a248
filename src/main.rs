use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use yt_transcript::provider::TranscriptProvider;
use yt_transcript::{output, utils, Cli, Config, ExtractionOutcome, TranscriptFetcher, YoutubeProvider};

fn init_tracing(verbose: bool, json: bool) {
    let default_filter = if verbose { "yt_transcript=debug" } else { "yt_transcript=warn" };

    // stdout carries the JSON result only
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(json.then(|| tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr)))
        .with((!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr)))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_json);

    let Some(video) = cli.video.as_deref() else {
        output::print_outcome(&ExtractionOutcome::missing_url(), cli.pretty)?;
        std::process::exit(1);
    };

    let config = Config::load(cli.config.as_deref())?.with_base_url(cli.base_url.clone())?;

    let languages = cli
        .languages
        .as_deref()
        .map(utils::parse_language_list)
        .unwrap_or_else(|| config.app.default_languages.clone());

    let provider = YoutubeProvider::new(config.provider.clone())?;
    tracing::debug!("Using {} provider at {}", provider.provider_name(), config.provider.base_url);

    let fetcher = TranscriptFetcher::new(Box::new(provider));
    let outcome = fetcher.fetch(video, &languages).await;

    output::print_outcome(&outcome, cli.pretty || config.app.pretty)?;

    Ok(())
}
