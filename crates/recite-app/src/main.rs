mod cli;
mod commands;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use recite_config::Config;
use recite_config::log::LogConfig;
use recite_core::request_log::RequestContext;
use recite_fetcher::IcibaFetcher;
use recite_service::ReciteService;
use recite_store::Database;
use tracing_subscriber::EnvFilter;

use self::cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => Config::new(),
    };
    init_tracing(&config.log);

    let db = Database::connect(&config.store.database_url, config.store.max_connections)
        .await
        .context("failed to open database")?;
    let fetcher = IcibaFetcher::new(&config.fetcher, config.storage.word_mp3_root())
        .context("failed to build dictionary client")?;
    let service = ReciteService::new(db.clone(), Arc::new(fetcher), &config);

    let ctx = RequestContext::new();
    let envelope = commands::dispatch(&service, &ctx, cli.command).await;
    tracing::debug!(log_id = ctx.log_id(), errno = envelope.errno, cost_ms = ctx.elapsed_ms() as u64, "command finished");

    let output = if cli.pretty {
        serde_json::to_string_pretty(&envelope)
    } else {
        serde_json::to_string(&envelope)
    }
    .context("failed to encode response")?;
    println!("{output}");

    db.close().await;

    Ok(if envelope.errno == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Logs go to stderr so stdout only carries the envelope
fn init_tracing(config: &LogConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.filter));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(atty::is(atty::Stream::Stderr));

    if config.json {
        builder.json().init();
    } else {
        builder.init();
    }
}
