use anyhow::Context;
use clap::Parser;
use mood_aggregator::SearchService;
use mood_core::{AppConfig, ErrorExt, ErrorReporter};
use reddit_client::RedditCollector;
use sentiment_engine::LexiconAnalyzer;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

mod report;

const DEFAULT_LOG_FILTER: &str = "reddit_mood=info,mood_aggregator=info,reddit_client=info";

/// Weighted sentiment of what Reddit is saying about a topic
#[derive(Parser, Debug)]
#[command(name = "reddit-mood")]
#[command(version)]
struct Cli {
    /// Print the outcome as JSON instead of text
    #[arg(long)]
    json: bool,

    /// TOML configuration file; environment variables override it
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Print Reddit API request metrics as JSON to stderr after the search
    #[arg(long)]
    metrics: bool,

    /// Topic to search for
    #[arg(value_name = "TOPIC")]
    topic: Vec<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env file is fine; real environment variables still apply.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = AppConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    info!("Starting reddit-mood");

    let analyzer = LexiconAnalyzer::new();
    let service = match RedditCollector::connect(&config).await {
        Ok(collector) => SearchService::new(collector, analyzer),
        Err(error) => {
            ErrorReporter::new().report_warning(&error);
            SearchService::unavailable(error.to_string(), analyzer)
        }
    }
    .with_limits(config.corpus_limits())
    .with_search_timeout(config.search_timeout());

    let topic = cli.topic.join(" ");
    let result = service.handle_search(&topic).await;

    if cli.metrics {
        if let Some(collector) = service.collector() {
            let metrics = collector
                .api()
                .export_metrics()
                .await
                .context("failed to export metrics")?;
            eprintln!("{metrics}");

            let rate_limit = collector.api().get_rate_limit_status().await;
            eprintln!("{}", report::render_rate_limit(&rate_limit));
        }
    }

    match result {
        Ok(outcome) => {
            let rendered = if cli.json {
                report::render_json(&outcome).context("failed to serialize outcome")?
            } else {
                report::render_text(&outcome)
            };
            print!("{rendered}");
            if cli.json {
                println!();
            }
            debug!("Search finished");
            Ok(ExitCode::SUCCESS)
        }
        Err(error) => {
            ErrorReporter::new().report(&error);
            eprintln!("{}", error.user_friendly_message());
            Ok(ExitCode::FAILURE)
        }
    }
}
