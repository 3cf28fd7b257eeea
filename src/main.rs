use std::time::Duration;

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use overview_mentions::{
    analyzer::MentionAnalyzer,
    cli::Args,
    config::Config,
    overview::OverviewBlock,
    report,
    search::SerpApiClient,
    types::{AppError, AppResult},
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing (stderr, so stdout only carries the report)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "overview_mentions=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    args.validate()?;

    let config = Config::from_env()?;
    let client = SerpApiClient::from_config(&config.search).map_err(AppError::from)?;

    let spinner = spinner("Searching the web");
    let overview = match lookup(&client, &args).await {
        Ok(overview) => overview,
        Err(e) => {
            spinner.finish_with_message("💀 Search failed");
            return Err(e.into());
        }
    };

    match &overview {
        Some(_) => spinner.finish_with_message("✅ AI Overview retrieved"),
        None => spinner.finish_with_message("💀 No AI Overview"),
    }

    let report = MentionAnalyzer::new(&args.company).analyze(overview.as_ref());
    info!(mentioned = report.mentioned, "Analysis complete");

    if args.json {
        println!("{}", report::render_json(&report, overview.is_some())?);
    } else {
        println!("{}", report::render_text(&report, overview.is_some(), args.metrics));
    }

    Ok(())
}

async fn lookup(client: &SerpApiClient, args: &Args) -> AppResult<Option<OverviewBlock>> {
    let response = client.search_query(&args.query, args.location()).await?;
    Ok(client.fetch_overview(&response).await?)
}

fn spinner(message: &'static str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}
