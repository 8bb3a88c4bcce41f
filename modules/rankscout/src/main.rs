use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use rankscout::{
    fetcher::SerpApiFetcher,
    pacing::{PacedFetcher, Pacer},
    pipeline::RankPipeline,
    runner::{rank_sheet, RowErrorPolicy},
    sheet::Sheet,
};
use rankscout_common::Config;

#[derive(Parser)]
#[command(
    name = "rankscout",
    about = "Google Search and Places rank tracker for keyword/website sheets"
)]
struct Cli {
    /// Input CSV with `Keyword` and `Website` columns
    #[arg(long, default_value = "Ranking_Website.csv")]
    input: PathBuf,

    /// Where to write the ranked CSV
    #[arg(long, default_value = "Agentic_Ranking_Website_Results.csv")]
    output: PathBuf,

    /// What to do when a row fails
    #[arg(long, value_enum, default_value_t = RowErrorPolicy::Abort)]
    on_row_error: RowErrorPolicy,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("rankscout=info".parse()?))
        .init();

    let cli = Cli::parse();
    info!("Rankscout starting...");

    let config = Config::from_env()?;
    config.log_redacted();

    let input = Sheet::read_csv(&cli.input)?;
    info!(input = %cli.input.display(), rows = input.rows.len(), "Loaded input sheet");

    let fetcher = PacedFetcher::new(
        SerpApiFetcher::from_config(&config),
        Pacer::new(config.call_delay),
    );
    let pipeline = RankPipeline::from_config(&config);

    let (output, stats) = rank_sheet(&pipeline, &fetcher, &input, cli.on_row_error).await?;
    output.write_csv(&cli.output)?;

    info!(output = %cli.output.display(), "Ranking complete. {stats}");
    Ok(())
}
