mod report;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "weekstats")]
#[command(about = "Weekly engagement stats across social and search platforms")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Collect stats for a window, print a summary and export a CSV
    Report {
        /// First day of the window (YYYY-MM-DD); defaults to 7 days before today
        #[arg(long)]
        start_date: Option<String>,
        /// Number of days to collect
        #[arg(long, default_value_t = 7)]
        days: u32,
        /// Output CSV filename (defaults to weekly_stats_YYYYMMDD.csv)
        #[arg(long)]
        output: Option<PathBuf>,
        /// Platforms to collect (default: all)
        #[arg(long, num_args = 1.., value_parser = report::parse_platform_id)]
        platforms: Vec<String>,
    },
    /// List platforms and whether credentials are configured
    Platforms,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = weekstats_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Report {
            start_date,
            days,
            output,
            platforms,
        } => {
            report::run_report(
                &config,
                start_date.as_deref(),
                days,
                output.as_deref(),
                &platforms,
            )
            .await?;
        }
        Commands::Platforms => report::run_platforms(&config),
    }

    Ok(())
}

#[cfg(test)]
mod tests;
