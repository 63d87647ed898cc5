mod cli;
mod core;

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::core::window::StatisticsPeriod;

#[derive(Parser)]
#[command(
    name = "ddb-cost",
    about = "Compare DynamoDB provisioned and on-demand cost from historical metrics",
    version
)]
struct Cli {
    /// Provider credentials file (.json or .toml)
    config: PathBuf,

    /// Table to analyse
    table: String,

    /// Days of history to sample
    #[arg(value_parser = clap::value_parser!(u32).range(1..))]
    lookback_days: u32,

    /// Override the region from the config file
    #[arg(long)]
    region: Option<String>,

    /// Statistics period in seconds (default: one bucket spanning the window)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    period_secs: Option<u32>,

    /// Emit the projection as JSON
    #[arg(short = 'j', long = "json")]
    json: bool,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    /// Disable ANSI colors
    #[arg(long)]
    no_color: bool,

    /// Verbose logging to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // Usage goes to stdout; the exit code stays clap's.
            print!("{}", err.render());
            std::process::exit(err.exit_code());
        }
    };

    init_logging(cli.verbose);

    let output_opts = cli::output::OutputOptions {
        format: if cli.json {
            cli::output::OutputFormat::Json
        } else {
            cli::output::OutputFormat::Text
        },
        pretty: cli.pretty,
        use_color: cli::output::detect_color(!cli.no_color),
        verbose: cli.verbose,
    };

    let args = cli::estimate_cmd::EstimateArgs {
        config_path: &cli.config,
        table_name: &cli.table,
        lookback_days: cli.lookback_days,
        region: cli.region.clone(),
        period: cli
            .period_secs
            .map(StatisticsPeriod::Seconds)
            .unwrap_or_default(),
    };
    cli::estimate_cmd::run(args, &output_opts).await?;

    Ok(())
}
