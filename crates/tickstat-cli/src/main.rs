mod cli;
mod error;
mod output;
mod report;

use std::process::ExitCode;

use clap::Parser;
use tickstat_core::{load_portfolio, AnalyzerConfig, CsvFileSource, DataSource, QuandlSource};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, ExtraReport};
use crate::error::CliError;
use crate::report::ReportSet;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let (args, ignored) = cli::partition_args(std::env::args_os());
    let reports = cli::extra_reports(&args);
    let cli = Cli::parse_from(args);
    init_tracing(&cli.log_level);

    if !ignored.is_empty() {
        debug!(?ignored, "ignoring unrecognized arguments");
    }
    debug!(
        max_daily_profit = cli.max_daily_profit,
        busy_day = cli.busy_day,
        biggest_loser = cli.biggest_loser,
        ?reports,
        "requested reports"
    );

    match run(&cli, &reports).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::from(error.exit_code())
        }
    }
}

fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("tickstat={log_level},tickstat_core={log_level}"))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: &Cli, reports: &[ExtraReport]) -> Result<(), CliError> {
    let config = cli.apply_to(AnalyzerConfig::from_env()?)?;

    let source: Box<dyn DataSource> = match &cli.csv_dir {
        Some(dir) => Box::new(CsvFileSource::new(dir)),
        None => Box::new(QuandlSource::with_reqwest(
            config.provider.clone(),
            config.retry.clone(),
        )),
    };
    info!(
        source = source.id(),
        tickers = config.tickers.len(),
        start = %config.range.start(),
        end = %config.range.end(),
        "loading portfolio"
    );

    let load = load_portfolio(source.as_ref(), &config).await;
    let report = ReportSet::build(&load, reports);

    let stdout = std::io::stdout();
    output::render(&mut stdout.lock(), &report, cli.format, cli.pretty)
}
