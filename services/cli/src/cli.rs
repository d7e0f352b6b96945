use crate::commands::{list_boards, run_details, run_search, DetailsArgs, SearchArgs};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use job_pipeline::boards::{HttpGateway, ReqwestGateway};
use job_pipeline::config::AppConfig;
use job_pipeline::error::AppError;
use job_pipeline::telemetry;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(
    name = "job-pipeline",
    about = "Search the configured job boards and file the postings by date",
    version
)]
struct Cli {
    /// Enable debug-level logging
    #[arg(long, global = true)]
    debug: bool,
    /// Configuration directory holding search-criteria.yaml and job-boards.yaml
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search all enabled boards, or one with --board (default command)
    Search(SearchArgs),
    /// Fetch one posting by its board-specific id and print it
    Details(DetailsArgs),
    /// List the boards in job-boards.yaml and whether they can run
    Boards,
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();

    let mut config = AppConfig::load()?;
    if let Some(config_dir) = cli.config_dir {
        config.paths.config_dir = config_dir;
    }
    telemetry::init(&config.telemetry, cli.debug)?;

    let command = cli
        .command
        .unwrap_or_else(|| Command::Search(SearchArgs::default()));

    match command {
        Command::Search(args) => run_search(&config, args, cli.debug, http_gateway()?),
        Command::Details(args) => run_details(&config, args, http_gateway()?),
        Command::Boards => list_boards(&config),
    }
}

fn http_gateway() -> Result<Arc<dyn HttpGateway>, AppError> {
    Ok(Arc::new(ReqwestGateway::with_runtime()?))
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
