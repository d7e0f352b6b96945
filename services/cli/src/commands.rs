use chrono::{Local, NaiveDate};
use clap::Args;
use job_pipeline::boards::{BoardKind, HttpGateway};
use job_pipeline::config::{AppConfig, PipelineConfig};
use job_pipeline::error::AppError;
use job_pipeline::output::{format_posting, FileWriter};
use job_pipeline::postings::JobPosting;
use job_pipeline::search::{BoardRunStatus, SearchError, SearchOrchestrator};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

const RULE: &str = "============================================================";
const MAX_LISTED_FILES: usize = 10;

#[derive(Args, Debug, Default)]
pub(crate) struct SearchArgs {
    /// Search only this board (case-insensitive); all enabled boards otherwise
    #[arg(long)]
    pub(crate) board: Option<String>,
    /// Directory the dated posting folders are written under
    #[arg(long)]
    pub(crate) output_dir: Option<PathBuf>,
    /// Date used for the output folder (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = crate::cli::parse_date)]
    pub(crate) date: Option<NaiveDate>,
}

#[derive(Args, Debug)]
pub(crate) struct DetailsArgs {
    /// Board to ask, by configured name
    #[arg(long)]
    pub(crate) board: String,
    /// Board-specific job identifier
    pub(crate) job_id: String,
}

pub(crate) fn run_search(
    config: &AppConfig,
    args: SearchArgs,
    debug: bool,
    gateway: Arc<dyn HttpGateway>,
) -> Result<(), AppError> {
    let SearchArgs {
        board,
        output_dir,
        date,
    } = args;

    print_banner(board.as_deref(), debug);

    let orchestrator = build_orchestrator(config, gateway)?;
    let enabled = orchestrator.enabled_boards();
    if enabled.is_empty() {
        return Err(SearchError::NoBoards.into());
    }
    println!("Enabled boards: {}", enabled.join(", "));
    let counts = orchestrator
        .board_counts()
        .into_iter()
        .map(|(kind, count)| format!("{kind} x{count}"))
        .collect::<Vec<_>>();
    println!("Adapters:       {}\n", counts.join(", "));

    let postings = match board.as_deref() {
        Some(name) => {
            println!("Searching {name}...\n");
            orchestrator.search_board(name)?
        }
        None => {
            println!("Searching all enabled boards...\n");
            let outcome = orchestrator.run_search()?;
            for run in &outcome.runs {
                match &run.status {
                    BoardRunStatus::Succeeded { postings } => {
                        println!("  {}: {} job(s)", run.board, postings)
                    }
                    BoardRunStatus::Failed { reason } => {
                        println!("  {}: FAILED ({})", run.board, reason)
                    }
                }
            }
            if outcome.failed() > 0 {
                warn!(failed = outcome.failed(), "some boards failed");
            }
            outcome.postings
        }
    };

    if postings.is_empty() {
        warn!("no jobs found");
        println!("\nNo jobs found");
        println!("   Try adjusting search criteria in search-criteria.yaml");
        return Ok(());
    }

    let output_dir = output_dir.unwrap_or_else(|| config.paths.output_dir.clone());
    let date = date.unwrap_or_else(|| Local::now().date_naive());

    println!("\nWriting {} jobs to files...", postings.len());
    let writer = FileWriter::new(output_dir)?;
    let files = writer.write_postings(&postings, date)?;

    print_summary(&postings, &files, &writer);
    info!(files = files.len(), "pipeline run complete");
    Ok(())
}

pub(crate) fn run_details(
    config: &AppConfig,
    args: DetailsArgs,
    gateway: Arc<dyn HttpGateway>,
) -> Result<(), AppError> {
    let orchestrator = build_orchestrator(config, gateway)?;
    let posting = orchestrator.job_details(&args.board, &args.job_id)?;
    println!("{}", format_posting(&posting, Local::now().naive_local()));
    Ok(())
}

pub(crate) fn list_boards(config: &AppConfig) -> Result<(), AppError> {
    let pipeline = PipelineConfig::load(&config.paths.config_dir)?;

    println!("Boards in {}:", config.paths.config_dir.display());
    if pipeline.boards.is_empty() {
        println!("  (none configured)");
    }
    for board in &pipeline.boards {
        let adapter = board.adapter.as_deref().unwrap_or("-");
        let status = match (board.enabled, BoardKind::from_adapter(adapter)) {
            (false, _) => "disabled".to_string(),
            (true, None) => format!("unknown adapter '{adapter}'"),
            (true, Some(BoardKind::JSearch)) if board.resolved_api_key().is_none() => {
                "enabled, api_key missing".to_string()
            }
            (true, Some(_)) => "enabled".to_string(),
        };
        println!("  - {:<20} {:<10} {}", board.name, adapter, status);
    }

    println!(
        "\n{} of {} boards enabled",
        pipeline.enabled_boards().count(),
        pipeline.boards.len()
    );

    let known = BoardKind::ALL
        .iter()
        .map(|kind| kind.adapter_id())
        .collect::<Vec<_>>();
    println!("Available adapters: {}", known.join(", "));
    Ok(())
}

fn build_orchestrator(
    config: &AppConfig,
    gateway: Arc<dyn HttpGateway>,
) -> Result<SearchOrchestrator, AppError> {
    info!(config_dir = %config.paths.config_dir.display(), "loading configuration");
    let pipeline = PipelineConfig::load(&config.paths.config_dir)?;
    Ok(SearchOrchestrator::from_config(&pipeline, gateway))
}

fn print_banner(board: Option<&str>, debug: bool) {
    println!("\n{RULE}");
    println!("Job Search Pipeline");
    println!("{RULE}");
    println!("Date/Time: {}", Local::now().format("%Y-%m-%d %H:%M:%S"));
    match board {
        Some(board) => println!("Board:     {board} (single board)"),
        None => println!("Board:     All enabled boards"),
    }
    if debug {
        println!("Log Level: DEBUG");
    }
    println!("{RULE}\n");
}

fn print_summary(postings: &[JobPosting], files: &[PathBuf], writer: &FileWriter) {
    println!("\n{RULE}");
    println!("SEARCH COMPLETE");
    println!("{RULE}");
    println!("Total jobs found:     {}", postings.len());
    println!("Files created:        {}", files.len());
    println!("Output directory:     {}", writer.base_path().display());
    println!("{RULE}");

    if !files.is_empty() {
        println!("\nCreated files:");
        for path in files.iter().take(MAX_LISTED_FILES) {
            println!("  - {}", path.display());
        }
        if files.len() > MAX_LISTED_FILES {
            println!("  ... and {} more files", files.len() - MAX_LISTED_FILES);
        }
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use job_pipeline::boards::{BoardRequest, GatewayError};
    use job_pipeline::config::{AppEnvironment, PathsConfig, TelemetryConfig};
    use job_pipeline::search::SearchError;
    use serde_json::{json, Value};
    use std::fs;
    use std::path::Path;
    use std::sync::Mutex;

    /// Answers by URL prefix; unrouted URLs fail like an unreachable host.
    #[derive(Debug, Default)]
    struct FakeGateway {
        routes: Vec<(&'static str, Result<Value, u16>)>,
        requests: Mutex<Vec<String>>,
    }

    impl FakeGateway {
        fn route(mut self, prefix: &'static str, response: Result<Value, u16>) -> Self {
            self.routes.push((prefix, response));
            self
        }
    }

    impl HttpGateway for FakeGateway {
        fn get_json(&self, request: &BoardRequest) -> Result<Value, GatewayError> {
            self.requests.lock().unwrap().push(request.url.clone());
            let (_, response) = self
                .routes
                .iter()
                .find(|(prefix, _)| request.url.starts_with(prefix))
                .ok_or_else(|| GatewayError::Transport {
                    url: request.url.clone(),
                    message: "connection refused".to_string(),
                })?;
            response.clone().map_err(|status| GatewayError::Status {
                url: request.url.clone(),
                status,
                body: String::new(),
            })
        }
    }

    const CRITERIA: &str = "search:\n  keywords:\n    - DevOps Engineer\n  location: Austin, TX\n";

    const BOARDS: &str = r#"
boards:
  - name: JSearch
    enabled: true
    adapter: jsearch
    api_key: test-key
    base_url: https://jsearch.test
    rate_limit:
      requests_per_second: 0
  - name: Remotive
    enabled: true
    adapter: remotive
    base_url: https://remotive.test
    rate_limit:
      requests_per_second: 0
"#;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "job-pipeline-cli-{name}-{}",
            std::process::id()
        ));
        fs::remove_dir_all(&dir).ok();
        dir
    }

    fn app_config(base: &Path, boards_yaml: Option<&str>) -> AppConfig {
        let config_dir = base.join("config");
        if let Some(boards_yaml) = boards_yaml {
            fs::create_dir_all(&config_dir).expect("config dir");
            fs::write(config_dir.join("search-criteria.yaml"), CRITERIA).expect("criteria");
            fs::write(config_dir.join("job-boards.yaml"), boards_yaml).expect("boards");
        }
        AppConfig {
            environment: AppEnvironment::Test,
            paths: PathsConfig {
                config_dir,
                output_dir: base.join("output"),
            },
            telemetry: TelemetryConfig {
                log_level: "info".to_string(),
            },
        }
    }

    fn search_args() -> SearchArgs {
        SearchArgs {
            date: NaiveDate::from_ymd_opt(2025, 9, 24),
            ..SearchArgs::default()
        }
    }

    fn remotive_jobs() -> Value {
        json!({
            "job-count": 1,
            "jobs": [{"id": 77, "title": "Platform Engineer", "company_name": "Globex"}]
        })
    }

    #[test]
    fn failing_board_does_not_fail_the_run() {
        let base = scratch_dir("partial");
        let config = app_config(&base, Some(BOARDS));
        let gateway = Arc::new(
            FakeGateway::default()
                .route("https://jsearch.test", Err(503))
                .route("https://remotive.test", Ok(remotive_jobs())),
        );

        run_search(&config, search_args(), false, gateway.clone()).expect("run succeeds");

        let written = base
            .join("output")
            .join("2025-09-24")
            .join("Globex_Platform_Engineer.txt");
        assert!(written.exists(), "expected {}", written.display());
        assert_eq!(gateway.requests.lock().unwrap().len(), 2);

        fs::remove_dir_all(&base).ok();
    }

    #[test]
    fn empty_results_write_nothing() {
        let base = scratch_dir("empty");
        let config = app_config(&base, Some(BOARDS));
        let gateway = Arc::new(
            FakeGateway::default()
                .route("https://jsearch.test", Ok(json!({"status": "OK", "data": []})))
                .route("https://remotive.test", Ok(json!({"jobs": []}))),
        );

        run_search(&config, search_args(), false, gateway).expect("run succeeds");
        assert!(!base.join("output").exists());

        fs::remove_dir_all(&base).ok();
    }

    #[test]
    fn missing_config_dir_is_a_config_error() {
        let base = scratch_dir("missing");
        let config = app_config(&base, None);
        let gateway = Arc::new(FakeGateway::default());

        let err = run_search(&config, search_args(), false, gateway.clone())
            .expect_err("config missing");
        assert!(matches!(err, AppError::Config(_)), "{err}");
        assert!(gateway.requests.lock().unwrap().is_empty());
    }

    #[test]
    fn no_enabled_boards_is_an_error() {
        let base = scratch_dir("disabled");
        let boards = BOARDS.replace("enabled: true", "enabled: false");
        let config = app_config(&base, Some(&boards));
        let gateway = Arc::new(FakeGateway::default());

        let err = run_search(&config, search_args(), false, gateway).expect_err("no boards");
        assert!(matches!(err, AppError::Search(SearchError::NoBoards)), "{err}");

        fs::remove_dir_all(&base).ok();
    }

    #[test]
    fn single_board_failure_propagates() {
        let base = scratch_dir("single");
        let config = app_config(&base, Some(BOARDS));
        let gateway = Arc::new(FakeGateway::default().route("https://jsearch.test", Err(500)));
        let args = SearchArgs {
            board: Some("jsearch".to_string()),
            ..search_args()
        };

        let err = run_search(&config, args, false, gateway).expect_err("board failed");
        assert!(matches!(err, AppError::Search(SearchError::Board(_))), "{err}");

        fs::remove_dir_all(&base).ok();
    }

    #[test]
    fn details_for_remotive_is_unsupported() {
        let base = scratch_dir("details");
        let config = app_config(&base, Some(BOARDS));
        let args = DetailsArgs {
            board: "Remotive".to_string(),
            job_id: "77".to_string(),
        };

        let err = run_details(&config, args, Arc::new(FakeGateway::default()))
            .expect_err("unsupported");
        assert!(matches!(err, AppError::Search(SearchError::Board(_))), "{err}");

        fs::remove_dir_all(&base).ok();
    }
}
