use super::SearchCriteria;
use crate::boards::{BoardError, BoardKind, HttpGateway, JobBoard};
use crate::config::PipelineConfig;
use crate::postings::JobPosting;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("no job boards are enabled; enable at least one board in config/job-boards.yaml")]
    NoBoards,
    #[error("board '{requested}' not found or not enabled; available boards: {}", .available.join(", "))]
    UnknownBoard {
        requested: String,
        available: Vec<String>,
    },
    #[error(transparent)]
    Board(#[from] BoardError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardRunStatus {
    Succeeded { postings: usize },
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardRun {
    pub board: String,
    pub status: BoardRunStatus,
}

/// Aggregated result of one run over every enabled board.
#[derive(Debug, Clone, Default)]
pub struct SearchOutcome {
    pub postings: Vec<JobPosting>,
    pub runs: Vec<BoardRun>,
}

impl SearchOutcome {
    pub fn succeeded(&self) -> usize {
        self.runs
            .iter()
            .filter(|run| matches!(run.status, BoardRunStatus::Succeeded { .. }))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.runs.len() - self.succeeded()
    }
}

/// Fans one [`SearchCriteria`] out to every configured board, in
/// configuration order, and survives individual board failures.
#[derive(Debug)]
pub struct SearchOrchestrator {
    boards: Vec<Box<dyn JobBoard>>,
    criteria: SearchCriteria,
}

impl SearchOrchestrator {
    pub fn new(boards: Vec<Box<dyn JobBoard>>, criteria: SearchCriteria) -> Self {
        Self { boards, criteria }
    }

    /// Builds an adapter for every enabled board. Boards that are disabled,
    /// name an unknown adapter or fail to build are skipped with a log line.
    pub fn from_config(config: &PipelineConfig, gateway: Arc<dyn HttpGateway>) -> Self {
        let mut boards = Vec::new();

        let enabled: Vec<_> = config.enabled_boards().collect();
        let disabled = config.boards.len() - enabled.len();
        if disabled > 0 {
            debug!(disabled, "skipping disabled boards");
        }

        for board in enabled {
            let Some(adapter) = board.adapter.as_deref().filter(|id| !id.trim().is_empty())
            else {
                warn!(board = %board.name, "board has no adapter configured");
                continue;
            };

            let Some(kind) = BoardKind::from_adapter(adapter) else {
                warn!(board = %board.name, adapter, "no adapter implementation; skipping board");
                continue;
            };

            match kind.build(board, Arc::clone(&gateway)) {
                Ok(built) => {
                    info!(board = %board.name, adapter = %kind, "initialized board");
                    boards.push(built);
                }
                Err(err) => error!(board = %board.name, error = %err, "failed to initialize board"),
            }
        }

        if boards.is_empty() {
            warn!("no boards initialized");
        } else {
            info!(count = boards.len(), "initialized boards");
        }

        let criteria = SearchCriteria::from(&config.search);
        debug!(?criteria, "built search criteria");
        Self::new(boards, criteria)
    }

    pub fn criteria(&self) -> &SearchCriteria {
        &self.criteria
    }

    pub fn enabled_boards(&self) -> Vec<&str> {
        self.boards.iter().map(|board| board.name()).collect()
    }

    pub fn board_counts(&self) -> BTreeMap<BoardKind, usize> {
        let mut counts = BTreeMap::new();
        for board in &self.boards {
            *counts.entry(board.kind()).or_insert(0) += 1;
        }
        counts
    }

    /// Searches every board. A failing board is recorded and logged, never
    /// fatal; zero postings is still a success.
    pub fn run_search(&self) -> Result<SearchOutcome, SearchError> {
        if self.boards.is_empty() {
            return Err(SearchError::NoBoards);
        }

        info!(boards = self.boards.len(), "starting search");
        let mut outcome = SearchOutcome::default();

        for board in &self.boards {
            info!(board = board.name(), "searching");
            let status = match board.search(&self.criteria) {
                Ok(postings) => {
                    info!(board = board.name(), found = postings.len(), "search finished");
                    let count = postings.len();
                    outcome.postings.extend(postings);
                    BoardRunStatus::Succeeded { postings: count }
                }
                Err(err) => {
                    error!(board = board.name(), error = %err, "search failed");
                    BoardRunStatus::Failed {
                        reason: err.to_string(),
                    }
                }
            };
            outcome.runs.push(BoardRun {
                board: board.name().to_string(),
                status,
            });
        }

        info!(
            total = outcome.postings.len(),
            succeeded = outcome.succeeded(),
            failed = outcome.failed(),
            "search complete"
        );
        Ok(outcome)
    }

    /// Searches one board by case-insensitive name. Its error propagates.
    pub fn search_board(&self, name: &str) -> Result<Vec<JobPosting>, SearchError> {
        let board = self.find_board(name)?;
        info!(board = board.name(), "searching single board");
        let postings = board.search(&self.criteria)?;
        info!(board = board.name(), found = postings.len(), "search finished");
        Ok(postings)
    }

    pub fn job_details(&self, board: &str, job_id: &str) -> Result<JobPosting, SearchError> {
        let board = self.find_board(board)?;
        Ok(board.job_details(job_id)?)
    }

    fn find_board(&self, name: &str) -> Result<&dyn JobBoard, SearchError> {
        let wanted = name.trim();
        self.boards
            .iter()
            .find(|board| board.name().eq_ignore_ascii_case(wanted))
            .map(|board| &**board)
            .ok_or_else(|| SearchError::UnknownBoard {
                requested: name.to_string(),
                available: self.boards.iter().map(|b| b.name().to_string()).collect(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boards::testing::FakeGateway;
    use crate::boards::GatewayError;
    use crate::config::BoardConfig;

    #[derive(Debug)]
    struct StubBoard {
        name: String,
        kind: BoardKind,
        result: Result<Vec<&'static str>, &'static str>,
    }

    impl StubBoard {
        fn ok(name: &str, ids: Vec<&'static str>) -> Box<dyn JobBoard> {
            Box::new(Self {
                name: name.to_string(),
                kind: BoardKind::JSearch,
                result: Ok(ids),
            })
        }

        fn failing(name: &str, message: &'static str) -> Box<dyn JobBoard> {
            Box::new(Self {
                name: name.to_string(),
                kind: BoardKind::Remotive,
                result: Err(message),
            })
        }
    }

    impl JobBoard for StubBoard {
        fn name(&self) -> &str {
            &self.name
        }

        fn kind(&self) -> BoardKind {
            self.kind
        }

        fn search(&self, _criteria: &SearchCriteria) -> Result<Vec<JobPosting>, BoardError> {
            match &self.result {
                Ok(ids) => Ok(ids
                    .iter()
                    .map(|id| {
                        JobPosting::builder(self.name.as_str(), *id)
                            .title("Engineer")
                            .build()
                            .unwrap()
                    })
                    .collect()),
                Err(message) => Err(BoardError::Gateway {
                    board: self.name.clone(),
                    source: GatewayError::Transport {
                        url: "https://stub.invalid".to_string(),
                        message: message.to_string(),
                    },
                }),
            }
        }
    }

    fn criteria() -> SearchCriteria {
        SearchCriteria::new(vec!["DevOps Engineer".to_string()], "Austin, TX")
    }

    #[test]
    fn failing_board_does_not_abort_the_run() {
        let orchestrator = SearchOrchestrator::new(
            vec![
                StubBoard::ok("First", vec!["a", "b"]),
                StubBoard::failing("Second", "connection refused"),
                StubBoard::ok("Third", vec!["c"]),
            ],
            criteria(),
        );

        let outcome = orchestrator.run_search().expect("run completes");
        let ids: Vec<_> = outcome.postings.iter().map(|p| p.identity()).collect();
        assert_eq!(ids, vec![("First", "a"), ("First", "b"), ("Third", "c")]);
        assert_eq!(outcome.succeeded(), 2);
        assert_eq!(outcome.failed(), 1);
        assert_eq!(
            outcome.runs[0].status,
            BoardRunStatus::Succeeded { postings: 2 }
        );
        match &outcome.runs[1].status {
            BoardRunStatus::Failed { reason } => assert!(reason.contains("connection refused")),
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[test]
    fn zero_results_is_success() {
        let orchestrator =
            SearchOrchestrator::new(vec![StubBoard::ok("Empty", Vec::new())], criteria());
        let outcome = orchestrator.run_search().expect("run completes");
        assert!(outcome.postings.is_empty());
        assert_eq!(outcome.failed(), 0);
    }

    #[test]
    fn no_boards_is_an_error() {
        let orchestrator = SearchOrchestrator::new(Vec::new(), criteria());
        assert!(matches!(orchestrator.run_search(), Err(SearchError::NoBoards)));
    }

    #[test]
    fn search_board_matches_case_insensitively() {
        let orchestrator = SearchOrchestrator::new(
            vec![
                StubBoard::ok("JSearch", vec!["a"]),
                StubBoard::failing("Remotive", "timeout"),
            ],
            criteria(),
        );

        assert_eq!(orchestrator.search_board("jsearch").expect("found").len(), 1);
        assert!(matches!(
            orchestrator.search_board("REMOTIVE"),
            Err(SearchError::Board(BoardError::Gateway { .. }))
        ));

        let err = orchestrator.search_board("Indeed").expect_err("unknown");
        assert_eq!(
            err.to_string(),
            "board 'Indeed' not found or not enabled; available boards: JSearch, Remotive"
        );
    }

    #[test]
    fn job_details_default_is_unsupported() {
        let orchestrator =
            SearchOrchestrator::new(vec![StubBoard::ok("Stub", vec![])], criteria());
        assert!(matches!(
            orchestrator.job_details("stub", "1"),
            Err(SearchError::Board(BoardError::Unsupported { .. }))
        ));
    }

    #[test]
    fn from_config_skips_unusable_boards() {
        let mut disabled = BoardConfig::new("Disabled", "remotive");
        disabled.enabled = false;
        let unknown = BoardConfig::new("LinkedIn", "linkedin");
        let keyless = BoardConfig::new("JSearch", "jsearch");
        let mut no_adapter = BoardConfig::new("Bare", "remotive");
        no_adapter.adapter = None;
        let remotive = BoardConfig::new("Remotive", "remotive");
        let mut second = BoardConfig::new("Remotive EU", "Remotive");
        second.base_url = Some("https://eu.remotive.example".to_string());

        let config = PipelineConfig {
            search: crate::config::SearchSettings {
                keywords: vec!["Rust".to_string()],
                location: "Remote".to_string(),
                remote: Some(true),
                employment_type: None,
            },
            boards: vec![disabled, unknown, keyless, no_adapter, remotive, second],
        };

        let orchestrator =
            SearchOrchestrator::from_config(&config, Arc::new(FakeGateway::default()));
        assert_eq!(orchestrator.enabled_boards(), vec!["Remotive", "Remotive EU"]);
        assert_eq!(
            orchestrator.board_counts(),
            BTreeMap::from([(BoardKind::Remotive, 2)])
        );
        assert_eq!(orchestrator.criteria().keywords, vec!["Rust"]);
        assert_eq!(orchestrator.criteria().remote, Some(true));
    }
}
