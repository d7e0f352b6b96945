mod criteria;
mod orchestrator;

pub use criteria::SearchCriteria;
pub use orchestrator::{BoardRun, BoardRunStatus, SearchError, SearchOrchestrator, SearchOutcome};
