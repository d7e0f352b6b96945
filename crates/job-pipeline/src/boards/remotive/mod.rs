//! Remotive adapter. Public API, no key; every listing is remote.

mod mapping;
mod parser;

use super::{
    base_url_or, request_timeout, BoardError, BoardKind, BoardRequest, HttpGateway, JobBoard,
    RateLimiter,
};
use crate::config::BoardConfig;
use crate::postings::JobPosting;
use crate::search::SearchCriteria;
use parser::RemotiveResponse;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

pub const DEFAULT_BASE_URL: &str = "https://remotive.com";
const SEARCH_PATH: &str = "/api/remote-jobs";

pub struct RemotiveAdapter {
    name: String,
    base_url: String,
    default_params: Vec<(String, String)>,
    timeout: Duration,
    limiter: RateLimiter,
    gateway: Arc<dyn HttpGateway>,
}

impl RemotiveAdapter {
    pub fn from_config(
        config: &BoardConfig,
        gateway: Arc<dyn HttpGateway>,
    ) -> Result<Self, BoardError> {
        let timeout = request_timeout(config)?;
        let limiter = RateLimiter::per_second(config.rate_limit.requests_per_second);

        info!(
            board = %config.name,
            min_interval_ms = limiter.min_interval().map(|interval| interval.as_millis() as u64),
            "initialized Remotive adapter"
        );

        Ok(Self {
            name: config.name.clone(),
            base_url: base_url_or(config, DEFAULT_BASE_URL),
            default_params: config.search_param_pairs(),
            timeout,
            limiter,
            gateway,
        })
    }

    /// Keywords go into `search`; location, remote and employment type have
    /// no Remotive parameter and are handled client-side or ignored.
    pub fn translate(&self, criteria: &SearchCriteria) -> Vec<(String, String)> {
        let mut params: Vec<(String, String)> = self
            .default_params
            .iter()
            .filter(|(key, _)| key != "search")
            .cloned()
            .collect();

        let phrase = criteria.keyword_phrase();
        if !phrase.is_empty() {
            params.push(("search".to_string(), phrase));
        }

        debug!(board = %self.name, ?params, "built Remotive query");
        params
    }
}

impl fmt::Debug for RemotiveAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemotiveAdapter")
            .field("name", &self.name)
            .field("base_url", &self.base_url)
            .field("limiter", &self.limiter)
            .finish_non_exhaustive()
    }
}

impl JobBoard for RemotiveAdapter {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> BoardKind {
        BoardKind::Remotive
    }

    fn search(&self, criteria: &SearchCriteria) -> Result<Vec<JobPosting>, BoardError> {
        let request = BoardRequest::get(format!("{}{SEARCH_PATH}", self.base_url), self.timeout)
            .query(self.translate(criteria));

        self.limiter.acquire();
        let body = self
            .gateway
            .get_json(&request)
            .map_err(|source| BoardError::Gateway {
                board: self.name.clone(),
                source,
            })?;

        let response: RemotiveResponse =
            serde_json::from_value(body).map_err(|err| BoardError::Malformed {
                board: self.name.clone(),
                reason: err.to_string(),
            })?;

        info!(
            board = %self.name,
            jobs = response.jobs.len(),
            job_count = response.job_count,
            "Remotive returned jobs"
        );

        let wanted_types = criteria.employment_types();
        let mut postings = Vec::with_capacity(response.jobs.len());
        for raw in &response.jobs {
            let job = match mapping::decode(raw) {
                Ok(job) => job,
                Err(err) => {
                    warn!(board = %self.name, error = %err, "skipping Remotive job");
                    continue;
                }
            };

            if !mapping::matches_employment_type(job.job_type.as_deref(), &wanted_types) {
                debug!(
                    board = %self.name,
                    job_type = job.job_type.as_deref(),
                    "skipping job with other employment type"
                );
                continue;
            }

            match mapping::to_posting(&self.name, job, raw) {
                Ok(posting) => postings.push(posting),
                Err(err) => warn!(board = %self.name, error = %err, "skipping Remotive job"),
            }
        }

        info!(board = %self.name, postings = postings.len(), "converted Remotive jobs");
        Ok(postings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boards::testing::FakeGateway;
    use crate::boards::GatewayError;
    use crate::postings::RemoteType;
    use serde_json::json;

    fn adapter(gateway: &Arc<FakeGateway>) -> RemotiveAdapter {
        let mut config = BoardConfig::new("Remotive", "remotive");
        config.rate_limit.requests_per_second = 0.0;
        config
            .search_params
            .insert("limit".to_string(), serde_yaml::Value::from(50));
        let gateway: Arc<dyn HttpGateway> = gateway.clone();
        RemotiveAdapter::from_config(&config, gateway).expect("adapter builds")
    }

    fn fixture() -> serde_json::Value {
        json!({
            "job-count": 3,
            "jobs": [
                {"id": 1, "title": "DevOps Engineer", "company_name": "Initech", "job_type": "full_time"},
                {"id": 2, "title": "DevOps Contractor", "company_name": "Hooli", "job_type": "contract"},
                {"id": 3, "title": "SRE", "company_name": "Umbrella"}
            ]
        })
    }

    #[test]
    fn search_uses_keyword_query_and_filters_employment_type() {
        let gateway = Arc::new(FakeGateway::with_responses([Ok(fixture())]));
        let adapter = adapter(&gateway);
        let criteria = SearchCriteria::new(vec!["DevOps".to_string()], "Austin, TX")
            .with_employment_type("FULLTIME");

        let postings = adapter.search(&criteria).expect("search succeeds");
        let ids: Vec<_> = postings.iter().map(|p| p.board_job_id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);
        assert!(postings
            .iter()
            .all(|p| p.remote_type == RemoteType::Remote && p.board_name == "Remotive"));

        let requests = gateway.requests();
        assert_eq!(requests[0].url, "https://remotive.com/api/remote-jobs");
        assert_eq!(requests[0].query_value("search"), Some("DevOps"));
        assert_eq!(requests[0].query_value("limit"), Some("50"));
        assert!(requests[0].headers.is_empty());
    }

    #[test]
    fn without_employment_type_every_job_is_kept() {
        let gateway = Arc::new(FakeGateway::with_responses([Ok(fixture())]));
        let adapter = adapter(&gateway);
        let criteria = SearchCriteria::new(vec!["DevOps".to_string()], "");
        assert_eq!(adapter.search(&criteria).expect("search").len(), 3);
    }

    #[test]
    fn malformed_records_are_skipped_before_filtering() {
        let body = json!({
            "jobs": [
                ["2", "https://remotive.com/x", "Array Job", "Hooli", [], "full_time"],
                {"id": 4, "title": "Bad Type", "company_name": "Hooli", "job_type": 7},
                {"id": 5, "title": "Full Timer", "company_name": "Initech", "job_type": "Full-Time"},
                {"id": 6, "title": "Contractor", "company_name": "Initech", "job_type": "contract"}
            ]
        });
        let gateway = Arc::new(FakeGateway::with_responses([Ok(body)]));
        let adapter = adapter(&gateway);
        let criteria = SearchCriteria::default().with_employment_type("FULLTIME");

        let postings = adapter.search(&criteria).expect("search succeeds");
        let ids: Vec<_> = postings.iter().map(|p| p.board_job_id.as_str()).collect();
        assert_eq!(ids, vec!["5"]);
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let mut config = BoardConfig::new("Remotive", "remotive");
        config.timeout_seconds = 0;
        let gateway: Arc<dyn HttpGateway> = Arc::new(FakeGateway::default());
        assert!(matches!(
            RemotiveAdapter::from_config(&config, gateway),
            Err(BoardError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn missing_jobs_list_is_malformed() {
        let gateway = Arc::new(FakeGateway::with_responses([Ok(json!({"error": "nope"}))]));
        let adapter = adapter(&gateway);
        let err = adapter
            .search(&SearchCriteria::default())
            .expect_err("malformed");
        assert!(matches!(err, BoardError::Malformed { .. }));
    }

    #[test]
    fn gateway_errors_propagate() {
        let gateway = Arc::new(FakeGateway::with_responses([Err(GatewayError::Timeout {
            url: "https://remotive.com/api/remote-jobs".to_string(),
            seconds: 30,
        })]));
        let adapter = adapter(&gateway);
        assert!(matches!(
            adapter.search(&SearchCriteria::default()),
            Err(BoardError::Gateway {
                source: GatewayError::Timeout { .. },
                ..
            })
        ));
    }

    #[test]
    fn job_details_is_unsupported() {
        let gateway = Arc::new(FakeGateway::default());
        let adapter = adapter(&gateway);
        assert!(matches!(
            adapter.job_details("1"),
            Err(BoardError::Unsupported { .. })
        ));
        assert!(gateway.requests().is_empty());
    }
}
