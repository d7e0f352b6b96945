//! JSearch (RapidAPI) adapter. JSearch aggregates Google for Jobs listings,
//! so one board covers LinkedIn, Indeed, Glassdoor and friends.

mod mapping;
mod parser;

use super::{
    base_url_or, request_timeout, BoardError, BoardKind, BoardRequest, HttpGateway, JobBoard,
    RateLimiter,
};
use crate::config::BoardConfig;
use crate::postings::JobPosting;
use crate::search::SearchCriteria;
use parser::JSearchResponse;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

pub const DEFAULT_BASE_URL: &str = "https://jsearch.p.rapidapi.com";
pub const DEFAULT_API_HOST: &str = "jsearch.p.rapidapi.com";

/// Paid RapidAPI tiers start being required above this rate.
const FREE_TIER_MAX_RPS: f64 = 5.0;

pub struct JSearchAdapter {
    name: String,
    api_key: String,
    api_host: String,
    base_url: String,
    default_params: Vec<(String, String)>,
    timeout: Duration,
    limiter: RateLimiter,
    gateway: Arc<dyn HttpGateway>,
}

impl JSearchAdapter {
    pub fn from_config(
        config: &BoardConfig,
        gateway: Arc<dyn HttpGateway>,
    ) -> Result<Self, BoardError> {
        let api_key = config
            .resolved_api_key()
            .ok_or_else(|| BoardError::MissingApiKey {
                board: config.name.clone(),
            })?
            .to_string();

        let requests_per_second = config.rate_limit.requests_per_second;
        if requests_per_second > FREE_TIER_MAX_RPS {
            warn!(
                board = %config.name,
                requests_per_second,
                "rate limit above 5 req/s needs a paid RapidAPI plan"
            );
        }

        let api_host = config
            .api_host
            .as_deref()
            .map(str::trim)
            .filter(|host| !host.is_empty())
            .unwrap_or(DEFAULT_API_HOST)
            .to_string();

        let timeout = request_timeout(config)?;
        let limiter = RateLimiter::per_second(requests_per_second);
        info!(
            board = %config.name,
            min_interval_ms = limiter.min_interval().map(|interval| interval.as_millis() as u64),
            "initialized JSearch adapter"
        );

        Ok(Self {
            name: config.name.clone(),
            api_key,
            api_host,
            base_url: base_url_or(config, DEFAULT_BASE_URL),
            default_params: config.search_param_pairs(),
            timeout,
            limiter,
            gateway,
        })
    }

    /// Configured defaults first, then the criteria override `query`,
    /// `remote_jobs_only` and `employment_types`.
    pub fn translate(&self, criteria: &SearchCriteria) -> Vec<(String, String)> {
        let mut params = self.default_params.clone();

        let keywords = criteria.keyword_phrase();
        let location = criteria.location.trim();
        let query = if location.is_empty() {
            keywords
        } else {
            format!("{keywords} in {location}")
        };
        set_param(&mut params, "query", query);

        if let Some(remote) = criteria.remote {
            set_param(&mut params, "remote_jobs_only", remote.to_string());
        }
        if let Some(employment_type) = criteria.employment_type.as_deref() {
            set_param(&mut params, "employment_types", employment_type.to_string());
        }

        debug!(board = %self.name, ?params, "built JSearch query");
        params
    }

    fn request(&self, path: &str, query: Vec<(String, String)>) -> Result<Value, BoardError> {
        let request = BoardRequest::get(format!("{}{path}", self.base_url), self.timeout)
            .header("X-RapidAPI-Key", self.api_key.as_str())
            .header("X-RapidAPI-Host", self.api_host.as_str())
            .query(query);

        self.limiter.acquire();
        self.gateway
            .get_json(&request)
            .map_err(|source| BoardError::Gateway {
                board: self.name.clone(),
                source,
            })
    }

    fn parse_envelope(&self, body: Value) -> Result<JSearchResponse, BoardError> {
        serde_json::from_value(body).map_err(|err| BoardError::Malformed {
            board: self.name.clone(),
            reason: err.to_string(),
        })
    }
}

impl fmt::Debug for JSearchAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JSearchAdapter")
            .field("name", &self.name)
            .field("base_url", &self.base_url)
            .field("limiter", &self.limiter)
            .finish_non_exhaustive()
    }
}

impl JobBoard for JSearchAdapter {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> BoardKind {
        BoardKind::JSearch
    }

    fn search(&self, criteria: &SearchCriteria) -> Result<Vec<JobPosting>, BoardError> {
        let params = self.translate(criteria);
        let body = self.request("/search", params)?;
        let response = self.parse_envelope(body)?;

        if !response.is_ok() {
            error!(
                board = %self.name,
                status = response.status.as_deref().unwrap_or("<missing>"),
                "JSearch returned a non-OK status"
            );
            return Ok(Vec::new());
        }

        info!(board = %self.name, jobs = response.data.len(), "JSearch returned jobs");

        let postings: Vec<JobPosting> = response
            .data
            .iter()
            .filter_map(|raw| match mapping::to_posting(&self.name, raw) {
                Ok(posting) => Some(posting),
                Err(err) => {
                    warn!(board = %self.name, error = %err, "skipping JSearch job");
                    None
                }
            })
            .collect();

        info!(board = %self.name, postings = postings.len(), "converted JSearch jobs");
        Ok(postings)
    }

    fn job_details(&self, job_id: &str) -> Result<JobPosting, BoardError> {
        let not_found = || BoardError::NotFound {
            board: self.name.clone(),
            job_id: job_id.to_string(),
        };

        info!(board = %self.name, job_id, "fetching JSearch job details");
        let body = self.request(
            "/job-details",
            vec![("job_id".to_string(), job_id.to_string())],
        )?;
        let response = self.parse_envelope(body)?;
        if !response.is_ok() {
            return Err(not_found());
        }

        let raw = response.data.first().ok_or_else(not_found)?;
        mapping::to_posting(&self.name, raw).map_err(|err| BoardError::Malformed {
            board: self.name.clone(),
            reason: err.to_string(),
        })
    }
}

fn set_param(params: &mut Vec<(String, String)>, key: &str, value: String) {
    match params.iter_mut().find(|(name, _)| name == key) {
        Some((_, existing)) => *existing = value,
        None => params.push((key.to_string(), value)),
    }
}
