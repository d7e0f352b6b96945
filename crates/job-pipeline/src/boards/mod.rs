//! Job board adapters.
//!
//! Every board implements [`JobBoard`]; the closed [`BoardKind`] registry maps
//! the `adapter` identifier from `job-boards.yaml` onto a concrete adapter.

mod gateway;
mod normalize;
mod rate_limit;

pub mod jsearch;
pub mod remotive;

pub use gateway::{BoardRequest, GatewayError, HttpGateway, ReqwestGateway};
pub use rate_limit::RateLimiter;

use crate::config::BoardConfig;
use crate::postings::{JobPosting, PostingError};
use crate::search::SearchCriteria;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Capability shared by every job board adapter.
pub trait JobBoard: fmt::Debug + Send + Sync {
    /// Board name as configured; stamped onto every posting it produces.
    fn name(&self) -> &str;

    fn kind(&self) -> BoardKind;

    /// Runs one search. An empty list is a valid result.
    fn search(&self, criteria: &SearchCriteria) -> Result<Vec<JobPosting>, BoardError>;

    fn job_details(&self, _job_id: &str) -> Result<JobPosting, BoardError> {
        Err(BoardError::Unsupported {
            board: self.name().to_string(),
            operation: "job details",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BoardKind {
    JSearch,
    Remotive,
}

impl BoardKind {
    pub const ALL: [BoardKind; 2] = [BoardKind::JSearch, BoardKind::Remotive];

    /// Case-insensitive lookup of the `adapter` value from configuration.
    pub fn from_adapter(value: &str) -> Option<Self> {
        let wanted = value.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.adapter_id().eq_ignore_ascii_case(wanted))
    }

    pub fn adapter_id(self) -> &'static str {
        match self {
            BoardKind::JSearch => "jsearch",
            BoardKind::Remotive => "remotive",
        }
    }

    pub fn build(
        self,
        config: &BoardConfig,
        gateway: Arc<dyn HttpGateway>,
    ) -> Result<Box<dyn JobBoard>, BoardError> {
        let board: Box<dyn JobBoard> = match self {
            BoardKind::JSearch => Box::new(jsearch::JSearchAdapter::from_config(config, gateway)?),
            BoardKind::Remotive => {
                Box::new(remotive::RemotiveAdapter::from_config(config, gateway)?)
            }
        };
        Ok(board)
    }
}

impl fmt::Display for BoardKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.adapter_id())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    #[error("{board}: no API key configured; set api_key in job-boards.yaml or export the referenced variable")]
    MissingApiKey { board: String },
    #[error("{board}: invalid configuration: {reason}")]
    InvalidConfig { board: String, reason: String },
    #[error("{board}: {source}")]
    Gateway {
        board: String,
        #[source]
        source: GatewayError,
    },
    #[error("{board}: unexpected response: {reason}")]
    Malformed { board: String, reason: String },
    #[error("{board}: job {job_id} not found")]
    NotFound { board: String, job_id: String },
    #[error("{board} does not support {operation}")]
    Unsupported {
        board: String,
        operation: &'static str,
    },
}

impl BoardError {
    pub fn board(&self) -> &str {
        match self {
            BoardError::MissingApiKey { board }
            | BoardError::InvalidConfig { board, .. }
            | BoardError::Gateway { board, .. }
            | BoardError::Malformed { board, .. }
            | BoardError::NotFound { board, .. }
            | BoardError::Unsupported { board, .. } => board,
        }
    }
}

/// Why a single source record could not become a [`JobPosting`].
#[derive(Debug, thiserror::Error)]
pub enum MappingError {
    #[error("record is not a JSON object")]
    NotAnObject,
    #[error("record does not match the expected shape: {0}")]
    Decode(#[from] serde_json::Error),
    #[error(transparent)]
    Posting(#[from] PostingError),
}

/// Decodes a single job record. Arrays are rejected up front because serde
/// would otherwise fill the struct fields by position.
fn decode_record<T: serde::de::DeserializeOwned>(raw: &Value) -> Result<T, MappingError> {
    if !raw.is_object() {
        return Err(MappingError::NotAnObject);
    }
    Ok(serde_json::from_value(raw.clone())?)
}

fn request_timeout(config: &BoardConfig) -> Result<Duration, BoardError> {
    if config.timeout_seconds == 0 {
        return Err(BoardError::InvalidConfig {
            board: config.name.clone(),
            reason: "timeout_seconds must be greater than zero".to_string(),
        });
    }
    Ok(Duration::from_secs(config.timeout_seconds))
}

fn base_url_or(config: &BoardConfig, default: &str) -> String {
    config
        .base_url
        .as_deref()
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .unwrap_or(default)
        .trim_end_matches('/')
        .to_string()
}
