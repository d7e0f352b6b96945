use serde_json::Value;
use std::fmt::Debug;
use std::time::Duration;
use tokio::runtime::Runtime;

const USER_AGENT: &str = concat!("job-pipeline/", env!("CARGO_PKG_VERSION"));

/// Error bodies are often full HTML pages; only the head is kept.
const MAX_ERROR_BODY_CHARS: usize = 300;

/// One outbound GET against a board API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
    pub timeout: Duration,
}

impl BoardRequest {
    pub fn get(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            headers: Vec::new(),
            query: Vec::new(),
            timeout,
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn query(mut self, params: Vec<(String, String)>) -> Self {
        self.query = params;
        self
    }

    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("request to {url} timed out after {seconds}s")]
    Timeout { url: String, seconds: u64 },
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },
    #[error("{url} answered HTTP {status}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },
    #[error("{url} returned a body that is not JSON: {message}")]
    Decode { url: String, message: String },
    #[error("http runtime unavailable: {0}")]
    Runtime(String),
}

/// Transport seam the board adapters call through.
pub trait HttpGateway: Debug + Send + Sync {
    fn get_json(&self, request: &BoardRequest) -> Result<Value, GatewayError>;
}

/// Blocking wrapper around an async reqwest client so the adapters and the
/// orchestrator stay synchronous. Must not be called from inside another
/// tokio runtime.
pub struct ReqwestGateway {
    client: reqwest::Client,
    runtime: Runtime,
}

impl ReqwestGateway {
    pub fn new(client: reqwest::Client, runtime: Runtime) -> Self {
        Self { client, runtime }
    }

    pub fn with_runtime() -> Result<Self, GatewayError> {
        let runtime = Runtime::new().map_err(|err| GatewayError::Runtime(err.to_string()))?;
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|err| GatewayError::Runtime(err.to_string()))?;
        Ok(Self::new(client, runtime))
    }

    fn map_send_error(err: reqwest::Error, request: &BoardRequest) -> GatewayError {
        if err.is_timeout() {
            GatewayError::Timeout {
                url: request.url.clone(),
                seconds: request.timeout.as_secs(),
            }
        } else {
            GatewayError::Transport {
                url: request.url.clone(),
                message: err.to_string(),
            }
        }
    }
}

impl std::fmt::Debug for ReqwestGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestGateway").finish_non_exhaustive()
    }
}

impl HttpGateway for ReqwestGateway {
    fn get_json(&self, request: &BoardRequest) -> Result<Value, GatewayError> {
        self.runtime.block_on(async {
            let mut builder = self
                .client
                .get(&request.url)
                .query(&request.query)
                .timeout(request.timeout);
            for (name, value) in &request.headers {
                builder = builder.header(name.as_str(), value.as_str());
            }

            let response = builder
                .send()
                .await
                .map_err(|err| Self::map_send_error(err, request))?;

            let status = response.status();
            if !status.is_success() {
                let body = truncate_body(response.text().await.unwrap_or_default());
                return Err(GatewayError::Status {
                    url: request.url.clone(),
                    status: status.as_u16(),
                    body,
                });
            }

            response
                .json::<Value>()
                .await
                .map_err(|err| GatewayError::Decode {
                    url: request.url.clone(),
                    message: err.to_string(),
                })
        })
    }
}

fn truncate_body(body: String) -> String {
    let trimmed = body.trim();
    match trimmed.char_indices().nth(MAX_ERROR_BODY_CHARS) {
        Some((cut, _)) => format!("{}... (truncated)", &trimmed[..cut]),
        None => trimmed.to_string(),
    }
}
