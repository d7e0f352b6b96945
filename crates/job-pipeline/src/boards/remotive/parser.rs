use crate::boards::normalize::{empty_string_as_none, lenient_id, null_as_default};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
pub(crate) struct RemotiveResponse {
    #[serde(rename = "job-count", default)]
    pub(crate) job_count: Option<u64>,
    pub(crate) jobs: Vec<Value>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RemotiveJob {
    #[serde(default, deserialize_with = "lenient_id")]
    pub(crate) id: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub(crate) url: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub(crate) title: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub(crate) company_name: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub(crate) tags: Vec<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub(crate) job_type: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub(crate) publication_date: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub(crate) candidate_required_location: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub(crate) salary: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub(crate) description: Option<String>,
}
