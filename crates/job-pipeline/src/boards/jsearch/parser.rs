use crate::boards::normalize::{
    empty_string_as_none, lenient_i64, lenient_id, lenient_u64, null_as_default,
};
use serde::Deserialize;
use serde_json::Value;

/// Envelope returned by both `/search` and `/job-details`.
#[derive(Debug, Deserialize)]
pub(crate) struct JSearchResponse {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub(crate) status: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub(crate) data: Vec<Value>,
}

impl JSearchResponse {
    pub(crate) fn is_ok(&self) -> bool {
        self.status.as_deref() == Some("OK")
    }
}

/// The subset of a JSearch job record the pipeline reads. Everything else
/// stays available through `raw_data`.
#[derive(Debug, Deserialize)]
pub(crate) struct JSearchJob {
    #[serde(default, deserialize_with = "lenient_id")]
    pub(crate) job_id: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub(crate) job_title: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub(crate) employer_name: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub(crate) job_city: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub(crate) job_state: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub(crate) job_country: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub(crate) job_description: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub(crate) job_apply_link: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub(crate) job_is_remote: bool,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub(crate) job_min_salary: Option<u64>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub(crate) job_max_salary: Option<u64>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub(crate) job_posted_at_timestamp: Option<i64>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub(crate) job_posted_at_datetime_utc: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub(crate) job_required_skills: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub(crate) job_highlights: JobHighlights,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct JobHighlights {
    #[serde(rename = "Qualifications", default, deserialize_with = "null_as_default")]
    pub(crate) qualifications: Vec<String>,
}
