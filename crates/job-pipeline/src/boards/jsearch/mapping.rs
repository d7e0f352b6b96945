use super::parser::JSearchJob;
use crate::boards::normalize::{join_location, parse_datetime};
use crate::boards::{decode_record, MappingError};
use crate::postings::{JobPosting, RemoteType};
use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::warn;

/// Maps one JSearch job object onto a [`JobPosting`]. Pure: the same payload
/// always yields an equal posting.
pub(crate) fn to_posting(board_name: &str, raw: &Value) -> Result<JobPosting, MappingError> {
    let job: JSearchJob = decode_record(raw)?;

    let location = join_location([
        job.job_city.as_deref(),
        job.job_state.as_deref(),
        job.job_country.as_deref(),
    ]);
    let remote_type = RemoteType::classify(job.job_is_remote, job.job_description.as_deref());
    let posted_date = posted_date(&job);

    let mut requirements = job.job_required_skills;
    requirements.extend(job.job_highlights.qualifications);

    let posting = JobPosting::builder(board_name, job.job_id.unwrap_or_default())
        .title(job.job_title.unwrap_or_default())
        .company(job.employer_name.unwrap_or_default())
        .location(location)
        .remote_type(remote_type)
        .salary(job.job_min_salary, job.job_max_salary)
        .description(job.job_description)
        .requirements(requirements)
        .posted_date(posted_date)
        .job_url(job.job_apply_link)
        .raw_data(raw.clone())
        .build()?;

    Ok(posting)
}

// Epoch seconds win; the ISO string is only a fallback.
fn posted_date(job: &JSearchJob) -> Option<DateTime<Utc>> {
    if let Some(timestamp) = job.job_posted_at_timestamp.filter(|ts| *ts > 0) {
        match DateTime::from_timestamp(timestamp, 0) {
            Some(posted) => return Some(posted),
            None => warn!(timestamp, "ignoring out-of-range posting timestamp"),
        }
    }

    let text = job.job_posted_at_datetime_utc.as_deref()?;
    let parsed = parse_datetime(text);
    if parsed.is_none() {
        warn!(value = text, "ignoring unparseable posting datetime");
    }
    parsed
}
