use super::parser::RemotiveJob;
use crate::boards::normalize::{normalize_token, parse_datetime};
use crate::boards::{decode_record, MappingError};
use crate::postings::{JobPosting, RemoteType};
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;
use tracing::warn;

/// One amount, optionally followed by a second one joined with `-`, `–` or
/// `to`. A `k` scales only amounts inside the same range.
static SALARY_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(\d{1,3}(?:,\d{3})+|\d+(?:\.\d+)?)\s?(k\b)?(?:\s*(?:-|–|—|to)\s*[$€£]?\s*(\d{1,3}(?:,\d{3})+|\d+(?:\.\d+)?)\s?(k\b)?)?",
    )
    .unwrap()
});

/// Anything smaller is an hourly rate or noise, not an annual salary.
const MIN_ANNUAL_AMOUNT: f64 = 1000.0;

/// Decodes a Remotive job object; arrays and wrong field types are rejected.
pub(crate) fn decode(raw: &Value) -> Result<RemotiveJob, MappingError> {
    decode_record(raw)
}

pub(crate) fn to_posting(
    board_name: &str,
    job: RemotiveJob,
    raw: &Value,
) -> Result<JobPosting, MappingError> {
    let (salary_min, salary_max) = job
        .salary
        .as_deref()
        .map(parse_salary_range)
        .unwrap_or((None, None));

    let posted_date = job.publication_date.as_deref().and_then(|text| {
        let parsed = parse_datetime(text);
        if parsed.is_none() {
            warn!(value = text, "ignoring unparseable Remotive publication date");
        }
        parsed
    });

    let posting = JobPosting::builder(board_name, job.id.unwrap_or_default())
        .title(job.title.unwrap_or_default())
        .company(job.company_name.unwrap_or_default())
        .location(job.candidate_required_location.unwrap_or_default())
        .remote_type(RemoteType::Remote)
        .salary(salary_min, salary_max)
        .description(job.description)
        .requirements(job.tags)
        .posted_date(posted_date)
        .job_url(job.url)
        .raw_data(raw.clone())
        .build()?;

    Ok(posting)
}

/// Best-effort range from free text such as `$100k - $120k` or
/// `$90,000 - $110,000 USD`. Inside a range a `k` on either side scales
/// both, so `100 - 120k` reads as 100,000 to 120,000. A standalone `401k`
/// is a retirement plan, not a salary.
pub(crate) fn parse_salary_range(text: &str) -> (Option<u64>, Option<u64>) {
    let mut amounts: Vec<u64> = Vec::new();

    for caps in SALARY_RANGE.captures_iter(text) {
        let lower = (&caps[1], caps.get(2).is_some());
        let upper = caps
            .get(3)
            .map(|amount| (amount.as_str(), caps.get(4).is_some()));

        if upper.is_none() && lower == ("401", true) {
            continue;
        }

        let thousands = lower.1 || upper.is_some_and(|(_, k)| k);
        for (amount, _) in std::iter::once(lower).chain(upper) {
            let Ok(value) = amount.replace(',', "").parse::<f64>() else {
                continue;
            };
            let value = if thousands { value * 1000.0 } else { value };
            if value >= MIN_ANNUAL_AMOUNT {
                amounts.push(value.round() as u64);
            }
        }
    }
    amounts.truncate(2);

    match amounts.as_slice() {
        [] => (None, None),
        [single] => (Some(*single), None),
        [first, second, ..] => (Some(*first.min(second)), Some(*first.max(second))),
    }
}

/// Remotive has no employment-type query parameter, so the criteria's
/// comma-separated types are matched here. Jobs without a type are kept.
pub(crate) fn matches_employment_type(job_type: Option<&str>, wanted: &[String]) -> bool {
    let Some(job_type) = job_type.map(normalize_token).filter(|t| !t.is_empty()) else {
        return true;
    };

    let wanted: Vec<String> = wanted
        .iter()
        .map(|value| normalize_token(value))
        .filter(|value| !value.is_empty())
        .collect();
    if wanted.is_empty() {
        return true;
    }

    wanted
        .iter()
        .any(|value| value.starts_with(&job_type) || job_type.starts_with(value.as_str()))
}
