use crate::postings::JobPosting;
use chrono::NaiveDateTime;

const HEAVY_RULE: &str =
    "================================================================================";
const LIGHT_RULE: &str =
    "--------------------------------------------------------------------------------";
const NOT_SPECIFIED: &str = "Not specified";

/// Plain-text rendering written to each posting file.
pub fn format_posting(posting: &JobPosting, generated_at: NaiveDateTime) -> String {
    let mut lines: Vec<String> = vec![
        HEAVY_RULE.to_string(),
        format!("JOB POSTING: {}", posting.title),
        HEAVY_RULE.to_string(),
        String::new(),
        format!("Company: {}", or_not_specified(&posting.company)),
        format!("Location: {}", or_not_specified(&posting.location)),
        format!("Remote Type: {}", posting.remote_type.label()),
    ];

    if let Some(salary) = format_salary(posting.salary_min, posting.salary_max) {
        lines.push(format!("Salary: {salary}"));
    }
    if let Some(posted) = posting.posted_date {
        lines.push(format!("Posted Date: {}", posted.format("%Y-%m-%d")));
    }

    lines.push(format!(
        "Job URL: {}",
        posting.job_url.as_deref().unwrap_or(NOT_SPECIFIED)
    ));
    lines.push(format!("Board: {}", posting.board_name));
    lines.push(format!("Board Job ID: {}", posting.board_job_id));
    lines.push(String::new());

    if let Some(description) = posting.description.as_deref() {
        lines.extend([
            LIGHT_RULE.to_string(),
            "DESCRIPTION".to_string(),
            LIGHT_RULE.to_string(),
            description.to_string(),
            String::new(),
        ]);
    }

    if !posting.requirements.is_empty() {
        lines.extend([
            LIGHT_RULE.to_string(),
            "REQUIREMENTS".to_string(),
            LIGHT_RULE.to_string(),
        ]);
        lines.extend(posting.requirements.iter().map(|req| format!("• {req}")));
        lines.push(String::new());
    }

    lines.extend([
        HEAVY_RULE.to_string(),
        format!("Generated: {}", generated_at.format("%Y-%m-%d %H:%M:%S")),
        HEAVY_RULE.to_string(),
    ]);

    lines.join("\n")
}

/// Keeps word characters, hyphens and whitespace (as `_`), collapses runs of
/// underscores and truncates to `max_len` characters.
pub fn sanitize_filename(text: &str, max_len: usize) -> String {
    let mut sanitized = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_alphanumeric() || c == '-' {
            sanitized.push(c);
        } else if (c == '_' || c.is_whitespace()) && !sanitized.ends_with('_') {
            sanitized.push('_');
        }
    }

    let trimmed = sanitized.trim_matches('_');
    let truncated: String = trimmed.chars().take(max_len).collect();
    truncated.trim_end_matches('_').to_string()
}

pub(crate) fn posting_file_stem(posting: &JobPosting) -> String {
    const MAX_PART: usize = 100;

    let company = sanitize_filename(&posting.company, MAX_PART);
    let title = sanitize_filename(&posting.title, MAX_PART);
    let stem = match (company.is_empty(), title.is_empty()) {
        (false, false) => format!("{company}_{title}"),
        (false, true) => company,
        (true, false) => title,
        (true, true) => sanitize_filename(&posting.board_job_id, MAX_PART),
    };

    if stem.is_empty() {
        "posting".to_string()
    } else {
        stem
    }
}

fn format_salary(min: Option<u64>, max: Option<u64>) -> Option<String> {
    match (min.filter(|v| *v > 0), max.filter(|v| *v > 0)) {
        (Some(min), Some(max)) => Some(format!("${} - ${}", thousands(min), thousands(max))),
        (Some(value), None) | (None, Some(value)) => Some(format!("${}", thousands(value))),
        (None, None) => None,
    }
}

fn thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

fn or_not_specified(value: &str) -> &str {
    if value.trim().is_empty() {
        NOT_SPECIFIED
    } else {
        value
    }
}
