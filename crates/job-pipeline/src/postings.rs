use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Work arrangement advertised by a posting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemoteType {
    Remote,
    Hybrid,
    #[default]
    Onsite,
}

impl RemoteType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Remote => "remote",
            Self::Hybrid => "hybrid",
            Self::Onsite => "onsite",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Remote => "Remote",
            Self::Hybrid => "Hybrid",
            Self::Onsite => "Onsite",
        }
    }

    /// Best-effort classification: an explicit remote flag wins, otherwise a
    /// case-insensitive "hybrid" anywhere in the description, otherwise onsite.
    pub fn classify(is_remote: bool, description: Option<&str>) -> Self {
        if is_remote {
            return Self::Remote;
        }

        match description {
            Some(text) if text.to_lowercase().contains("hybrid") => Self::Hybrid,
            _ => Self::Onsite,
        }
    }
}

impl fmt::Display for RemoteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized job record produced by a board adapter.
///
/// Postings are built once at parse time and never mutated. Identity is the
/// `(board_name, board_job_id)` pair; both halves are guaranteed non-empty by
/// [`JobPosting::builder`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    pub title: String,
    pub company: String,
    pub location: String,
    pub remote_type: RemoteType,
    pub salary_min: Option<u64>,
    pub salary_max: Option<u64>,
    pub description: Option<String>,
    pub requirements: Vec<String>,
    pub posted_date: Option<DateTime<Utc>>,
    pub job_url: Option<String>,
    pub board_name: String,
    pub board_job_id: String,
    pub raw_data: serde_json::Value,
}

impl JobPosting {
    pub fn builder(
        board_name: impl Into<String>,
        board_job_id: impl Into<String>,
    ) -> JobPostingBuilder {
        JobPostingBuilder {
            board_name: board_name.into(),
            board_job_id: board_job_id.into(),
            title: String::new(),
            company: String::new(),
            location: String::new(),
            remote_type: RemoteType::default(),
            salary_min: None,
            salary_max: None,
            description: None,
            requirements: Vec::new(),
            posted_date: None,
            job_url: None,
            raw_data: serde_json::Value::Null,
        }
    }

    pub fn identity(&self) -> (&str, &str) {
        (&self.board_name, &self.board_job_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PostingError {
    #[error("posting is missing a board name")]
    MissingBoardName,
    #[error("posting from {board} is missing a board job id")]
    MissingJobId { board: String },
}

#[derive(Debug, Clone)]
pub struct JobPostingBuilder {
    board_name: String,
    board_job_id: String,
    title: String,
    company: String,
    location: String,
    remote_type: RemoteType,
    salary_min: Option<u64>,
    salary_max: Option<u64>,
    description: Option<String>,
    requirements: Vec<String>,
    posted_date: Option<DateTime<Utc>>,
    job_url: Option<String>,
    raw_data: serde_json::Value,
}

impl JobPostingBuilder {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn company(mut self, company: impl Into<String>) -> Self {
        self.company = company.into();
        self
    }

    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    pub fn remote_type(mut self, remote_type: RemoteType) -> Self {
        self.remote_type = remote_type;
        self
    }

    pub fn salary(mut self, min: Option<u64>, max: Option<u64>) -> Self {
        self.salary_min = min;
        self.salary_max = max;
        self
    }

    pub fn description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    pub fn requirements(mut self, requirements: Vec<String>) -> Self {
        self.requirements = requirements;
        self
    }

    pub fn posted_date(mut self, posted_date: Option<DateTime<Utc>>) -> Self {
        self.posted_date = posted_date;
        self
    }

    pub fn job_url(mut self, job_url: Option<String>) -> Self {
        self.job_url = job_url;
        self
    }

    pub fn raw_data(mut self, raw_data: serde_json::Value) -> Self {
        self.raw_data = raw_data;
        self
    }

    pub fn build(self) -> Result<JobPosting, PostingError> {
        if self.board_name.trim().is_empty() {
            return Err(PostingError::MissingBoardName);
        }
        if self.board_job_id.trim().is_empty() {
            return Err(PostingError::MissingJobId {
                board: self.board_name,
            });
        }

        Ok(JobPosting {
            title: self.title,
            company: self.company,
            location: self.location,
            remote_type: self.remote_type,
            salary_min: self.salary_min,
            salary_max: self.salary_max,
            description: self.description,
            requirements: self.requirements,
            posted_date: self.posted_date,
            job_url: self.job_url,
            board_name: self.board_name,
            board_job_id: self.board_job_id,
            raw_data: self.raw_data,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_flag_wins_over_description() {
        assert_eq!(
            RemoteType::classify(true, Some("Hybrid schedule, 3 days in office")),
            RemoteType::Remote
        );
    }

    #[test]
    fn hybrid_match_is_case_insensitive() {
        assert_eq!(
            RemoteType::classify(false, Some("This is a HyBrId role")),
            RemoteType::Hybrid
        );
        assert_eq!(RemoteType::classify(false, Some("On site")), RemoteType::Onsite);
        assert_eq!(RemoteType::classify(false, None), RemoteType::Onsite);
    }

    #[test]
    fn remote_type_serializes_as_lowercase_literal() {
        let json = serde_json::to_string(&RemoteType::Hybrid).expect("serialize");
        assert_eq!(json, "\"hybrid\"");
        assert_eq!(RemoteType::default(), RemoteType::Onsite);
    }

    #[test]
    fn builder_rejects_missing_identity() {
        let err = JobPosting::builder("JSearch", "  ")
            .title("Engineer")
            .build()
            .expect_err("blank id rejected");
        assert_eq!(
            err,
            PostingError::MissingJobId {
                board: "JSearch".to_string()
            }
        );

        let err = JobPosting::builder("", "abc")
            .build()
            .expect_err("blank board rejected");
        assert_eq!(err, PostingError::MissingBoardName);
    }

    #[test]
    fn builder_populates_identity() {
        let posting = JobPosting::builder("JSearch", "abc-1")
            .title("Platform Engineer")
            .company("Acme")
            .build()
            .expect("valid posting");
        assert_eq!(posting.identity(), ("JSearch", "abc-1"));
        assert_eq!(posting.remote_type, RemoteType::Onsite);
        assert!(posting.requirements.is_empty());
    }
}
