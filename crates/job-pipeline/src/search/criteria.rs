use crate::config::SearchSettings;

/// Board-agnostic search request. Each adapter translates it into its own
/// query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchCriteria {
    pub keywords: Vec<String>,
    pub location: String,
    pub remote: Option<bool>,
    pub employment_type: Option<String>,
}

impl SearchCriteria {
    pub fn new(keywords: Vec<String>, location: impl Into<String>) -> Self {
        Self {
            keywords,
            location: location.into(),
            remote: None,
            employment_type: None,
        }
    }

    pub fn with_remote(mut self, remote: bool) -> Self {
        self.remote = Some(remote);
        self
    }

    pub fn with_employment_type(mut self, employment_type: impl Into<String>) -> Self {
        self.employment_type = Some(employment_type.into());
        self
    }

    /// Keywords joined by single spaces, blanks dropped.
    pub fn keyword_phrase(&self) -> String {
        self.keywords
            .iter()
            .map(|keyword| keyword.trim())
            .filter(|keyword| !keyword.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// `employment_type` split on commas, e.g. `FULLTIME,CONTRACTOR`.
    pub fn employment_types(&self) -> Vec<String> {
        self.employment_type
            .as_deref()
            .map(|value| {
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|part| !part.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl From<&SearchSettings> for SearchCriteria {
    fn from(settings: &SearchSettings) -> Self {
        Self {
            keywords: settings.keywords.clone(),
            location: settings.location.trim().to_string(),
            remote: settings.remote,
            employment_type: settings
                .employment_type
                .as_deref()
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_string),
        }
    }
}
