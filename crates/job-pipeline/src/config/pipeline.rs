use super::ConfigError;
use regex::{Captures, Regex};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_yaml::Value;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::LazyLock;
use tracing::warn;

pub const CRITERIA_FILE: &str = "search-criteria.yaml";
pub const BOARDS_FILE: &str = "job-boards.yaml";

const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

static ENV_PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").unwrap());

/// Board and search settings read from the YAML files in the config directory.
#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    pub search: SearchSettings,
    pub boards: Vec<BoardConfig>,
}

impl PipelineConfig {
    /// Loads `search-criteria.yaml` and `job-boards.yaml`, substituting
    /// `${VAR}` placeholders from the process environment.
    pub fn load(config_dir: &Path) -> Result<Self, ConfigError> {
        let lookup = |name: &str| std::env::var(name).ok();
        let criteria: CriteriaFile = load_yaml_file(&config_dir.join(CRITERIA_FILE), &lookup)?;
        let boards: BoardsFile = load_yaml_file(&config_dir.join(BOARDS_FILE), &lookup)?;

        Ok(Self {
            search: criteria.search,
            boards: boards.boards,
        })
    }

    /// Parses already-read YAML documents; `lookup` resolves placeholders.
    pub fn from_yaml_strs(
        criteria_yaml: &str,
        boards_yaml: &str,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let criteria: CriteriaFile =
            parse_yaml(criteria_yaml, Path::new(CRITERIA_FILE), &lookup)?;
        let boards: BoardsFile = parse_yaml(boards_yaml, Path::new(BOARDS_FILE), &lookup)?;

        Ok(Self {
            search: criteria.search,
            boards: boards.boards,
        })
    }

    pub fn enabled_boards(&self) -> impl Iterator<Item = &BoardConfig> {
        self.boards.iter().filter(|board| board.enabled)
    }
}

#[derive(Debug, Default, Deserialize)]
struct CriteriaFile {
    #[serde(default)]
    search: SearchSettings,
}

#[derive(Debug, Default, Deserialize)]
struct BoardsFile {
    #[serde(default)]
    boards: Vec<BoardConfig>,
}

/// The generic search request as written in `search-criteria.yaml`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchSettings {
    #[serde(default, deserialize_with = "string_or_list")]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub remote: Option<bool>,
    #[serde(default)]
    pub employment_type: Option<String>,
}

/// One entry of the `boards` list in `job-boards.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct BoardConfig {
    pub name: String,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub adapter: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub api_host: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    #[serde(default)]
    pub search_params: BTreeMap<String, Value>,
}

impl BoardConfig {
    pub fn new(name: impl Into<String>, adapter: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            enabled: true,
            adapter: Some(adapter.into()),
            api_key: None,
            api_host: None,
            base_url: None,
            rate_limit: RateLimitConfig::default(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            search_params: BTreeMap::new(),
        }
    }

    /// Configured default query parameters rendered as strings. Nested
    /// values cannot be sent as query parameters and are skipped.
    pub fn search_param_pairs(&self) -> Vec<(String, String)> {
        self.search_params
            .iter()
            .filter_map(|(key, value)| match scalar_to_string(value) {
                Some(rendered) => Some((key.clone(), rendered)),
                None => {
                    warn!(board = %self.name, param = %key, "ignoring non-scalar search param");
                    None
                }
            })
            .collect()
    }

    /// The API key, unless it is blank or still an unresolved `${VAR}`.
    pub fn resolved_api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty() && !key.contains("${"))
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: f64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_second: default_requests_per_second(),
        }
    }
}

fn default_requests_per_second() -> f64 {
    1.0
}

fn default_timeout_seconds() -> u64 {
    DEFAULT_TIMEOUT_SECONDS
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

fn string_or_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        Some(OneOrMany::One(value)) => vec![value],
        Some(OneOrMany::Many(values)) => values,
        None => Vec::new(),
    })
}

fn load_yaml_file<T>(
    path: &Path,
    lookup: &impl Fn(&str) -> Option<String>,
) -> Result<T, ConfigError>
where
    T: DeserializeOwned + Default,
{
    if !path.exists() {
        return Err(ConfigError::MissingFile {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    parse_yaml(&content, path, lookup)
}

fn parse_yaml<T>(
    content: &str,
    path: &Path,
    lookup: &impl Fn(&str) -> Option<String>,
) -> Result<T, ConfigError>
where
    T: DeserializeOwned + Default,
{
    let parse_error = |source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    };

    let raw: Value = serde_yaml::from_str(content).map_err(parse_error)?;
    if raw.is_null() {
        return Ok(T::default());
    }

    serde_yaml::from_value(substitute_env(raw, lookup)).map_err(parse_error)
}

/// Replaces `${VAR}` in every string value. Unknown variables are left as-is
/// so a missing secret stays visible instead of silently becoming empty.
fn substitute_env(value: Value, lookup: &impl Fn(&str) -> Option<String>) -> Value {
    match value {
        Value::String(text) => Value::String(
            ENV_PLACEHOLDER
                .replace_all(&text, |caps: &Captures| {
                    lookup(&caps[1]).unwrap_or_else(|| caps[0].to_string())
                })
                .into_owned(),
        ),
        Value::Sequence(items) => Value::Sequence(
            items
                .into_iter()
                .map(|item| substitute_env(item, lookup))
                .collect(),
        ),
        Value::Mapping(mapping) => Value::Mapping(
            mapping
                .into_iter()
                .map(|(key, item)| (key, substitute_env(item, lookup)))
                .collect(),
        ),
        other => other,
    }
}
