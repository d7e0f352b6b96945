mod pipeline;

pub use pipeline::{
    BoardConfig, PipelineConfig, RateLimitConfig, SearchSettings, BOARDS_FILE, CRITERIA_FILE,
};

use std::env;
use std::fmt;
use std::path::PathBuf;

/// Distinguishes runtime behavior for different stages of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Process-level configuration sourced from the environment (and `.env`).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub paths: PathsConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let config_dir = path_from_env("JOB_PIPELINE_CONFIG_DIR", "config")?;
        let output_dir = path_from_env("JOB_PIPELINE_OUTPUT_DIR", "jobs/pipeline")?;
        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            paths: PathsConfig {
                config_dir,
                output_dir,
            },
            telemetry: TelemetryConfig { log_level },
        })
    }
}

fn path_from_env(var: &'static str, default: &str) -> Result<PathBuf, ConfigError> {
    match env::var(var) {
        Ok(value) if value.trim().is_empty() => Err(ConfigError::EmptyPath { var }),
        Ok(value) => Ok(PathBuf::from(value.trim())),
        Err(_) => Ok(PathBuf::from(default)),
    }
}

/// Where configuration is read from and where postings are written.
#[derive(Debug, Clone)]
pub struct PathsConfig {
    pub config_dir: PathBuf,
    pub output_dir: PathBuf,
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    EmptyPath {
        var: &'static str,
    },
    MissingFile {
        path: PathBuf,
    },
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EmptyPath { var } => {
                write!(f, "{var} is set but empty; unset it or point it at a directory")
            }
            ConfigError::MissingFile { path } => write!(
                f,
                "configuration file not found: {} (run from the project root or pass --config-dir)",
                path.display()
            ),
            ConfigError::Read { path, .. } => {
                write!(f, "unable to read configuration file {}", path.display())
            }
            ConfigError::Parse { path, source } => write!(
                f,
                "invalid YAML in {}: {} (check indentation and key names)",
                path.display(),
                source
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::EmptyPath { .. } | ConfigError::MissingFile { .. } => None,
            ConfigError::Read { source, .. } => Some(source),
            ConfigError::Parse { source, .. } => Some(source),
        }
    }
}
