use crate::config::TelemetryConfig;
use std::fmt;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
pub enum TelemetryError {
    EnvFilter { value: String, source: ParseError },
    Subscriber(Box<dyn std::error::Error + Send + Sync>),
}

impl fmt::Display for TelemetryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TelemetryError::EnvFilter { value, .. } => {
                write!(
                    f,
                    "invalid log level/filter '{}': set APP_LOG_LEVEL to e.g. info or debug",
                    value
                )
            }
            TelemetryError::Subscriber(err) => write!(f, "telemetry error: {err}"),
        }
    }
}

impl std::error::Error for TelemetryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TelemetryError::EnvFilter { source, .. } => Some(source),
            TelemetryError::Subscriber(err) => Some(&**err),
        }
    }
}

/// Installs the global subscriber. `--debug` beats `RUST_LOG`, which beats
/// the configured level.
pub fn init(config: &TelemetryConfig, debug: bool) -> Result<(), TelemetryError> {
    let env_filter = build_filter(config, debug)?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(debug)
        .compact()
        .with_ansi(false)
        .try_init()
        .map_err(TelemetryError::Subscriber)
}

fn build_filter(config: &TelemetryConfig, debug: bool) -> Result<EnvFilter, TelemetryError> {
    let directive = if debug {
        "debug"
    } else if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    } else {
        config.log_level.as_str()
    };

    EnvFilter::try_new(directive).map_err(|source| TelemetryError::EnvFilter {
        value: directive.to_string(),
        source,
    })
}
