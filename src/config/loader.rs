//! Configuration loading from the environment.

use url::Url;

use crate::config::schema::{BridgeConfig, DEFAULT_BODY_SIZE_LIMIT, DEFAULT_XFF_DEPTH};
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable names, looked up after the configured prefix.
pub const ENV_ORIGIN: &str = "ORIGIN";
pub const ENV_XFF_DEPTH: &str = "XFF_DEPTH";
pub const ENV_ADDRESS_HEADER: &str = "ADDRESS_HEADER";
pub const ENV_PROTOCOL_HEADER: &str = "PROTOCOL_HEADER";
pub const ENV_HOST_HEADER: &str = "HOST_HEADER";
pub const ENV_BODY_SIZE_LIMIT: &str = "BODY_SIZE_LIMIT";

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A variable that must parse as an integer did not.
    #[error("{name} must be an integer, got {value:?}")]
    InvalidInteger { name: String, value: String },

    /// The origin override is not an absolute URL.
    #[error("{name} must be an absolute URL: {source}")]
    InvalidOrigin {
        name: String,
        #[source]
        source: url::ParseError,
    },

    /// Semantic validation rejected the loaded values.
    #[error("validation failed: {}", format_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn format_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from the process environment.
///
/// `prefix` is prepended to every variable name, so a deployment can
/// namespace its settings (e.g. prefix `MY_APP_` reads `MY_APP_ORIGIN`).
pub fn from_env(prefix: &str) -> Result<BridgeConfig, ConfigError> {
    from_lookup(prefix, |name| std::env::var(name).ok())
}

/// Load configuration through an injected lookup function.
///
/// Separated from [`from_env`] so tests can supply values without mutating
/// process state.
pub fn from_lookup<F>(prefix: &str, lookup: F) -> Result<BridgeConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let var = |name: &str| lookup(&format!("{prefix}{name}")).filter(|v| !v.is_empty());

    let origin = match var(ENV_ORIGIN) {
        Some(raw) => Some(Url::parse(&raw).map_err(|source| ConfigError::InvalidOrigin {
            name: format!("{prefix}{ENV_ORIGIN}"),
            source,
        })?),
        None => None,
    };

    let xff_depth = parse_integer(&var(ENV_XFF_DEPTH), prefix, ENV_XFF_DEPTH, DEFAULT_XFF_DEPTH)?;
    let body_size_limit = parse_integer(
        &var(ENV_BODY_SIZE_LIMIT),
        prefix,
        ENV_BODY_SIZE_LIMIT,
        DEFAULT_BODY_SIZE_LIMIT,
    )?;

    // Header names are matched case-insensitively; normalize once here.
    let config = BridgeConfig {
        env_prefix: prefix.to_string(),
        origin,
        xff_depth,
        address_header: var(ENV_ADDRESS_HEADER).map(|v| v.to_lowercase()),
        protocol_header: var(ENV_PROTOCOL_HEADER).map(|v| v.to_lowercase()),
        host_header: var(ENV_HOST_HEADER)
            .map(|v| v.to_lowercase())
            .unwrap_or_else(|| "host".to_string()),
        body_size_limit,
    };

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

fn parse_integer<T: std::str::FromStr>(
    value: &Option<String>,
    prefix: &str,
    name: &str,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidInteger {
            name: format!("{prefix}{name}"),
            value: raw.clone(),
        }),
        None => Ok(default),
    }
}
