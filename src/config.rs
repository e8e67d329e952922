//! Runtime configuration for the integrity engine.
//!
//! Settings come from environment variables so embedding applications can
//! configure the engine without a config file:
//!
//! - `TASKWEAVE_ENV` (required): deployment environment name
//! - `TASKWEAVE_LOG`: tracing filter directive, defaulted per environment
//! - `TASKWEAVE_TRAVERSAL_LIMIT`: maximum nodes a single graph walk may visit

use thiserror::Error;

/// Variable naming the deployment environment.
pub const ENV_VAR: &str = "TASKWEAVE_ENV";
/// Variable holding the tracing filter directive.
pub const LOG_VAR: &str = "TASKWEAVE_LOG";
/// Variable holding the traversal node limit.
pub const TRAVERSAL_LIMIT_VAR: &str = "TASKWEAVE_TRAVERSAL_LIMIT";

/// Errors raised while loading configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A required variable is absent or empty.
    #[error("missing configuration value: {key} must be set")]
    MissingConfiguration {
        /// Name of the variable.
        key: &'static str,
    },

    /// A variable still holds a template placeholder such as `<changeme>`.
    #[error("{key} is set to a placeholder value; replace it with a real setting")]
    PlaceholderValue {
        /// Name of the variable.
        key: &'static str,
    },

    /// A variable could not be parsed.
    #[error("invalid value '{value}' for {key}")]
    InvalidValue {
        /// Name of the variable.
        key: &'static str,
        /// Rejected raw value.
        value: String,
    },
}

/// Settings for graph validation and logging.
///
/// # Examples
///
/// ```
/// use taskweave::config::IntegrityConfig;
///
/// let config = IntegrityConfig::default();
/// assert_eq!(config.traversal_limit, None);
///
/// let strict = IntegrityConfig::strict();
/// assert!(strict.traversal_limit.is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegrityConfig {
    /// Deployment environment name, such as `development` or `production`.
    pub environment: String,
    /// Tracing filter directive.
    pub log_filter: String,
    /// Maximum nodes a single cycle walk may visit. `None` bounds walks by
    /// graph size alone.
    pub traversal_limit: Option<usize>,
}

impl Default for IntegrityConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_owned(),
            log_filter: default_log_filter("development").to_owned(),
            traversal_limit: None,
        }
    }
}

impl IntegrityConfig {
    /// Creates a configuration that caps every walk at 10 000 nodes.
    ///
    /// Useful for request handlers that must answer in bounded time.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            traversal_limit: Some(10_000),
            ..Self::default()
        }
    }

    /// Loads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a required variable is missing, a value
    /// is a placeholder, or a number cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// See [`IntegrityConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = read_var(&lookup, ENV_VAR)?.ok_or(ConfigError::MissingConfiguration {
            key: ENV_VAR,
        })?;
        let log_filter = read_var(&lookup, LOG_VAR)?
            .unwrap_or_else(|| default_log_filter(&environment).to_owned());
        let traversal_limit = read_var(&lookup, TRAVERSAL_LIMIT_VAR)?
            .map(|raw| parse_limit(&raw))
            .transpose()?;

        Ok(Self {
            environment,
            log_filter,
            traversal_limit,
        })
    }
}

/// Reads a trimmed, non-empty, non-placeholder value.
fn read_var<F>(lookup: &F, key: &'static str) -> Result<Option<String>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };
    let value = raw.trim();
    if value.is_empty() {
        return Ok(None);
    }
    if is_placeholder(value) {
        return Err(ConfigError::PlaceholderValue { key });
    }
    Ok(Some(value.to_owned()))
}

fn is_placeholder(value: &str) -> bool {
    (value.starts_with('<') && value.ends_with('>')) || value.eq_ignore_ascii_case("changeme")
}

fn parse_limit(raw: &str) -> Result<usize, ConfigError> {
    match raw.parse::<usize>() {
        Ok(limit) if limit > 0 => Ok(limit),
        _ => Err(ConfigError::InvalidValue {
            key: TRAVERSAL_LIMIT_VAR,
            value: raw.to_owned(),
        }),
    }
}

fn default_log_filter(environment: &str) -> &'static str {
    match environment {
        "production" => "info",
        _ => "debug",
    }
}
