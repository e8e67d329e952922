//! Structured logging setup.
//!
//! The engine emits `tracing` events: `debug` for checks, `info` for
//! commits, `warn` for rejected writes and unvalidated loads. Embedding
//! applications may install their own subscriber instead of calling
//! [`init_logging`].

use crate::config::IntegrityConfig;
use std::sync::OnceLock;
use tracing_subscriber::EnvFilter;

static LOGGING_INITIALISED: OnceLock<()> = OnceLock::new();

/// Installs a formatted `tracing` subscriber filtered by
/// [`IntegrityConfig::log_filter`].
///
/// Safe to call more than once; only the first call has an effect. If
/// another global subscriber is already installed it is left in place.
pub fn init_logging(config: &IntegrityConfig) {
    LOGGING_INITIALISED.get_or_init(|| {
        let filter = EnvFilter::try_new(&config.log_filter)
            .unwrap_or_else(|_| EnvFilter::new("info"));
        let installed = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .try_init();

        if installed.is_err() {
            tracing::debug!("global tracing subscriber already installed; keeping it");
        }
        tracing::info!(
            environment = %config.environment,
            filter = %config.log_filter,
            "structured logging initialised"
        );
    });
}
