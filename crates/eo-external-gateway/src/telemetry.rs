//! Log subscriber setup.

use crate::domain::config::LoggingConfig;
use crate::domain::error::GatewayError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` takes precedence over `config.level`. Returns `Ok(false)` when a
/// global subscriber was already installed, which leaves that one in place.
pub fn init_tracing(config: &LoggingConfig) -> Result<bool, GatewayError> {
    let env_filter = build_filter(config)?;

    let installed = if config.json {
        let json_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_current_span(true);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(json_layer)
            .try_init()
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_ansi(true);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()
    };

    match installed {
        Ok(()) => {
            tracing::info!(level = %config.level, json = config.json, "Logging initialized");
            Ok(true)
        }
        Err(e) => {
            tracing::debug!(error = %e, "Log subscriber already installed");
            Ok(false)
        }
    }
}

fn build_filter(config: &LoggingConfig) -> Result<EnvFilter, GatewayError> {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| GatewayError::Telemetry(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_keeps_first() {
        let config = LoggingConfig::default();
        // Other tests in this binary may have installed one already.
        let _ = init_tracing(&config).unwrap();
        assert!(!init_tracing(&config).unwrap());
    }

    #[test]
    fn test_filter_directives() {
        let config = LoggingConfig {
            level: "eo_external_gateway=debug,tower_http=warn".to_string(),
            json: true,
        };
        assert!(build_filter(&config).is_ok());
    }
}
