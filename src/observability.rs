use anyhow::Result;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ObservabilityConfig;

/// Initialize structured logging
///
/// Level and output format come from `config` only. JSON output is used in
/// production, pretty console output otherwise.
pub fn init_observability(
    service_name: &str,
    service_version: &str,
    config: &ObservabilityConfig,
) -> Result<()> {
    let env_filter = env_filter(config)?;

    if config.is_production() {
        tracing_subscriber::registry()
            .with(fmt::layer().json().with_filter(env_filter))
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_line_number(true)
                    .with_filter(env_filter),
            )
            .try_init()?;
    }

    tracing::info!(
        service.name = service_name,
        service.version = service_version,
        environment = %config.environment,
        "Logging initialized"
    );

    Ok(())
}

fn env_filter(config: &ObservabilityConfig) -> Result<EnvFilter> {
    Ok(EnvFilter::try_new(&config.log_level)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn observability(log_level: &str) -> ObservabilityConfig {
        ObservabilityConfig {
            log_level: log_level.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_filter_uses_configured_level() {
        let filter = env_filter(&observability("contact_relay=debug")).unwrap();

        assert_eq!(filter.to_string(), "contact_relay=debug");
    }

    #[test]
    fn test_invalid_level_is_rejected() {
        assert!(env_filter(&observability("contact_relay=loud")).is_err());
    }

    #[test]
    fn test_second_init_is_rejected() {
        let _ = init_observability("test-service", "0.1.0", &observability("debug"));

        let second = init_observability("test-service", "0.1.0", &observability("debug"));
        assert!(second.is_err(), "global subscriber must only be set once");
    }
}
