//! Server startup utilities.

use sightline_config::AppConfig;
use tracing::info;

/// Prints the startup banner.
pub fn print_banner() {
    info!(
        r#"
   _____ _       __    __  ___
  / ___/(_)___ _/ /_  / /_/ (_)___  ___
  \__ \/ / __ `/ __ \/ __/ / / __ \/ _ \
 ___/ / / /_/ / / / / /_/ / / / / /  __/
/____/_/\__, /_/ /_/\__/_/_/_/ /_/\___/
       /____/
    "#
    );
}

/// One-line summary of the resolved configuration.
///
/// Logged right after the subscriber is installed, since the loader runs
/// before logging exists.
#[must_use]
pub fn config_summary(config: &AppConfig) -> String {
    let cache = if config.cache.enabled {
        format!("{}s", config.cache.ttl_secs)
    } else {
        "off".to_string()
    };
    format!(
        "environment={} storage={} cache_ttl={} dedup_window={}s serialize_views={} log_format={}",
        config.app.environment,
        config.storage.backend,
        cache,
        config.views.dedup_window_secs,
        config.views.serialize_per_profile,
        config.observability.log_format,
    )
}

/// Prints server startup information.
pub fn print_startup_info(config: &AppConfig) {
    let separator = "=".repeat(60);
    let addr = config.server.addr();
    info!("{}", separator);
    info!("REST API:  http://{}/api/v1/profiles/{{identity}}", addr);
    info!("Health:    http://{}/health", addr);
    info!("API Docs:  http://{}/swagger-ui", addr);
    if config.observability.metrics_enabled {
        info!("Metrics:   http://{}{}", addr, config.observability.metrics_path);
    }
    info!("Storage:   {}", config.storage.backend);
    info!(
        "Cache:     {}",
        if config.cache.enabled {
            format!("{}s TTL", config.cache.ttl_secs)
        } else {
            "disabled".to_string()
        }
    );
    info!("{}", separator);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_print_banner_does_not_panic() {
        print_banner();
    }

    #[test]
    fn test_config_summary_reflects_resolved_values() {
        let mut config = AppConfig::default();
        let summary = config_summary(&config);
        assert!(summary.starts_with("environment=development "));
        assert!(summary.contains("cache_ttl=300s"));
        assert!(summary.contains("dedup_window=3600s"));

        config.cache.enabled = false;
        config.views.serialize_per_profile = false;
        let summary = config_summary(&config);
        assert!(summary.contains("cache_ttl=off"));
        assert!(summary.contains("serialize_views=false"));
    }

    #[test]
    fn test_print_startup_info_does_not_panic() {
        let mut config = AppConfig::default();
        print_startup_info(&config);

        config.cache.enabled = false;
        config.observability.metrics_enabled = false;
        print_startup_info(&config);
    }
}
