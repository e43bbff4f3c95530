//! Server startup utilities.

use stash_config::AppConfig;
use tracing::info;

/// Prints the startup banner.
pub fn print_banner() {
    info!(r#"
         __             __
   _____/ /_____ ______/ /_
  / ___/ __/ __ `/ ___/ __ \
 (__  ) /_/ /_/ (__  ) / / /
/____/\__/\__,_/____/_/ /_/

    cache-aside user lookups
    "#);
}

/// Prints where the server can be reached and how lookups are tuned.
pub fn print_startup_info(config: &AppConfig) {
    let separator = "=".repeat(60);
    let base = format!("http://{}", config.server.addr());
    info!("{}", separator);
    info!("Users:     {}/user/{{id}}", base);
    info!("Health:    {}/health", base);
    info!("API Docs:  {}/swagger-ui", base);
    if config.observability.metrics_enabled {
        info!("Metrics:   {}{}", base, config.observability.metrics_path);
    }
    if config.redis.enabled {
        info!("Cache:     redis ({})", config.redis.url);
    } else {
        info!("Cache:     in-memory");
    }
    info!(
        "Lookups:   ttl={}s single_flight={} on_cache_error={}",
        config.cache.ttl_secs, config.cache.single_flight, config.cache.on_cache_error
    );
    info!("{}", separator);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_print_banner_does_not_panic() {
        let _ = tracing_subscriber::fmt::try_init();
        print_banner();
    }

    #[test]
    fn test_print_startup_info_does_not_panic() {
        let _ = tracing_subscriber::fmt::try_init();
        print_startup_info(&AppConfig::default());
    }

    #[test]
    fn test_print_startup_info_memory_cache() {
        let _ = tracing_subscriber::fmt::try_init();
        let mut config = AppConfig::default();
        config.redis.enabled = false;
        config.observability.metrics_enabled = false;
        print_startup_info(&config);
    }
}
