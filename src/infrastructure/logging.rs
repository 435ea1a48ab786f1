use tracing_subscriber::EnvFilter;

use crate::infrastructure::config::LoggingConfig;

/// `RUST_LOG` wins over the configured level when it is set.
pub fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level))
}

/// Install the global subscriber. A second call is a no-op.
pub fn init_tracing(config: &LoggingConfig) {
    let filter = env_filter(config);
    let _ = if config.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .try_init()
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).try_init()
    };
}
