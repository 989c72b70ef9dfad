use playdeck_config::{LogFormat, LoggingConfig};
use tracing_subscriber::EnvFilter;

/// Filter for `log_level`, falling back to `RUST_LOG` and then `info`
///
/// `log_level` may be a bare level or a full directive list such as
/// `info,playdeck_execution=debug`.
pub fn build_env_filter(log_level: &str) -> EnvFilter {
    EnvFilter::try_new(log_level)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initialize logging from configuration
///
/// Returns `false` when a global subscriber was already installed, in which
/// case the existing one is kept.
pub fn init_logging_from_config(config: &LoggingConfig) -> bool {
    let env_filter = build_env_filter(config.level.as_str());
    let builder = tracing_subscriber::fmt().with_env_filter(env_filter);

    // Use try_init to avoid panic if global subscriber already set
    let installed = match config.format {
        LogFormat::Text => builder.try_init().is_ok(),
        LogFormat::Compact => builder.compact().try_init().is_ok(),
        LogFormat::Json => builder.json().with_current_span(true).try_init().is_ok(),
    };

    if !installed {
        tracing::debug!("Global tracing subscriber already initialized, skipping");
    }
    installed
}

/// Initialize simple tracing for basic console output
pub fn init_simple_tracing(log_level: &str) -> bool {
    let installed = tracing_subscriber::fmt()
        .with_env_filter(build_env_filter(log_level))
        .try_init()
        .is_ok();
    if !installed {
        tracing::debug!("Global tracing subscriber already initialized, skipping");
    }
    installed
}
