use tracing_subscriber::EnvFilter;

pub const DEFAULT_FILTER: &str = "lectio=info";

/// Installs the global fmt subscriber. `RUST_LOG` takes precedence over the default filter.
pub fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    // A second call (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::fmt().with_env_filter(filter).with_target(true).try_init();
}
