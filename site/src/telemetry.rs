use tracing_subscriber::EnvFilter;

const DEFAULT_DIRECTIVES: &str = "info,tideline_site=debug,tideline_http=debug,tideline_cms=debug";

/// Install the stdout subscriber. `RUST_LOG` overrides the default
/// directives.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
