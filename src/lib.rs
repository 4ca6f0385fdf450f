pub mod config;
pub mod models;
pub mod pipeline;
pub mod reference;

use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber, writing to stderr.
/// Filter from `RUST_LOG`, else `config::default_log_filter()`.
/// Calls after the first are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .with_writer(std::io::stderr)
        .try_init();

    tracing::debug!("{} v{} tracing initialised", config::APP_NAME, config::APP_VERSION);
}
