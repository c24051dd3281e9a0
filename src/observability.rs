use tracing_subscriber::EnvFilter;

/// Installs the global `tracing` subscriber, logging to stderr.
///
/// `RUST_LOG` wins when set; otherwise only this crate's `info` events are
/// shown.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("household_panel=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
