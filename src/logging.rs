use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize tracing once at startup.
/// `RUST_LOG` wins over the configured default level.
pub fn init_logging(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true).with_line_number(true));

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        tracing::warn!("tracing subscriber already set");
        return;
    }

    tracing::info!(level = default_level, "logging initialized");
}
