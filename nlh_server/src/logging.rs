//! Structured logging configuration.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize structured logging.
///
/// Log levels are configurable via `RUST_LOG`. The engine crate logs through
/// the `log` facade; `LogTracer` forwards those records into the subscriber
/// installed here.
///
/// # Example
///
/// ```no_run
/// nlh_server::logging::init();
/// tracing::info!("server starting");
/// ```
pub fn init() {
    // Bridge `log` records (the engine crate) into tracing. Installed
    // explicitly so the bridge survives a non-default feature set;
    // the subscriber's own attempt below then finds a logger already set.
    let _ = tracing_log::LogTracer::init();

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,hyper=warn"));

    let fmt_layer = tracing_subscriber::fmt::layer().with_target(true);

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init();

    tracing::info!("structured logging initialized");
}
