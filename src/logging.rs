//! Subscriber setup for binaries. The library itself only emits events.

use tracing_subscriber::EnvFilter;

/// Environment variable holding an `EnvFilter` directive
pub const LOG_ENV: &str = "QR_AGE_LOG";

/// Set to anything to default to `debug` when [`LOG_ENV`] is unset
pub const DEBUG_ENV: &str = "QR_DEBUG";

/// Filter from [`LOG_ENV`], else `debug` under [`DEBUG_ENV`], else `info`
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
        if std::env::var_os(DEBUG_ENV).is_some() {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    })
}

/// Install a stderr `fmt` subscriber. Later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .try_init();
}
