//! Tracing subscriber setup for hosts embedding the engine.
//!
//! The engine itself only emits `debug`/`trace` events; nothing is printed
//! unless the host installs a subscriber, either its own or the one below.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::EngineConfig;

/// Installs a global tracing subscriber writing to stderr.
///
/// Reads `RUST_LOG`, falling back to `config.log_filter`. Returns `false` if a
/// global subscriber was already installed, in which case nothing changes.
pub fn init(config: &EngineConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));

    let registry = tracing_subscriber::registry().with(filter);
    let result = if config.log_json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        registry
            .with(fmt::layer().compact().with_writer(std::io::stderr))
            .try_init()
    };
    result.is_ok()
}
