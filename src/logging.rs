//! Tracing subscriber setup.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Build the filter: `RUST_LOG` wins, otherwise `default_level` for this
/// crate and the HTTP trace layer.
pub fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "taskmate={level},tower_http={level}",
            level = default_level
        ))
    })
}

/// Install the global subscriber, writing to stderr.
///
/// Calling it twice is harmless; the second call is ignored.
pub fn init(default_level: &str) {
    let _ = tracing_subscriber::registry()
        .with(env_filter(default_level))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}
