//! `tracing-subscriber` setup.

use tracing_subscriber::EnvFilter;

/// Default filter when neither `RUST_LOG` nor an explicit filter is given.
pub const DEFAULT_FILTER: &str = "info,lucy_ui=debug";

pub type LoggingError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Install the global fmt subscriber with the default filter.
///
/// Panics if a global subscriber is already set; use [`try_init`]
/// in code that may run more than once (tests, embedding hosts).
pub fn init() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(DEFAULT_FILTER))
        .init();
}

/// Install the global fmt subscriber with the default filter, reporting
/// instead of panicking when one is already set.
pub fn try_init() -> Result<(), LoggingError> {
    try_init_with_filter(DEFAULT_FILTER)
}

/// Install the global fmt subscriber. `RUST_LOG` wins over `filter` when set.
pub fn try_init_with_filter(filter: &str) -> Result<(), LoggingError> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(filter))
        .try_init()
}

fn env_filter(fallback: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_reported() {
        // Only this test installs a subscriber in this binary.
        assert!(try_init_with_filter("debug").is_ok());
        assert!(try_init().is_err());
        tracing::debug!("subscriber installed");
    }
}
