//! Lucy Core
//!
//! Shared building blocks for the Lucy UI layout library: geometry primitives,
//! fast collections, logging and profiling setup.

pub mod alloc;
pub mod config;
pub mod geometry;
pub mod logging;
pub mod math;
pub mod profiling;

pub use config::{CoreConfig, ProfilingMode};

/// Initialise logging and profiling from a [`CoreConfig`].
///
/// Logging initialisation failures (a global subscriber already installed) are
/// returned to the caller.
pub fn init(config: &CoreConfig) -> Result<(), logging::LoggingError> {
    logging::try_init_with_filter(&config.log_filter)?;
    profiling::init_profiling(config.profiling);
    Ok(())
}
