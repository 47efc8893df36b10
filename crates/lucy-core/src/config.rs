/// Process-wide configuration for Lucy.
#[derive(Debug, Clone)]
pub struct CoreConfig {
    /// `tracing-subscriber` env-filter directive used when no `RUST_LOG` is set.
    pub log_filter: String,
    pub profiling: ProfilingMode,
}

impl Default for CoreConfig {
    fn default() -> Self {
        CoreConfig {
            log_filter: crate::logging::DEFAULT_FILTER.to_string(),
            profiling: ProfilingMode::Off,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProfilingMode {
    /// Profiling scopes are compiled in but not recorded
    #[default]
    Off,
    /// Scopes are recorded and can be read through the puffin API
    On,
    /// Scopes are recorded and served to `puffin_viewer` over HTTP
    WithWebserver,
}
