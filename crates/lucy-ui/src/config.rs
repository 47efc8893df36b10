//! Engine configuration.

use std::time::Duration;

/// Configuration for [`UiCore`](crate::UiCore).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UiConfig {
    pub layout: LayoutConfig,
    pub input: InputConfig,
}

/// Layout solver settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutConfig {
    /// Differences at or below this are treated as settled.
    pub epsilon: f32,
    /// Upper bound on distribution rounds per solve.
    pub max_solver_iterations: u32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            epsilon: 0.001,
            max_solver_iterations: 64,
        }
    }
}

/// Pointer routing settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputConfig {
    /// Longest interval between two presses that still counts as a double click.
    pub double_click: Duration,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            double_click: Duration::from_millis(500),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = UiConfig::default();
        assert_eq!(config.layout.epsilon, 0.001);
        assert_eq!(config.layout.max_solver_iterations, 64);
        assert_eq!(config.input.double_click, Duration::from_millis(500));
    }
}
