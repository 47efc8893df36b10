//! Layout pass instrumentation.

use std::time::{Duration, Instant};

/// Metrics collected during one layout pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutMetrics {
    /// Time spent in the pass
    pub layout_time: Duration,

    /// Total number of nodes in the tree
    pub total_nodes: usize,

    /// Number of nodes whose rect was recomputed
    pub nodes_laid_out: usize,

    /// Number of layout boundaries processed
    pub dirty_roots: usize,

    /// Solver rounds summed over every container
    pub solver_iterations: u32,

    /// Number of containers whose children overflow
    pub overflow_count: usize,

    /// Containers that hit the solver iteration cap
    pub capped_solves: usize,

    /// True if the pass was skipped because nothing was dirty
    pub skipped: bool,
}

impl LayoutMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Percentage of nodes that needed recomputation.
    pub fn laid_out_percentage(&self) -> f32 {
        if self.total_nodes == 0 {
            0.0
        } else {
            (self.nodes_laid_out as f32 / self.total_nodes as f32) * 100.0
        }
    }

    /// Format metrics as a human-readable string.
    pub fn format_summary(&self) -> String {
        if self.skipped {
            return format!("Layout: skipped ({} nodes clean)", self.total_nodes);
        }
        format!(
            "Layout: {:.2}ms | {} / {} nodes ({:.1}%) from {} roots | {} solver rounds | {} overflowing",
            self.layout_time.as_secs_f64() * 1000.0,
            self.nodes_laid_out,
            self.total_nodes,
            self.laid_out_percentage(),
            self.dirty_roots,
            self.solver_iterations,
            self.overflow_count,
        )
    }
}

/// Helper for timing sections of layout code.
pub struct MetricsTimer {
    start: Instant,
}

impl MetricsTimer {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Stop the timer and return elapsed duration.
    pub fn stop(self) -> Duration {
        self.start.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage() {
        let metrics = LayoutMetrics {
            total_nodes: 200,
            nodes_laid_out: 50,
            ..Default::default()
        };
        assert_eq!(metrics.laid_out_percentage(), 25.0);
        assert_eq!(LayoutMetrics::new().laid_out_percentage(), 0.0);
    }

    #[test]
    fn test_summary() {
        let skipped = LayoutMetrics {
            total_nodes: 3,
            skipped: true,
            ..Default::default()
        };
        assert_eq!(skipped.format_summary(), "Layout: skipped (3 nodes clean)");

        let full = LayoutMetrics {
            total_nodes: 4,
            nodes_laid_out: 4,
            dirty_roots: 1,
            ..Default::default()
        };
        assert!(full.format_summary().contains("4 / 4 nodes (100.0%)"));
    }
}
