//! Layout engine.
//!
//! Walks the widget tree from its dirty layout boundaries and arranges every
//! container with [`arrange_stack`]. Containers that fit their content are
//! measured bottom-up first, so their parent sees their natural size.
//!
//! # Example
//!
//! ```
//! use lucy_core::geometry::Rect;
//! use lucy_ui::layout::LayoutEngine;
//! use lucy_ui::tree::UiTree;
//! use lucy_ui::widgets::{Button, Container};
//!
//! let mut tree = UiTree::new();
//! let root = tree.add(Container::vertical()).unwrap();
//! let ok = tree.add(Button::new("OK")).unwrap();
//! tree.add_child(root, ok).unwrap();
//!
//! let mut engine = LayoutEngine::default();
//! let outcome = engine
//!     .layout(&mut tree, root, Rect::new(0.0, 0.0, 400.0, 300.0))
//!     .unwrap();
//! assert_eq!(outcome.rects[&ok], Rect::new(135.0, 130.0, 130.0, 40.0));
//! ```

use indexmap::IndexMap;
use lucy_core::alloc::HashMap;
use lucy_core::geometry::{Axis, Rect, Size};
use lucy_core::profiling::{profile_function, profile_scope};

use crate::config::LayoutConfig;
use crate::constraint::SizeConstraint;
use crate::error::UiResult;
use crate::metrics::{LayoutMetrics, MetricsTimer};
use crate::stack::{arrange_stack, natural_size};
use crate::tree::{LayoutRect, NodeId, UiTree};

/// A node whose content (or, for a root, the node itself) does not fit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Overflow {
    pub node: NodeId,
    pub axis: Axis,
    pub amount: f32,
}

/// Result of an incremental pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutReport {
    pub metrics: LayoutMetrics,
    /// Overflow found among the nodes recomputed by this pass.
    pub overflows: Vec<Overflow>,
}

/// Complete layout of one root tree.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutOutcome {
    /// Local rect of every visible node, in pre-order.
    pub rects: IndexMap<NodeId, LayoutRect>,
    /// Every overflow currently present in the tree.
    pub overflows: Vec<Overflow>,
    pub metrics: LayoutMetrics,
}

#[derive(Default)]
struct PassState {
    metrics: LayoutMetrics,
    overflows: Vec<Overflow>,
    measured: HashMap<NodeId, SizeConstraint>,
}

/// Computes widget rects from constraints and container policies.
#[derive(Debug, Clone, Default)]
pub struct LayoutEngine {
    config: LayoutConfig,
    last_metrics: Option<LayoutMetrics>,
}

impl LayoutEngine {
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            config,
            last_metrics: None,
        }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Metrics of the last pass, if any ran.
    pub fn last_metrics(&self) -> Option<&LayoutMetrics> {
        self.last_metrics.as_ref()
    }

    /// Recompute the subtrees below every pending layout boundary.
    pub fn update(&mut self, tree: &mut UiTree) -> LayoutReport {
        profile_function!();
        let timer = MetricsTimer::start();

        let boundaries = tree.take_dirty_roots();
        let mut pass = PassState::default();
        pass.metrics.total_nodes = tree.len();

        if boundaries.is_empty() {
            pass.metrics.skipped = true;
            self.last_metrics = Some(pass.metrics.clone());
            return LayoutReport {
                metrics: pass.metrics,
                overflows: Vec::new(),
            };
        }

        pass.metrics.dirty_roots = boundaries.len();
        for boundary in boundaries {
            self.layout_boundary(tree, boundary, &mut pass);
        }

        pass.metrics.layout_time = timer.stop();
        tracing::debug!("{}", pass.metrics.format_summary());

        self.last_metrics = Some(pass.metrics.clone());
        LayoutReport {
            metrics: pass.metrics,
            overflows: pass.overflows,
        }
    }

    /// Force a full pass over every registered root.
    pub fn relayout_all(&mut self, tree: &mut UiTree) -> LayoutReport {
        tree.mark_all_roots_dirty();
        self.update(tree)
    }

    /// Register `root` with `available`, bring the tree up to date and return
    /// the rects of every visible node below `root`.
    pub fn layout(
        &mut self,
        tree: &mut UiTree,
        root: NodeId,
        available: LayoutRect,
    ) -> UiResult<LayoutOutcome> {
        tree.set_root(root, available)?;
        let report = self.update(tree);

        let rects = tree
            .visible_descendants(root)?
            .into_iter()
            .filter_map(|id| tree.get(id).map(|node| (id, node.layout)))
            .collect();

        Ok(LayoutOutcome {
            rects,
            overflows: self.collect_overflows(tree, root)?,
            metrics: report.metrics,
        })
    }

    /// Every overflow currently recorded in the tree below `root`.
    pub fn collect_overflows(&self, tree: &UiTree, root: NodeId) -> UiResult<Vec<Overflow>> {
        let mut out = Vec::new();
        if let Some(available) = tree.root_rect(root) {
            let size = tree.layout(root)?.size();
            push_excess(
                &mut out,
                root,
                Size::new(size.width - available.width, size.height - available.height),
                self.config.epsilon,
            );
        }
        for id in tree.visible_descendants(root)? {
            push_excess(&mut out, id, tree.overflow(id)?, self.config.epsilon);
        }
        Ok(out)
    }

    fn layout_boundary(&self, tree: &mut UiTree, boundary: NodeId, pass: &mut PassState) {
        profile_scope!("layout_boundary");

        if let Some(available) = tree.root_rect(boundary) {
            let constraint = self.measure(tree, boundary, &mut pass.measured);
            let width = constraint.resolve(Axis::Horizontal, available.width);
            let height = constraint.resolve(Axis::Vertical, available.height);

            let excess = Size::new(width - available.width, height - available.height);
            let before = pass.overflows.len();
            push_excess(&mut pass.overflows, boundary, excess, self.config.epsilon);
            if pass.overflows.len() > before {
                tracing::debug!(root = %boundary, ?excess, "root exceeds its available rect");
            }

            if let Some(node) = tree.get_mut(boundary) {
                node.layout = Rect::new(available.x, available.y, width, height);
            }
        }

        self.arrange_subtree(tree, boundary, pass);
    }

    fn arrange_subtree(&self, tree: &mut UiTree, start: NodeId, pass: &mut PassState) {
        let mut stack = vec![start];

        while let Some(id) = stack.pop() {
            let Some(node) = tree.get(id) else {
                continue;
            };
            pass.metrics.nodes_laid_out += 1;

            let Some(policy) = node.widget.policy().copied() else {
                tree.clear_node_dirty(id);
                continue;
            };
            let size = node.layout.size();
            let (visible, hidden): (Vec<NodeId>, Vec<NodeId>) = node
                .children
                .iter()
                .copied()
                .partition(|c| tree.get(*c).is_some_and(|n| n.visible));

            // Hidden subtrees are re-arranged when shown again.
            for hidden_child in hidden {
                if let Ok(subtree) = tree.descendants(hidden_child) {
                    for hidden_id in subtree {
                        tree.clear_node_dirty(hidden_id);
                    }
                }
            }

            let constraints: Vec<SizeConstraint> = visible
                .iter()
                .map(|&child| self.measure(tree, child, &mut pass.measured))
                .collect();
            let arrangement = arrange_stack(&policy, size, &constraints, &self.config);

            pass.metrics.solver_iterations += arrangement.solve.iterations;
            if arrangement.solve.hit_iteration_cap {
                pass.metrics.capped_solves += 1;
                tracing::warn!(
                    node = %id,
                    iterations = arrangement.solve.iterations,
                    leftover = arrangement.solve.leftover,
                    "solver hit the iteration cap"
                );
            }

            for (&child, rect) in visible.iter().zip(&arrangement.rects) {
                if let Some(child_node) = tree.get_mut(child) {
                    child_node.layout = *rect;
                    child_node.clip = arrangement.clip;
                }
            }

            let before = pass.overflows.len();
            push_excess(&mut pass.overflows, id, arrangement.overflow, self.config.epsilon);
            if pass.overflows.len() > before {
                pass.metrics.overflow_count += 1;
                tracing::debug!(
                    node = %id,
                    overflow = ?arrangement.overflow,
                    "children overflow the content box"
                );
            }

            if let Some(node) = tree.get_mut(id) {
                node.overflow = arrangement.overflow;
            }
            tree.clear_node_dirty(id);

            stack.extend(visible.into_iter().rev());
        }
    }

    /// Effective constraint of a node: its own, raised to the natural size
    /// of its content when it fits its content.
    fn measure(
        &self,
        tree: &UiTree,
        id: NodeId,
        measured: &mut HashMap<NodeId, SizeConstraint>,
    ) -> SizeConstraint {
        if let Some(constraint) = measured.get(&id) {
            return *constraint;
        }
        let Some(node) = tree.get(id) else {
            return SizeConstraint::default();
        };

        let mut constraint = *node.widget.constraint();
        if let Some(policy) = node.widget.policy()
            && policy.fit_content
        {
            let children: Vec<SizeConstraint> = node
                .children
                .iter()
                .copied()
                .filter(|c| tree.get(*c).is_some_and(|n| n.visible))
                .map(|c| self.measure(tree, c, measured))
                .collect();
            let natural = natural_size(policy, &children);

            for axis in Axis::ALL {
                let preferred = constraint.preferred.along(axis).max(natural.along(axis));
                let minimum = constraint.minimum.along(axis).max(natural.along(axis));
                let maximum = constraint.maximum.along(axis).max(minimum);
                constraint.preferred.set_along(axis, preferred);
                constraint.minimum.set_along(axis, minimum);
                constraint.maximum.set_along(axis, maximum);
            }
        }

        measured.insert(id, constraint);
        constraint
    }
}

fn push_excess(out: &mut Vec<Overflow>, node: NodeId, excess: Size<f32>, epsilon: f32) {
    for axis in Axis::ALL {
        let amount = excess.along(axis);
        if amount > epsilon {
            out.push(Overflow { node, axis, amount });
        }
    }
}
