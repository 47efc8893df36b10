//! Lucy UI - stack layout engine and hook dispatch over a widget tree
//!
//! This crate provides the render-agnostic half of a GUI library:
//! - A widget tree with ownership, layout roots and dirty tracking
//! - A constraint solver assigning screen rects to every widget
//! - Named per-widget hooks and pointer routing that fires them
//! - Tweens for animating values
//!
//! Drawing is left to the host, which reads the computed rects.
//!
//! ## Quick Start
//!
//! ```
//! use std::time::Instant;
//! use lucy_ui::{InputEvent, PointerButton, UiCore, Vec2};
//! use lucy_ui::builder::ConstraintBuilder;
//! use lucy_core::geometry::Rect;
//!
//! let mut ui = UiCore::new();
//! ui.set_viewport(Rect::new(0.0, 0.0, 800.0, 600.0)).unwrap();
//!
//! let mut button = None;
//! ui.build(|root| {
//!     root.vstack()
//!         .padding(20.0)
//!         .children(|stack| {
//!             button = Some(stack.button("Click Me").on("clicked", |_| Ok(())).build()?);
//!             stack.frame().size(200.0, 10.0).build()?;
//!             Ok(())
//!         })
//!         .build()?;
//!     Ok(())
//! })
//! .unwrap();
//!
//! ui.compute_layout();
//!
//! let rect = ui.tree().absolute_rect(button.unwrap()).unwrap();
//! let center = Vec2::new(rect.x + rect.width / 2.0, rect.y + rect.height / 2.0);
//! for event in [
//!     InputEvent::PointerPressed { position: center, button: PointerButton::Primary },
//!     InputEvent::PointerReleased { position: center, button: PointerButton::Primary },
//! ] {
//!     ui.handle_input(&event, Instant::now()).unwrap();
//! }
//! ```

pub mod animation;
pub mod builder;
pub mod config;
pub mod constraint;
pub mod dirty;
pub mod error;
pub mod hook;
pub mod input;
pub mod layout;
pub mod metrics;
pub mod policy;
pub mod solver;
pub mod stack;
pub mod tree;
pub mod widgets;

use std::time::Instant;

pub use animation::{Easing, RepeatMode, Tween};
pub use builder::{ConstraintBuilder, UiBuilder};
pub use config::{InputConfig, LayoutConfig, UiConfig};
pub use constraint::{SizeBehavior, SizeConstraint};
pub use dirty::DirtyFlags;
pub use error::{ConstraintError, HookError, UiError, UiResult};
pub use hook::{ConnectionId, Hook, HookEvent};
pub use input::{Fired, InputEvent, InputRouter, PointerButton};
pub use layout::{LayoutEngine, LayoutOutcome, LayoutReport, Overflow};
pub use metrics::LayoutMetrics;
pub use policy::{Alignment, ContainerPolicy, Distribution, OverflowPolicy};
pub use tree::{LayoutRect, NodeId, UiTree};
pub use widgets::{Button, Container, Frame, Stretcher, Widget};

// Re-export common types from dependencies
pub use lucy_core::math::Vec2;

/// Owns the tree, the layout engine and the input router.
///
/// Roots built through [`UiCore::build`] follow the viewport; other roots
/// can be registered on the tree directly with their own rect.
pub struct UiCore {
    tree: UiTree,
    engine: LayoutEngine,
    input: InputRouter,
    config: UiConfig,
    viewport: LayoutRect,
    viewport_roots: Vec<NodeId>,
}

impl UiCore {
    pub fn new() -> Self {
        Self::with_config(UiConfig::default())
    }

    pub fn with_config(config: UiConfig) -> Self {
        Self {
            tree: UiTree::new(),
            engine: LayoutEngine::new(config.layout),
            input: InputRouter::new(config.input),
            config,
            viewport: LayoutRect::new(0.0, 0.0, 800.0, 600.0),
            viewport_roots: Vec::new(),
        }
    }

    /// Build with the declarative builder. Every top-level widget is
    /// registered as a root covering the viewport, later ones on top, and
    /// the first is returned.
    ///
    /// If `build_fn` fails, the widgets it built are removed again.
    pub fn build<F>(&mut self, build_fn: F) -> UiResult<Option<NodeId>>
    where
        F: FnOnce(&mut UiBuilder<'_>) -> UiResult<()>,
    {
        let mut builder = UiBuilder::new(&mut self.tree);
        if let Err(err) = build_fn(&mut builder) {
            builder.discard_built();
            return Err(err);
        }
        let built = builder.built().to_vec();

        for &root in &built {
            self.tree.set_root(root, self.viewport)?;
            self.viewport_roots.push(root);
        }
        if built.len() > 1 {
            tracing::debug!(roots = built.len(), "registered several viewport roots");
        }
        Ok(built.first().copied())
    }

    /// Set the viewport rect and resize every root that follows it.
    pub fn set_viewport(&mut self, viewport: LayoutRect) -> UiResult<()> {
        self.viewport_roots.retain(|root| self.tree.is_root(*root));
        for &root in &self.viewport_roots {
            self.tree.set_root(root, viewport)?;
        }
        self.viewport = viewport;
        Ok(())
    }

    pub fn viewport(&self) -> LayoutRect {
        self.viewport
    }

    /// Bring the layout up to date, recomputing only dirty subtrees.
    pub fn compute_layout(&mut self) -> LayoutReport {
        self.engine.update(&mut self.tree)
    }

    /// Recompute the layout of every root from scratch.
    pub fn relayout_all(&mut self) -> LayoutReport {
        self.engine.relayout_all(&mut self.tree)
    }

    /// Up-to-date rects and overflow of one root's tree.
    pub fn layout(&mut self, root: NodeId) -> UiResult<LayoutOutcome> {
        let available = self.tree.root_rect(root).unwrap_or(self.viewport);
        self.engine.layout(&mut self.tree, root, available)
    }

    /// Route a pointer event, firing the affected hooks.
    pub fn handle_input(&mut self, event: &InputEvent, now: Instant) -> UiResult<Vec<Fired>> {
        self.input.handle_event(&mut self.tree, event, now)
    }

    pub fn tree(&self) -> &UiTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut UiTree {
        &mut self.tree
    }

    pub fn engine(&self) -> &LayoutEngine {
        &self.engine
    }

    pub fn input(&self) -> &InputRouter {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut InputRouter {
        &mut self.input
    }

    pub fn config(&self) -> &UiConfig {
        &self.config
    }
}

impl Default for UiCore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_registers_every_top_level_widget() {
        let mut ui = UiCore::new();
        let mut overlay = None;
        let first = ui
            .build(|root| {
                root.vstack().build()?;
                overlay = Some(root.frame().behavior(SizeBehavior::Flexible).build()?);
                Ok(())
            })
            .unwrap()
            .unwrap();
        let overlay = overlay.unwrap();

        assert!(ui.tree().is_root(first));
        assert!(ui.tree().is_root(overlay));
        assert_eq!(ui.tree().roots().count(), 2);

        ui.compute_layout();
        assert_eq!(ui.tree().layout(overlay).unwrap(), ui.viewport());

        let viewport = LayoutRect::new(0.0, 0.0, 320.0, 240.0);
        ui.set_viewport(viewport).unwrap();
        ui.compute_layout();
        assert_eq!(ui.tree().layout(first).unwrap(), viewport);
        assert_eq!(ui.tree().layout(overlay).unwrap(), viewport);
    }

    #[test]
    fn test_failed_build_removes_its_widgets() {
        let mut ui = UiCore::new();
        let result = ui.build(|root| {
            root.vstack()
                .children(|stack| {
                    stack.frame().build()?;
                    Ok(())
                })
                .build()?;
            root.frame().size(-3.0, 1.0).build()?;
            Ok(())
        });
        assert!(matches!(result, Err(UiError::InvalidConstraint(_))));
        assert!(ui.tree().is_empty());
        assert_eq!(ui.tree().roots().count(), 0);
    }
}
