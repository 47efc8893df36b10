//! Declarative builder API for constructing UI trees.
//!
//! ```
//! use lucy_ui::builder::{ConstraintBuilder, UiBuilder};
//! use lucy_ui::constraint::SizeBehavior;
//! use lucy_ui::tree::UiTree;
//!
//! let mut tree = UiTree::new();
//! let mut ui = UiBuilder::new(&mut tree);
//! ui.vstack()
//!     .spacing(8.0)
//!     .padding(16.0)
//!     .children(|ui| {
//!         ui.button("Play").on("clicked", |_| Ok(())).build()?;
//!         ui.stretcher().build()?;
//!         ui.frame().size(200.0, 4.0).behavior(SizeBehavior::Flexible).build()?;
//!         Ok(())
//!     })
//!     .build()
//!     .unwrap();
//! let root = ui.finish();
//! assert!(root.is_some());
//! ```

use std::sync::Arc;

use lucy_core::geometry::Size;

use crate::constraint::{SizeBehavior, SizeConstraint};
use crate::error::{UiError, UiResult};
use crate::hook::{Callback, CallbackResult, HookEvent};
use crate::policy::{Alignment, ContainerPolicy, Distribution, OverflowPolicy};
use crate::tree::{NodeId, UiTree};
use crate::widgets::{Button, Container, Frame, Stretcher, Widget};

/// Builder for constructing UI trees declaratively.
pub struct UiBuilder<'a> {
    tree: &'a mut UiTree,
    root: Option<NodeId>,
    is_root_builder: bool,
    /// Nodes built directly by this builder, in order.
    built: Vec<NodeId>,
}

impl<'a> UiBuilder<'a> {
    /// Create a builder adding to `tree`. The first top-level widget built
    /// becomes the root.
    pub fn new(tree: &'a mut UiTree) -> Self {
        Self {
            tree,
            root: None,
            is_root_builder: true,
            built: Vec::new(),
        }
    }

    /// Vertical stack container.
    pub fn vstack(&mut self) -> ContainerBuilder<'_, 'a> {
        self.container(ContainerPolicy::vertical())
    }

    /// Horizontal stack container.
    pub fn hstack(&mut self) -> ContainerBuilder<'_, 'a> {
        self.container(ContainerPolicy::horizontal())
    }

    pub fn container(&mut self, policy: ContainerPolicy) -> ContainerBuilder<'_, 'a> {
        ContainerBuilder {
            builder: self,
            container: Container::new(policy),
            children: Vec::new(),
            hooks: Vec::new(),
            error: None,
        }
    }

    pub fn button(&mut self, label: impl Into<String>) -> LeafBuilder<'_, 'a, Button> {
        self.widget(Button::new(label))
    }

    pub fn frame(&mut self) -> LeafBuilder<'_, 'a, Frame> {
        self.widget(Frame::default())
    }

    pub fn stretcher(&mut self) -> LeafBuilder<'_, 'a, Stretcher> {
        self.widget(Stretcher::new())
    }

    /// Any widget without children.
    pub fn widget<W: Widget>(&mut self, widget: W) -> LeafBuilder<'_, 'a, W> {
        LeafBuilder {
            builder: self,
            widget,
            hooks: Vec::new(),
        }
    }

    /// The root, once a top-level widget was built.
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Top-level nodes built so far, in build order.
    pub fn built(&self) -> &[NodeId] {
        &self.built
    }

    /// Finish building and return the root.
    pub fn finish(self) -> Option<NodeId> {
        self.root
    }

    /// Remove every top-level node built so far, with its subtree.
    pub(crate) fn discard_built(&mut self) {
        let built = std::mem::take(&mut self.built);
        self.discard(&built);
        self.root = None;
    }

    /// Remove nodes left over from a failed build. Ids already removed with
    /// an earlier subtree are skipped.
    fn discard(&mut self, ids: &[NodeId]) {
        for &id in ids {
            if !self.tree.contains(id) {
                continue;
            }
            if let Err(err) = self.tree.remove(id) {
                tracing::warn!(node = %id, error = %err, "failed to discard node");
            }
        }
    }

    fn child_builder(&mut self) -> UiBuilder<'_> {
        UiBuilder {
            tree: self.tree,
            root: None,
            is_root_builder: false,
            built: Vec::new(),
        }
    }

    fn record(&mut self, node_id: NodeId) {
        if self.is_root_builder && self.root.is_none() {
            self.root = Some(node_id);
        }
        self.built.push(node_id);
    }

    fn connect_hooks(&mut self, node_id: NodeId, hooks: Vec<(String, Callback)>) -> UiResult<()> {
        for (name, callback) in hooks {
            self.tree.hook(node_id, &name)?.connect_shared(callback);
        }
        Ok(())
    }
}

/// Setters shared by every widget builder, acting on the size constraint.
pub trait ConstraintBuilder: Sized {
    fn constraint_mut(&mut self) -> &mut SizeConstraint;

    /// Replace the whole constraint.
    fn constraint(mut self, constraint: SizeConstraint) -> Self {
        *self.constraint_mut() = constraint;
        self
    }

    /// Preferred size.
    fn size(mut self, width: f32, height: f32) -> Self {
        self.constraint_mut().preferred = Size::new(width, height);
        self
    }

    fn width(mut self, width: f32) -> Self {
        self.constraint_mut().preferred.width = width;
        self
    }

    fn height(mut self, height: f32) -> Self {
        self.constraint_mut().preferred.height = height;
        self
    }

    /// Same behavior on both axes.
    fn behavior(mut self, behavior: SizeBehavior) -> Self {
        let constraint = self.constraint_mut();
        constraint.horizontal = behavior;
        constraint.vertical = behavior;
        self
    }

    fn horizontal(mut self, behavior: SizeBehavior) -> Self {
        self.constraint_mut().horizontal = behavior;
        self
    }

    fn vertical(mut self, behavior: SizeBehavior) -> Self {
        self.constraint_mut().vertical = behavior;
        self
    }

    fn min_size(mut self, width: f32, height: f32) -> Self {
        self.constraint_mut().minimum = Size::new(width, height);
        self
    }

    fn max_size(mut self, width: f32, height: f32) -> Self {
        self.constraint_mut().maximum = Size::new(width, height);
        self
    }

    fn grow_weight(mut self, weight: f32) -> Self {
        self.constraint_mut().grow_weight = weight;
        self
    }

    fn shrink_priority(mut self, priority: i32) -> Self {
        self.constraint_mut().shrink_priority = priority;
        self
    }
}

/// Builder for stack containers.
pub struct ContainerBuilder<'b, 'a> {
    builder: &'b mut UiBuilder<'a>,
    container: Container,
    children: Vec<NodeId>,
    hooks: Vec<(String, Callback)>,
    /// First error raised while building children
    error: Option<UiError>,
}

impl<'b, 'a> ContainerBuilder<'b, 'a> {
    /// Add children. Every widget built inside the closure becomes a child,
    /// in build order.
    pub fn children<F>(mut self, build_children: F) -> Self
    where
        F: FnOnce(&mut UiBuilder<'_>) -> UiResult<()>,
    {
        let mut child_builder = self.builder.child_builder();
        let result = build_children(&mut child_builder);
        let built = child_builder.built;
        match result {
            Ok(()) => self.children.extend(built),
            Err(err) => {
                self.builder.discard(&built);
                self.error.get_or_insert(err);
            }
        }
        self
    }

    /// Connect a callback to a hook of the container.
    pub fn on<F>(mut self, hook: &str, callback: F) -> Self
    where
        F: Fn(&HookEvent<'_>) -> CallbackResult + Send + Sync + 'static,
    {
        self.hooks.push((hook.to_string(), Arc::new(callback)));
        self
    }

    pub fn policy(mut self, policy: ContainerPolicy) -> Self {
        self.container.policy = policy;
        self
    }

    pub fn spacing(mut self, spacing: f32) -> Self {
        self.container.policy.spacing = spacing;
        self
    }

    pub fn padding(mut self, padding: f32) -> Self {
        self.container.policy.padding = padding;
        self
    }

    pub fn main_alignment(mut self, alignment: Alignment) -> Self {
        self.container.policy.main_alignment = alignment;
        self
    }

    pub fn cross_alignment(mut self, alignment: Alignment) -> Self {
        self.container.policy.cross_alignment = alignment;
        self
    }

    pub fn distribution(mut self, distribution: Distribution) -> Self {
        self.container.policy.distribution = distribution;
        self
    }

    pub fn overflow(mut self, overflow: OverflowPolicy) -> Self {
        self.container.policy.overflow = overflow;
        self
    }

    /// Size the container to fit its children.
    pub fn fit_content(mut self, fit: bool) -> Self {
        self.container.policy.fit_content = fit;
        self
    }

    /// Build the container and add it to the tree.
    ///
    /// On error nothing built for this container stays in the tree.
    pub fn build(self) -> UiResult<NodeId> {
        let ContainerBuilder {
            builder,
            container,
            children,
            hooks,
            error,
        } = self;

        if let Some(err) = error {
            builder.discard(&children);
            return Err(err);
        }
        let node_id = match builder.tree.add(container) {
            Ok(node_id) => node_id,
            Err(err) => {
                builder.discard(&children);
                return Err(err);
            }
        };

        let attached = children
            .iter()
            .try_for_each(|&child| builder.tree.add_child(node_id, child))
            .and_then(|()| builder.connect_hooks(node_id, hooks));
        if let Err(err) = attached {
            builder.discard(&[node_id]);
            builder.discard(&children);
            return Err(err);
        }

        builder.record(node_id);
        Ok(node_id)
    }
}

impl ConstraintBuilder for ContainerBuilder<'_, '_> {
    fn constraint_mut(&mut self) -> &mut SizeConstraint {
        &mut self.container.constraint
    }
}

/// Builder for widgets without children.
pub struct LeafBuilder<'b, 'a, W: Widget> {
    builder: &'b mut UiBuilder<'a>,
    widget: W,
    hooks: Vec<(String, Callback)>,
}

impl<'b, 'a, W: Widget> LeafBuilder<'b, 'a, W> {
    /// Connect a callback to a hook of the widget.
    pub fn on<F>(mut self, hook: &str, callback: F) -> Self
    where
        F: Fn(&HookEvent<'_>) -> CallbackResult + Send + Sync + 'static,
    {
        self.hooks.push((hook.to_string(), Arc::new(callback)));
        self
    }

    /// Build the widget and add it to the tree.
    pub fn build(self) -> UiResult<NodeId> {
        let node_id = self.builder.tree.add(self.widget)?;
        if let Err(err) = self.builder.connect_hooks(node_id, self.hooks) {
            self.builder.discard(&[node_id]);
            return Err(err);
        }
        self.builder.record(node_id);
        Ok(node_id)
    }
}

impl<W: Widget> ConstraintBuilder for LeafBuilder<'_, '_, W> {
    fn constraint_mut(&mut self) -> &mut SizeConstraint {
        self.widget.constraint_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_children_are_attached_in_order() {
        let mut tree = UiTree::new();
        let mut ui = UiBuilder::new(&mut tree);
        let mut ids = Vec::new();
        let root = ui
            .hstack()
            .children(|ui| {
                ids.push(ui.button("a").build()?);
                ids.push(ui.frame().build()?);
                Ok(())
            })
            .build()
            .unwrap();
        assert_eq!(ui.finish(), Some(root));

        assert_eq!(tree.children(root).unwrap(), ids.as_slice());
        assert_eq!(tree.parent(ids[0]).unwrap(), Some(root));
    }

    #[test]
    fn test_nested_children_stay_with_their_container() {
        let mut tree = UiTree::new();
        let mut ui = UiBuilder::new(&mut tree);
        let root = ui
            .vstack()
            .children(|ui| {
                ui.hstack()
                    .children(|ui| {
                        ui.frame().build()?;
                        ui.frame().build()?;
                        Ok(())
                    })
                    .build()?;
                ui.stretcher().build()?;
                Ok(())
            })
            .build()
            .unwrap();

        let top = tree.children(root).unwrap().to_vec();
        assert_eq!(top.len(), 2);
        assert_eq!(tree.children(top[0]).unwrap().len(), 2);
        assert_eq!(tree.len(), 5);
    }

    #[test]
    fn test_child_error_surfaces_on_build() {
        let mut tree = UiTree::new();
        let mut ui = UiBuilder::new(&mut tree);
        let result = ui
            .vstack()
            .children(|ui| {
                ui.frame().size(-1.0, 5.0).build()?;
                Ok(())
            })
            .build();
        assert!(matches!(result, Err(UiError::InvalidConstraint(_))));
    }

    #[test]
    fn test_failed_container_leaves_nothing_behind() {
        let mut tree = UiTree::new();
        let mut ui = UiBuilder::new(&mut tree);
        let result = ui
            .vstack()
            .padding(-5.0)
            .children(|ui| {
                ui.frame().build()?;
                ui.frame().build()?;
                Ok(())
            })
            .build();
        assert!(matches!(result, Err(UiError::InvalidPolicy(_))));
        assert_eq!(ui.finish(), None);
        assert!(tree.is_empty());
    }

    #[test]
    fn test_failed_child_discards_its_siblings() {
        let mut tree = UiTree::new();
        let mut ui = UiBuilder::new(&mut tree);
        let result = ui
            .vstack()
            .children(|ui| {
                ui.button("first").build()?;
                ui.hstack()
                    .children(|ui| {
                        ui.frame().build()?;
                        ui.stretcher().build()?;
                        Ok(())
                    })
                    .build()?;
                ui.hstack()
                    .children(|ui| {
                        ui.frame().build()?;
                        ui.frame().size(5.0, f32::NAN).build()?;
                        Ok(())
                    })
                    .build()?;
                Ok(())
            })
            .build();
        assert!(matches!(result, Err(UiError::InvalidConstraint(_))));
        assert!(tree.is_empty());
    }

    #[test]
    fn test_discard_built_removes_top_level_subtrees() {
        let mut tree = UiTree::new();
        let mut ui = UiBuilder::new(&mut tree);
        ui.hstack()
            .children(|ui| {
                ui.frame().build()?;
                Ok(())
            })
            .build()
            .unwrap();
        ui.button("second").build().unwrap();
        assert_eq!(ui.built().len(), 2);

        ui.discard_built();
        assert!(ui.built().is_empty());
        assert_eq!(ui.finish(), None);
        assert!(tree.is_empty());
    }

    #[test]
    fn test_constraint_setters_and_hooks() {
        let mut tree = UiTree::new();
        let mut ui = UiBuilder::new(&mut tree);
        let node = ui
            .frame()
            .size(30.0, 20.0)
            .behavior(SizeBehavior::Shrink)
            .min_size(10.0, 5.0)
            .shrink_priority(2)
            .on("clicked", |_| Ok(()))
            .build()
            .unwrap();

        let c = tree.constraint(node).unwrap();
        assert_eq!(c.preferred, Size::new(30.0, 20.0));
        assert_eq!(c.vertical, SizeBehavior::Shrink);
        assert_eq!(c.minimum, Size::new(10.0, 5.0));
        assert_eq!(c.shrink_priority, 2);
        assert_eq!(tree.fire(node, "clicked").unwrap(), 1);
    }
}
