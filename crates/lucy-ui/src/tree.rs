//! Widget tree: ownership, layout roots, dirty tracking and hooks.

use std::fmt;

use indexmap::IndexMap;
use lucy_core::alloc::{HashMap, HashSet};
use lucy_core::geometry::{Pos, Rect, Size};
use lucy_core::profiling::profile_function;

use crate::constraint::SizeConstraint;
use crate::dirty::DirtyFlags;
use crate::error::{UiError, UiResult};
use crate::hook::{CallbackResult, ConnectionId, Hook, HookEvent};
use crate::policy::ContainerPolicy;
use crate::widgets::{Interaction, Widget};

/// Node identifier in the UI tree. Ids are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u64);

impl NodeId {
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Rect of a node relative to its parent's origin.
///
/// Roots are positioned relative to the screen, so for a root this is also
/// its absolute rect.
pub type LayoutRect = Rect<f32>;

/// A node in the UI tree.
pub struct UiNode {
    pub(crate) widget: Box<dyn Widget>,
    pub(crate) layout: LayoutRect,
    pub(crate) dirty_flags: DirtyFlags,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) visible: bool,
    pub(crate) hooks: HashMap<String, Hook>,
    /// Amount by which the children overflow the content box, per axis.
    pub(crate) overflow: Size<f32>,
    /// Clip rect in the parent's local space, set by clipping containers.
    pub(crate) clip: Option<LayoutRect>,
    /// Bumped every time the node is marked dirty.
    pub(crate) layout_version: u32,
}

impl UiNode {
    fn new(widget: Box<dyn Widget>) -> Self {
        Self {
            widget,
            layout: LayoutRect::ZERO,
            dirty_flags: DirtyFlags::CONSTRAINT,
            parent: None,
            children: Vec::new(),
            visible: true,
            hooks: HashMap::new(),
            overflow: Size::ZERO,
            clip: None,
            layout_version: 0,
        }
    }

    pub fn widget(&self) -> &dyn Widget {
        &*self.widget
    }

    pub fn layout(&self) -> LayoutRect {
        self.layout
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn overflow(&self) -> Size<f32> {
        self.overflow
    }

    pub fn dirty_flags(&self) -> DirtyFlags {
        self.dirty_flags
    }

    pub fn layout_version(&self) -> u32 {
        self.layout_version
    }
}

/// UI tree owning every widget.
///
/// Widgets are added detached; they take part in layout once they are either
/// registered as a root with [`UiTree::set_root`] or attached below one.
pub struct UiTree {
    nodes: IndexMap<NodeId, UiNode>,
    /// Registered roots and the screen rect each one is offered.
    roots: IndexMap<NodeId, LayoutRect>,
    next_id: u64,
    /// Nodes carrying dirty flags
    dirty_nodes: HashSet<NodeId>,
    /// Layout boundaries that need a pass
    dirty_roots: HashSet<NodeId>,
}

impl UiTree {
    pub fn new() -> Self {
        Self {
            nodes: IndexMap::new(),
            roots: IndexMap::new(),
            next_id: 0,
            dirty_nodes: HashSet::new(),
            dirty_roots: HashSet::new(),
        }
    }

    /// Add a detached widget to the tree and return its id.
    pub fn add_widget(&mut self, widget: Box<dyn Widget>) -> UiResult<NodeId> {
        widget.constraint().validate()?;
        if let Some(policy) = widget.policy() {
            policy.validate()?;
        }

        let node_id = NodeId(self.next_id);
        self.next_id += 1;

        tracing::trace!(node = %node_id, widget = widget.type_name(), "add widget");
        self.nodes.insert(node_id, UiNode::new(widget));
        self.mark_dirty(node_id, DirtyFlags::CONSTRAINT);
        Ok(node_id)
    }

    /// Shorthand for [`UiTree::add_widget`] with an unboxed widget.
    pub fn add(&mut self, widget: impl Widget) -> UiResult<NodeId> {
        self.add_widget(Box::new(widget))
    }

    /// Append `child` to the children of `parent`.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> UiResult<()> {
        let len = self.node(parent)?.children.len();
        self.insert_child(parent, len, child)
    }

    /// Insert `child` at `index` among the children of `parent`.
    pub fn insert_child(&mut self, parent: NodeId, index: usize, child: NodeId) -> UiResult<()> {
        let parent_node = self.node(parent)?;
        if parent_node.widget.policy().is_none() {
            return Err(UiError::NotAContainer(parent));
        }
        let len = parent_node.children.len();

        let child_node = self.node(child)?;
        if let Some(owner) = child_node.parent {
            return Err(UiError::AlreadyParented {
                child,
                parent: owner,
            });
        }
        if self.roots.contains_key(&child) {
            return Err(UiError::IsRoot(child));
        }
        if parent == child || self.is_ancestor(child, parent) {
            return Err(UiError::WouldCycle { parent, child });
        }
        if index > len {
            return Err(UiError::IndexOutOfBounds { parent, index, len });
        }

        if let Some(parent_node) = self.nodes.get_mut(&parent) {
            parent_node.children.insert(index, child);
        }
        if let Some(child_node) = self.nodes.get_mut(&child) {
            child_node.parent = Some(parent);
        }
        self.mark_dirty(parent, DirtyFlags::CHILDREN);
        Ok(())
    }

    /// Detach a node from its parent, or unregister it if it is a root.
    /// The subtree stays in the tree and can be attached again.
    pub fn detach(&mut self, node_id: NodeId) -> UiResult<()> {
        let parent = self.node(node_id)?.parent;
        if let Some(parent_id) = parent {
            if let Some(parent_node) = self.nodes.get_mut(&parent_id) {
                parent_node.children.retain(|&c| c != node_id);
            }
            if let Some(node) = self.nodes.get_mut(&node_id) {
                node.parent = None;
                node.clip = None;
            }
            self.mark_dirty(parent_id, DirtyFlags::CHILDREN);
        } else {
            self.unset_root(node_id);
        }
        Ok(())
    }

    /// Remove a node and its whole subtree. Returns the number of nodes removed.
    ///
    /// Hooks of removed nodes are dropped with them.
    pub fn remove(&mut self, node_id: NodeId) -> UiResult<usize> {
        profile_function!();
        self.detach(node_id)?;

        let subtree = self.descendants(node_id)?;
        for id in &subtree {
            self.nodes.shift_remove(id);
            self.roots.shift_remove(id);
            self.dirty_nodes.remove(id);
            self.dirty_roots.remove(id);
        }

        tracing::debug!(node = %node_id, removed = subtree.len(), "removed subtree");
        Ok(subtree.len())
    }

    /// Register `node_id` as a layout root offered `available` in screen space.
    ///
    /// Calling it again with a different rect updates the rect and schedules
    /// a layout pass for that root.
    pub fn set_root(&mut self, node_id: NodeId, available: LayoutRect) -> UiResult<()> {
        let node = self.node(node_id)?;
        if let Some(parent) = node.parent {
            return Err(UiError::AlreadyParented {
                child: node_id,
                parent,
            });
        }
        let valid = [available.x, available.y].iter().all(|v| v.is_finite())
            && [available.width, available.height]
                .iter()
                .all(|v| v.is_finite() && *v >= 0.0);
        if !valid {
            return Err(UiError::InvalidRect(available));
        }

        if self.roots.get(&node_id) == Some(&available) {
            return Ok(());
        }
        self.roots.insert(node_id, available);
        self.mark_dirty(node_id, DirtyFlags::ROOT_RECT);
        Ok(())
    }

    /// Unregister a root. Returns false if the node was not a root.
    pub fn unset_root(&mut self, node_id: NodeId) -> bool {
        self.roots.shift_remove(&node_id).is_some()
    }

    /// Registered roots in registration order with their available rects.
    pub fn roots(&self) -> impl Iterator<Item = (NodeId, LayoutRect)> + '_ {
        self.roots.iter().map(|(id, rect)| (*id, *rect))
    }

    pub fn root_rect(&self, node_id: NodeId) -> Option<LayoutRect> {
        self.roots.get(&node_id).copied()
    }

    pub fn is_root(&self, node_id: NodeId) -> bool {
        self.roots.contains_key(&node_id)
    }

    /// Top-most ancestor of a node (the node itself if it has no parent).
    pub fn root_of(&self, node_id: NodeId) -> UiResult<NodeId> {
        let mut current = node_id;
        while let Some(parent) = self.node(current)?.parent {
            current = parent;
        }
        Ok(current)
    }

    /// Whether the node is a root or is attached below a registered root.
    pub fn is_attached(&self, node_id: NodeId) -> bool {
        self.root_of(node_id)
            .is_ok_and(|root| self.roots.contains_key(&root))
    }

    pub fn contains(&self, node_id: NodeId) -> bool {
        self.nodes.contains_key(&node_id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn parent(&self, node_id: NodeId) -> UiResult<Option<NodeId>> {
        Ok(self.node(node_id)?.parent)
    }

    pub fn children(&self, node_id: NodeId) -> UiResult<&[NodeId]> {
        Ok(&self.node(node_id)?.children)
    }

    /// The node and all of its descendants in pre-order.
    pub fn descendants(&self, node_id: NodeId) -> UiResult<Vec<NodeId>> {
        self.node(node_id)?;
        let mut out = Vec::new();
        let mut stack = vec![node_id];
        while let Some(id) = stack.pop() {
            out.push(id);
            if let Some(node) = self.nodes.get(&id) {
                stack.extend(node.children.iter().rev().copied());
            }
        }
        Ok(out)
    }

    /// Visible nodes of a subtree in pre-order. Hidden nodes hide their
    /// descendants.
    pub fn visible_descendants(&self, node_id: NodeId) -> UiResult<Vec<NodeId>> {
        if !self.node(node_id)?.visible {
            return Ok(Vec::new());
        }
        let mut out = Vec::new();
        let mut stack = vec![node_id];
        while let Some(id) = stack.pop() {
            out.push(id);
            if let Some(node) = self.nodes.get(&id) {
                stack.extend(
                    node.children
                        .iter()
                        .rev()
                        .copied()
                        .filter(|c| self.nodes.get(c).is_some_and(|n| n.visible)),
                );
            }
        }
        Ok(out)
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &UiNode)> {
        self.nodes.iter().map(|(id, node)| (*id, node))
    }

    pub fn get(&self, node_id: NodeId) -> Option<&UiNode> {
        self.nodes.get(&node_id)
    }

    pub fn widget(&self, node_id: NodeId) -> UiResult<&dyn Widget> {
        Ok(&*self.node(node_id)?.widget)
    }

    /// Downcast the widget of a node.
    pub fn widget_as<T: Widget>(&self, node_id: NodeId) -> Option<&T> {
        self.nodes
            .get(&node_id)
            .and_then(|n| n.widget.as_any().downcast_ref::<T>())
    }

    /// Mutate a widget in place.
    ///
    /// Constraint and policy changes made by `f` are validated and marked
    /// dirty automatically. If either is invalid, both are rolled back and
    /// the error is reported.
    /// Returns `Ok(None)` if the widget is not a `T`.
    pub fn update_widget<T: Widget, R>(
        &mut self,
        node_id: NodeId,
        f: impl FnOnce(&mut T) -> R,
    ) -> UiResult<Option<R>> {
        let node = self
            .nodes
            .get_mut(&node_id)
            .ok_or(UiError::NodeNotFound(node_id))?;

        let old_constraint = *node.widget.constraint();
        let old_policy = node.widget.policy().copied();

        let Some(widget) = node.widget.as_any_mut().downcast_mut::<T>() else {
            return Ok(None);
        };
        let result = f(widget);

        let new_constraint = *node.widget.constraint();
        let new_policy = node.widget.policy().copied();

        let validated = new_constraint
            .validate()
            .map_err(UiError::from)
            .and_then(|()| new_policy.map_or(Ok(()), |policy| policy.validate()));
        if let Err(err) = validated {
            *node.widget.constraint_mut() = old_constraint;
            if let (Some(slot), Some(old)) = (node.widget.policy_mut(), old_policy) {
                *slot = old;
            }
            return Err(err);
        }

        let mut flags = DirtyFlags::NONE;
        if new_constraint != old_constraint {
            flags |= DirtyFlags::CONSTRAINT;
        }
        if new_policy != old_policy {
            flags |= policy_change_flags(old_policy, new_policy);
        }
        self.mark_dirty(node_id, flags);
        Ok(Some(result))
    }

    pub fn constraint(&self, node_id: NodeId) -> UiResult<SizeConstraint> {
        Ok(*self.node(node_id)?.widget.constraint())
    }

    /// Replace the size constraint of a node.
    pub fn set_constraint(&mut self, node_id: NodeId, constraint: SizeConstraint) -> UiResult<()> {
        constraint.validate()?;
        let node = self.node_mut(node_id)?;
        if *node.widget.constraint() == constraint {
            return Ok(());
        }
        *node.widget.constraint_mut() = constraint;
        self.mark_dirty(node_id, DirtyFlags::CONSTRAINT);
        Ok(())
    }

    pub fn update_constraint(
        &mut self,
        node_id: NodeId,
        f: impl FnOnce(&mut SizeConstraint),
    ) -> UiResult<()> {
        let mut constraint = self.constraint(node_id)?;
        f(&mut constraint);
        self.set_constraint(node_id, constraint)
    }

    pub fn policy(&self, node_id: NodeId) -> UiResult<Option<ContainerPolicy>> {
        Ok(self.node(node_id)?.widget.policy().copied())
    }

    /// Replace the policy of a container.
    pub fn set_policy(&mut self, node_id: NodeId, policy: ContainerPolicy) -> UiResult<()> {
        policy.validate()?;
        let node = self.node_mut(node_id)?;
        let slot = node
            .widget
            .policy_mut()
            .ok_or(UiError::NotAContainer(node_id))?;
        if *slot == policy {
            return Ok(());
        }
        let flags = policy_change_flags(Some(*slot), Some(policy));
        *slot = policy;
        self.mark_dirty(node_id, flags);
        Ok(())
    }

    pub fn update_policy(
        &mut self,
        node_id: NodeId,
        f: impl FnOnce(&mut ContainerPolicy),
    ) -> UiResult<()> {
        let mut policy = self
            .policy(node_id)?
            .ok_or(UiError::NotAContainer(node_id))?;
        f(&mut policy);
        self.set_policy(node_id, policy)
    }

    /// Show or hide a node. Hidden nodes take no space and are not hit.
    pub fn set_visible(&mut self, node_id: NodeId, visible: bool) -> UiResult<()> {
        let node = self.node_mut(node_id)?;
        if node.visible == visible {
            return Ok(());
        }
        node.visible = visible;
        self.mark_dirty(node_id, DirtyFlags::VISIBILITY);
        Ok(())
    }

    pub fn is_visible(&self, node_id: NodeId) -> UiResult<bool> {
        Ok(self.node(node_id)?.visible)
    }

    /// Local rect of a node from the last layout pass.
    pub fn layout(&self, node_id: NodeId) -> UiResult<LayoutRect> {
        Ok(self.node(node_id)?.layout)
    }

    /// Overflow of a container's children past its content box.
    pub fn overflow(&self, node_id: NodeId) -> UiResult<Size<f32>> {
        Ok(self.node(node_id)?.overflow)
    }

    /// Screen position: the sum of the local offsets along the ancestor chain.
    pub fn absolute_position(&self, node_id: NodeId) -> UiResult<Pos<f32>> {
        let mut node = self.node(node_id)?;
        let mut position = node.layout.position();
        while let Some(parent) = node.parent {
            node = self.node(parent)?;
            position = position + node.layout.position();
        }
        Ok(position)
    }

    pub fn absolute_rect(&self, node_id: NodeId) -> UiResult<LayoutRect> {
        let size = self.node(node_id)?.layout.size();
        Ok(Rect::from_parts(self.absolute_position(node_id)?, size))
    }

    /// Screen rect of a node after applying every ancestor clip.
    pub fn visible_rect(&self, node_id: NodeId) -> UiResult<LayoutRect> {
        let mut rect = self.absolute_rect(node_id)?;
        let mut current = self.node(node_id)?;
        while let Some(parent) = current.parent {
            if let Some(clip) = current.clip {
                let origin = self.absolute_position(parent)?;
                rect = rect.intersect(&clip.translate(origin));
            }
            current = self.node(parent)?;
        }
        Ok(rect)
    }

    /// Handle to a named hook of a node, created empty on first use.
    pub fn hook(&mut self, node_id: NodeId, name: &str) -> UiResult<Hook> {
        let node = self.node_mut(node_id)?;
        Ok(node.hooks.entry(name.to_string()).or_default().clone())
    }

    /// Connect a callback to a named hook of a node.
    pub fn connect<F>(&mut self, node_id: NodeId, name: &str, callback: F) -> UiResult<ConnectionId>
    where
        F: Fn(&HookEvent<'_>) -> CallbackResult + Send + Sync + 'static,
    {
        Ok(self.hook(node_id, name)?.connect(callback))
    }

    /// Disconnect a callback. Returns false if it was not connected.
    pub fn disconnect(&mut self, node_id: NodeId, name: &str, id: ConnectionId) -> UiResult<bool> {
        let node = self.node(node_id)?;
        Ok(node.hooks.get(name).is_some_and(|hook| hook.disconnect(id)))
    }

    /// Emit a named hook of a node with a bare event.
    pub fn fire(&self, node_id: NodeId, name: &str) -> UiResult<usize> {
        self.fire_event(node_id, &HookEvent::new(name).with_source(node_id))
    }

    /// Emit the hook named by `event.name`. Unknown hooks invoke nothing.
    pub fn fire_event(&self, node_id: NodeId, event: &HookEvent<'_>) -> UiResult<usize> {
        let node = self.node(node_id)?;
        let Some(hook) = node.hooks.get(event.name) else {
            return Ok(0);
        };
        Ok(hook.emit(event)?)
    }

    /// Forward an interaction state change to a widget.
    pub(crate) fn notify_interaction(&mut self, node_id: NodeId, interaction: Interaction) {
        if let Some(node) = self.nodes.get_mut(&node_id) {
            node.widget.on_interaction(interaction);
        }
    }

    /// Mark a node with dirty flags and schedule the nearest layout boundary.
    ///
    /// Changes that affect the parent's arrangement (constraint, visibility)
    /// start climbing at the parent. The climb stops at the first registered
    /// root or node whose size does not depend on its children.
    pub fn mark_dirty(&mut self, node_id: NodeId, flags: DirtyFlags) {
        profile_function!();

        if flags.is_empty() {
            return;
        }
        let Some(node) = self.nodes.get_mut(&node_id) else {
            return;
        };
        node.dirty_flags |= flags;
        node.layout_version = node.layout_version.wrapping_add(1);
        self.dirty_nodes.insert(node_id);

        let mut current = match node.parent {
            Some(parent) if flags.affects_parent() => parent,
            _ => node_id,
        };

        while let Some(node) = self.nodes.get(&current) {
            if self.is_layout_boundary(current, node) {
                break;
            }
            let Some(parent) = node.parent else {
                break;
            };
            current = parent;
        }

        self.dirty_roots.insert(current);
    }

    fn is_layout_boundary(&self, node_id: NodeId, node: &UiNode) -> bool {
        self.roots.contains_key(&node_id)
            || node.widget.policy().is_none_or(|policy| !policy.fit_content)
    }

    /// True if any layout boundary is waiting for a pass.
    pub fn is_dirty(&self) -> bool {
        !self.dirty_roots.is_empty()
    }

    /// Number of nodes currently carrying dirty flags.
    pub fn dirty_node_count(&self) -> usize {
        self.dirty_nodes.len()
    }

    pub fn has_layout_dirty(&self) -> bool {
        self.nodes.values().any(|n| n.dirty_flags.needs_layout())
    }

    /// Drain the pending layout boundaries.
    ///
    /// Keeps only the top-most ones attached to a registered root, sorted by
    /// id. Detached subtrees are picked up again once they are attached.
    /// Boundaries under a hidden node are dropped with their dirty flags;
    /// showing the node again re-arranges its whole subtree.
    pub(crate) fn take_dirty_roots(&mut self) -> Vec<NodeId> {
        let pending: HashSet<NodeId> = self.dirty_roots.drain().collect();
        let mut out = Vec::with_capacity(pending.len());
        let mut hidden = Vec::new();

        'pending: for &id in &pending {
            let Some(node) = self.nodes.get(&id) else {
                continue;
            };
            let mut top = id;
            let mut is_hidden = !node.visible;
            let mut current = node.parent;
            while let Some(parent) = current {
                if pending.contains(&parent) {
                    continue 'pending;
                }
                let Some(parent_node) = self.nodes.get(&parent) else {
                    break;
                };
                is_hidden |= !parent_node.visible;
                top = parent;
                current = parent_node.parent;
            }
            if !self.roots.contains_key(&top) {
                continue;
            }
            if is_hidden {
                hidden.push(id);
            } else {
                out.push(id);
            }
        }

        for id in hidden {
            tracing::trace!(node = %id, "skipping boundary under a hidden node");
            if let Ok(subtree) = self.descendants(id) {
                for hidden_id in subtree {
                    self.clear_node_dirty(hidden_id);
                }
            }
        }

        out.sort_unstable();
        out
    }

    pub(crate) fn clear_node_dirty(&mut self, node_id: NodeId) {
        if let Some(node) = self.nodes.get_mut(&node_id) {
            node.dirty_flags = DirtyFlags::NONE;
        }
        self.dirty_nodes.remove(&node_id);
    }

    /// Schedule every registered root for a full pass.
    pub(crate) fn mark_all_roots_dirty(&mut self) {
        let roots: Vec<NodeId> = self.roots.keys().copied().collect();
        for root in roots {
            self.mark_dirty(root, DirtyFlags::ROOT_RECT);
        }
    }

    fn is_ancestor(&self, ancestor: NodeId, node_id: NodeId) -> bool {
        let mut current = self.nodes.get(&node_id).and_then(|n| n.parent);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.nodes.get(&id).and_then(|n| n.parent);
        }
        false
    }

    pub(crate) fn node(&self, node_id: NodeId) -> UiResult<&UiNode> {
        self.nodes
            .get(&node_id)
            .ok_or(UiError::NodeNotFound(node_id))
    }

    pub(crate) fn get_mut(&mut self, node_id: NodeId) -> Option<&mut UiNode> {
        self.nodes.get_mut(&node_id)
    }

    pub(crate) fn node_mut(&mut self, node_id: NodeId) -> UiResult<&mut UiNode> {
        self.nodes
            .get_mut(&node_id)
            .ok_or(UiError::NodeNotFound(node_id))
    }

    /// Remove every node and root.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.roots.clear();
        self.dirty_nodes.clear();
        self.dirty_roots.clear();
    }
}

/// Flags for a policy change. A container that sizes to its content changes
/// its own footprint along with its arrangement.
fn policy_change_flags(old: Option<ContainerPolicy>, new: Option<ContainerPolicy>) -> DirtyFlags {
    let fits = |p: Option<ContainerPolicy>| p.is_some_and(|p| p.fit_content);
    if fits(old) || fits(new) {
        DirtyFlags::POLICY | DirtyFlags::CONSTRAINT
    } else {
        DirtyFlags::POLICY
    }
}

impl Default for UiTree {
    fn default() -> Self {
        Self::new()
    }
}
