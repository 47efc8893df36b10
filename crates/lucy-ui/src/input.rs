//! Pointer routing: turns host pointer events into widget hooks.

use std::time::Instant;

use lucy_core::geometry::Pos;
use lucy_core::math::Vec2;
use lucy_core::profiling::profile_function;

use crate::config::InputConfig;
use crate::error::UiResult;
use crate::hook::{HookEvent, names};
use crate::tree::{LayoutRect, NodeId, UiTree};
use crate::widgets::Interaction;

/// Pointer button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
    Other(u16),
}

/// Abstract pointer event supplied by the host, in screen space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerMoved {
        position: Vec2,
    },
    PointerPressed {
        position: Vec2,
        button: PointerButton,
    },
    PointerReleased {
        position: Vec2,
        button: PointerButton,
    },
}

impl InputEvent {
    pub fn position(&self) -> Vec2 {
        match *self {
            InputEvent::PointerMoved { position }
            | InputEvent::PointerPressed { position, .. }
            | InputEvent::PointerReleased { position, .. } => position,
        }
    }
}

/// A hook fired while handling an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fired {
    pub node: NodeId,
    pub hook: &'static str,
}

/// Tracks hover, press and focus state across pointer events.
#[derive(Debug, Clone)]
pub struct InputRouter {
    config: InputConfig,
    /// Currently hovered node.
    hovered: Option<NodeId>,
    /// Node that received the last primary press, until release.
    pressed: Option<NodeId>,
    focused: Option<NodeId>,
    pointer: Vec2,
    /// Last primary press, for double click detection.
    last_press: Option<(NodeId, Instant)>,
}

impl InputRouter {
    pub fn new(config: InputConfig) -> Self {
        Self {
            config,
            hovered: None,
            pressed: None,
            focused: None,
            pointer: Vec2::ZERO,
            last_press: None,
        }
    }

    pub fn hovered(&self) -> Option<NodeId> {
        self.hovered
    }

    pub fn pressed(&self) -> Option<NodeId> {
        self.pressed
    }

    pub fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    pub fn pointer_position(&self) -> Vec2 {
        self.pointer
    }

    /// Handle one pointer event at time `now`.
    ///
    /// Returns the hooks fired, in firing order. The first failing callback
    /// aborts handling and its error is returned.
    pub fn handle_event(
        &mut self,
        tree: &mut UiTree,
        event: &InputEvent,
        now: Instant,
    ) -> UiResult<Vec<Fired>> {
        profile_function!();

        self.forget_removed(tree);
        self.pointer = event.position();

        let mut fired = Vec::new();
        self.update_hover(tree, &mut fired)?;

        match *event {
            InputEvent::PointerMoved { .. } => {}
            InputEvent::PointerPressed {
                button: PointerButton::Primary,
                ..
            } => self.handle_press(tree, now, &mut fired)?,
            InputEvent::PointerReleased {
                button: PointerButton::Primary,
                ..
            } => self.handle_release(tree, &mut fired)?,
            _ => {}
        }
        Ok(fired)
    }

    /// Move focus to `node` (or clear it), firing the focus hooks.
    pub fn set_focus(&mut self, tree: &mut UiTree, node: Option<NodeId>) -> UiResult<Vec<Fired>> {
        let mut fired = Vec::new();
        self.change_focus(tree, node, &mut fired)?;
        Ok(fired)
    }

    fn handle_press(
        &mut self,
        tree: &mut UiTree,
        now: Instant,
        fired: &mut Vec<Fired>,
    ) -> UiResult<()> {
        let Some(target) = self.hovered else {
            self.pressed = None;
            return self.change_focus(tree, None, fired);
        };

        let double = self.last_press.is_some_and(|(last, at)| {
            last == target && now.saturating_duration_since(at) <= self.config.double_click
        });
        // A double click consumes the press, so a third press starts over.
        self.last_press = if double { None } else { Some((target, now)) };
        self.pressed = Some(target);

        tree.notify_interaction(target, Interaction::Press);
        self.fire(tree, target, names::PRESSED, fired)?;
        if double {
            self.fire(tree, target, names::DOUBLE_CLICKED, fired)?;
        }
        Ok(())
    }

    fn handle_release(&mut self, tree: &mut UiTree, fired: &mut Vec<Fired>) -> UiResult<()> {
        let Some(target) = self.pressed.take() else {
            return Ok(());
        };

        tree.notify_interaction(target, Interaction::Release);
        self.fire(tree, target, names::RELEASED, fired)?;

        // Dragging off the widget before release cancels the click.
        if self.hovered == Some(target) {
            self.fire(tree, target, names::CLICKED, fired)?;
            self.change_focus(tree, Some(target), fired)?;
        }
        Ok(())
    }

    fn update_hover(&mut self, tree: &mut UiTree, fired: &mut Vec<Fired>) -> UiResult<()> {
        let hit = hit_test(tree, self.pointer);
        if hit == self.hovered {
            return Ok(());
        }

        let previous = std::mem::replace(&mut self.hovered, hit);
        if let Some(old) = previous {
            tree.notify_interaction(old, Interaction::HoverEnd);
            self.fire(tree, old, names::MOUSE_LEAVE, fired)?;
        }
        if let Some(new) = hit {
            tree.notify_interaction(new, Interaction::HoverStart);
            self.fire(tree, new, names::MOUSE_ENTER, fired)?;
        }
        Ok(())
    }

    fn change_focus(
        &mut self,
        tree: &mut UiTree,
        node: Option<NodeId>,
        fired: &mut Vec<Fired>,
    ) -> UiResult<()> {
        if self.focused == node {
            return Ok(());
        }

        let previous = std::mem::replace(&mut self.focused, node);
        if let Some(old) = previous {
            tree.notify_interaction(old, Interaction::Unfocus);
            self.fire(tree, old, names::UNFOCUSED, fired)?;
        }
        if let Some(new) = node {
            tree.notify_interaction(new, Interaction::Focus);
            self.fire(tree, new, names::FOCUSED, fired)?;
        }
        Ok(())
    }

    fn fire(
        &self,
        tree: &UiTree,
        node: NodeId,
        hook: &'static str,
        fired: &mut Vec<Fired>,
    ) -> UiResult<()> {
        tracing::trace!(node = %node, hook, "firing hook");
        let event = HookEvent::new(hook)
            .with_source(node)
            .with_pointer(self.pointer);
        tree.fire_event(node, &event)?;
        fired.push(Fired { node, hook });
        Ok(())
    }

    fn forget_removed(&mut self, tree: &UiTree) {
        let alive = |id: &NodeId| tree.contains(*id);
        self.hovered = self.hovered.filter(alive);
        self.pressed = self.pressed.filter(alive);
        self.focused = self.focused.filter(alive);
        self.last_press = self.last_press.filter(|(id, _)| alive(id));
    }
}

impl Default for InputRouter {
    fn default() -> Self {
        Self::new(InputConfig::default())
    }
}

/// Deepest visible interactive node under `point`.
///
/// Later roots are on top of earlier ones and later children on top of their
/// earlier siblings. Clip rects set by clipping containers are respected.
pub fn hit_test(tree: &UiTree, point: Vec2) -> Option<NodeId> {
    profile_function!();
    let point = Pos::from(point);
    let roots: Vec<NodeId> = tree.roots().map(|(id, _)| id).collect();
    roots
        .into_iter()
        .rev()
        .find_map(|root| hit_test_node(tree, root, point, Pos::ORIGIN, None))
}

fn hit_test_node(
    tree: &UiTree,
    node_id: NodeId,
    point: Pos<f32>,
    parent_origin: Pos<f32>,
    clip: Option<LayoutRect>,
) -> Option<NodeId> {
    let node = tree.get(node_id)?;
    if !node.is_visible() {
        return None;
    }

    let rect = node.layout().translate(parent_origin);
    let clip = match node.clip {
        Some(local) => {
            let absolute = local.translate(parent_origin);
            Some(clip.map_or(absolute, |outer| outer.intersect(&absolute)))
        }
        None => clip,
    };

    // Front-most children first
    for &child in node.children().iter().rev() {
        if let Some(hit) = hit_test_node(tree, child, point, rect.position(), clip) {
            return Some(hit);
        }
    }

    if !node.widget().is_interactive() {
        return None;
    }
    let visible = clip.map_or(rect, |c| rect.intersect(&c));
    let hit = visible.width > 0.0 && visible.height > 0.0 && visible.contains_point(point);
    hit.then_some(node_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::LayoutEngine;
    use crate::policy::{Alignment, OverflowPolicy};
    use crate::widgets::{Button, Container};
    use lucy_core::geometry::Rect;

    #[test]
    fn test_hit_test_respects_clip() {
        let mut tree = UiTree::new();
        let root = tree.add(Container::vertical()).unwrap();
        let clipper = tree
            .add(Container::vertical().with_constraint(
                crate::constraint::SizeConstraint::fixed(100.0, 20.0),
            ))
            .unwrap();
        tree.update_policy(clipper, |p| {
            p.overflow = OverflowPolicy::Clip;
            p.main_alignment = Alignment::Start;
            p.cross_alignment = Alignment::Start;
        })
        .unwrap();
        tree.update_policy(root, |p| {
            p.main_alignment = Alignment::Start;
            p.cross_alignment = Alignment::Start;
        })
        .unwrap();
        let button = tree.add(Button::new("tall")).unwrap();
        tree.add_child(root, clipper).unwrap();
        tree.add_child(clipper, button).unwrap();

        LayoutEngine::default()
            .layout(&mut tree, root, Rect::new(0.0, 0.0, 300.0, 300.0))
            .unwrap();

        // The button is 40 tall but its parent only shows the first 20.
        assert_eq!(hit_test(&tree, Vec2::new(10.0, 10.0)), Some(button));
        assert_eq!(hit_test(&tree, Vec2::new(10.0, 30.0)), None);
    }
}
