//! Built-in widgets.
//!
//! Widgets carry layout inputs only; drawing is left to the host renderer,
//! which reads the rects produced by the layout engine.

use std::any::Any;

use crate::constraint::{SizeBehavior, SizeConstraint};
use crate::hook::names;
use crate::policy::ContainerPolicy;

/// Interaction state change reported by the input router.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Interaction {
    HoverStart,
    HoverEnd,
    Press,
    Release,
    Focus,
    Unfocus,
}

/// Base trait for all widgets in the tree.
pub trait Widget: Any {
    /// Short type name used in logs.
    fn type_name(&self) -> &'static str;

    fn constraint(&self) -> &SizeConstraint;

    fn constraint_mut(&mut self) -> &mut SizeConstraint;

    /// Arrangement policy. Only widgets that return `Some` may own children.
    fn policy(&self) -> Option<&ContainerPolicy> {
        None
    }

    fn policy_mut(&mut self) -> Option<&mut ContainerPolicy> {
        None
    }

    /// Whether the widget takes part in pointer hit testing.
    fn is_interactive(&self) -> bool {
        false
    }

    /// Hooks this widget fires on its own, for documentation and tooling.
    fn hook_names(&self) -> &'static [&'static str] {
        &[]
    }

    /// Update visual state after an interaction.
    fn on_interaction(&mut self, _interaction: Interaction) {}

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Stack container arranging its children along one axis.
#[derive(Debug, Clone, PartialEq)]
pub struct Container {
    pub constraint: SizeConstraint,
    pub policy: ContainerPolicy,
}

impl Container {
    /// A flexible container, sized by its parent.
    pub fn new(policy: ContainerPolicy) -> Self {
        Self {
            constraint: SizeConstraint::new(10.0, 10.0, SizeBehavior::Flexible),
            policy,
        }
    }

    pub fn vertical() -> Self {
        Self::new(ContainerPolicy::vertical())
    }

    pub fn horizontal() -> Self {
        Self::new(ContainerPolicy::horizontal())
    }

    pub fn with_constraint(mut self, constraint: SizeConstraint) -> Self {
        self.constraint = constraint;
        self
    }
}

impl Widget for Container {
    fn type_name(&self) -> &'static str {
        "Container"
    }

    fn constraint(&self) -> &SizeConstraint {
        &self.constraint
    }

    fn constraint_mut(&mut self) -> &mut SizeConstraint {
        &mut self.constraint
    }

    fn policy(&self) -> Option<&ContainerPolicy> {
        Some(&self.policy)
    }

    fn policy_mut(&mut self) -> Option<&mut ContainerPolicy> {
        Some(&mut self.policy)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Plain rectangular leaf. The host decides what to draw in it.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub constraint: SizeConstraint,
    pub interactive: bool,
}

impl Frame {
    pub fn new(constraint: SizeConstraint) -> Self {
        Self {
            constraint,
            interactive: true,
        }
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::new(SizeConstraint::default())
    }
}

impl Widget for Frame {
    fn type_name(&self) -> &'static str {
        "Frame"
    }

    fn constraint(&self) -> &SizeConstraint {
        &self.constraint
    }

    fn constraint_mut(&mut self) -> &mut SizeConstraint {
        &mut self.constraint
    }

    fn is_interactive(&self) -> bool {
        self.interactive
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Push button.
///
/// Hooks: `clicked`, `pressed`, `released`.
#[derive(Debug, Clone, PartialEq)]
pub struct Button {
    pub constraint: SizeConstraint,
    pub label: String,
    pub is_hovered: bool,
    pub is_pressed: bool,
    pub is_focused: bool,
}

impl Button {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            constraint: SizeConstraint::fixed(130.0, 40.0),
            label: label.into(),
            is_hovered: false,
            is_pressed: false,
            is_focused: false,
        }
    }

    /// Set the label. Returns true if it changed.
    pub fn set_label(&mut self, label: impl Into<String>) -> bool {
        let label = label.into();
        if self.label != label {
            self.label = label;
            true
        } else {
            false
        }
    }
}

impl Widget for Button {
    fn type_name(&self) -> &'static str {
        "Button"
    }

    fn constraint(&self) -> &SizeConstraint {
        &self.constraint
    }

    fn constraint_mut(&mut self) -> &mut SizeConstraint {
        &mut self.constraint
    }

    fn is_interactive(&self) -> bool {
        true
    }

    fn hook_names(&self) -> &'static [&'static str] {
        &[names::CLICKED, names::PRESSED, names::RELEASED]
    }

    fn on_interaction(&mut self, interaction: Interaction) {
        match interaction {
            Interaction::HoverStart => self.is_hovered = true,
            Interaction::HoverEnd => self.is_hovered = false,
            Interaction::Press => self.is_pressed = true,
            Interaction::Release => self.is_pressed = false,
            Interaction::Focus => self.is_focused = true,
            Interaction::Unfocus => self.is_focused = false,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Invisible leaf that soaks up free space, pushing its siblings apart.
#[derive(Debug, Clone, PartialEq)]
pub struct Stretcher {
    pub constraint: SizeConstraint,
}

impl Stretcher {
    pub fn new() -> Self {
        Self {
            constraint: SizeConstraint::new(0.0, 0.0, SizeBehavior::Grow),
        }
    }
}

impl Default for Stretcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Widget for Stretcher {
    fn type_name(&self) -> &'static str {
        "Stretcher"
    }

    fn constraint(&self) -> &SizeConstraint {
        &self.constraint
    }

    fn constraint_mut(&mut self) -> &mut SizeConstraint {
        &mut self.constraint
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_defaults() {
        let button = Button::new("OK");
        assert_eq!(button.constraint().preferred.width, 130.0);
        assert!(button.is_interactive());
        assert!(button.hook_names().contains(&"clicked"));
        assert!(button.policy().is_none());
    }

    #[test]
    fn test_button_interaction_state() {
        let mut button = Button::new("OK");
        button.on_interaction(Interaction::HoverStart);
        button.on_interaction(Interaction::Press);
        assert!(button.is_hovered && button.is_pressed);
        button.on_interaction(Interaction::Release);
        assert!(!button.is_pressed);
    }

    #[test]
    fn test_set_label_reports_change() {
        let mut button = Button::new("a");
        assert!(!button.set_label("a"));
        assert!(button.set_label("b"));
    }

    #[test]
    fn test_stretcher_grows_unbounded() {
        let s = Stretcher::new();
        assert!(s.constraint().horizontal.can_grow());
        assert!(s.constraint().maximum.width.is_infinite());
        assert!(!s.is_interactive());
    }

    #[test]
    fn test_container_downcast() {
        let boxed: Box<dyn Widget> = Box::new(Container::horizontal());
        assert!(boxed.as_any().downcast_ref::<Container>().is_some());
        assert!(boxed.policy().is_some());
    }
}
