//! Container arrangement policy.

use lucy_core::geometry::Axis;

use crate::error::{UiError, UiResult};

/// Placement of children along an axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Alignment {
    /// Top in the vertical axis, left in the horizontal axis.
    Start,
    #[default]
    Center,
    /// Bottom in the vertical axis, right in the horizontal axis.
    End,
}

/// How free main-axis space is spread when children are center-aligned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Distribution {
    /// Children stay together and the group is centered.
    Packed,
    /// Even gaps between children, none at the edges.
    SpaceBetween,
    /// Even gaps between children and at both edges.
    #[default]
    SpaceAround,
}

/// What happens to children that do not fit the content box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OverflowPolicy {
    /// Children keep their rects and extend past the container.
    #[default]
    Visible,
    /// Children keep their rects but are clipped to the content box for
    /// hit testing and rendering.
    Clip,
}

/// Arrangement rules a container applies to its children.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContainerPolicy {
    /// Main (stacking) axis.
    pub direction: Axis,
    pub main_alignment: Alignment,
    pub cross_alignment: Alignment,
    pub distribution: Distribution,
    /// Gap between consecutive children along the main axis.
    pub spacing: f32,
    /// Uniform inset between the container edge and its content box.
    pub padding: f32,
    pub overflow: OverflowPolicy,
    /// Raise the container's effective size to fit its children.
    pub fit_content: bool,
}

impl Default for ContainerPolicy {
    fn default() -> Self {
        Self::stack(Axis::Vertical)
    }
}

impl ContainerPolicy {
    pub fn stack(direction: Axis) -> Self {
        Self {
            direction,
            main_alignment: Alignment::Center,
            cross_alignment: Alignment::Center,
            distribution: Distribution::SpaceAround,
            spacing: 0.0,
            padding: 0.0,
            overflow: OverflowPolicy::Visible,
            fit_content: false,
        }
    }

    pub fn vertical() -> Self {
        Self::stack(Axis::Vertical)
    }

    pub fn horizontal() -> Self {
        Self::stack(Axis::Horizontal)
    }

    #[inline]
    pub fn main_axis(&self) -> Axis {
        self.direction
    }

    #[inline]
    pub fn cross_axis(&self) -> Axis {
        self.direction.cross()
    }

    /// Total spacing consumed by `count` children.
    #[inline]
    pub fn total_spacing(&self, count: usize) -> f32 {
        self.spacing * count.saturating_sub(1) as f32
    }

    pub fn validate(&self) -> UiResult<()> {
        if !self.spacing.is_finite() || self.spacing < 0.0 {
            return Err(UiError::InvalidPolicy(format!(
                "spacing must be finite and non-negative, got {}",
                self.spacing
            )));
        }
        if !self.padding.is_finite() || self.padding < 0.0 {
            return Err(UiError::InvalidPolicy(format!(
                "padding must be finite and non-negative, got {}",
                self.padding
            )));
        }
        Ok(())
    }
}
