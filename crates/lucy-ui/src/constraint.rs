//! Per-widget size constraints.
//!
//! Every widget carries a [`SizeConstraint`]: a preferred size, optional
//! lower/upper bounds and a [`SizeBehavior`] per axis that tells the solver
//! whether the widget may deviate from its preferred size.

use lucy_core::geometry::{Axis, Size};

use crate::error::ConstraintError;

/// How a widget reacts when its parent has more or less space than the
/// children prefer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SizeBehavior {
    /// Always exactly the preferred size.
    #[default]
    Fixed,
    /// May grow beyond the preferred size (up to the maximum), never shrinks below it.
    Grow,
    /// May shrink below the preferred size (down to the minimum), never grows beyond it.
    Shrink,
    /// May grow or shrink within the minimum and maximum.
    Flexible,
}

impl SizeBehavior {
    #[inline]
    pub fn can_grow(self) -> bool {
        matches!(self, SizeBehavior::Grow | SizeBehavior::Flexible)
    }

    #[inline]
    pub fn can_shrink(self) -> bool {
        matches!(self, SizeBehavior::Shrink | SizeBehavior::Flexible)
    }

    /// Size this behavior settles on when offered `available` along one axis,
    /// independent of any siblings.
    pub fn resolve(self, preferred: f32, minimum: f32, maximum: f32, available: f32) -> f32 {
        match self {
            SizeBehavior::Fixed => preferred,
            SizeBehavior::Grow => preferred.max(available.min(maximum)),
            SizeBehavior::Shrink => preferred.min(available.max(minimum)),
            SizeBehavior::Flexible => available.max(minimum).min(maximum),
        }
    }
}

/// Size constraint of a single widget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeConstraint {
    pub preferred: Size<f32>,
    /// Lower bound for shrinking widgets. Zero means "no lower bound".
    pub minimum: Size<f32>,
    /// Upper bound for growing widgets. `f32::INFINITY` means unbounded.
    pub maximum: Size<f32>,
    pub horizontal: SizeBehavior,
    pub vertical: SizeBehavior,
    /// Relative share of surplus space among growing siblings.
    pub grow_weight: f32,
    /// Siblings with a lower priority give up space first when shrinking.
    pub shrink_priority: i32,
}

impl Default for SizeConstraint {
    fn default() -> Self {
        Self::fixed(10.0, 10.0)
    }
}

impl SizeConstraint {
    /// A constraint that always resolves to exactly `width` x `height`.
    pub fn fixed(width: f32, height: f32) -> Self {
        Self {
            preferred: Size::new(width, height),
            minimum: Size::ZERO,
            maximum: Size::new(f32::INFINITY, f32::INFINITY),
            horizontal: SizeBehavior::Fixed,
            vertical: SizeBehavior::Fixed,
            grow_weight: 1.0,
            shrink_priority: 0,
        }
    }

    /// Preferred size with the same behavior on both axes.
    pub fn new(width: f32, height: f32, behavior: SizeBehavior) -> Self {
        Self::fixed(width, height).with_behavior(behavior, behavior)
    }

    pub fn with_behavior(mut self, horizontal: SizeBehavior, vertical: SizeBehavior) -> Self {
        self.horizontal = horizontal;
        self.vertical = vertical;
        self
    }

    pub fn with_minimum(mut self, width: f32, height: f32) -> Self {
        self.minimum = Size::new(width, height);
        self
    }

    pub fn with_maximum(mut self, width: f32, height: f32) -> Self {
        self.maximum = Size::new(width, height);
        self
    }

    pub fn with_grow_weight(mut self, weight: f32) -> Self {
        self.grow_weight = weight;
        self
    }

    pub fn with_shrink_priority(mut self, priority: i32) -> Self {
        self.shrink_priority = priority;
        self
    }

    #[inline]
    pub fn behavior(&self, axis: Axis) -> SizeBehavior {
        match axis {
            Axis::Horizontal => self.horizontal,
            Axis::Vertical => self.vertical,
        }
    }

    pub fn set_behavior(&mut self, axis: Axis, behavior: SizeBehavior) {
        match axis {
            Axis::Horizontal => self.horizontal = behavior,
            Axis::Vertical => self.vertical = behavior,
        }
    }

    /// True when both axes are [`SizeBehavior::Fixed`].
    pub fn is_fixed(&self) -> bool {
        self.horizontal == SizeBehavior::Fixed && self.vertical == SizeBehavior::Fixed
    }

    /// Resolve the size along `axis` when offered `available`.
    pub fn resolve(&self, axis: Axis, available: f32) -> f32 {
        self.behavior(axis).resolve(
            self.preferred.along(axis),
            self.minimum.along(axis),
            self.maximum.along(axis),
            available,
        )
    }

    /// Check the constraint for values the solver cannot work with.
    pub fn validate(&self) -> Result<(), ConstraintError> {
        for axis in Axis::ALL {
            let preferred = self.preferred.along(axis);
            let minimum = self.minimum.along(axis);
            let maximum = self.maximum.along(axis);

            for (field, value) in [("preferred", preferred), ("minimum", minimum)] {
                if !value.is_finite() {
                    return Err(ConstraintError::NotFinite { axis, field });
                }
                if value < 0.0 {
                    return Err(ConstraintError::Negative { axis, field, value });
                }
            }
            if maximum.is_nan() {
                return Err(ConstraintError::NotFinite {
                    axis,
                    field: "maximum",
                });
            }
            if maximum < 0.0 {
                return Err(ConstraintError::Negative {
                    axis,
                    field: "maximum",
                    value: maximum,
                });
            }
            if minimum > maximum {
                return Err(ConstraintError::MinExceedsMax {
                    axis,
                    min: minimum,
                    max: maximum,
                });
            }
        }

        if !self.grow_weight.is_finite() || self.grow_weight < 0.0 {
            return Err(ConstraintError::InvalidWeight(self.grow_weight));
        }
        Ok(())
    }
}
