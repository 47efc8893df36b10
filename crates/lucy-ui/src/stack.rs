//! Stack arrangement of a single container.
//!
//! Given a container's size, its policy and the effective constraints of its
//! visible children, computes each child's rect in the container's local
//! space. Recursion over the tree lives in [`crate::layout`].

use lucy_core::geometry::{Pos, Rect, Size};

use crate::config::LayoutConfig;
use crate::constraint::SizeConstraint;
use crate::policy::{Alignment, ContainerPolicy, Distribution, OverflowPolicy};
use crate::solver::{SolveOutcome, SolverItem, solve_axis};
use crate::tree::LayoutRect;

/// Result of arranging one container.
#[derive(Debug, Clone, PartialEq)]
pub struct StackArrangement {
    /// Child rects in container-local space, in child order.
    pub rects: Vec<LayoutRect>,
    /// How far the children extend past the content box, per axis.
    pub overflow: Size<f32>,
    /// Clip rect for the children when the container clips.
    pub clip: Option<LayoutRect>,
    pub solve: SolveOutcome,
}

/// Natural size of a container's content: children at their preferred size
/// plus spacing and padding.
pub fn natural_size(policy: &ContainerPolicy, children: &[SizeConstraint]) -> Size<f32> {
    let main_axis = policy.main_axis();
    let cross_axis = policy.cross_axis();

    let main: f32 = children
        .iter()
        .map(|c| c.preferred.along(main_axis))
        .sum::<f32>()
        + policy.total_spacing(children.len());
    let cross = children
        .iter()
        .map(|c| c.preferred.along(cross_axis))
        .fold(0.0, f32::max);

    let padding = 2.0 * policy.padding;
    Size::from_axes(main_axis, main + padding, cross + padding)
}

/// Arrange `children` inside a container of `size`.
pub fn arrange_stack(
    policy: &ContainerPolicy,
    size: Size<f32>,
    children: &[SizeConstraint],
    config: &LayoutConfig,
) -> StackArrangement {
    let main_axis = policy.main_axis();
    let cross_axis = policy.cross_axis();
    let eps = config.epsilon;

    let content = Rect::from_parts(Pos::ORIGIN, size).inset(policy.padding);
    let clip = (policy.overflow == OverflowPolicy::Clip).then_some(content);

    if children.is_empty() {
        return StackArrangement {
            rects: Vec::new(),
            overflow: Size::ZERO,
            clip,
            solve: SolveOutcome::default(),
        };
    }

    let count = children.len();
    let spacing_total = policy.total_spacing(count);
    let content_main = content.extent(main_axis);
    let content_cross = content.extent(cross_axis);

    // Main axis sizes
    let mut items: Vec<SolverItem> = children
        .iter()
        .map(|c| SolverItem {
            preferred: c.preferred.along(main_axis),
            minimum: c.minimum.along(main_axis),
            maximum: c.maximum.along(main_axis),
            behavior: c.behavior(main_axis),
            grow_weight: c.grow_weight,
            shrink_priority: c.shrink_priority,
            size: c.preferred.along(main_axis),
        })
        .collect();
    let solve = solve_axis(
        &mut items,
        content_main - spacing_total,
        eps,
        config.max_solver_iterations,
    );

    let used: f32 = items.iter().map(|i| i.size).sum::<f32>() + spacing_total;
    let free = content_main - used;

    // Main axis placement
    let (mut cursor, gap) = if free < -eps {
        (0.0, policy.spacing)
    } else {
        let free = free.max(0.0);
        match policy.main_alignment {
            Alignment::Start => (0.0, policy.spacing),
            Alignment::End => (free, policy.spacing),
            Alignment::Center => match policy.distribution {
                Distribution::Packed => (free / 2.0, policy.spacing),
                Distribution::SpaceBetween if count == 1 => (free / 2.0, policy.spacing),
                Distribution::SpaceBetween => {
                    (0.0, policy.spacing + free / (count - 1) as f32)
                }
                Distribution::SpaceAround => {
                    let share = free / (count + 1) as f32;
                    (share, policy.spacing + share)
                }
            },
        }
    };

    let mut rects = Vec::with_capacity(count);
    let mut widest_cross: f32 = 0.0;
    for (item, constraint) in items.iter().zip(children) {
        let cross = constraint.resolve(cross_axis, content_cross);
        widest_cross = widest_cross.max(cross);

        let cross_offset = if cross > content_cross + eps {
            0.0
        } else {
            match policy.cross_alignment {
                Alignment::Start => 0.0,
                Alignment::Center => (content_cross - cross) / 2.0,
                Alignment::End => content_cross - cross,
            }
        };

        let mut position = Pos::ORIGIN;
        position.set_along(main_axis, content.start(main_axis) + cursor);
        position.set_along(cross_axis, content.start(cross_axis) + cross_offset);
        rects.push(Rect::from_parts(
            position,
            Size::from_axes(main_axis, item.size, cross),
        ));

        cursor += item.size + gap;
    }

    let excess = |amount: f32| if amount > eps { amount } else { 0.0 };
    let overflow = Size::from_axes(
        main_axis,
        excess(used - content_main),
        excess(widest_cross - content_cross),
    );

    StackArrangement {
        rects,
        overflow,
        clip,
        solve,
    }
}
