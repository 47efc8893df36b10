//! One-axis size solver.
//!
//! Starts every item at its preferred size and iteratively hands out the
//! difference to the available space among the items whose behavior allows
//! it, clamping at their bounds. Items that hit a bound drop out and the rest
//! of the difference is shared among the remaining ones in the next round.

use crate::constraint::SizeBehavior;

/// Input and output of the solver for a single child.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverItem {
    pub preferred: f32,
    pub minimum: f32,
    pub maximum: f32,
    pub behavior: SizeBehavior,
    pub grow_weight: f32,
    pub shrink_priority: i32,
    /// Solved size, written by [`solve_axis`].
    pub size: f32,
}

impl SolverItem {
    pub fn new(preferred: f32, behavior: SizeBehavior) -> Self {
        Self {
            preferred,
            minimum: 0.0,
            maximum: f32::INFINITY,
            behavior,
            grow_weight: 1.0,
            shrink_priority: 0,
            size: preferred,
        }
    }
}

/// Outcome of a solve.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SolveOutcome {
    /// Distribution rounds spent.
    pub iterations: u32,
    /// `available - sum(sizes)` after solving. Negative means the items
    /// could not shrink enough and overflow by that amount.
    pub leftover: f32,
    /// The iteration cap was hit before the difference was settled.
    pub hit_iteration_cap: bool,
}

impl SolveOutcome {
    pub fn overflow(&self, epsilon: f32) -> Option<f32> {
        (self.leftover < -epsilon).then_some(-self.leftover)
    }
}

/// Solve sizes for `items` so they fill `available` as closely as their
/// behaviors allow.
pub fn solve_axis(
    items: &mut [SolverItem],
    available: f32,
    epsilon: f32,
    max_iterations: u32,
) -> SolveOutcome {
    for item in items.iter_mut() {
        item.size = item.preferred;
    }

    let total: f32 = items.iter().map(|i| i.size).sum();
    let diff = available - total;
    let mut outcome = SolveOutcome {
        leftover: diff,
        ..Default::default()
    };

    if diff.abs() <= epsilon {
        return outcome;
    }

    let remaining = if diff > 0.0 {
        grow(items, diff, epsilon, max_iterations, &mut outcome)
    } else {
        -shrink(items, -diff, epsilon, max_iterations, &mut outcome)
    };
    outcome.leftover = remaining;
    outcome
}

fn grow(
    items: &mut [SolverItem],
    mut remaining: f32,
    epsilon: f32,
    max_iterations: u32,
    outcome: &mut SolveOutcome,
) -> f32 {
    let mut eligible: Vec<usize> = (0..items.len())
        .filter(|&i| {
            let item = &items[i];
            item.behavior.can_grow() && item.grow_weight > 0.0 && item.size < item.maximum
        })
        .collect();

    while remaining > epsilon && !eligible.is_empty() {
        if outcome.iterations >= max_iterations {
            outcome.hit_iteration_cap = true;
            break;
        }
        outcome.iterations += 1;

        let total_weight: f32 = eligible.iter().map(|&i| items[i].grow_weight).sum();
        let round = remaining;
        let mut used = 0.0;

        eligible.retain(|&i| {
            let item = &mut items[i];
            let share = round * item.grow_weight / total_weight;
            let proposed = (item.size + share).min(item.maximum);
            used += proposed - item.size;
            item.size = proposed;
            item.size < item.maximum
        });

        remaining -= used;
    }
    remaining
}

fn shrink(
    items: &mut [SolverItem],
    mut remaining: f32,
    epsilon: f32,
    max_iterations: u32,
    outcome: &mut SolveOutcome,
) -> f32 {
    let mut priorities: Vec<i32> = items
        .iter()
        .filter(|i| i.behavior.can_shrink())
        .map(|i| i.shrink_priority)
        .collect();
    priorities.sort_unstable();
    priorities.dedup();

    for priority in priorities {
        let mut eligible: Vec<usize> = (0..items.len())
            .filter(|&i| {
                let item = &items[i];
                item.behavior.can_shrink()
                    && item.shrink_priority == priority
                    && item.size > item.minimum
            })
            .collect();

        while remaining > epsilon && !eligible.is_empty() {
            if outcome.iterations >= max_iterations {
                outcome.hit_iteration_cap = true;
                return remaining;
            }
            outcome.iterations += 1;

            let share = remaining / eligible.len() as f32;
            let mut used = 0.0;

            eligible.retain(|&i| {
                let item = &mut items[i];
                let proposed = (item.size - share).max(item.minimum);
                used += item.size - proposed;
                item.size = proposed;
                item.size > item.minimum
            });

            remaining -= used;
        }

        if remaining <= epsilon {
            break;
        }
    }
    remaining
}
