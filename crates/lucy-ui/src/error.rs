//! Error types for tree mutation, constraint validation and hook dispatch.

use lucy_core::geometry::{Axis, Rect};
use thiserror::Error;

use crate::tree::NodeId;

/// Boxed error returned by hook callbacks.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A size constraint that cannot be satisfied by construction.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConstraintError {
    #[error("{field} on the {axis:?} axis is not finite")]
    NotFinite { axis: Axis, field: &'static str },
    #[error("{field} on the {axis:?} axis is negative ({value})")]
    Negative {
        axis: Axis,
        field: &'static str,
        value: f32,
    },
    #[error("minimum {min} exceeds maximum {max} on the {axis:?} axis")]
    MinExceedsMax { axis: Axis, min: f32, max: f32 },
    #[error("grow weight must be finite and non-negative, got {0}")]
    InvalidWeight(f32),
}

/// Failure raised while emitting a hook.
#[derive(Debug, Error)]
pub enum HookError {
    #[error("callback #{index} on hook `{hook}` failed: {source}")]
    CallbackFailed {
        hook: String,
        index: usize,
        #[source]
        source: BoxError,
    },
}

/// Errors produced by [`UiTree`](crate::tree::UiTree) operations.
#[derive(Debug, Error)]
pub enum UiError {
    #[error("node {0} not found")]
    NodeNotFound(NodeId),
    #[error("node {0} is not a container and cannot hold children")]
    NotAContainer(NodeId),
    #[error("node {child} is already owned by {parent}")]
    AlreadyParented { child: NodeId, parent: NodeId },
    #[error("node {0} is a layout root")]
    IsRoot(NodeId),
    #[error("attaching {child} under {parent} would create a cycle")]
    WouldCycle { parent: NodeId, child: NodeId },
    #[error("child index {index} out of bounds for {parent} with {len} children")]
    IndexOutOfBounds {
        parent: NodeId,
        index: usize,
        len: usize,
    },
    #[error("invalid constraint: {0}")]
    InvalidConstraint(#[from] ConstraintError),
    #[error("invalid container policy: {0}")]
    InvalidPolicy(String),
    #[error("invalid available rect {0:?}")]
    InvalidRect(Rect<f32>),
    #[error(transparent)]
    Hook(#[from] HookError),
}

/// Result type for UI operations.
pub type UiResult<T> = Result<T, UiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_hook_error_keeps_source() {
        let err = HookError::CallbackFailed {
            hook: "clicked".into(),
            index: 2,
            source: "boom".into(),
        };
        assert_eq!(err.to_string(), "callback #2 on hook `clicked` failed: boom");
        assert_eq!(err.source().map(|s| s.to_string()), Some("boom".to_string()));

        let ui: UiError = err.into();
        assert!(matches!(ui, UiError::Hook(HookError::CallbackFailed { index: 2, .. })));
    }

    #[test]
    fn test_constraint_error_display() {
        let err = ConstraintError::MinExceedsMax {
            axis: Axis::Vertical,
            min: 20.0,
            max: 10.0,
        };
        assert_eq!(
            err.to_string(),
            "minimum 20 exceeds maximum 10 on the Vertical axis"
        );
    }
}
