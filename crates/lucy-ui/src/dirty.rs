//! Dirty flag tracking for incremental layout.

use bitflags::bitflags;

bitflags! {
    /// What changed on a node since the last layout pass.
    ///
    /// The flags decide where recomputation has to start: a change to a
    /// node's own size has to be resolved by its parent, a change to how a
    /// container arranges its children only by the container itself.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct DirtyFlags: u8 {
        /// No changes
        const NONE        = 0b0000_0000;

        /// Size constraint (preferred/min/max/behavior/weight/priority) changed
        const CONSTRAINT  = 0b0000_0001;

        /// Children were added, removed, or reordered
        const CHILDREN    = 0b0000_0010;

        /// Container policy (direction, alignment, spacing, ...) changed
        const POLICY      = 0b0000_0100;

        /// Visibility toggled
        const VISIBILITY  = 0b0000_1000;

        /// Available rect of a root changed
        const ROOT_RECT   = 0b0001_0000;
    }
}

impl DirtyFlags {
    /// Returns true if any flag requires a layout pass.
    #[inline]
    pub fn needs_layout(&self) -> bool {
        !self.is_empty()
    }

    /// Returns true if the change alters the node's own footprint, so the
    /// parent has to redistribute space among its children.
    #[inline]
    pub fn affects_parent(&self) -> bool {
        self.intersects(Self::CONSTRAINT | Self::VISIBILITY)
    }

    /// Returns true if only the node's descendants need re-arranging.
    #[inline]
    pub fn affects_children_only(&self) -> bool {
        !self.is_empty() && !self.affects_parent()
    }
}

impl Default for DirtyFlags {
    fn default() -> Self {
        Self::NONE
    }
}
