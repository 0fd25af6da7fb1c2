//! Fine-grained dirty flag tracking for dock nodes.

use bitflags::bitflags;

bitflags! {
    /// What changed on a dock node since the flags were last cleared.
    ///
    /// The reconciler and the drag subsystem only set a flag when a value
    /// actually changes, so an empty set after a pass means the pass was a
    /// no-op for that node.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct DirtyFlags: u16 {
        /// No changes
        const NONE           = 0;

        /// Explicit size or collapsed state changed. Requires a layout pass.
        const LAYOUT         = 1 << 0;

        /// Children were added, removed, or reordered.
        const CHILDREN_ORDER = 1 << 1;

        /// The "fills remaining space" marker was toggled.
        const FILL_MARKER    = 1 << 2;

        /// Collapse button visibility or enablement changed.
        const CONTROLS       = 1 << 3;

        /// Minimum size constraint changed.
        const CONSTRAINTS    = 1 << 4;

        /// Resize handle decoration or last-column flag changed.
        const DECORATION     = 1 << 5;

        /// Absolute position changed (floating windows and panel groups).
        const POSITION       = 1 << 6;
    }
}

impl DirtyFlags {
    /// Flags that invalidate computed geometry.
    pub const LAYOUT_GROUP: Self = Self::LAYOUT
        .union(Self::CHILDREN_ORDER)
        .union(Self::FILL_MARKER)
        .union(Self::CONSTRAINTS)
        .union(Self::POSITION);

    /// Check if these flags require a new layout pass.
    pub fn needs_layout(&self) -> bool {
        self.intersects(Self::LAYOUT_GROUP)
    }

    /// Check if only presentational state (controls, decorations) changed.
    pub fn is_presentation_only(&self) -> bool {
        !self.is_empty() && !self.needs_layout()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_needs_nothing() {
        assert!(DirtyFlags::NONE.is_empty());
        assert!(!DirtyFlags::NONE.needs_layout());
        assert!(!DirtyFlags::NONE.is_presentation_only());
    }

    #[test]
    fn test_controls_are_presentation_only() {
        let flags = DirtyFlags::CONTROLS | DirtyFlags::DECORATION;
        assert!(!flags.needs_layout());
        assert!(flags.is_presentation_only());
    }

    #[test]
    fn test_fill_marker_needs_layout() {
        assert!(DirtyFlags::FILL_MARKER.needs_layout());
        assert!(!(DirtyFlags::FILL_MARKER | DirtyFlags::CONTROLS).is_presentation_only());
    }
}
