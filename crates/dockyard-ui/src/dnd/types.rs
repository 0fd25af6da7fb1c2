//! Core types for drag-and-drop docking.

use dockyard_core::math::Vec2;

use crate::tree::{DockTree, NodeId};

/// Orientation of the drop placeholder bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// A horizontal bar between vertically stacked siblings.
    Horizontal,
    /// A vertical bar between horizontally stacked siblings (or tabs).
    Vertical,
}

/// The element being dragged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DragPayload {
    PanelGroup(NodeId),
    Panel(NodeId),
    Window(NodeId),
}

impl DragPayload {
    /// The dragged node itself.
    pub fn node(&self) -> NodeId {
        match self {
            DragPayload::PanelGroup(id) | DragPayload::Panel(id) | DragPayload::Window(id) => *id,
        }
    }

    pub fn is_window(&self) -> bool {
        matches!(self, DragPayload::Window(_))
    }
}

/// Payload plus where it was grabbed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DraggedData {
    pub payload: DragPayload,
    /// Pointer offset from the element's top-left corner at drag start.
    pub offset: Vec2,
}

impl DraggedData {
    pub fn new(payload: DragPayload, offset: Vec2) -> Self {
        Self { payload, offset }
    }

    /// The panel group the payload belongs to: the group itself, or the
    /// owning group of a panel. Windows have none.
    pub fn effective_group(&self, tree: &DockTree) -> Option<NodeId> {
        match self.payload {
            DragPayload::PanelGroup(group) => tree.panel_group(group).map(|_| group),
            DragPayload::Panel(panel) => tree.group_of(panel),
            DragPayload::Window(_) => None,
        }
    }

    /// Whether moving the payload out of its group would take the whole group
    /// with it.
    pub fn moves_whole_group(&self, tree: &DockTree) -> bool {
        match self.payload {
            DragPayload::PanelGroup(_) => true,
            DragPayload::Panel(panel) => tree
                .group_of(panel)
                .is_some_and(|group| tree.panels(group).len() == 1),
            DragPayload::Window(_) => false,
        }
    }

    /// Whether the payload is all that `column` holds, so removing it would
    /// empty the column.
    pub fn is_sole_occupant_of(&self, tree: &DockTree, column: NodeId) -> bool {
        self.effective_group(tree)
            .is_some_and(|group| tree.column_of(group) == Some(column))
            && tree.column_children(column).len() == 1
            && self.moves_whole_group(tree)
    }
}

/// A pointer sample during a drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragPoint {
    pub position: Vec2,
    /// Deepest node under the pointer, with the dragged element excluded.
    pub target: Option<NodeId>,
}

impl DragPoint {
    pub fn new(position: Vec2, target: Option<NodeId>) -> Self {
        Self { position, target }
    }
}

/// Kind of drop zone, one strategy per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DropZoneKind {
    /// Insert a new row between rows.
    Container,
    /// Insert a new column between columns.
    Row,
    /// Dock between the panel groups of a column.
    Column,
    /// Merge into a group as a tab.
    PanelGroup,
    /// Float or dock windows inside a viewport.
    Viewport,
    /// Reorder or insert viewport tabs.
    TabStrip,
    /// Float panels outside the docked tree.
    Undock,
}

/// A concrete drop target: a node plus the role it plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DropZone {
    pub node: NodeId,
    pub kind: DropZoneKind,
}

impl DropZone {
    pub fn new(node: NodeId, kind: DropZoneKind) -> Self {
        Self { node, kind }
    }
}

/// Where the payload sits among the zone's items before the drag.
///
/// Gaps directly before and after it would be a no-op move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GhostOrigin {
    pub original_index: usize,
    /// Whether the no-op gaps should be suppressed at all.
    pub suppress: bool,
}

impl GhostOrigin {
    /// Whether dropping at `index` would put the payload back where it was.
    pub fn is_noop_gap(&self, index: usize) -> bool {
        self.suppress && (index == self.original_index || index == self.original_index + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_group() {
        let mut tree = DockTree::default();
        let group = tree.create_panel_group();
        let panel = tree.create_panel("A", 0.0);
        tree.add_panel(group, panel, None).unwrap();

        let by_group = DraggedData::new(DragPayload::PanelGroup(group), Vec2::ZERO);
        let by_panel = DraggedData::new(DragPayload::Panel(panel), Vec2::ZERO);
        let window = DraggedData::new(DragPayload::Window(NodeId(999)), Vec2::ZERO);

        assert_eq!(by_group.effective_group(&tree), Some(group));
        assert_eq!(by_panel.effective_group(&tree), Some(group));
        assert_eq!(window.effective_group(&tree), None);
        assert!(by_panel.moves_whole_group(&tree));
    }

    #[test]
    fn test_noop_gaps() {
        let origin = GhostOrigin {
            original_index: 2,
            suppress: true,
        };
        assert!(!origin.is_noop_gap(1));
        assert!(origin.is_noop_gap(2));
        assert!(origin.is_noop_gap(3));
        assert!(!origin.is_noop_gap(4));

        let off = GhostOrigin {
            suppress: false,
            ..origin
        };
        assert!(!off.is_noop_gap(2));
    }
}
