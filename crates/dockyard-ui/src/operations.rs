//! Dock operations shared by the drop strategies.
//!
//! Every operation leaves the tree consistent (no dangling empty groups, no
//! group both docked and floating) and relies on the tree mutators to queue
//! the layout-changed notifications.

use crate::dnd::types::DragPayload;
use crate::floating::FloatingPanelManager;
use crate::tree::{DockTree, LayoutRect, NodeId};

/// Error types for dock operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DockError {
    /// Node not found in tree.
    NodeNotFound(NodeId),
    /// Node is not the expected kind.
    InvalidNodeKind {
        node: NodeId,
        found: &'static str,
    },
    /// Node is not a child of the given parent.
    NotAChild { parent: NodeId, child: NodeId },
    /// Node must be detached before it can be inserted.
    AlreadyAttached(NodeId),
    /// Index out of bounds or not applicable.
    InvalidIndex(usize),
    /// The layout engine rejected the tree.
    Layout(String),
    /// Snapshot could not be read or written.
    Serialization(String),
}

impl std::fmt::Display for DockError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DockError::NodeNotFound(id) => write!(f, "Node {:?} not found", id),
            DockError::InvalidNodeKind { node, found } => {
                write!(f, "Node {:?} has unexpected kind '{}'", node, found)
            }
            DockError::NotAChild { parent, child } => {
                write!(f, "Node {:?} is not a child of {:?}", child, parent)
            }
            DockError::AlreadyAttached(id) => write!(f, "Node {:?} is already attached", id),
            DockError::InvalidIndex(index) => write!(f, "Index {} is not valid here", index),
            DockError::Layout(msg) => write!(f, "Layout failed: {}", msg),
            DockError::Serialization(msg) => write!(f, "Snapshot error: {}", msg),
        }
    }
}

impl std::error::Error for DockError {}

/// Result type for dock operations.
pub type DockResult<T> = Result<T, DockError>;

/// Detach a panel group from wherever it lives (a column or the floating layer).
pub fn detach_group(
    tree: &mut DockTree,
    floating: &mut FloatingPanelManager,
    group: NodeId,
) -> DockResult<()> {
    if floating.remove_floating_panel(tree, group) {
        return Ok(());
    }
    if let Some(column) = tree.column_of(group) {
        tree.remove_panel_group(column, group)?;
    }
    Ok(())
}

/// Take a panel out of its group. A group left empty is removed entirely.
pub fn extract_panel(
    tree: &mut DockTree,
    floating: &mut FloatingPanelManager,
    panel: NodeId,
) -> DockResult<()> {
    let Some(group) = tree.group_of(panel) else {
        return Ok(());
    };
    if tree.remove_panel(group, panel)? {
        detach_group(tree, floating, group)?;
        tree.delete_subtree(group);
    }
    Ok(())
}

/// Dock the payload into `column` before the child at `index`.
///
/// A panel group moves as-is with its height reset so it can fill space. A
/// bare panel lands in a brand-new group, which is docked before the panel is
/// taken out of its old group so that the target position stays valid even if
/// the old group disappears. Returns the group that landed.
pub fn move_into_column(
    tree: &mut DockTree,
    floating: &mut FloatingPanelManager,
    payload: DragPayload,
    column: NodeId,
    index: Option<usize>,
) -> DockResult<NodeId> {
    match payload {
        DragPayload::PanelGroup(group) => {
            let mut index = index;
            if tree.column_of(group) == Some(column)
                && let (Some(target), Some(current)) = (index, tree.sibling_index(group))
                && current < target
            {
                index = Some(target - 1);
            }
            detach_group(tree, floating, group)?;
            tree.set_size(group, None);
            tree.add_panel_group(column, group, index)?;
            Ok(group)
        }
        DragPayload::Panel(panel) => {
            let group = tree.create_panel_group();
            tree.add_panel_group(column, group, index)?;
            extract_panel(tree, floating, panel)?;
            tree.add_panel(group, panel, None)?;
            Ok(group)
        }
        DragPayload::Window(window) => Err(DockError::InvalidNodeKind {
            node: window,
            found: "window",
        }),
    }
}

/// Merge the payload's panels into `target` as tabs before `index`.
pub fn merge_into_group(
    tree: &mut DockTree,
    floating: &mut FloatingPanelManager,
    payload: DragPayload,
    target: NodeId,
    index: Option<usize>,
) -> DockResult<()> {
    match payload {
        DragPayload::Panel(panel) => {
            let mut index = index;
            if tree.group_of(panel) == Some(target)
                && let (Some(slot), Some(current)) = (index, tree.sibling_index(panel))
                && current < slot
            {
                index = Some(slot - 1);
            }
            extract_panel(tree, floating, panel)?;
            tree.add_panel(target, panel, index)
        }
        DragPayload::PanelGroup(source) => {
            if source == target {
                return Err(DockError::InvalidIndex(index.unwrap_or(0)));
            }
            let mut slot = index;
            for panel in tree.panels(source) {
                tree.remove_panel(source, panel)?;
                tree.add_panel(target, panel, slot)?;
                slot = slot.map(|s| s + 1);
            }
            detach_group(tree, floating, source)?;
            tree.delete_subtree(source);
            Ok(())
        }
        DragPayload::Window(window) => Err(DockError::InvalidNodeKind {
            node: window,
            found: "window",
        }),
    }
}

/// Float the payload at `rect`. A bare panel is wrapped in a new group first.
pub fn float_payload(
    tree: &mut DockTree,
    floating: &mut FloatingPanelManager,
    payload: DragPayload,
    rect: LayoutRect,
) -> DockResult<NodeId> {
    let group = match payload {
        DragPayload::PanelGroup(group) => {
            if floating.is_floating(group) {
                floating.move_floating_panel(tree, group, rect.x, rect.y);
                floating.bring_to_front(group);
                return Ok(group);
            }
            detach_group(tree, floating, group)?;
            group
        }
        DragPayload::Panel(panel) => {
            let group = tree.create_panel_group();
            extract_panel(tree, floating, panel)?;
            tree.add_panel(group, panel, None)?;
            group
        }
        DragPayload::Window(window) => {
            return Err(DockError::InvalidNodeKind {
                node: window,
                found: "window",
            });
        }
    };
    floating.add_floating_panel(tree, group, rect)?;
    Ok(group)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixture {
        tree: DockTree,
        floating: FloatingPanelManager,
        column: NodeId,
        groups: Vec<NodeId>,
    }

    fn fixture(group_count: usize) -> Fixture {
        let mut tree = DockTree::default();
        let root = tree.root();
        let row = tree.create_row(root, None).unwrap();
        let column = tree.create_column(row, None).unwrap();
        let mut groups = Vec::new();
        for i in 0..group_count {
            let group = tree.create_panel_group();
            let panel = tree.create_panel(format!("Panel {}", i), 0.0);
            tree.add_panel(group, panel, None).unwrap();
            tree.add_panel_group(column, group, None).unwrap();
            groups.push(group);
        }
        Fixture {
            tree,
            floating: FloatingPanelManager::new(),
            column,
            groups,
        }
    }

    #[test]
    fn test_move_group_down_within_column() {
        let mut f = fixture(3);
        let (a, b, c) = (f.groups[0], f.groups[1], f.groups[2]);
        f.tree.set_size(a, Some(90.0));

        // Insert before index 2 (c) in pre-move terms.
        move_into_column(&mut f.tree, &mut f.floating, DragPayload::PanelGroup(a), f.column, Some(2))
            .unwrap();

        assert_eq!(f.tree.column_children(f.column), vec![b, a, c]);
        assert_eq!(f.tree.explicit_size(a), Some(None));
    }

    #[test]
    fn test_move_panel_creates_group() {
        let mut f = fixture(1);
        let source = f.groups[0];
        let extra = f.tree.create_panel("Extra", 0.0);
        f.tree.add_panel(source, extra, None).unwrap();

        let landed = move_into_column(&mut f.tree, &mut f.floating, DragPayload::Panel(extra), f.column, Some(0))
            .unwrap();

        assert_ne!(landed, source);
        assert_eq!(f.tree.column_children(f.column), vec![landed, source]);
        assert_eq!(f.tree.panels(landed), vec![extra]);
        assert_eq!(f.tree.panels(source).len(), 1);
    }

    #[test]
    fn test_extract_last_panel_removes_group() {
        let mut f = fixture(2);
        let source = f.groups[0];
        let panel = f.tree.panels(source)[0];

        extract_panel(&mut f.tree, &mut f.floating, panel).unwrap();

        assert!(!f.tree.contains(source));
        assert_eq!(f.tree.column_children(f.column), vec![f.groups[1]]);
        assert_eq!(f.tree.parent(panel), None);
    }

    #[test]
    fn test_merge_group_into_group() {
        let mut f = fixture(2);
        let (a, b) = (f.groups[0], f.groups[1]);
        let moved = f.tree.panels(a)[0];

        merge_into_group(&mut f.tree, &mut f.floating, DragPayload::PanelGroup(a), b, Some(0)).unwrap();

        assert!(!f.tree.contains(a));
        assert_eq!(f.tree.panels(b)[0], moved);
        assert_eq!(f.tree.column_children(f.column), vec![b]);
    }

    #[test]
    fn test_merge_group_into_itself_is_rejected() {
        let mut f = fixture(1);
        let a = f.groups[0];
        assert!(merge_into_group(&mut f.tree, &mut f.floating, DragPayload::PanelGroup(a), a, None).is_err());
        assert!(f.tree.contains(a));
    }

    #[test]
    fn test_float_and_redock() {
        let mut f = fixture(2);
        let a = f.groups[0];
        let rect = LayoutRect::new(10.0, 10.0, 200.0, 120.0);

        let floated = float_payload(&mut f.tree, &mut f.floating, DragPayload::PanelGroup(a), rect).unwrap();
        assert_eq!(floated, a);
        assert!(f.floating.is_floating(a));
        assert_eq!(f.tree.parent(a), None);
        assert_eq!(f.tree.panel_group(a).unwrap().floating, Some(rect));

        move_into_column(&mut f.tree, &mut f.floating, DragPayload::PanelGroup(a), f.column, None).unwrap();
        assert!(!f.floating.is_floating(a));
        assert_eq!(f.tree.panel_group(a).unwrap().floating, None);
        assert_eq!(f.tree.column_of(a), Some(f.column));
    }
}
