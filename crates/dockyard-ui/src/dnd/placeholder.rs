//! Single-owner arbiter for the shared drop placeholder.

use super::types::{DropZone, Orientation};
use crate::tree::{DockTree, NodeId};

/// Tracks which drop zone currently holds the placeholder node.
///
/// The node itself lives in the tree; only one zone may have it mounted at a
/// time. Showing it for a different zone forcibly releases the previous holder.
#[derive(Debug, Clone, Default)]
pub struct Placeholder {
    holder: Option<DropZone>,
}

impl Placeholder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mount the placeholder in `parent` before `before` (append on `None`).
    pub fn show(
        &mut self,
        tree: &mut DockTree,
        holder: DropZone,
        orientation: Orientation,
        size_hint: Option<f32>,
        parent: NodeId,
        before: Option<NodeId>,
    ) {
        if let Some(previous) = self.holder
            && previous != holder
        {
            tracing::trace!(?previous, ?holder, "placeholder taken over");
        }
        tree.mount_placeholder(parent, before, orientation, size_hint);
        self.holder = Some(holder);
    }

    /// Release and unmount the placeholder.
    pub fn hide(&mut self, tree: &mut DockTree) {
        tree.unmount_placeholder();
        self.holder = None;
    }

    /// Whether the placeholder node is attached to the tree.
    pub fn is_mounted(&self, tree: &DockTree) -> bool {
        tree.placeholder_mounted()
    }

    /// The zone currently holding the placeholder.
    pub fn holder(&self) -> Option<DropZone> {
        self.holder
    }

    pub fn node(&self, tree: &DockTree) -> NodeId {
        tree.placeholder_id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dnd::types::DropZoneKind;

    #[test]
    fn test_show_moves_between_holders() {
        let mut tree = DockTree::default();
        let root = tree.root();
        let row = tree.create_row(root, None).unwrap();
        let mut placeholder = Placeholder::new();

        let container_zone = DropZone::new(root, DropZoneKind::Container);
        let row_zone = DropZone::new(row, DropZoneKind::Row);

        placeholder.show(&mut tree, container_zone, Orientation::Horizontal, None, root, Some(row));
        assert!(placeholder.is_mounted(&tree));
        assert_eq!(tree.parent(tree.placeholder_id()), Some(root));

        placeholder.show(&mut tree, row_zone, Orientation::Vertical, Some(10.0), row, None);
        assert_eq!(placeholder.holder(), Some(row_zone));
        assert_eq!(tree.parent(tree.placeholder_id()), Some(row));
        assert_eq!(tree.children(root), &[row]);

        placeholder.hide(&mut tree);
        assert!(!placeholder.is_mounted(&tree));
        assert_eq!(placeholder.holder(), None);
    }
}
