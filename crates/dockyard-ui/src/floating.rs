//! Floating panel groups that live outside the row/column tree.

use crate::operations::{DockError, DockResult};
use crate::tree::{DockTree, LayoutRect, NodeId};

/// Z-ordered registry of floating panel groups.
///
/// The geometry itself lives on the group node; the manager only tracks
/// membership and stacking order (bottom-most first).
#[derive(Debug, Clone, Default)]
pub struct FloatingPanelManager {
    panels: Vec<NodeId>,
}

impl FloatingPanelManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Float a detached panel group at `rect`, on top of every other floating group.
    pub fn add_floating_panel(
        &mut self,
        tree: &mut DockTree,
        group: NodeId,
        rect: LayoutRect,
    ) -> DockResult<()> {
        if tree.panel_group(group).is_none() {
            return Err(DockError::NodeNotFound(group));
        }
        if tree.parent(group).is_some() {
            return Err(DockError::AlreadyAttached(group));
        }
        tree.set_floating(group, Some(rect));
        tree.set_size(group, None);
        tree.set_collapsed(group, false);
        self.panels.retain(|p| *p != group);
        self.panels.push(group);
        tracing::debug!(?group, x = rect.x, y = rect.y, "panel group floated");
        Ok(())
    }

    /// Forget a floating group and clear its floating geometry.
    ///
    /// Returns whether the group was floating.
    pub fn remove_floating_panel(&mut self, tree: &mut DockTree, group: NodeId) -> bool {
        let Some(position) = self.panels.iter().position(|p| *p == group) else {
            return false;
        };
        self.panels.remove(position);
        tree.set_floating(group, None);
        true
    }

    /// Move a floating group, keeping its size.
    pub fn move_floating_panel(&mut self, tree: &mut DockTree, group: NodeId, x: f32, y: f32) {
        if !self.is_floating(group) {
            return;
        }
        if let Some(rect) = tree.panel_group(group).and_then(|g| g.floating) {
            tree.set_floating(group, Some(LayoutRect { x, y, ..rect }));
        }
    }

    /// Raise a floating group above the others.
    pub fn bring_to_front(&mut self, group: NodeId) {
        if let Some(position) = self.panels.iter().position(|p| *p == group) {
            let group = self.panels.remove(position);
            self.panels.push(group);
        }
    }

    pub fn is_floating(&self, group: NodeId) -> bool {
        self.panels.contains(&group)
    }

    /// Floating groups, bottom-most first.
    pub fn floating_panels(&self) -> &[NodeId] {
        &self.panels
    }

    /// Drop entries whose nodes no longer exist.
    pub fn prune(&mut self, tree: &DockTree) {
        self.panels.retain(|p| tree.contains(*p));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stacking_order() {
        let mut tree = DockTree::default();
        let mut manager = FloatingPanelManager::new();
        let a = tree.create_panel_group();
        let b = tree.create_panel_group();
        let rect = LayoutRect::new(0.0, 0.0, 100.0, 100.0);

        manager.add_floating_panel(&mut tree, a, rect).unwrap();
        manager.add_floating_panel(&mut tree, b, rect).unwrap();
        assert_eq!(manager.floating_panels(), &[a, b]);

        manager.bring_to_front(a);
        assert_eq!(manager.floating_panels(), &[b, a]);
    }

    #[test]
    fn test_remove_clears_geometry() {
        let mut tree = DockTree::default();
        let mut manager = FloatingPanelManager::new();
        let a = tree.create_panel_group();
        manager
            .add_floating_panel(&mut tree, a, LayoutRect::new(5.0, 5.0, 50.0, 50.0))
            .unwrap();

        assert!(manager.remove_floating_panel(&mut tree, a));
        assert!(!manager.remove_floating_panel(&mut tree, a));
        assert_eq!(tree.panel_group(a).unwrap().floating, None);
    }

    #[test]
    fn test_move_keeps_size() {
        let mut tree = DockTree::default();
        let mut manager = FloatingPanelManager::new();
        let a = tree.create_panel_group();
        manager
            .add_floating_panel(&mut tree, a, LayoutRect::new(5.0, 5.0, 50.0, 70.0))
            .unwrap();

        manager.move_floating_panel(&mut tree, a, 40.0, 60.0);
        assert_eq!(
            tree.panel_group(a).unwrap().floating,
            Some(LayoutRect::new(40.0, 60.0, 50.0, 70.0))
        );
    }

    #[test]
    fn test_docked_group_cannot_float() {
        let mut tree = DockTree::default();
        let mut manager = FloatingPanelManager::new();
        let root = tree.root();
        let row = tree.create_row(root, None).unwrap();
        let column = tree.create_column(row, None).unwrap();
        let group = tree.create_panel_group();
        tree.add_panel_group(column, group, None).unwrap();

        assert_eq!(
            manager.add_floating_panel(&mut tree, group, LayoutRect::default()),
            Err(DockError::AlreadyAttached(group))
        );
    }
}
