//! Drops between the panel groups (and viewport) of a column.

use super::geometry_cache::{Axis, GeometryCache};
use super::strategy::{DropContext, DropStrategy, targets_zone};
use super::types::{DragPoint, DraggedData, DropZone, GhostOrigin, Orientation};
use crate::operations::move_into_column;
use crate::tree::{DockTree, NodeId};

/// Docks a panel group (or a bare panel in a new group) at the vertical gap
/// under the pointer.
#[derive(Debug, Default)]
pub struct ColumnDropStrategy {
    cache: GeometryCache,
    drop_index: Option<usize>,
    origin: Option<GhostOrigin>,
}

impl ColumnDropStrategy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drop_index(&self) -> Option<usize> {
        self.drop_index
    }

    fn populate(&mut self, tree: &DockTree, column: NodeId, data: &DraggedData) {
        let children = tree.column_children(column);
        self.cache.build(tree, &children, Axis::Vertical);

        // Moving the whole group next to itself within its own column is a no-op.
        self.origin = data
            .effective_group(tree)
            .filter(|group| tree.column_of(*group) == Some(column))
            .and_then(|group| {
                let original_index = children.iter().position(|c| *c == group)?;
                Some(GhostOrigin {
                    original_index,
                    suppress: data.moves_whole_group(tree),
                })
            });
    }
}

impl DropStrategy for ColumnDropStrategy {
    fn on_drag_enter(
        &mut self,
        cx: &mut DropContext<'_>,
        _point: &DragPoint,
        zone: DropZone,
        data: &DraggedData,
    ) -> bool {
        if data.effective_group(cx.tree).is_none() {
            return false;
        }
        self.populate(cx.tree, zone.node, data);
        true
    }

    fn on_drag_over(
        &mut self,
        cx: &mut DropContext<'_>,
        point: &DragPoint,
        zone: DropZone,
        data: &DraggedData,
    ) -> bool {
        if !targets_zone(cx.tree, point, zone) {
            cx.placeholder.hide(cx.tree);
            self.drop_index = None;
            return false;
        }
        let stale = self.cache.is_stale(cx.tree);
        if (self.cache.is_empty() || stale) && !cx.tree.column_children(zone.node).is_empty() {
            self.populate(cx.tree, zone.node, data);
        }

        let (index, gap_found) = self.cache.find_gap(point.position.y);
        if self.origin.is_some_and(|origin| origin.is_noop_gap(index)) {
            tracing::trace!(index, "gap next to the dragged group suppressed");
            cx.placeholder.hide(cx.tree);
            self.drop_index = None;
            return false;
        }
        self.drop_index = Some(index);

        let size_hint = data
            .effective_group(cx.tree)
            .map(|group| cx.tree.laid_out_extent(group, false))
            .filter(|h| *h > 0.0);
        let before = gap_found
            .then(|| self.cache.entry(index).map(|e| e.node))
            .flatten();
        cx.placeholder
            .show(cx.tree, zone, Orientation::Horizontal, size_hint, zone.node, before);
        true
    }

    fn on_drop(
        &mut self,
        cx: &mut DropContext<'_>,
        _point: &DragPoint,
        zone: DropZone,
        data: &DraggedData,
    ) -> bool {
        let Some(index) = self.drop_index else {
            return false;
        };
        let index = index.min(cx.tree.column_children(zone.node).len());
        match move_into_column(cx.tree, cx.floating, data.payload, zone.node, Some(index)) {
            Ok(group) => {
                tracing::debug!(?group, column = ?zone.node, index, "docked into column");
                true
            }
            Err(err) => {
                tracing::warn!(%err, "column drop failed");
                false
            }
        }
    }

    fn clear_cache(&mut self) {
        self.cache.clear();
        self.drop_index = None;
        self.origin = None;
    }
}
