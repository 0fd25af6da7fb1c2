//! Drops between the rows of a container.

use super::geometry_cache::{Axis, GeometryCache};
use super::strategy::{DropContext, DropStrategy, targets_zone};
use super::types::{DragPoint, DraggedData, DropZone, GhostOrigin, Orientation};
use crate::operations::{DockResult, move_into_column};
use crate::tree::{DockTree, NodeId};

/// Moves a panel group (or a bare panel) into a brand-new row + column at
/// the vertical gap under the pointer.
#[derive(Debug, Default)]
pub struct ContainerDropStrategy {
    cache: GeometryCache,
    drop_index: Option<usize>,
    origin: Option<GhostOrigin>,
}

impl ContainerDropStrategy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current drop index, if the last Over found a valid gap.
    pub fn drop_index(&self) -> Option<usize> {
        self.drop_index
    }

    fn populate(&mut self, tree: &DockTree, container: NodeId, data: &DraggedData) {
        let rows = tree.rows(container);
        self.cache.build(tree, &rows, Axis::Vertical);

        self.origin = data
            .effective_group(tree)
            .and_then(|group| tree.column_of(group))
            .and_then(|column| {
                let row = tree.row_of(column)?;
                let original_index = rows.iter().position(|r| *r == row)?;
                Some(GhostOrigin {
                    original_index,
                    suppress: tree.columns(row).len() == 1 && data.is_sole_occupant_of(tree, column),
                })
            });
    }

    fn apply(
        &self,
        cx: &mut DropContext<'_>,
        container: NodeId,
        index: usize,
        data: &DraggedData,
    ) -> DockResult<NodeId> {
        let row = cx.tree.create_row(container, Some(index))?;
        let column = cx.tree.create_column(row, None)?;
        move_into_column(cx.tree, cx.floating, data.payload, column, None)
    }
}

impl DropStrategy for ContainerDropStrategy {
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
        if (self.cache.is_empty() || stale) && !cx.tree.rows(zone.node).is_empty() {
            self.populate(cx.tree, zone.node, data);
        }

        let (index, gap_found) = self.cache.find_gap(point.position.y);
        if self.origin.is_some_and(|origin| origin.is_noop_gap(index)) {
            tracing::trace!(index, "gap next to the origin row suppressed");
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
        // Rows may have come and gone since the cache was built.
        let index = index.min(cx.tree.rows(zone.node).len());
        match self.apply(cx, zone.node, index, data) {
            Ok(group) => {
                tracing::debug!(?group, index, "docked into new row");
                true
            }
            Err(err) => {
                tracing::warn!(%err, "container drop failed");
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
