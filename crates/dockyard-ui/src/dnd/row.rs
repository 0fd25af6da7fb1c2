//! Drops between the columns of a row.

use super::geometry_cache::{Axis, GeometryCache};
use super::strategy::{DropContext, DropStrategy, targets_zone};
use super::types::{DragPoint, DraggedData, DropZone, GhostOrigin, Orientation};
use crate::operations::{DockResult, move_into_column};
use crate::tree::{DockTree, NodeId};

/// Moves a panel group (or a bare panel) into a new column at the
/// horizontal gap under the pointer.
#[derive(Debug, Default)]
pub struct RowDropStrategy {
    cache: GeometryCache,
    drop_index: Option<usize>,
    origin: Option<GhostOrigin>,
}

impl RowDropStrategy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drop_index(&self) -> Option<usize> {
        self.drop_index
    }

    fn populate(&mut self, tree: &DockTree, row: NodeId, data: &DraggedData) {
        let columns = tree.columns(row);
        self.cache.build(tree, &columns, Axis::Horizontal);

        self.origin = data
            .effective_group(tree)
            .and_then(|group| tree.column_of(group))
            .and_then(|column| {
                let original_index = columns.iter().position(|c| *c == column)?;
                Some(GhostOrigin {
                    original_index,
                    suppress: data.is_sole_occupant_of(tree, column),
                })
            });
    }

    fn apply(
        &self,
        cx: &mut DropContext<'_>,
        row: NodeId,
        index: usize,
        data: &DraggedData,
    ) -> DockResult<NodeId> {
        let column = cx.tree.create_column(row, Some(index))?;
        move_into_column(cx.tree, cx.floating, data.payload, column, None)
    }
}

impl DropStrategy for RowDropStrategy {
    fn on_drag_enter(
        &mut self,
        cx: &mut DropContext<'_>,
        _point: &DragPoint,
        zone: DropZone,
        data: &DraggedData,
    ) -> bool {
        if data.effective_group(cx.tree).is_none() || cx.tree.is_collapsed(zone.node) {
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
        if (self.cache.is_empty() || stale) && !cx.tree.columns(zone.node).is_empty() {
            self.populate(cx.tree, zone.node, data);
        }

        let (index, gap_found) = self.cache.find_gap(point.position.x);
        if self.origin.is_some_and(|origin| origin.is_noop_gap(index)) {
            tracing::trace!(index, "gap next to the origin column suppressed");
            cx.placeholder.hide(cx.tree);
            self.drop_index = None;
            return false;
        }
        self.drop_index = Some(index);

        let size_hint = data
            .effective_group(cx.tree)
            .map(|group| cx.tree.laid_out_extent(group, true))
            .filter(|w| *w > 0.0);
        let before = gap_found
            .then(|| self.cache.entry(index).map(|e| e.node))
            .flatten();
        cx.placeholder
            .show(cx.tree, zone, Orientation::Vertical, size_hint, zone.node, before);
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
        let index = index.min(cx.tree.columns(zone.node).len());
        match self.apply(cx, zone.node, index, data) {
            Ok(group) => {
                tracing::debug!(?group, index, "docked into new column");
                true
            }
            Err(err) => {
                tracing::warn!(%err, "row drop failed");
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
