//! Window drops onto a viewport's tab bar.

use super::geometry_cache::{Axis, GeometryCache};
use super::strategy::{DropContext, DropStrategy};
use super::types::{DragPayload, DragPoint, DraggedData, DropZone, GhostOrigin, Orientation};
use crate::operations::DockResult;
use crate::tree::{DockTree, NodeId};

/// Docks a window as a tab, or reorders a tab, at the tab gap under the
/// pointer. Active once the viewport has at least one tabbed window.
#[derive(Debug, Default)]
pub struct TabStripDropStrategy {
    cache: GeometryCache,
    drop_index: Option<usize>,
    origin: Option<GhostOrigin>,
}

impl TabStripDropStrategy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drop_index(&self) -> Option<usize> {
        self.drop_index
    }

    fn populate(&mut self, tree: &DockTree, viewport: NodeId, window: NodeId) {
        let tabs = tree.viewport(viewport).map(|v| v.tabs.clone()).unwrap_or_default();
        self.cache.build(tree, &tabs, Axis::Horizontal);
        self.origin = tabs
            .iter()
            .position(|t| *t == window)
            .map(|original_index| GhostOrigin {
                original_index,
                suppress: true,
            });
    }

    fn in_tab_bar(tree: &DockTree, viewport: NodeId, point: &DragPoint) -> bool {
        let band = tree.config().tab_bar_height;
        tree.layout(viewport).is_some_and(|bounds| {
            bounds.contains(point.position) && point.position.y - bounds.y <= band
        })
    }

    fn apply(&self, tree: &mut DockTree, viewport: NodeId, window: NodeId, index: usize) -> DockResult<()> {
        if tree.viewport_of(window) != Some(viewport) {
            tree.transfer_window(window, viewport)?;
        }
        tree.dock_window(viewport, window, Some(index))
    }
}

impl DropStrategy for TabStripDropStrategy {
    fn on_drag_enter(
        &mut self,
        cx: &mut DropContext<'_>,
        _point: &DragPoint,
        zone: DropZone,
        data: &DraggedData,
    ) -> bool {
        let DragPayload::Window(window) = data.payload else {
            return false;
        };
        if !cx.tree.viewport(zone.node).is_some_and(|v| !v.tabs.is_empty()) {
            return false;
        }
        self.populate(cx.tree, zone.node, window);
        true
    }

    fn on_drag_over(
        &mut self,
        cx: &mut DropContext<'_>,
        point: &DragPoint,
        zone: DropZone,
        data: &DraggedData,
    ) -> bool {
        let DragPayload::Window(window) = data.payload else {
            return false;
        };
        if !Self::in_tab_bar(cx.tree, zone.node, point) {
            cx.placeholder.hide(cx.tree);
            self.drop_index = None;
            return false;
        }
        if self.cache.is_empty() || self.cache.is_stale(cx.tree) {
            self.populate(cx.tree, zone.node, window);
        }

        let (index, gap_found) = self.cache.find_gap(point.position.x);
        if self.origin.is_some_and(|origin| origin.is_noop_gap(index)) {
            cx.placeholder.hide(cx.tree);
            self.drop_index = None;
            return false;
        }
        self.drop_index = Some(index);

        let before = gap_found
            .then(|| self.cache.entry(index).map(|e| e.node))
            .flatten();
        cx.placeholder
            .show(cx.tree, zone, Orientation::Vertical, None, zone.node, before);
        true
    }

    fn on_drop(
        &mut self,
        cx: &mut DropContext<'_>,
        _point: &DragPoint,
        zone: DropZone,
        data: &DraggedData,
    ) -> bool {
        let (DragPayload::Window(window), Some(index)) = (data.payload, self.drop_index) else {
            return false;
        };
        match self.apply(cx.tree, zone.node, window, index) {
            Ok(()) => {
                tracing::debug!(?window, index, "window docked into tab strip");
                true
            }
            Err(err) => {
                tracing::warn!(%err, "tab strip drop failed");
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
