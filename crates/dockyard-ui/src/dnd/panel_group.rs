//! Drops onto a panel group: merge as tabs.

use super::geometry_cache::{Axis, GeometryCache};
use super::strategy::{DropContext, DropStrategy};
use super::types::{DragPayload, DragPoint, DraggedData, DropZone, GhostOrigin, Orientation};
use crate::operations::merge_into_group;
use crate::tree::{DockTree, NodeId};

/// Merges a dragged panel, or every panel of a dragged group, into the
/// target group's tab list at the tab gap under the pointer.
#[derive(Debug, Default)]
pub struct PanelGroupDropStrategy {
    cache: GeometryCache,
    drop_index: Option<usize>,
    origin: Option<GhostOrigin>,
}

impl PanelGroupDropStrategy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drop_index(&self) -> Option<usize> {
        self.drop_index
    }

    fn accepts(tree: &DockTree, target: NodeId, data: &DraggedData) -> bool {
        match data.payload {
            DragPayload::PanelGroup(group) => group != target,
            // Merging a group's only panel back into it changes nothing.
            DragPayload::Panel(panel) => {
                tree.group_of(panel) != Some(target) || tree.panels(target).len() > 1
            }
            DragPayload::Window(_) => false,
        }
    }

    fn populate(&mut self, tree: &DockTree, target: NodeId, data: &DraggedData) {
        let panels = tree.panels(target);
        self.cache.build(tree, &panels, Axis::Horizontal);
        self.origin = match data.payload {
            DragPayload::Panel(panel) => panels
                .iter()
                .position(|p| *p == panel)
                .map(|original_index| GhostOrigin {
                    original_index,
                    suppress: true,
                }),
            _ => None,
        };
    }
}

impl DropStrategy for PanelGroupDropStrategy {
    fn on_drag_enter(
        &mut self,
        cx: &mut DropContext<'_>,
        _point: &DragPoint,
        zone: DropZone,
        data: &DraggedData,
    ) -> bool {
        if cx.tree.panel_group(zone.node).is_none() || !Self::accepts(cx.tree, zone.node, data) {
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
        // Tabs and the placeholder inside the group all count as the group.
        if !point
            .target
            .is_some_and(|target| cx.tree.is_ancestor_or_self(zone.node, target))
        {
            cx.placeholder.hide(cx.tree);
            self.drop_index = None;
            return false;
        }
        if self.cache.is_empty() || self.cache.is_stale(cx.tree) {
            self.populate(cx.tree, zone.node, data);
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
        let Some(index) = self.drop_index else {
            return false;
        };
        let index = index.min(cx.tree.panels(zone.node).len());
        match merge_into_group(cx.tree, cx.floating, data.payload, zone.node, Some(index)) {
            Ok(()) => {
                tracing::debug!(group = ?zone.node, index, "merged into panel group");
                true
            }
            Err(err) => {
                tracing::warn!(%err, "panel group drop failed");
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
