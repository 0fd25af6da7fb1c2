//! The drop strategy lifecycle: Enter, then Over any number of times, then
//! Drop or Leave.

use super::placeholder::Placeholder;
use super::types::{DragPoint, DraggedData, DropZone};
use crate::floating::FloatingPanelManager;
use crate::tree::DockTree;

/// Shared state handed to every strategy hook.
#[derive(Debug)]
pub struct DropContext<'a> {
    pub tree: &'a mut DockTree,
    pub placeholder: &'a mut Placeholder,
    pub floating: &'a mut FloatingPanelManager,
}

/// Whether the pointer is over the zone's own node or the placeholder.
///
/// Anything deeper belongs to a nested zone, which takes precedence.
pub fn targets_zone(tree: &DockTree, point: &DragPoint, zone: DropZone) -> bool {
    point.target == Some(zone.node) || point.target == Some(tree.placeholder_id())
}

/// Placement and mutation policy for one kind of drop zone.
///
/// Implementors override the `on_*` hooks; the default hooks decline
/// everything. The `handle_*` methods are what the drag-and-drop service
/// calls and bracket the hooks with placeholder and cache cleanup.
pub trait DropStrategy: std::fmt::Debug {
    /// Claim the drag and capture geometry. Returns whether the zone accepts it.
    fn on_drag_enter(
        &mut self,
        _cx: &mut DropContext<'_>,
        _point: &DragPoint,
        _zone: DropZone,
        _data: &DraggedData,
    ) -> bool {
        false
    }

    /// Update the drop index and placeholder. Returns whether a drop here is valid.
    fn on_drag_over(
        &mut self,
        _cx: &mut DropContext<'_>,
        _point: &DragPoint,
        _zone: DropZone,
        _data: &DraggedData,
    ) -> bool {
        false
    }

    fn on_drag_leave(
        &mut self,
        _cx: &mut DropContext<'_>,
        _point: &DragPoint,
        _zone: DropZone,
        _data: &DraggedData,
    ) {
    }

    /// Apply the drop. Runs before [`clear_cache`](Self::clear_cache).
    fn on_drop(
        &mut self,
        _cx: &mut DropContext<'_>,
        _point: &DragPoint,
        _zone: DropZone,
        _data: &DraggedData,
    ) -> bool {
        false
    }

    /// Forget cached geometry, the drop index and origin state.
    fn clear_cache(&mut self);

    fn handle_drag_enter(
        &mut self,
        cx: &mut DropContext<'_>,
        point: &DragPoint,
        zone: DropZone,
        data: &DraggedData,
    ) -> bool {
        self.on_drag_enter(cx, point, zone, data)
    }

    fn handle_drag_over(
        &mut self,
        cx: &mut DropContext<'_>,
        point: &DragPoint,
        zone: DropZone,
        data: &DraggedData,
    ) -> bool {
        self.on_drag_over(cx, point, zone, data)
    }

    fn handle_drag_leave(
        &mut self,
        cx: &mut DropContext<'_>,
        point: &DragPoint,
        zone: DropZone,
        data: &DraggedData,
    ) {
        cx.placeholder.hide(cx.tree);
        self.clear_cache();
        self.on_drag_leave(cx, point, zone, data);
    }

    fn handle_drop(
        &mut self,
        cx: &mut DropContext<'_>,
        point: &DragPoint,
        zone: DropZone,
        data: &DraggedData,
    ) -> bool {
        gated_drop(self, cx, point, zone, data)
    }
}

/// Drop only where a valid Over left the placeholder mounted.
///
/// The hook runs after the placeholder is hidden but before the cache is
/// cleared, so it still sees the drop index.
pub fn gated_drop<S: DropStrategy + ?Sized>(
    strategy: &mut S,
    cx: &mut DropContext<'_>,
    point: &DragPoint,
    zone: DropZone,
    data: &DraggedData,
) -> bool {
    if !cx.placeholder.is_mounted(cx.tree) {
        tracing::debug!(?zone, "drop rejected: placeholder not mounted");
        cx.placeholder.hide(cx.tree);
        strategy.clear_cache();
        return false;
    }
    cx.placeholder.hide(cx.tree);
    let dropped = strategy.on_drop(cx, point, zone, data);
    strategy.clear_cache();
    dropped
}

/// Drop without the placeholder gate, for zones that accept drops with
/// nothing mounted (floating placement).
pub fn ungated_drop<S: DropStrategy + ?Sized>(
    strategy: &mut S,
    cx: &mut DropContext<'_>,
    point: &DragPoint,
    zone: DropZone,
    data: &DraggedData,
) -> bool {
    cx.placeholder.hide(cx.tree);
    let dropped = strategy.on_drop(cx, point, zone, data);
    strategy.clear_cache();
    dropped
}
