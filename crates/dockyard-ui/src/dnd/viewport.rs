//! Window drops inside a viewport: float anywhere, or dock the first tab.

use super::strategy::{DropContext, DropStrategy, gated_drop, ungated_drop};
use super::types::{DragPayload, DragPoint, DraggedData, DropZone, Orientation};
use crate::operations::DockResult;
use crate::tree::{DockTree, NodeId};

/// Floating windows move freely. While no window is tabbed, the band at the
/// top of the viewport docks the dragged window as the first tab.
#[derive(Debug, Default)]
pub struct ViewportDropStrategy {
    is_docking: bool,
}

impl ViewportDropStrategy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the current drag would dock rather than float.
    pub fn is_docking(&self) -> bool {
        self.is_docking
    }

    fn stop_docking(&mut self, cx: &mut DropContext<'_>) {
        self.is_docking = false;
        cx.placeholder.hide(cx.tree);
    }

    /// Window position relative to the viewport, clamped so its visible box
    /// stays inside.
    fn floating_position(
        tree: &DockTree,
        viewport: NodeId,
        window: NodeId,
        point: &DragPoint,
        data: &DraggedData,
    ) -> Option<(f32, f32)> {
        let bounds = tree.layout(viewport)?;
        let state = tree.window(window)?;
        let visible_height = if state.minimized {
            tree.config().header_height
        } else {
            state.height
        };
        let x = point.position.x - bounds.x - data.offset.x;
        let y = point.position.y - bounds.y - data.offset.y;
        let max_x = (bounds.width - state.width).max(0.0);
        let max_y = (bounds.height - visible_height).max(0.0);
        Some((x.clamp(0.0, max_x), y.clamp(0.0, max_y)))
    }

    fn apply(
        &self,
        cx: &mut DropContext<'_>,
        viewport: NodeId,
        window: NodeId,
        point: &DragPoint,
        data: &DraggedData,
    ) -> DockResult<()> {
        if cx.tree.viewport_of(window) != Some(viewport) {
            cx.tree.transfer_window(window, viewport)?;
        }
        if self.is_docking {
            tracing::debug!(?window, ?viewport, "docking window as first tab");
            return cx.tree.dock_window(viewport, window, None);
        }

        let Some((x, y)) = Self::floating_position(cx.tree, viewport, window, point, data) else {
            return Ok(());
        };
        let tabbed = cx.tree.window(window).is_some_and(|w| w.tabbed);
        if tabbed {
            cx.tree.undock_window(viewport, window, x, y)
        } else {
            cx.tree.move_window(window, x, y)
        }
    }
}

impl DropStrategy for ViewportDropStrategy {
    fn on_drag_enter(
        &mut self,
        _cx: &mut DropContext<'_>,
        _point: &DragPoint,
        _zone: DropZone,
        _data: &DraggedData,
    ) -> bool {
        // Floating stays available for every payload so a failed drop can
        // fall through to undocking.
        self.is_docking = false;
        true
    }

    fn on_drag_over(
        &mut self,
        cx: &mut DropContext<'_>,
        point: &DragPoint,
        zone: DropZone,
        data: &DraggedData,
    ) -> bool {
        if !data.payload.is_window() {
            self.stop_docking(cx);
            return true;
        }
        let (has_tabs, bounds) = match (cx.tree.viewport(zone.node), cx.tree.layout(zone.node)) {
            (Some(viewport), Some(bounds)) => (!viewport.tabs.is_empty(), bounds),
            _ => {
                self.stop_docking(cx);
                return false;
            }
        };
        // The tab strip owns docking once any window is tabbed.
        if has_tabs {
            self.stop_docking(cx);
            return true;
        }

        let band = cx.tree.config().dock_zone_height;
        let offset = point.position.y - bounds.y;
        if (0.0..=band).contains(&offset) {
            self.is_docking = true;
            let first = cx
                .tree
                .children(zone.node)
                .iter()
                .copied()
                .find(|c| *c != cx.tree.placeholder_id());
            cx.placeholder
                .show(cx.tree, zone, Orientation::Horizontal, Some(band), zone.node, first);
        } else {
            self.stop_docking(cx);
        }
        true
    }

    fn on_drop(
        &mut self,
        cx: &mut DropContext<'_>,
        point: &DragPoint,
        zone: DropZone,
        data: &DraggedData,
    ) -> bool {
        let DragPayload::Window(window) = data.payload else {
            return false;
        };
        match self.apply(cx, zone.node, window, point, data) {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(%err, "viewport drop failed");
                false
            }
        }
    }

    fn clear_cache(&mut self) {
        self.is_docking = false;
    }

    fn handle_drop(
        &mut self,
        cx: &mut DropContext<'_>,
        point: &DragPoint,
        zone: DropZone,
        data: &DraggedData,
    ) -> bool {
        if self.is_docking {
            gated_drop(self, cx, point, zone, data)
        } else {
            ungated_drop(self, cx, point, zone, data)
        }
    }
}
