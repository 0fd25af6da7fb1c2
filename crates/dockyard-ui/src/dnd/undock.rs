//! Fallback that floats panels outside the docked tree.

use super::strategy::{DropContext, DropStrategy, ungated_drop};
use super::types::{DragPoint, DraggedData, DropZone};
use crate::operations::float_payload;
use crate::tree::LayoutRect;

/// Floats a panel group (or a bare panel in a new group) at the pointer,
/// minus the grab offset. Shows no placeholder, so drops are not gated.
#[derive(Debug, Default)]
pub struct UndockDropStrategy;

impl UndockDropStrategy {
    pub fn new() -> Self {
        Self
    }
}

impl DropStrategy for UndockDropStrategy {
    fn on_drag_enter(
        &mut self,
        cx: &mut DropContext<'_>,
        _point: &DragPoint,
        _zone: DropZone,
        data: &DraggedData,
    ) -> bool {
        data.effective_group(cx.tree).is_some()
    }

    fn on_drag_over(
        &mut self,
        cx: &mut DropContext<'_>,
        _point: &DragPoint,
        _zone: DropZone,
        _data: &DraggedData,
    ) -> bool {
        cx.placeholder.hide(cx.tree);
        true
    }

    fn on_drop(
        &mut self,
        cx: &mut DropContext<'_>,
        point: &DragPoint,
        _zone: DropZone,
        data: &DraggedData,
    ) -> bool {
        let Some(group) = data.effective_group(cx.tree) else {
            return false;
        };
        let config = cx.tree.config();
        let (width, height) = match cx.tree.layout(group) {
            Some(rect) if rect.width > 0.0 && rect.height > 0.0 => (rect.width, rect.height),
            _ => (config.default_column_width, config.default_group_height),
        };
        let origin = point.position - data.offset;
        let rect = LayoutRect::new(origin.x, origin.y, width, height);

        match float_payload(cx.tree, cx.floating, data.payload, rect) {
            Ok(group) => {
                tracing::debug!(?group, x = rect.x, y = rect.y, "panel group undocked");
                true
            }
            Err(err) => {
                tracing::warn!(%err, "undock failed");
                false
            }
        }
    }

    fn clear_cache(&mut self) {}

    fn handle_drop(
        &mut self,
        cx: &mut DropContext<'_>,
        point: &DragPoint,
        zone: DropZone,
        data: &DraggedData,
    ) -> bool {
        ungated_drop(self, cx, point, zone, data)
    }
}
