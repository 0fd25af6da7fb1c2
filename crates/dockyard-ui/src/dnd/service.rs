//! Drag-and-drop coordination: zone resolution and strategy dispatch.

use dockyard_core::alloc::HashMap;
use dockyard_core::math::Vec2;
use dockyard_core::profiling::profile_function;

use super::column::ColumnDropStrategy;
use super::container::ContainerDropStrategy;
use super::panel_group::PanelGroupDropStrategy;
use super::placeholder::Placeholder;
use super::row::RowDropStrategy;
use super::strategy::{DropContext, DropStrategy};
use super::tab_strip::TabStripDropStrategy;
use super::types::{DragPoint, DraggedData, DropZone, DropZoneKind};
use super::undock::UndockDropStrategy;
use super::viewport::ViewportDropStrategy;
use crate::floating::FloatingPanelManager;
use crate::tree::{DockTree, NodeKind};

/// Builds a fresh strategy for one zone.
pub type StrategyFactory = fn() -> Box<dyn DropStrategy>;

/// The visual clone following the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Ghost {
    /// Top-left corner (pointer minus grab offset).
    pub position: Vec2,
    pub size: Vec2,
    pub visible: bool,
}

#[derive(Debug, Clone, Copy)]
struct DragSession {
    data: DraggedData,
    active: Option<DropZone>,
    last_point: Option<DragPoint>,
    valid: bool,
}

/// Owns the ghost, the placeholder arbiter and one strategy instance per
/// visited zone, and drives the Enter/Over/Leave/Drop lifecycle.
///
/// Only one zone is active at a time. Strategy instances are created on
/// first visit and dropped when the drag ends.
#[derive(Debug)]
pub struct DragDropService {
    factories: HashMap<DropZoneKind, StrategyFactory>,
    strategies: HashMap<DropZone, Box<dyn DropStrategy>>,
    placeholder: Placeholder,
    ghost: Ghost,
    session: Option<DragSession>,
}

impl Default for DragDropService {
    fn default() -> Self {
        Self::new()
    }
}

impl DragDropService {
    /// Create a service with the built-in strategy for every zone kind.
    pub fn new() -> Self {
        let mut service = Self {
            factories: HashMap::default(),
            strategies: HashMap::default(),
            placeholder: Placeholder::new(),
            ghost: Ghost::default(),
            session: None,
        };
        service.register_strategy(DropZoneKind::Container, || Box::new(ContainerDropStrategy::new()));
        service.register_strategy(DropZoneKind::Row, || Box::new(RowDropStrategy::new()));
        service.register_strategy(DropZoneKind::Column, || Box::new(ColumnDropStrategy::new()));
        service.register_strategy(DropZoneKind::PanelGroup, || Box::new(PanelGroupDropStrategy::new()));
        service.register_strategy(DropZoneKind::Viewport, || Box::new(ViewportDropStrategy::new()));
        service.register_strategy(DropZoneKind::TabStrip, || Box::new(TabStripDropStrategy::new()));
        service.register_strategy(DropZoneKind::Undock, || Box::new(UndockDropStrategy::new()));
        service
    }

    /// Replace the strategy used for a zone kind.
    pub fn register_strategy(&mut self, kind: DropZoneKind, factory: StrategyFactory) {
        self.factories.insert(kind, factory);
    }

    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    pub fn dragged(&self) -> Option<&DraggedData> {
        self.session.as_ref().map(|s| &s.data)
    }

    /// The zone whose strategy currently owns the drag.
    pub fn active_zone(&self) -> Option<DropZone> {
        self.session.and_then(|s| s.active)
    }

    /// Whether the last Over reported a valid drop position.
    pub fn is_over_valid(&self) -> bool {
        self.session.is_some_and(|s| s.valid)
    }

    pub fn ghost(&self) -> &Ghost {
        &self.ghost
    }

    pub fn placeholder(&self) -> &Placeholder {
        &self.placeholder
    }

    /// Start dragging `data` with the pointer at `position`.
    pub fn begin_drag(&mut self, tree: &mut DockTree, data: DraggedData, position: Vec2) {
        if self.session.is_some() {
            tracing::warn!("drag started while another drag was active; discarding it");
            self.session = None;
            self.finish(tree);
        }
        let size = tree
            .layout(data.payload.node())
            .map(|rect| rect.size())
            .unwrap_or(Vec2::ZERO);
        self.ghost = Ghost {
            position: position - data.offset,
            size,
            visible: true,
        };
        self.session = Some(DragSession {
            data,
            active: None,
            last_point: None,
            valid: false,
        });
        tracing::debug!(payload = ?data.payload, "drag started");
    }

    /// Move the pointer. Returns whether dropping here would be valid.
    pub fn drag_move(
        &mut self,
        tree: &mut DockTree,
        floating: &mut FloatingPanelManager,
        position: Vec2,
    ) -> bool {
        profile_function!();
        let Self {
            factories,
            strategies,
            placeholder,
            ghost,
            session,
        } = self;
        let Some(session) = session.as_mut() else {
            return false;
        };

        if tree.needs_layout()
            && let Err(err) = tree.relayout()
        {
            tracing::warn!(%err, "relayout during drag failed");
        }
        ghost.position = position - session.data.offset;

        let exclude = session.data.payload.node();
        let target = tree.hit_test(position, floating.floating_panels(), Some(exclude));
        let point = DragPoint::new(position, target);
        let candidates = zone_candidates(tree, &point);
        let data = session.data;
        session.last_point = Some(point);

        let mut cx = DropContext {
            tree,
            placeholder,
            floating,
        };

        let mut chosen = None;
        for zone in candidates {
            if session.active == Some(zone) {
                chosen = Some(zone);
                break;
            }
            let Some(strategy) = instance(strategies, factories, zone) else {
                continue;
            };
            if strategy.handle_drag_enter(&mut cx, &point, zone, &data) {
                tracing::trace!(?zone, "entered drop zone");
                chosen = Some(zone);
                break;
            }
        }

        if chosen != session.active
            && let Some(previous) = session.active
            && let Some(strategy) = strategies.get_mut(&previous)
        {
            strategy.handle_drag_leave(&mut cx, &point, previous, &data);
            tracing::trace!(?previous, "left drop zone");
        }
        session.active = chosen;

        session.valid = match chosen {
            Some(zone) => strategies
                .get_mut(&zone)
                .is_some_and(|strategy| strategy.handle_drag_over(&mut cx, &point, zone, &data)),
            None => false,
        };
        session.valid
    }

    /// Release the pointer at `position`. Returns whether the tree changed.
    ///
    /// A viewport declines non-window payloads on drop; those fall through to
    /// the undock strategy and float.
    pub fn drop(
        &mut self,
        tree: &mut DockTree,
        floating: &mut FloatingPanelManager,
        position: Vec2,
    ) -> bool {
        let Some(last) = self.session.map(|s| s.last_point) else {
            return false;
        };
        if last.map(|p| p.position) != Some(position) {
            self.drag_move(tree, floating, position);
        }
        let Some(session) = self.session.take() else {
            return false;
        };
        let point = session
            .last_point
            .unwrap_or(DragPoint::new(position, None));
        let data = session.data;

        let mut dropped = false;
        if let Some(zone) = session.active {
            let Self {
                factories,
                strategies,
                placeholder,
                ..
            } = self;
            let mut cx = DropContext {
                tree: &mut *tree,
                placeholder,
                floating,
            };
            if let Some(strategy) = strategies.get_mut(&zone) {
                dropped = strategy.handle_drop(&mut cx, &point, zone, &data);
            }
            if !dropped && zone.kind == DropZoneKind::Viewport && !data.payload.is_window() {
                let undock = DropZone::new(cx.tree.root(), DropZoneKind::Undock);
                if let Some(strategy) = instance(strategies, factories, undock)
                    && strategy.handle_drag_enter(&mut cx, &point, undock, &data)
                {
                    dropped = strategy.handle_drop(&mut cx, &point, undock, &data);
                }
            }
        }

        self.finish(tree);
        tracing::debug!(dropped, payload = ?data.payload, "drag ended");
        dropped
    }

    /// Abort the drag (escape or pointer cancel): the active zone gets a Leave.
    pub fn cancel(&mut self, tree: &mut DockTree, floating: &mut FloatingPanelManager) {
        let Some(session) = self.session.take() else {
            return;
        };
        if let Some(zone) = session.active
            && let Some(strategy) = self.strategies.get_mut(&zone)
        {
            let mut cx = DropContext {
                tree: &mut *tree,
                placeholder: &mut self.placeholder,
                floating,
            };
            let point = session
                .last_point
                .unwrap_or(DragPoint::new(self.ghost.position, None));
            strategy.handle_drag_leave(&mut cx, &point, zone, &session.data);
        }
        self.finish(tree);
        tracing::debug!("drag cancelled");
    }

    fn finish(&mut self, tree: &mut DockTree) {
        self.placeholder.hide(tree);
        self.ghost.visible = false;
        self.strategies.clear();
    }
}

fn instance<'s>(
    strategies: &'s mut HashMap<DropZone, Box<dyn DropStrategy>>,
    factories: &HashMap<DropZoneKind, StrategyFactory>,
    zone: DropZone,
) -> Option<&'s mut Box<dyn DropStrategy>> {
    if !strategies.contains_key(&zone) {
        let factory = factories.get(&zone.kind)?;
        strategies.insert(zone, factory());
    }
    strategies.get_mut(&zone)
}

/// Zones under the pointer, innermost first, ending with the undock fallback.
fn zone_candidates(tree: &DockTree, point: &DragPoint) -> Vec<DropZone> {
    let mut zones = Vec::new();
    let mut current = point.target;
    while let Some(id) = current {
        match tree.kind(id) {
            Some(NodeKind::Container) => zones.push(DropZone::new(id, DropZoneKind::Container)),
            Some(NodeKind::Row(_)) => zones.push(DropZone::new(id, DropZoneKind::Row)),
            Some(NodeKind::Column(_)) => zones.push(DropZone::new(id, DropZoneKind::Column)),
            Some(NodeKind::PanelGroup(_)) => zones.push(DropZone::new(id, DropZoneKind::PanelGroup)),
            Some(NodeKind::Viewport(viewport)) => {
                let in_tab_bar = tree.layout(id).is_some_and(|bounds| {
                    point.position.y - bounds.y <= tree.config().tab_bar_height
                });
                if !viewport.tabs.is_empty() && in_tab_bar {
                    zones.push(DropZone::new(id, DropZoneKind::TabStrip));
                }
                zones.push(DropZone::new(id, DropZoneKind::Viewport));
            }
            _ => {}
        }
        current = tree.parent(id);
    }
    zones.push(DropZone::new(tree.root(), DropZoneKind::Undock));
    zones
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DockingConfig;
    use crate::dnd::types::DragPayload;
    use crate::tree::NodeId;
    use dockyard_core::geometry::Size;

    struct Fixture {
        tree: DockTree,
        floating: FloatingPanelManager,
        row: NodeId,
        column: NodeId,
        group: NodeId,
    }

    fn fixture() -> Fixture {
        let mut tree = DockTree::new(DockingConfig::default().gutter(0.0));
        let root = tree.root();
        let row = tree.create_row(root, None).unwrap();
        let column = tree.create_column(row, None).unwrap();
        let group = tree.create_panel_group();
        let panel = tree.create_panel("A", 0.0);
        tree.add_panel(group, panel, None).unwrap();
        tree.add_panel_group(column, group, None).unwrap();
        tree.set_fills_space(row, true);
        tree.set_fills_space(column, true);
        tree.set_fills_space(group, true);
        tree.compute_layout(Size::new(400.0, 300.0)).unwrap();
        Fixture {
            tree,
            floating: FloatingPanelManager::new(),
            row,
            column,
            group,
        }
    }

    #[test]
    fn test_zone_candidates_innermost_first() {
        let f = fixture();
        let point = DragPoint::new(Vec2::new(200.0, 150.0), Some(f.group));
        let kinds: Vec<DropZoneKind> = zone_candidates(&f.tree, &point)
            .into_iter()
            .map(|z| z.kind)
            .collect();
        assert_eq!(
            kinds,
            vec![
                DropZoneKind::PanelGroup,
                DropZoneKind::Column,
                DropZoneKind::Row,
                DropZoneKind::Container,
                DropZoneKind::Undock,
            ]
        );
    }

    #[test]
    fn test_own_position_is_not_a_valid_drop() {
        let mut f = fixture();
        let mut service = DragDropService::new();
        let data = DraggedData::new(DragPayload::PanelGroup(f.group), Vec2::new(5.0, 5.0));

        service.begin_drag(&mut f.tree, data, Vec2::new(200.0, 150.0));
        assert!(service.ghost().visible);

        // The group itself is excluded from hit testing, so the column is hit.
        let valid = service.drag_move(&mut f.tree, &mut f.floating, Vec2::new(200.0, 150.0));
        assert!(!valid);
        assert_eq!(
            service.active_zone(),
            Some(DropZone::new(f.column, DropZoneKind::Column))
        );
        assert!(!f.tree.placeholder_mounted());

        assert!(!service.drop(&mut f.tree, &mut f.floating, Vec2::new(200.0, 150.0)));
        assert!(!service.is_dragging());
        assert_eq!(f.tree.column_of(f.group), Some(f.column));
        assert_eq!(f.tree.columns(f.row), vec![f.column]);
    }

    #[test]
    fn test_cancel_hides_everything() {
        let mut f = fixture();
        let mut service = DragDropService::new();
        let extra = f.tree.create_panel("B", 0.0);
        f.tree.add_panel(f.group, extra, None).unwrap();
        f.tree.relayout().unwrap();

        let data = DraggedData::new(DragPayload::Panel(extra), Vec2::ZERO);
        service.begin_drag(&mut f.tree, data, Vec2::new(10.0, 10.0));
        // Over the first tab: merge back in front of it.
        assert!(service.drag_move(&mut f.tree, &mut f.floating, Vec2::new(10.0, 10.0)));
        assert!(f.tree.placeholder_mounted());

        service.cancel(&mut f.tree, &mut f.floating);
        assert!(!f.tree.placeholder_mounted());
        assert!(!service.ghost().visible);
        assert_eq!(f.tree.panels(f.group).len(), 2);
    }
}
