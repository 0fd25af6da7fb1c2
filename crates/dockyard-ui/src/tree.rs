//! Dock tree: the arena of containers, rows, columns, panel groups and windows.
//!
//! The tree is the single source of truth for docking topology. Structural
//! mutators queue a [`LayoutEvent`] for the affected sibling group and bump the
//! structure version; state setters only write (and only mark the node dirty)
//! when the value actually changes.

use dockyard_core::geometry::{Rect, Size};
use dockyard_core::math::Vec2;
use indexmap::IndexMap;

use crate::config::DockingConfig;
use crate::dirty::DirtyFlags;
use crate::dnd::types::Orientation;
use crate::events::{LayoutEvent, LayoutEventQueue};
use crate::operations::{DockError, DockResult};

/// Node identifier in the dock tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// Absolute layout rectangle computed by the layout pass.
pub type LayoutRect = Rect;

/// Presentation state of a node's collapse control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CollapseButton {
    /// Not rendered at all.
    #[default]
    Hidden,
    /// Rendered and clickable.
    Enabled,
    /// Rendered but inert.
    Disabled,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RowState {
    /// Explicit height; `None` means space-filling.
    pub height: Option<f32>,
    pub collapsed: bool,
    pub collapsible: bool,
}

impl Default for RowState {
    fn default() -> Self {
        Self {
            height: None,
            collapsed: false,
            collapsible: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ColumnState {
    /// Explicit width; `None` means space-filling.
    pub width: Option<f32>,
    /// The column's own minimum width, before children are considered.
    pub min_width: f32,
    /// Last column of its row (drives the width reset).
    pub is_last: bool,
    /// Whether the trailing resize handle decoration is installed.
    pub has_resize_handle: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PanelGroupState {
    /// Explicit height; `None` means space-filling.
    pub height: Option<f32>,
    pub collapsed: bool,
    pub collapsible: bool,
    pub min_width: f32,
    /// Index of the visible panel.
    pub active: usize,
    /// Absolute geometry when the group floats outside the row/column tree.
    pub floating: Option<LayoutRect>,
}

impl Default for PanelGroupState {
    fn default() -> Self {
        Self {
            height: None,
            collapsed: false,
            collapsible: true,
            min_width: 0.0,
            active: 0,
            floating: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PanelState {
    pub title: String,
    pub min_width: f32,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ViewportState {
    /// Explicit height inside its column; `None` means space-filling.
    pub height: Option<f32>,
    /// Tabbed windows in tab order.
    pub tabs: Vec<NodeId>,
    pub active_tab: Option<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct WindowState {
    pub title: String,
    /// Position relative to the owning viewport.
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub minimized: bool,
    pub tabbed: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlaceholderState {
    pub orientation: Orientation,
    pub size_hint: Option<f32>,
    /// Tab slot for parents that lay out their children as tab headers.
    pub slot: usize,
}

/// Kind-specific node data.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Container,
    Row(RowState),
    Column(ColumnState),
    PanelGroup(PanelGroupState),
    Panel(PanelState),
    Viewport(ViewportState),
    Window(WindowState),
    Placeholder(PlaceholderState),
}

impl NodeKind {
    /// Short name for log output.
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Container => "container",
            NodeKind::Row(_) => "row",
            NodeKind::Column(_) => "column",
            NodeKind::PanelGroup(_) => "panel-group",
            NodeKind::Panel(_) => "panel",
            NodeKind::Viewport(_) => "viewport",
            NodeKind::Window(_) => "window",
            NodeKind::Placeholder(_) => "placeholder",
        }
    }

}

/// A node in the dock tree.
#[derive(Debug, Clone)]
pub struct DockNode {
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    /// Absolute rectangle from the last layout pass.
    pub layout: LayoutRect,
    /// Marker for the one sibling that absorbs leftover space.
    pub fills_space: bool,
    pub collapse_button: CollapseButton,
    /// Effective minimum width applied by the layout pass.
    pub min_width_constraint: Option<f32>,
    pub dirty_flags: DirtyFlags,
}

impl DockNode {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            children: Vec::new(),
            layout: LayoutRect::default(),
            fills_space: false,
            collapse_button: CollapseButton::Hidden,
            min_width_constraint: None,
            dirty_flags: DirtyFlags::LAYOUT,
        }
    }
}

/// The dock tree.
#[derive(Debug, Clone)]
pub struct DockTree {
    nodes: IndexMap<NodeId, DockNode>,
    root: NodeId,
    placeholder: NodeId,
    next_id: usize,
    structure_version: u64,
    events: LayoutEventQueue,
    config: DockingConfig,
    pub(crate) viewport_size: Size<f32>,
    pub(crate) layout_pending: bool,
}

impl DockTree {
    /// Create a tree with an empty root container.
    pub fn new(config: DockingConfig) -> Self {
        let mut tree = Self {
            nodes: IndexMap::new(),
            root: NodeId(0),
            placeholder: NodeId(0),
            next_id: 0,
            structure_version: 0,
            events: LayoutEventQueue::new(),
            config,
            viewport_size: Size::new(0.0, 0.0),
            layout_pending: true,
        };
        tree.root = tree.alloc(NodeKind::Container);
        tree.placeholder = tree.alloc(NodeKind::Placeholder(PlaceholderState {
            orientation: Orientation::Horizontal,
            size_hint: None,
            slot: 0,
        }));
        tree
    }

    fn alloc(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(id, DockNode::new(kind));
        self.layout_pending = true;
        id
    }

    /// The root container.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The shared placeholder node.
    pub fn placeholder_id(&self) -> NodeId {
        self.placeholder
    }

    pub fn config(&self) -> &DockingConfig {
        &self.config
    }

    /// Counter bumped on every structural mutation (placeholder moves excluded).
    pub fn structure_version(&self) -> u64 {
        self.structure_version
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn get(&self, id: NodeId) -> Option<&DockNode> {
        self.nodes.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut DockNode> {
        self.nodes.get_mut(&id)
    }

    pub fn kind(&self, id: NodeId) -> Option<&NodeKind> {
        self.nodes.get(&id).map(|n| &n.kind)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(&id).and_then(|n| n.parent)
    }

    /// Raw children, including the placeholder if it is mounted here.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(&id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    pub fn layout(&self, id: NodeId) -> Option<LayoutRect> {
        self.nodes.get(&id).map(|n| n.layout)
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.keys().copied()
    }

    // Typed accessors

    pub fn row(&self, id: NodeId) -> Option<&RowState> {
        match self.kind(id)? {
            NodeKind::Row(row) => Some(row),
            _ => None,
        }
    }

    pub fn column(&self, id: NodeId) -> Option<&ColumnState> {
        match self.kind(id)? {
            NodeKind::Column(column) => Some(column),
            _ => None,
        }
    }

    pub fn panel_group(&self, id: NodeId) -> Option<&PanelGroupState> {
        match self.kind(id)? {
            NodeKind::PanelGroup(group) => Some(group),
            _ => None,
        }
    }

    pub fn panel(&self, id: NodeId) -> Option<&PanelState> {
        match self.kind(id)? {
            NodeKind::Panel(panel) => Some(panel),
            _ => None,
        }
    }

    pub fn viewport(&self, id: NodeId) -> Option<&ViewportState> {
        match self.kind(id)? {
            NodeKind::Viewport(viewport) => Some(viewport),
            _ => None,
        }
    }

    pub fn window(&self, id: NodeId) -> Option<&WindowState> {
        match self.kind(id)? {
            NodeKind::Window(window) => Some(window),
            _ => None,
        }
    }

    pub fn is_container(&self, id: NodeId) -> bool {
        matches!(self.kind(id), Some(NodeKind::Container))
    }

    fn children_where(&self, id: NodeId, pred: impl Fn(&NodeKind) -> bool) -> Vec<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .filter(|c| self.kind(*c).is_some_and(&pred))
            .collect()
    }

    /// Rows of a container, in order.
    pub fn rows(&self, container: NodeId) -> Vec<NodeId> {
        self.children_where(container, |k| matches!(k, NodeKind::Row(_)))
    }

    /// Columns of a row, in order.
    pub fn columns(&self, row: NodeId) -> Vec<NodeId> {
        self.children_where(row, |k| matches!(k, NodeKind::Column(_)))
    }

    /// Panel groups and the embedded viewport of a column, in order.
    pub fn column_children(&self, column: NodeId) -> Vec<NodeId> {
        self.children_where(column, |k| {
            matches!(k, NodeKind::PanelGroup(_) | NodeKind::Viewport(_))
        })
    }

    /// Panel groups of a column, in order.
    pub fn panel_groups(&self, column: NodeId) -> Vec<NodeId> {
        self.children_where(column, |k| matches!(k, NodeKind::PanelGroup(_)))
    }

    /// Panels of a group, in tab order.
    pub fn panels(&self, group: NodeId) -> Vec<NodeId> {
        self.children_where(group, |k| matches!(k, NodeKind::Panel(_)))
    }

    /// Windows of a viewport, bottom-most first.
    pub fn windows(&self, viewport: NodeId) -> Vec<NodeId> {
        self.children_where(viewport, |k| matches!(k, NodeKind::Window(_)))
    }

    /// Position among the parent's children, ignoring the placeholder.
    pub fn sibling_index(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent)
            .iter()
            .filter(|c| **c != self.placeholder)
            .position(|c| *c == id)
    }

    fn parent_if(&self, id: NodeId, pred: impl Fn(&NodeKind) -> bool) -> Option<NodeId> {
        let parent = self.parent(id)?;
        self.kind(parent).is_some_and(pred).then_some(parent)
    }

    /// The column a panel group (or viewport) is docked in.
    pub fn column_of(&self, id: NodeId) -> Option<NodeId> {
        self.parent_if(id, |k| matches!(k, NodeKind::Column(_)))
    }

    /// The row a column belongs to.
    pub fn row_of(&self, column: NodeId) -> Option<NodeId> {
        self.parent_if(column, |k| matches!(k, NodeKind::Row(_)))
    }

    /// The container a row belongs to.
    pub fn container_of(&self, row: NodeId) -> Option<NodeId> {
        self.parent_if(row, |k| matches!(k, NodeKind::Container))
    }

    /// The group a panel belongs to.
    pub fn group_of(&self, panel: NodeId) -> Option<NodeId> {
        self.parent_if(panel, |k| matches!(k, NodeKind::PanelGroup(_)))
    }

    /// The viewport a window belongs to.
    pub fn viewport_of(&self, window: NodeId) -> Option<NodeId> {
        self.parent_if(window, |k| matches!(k, NodeKind::Viewport(_)))
    }

    /// A group's minimum width: its own minimum or its widest panel's.
    pub fn group_min_width(&self, group: NodeId) -> f32 {
        let own = self.panel_group(group).map(|g| g.min_width).unwrap_or(0.0);
        self.panels(group)
            .into_iter()
            .filter_map(|p| self.panel(p).map(|p| p.min_width))
            .fold(own, f32::max)
    }

    // Dirty tracking

    /// Mark a node with dirty flags.
    pub fn mark_dirty(&mut self, id: NodeId, flags: DirtyFlags) {
        if flags.is_empty() {
            return;
        }
        if let Some(node) = self.nodes.get_mut(&id) {
            node.dirty_flags |= flags;
            if flags.needs_layout() {
                self.layout_pending = true;
            }
        }
    }

    /// Nodes with pending dirty flags.
    pub fn dirty_nodes(&self) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|(_, n)| !n.dirty_flags.is_empty())
            .map(|(id, _)| *id)
            .collect()
    }

    pub fn is_dirty(&self) -> bool {
        self.nodes.values().any(|n| !n.dirty_flags.is_empty())
    }

    /// Clear all dirty flags (called once a frame has been presented).
    pub fn clear_dirty_flags(&mut self) {
        for node in self.nodes.values_mut() {
            node.dirty_flags = DirtyFlags::NONE;
        }
    }

    /// Whether geometry is stale relative to the tree state.
    pub fn needs_layout(&self) -> bool {
        self.layout_pending
    }

    // Events

    fn emit(&mut self, event: LayoutEvent) {
        self.structure_version = self.structure_version.wrapping_add(1);
        self.mark_dirty(event.scope(), DirtyFlags::CHILDREN_ORDER);
        self.events.push(event);
    }

    /// Pending layout-changed notifications.
    pub fn pending_events(&self) -> &LayoutEventQueue {
        &self.events
    }

    /// Take every pending layout-changed notification.
    pub fn drain_events(&mut self) -> Vec<LayoutEvent> {
        self.events.drain()
    }

    // Low-level attachment

    fn expect_kind(&self, id: NodeId, pred: impl Fn(&NodeKind) -> bool) -> DockResult<()> {
        let kind = self.kind(id).ok_or(DockError::NodeNotFound(id))?;
        if pred(kind) {
            Ok(())
        } else {
            Err(DockError::InvalidNodeKind {
                node: id,
                found: kind.name(),
            })
        }
    }

    /// Insert `child` before the `index`-th non-placeholder child of `parent`,
    /// or append when `index` is `None` or past the end.
    fn attach(&mut self, parent: NodeId, child: NodeId, index: Option<usize>) {
        let placeholder = self.placeholder;
        let Some(parent_node) = self.nodes.get_mut(&parent) else {
            return;
        };
        let position = index.and_then(|index| {
            parent_node
                .children
                .iter()
                .enumerate()
                .filter(|(_, c)| **c != placeholder)
                .nth(index)
                .map(|(pos, _)| pos)
        });
        match position {
            Some(pos) => parent_node.children.insert(pos, child),
            None => parent_node.children.push(child),
        }
        if let Some(child_node) = self.nodes.get_mut(&child) {
            child_node.parent = Some(parent);
        }
    }

    fn detach(&mut self, child: NodeId) {
        let Some(parent) = self.parent(child) else {
            return;
        };
        if let Some(parent_node) = self.nodes.get_mut(&parent) {
            parent_node.children.retain(|c| *c != child);
        }
        if let Some(child_node) = self.nodes.get_mut(&child) {
            child_node.parent = None;
        }
    }

    /// Remove a detached node and all of its descendants from the arena.
    pub fn delete_subtree(&mut self, id: NodeId) {
        if id == self.root || id == self.placeholder {
            return;
        }
        self.detach(id);
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if current == self.placeholder {
                // Never delete the shared placeholder; just unmount it.
                self.detach(current);
                continue;
            }
            if let Some(node) = self.nodes.shift_remove(&current) {
                stack.extend(node.children);
            }
        }
        self.layout_pending = true;
    }

    // Structural mutators

    /// Create a row in `container` before the row at `index` (append on `None`).
    pub fn create_row(&mut self, container: NodeId, index: Option<usize>) -> DockResult<NodeId> {
        self.expect_kind(container, |k| matches!(k, NodeKind::Container))?;
        let row = self.alloc(NodeKind::Row(RowState::default()));
        self.attach(container, row, index);
        self.emit(LayoutEvent::RowsChanged(container));
        Ok(row)
    }

    /// Remove a row and everything in it.
    pub fn remove_row(&mut self, container: NodeId, row: NodeId) -> DockResult<()> {
        self.expect_kind(row, |k| matches!(k, NodeKind::Row(_)))?;
        if self.parent(row) != Some(container) {
            return Err(DockError::NotAChild {
                parent: container,
                child: row,
            });
        }
        self.delete_subtree(row);
        self.emit(LayoutEvent::RowsChanged(container));
        Ok(())
    }

    /// Create a column in `row` before the column at `index` (append on `None`).
    pub fn create_column(&mut self, row: NodeId, index: Option<usize>) -> DockResult<NodeId> {
        self.expect_kind(row, |k| matches!(k, NodeKind::Row(_)))?;
        let column = self.alloc(NodeKind::Column(ColumnState {
            min_width: self.config.min_column_width,
            ..ColumnState::default()
        }));
        self.attach(row, column, index);
        self.emit(LayoutEvent::ColumnsChanged(row));
        Ok(column)
    }

    /// Remove a column and everything in it. An emptied row is pruned.
    pub fn remove_column(&mut self, row: NodeId, column: NodeId) -> DockResult<()> {
        self.expect_kind(column, |k| matches!(k, NodeKind::Column(_)))?;
        if self.parent(column) != Some(row) {
            return Err(DockError::NotAChild {
                parent: row,
                child: column,
            });
        }
        self.delete_subtree(column);
        self.emit(LayoutEvent::ColumnsChanged(row));
        if self.columns(row).is_empty()
            && let Some(container) = self.container_of(row)
        {
            self.remove_row(container, row)?;
        }
        Ok(())
    }

    /// Create a detached, empty panel group.
    pub fn create_panel_group(&mut self) -> NodeId {
        self.alloc(NodeKind::PanelGroup(PanelGroupState::default()))
    }

    /// Create a detached panel.
    pub fn create_panel(&mut self, title: impl Into<String>, min_width: f32) -> NodeId {
        self.alloc(NodeKind::Panel(PanelState {
            title: title.into(),
            min_width,
        }))
    }

    /// Dock a detached panel group into `column` before the child at `index`.
    pub fn add_panel_group(
        &mut self,
        column: NodeId,
        group: NodeId,
        index: Option<usize>,
    ) -> DockResult<()> {
        self.expect_kind(column, |k| matches!(k, NodeKind::Column(_)))?;
        self.expect_kind(group, |k| matches!(k, NodeKind::PanelGroup(_)))?;
        if self.parent(group).is_some() {
            return Err(DockError::AlreadyAttached(group));
        }
        self.attach(column, group, index);
        self.emit(LayoutEvent::ChildrenChanged(column));
        Ok(())
    }

    /// Undock a panel group from `column`, leaving it detached.
    ///
    /// An emptied column is pruned from its row (and an emptied row from its
    /// container), except for the last column of the last row, which always
    /// stays as a landing target.
    pub fn remove_panel_group(&mut self, column: NodeId, group: NodeId) -> DockResult<()> {
        self.expect_kind(group, |k| matches!(k, NodeKind::PanelGroup(_)))?;
        if self.parent(group) != Some(column) {
            return Err(DockError::NotAChild {
                parent: column,
                child: group,
            });
        }
        self.detach(group);
        self.emit(LayoutEvent::ChildrenChanged(column));
        self.prune_empty_column(column)
    }

    fn prune_empty_column(&mut self, column: NodeId) -> DockResult<()> {
        if !self.column_children(column).is_empty() {
            return Ok(());
        }
        let Some(row) = self.row_of(column) else {
            return Ok(());
        };
        let last_landing_column = self.columns(row).len() == 1
            && self
                .container_of(row)
                .is_some_and(|container| self.rows(container).len() == 1);
        if last_landing_column {
            tracing::trace!(?column, "keeping last empty column as landing target");
            return Ok(());
        }
        self.remove_column(row, column)
    }

    /// Add a detached panel to `group` before the panel at `index`; it becomes active.
    pub fn add_panel(&mut self, group: NodeId, panel: NodeId, index: Option<usize>) -> DockResult<()> {
        self.expect_kind(group, |k| matches!(k, NodeKind::PanelGroup(_)))?;
        self.expect_kind(panel, |k| matches!(k, NodeKind::Panel(_)))?;
        if self.parent(panel).is_some() {
            return Err(DockError::AlreadyAttached(panel));
        }
        self.attach(group, panel, index);
        let active = self.sibling_index(panel).unwrap_or(0);
        if let Some(NodeKind::PanelGroup(state)) = self.get_mut(group).map(|n| &mut n.kind) {
            state.active = active;
        }
        self.mark_dirty(group, DirtyFlags::CHILDREN_ORDER);
        self.panels_changed(group);
        Ok(())
    }

    /// Detach a panel from its group. Returns whether the group is now empty.
    pub fn remove_panel(&mut self, group: NodeId, panel: NodeId) -> DockResult<bool> {
        self.expect_kind(panel, |k| matches!(k, NodeKind::Panel(_)))?;
        if self.parent(panel) != Some(group) {
            return Err(DockError::NotAChild {
                parent: group,
                child: panel,
            });
        }
        self.detach(panel);
        let remaining = self.panels(group).len();
        if let Some(NodeKind::PanelGroup(state)) = self.get_mut(group).map(|n| &mut n.kind) {
            state.active = state.active.min(remaining.saturating_sub(1));
        }
        self.mark_dirty(group, DirtyFlags::CHILDREN_ORDER);
        self.panels_changed(group);
        Ok(remaining == 0)
    }

    /// Panel membership affects the column's minimum width.
    fn panels_changed(&mut self, group: NodeId) {
        if let Some(column) = self.column_of(group) {
            self.emit(LayoutEvent::ChildrenChanged(column));
        }
    }

    /// Embed a viewport into `column` before the child at `index`.
    pub fn create_viewport(&mut self, column: NodeId, index: Option<usize>) -> DockResult<NodeId> {
        self.expect_kind(column, |k| matches!(k, NodeKind::Column(_)))?;
        let viewport = self.alloc(NodeKind::Viewport(ViewportState::default()));
        self.attach(column, viewport, index);
        self.emit(LayoutEvent::ChildrenChanged(column));
        Ok(viewport)
    }

    // Viewport operations

    /// Open a floating window in a viewport at the given relative rectangle.
    pub fn add_window(
        &mut self,
        viewport: NodeId,
        title: impl Into<String>,
        rect: LayoutRect,
    ) -> DockResult<NodeId> {
        self.expect_kind(viewport, |k| matches!(k, NodeKind::Viewport(_)))?;
        let window = self.alloc(NodeKind::Window(WindowState {
            title: title.into(),
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
            minimized: false,
            tabbed: false,
        }));
        self.attach(viewport, window, None);
        self.mark_dirty(viewport, DirtyFlags::CHILDREN_ORDER);
        Ok(window)
    }

    /// Move a window into another viewport as a floating window on top.
    pub fn transfer_window(&mut self, window: NodeId, viewport: NodeId) -> DockResult<()> {
        self.expect_kind(viewport, |k| matches!(k, NodeKind::Viewport(_)))?;
        self.expect_kind(window, |k| matches!(k, NodeKind::Window(_)))?;
        if let Some(source) = self.viewport_of(window) {
            if source == viewport {
                return Ok(());
            }
            let state = self.viewport_mut(source)?;
            state.tabs.retain(|t| *t != window);
            if state.active_tab == Some(window) {
                state.active_tab = state.tabs.last().copied();
            }
            self.mark_dirty(source, DirtyFlags::CHILDREN_ORDER);
        }
        self.window_mut(window)?.tabbed = false;
        self.detach(window);
        self.attach(viewport, window, None);
        self.mark_dirty(viewport, DirtyFlags::CHILDREN_ORDER);
        self.mark_dirty(window, DirtyFlags::LAYOUT);
        Ok(())
    }

    fn viewport_mut(&mut self, viewport: NodeId) -> DockResult<&mut ViewportState> {
        match self.get_mut(viewport).map(|n| &mut n.kind) {
            Some(NodeKind::Viewport(state)) => Ok(state),
            Some(other) => Err(DockError::InvalidNodeKind {
                node: viewport,
                found: other.name(),
            }),
            None => Err(DockError::NodeNotFound(viewport)),
        }
    }

    fn window_mut(&mut self, window: NodeId) -> DockResult<&mut WindowState> {
        match self.get_mut(window).map(|n| &mut n.kind) {
            Some(NodeKind::Window(state)) => Ok(state),
            Some(other) => Err(DockError::InvalidNodeKind {
                node: window,
                found: other.name(),
            }),
            None => Err(DockError::NodeNotFound(window)),
        }
    }

    /// Turn a window into a tab at `index` (append on `None`) and activate it.
    ///
    /// Also reorders a window that is already tabbed.
    pub fn dock_window(
        &mut self,
        viewport: NodeId,
        window: NodeId,
        index: Option<usize>,
    ) -> DockResult<()> {
        if self.parent(window) != Some(viewport) {
            return Err(DockError::NotAChild {
                parent: viewport,
                child: window,
            });
        }
        self.window_mut(window)?.tabbed = true;
        let state = self.viewport_mut(viewport)?;
        let mut index = index.unwrap_or(state.tabs.len());
        if let Some(current) = state.tabs.iter().position(|t| *t == window) {
            state.tabs.remove(current);
            if current < index {
                index -= 1;
            }
        }
        let index = index.min(state.tabs.len());
        state.tabs.insert(index, window);
        state.active_tab = Some(window);
        self.mark_dirty(viewport, DirtyFlags::CHILDREN_ORDER);
        self.mark_dirty(window, DirtyFlags::LAYOUT);
        Ok(())
    }

    /// Move a tabbed window within the tab strip.
    pub fn reorder_tab(&mut self, viewport: NodeId, window: NodeId, index: usize) -> DockResult<()> {
        if !self.window(window).is_some_and(|w| w.tabbed) {
            return Err(DockError::InvalidIndex(index));
        }
        self.dock_window(viewport, window, Some(index))
    }

    /// Turn a tabbed window back into a floating one at the given position.
    pub fn undock_window(&mut self, viewport: NodeId, window: NodeId, x: f32, y: f32) -> DockResult<()> {
        if self.parent(window) != Some(viewport) {
            return Err(DockError::NotAChild {
                parent: viewport,
                child: window,
            });
        }
        {
            let state = self.window_mut(window)?;
            state.tabbed = false;
            state.x = x;
            state.y = y;
        }
        let state = self.viewport_mut(viewport)?;
        state.tabs.retain(|t| *t != window);
        if state.active_tab == Some(window) {
            state.active_tab = state.tabs.last().copied();
        }
        // Undocked windows come to the top of the stack.
        self.detach(window);
        self.attach(viewport, window, None);
        self.mark_dirty(viewport, DirtyFlags::CHILDREN_ORDER);
        self.mark_dirty(window, DirtyFlags::POSITION | DirtyFlags::LAYOUT);
        Ok(())
    }

    /// Reposition a floating window (relative to its viewport).
    pub fn move_window(&mut self, window: NodeId, x: f32, y: f32) -> DockResult<()> {
        let state = self.window_mut(window)?;
        if state.x == x && state.y == y {
            return Ok(());
        }
        state.x = x;
        state.y = y;
        self.mark_dirty(window, DirtyFlags::POSITION);
        Ok(())
    }

    /// Minimize or restore a window.
    pub fn set_minimized(&mut self, window: NodeId, minimized: bool) -> DockResult<()> {
        let state = self.window_mut(window)?;
        if state.minimized != minimized {
            state.minimized = minimized;
            self.mark_dirty(window, DirtyFlags::LAYOUT);
        }
        Ok(())
    }

    // State setters. Each returns whether anything changed.

    /// Explicit main-axis size of a row, column, panel group or viewport.
    pub fn explicit_size(&self, id: NodeId) -> Option<Option<f32>> {
        match self.kind(id)? {
            NodeKind::Row(row) => Some(row.height),
            NodeKind::Column(column) => Some(column.width),
            NodeKind::PanelGroup(group) => Some(group.height),
            NodeKind::Viewport(viewport) => Some(viewport.height),
            _ => None,
        }
    }

    /// Set the explicit main-axis size; `None` makes the node space-filling.
    pub fn set_size(&mut self, id: NodeId, size: Option<f32>) -> bool {
        let Some(node) = self.nodes.get_mut(&id) else {
            return false;
        };
        let slot = match &mut node.kind {
            NodeKind::Row(row) => &mut row.height,
            NodeKind::Column(column) => &mut column.width,
            NodeKind::PanelGroup(group) => &mut group.height,
            NodeKind::Viewport(viewport) => &mut viewport.height,
            _ => return false,
        };
        if *slot == size {
            return false;
        }
        *slot = size;
        self.mark_dirty(id, DirtyFlags::LAYOUT);
        true
    }

    pub fn is_collapsed(&self, id: NodeId) -> bool {
        match self.kind(id) {
            Some(NodeKind::Row(row)) => row.collapsed,
            Some(NodeKind::PanelGroup(group)) => group.collapsed,
            _ => false,
        }
    }

    pub fn is_collapsible(&self, id: NodeId) -> bool {
        match self.kind(id) {
            Some(NodeKind::Row(row)) => row.collapsible,
            Some(NodeKind::PanelGroup(group)) => group.collapsible,
            _ => false,
        }
    }

    /// Collapse or expand a row or panel group.
    pub fn set_collapsed(&mut self, id: NodeId, collapsed: bool) -> bool {
        let Some(node) = self.nodes.get_mut(&id) else {
            return false;
        };
        let slot = match &mut node.kind {
            NodeKind::Row(row) => &mut row.collapsed,
            NodeKind::PanelGroup(group) => &mut group.collapsed,
            _ => return false,
        };
        if *slot == collapsed {
            return false;
        }
        *slot = collapsed;
        self.mark_dirty(id, DirtyFlags::LAYOUT);
        true
    }

    /// Allow or forbid collapsing a row or panel group.
    pub fn set_collapsible(&mut self, id: NodeId, collapsible: bool) -> bool {
        let Some(node) = self.nodes.get_mut(&id) else {
            return false;
        };
        let slot = match &mut node.kind {
            NodeKind::Row(row) => &mut row.collapsible,
            NodeKind::PanelGroup(group) => &mut group.collapsible,
            _ => return false,
        };
        if *slot == collapsible {
            return false;
        }
        *slot = collapsible;
        self.mark_dirty(id, DirtyFlags::CONTROLS);
        true
    }

    pub fn set_fills_space(&mut self, id: NodeId, fills: bool) -> bool {
        match self.nodes.get_mut(&id) {
            Some(node) if node.fills_space != fills => {
                node.fills_space = fills;
                self.mark_dirty(id, DirtyFlags::FILL_MARKER);
                true
            }
            _ => false,
        }
    }

    pub fn set_collapse_button(&mut self, id: NodeId, state: CollapseButton) -> bool {
        match self.nodes.get_mut(&id) {
            Some(node) if node.collapse_button != state => {
                node.collapse_button = state;
                self.mark_dirty(id, DirtyFlags::CONTROLS);
                true
            }
            _ => false,
        }
    }

    pub fn set_min_width_constraint(&mut self, id: NodeId, min_width: Option<f32>) -> bool {
        match self.nodes.get_mut(&id) {
            Some(node) if node.min_width_constraint != min_width => {
                node.min_width_constraint = min_width;
                self.mark_dirty(id, DirtyFlags::CONSTRAINTS);
                true
            }
            _ => false,
        }
    }

    /// Flag a column as the last of its row.
    pub fn set_is_last(&mut self, column: NodeId, is_last: bool) -> bool {
        match self.get_mut(column).map(|n| &mut n.kind) {
            Some(NodeKind::Column(state)) if state.is_last != is_last => {
                state.is_last = is_last;
                self.mark_dirty(column, DirtyFlags::DECORATION);
                true
            }
            _ => false,
        }
    }

    /// Install or remove a column's trailing resize handle.
    pub fn set_resize_handle(&mut self, column: NodeId, installed: bool) -> bool {
        match self.get_mut(column).map(|n| &mut n.kind) {
            Some(NodeKind::Column(state)) if state.has_resize_handle != installed => {
                state.has_resize_handle = installed;
                self.mark_dirty(column, DirtyFlags::DECORATION);
                true
            }
            _ => false,
        }
    }

    /// Set the column's own minimum width.
    pub fn set_column_min_width(&mut self, column: NodeId, min_width: f32) -> bool {
        match self.get_mut(column).map(|n| &mut n.kind) {
            Some(NodeKind::Column(state)) if state.min_width != min_width => {
                state.min_width = min_width;
                self.mark_dirty(column, DirtyFlags::CONSTRAINTS);
                true
            }
            _ => false,
        }
    }

    /// Select the visible panel of a group (clamped to its panel count).
    pub fn set_active_panel(&mut self, group: NodeId, index: usize) -> bool {
        let count = self.panels(group).len();
        let index = index.min(count.saturating_sub(1));
        match self.get_mut(group).map(|n| &mut n.kind) {
            Some(NodeKind::PanelGroup(state)) if state.active != index => {
                state.active = index;
                self.mark_dirty(group, DirtyFlags::CHILDREN_ORDER);
                true
            }
            _ => false,
        }
    }

    /// Set (or clear) the floating geometry of a panel group.
    pub fn set_floating(&mut self, group: NodeId, rect: Option<LayoutRect>) -> bool {
        match self.get_mut(group).map(|n| &mut n.kind) {
            Some(NodeKind::PanelGroup(state)) if state.floating != rect => {
                state.floating = rect;
                self.mark_dirty(group, DirtyFlags::POSITION);
                true
            }
            _ => false,
        }
    }

    // Placeholder mounting (driven by the placeholder arbiter only)

    /// Mount the placeholder in `parent` before `before` (append on `None`).
    pub(crate) fn mount_placeholder(
        &mut self,
        parent: NodeId,
        before: Option<NodeId>,
        orientation: Orientation,
        size_hint: Option<f32>,
    ) {
        let placeholder = self.placeholder;
        if !self.contains(parent) {
            return;
        }
        self.detach(placeholder);

        let slot = match self.kind(parent) {
            Some(NodeKind::Viewport(viewport)) => before
                .and_then(|b| viewport.tabs.iter().position(|t| *t == b))
                .unwrap_or(viewport.tabs.len()),
            _ => before
                .and_then(|b| self.children(parent).iter().position(|c| *c == b))
                .unwrap_or(self.children(parent).len()),
        };

        let position = before.and_then(|b| self.children(parent).iter().position(|c| *c == b));
        if let Some(node) = self.nodes.get_mut(&parent) {
            match position {
                Some(pos) => node.children.insert(pos, placeholder),
                None => node.children.push(placeholder),
            }
        }
        if let Some(node) = self.nodes.get_mut(&placeholder) {
            node.parent = Some(parent);
            node.kind = NodeKind::Placeholder(PlaceholderState {
                orientation,
                size_hint,
                slot,
            });
        }
        self.mark_dirty(parent, DirtyFlags::LAYOUT);
    }

    /// Detach the placeholder from wherever it is mounted.
    pub(crate) fn unmount_placeholder(&mut self) {
        let placeholder = self.placeholder;
        if let Some(parent) = self.parent(placeholder) {
            self.detach(placeholder);
            self.mark_dirty(parent, DirtyFlags::LAYOUT);
        }
    }

    /// Whether the placeholder is attached to the tree.
    pub fn placeholder_mounted(&self) -> bool {
        self.parent(self.placeholder).is_some()
    }

    /// Whether `ancestor` is `id` or one of its ancestors.
    pub fn is_ancestor_or_self(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            current = self.parent(node);
        }
        false
    }

    /// Size of a node along the given axis from the last layout pass.
    pub fn laid_out_extent(&self, id: NodeId, horizontal: bool) -> f32 {
        self.layout(id)
            .map(|l| if horizontal { l.width } else { l.height })
            .unwrap_or(0.0)
    }

    /// Position of a node's layout center.
    pub fn center(&self, id: NodeId) -> Option<Vec2> {
        self.layout(id).map(|l| l.center())
    }
}

impl Default for DockTree {
    fn default() -> Self {
        Self::new(DockingConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree_with_group() -> (DockTree, NodeId, NodeId, NodeId) {
        let mut tree = DockTree::default();
        let root = tree.root();
        let row = tree.create_row(root, None).unwrap();
        let column = tree.create_column(row, None).unwrap();
        let group = tree.create_panel_group();
        tree.add_panel_group(column, group, None).unwrap();
        (tree, row, column, group)
    }

    #[test]
    fn test_create_row_emits_event() {
        let mut tree = DockTree::default();
        let root = tree.root();
        let before = tree.structure_version();
        let row = tree.create_row(root, None).unwrap();

        assert_eq!(tree.rows(root), vec![row]);
        assert!(tree.structure_version() > before);
        assert_eq!(tree.drain_events(), vec![LayoutEvent::RowsChanged(root)]);
    }

    #[test]
    fn test_create_row_at_index() {
        let mut tree = DockTree::default();
        let root = tree.root();
        let a = tree.create_row(root, None).unwrap();
        let b = tree.create_row(root, None).unwrap();
        let c = tree.create_row(root, Some(1)).unwrap();
        assert_eq!(tree.rows(root), vec![a, c, b]);
    }

    #[test]
    fn test_wrong_kind_is_rejected() {
        let mut tree = DockTree::default();
        let root = tree.root();
        let row = tree.create_row(root, None).unwrap();
        assert!(matches!(
            tree.create_row(row, None),
            Err(DockError::InvalidNodeKind { found: "row", .. })
        ));
    }

    #[test]
    fn test_add_attached_group_is_rejected() {
        let (mut tree, _, column, group) = tree_with_group();
        assert_eq!(
            tree.add_panel_group(column, group, None),
            Err(DockError::AlreadyAttached(group))
        );
    }

    #[test]
    fn test_remove_last_group_keeps_landing_column() {
        let (mut tree, row, column, group) = tree_with_group();
        tree.remove_panel_group(column, group).unwrap();
        assert!(tree.contains(column));
        assert_eq!(tree.columns(row), vec![column]);
        assert_eq!(tree.parent(group), None);
    }

    #[test]
    fn test_remove_group_prunes_empty_column_and_row() {
        let (mut tree, row, column, group) = tree_with_group();
        let root = tree.root();
        let other_row = tree.create_row(root, None).unwrap();
        tree.create_column(other_row, None).unwrap();
        tree.drain_events();

        tree.remove_panel_group(column, group).unwrap();

        assert!(!tree.contains(column));
        assert!(!tree.contains(row));
        assert_eq!(tree.rows(root), vec![other_row]);
        let events = tree.drain_events();
        assert!(events.contains(&LayoutEvent::ChildrenChanged(column)));
        assert!(events.contains(&LayoutEvent::ColumnsChanged(row)));
        assert!(events.contains(&LayoutEvent::RowsChanged(root)));
    }

    #[test]
    fn test_remove_panel_reports_empty_group() {
        let (mut tree, _, _, group) = tree_with_group();
        let a = tree.create_panel("A", 80.0);
        let b = tree.create_panel("B", 120.0);
        tree.add_panel(group, a, None).unwrap();
        tree.add_panel(group, b, None).unwrap();

        assert_eq!(tree.group_min_width(group), 120.0);
        assert_eq!(tree.panel_group(group).unwrap().active, 1);
        assert_eq!(tree.remove_panel(group, b), Ok(false));
        assert_eq!(tree.remove_panel(group, a), Ok(true));
    }

    #[test]
    fn test_setters_only_dirty_on_change() {
        let (mut tree, row, _, _) = tree_with_group();
        tree.clear_dirty_flags();

        assert!(!tree.set_size(row, None));
        assert!(!tree.is_dirty());

        assert!(tree.set_size(row, Some(120.0)));
        assert_eq!(tree.dirty_nodes(), vec![row]);
        assert_eq!(tree.explicit_size(row), Some(Some(120.0)));
    }

    #[test]
    fn test_placeholder_mount_skips_sibling_indices() {
        let mut tree = DockTree::default();
        let root = tree.root();
        let a = tree.create_row(root, None).unwrap();
        let b = tree.create_row(root, None).unwrap();
        let version = tree.structure_version();

        tree.mount_placeholder(root, Some(b), Orientation::Horizontal, Some(30.0));

        assert!(tree.placeholder_mounted());
        assert_eq!(tree.children(root), &[a, tree.placeholder_id(), b]);
        assert_eq!(tree.sibling_index(b), Some(1));
        assert_eq!(tree.rows(root), vec![a, b]);
        assert_eq!(tree.structure_version(), version);

        tree.unmount_placeholder();
        assert!(!tree.placeholder_mounted());
        assert_eq!(tree.children(root), &[a, b]);
    }

    #[test]
    fn test_dock_and_undock_window() {
        let (mut tree, _, column, _) = tree_with_group();
        let viewport = tree.create_viewport(column, None).unwrap();
        let w1 = tree.add_window(viewport, "One", LayoutRect::new(0.0, 0.0, 200.0, 100.0)).unwrap();
        let w2 = tree.add_window(viewport, "Two", LayoutRect::new(0.0, 0.0, 200.0, 100.0)).unwrap();

        tree.dock_window(viewport, w1, None).unwrap();
        tree.dock_window(viewport, w2, Some(0)).unwrap();
        assert_eq!(tree.viewport(viewport).unwrap().tabs, vec![w2, w1]);

        tree.reorder_tab(viewport, w2, 2).unwrap();
        assert_eq!(tree.viewport(viewport).unwrap().tabs, vec![w1, w2]);

        tree.undock_window(viewport, w2, 30.0, 40.0).unwrap();
        let state = tree.window(w2).unwrap();
        assert!(!state.tabbed);
        assert_eq!((state.x, state.y), (30.0, 40.0));
        assert_eq!(tree.viewport(viewport).unwrap().active_tab, Some(w1));
    }
}
