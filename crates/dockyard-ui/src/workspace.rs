//! A dock tree bundled with the services that act on it.

use dockyard_core::geometry::Size;
use dockyard_core::math::Vec2;
use dockyard_core::profiling::profile_function;

use crate::config::DockingConfig;
use crate::dnd::{DragDropService, DragPayload, DraggedData};
use crate::floating::FloatingPanelManager;
use crate::layout_service::LayoutService;
use crate::operations::DockResult;
use crate::persistence::LayoutSnapshot;
use crate::tree::DockTree;

/// One docking surface: the tree, its floating layer, the reconciler and the
/// drag-and-drop service.
///
/// Structural changes are reconciled and laid out in [`update`](Self::update);
/// a completed drop runs it automatically.
///
/// # Example
///
/// ```
/// use dockyard_core::geometry::Size;
/// use dockyard_ui::{DockWorkspace, DockingConfig};
///
/// let mut workspace = DockWorkspace::new(DockingConfig::default());
/// workspace.resize(Size::new(800.0, 600.0)).unwrap();
///
/// let root = workspace.tree().root();
/// let row = workspace.tree().rows(root)[0];
/// let column = workspace.tree().columns(row)[0];
///
/// let tree = workspace.tree_mut();
/// let group = tree.create_panel_group();
/// let panel = tree.create_panel("Console", 0.0);
/// tree.add_panel(group, panel, None).unwrap();
/// tree.add_panel_group(column, group, None).unwrap();
///
/// workspace.update().unwrap();
/// assert!(workspace.tree().get(group).unwrap().fills_space);
/// ```
#[derive(Debug)]
pub struct DockWorkspace {
    tree: DockTree,
    floating: FloatingPanelManager,
    layout: LayoutService,
    drag: DragDropService,
}

impl DockWorkspace {
    /// An empty workspace with one landing row and column.
    pub fn new(config: DockingConfig) -> Self {
        let mut layout = LayoutService::new();
        // An empty snapshot only creates the landing row and column.
        let (tree, floating) = match LayoutSnapshot::default().restore(config.clone(), &mut layout) {
            Ok(restored) => restored,
            Err(err) => {
                tracing::error!(%err, "failed to create landing column");
                (DockTree::new(config), FloatingPanelManager::new())
            }
        };
        Self {
            tree,
            floating,
            layout,
            drag: DragDropService::new(),
        }
    }

    /// Build a workspace from a saved snapshot.
    pub fn from_snapshot(snapshot: &LayoutSnapshot, config: DockingConfig) -> DockResult<Self> {
        let mut layout = LayoutService::new();
        let (tree, floating) = snapshot.restore(config, &mut layout)?;
        Ok(Self {
            tree,
            floating,
            layout,
            drag: DragDropService::new(),
        })
    }

    /// Build a workspace from snapshot JSON, migrating legacy columns.
    pub fn load_json(json: &str, config: DockingConfig) -> DockResult<Self> {
        Self::from_snapshot(&LayoutSnapshot::from_json(json)?, config)
    }

    pub fn snapshot(&self) -> LayoutSnapshot {
        LayoutSnapshot::capture(&self.tree, &self.floating)
    }

    pub fn save_json(&self) -> DockResult<String> {
        self.snapshot().to_json()
    }

    pub fn tree(&self) -> &DockTree {
        &self.tree
    }

    /// Mutable tree access. Call [`update`](Self::update) after structural edits.
    pub fn tree_mut(&mut self) -> &mut DockTree {
        &mut self.tree
    }

    pub fn floating(&self) -> &FloatingPanelManager {
        &self.floating
    }

    pub fn drag(&self) -> &DragDropService {
        &self.drag
    }

    pub fn layout_service(&self) -> &LayoutService {
        &self.layout
    }

    /// Lay the tree out inside a window of `size`.
    pub fn resize(&mut self, size: Size<f32>) -> DockResult<()> {
        self.layout.process_events(&mut self.tree);
        self.tree.compute_layout(size)
    }

    /// Reconcile pending layout events and relayout if anything moved.
    ///
    /// Returns the number of layout events handled.
    pub fn update(&mut self) -> DockResult<usize> {
        profile_function!();
        let handled = self.layout.process_events(&mut self.tree);
        self.floating.prune(&self.tree);
        if self.tree.needs_layout() {
            self.tree.relayout()?;
        }
        Ok(handled)
    }

    /// Start dragging `payload`, grabbed at `position`.
    ///
    /// The grab offset is measured from the payload's laid-out top-left corner.
    pub fn begin_drag(&mut self, payload: DragPayload, position: Vec2) {
        let offset = self
            .tree
            .layout(payload.node())
            .map(|rect| position - rect.position())
            .unwrap_or(Vec2::ZERO);
        self.drag
            .begin_drag(&mut self.tree, DraggedData::new(payload, offset), position);
    }

    /// Move the pointer. Returns whether releasing here would drop.
    pub fn drag_to(&mut self, position: Vec2) -> bool {
        self.drag.drag_move(&mut self.tree, &mut self.floating, position)
    }

    /// Release the pointer. Returns whether the tree changed.
    pub fn release(&mut self, position: Vec2) -> DockResult<bool> {
        let dropped = self.drag.drop(&mut self.tree, &mut self.floating, position);
        self.update()?;
        Ok(dropped)
    }

    /// Abort the current drag, leaving the tree as it was.
    pub fn cancel_drag(&mut self) -> DockResult<()> {
        self.drag.cancel(&mut self.tree, &mut self.floating);
        self.update().map(|_| ())
    }
}

impl Default for DockWorkspace {
    fn default() -> Self {
        Self::new(DockingConfig::default())
    }
}
