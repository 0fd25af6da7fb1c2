//! Dockyard UI - docking layout engine
//!
//! This crate provides the model and behavior behind a dockable workspace:
//! - A dock tree of rows, columns, panel groups and application viewports
//! - Flexbox layout via Taffy
//! - Drag-and-drop docking with per-zone drop strategies
//! - Layout reconciliation after every structural change
//! - JSON snapshots with migration of older layouts
//!
//! ## Quick Start
//!
//! ```rust
//! use dockyard_core::geometry::Size;
//! use dockyard_core::math::Vec2;
//! use dockyard_ui::{DockWorkspace, DockingConfig, DragPayload};
//!
//! let mut workspace = DockWorkspace::new(DockingConfig::default());
//! let root = workspace.tree().root();
//! let column = workspace.tree().columns(workspace.tree().rows(root)[0])[0];
//!
//! let tree = workspace.tree_mut();
//! let group = tree.create_panel_group();
//! let panel = tree.create_panel("Inspector", 0.0);
//! tree.add_panel(group, panel, None).unwrap();
//! tree.add_panel_group(column, group, None).unwrap();
//! workspace.resize(Size::new(1024.0, 768.0)).unwrap();
//!
//! // Pointer down on the group header, move, release.
//! workspace.begin_drag(DragPayload::PanelGroup(group), Vec2::new(10.0, 10.0));
//! workspace.drag_to(Vec2::new(500.0, 400.0));
//! workspace.release(Vec2::new(500.0, 400.0)).unwrap();
//! ```

pub mod config;
pub mod dirty;
pub mod dnd;
pub mod events;
pub mod floating;
pub mod layout;
pub mod layout_service;
pub mod operations;
pub mod persistence;
pub mod tree;
pub mod workspace;

pub use config::DockingConfig;
pub use dirty::DirtyFlags;
pub use events::{LayoutEvent, LayoutEventQueue};
pub use floating::FloatingPanelManager;
pub use layout_service::LayoutService;
pub use operations::{DockError, DockResult};
pub use persistence::LayoutSnapshot;
pub use tree::{CollapseButton, DockNode, DockTree, LayoutRect, NodeId, NodeKind};
pub use workspace::DockWorkspace;

// Re-export main drag-and-drop types
pub use dnd::{
    DragDropService, DragPayload, DragPoint, DraggedData, DropContext, DropStrategy, DropZone,
    DropZoneKind, Orientation, Placeholder,
};
