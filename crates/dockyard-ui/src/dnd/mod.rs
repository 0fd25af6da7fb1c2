//! Drag-and-drop docking.
//!
//! Each kind of drop zone has a [`DropStrategy`] that decides where a dragged
//! item would land (placeholder feedback during Over) and what happens to the
//! tree on Drop. The [`DragDropService`] resolves the zone under the pointer
//! and drives the strategies through their Enter/Over/Leave/Drop lifecycle.

pub mod column;
pub mod container;
pub mod geometry_cache;
pub mod panel_group;
pub mod placeholder;
pub mod row;
pub mod service;
pub mod strategy;
pub mod tab_strip;
pub mod types;
pub mod undock;
pub mod viewport;

pub use column::ColumnDropStrategy;
pub use container::ContainerDropStrategy;
pub use geometry_cache::{Axis, GeometryCache, GeometryCacheEntry};
pub use panel_group::PanelGroupDropStrategy;
pub use placeholder::Placeholder;
pub use row::RowDropStrategy;
pub use service::{DragDropService, Ghost, StrategyFactory};
pub use strategy::{DropContext, DropStrategy, gated_drop, targets_zone, ungated_drop};
pub use tab_strip::TabStripDropStrategy;
pub use types::{DragPayload, DragPoint, DraggedData, DropZone, DropZoneKind, GhostOrigin, Orientation};
pub use undock::UndockDropStrategy;
pub use viewport::ViewportDropStrategy;
