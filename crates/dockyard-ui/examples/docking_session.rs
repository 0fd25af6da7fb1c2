//! Docking Session - a scripted drag-and-drop session without a window
//!
//! This example shows the docking engine end to end:
//! - Building a workspace with panel groups and an application viewport
//! - Dragging a group between rows, docking a window as a tab
//! - Undocking a group into the floating layer
//! - Saving the result as JSON
//!
//! Run with `RUST_LOG=dockyard_ui=trace` to follow every drop decision.
//! Connect puffin_viewer to http://127.0.0.1:8585 to see the profile.

use dockyard_core::geometry::Size;
use dockyard_core::logging;
use dockyard_core::math::Vec2;
use dockyard_core::profiling::{ProfilingBackend, init_profiling, new_frame};
use dockyard_ui::{DockResult, DockWorkspace, DockingConfig, DragPayload, LayoutRect, NodeId};

const WINDOW: Size<f32> = Size {
    width: 1280.0,
    height: 720.0,
};

fn add_group(workspace: &mut DockWorkspace, column: NodeId, titles: &[&str]) -> DockResult<NodeId> {
    let tree = workspace.tree_mut();
    let group = tree.create_panel_group();
    for title in titles {
        let panel = tree.create_panel(*title, 120.0);
        tree.add_panel(group, panel, None)?;
    }
    tree.add_panel_group(column, group, None)?;
    Ok(group)
}

/// Grab `payload` near its top-left corner and release it at `to`.
fn drag(workspace: &mut DockWorkspace, payload: DragPayload, to: Vec2) -> DockResult<bool> {
    let from = workspace
        .tree()
        .layout(payload.node())
        .map(|rect| rect.position() + Vec2::new(8.0, 8.0))
        .unwrap_or(Vec2::ZERO);
    workspace.begin_drag(payload, from);
    // A few intermediate samples, like a real pointer.
    for step in 1..=4 {
        new_frame();
        let t = step as f32 / 4.0;
        workspace.drag_to(from + (to - from) * t);
    }
    workspace.release(to)
}

fn main() -> DockResult<()> {
    logging::init();
    init_profiling(ProfilingBackend::PuffinHttp);

    let mut workspace = DockWorkspace::new(DockingConfig::default().gutter(6.0));
    let root = workspace.tree().root();
    let top = workspace.tree().rows(root)[0];
    let left = workspace.tree().columns(top)[0];

    let explorer = add_group(&mut workspace, left, &["Explorer", "Search"])?;
    let outline = add_group(&mut workspace, left, &["Outline"])?;

    let tree = workspace.tree_mut();
    let right = tree.create_column(top, None)?;
    let viewport = tree.create_viewport(right, None)?;
    let editor = tree.add_window(viewport, "main.rs", LayoutRect::new(40.0, 80.0, 480.0, 320.0))?;
    let bottom = tree.create_row(root, None)?;
    let bottom_column = tree.create_column(bottom, None)?;
    add_group(&mut workspace, bottom_column, &["Terminal", "Problems"])?;

    workspace.resize(WINDOW)?;
    workspace.update()?;

    // Outline into the gutter between the two rows: a new middle row.
    let top_rect = workspace.tree().layout(top).unwrap_or_default();
    let gutter = Vec2::new(WINDOW.width / 4.0, top_rect.y + top_rect.height + 3.0);
    let moved = drag(&mut workspace, DragPayload::PanelGroup(outline), gutter)?;
    tracing::info!(moved, rows = workspace.tree().rows(root).len(), "outline moved");

    // The editor window into the viewport's dock band: it becomes the first tab.
    let band = workspace
        .tree()
        .layout(viewport)
        .map(|rect| Vec2::new(rect.x + rect.width / 2.0, rect.y + 12.0))
        .unwrap_or(Vec2::ZERO);
    let docked = drag(&mut workspace, DragPayload::Window(editor), band)?;
    tracing::info!(docked, tabs = ?workspace.tree().viewport(viewport).map(|v| v.tabs.len()), "editor docked");

    // The explorer out of the window: it floats.
    let outside = Vec2::new(WINDOW.width + 40.0, 120.0);
    let floated = drag(&mut workspace, DragPayload::PanelGroup(explorer), outside)?;
    tracing::info!(floated, floating = workspace.floating().floating_panels().len(), "explorer undocked");

    println!("{}", workspace.save_json()?);
    Ok(())
}
