//! Loading and saving layouts, including layouts written by older builds.

use dockyard_core::geometry::Size;
use dockyard_core::math::Vec2;
use dockyard_ui::persistence::ColumnChildSnapshot;
use dockyard_ui::{
    CollapseButton, DockError, DockWorkspace, DockingConfig, DragPayload, LayoutService, LayoutSnapshot,
};

const FULL_LAYOUT: &str = r#"{
    "rows": [
        {
            "height": 180,
            "columns": [
                {
                    "width": 260,
                    "children": [
                        {
                            "type": "panelGroup",
                            "height": 120,
                            "active": 1,
                            "panels": [{"title": "Files", "minWidth": 140}, {"title": "Search"}]
                        },
                        {"type": "panelGroup", "panels": [{"title": "Outline"}]}
                    ]
                },
                {
                    "children": [
                        {
                            "type": "viewport",
                            "activeTab": 0,
                            "windows": [
                                {"title": "main.rs", "width": 300, "height": 200, "tabbed": true},
                                {"title": "lib.rs", "width": 300, "height": 200, "tabbed": true},
                                {"title": "notes.md", "x": 40, "y": 60, "width": 200, "height": 150, "minimized": true}
                            ]
                        }
                    ]
                }
            ]
        },
        {
            "columns": [
                {"children": [{"type": "panelGroup", "panels": [{"title": "Terminal"}]}]}
            ]
        }
    ],
    "floating": [
        {"x": 500, "y": 80, "width": 240, "height": 160, "group": {"panels": [{"title": "Inspector"}]}}
    ]
}"#;

#[test]
fn test_load_full_layout() {
    let workspace = DockWorkspace::load_json(FULL_LAYOUT, DockingConfig::default()).unwrap();
    let tree = workspace.tree();
    let rows = tree.rows(tree.root());
    assert_eq!(rows.len(), 2);
    assert_eq!(tree.explicit_size(rows[0]), Some(Some(180.0)));
    assert!(tree.get(rows[1]).unwrap().fills_space);

    let columns = tree.columns(rows[0]);
    assert_eq!(columns.len(), 2);
    assert_eq!(tree.explicit_size(columns[0]), Some(Some(260.0)));
    assert_eq!(tree.get(columns[0]).unwrap().min_width_constraint, Some(140.0));

    let groups = tree.panel_groups(columns[0]);
    assert_eq!(tree.panel_group(groups[0]).unwrap().active, 1);
    assert_eq!(tree.explicit_size(groups[0]), Some(Some(120.0)));
    assert!(tree.get(groups[1]).unwrap().fills_space);

    let viewport_id = tree.column_children(columns[1])[0];
    let viewport = tree.viewport(viewport_id).unwrap();
    let windows = tree.windows(viewport_id);
    assert_eq!(viewport.tabs, vec![windows[0], windows[1]]);
    assert_eq!(viewport.active_tab, Some(windows[0]));
    let notes = tree.window(windows[2]).unwrap();
    assert!(notes.minimized && !notes.tabbed);
    assert_eq!(tree.get(viewport_id).unwrap().collapse_button, CollapseButton::Hidden);

    let floating = workspace.floating().floating_panels();
    assert_eq!(floating.len(), 1);
    let rect = tree.panel_group(floating[0]).unwrap().floating.unwrap();
    assert_eq!((rect.x, rect.y, rect.width, rect.height), (500.0, 80.0, 240.0, 160.0));
}

#[test]
fn test_save_then_load_is_stable() {
    let workspace = DockWorkspace::load_json(FULL_LAYOUT, DockingConfig::default()).unwrap();
    let json = workspace.save_json().unwrap();
    assert!(json.contains(r#""type": "panelGroup""#));
    assert!(json.contains(r#""type": "viewport""#));
    // Legacy keys are read but never written.
    assert!(!json.contains("panelGroups"));

    let reloaded = DockWorkspace::load_json(&json, DockingConfig::default()).unwrap();
    assert_eq!(reloaded.snapshot(), workspace.snapshot());
}

#[test]
fn test_restore_reconciles_once() {
    let snapshot = LayoutSnapshot::from_json(FULL_LAYOUT).unwrap();
    let mut service = LayoutService::new();
    let (tree, _) = snapshot.restore(DockingConfig::default(), &mut service).unwrap();

    // One rows pass, one pass per row and one per column.
    assert_eq!(service.reconciliations(), 1 + 2 + 3);
    assert!(tree.pending_events().is_empty());
}

#[test]
fn test_legacy_flat_panel_groups() {
    let json = r#"{
        "rows": [{"columns": [{"panelGroups": [
            {"title": "Problems", "height": 90},
            {"title": "Output", "minWidth": 200}
        ]}]}]
    }"#;
    let workspace = DockWorkspace::load_json(json, DockingConfig::default()).unwrap();
    let tree = workspace.tree();
    let column = tree.columns(tree.rows(tree.root())[0])[0];
    let groups = tree.panel_groups(column);
    assert_eq!(groups.len(), 2);
    assert_eq!(tree.explicit_size(groups[0]), Some(Some(90.0)));
    assert!(tree.get(groups[1]).unwrap().fills_space);
    assert_eq!(tree.get(column).unwrap().min_width_constraint, Some(200.0));

    // Saved back in the current shape.
    let snapshot = workspace.snapshot();
    let column = &snapshot.rows[0].columns[0];
    assert!(column.panel_groups.is_empty() && column.panels.is_empty());
    assert_eq!(column.children.len(), 2);
    assert!(matches!(&column.children[0], ColumnChildSnapshot::PanelGroup(g) if g.panels[0].title == "Problems"));
}

#[test]
fn test_all_rows_collapsed_on_disk() {
    let json = r#"{"rows": [
        {"collapsed": true, "height": 100},
        {"collapsed": true, "height": 100},
        {"collapsed": true, "height": 100}
    ]}"#;
    let workspace = DockWorkspace::load_json(json, DockingConfig::default()).unwrap();
    let tree = workspace.tree();
    let rows = tree.rows(tree.root());
    assert_eq!(rows.len(), 3);
    assert!(!tree.is_collapsed(rows[2]));
    assert!(tree.get(rows[2]).unwrap().fills_space);
    assert_eq!(tree.get(rows[2]).unwrap().collapse_button, CollapseButton::Disabled);
    // Each restored row got a landing column.
    assert!(rows.iter().all(|r| tree.columns(*r).len() == 1));
}

#[test]
fn test_malformed_json_is_reported() {
    let err = DockWorkspace::load_json("{\"rows\": 3}", DockingConfig::default()).unwrap_err();
    assert!(matches!(err, DockError::Serialization(_)));
}

#[test]
fn test_undocked_group_is_saved_as_floating() {
    let mut workspace = DockWorkspace::load_json(FULL_LAYOUT, DockingConfig::default()).unwrap();
    workspace.resize(Size::new(1000.0, 700.0)).unwrap();
    let tree = workspace.tree();
    let bottom_row = tree.rows(tree.root())[1];
    let terminal = tree.column_children(tree.columns(bottom_row)[0])[0];
    let start = tree.layout(terminal).unwrap().position() + Vec2::new(10.0, 10.0);

    workspace.begin_drag(DragPayload::PanelGroup(terminal), start);
    let outside = Vec2::new(1200.0, 300.0);
    assert!(workspace.drag_to(outside));
    assert!(workspace.release(outside).unwrap());

    let snapshot = workspace.snapshot();
    // The bottom row emptied and was pruned.
    assert_eq!(snapshot.rows.len(), 1);
    assert_eq!(snapshot.floating.len(), 2);
    let saved = &snapshot.floating[1];
    assert_eq!((saved.x, saved.y), (1190.0, 290.0));
    assert_eq!(saved.group.panels[0].title, "Terminal");
}
