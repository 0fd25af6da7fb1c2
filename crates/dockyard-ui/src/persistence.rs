//! JSON snapshots of the dock layout.
//!
//! The snapshot mirrors the tree: rows hold columns, columns hold panel groups
//! and at most one viewport. Columns written by older builds list bare
//! `panels` (or `panelGroups` of single panels); each one is restored as its
//! own panel group.

use serde::{Deserialize, Serialize};

use crate::config::DockingConfig;
use crate::floating::FloatingPanelManager;
use crate::layout_service::LayoutService;
use crate::operations::{DockError, DockResult};
use crate::tree::{DockTree, LayoutRect, NodeId, NodeKind};

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutSnapshot {
    #[serde(default)]
    pub rows: Vec<RowSnapshot>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub floating: Vec<FloatingSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowSnapshot {
    #[serde(default)]
    pub height: Option<f32>,
    #[serde(default)]
    pub collapsed: bool,
    #[serde(default = "default_true")]
    pub collapsible: bool,
    #[serde(default)]
    pub columns: Vec<ColumnSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnSnapshot {
    #[serde(default)]
    pub width: Option<f32>,
    #[serde(default)]
    pub min_width: Option<f32>,
    #[serde(default)]
    pub children: Vec<ColumnChildSnapshot>,
    /// Older builds: bare panels without groups.
    #[serde(default, skip_serializing)]
    pub panels: Vec<LegacyPanelSnapshot>,
    /// Older builds: one panel per group, stored flat.
    #[serde(default, skip_serializing)]
    pub panel_groups: Vec<LegacyPanelSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ColumnChildSnapshot {
    PanelGroup(PanelGroupSnapshot),
    Viewport(ViewportSnapshot),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelGroupSnapshot {
    #[serde(default)]
    pub height: Option<f32>,
    #[serde(default)]
    pub collapsed: bool,
    #[serde(default = "default_true")]
    pub collapsible: bool,
    #[serde(default)]
    pub active: usize,
    #[serde(default)]
    pub panels: Vec<PanelSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelSnapshot {
    pub title: String,
    #[serde(default)]
    pub min_width: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyPanelSnapshot {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub height: Option<f32>,
    #[serde(default)]
    pub collapsed: bool,
    #[serde(default)]
    pub min_width: f32,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewportSnapshot {
    #[serde(default)]
    pub height: Option<f32>,
    /// Tabbed windows first (in tab order), then floating windows bottom-most first.
    #[serde(default)]
    pub windows: Vec<WindowSnapshot>,
    /// Index into `windows` of the active tab.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_tab: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowSnapshot {
    pub title: String,
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
    pub width: f32,
    pub height: f32,
    #[serde(default)]
    pub minimized: bool,
    #[serde(default)]
    pub tabbed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FloatingSnapshot {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub group: PanelGroupSnapshot,
}

impl LayoutSnapshot {
    pub fn from_json(json: &str) -> DockResult<Self> {
        serde_json::from_str(json).map_err(|e| DockError::Serialization(e.to_string()))
    }

    pub fn to_json(&self) -> DockResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| DockError::Serialization(e.to_string()))
    }

    /// Capture the docked layout and the floating groups.
    pub fn capture(tree: &DockTree, floating: &FloatingPanelManager) -> Self {
        let root = tree.root();
        let rows = tree
            .rows(root)
            .into_iter()
            .filter_map(|row| capture_row(tree, row))
            .collect();
        let floating = floating
            .floating_panels()
            .iter()
            .filter_map(|group| {
                let rect = tree.panel_group(*group)?.floating?;
                Some(FloatingSnapshot {
                    x: rect.x,
                    y: rect.y,
                    width: rect.width,
                    height: rect.height,
                    group: capture_group(tree, *group)?,
                })
            })
            .collect();
        Self { rows, floating }
    }

    /// Build a tree from the snapshot and reconcile it once.
    pub fn restore(
        &self,
        config: DockingConfig,
        service: &mut LayoutService,
    ) -> DockResult<(DockTree, FloatingPanelManager)> {
        let mut tree = DockTree::new(config);
        let mut floating = FloatingPanelManager::new();
        let root = tree.root();

        for row_snapshot in &self.rows {
            let row = tree.create_row(root, None)?;
            tree.set_size(row, row_snapshot.height);
            tree.set_collapsed(row, row_snapshot.collapsed);
            tree.set_collapsible(row, row_snapshot.collapsible);
            for column_snapshot in &row_snapshot.columns {
                restore_column(&mut tree, row, column_snapshot)?;
            }
            if tree.columns(row).is_empty() {
                tree.create_column(row, None)?;
            }
        }
        if tree.rows(root).is_empty() {
            let row = tree.create_row(root, None)?;
            tree.create_column(row, None)?;
        }

        for entry in &self.floating {
            let group = restore_group(&mut tree, &entry.group)?;
            let rect = LayoutRect::new(entry.x, entry.y, entry.width, entry.height);
            floating.add_floating_panel(&mut tree, group, rect)?;
        }

        // The incremental events are superseded by one full pass.
        tree.drain_events();
        service.full_reinitialize(&mut tree, root);
        tracing::debug!(rows = self.rows.len(), floating = self.floating.len(), "layout restored");
        Ok((tree, floating))
    }
}

fn capture_row(tree: &DockTree, row: NodeId) -> Option<RowSnapshot> {
    let state = tree.row(row)?;
    Some(RowSnapshot {
        height: state.height,
        collapsed: state.collapsed,
        collapsible: state.collapsible,
        columns: tree
            .columns(row)
            .into_iter()
            .filter_map(|column| capture_column(tree, column))
            .collect(),
    })
}

fn capture_column(tree: &DockTree, column: NodeId) -> Option<ColumnSnapshot> {
    let state = tree.column(column)?;
    let children = tree
        .column_children(column)
        .into_iter()
        .filter_map(|child| match tree.kind(child)? {
            NodeKind::PanelGroup(_) => capture_group(tree, child).map(ColumnChildSnapshot::PanelGroup),
            NodeKind::Viewport(_) => capture_viewport(tree, child).map(ColumnChildSnapshot::Viewport),
            _ => None,
        })
        .collect();
    Some(ColumnSnapshot {
        width: state.width,
        min_width: Some(state.min_width),
        children,
        ..ColumnSnapshot::default()
    })
}

fn capture_group(tree: &DockTree, group: NodeId) -> Option<PanelGroupSnapshot> {
    let state = tree.panel_group(group)?;
    Some(PanelGroupSnapshot {
        height: state.height,
        collapsed: state.collapsed,
        collapsible: state.collapsible,
        active: state.active,
        panels: tree
            .panels(group)
            .into_iter()
            .filter_map(|panel| tree.panel(panel))
            .map(|panel| PanelSnapshot {
                title: panel.title.clone(),
                min_width: panel.min_width,
            })
            .collect(),
    })
}

fn capture_viewport(tree: &DockTree, viewport: NodeId) -> Option<ViewportSnapshot> {
    let state = tree.viewport(viewport)?;
    let floating = tree
        .windows(viewport)
        .into_iter()
        .filter(|w| !state.tabs.contains(w));
    let order: Vec<NodeId> = state.tabs.iter().copied().chain(floating).collect();
    let windows = order
        .iter()
        .filter_map(|id| tree.window(*id))
        .map(|w| WindowSnapshot {
            title: w.title.clone(),
            x: w.x,
            y: w.y,
            width: w.width,
            height: w.height,
            minimized: w.minimized,
            tabbed: w.tabbed,
        })
        .collect();
    Some(ViewportSnapshot {
        height: state.height,
        windows,
        active_tab: state
            .active_tab
            .and_then(|active| order.iter().position(|w| *w == active)),
    })
}

fn restore_column(tree: &mut DockTree, row: NodeId, snapshot: &ColumnSnapshot) -> DockResult<NodeId> {
    let column = tree.create_column(row, None)?;
    tree.set_size(column, snapshot.width);
    if let Some(min_width) = snapshot.min_width {
        tree.set_column_min_width(column, min_width);
    }

    for child in &snapshot.children {
        match child {
            ColumnChildSnapshot::PanelGroup(group_snapshot) => {
                let group = restore_group(tree, group_snapshot)?;
                tree.add_panel_group(column, group, None)?;
            }
            ColumnChildSnapshot::Viewport(viewport_snapshot) => {
                restore_viewport(tree, column, viewport_snapshot)?;
            }
        }
    }

    let legacy = snapshot.panels.iter().chain(&snapshot.panel_groups);
    for panel_snapshot in legacy {
        tracing::debug!(title = %panel_snapshot.title, "migrating legacy panel into its own group");
        let group = tree.create_panel_group();
        let panel = tree.create_panel(panel_snapshot.title.clone(), panel_snapshot.min_width);
        tree.add_panel(group, panel, None)?;
        tree.set_size(group, panel_snapshot.height);
        tree.set_collapsed(group, panel_snapshot.collapsed);
        tree.add_panel_group(column, group, None)?;
    }
    Ok(column)
}

fn restore_group(tree: &mut DockTree, snapshot: &PanelGroupSnapshot) -> DockResult<NodeId> {
    let group = tree.create_panel_group();
    for panel_snapshot in &snapshot.panels {
        let panel = tree.create_panel(panel_snapshot.title.clone(), panel_snapshot.min_width);
        tree.add_panel(group, panel, None)?;
    }
    tree.set_size(group, snapshot.height);
    tree.set_collapsed(group, snapshot.collapsed);
    tree.set_collapsible(group, snapshot.collapsible);
    tree.set_active_panel(group, snapshot.active);
    Ok(group)
}

fn restore_viewport(tree: &mut DockTree, column: NodeId, snapshot: &ViewportSnapshot) -> DockResult<NodeId> {
    let viewport = tree.create_viewport(column, None)?;
    tree.set_size(viewport, snapshot.height);
    let mut restored = Vec::with_capacity(snapshot.windows.len());
    for window_snapshot in &snapshot.windows {
        let rect = LayoutRect::new(
            window_snapshot.x,
            window_snapshot.y,
            window_snapshot.width,
            window_snapshot.height,
        );
        let window = tree.add_window(viewport, window_snapshot.title.clone(), rect)?;
        tree.set_minimized(window, window_snapshot.minimized)?;
        if window_snapshot.tabbed {
            tree.dock_window(viewport, window, None)?;
        }
        restored.push(window);
    }
    if let Some(&active) = snapshot.active_tab.and_then(|i| restored.get(i))
        && tree.window(active).is_some_and(|w| w.tabbed)
    {
        let slot = tree
            .viewport(viewport)
            .and_then(|v| v.tabs.iter().position(|t| *t == active));
        tree.dock_window(viewport, active, slot)?;
    }
    Ok(viewport)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_panels_become_groups() {
        let json = r#"{
            "rows": [{
                "height": null,
                "columns": [{
                    "width": 240,
                    "panels": [
                        {"title": "Files", "height": 120},
                        {"title": "Outline", "collapsed": true}
                    ]
                }]
            }]
        }"#;
        let snapshot = LayoutSnapshot::from_json(json).unwrap();
        let (tree, _) = snapshot
            .restore(DockingConfig::default(), &mut LayoutService::new())
            .unwrap();

        let row = tree.rows(tree.root())[0];
        let column = tree.columns(row)[0];
        let groups = tree.panel_groups(column);
        assert_eq!(groups.len(), 2);
        let titles: Vec<&str> = groups
            .iter()
            .map(|g| tree.panel(tree.panels(*g)[0]).unwrap().title.as_str())
            .collect();
        assert_eq!(titles, vec!["Files", "Outline"]);
        assert!(tree.is_collapsed(groups[1]));
        // The collapsed group cannot fill, so the first one does.
        assert!(tree.get(groups[0]).unwrap().fills_space);
        assert_eq!(tree.explicit_size(groups[0]), Some(None));
    }

    #[test]
    fn test_unknown_child_type_is_an_error() {
        let json = r#"{"rows": [{"columns": [{"children": [{"type": "spreadsheet"}]}]}]}"#;
        assert!(matches!(
            LayoutSnapshot::from_json(json),
            Err(DockError::Serialization(_))
        ));
    }

    #[test]
    fn test_empty_snapshot_keeps_landing_column() {
        let (tree, _) = LayoutSnapshot::default()
            .restore(DockingConfig::default(), &mut LayoutService::new())
            .unwrap();
        let rows = tree.rows(tree.root());
        assert_eq!(rows.len(), 1);
        assert_eq!(tree.columns(rows[0]).len(), 1);
    }
}
