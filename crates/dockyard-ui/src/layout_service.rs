//! Layout reconciliation after structural changes.
//!
//! Per sibling group (rows of a container, columns of a row, panel groups and
//! the viewport of a column) the service restores:
//!
//! - at least one uncollapsed member,
//! - exactly one filler (the last visible member) with its explicit size
//!   cleared, every other member holding an explicit size,
//! - collapse control enablement,
//! - column minimum widths covering their children.
//!
//! Every entry point is idempotent and only writes values that differ, so a
//! repeated call leaves no dirty flags behind.

use dockyard_core::profiling::profile_function;

use crate::events::LayoutEvent;
use crate::tree::{CollapseButton, DockTree, NodeId, NodeKind};

/// Which sibling group a stack reconciliation runs over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stack {
    Rows,
    ColumnChildren,
}

fn kind_name(tree: &DockTree, id: NodeId) -> &'static str {
    tree.kind(id).map(NodeKind::name).unwrap_or("missing")
}

/// The reconciler. One instance per dock tree context.
#[derive(Debug, Default)]
pub struct LayoutService {
    reconciliations: u64,
}

impl LayoutService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of scopes reconciled so far.
    pub fn reconciliations(&self) -> u64 {
        self.reconciliations
    }

    /// Reconcile the rows of `container`.
    pub fn rows_changed(&mut self, tree: &mut DockTree, container: NodeId) {
        profile_function!();
        if !tree.is_container(container) {
            tracing::warn!(node = ?container, found = kind_name(tree, container), "rows_changed expects a container");
            return;
        }
        self.reconciliations += 1;
        let rows = tree.rows(container);
        self.reconcile_stack(tree, &rows, Stack::Rows);
    }

    /// Reconcile the columns of `row`.
    pub fn columns_changed(&mut self, tree: &mut DockTree, row: NodeId) {
        profile_function!();
        if tree.row(row).is_none() {
            tracing::warn!(node = ?row, found = kind_name(tree, row), "columns_changed expects a row");
            return;
        }
        self.reconciliations += 1;

        let columns = tree.columns(row);
        let Some(&last) = columns.last() else {
            return;
        };
        let default_width = tree.config().default_column_width;
        for &column in &columns {
            let is_last = column == last;
            tree.set_is_last(column, is_last);
            tree.set_fills_space(column, is_last);
            if is_last {
                tree.set_size(column, None);
            } else {
                freeze_size(tree, column, true, default_width);
            }
            tree.set_resize_handle(column, !is_last);
            update_min_width(tree, column);
        }
    }

    /// Reconcile the panel groups and viewport of `column`.
    pub fn children_changed(&mut self, tree: &mut DockTree, column: NodeId) {
        profile_function!();
        if tree.column(column).is_none() {
            tracing::warn!(node = ?column, found = kind_name(tree, column), "children_changed expects a column");
            return;
        }
        self.reconciliations += 1;
        let children = tree.column_children(column);
        self.reconcile_stack(tree, &children, Stack::ColumnChildren);
        update_min_width(tree, column);
    }

    /// Alias of [`children_changed`](Self::children_changed).
    pub fn panel_groups_changed(&mut self, tree: &mut DockTree, column: NodeId) {
        self.children_changed(tree, column);
    }

    /// Reconcile every scope under `container`, top-down.
    ///
    /// Used after bulk loads where incremental events cannot be relied on.
    pub fn full_reinitialize(&mut self, tree: &mut DockTree, container: NodeId) {
        profile_function!();
        if !tree.is_container(container) {
            tracing::warn!(node = ?container, found = kind_name(tree, container), "full_reinitialize expects a container");
            return;
        }
        self.rows_changed(tree, container);
        for row in tree.rows(container) {
            self.columns_changed(tree, row);
            for column in tree.columns(row) {
                self.children_changed(tree, column);
            }
        }
        tracing::debug!(?container, "layout fully reinitialized");
    }

    /// Drain the tree's pending layout events and reconcile each scope.
    ///
    /// Scopes removed after their event was queued are skipped. Returns the
    /// number of events handled.
    pub fn process_events(&mut self, tree: &mut DockTree) -> usize {
        let events = tree.drain_events();
        let count = events.len();
        for event in events {
            let scope = event.scope();
            if !tree.contains(scope) {
                tracing::trace!(?event, "skipping event for removed node");
                continue;
            }
            match event {
                LayoutEvent::RowsChanged(container) => self.rows_changed(tree, container),
                LayoutEvent::ColumnsChanged(row) => self.columns_changed(tree, row),
                LayoutEvent::ChildrenChanged(column) => self.children_changed(tree, column),
            }
        }
        count
    }

    fn reconcile_stack(&self, tree: &mut DockTree, members: &[NodeId], stack: Stack) {
        let Some(&last) = members.last() else {
            return;
        };

        let mut visible: Vec<NodeId> = members
            .iter()
            .copied()
            .filter(|m| !tree.is_collapsed(*m))
            .collect();
        if visible.is_empty() {
            tracing::warn!(node = ?last, "every sibling collapsed; expanding the last one");
            tree.set_collapsed(last, false);
            visible.push(last);
        }
        let filler = visible[visible.len() - 1];
        let sole_visible = visible.len() == 1;

        let default_size = match stack {
            Stack::Rows => tree.config().default_row_height,
            Stack::ColumnChildren => tree.config().default_group_height,
        };

        for &member in members {
            let fills = member == filler;
            tree.set_fills_space(member, fills);
            if fills {
                tree.set_size(member, None);
            } else {
                freeze_size(tree, member, false, default_size);
            }

            let locked = !tree.is_collapsible(member) || (sole_visible && fills);
            let button = match stack {
                Stack::Rows if members.len() == 1 => CollapseButton::Hidden,
                Stack::ColumnChildren if tree.viewport(member).is_some() => CollapseButton::Hidden,
                Stack::ColumnChildren if members.len() == 1 => CollapseButton::Disabled,
                _ if locked => CollapseButton::Disabled,
                _ => CollapseButton::Enabled,
            };
            tree.set_collapse_button(member, button);
        }
    }
}

/// Give a non-filling member without an explicit size one, so the filler stays
/// the only size-less sibling.
fn freeze_size(tree: &mut DockTree, id: NodeId, horizontal: bool, default_size: f32) {
    if tree.explicit_size(id) != Some(None) {
        return;
    }
    let laid_out = tree.laid_out_extent(id, horizontal);
    let size = if laid_out > 0.0 && !tree.is_collapsed(id) {
        laid_out
    } else {
        default_size
    };
    tree.set_size(id, Some(size));
}

/// A column is at least as wide as its own minimum and its widest child's.
fn update_min_width(tree: &mut DockTree, column: NodeId) {
    let own = tree.column(column).map(|c| c.min_width).unwrap_or(0.0);
    let min_width = tree
        .panel_groups(column)
        .into_iter()
        .map(|group| tree.group_min_width(group))
        .fold(own, f32::max);
    tree.set_min_width_constraint(column, Some(min_width));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn container_with_rows(count: usize) -> (DockTree, Vec<NodeId>) {
        let mut tree = DockTree::default();
        let root = tree.root();
        let rows = (0..count)
            .map(|_| tree.create_row(root, None).unwrap())
            .collect();
        (tree, rows)
    }

    #[test]
    fn test_last_visible_row_fills() {
        let (mut tree, rows) = container_with_rows(3);
        let root = tree.root();
        tree.set_size(rows[0], Some(100.0));
        tree.set_collapsed(rows[2], true);

        LayoutService::new().rows_changed(&mut tree, root);

        let fillers: Vec<NodeId> = rows
            .iter()
            .copied()
            .filter(|r| tree.get(*r).unwrap().fills_space)
            .collect();
        assert_eq!(fillers, vec![rows[1]]);
        assert_eq!(tree.explicit_size(rows[1]), Some(None));
        assert_eq!(tree.explicit_size(rows[0]), Some(Some(100.0)));
        // Never laid out: frozen at the configured default.
        assert_eq!(tree.explicit_size(rows[2]), Some(Some(200.0)));
    }

    #[test]
    fn test_all_collapsed_rows_expand_last() {
        let (mut tree, rows) = container_with_rows(3);
        let root = tree.root();
        for row in &rows {
            tree.set_collapsed(*row, true);
        }

        LayoutService::new().rows_changed(&mut tree, root);

        assert!(tree.is_collapsed(rows[0]));
        assert!(tree.is_collapsed(rows[1]));
        assert!(!tree.is_collapsed(rows[2]));
        assert!(tree.get(rows[2]).unwrap().fills_space);
        assert_eq!(tree.get(rows[2]).unwrap().collapse_button, CollapseButton::Disabled);
        assert_eq!(tree.get(rows[0]).unwrap().collapse_button, CollapseButton::Enabled);
    }

    #[test]
    fn test_single_row_hides_collapse_button() {
        let (mut tree, rows) = container_with_rows(1);
        let root = tree.root();
        LayoutService::new().rows_changed(&mut tree, root);
        assert_eq!(tree.get(rows[0]).unwrap().collapse_button, CollapseButton::Hidden);
    }

    #[test]
    fn test_non_collapsible_row_is_disabled() {
        let (mut tree, rows) = container_with_rows(2);
        let root = tree.root();
        tree.set_collapsible(rows[0], false);
        LayoutService::new().rows_changed(&mut tree, root);
        assert_eq!(tree.get(rows[0]).unwrap().collapse_button, CollapseButton::Disabled);
        assert_eq!(tree.get(rows[1]).unwrap().collapse_button, CollapseButton::Enabled);
    }

    #[test]
    fn test_second_pass_is_a_no_op() {
        let (mut tree, rows) = container_with_rows(2);
        let root = tree.root();
        let column = tree.create_column(rows[0], None).unwrap();
        tree.create_column(rows[0], None).unwrap();
        let group = tree.create_panel_group();
        tree.add_panel_group(column, group, None).unwrap();

        let mut service = LayoutService::new();
        service.full_reinitialize(&mut tree, root);
        tree.clear_dirty_flags();

        service.full_reinitialize(&mut tree, root);
        assert!(!tree.is_dirty());
        service.rows_changed(&mut tree, root);
        service.columns_changed(&mut tree, rows[0]);
        service.children_changed(&mut tree, column);
        assert!(!tree.is_dirty());
    }

    #[test]
    fn test_columns_flags_and_min_width() {
        let (mut tree, rows) = container_with_rows(1);
        let c1 = tree.create_column(rows[0], None).unwrap();
        let c2 = tree.create_column(rows[0], None).unwrap();
        let group = tree.create_panel_group();
        let panel = tree.create_panel("Wide", 180.0);
        tree.add_panel(group, panel, None).unwrap();
        tree.add_panel_group(c1, group, None).unwrap();

        LayoutService::new().columns_changed(&mut tree, rows[0]);

        let first = tree.column(c1).unwrap();
        assert!(!first.is_last && first.has_resize_handle);
        let second = tree.column(c2).unwrap();
        assert!(second.is_last && !second.has_resize_handle);
        assert_eq!(tree.explicit_size(c2), Some(None));
        assert_eq!(tree.explicit_size(c1), Some(Some(300.0)));
        assert_eq!(tree.get(c1).unwrap().min_width_constraint, Some(180.0));
        assert_eq!(tree.get(c2).unwrap().min_width_constraint, Some(50.0));
    }

    #[test]
    fn test_column_children_buttons() {
        let (mut tree, rows) = container_with_rows(1);
        let column = tree.create_column(rows[0], None).unwrap();
        let group = tree.create_panel_group();
        tree.add_panel_group(column, group, None).unwrap();

        let mut service = LayoutService::new();
        service.children_changed(&mut tree, column);
        assert_eq!(tree.get(group).unwrap().collapse_button, CollapseButton::Disabled);

        let viewport = tree.create_viewport(column, None).unwrap();
        service.children_changed(&mut tree, column);
        assert_eq!(tree.get(viewport).unwrap().collapse_button, CollapseButton::Hidden);
        assert!(tree.get(viewport).unwrap().fills_space);
        assert_eq!(tree.get(group).unwrap().collapse_button, CollapseButton::Enabled);
        assert_eq!(tree.explicit_size(group), Some(Some(150.0)));
    }

    #[test]
    fn test_wrong_kind_is_ignored() {
        let (mut tree, rows) = container_with_rows(1);
        let root = tree.root();
        tree.clear_dirty_flags();
        let mut service = LayoutService::new();
        service.rows_changed(&mut tree, rows[0]);
        service.columns_changed(&mut tree, root);
        service.children_changed(&mut tree, NodeId(9999));
        assert!(!tree.is_dirty());
        assert_eq!(service.reconciliations(), 0);
    }

    #[test]
    fn test_process_events_skips_removed_scopes() {
        let (mut tree, rows) = container_with_rows(2);
        let root = tree.root();
        tree.create_column(rows[0], None).unwrap();
        tree.remove_row(root, rows[0]).unwrap();

        let mut service = LayoutService::new();
        let handled = service.process_events(&mut tree);

        assert!(handled >= 2);
        assert!(tree.pending_events().is_empty());
        assert!(tree.get(rows[1]).unwrap().fills_space);
    }
}
