//! Layout pass: turns the dock tree into absolute rectangles.
//!
//! Containers, rows and columns are flexbox stacks computed by Taffy. Panel
//! groups and viewports are Taffy leaves whose contents (tab headers,
//! floating windows, a mounted placeholder) are positioned by hand.

use dockyard_core::geometry::Size;
use dockyard_core::math::Vec2;
use dockyard_core::profiling::{profile_function, profile_scope};
use taffy::{AvailableSpace, Dimension, Display, FlexDirection, LengthPercentage, Style, TaffyTree};

use crate::dnd::types::Orientation;
use crate::operations::{DockError, DockResult};
use crate::tree::{DockTree, LayoutRect, NodeId, NodeKind};

/// How a flex item is sized along its parent's main axis.
#[derive(Debug, Clone, Copy, PartialEq)]
enum MainSize {
    /// Fixed and never shrinks (collapsed headers, placeholder).
    Fixed(f32),
    /// Absorbs leftover space.
    Fill,
    /// Explicit size that may shrink down to the minimum.
    Explicit(f32),
    /// Content-sized.
    Auto,
}

fn flex_stack(direction: FlexDirection, gap: f32) -> Style {
    let mut style = Style::default();
    style.display = Display::Flex;
    style.flex_direction = direction;
    style.gap = taffy::Size {
        width: LengthPercentage::Length(gap),
        height: LengthPercentage::Length(gap),
    };
    style
}

fn apply_main_size(style: &mut Style, vertical: bool, size: MainSize, min_main: f32) {
    let (grow, shrink, basis, main) = match size {
        MainSize::Fixed(s) => (0.0, 0.0, Dimension::Auto, Dimension::Length(s)),
        MainSize::Fill => (1.0, 1.0, Dimension::Length(0.0), Dimension::Auto),
        MainSize::Explicit(s) => (0.0, 1.0, Dimension::Auto, Dimension::Length(s)),
        MainSize::Auto => (0.0, 1.0, Dimension::Auto, Dimension::Auto),
    };
    style.flex_grow = grow;
    style.flex_shrink = shrink;
    style.flex_basis = basis;
    if vertical {
        style.size.height = main;
        style.min_size.height = Dimension::Length(min_main);
    } else {
        style.size.width = main;
        style.min_size.width = Dimension::Length(min_main);
    }
}

impl DockTree {
    /// Compute absolute layout for every node inside a window of `size`.
    pub fn compute_layout(&mut self, size: Size<f32>) -> DockResult<()> {
        profile_function!();
        self.viewport_size = size;

        let mut taffy: TaffyTree<()> = TaffyTree::new();
        let mut mapping: Vec<(NodeId, taffy::NodeId)> = Vec::new();
        let root = self.root();
        let root_taffy = self
            .build_flex_node(&mut taffy, root, true, &mut mapping)
            .map_err(|e| DockError::Layout(format!("{:?}", e)))?;

        let mut root_style = flex_stack(FlexDirection::Column, self.config().gutter);
        root_style.size = taffy::Size {
            width: Dimension::Length(size.width),
            height: Dimension::Length(size.height),
        };
        taffy
            .set_style(root_taffy, root_style)
            .map_err(|e| DockError::Layout(format!("{:?}", e)))?;
        {
            profile_scope!("taffy_compute");
            taffy
                .compute_layout(
                    root_taffy,
                    taffy::Size {
                        width: AvailableSpace::Definite(size.width),
                        height: AvailableSpace::Definite(size.height),
                    },
                )
                .map_err(|e| DockError::Layout(format!("{:?}", e)))?;
        }

        self.write_back(&taffy, &mapping);
        self.position_tab_contents();
        self.layout_pending = false;
        Ok(())
    }

    /// Repeat the last layout pass with the same window size.
    pub fn relayout(&mut self) -> DockResult<()> {
        let size = self.viewport_size;
        self.compute_layout(size)
    }

    fn main_size(&self, id: NodeId) -> (MainSize, f32) {
        let Some(node) = self.get(id) else {
            return (MainSize::Auto, 0.0);
        };
        let header = self.config().header_height;
        let explicit = |size: Option<f32>| match size {
            _ if node.fills_space => MainSize::Fill,
            Some(s) => MainSize::Explicit(s),
            None => MainSize::Auto,
        };
        match &node.kind {
            NodeKind::Row(row) if row.collapsed => (MainSize::Fixed(header), header),
            NodeKind::Row(row) => (explicit(row.height), header),
            NodeKind::Column(column) => {
                let min = node.min_width_constraint.unwrap_or(column.min_width);
                (explicit(column.width), min)
            }
            NodeKind::PanelGroup(group) if group.collapsed => (MainSize::Fixed(header), header),
            NodeKind::PanelGroup(group) => (explicit(group.height), header),
            NodeKind::Viewport(viewport) => (explicit(viewport.height), header),
            NodeKind::Placeholder(placeholder) => {
                let thickness = placeholder
                    .size_hint
                    .unwrap_or(self.config().placeholder_thickness);
                (MainSize::Fixed(thickness), 0.0)
            }
            _ => (MainSize::Auto, 0.0),
        }
    }

    fn build_flex_node(
        &self,
        taffy: &mut TaffyTree<()>,
        id: NodeId,
        parent_vertical: bool,
        mapping: &mut Vec<(NodeId, taffy::NodeId)>,
    ) -> Result<taffy::NodeId, taffy::TaffyError> {
        let gutter = self.config().gutter;
        let child_axis = match self.kind(id) {
            Some(NodeKind::Container) | Some(NodeKind::Column(_)) => Some(true),
            Some(NodeKind::Row(row)) if !row.collapsed => Some(false),
            _ => None,
        };

        let mut style = match child_axis {
            Some(true) => flex_stack(FlexDirection::Column, gutter),
            Some(false) => flex_stack(FlexDirection::Row, gutter),
            None => Style::default(),
        };
        let (main, min_main) = self.main_size(id);
        apply_main_size(&mut style, parent_vertical, main, min_main);

        let node = match child_axis {
            Some(vertical) => {
                let mut children = Vec::new();
                for &child in self.children(id) {
                    children.push(self.build_flex_node(taffy, child, vertical, mapping)?);
                }
                taffy.new_with_children(style, &children)?
            }
            None => taffy.new_leaf(style)?,
        };
        mapping.push((id, node));
        Ok(node)
    }

    fn write_back(&mut self, taffy: &TaffyTree<()>, mapping: &[(NodeId, taffy::NodeId)]) {
        let lookup: dockyard_core::alloc::HashMap<NodeId, taffy::NodeId> =
            mapping.iter().copied().collect();
        let mut stack = vec![(self.root(), Vec2::ZERO)];
        while let Some((id, origin)) = stack.pop() {
            // Contents of collapsed rows are not laid out; they shrink to a point.
            let rect = match lookup.get(&id).map(|node| taffy.layout(*node)) {
                Some(Ok(layout)) => LayoutRect::new(
                    origin.x + layout.location.x,
                    origin.y + layout.location.y,
                    layout.size.width,
                    layout.size.height,
                ),
                _ => LayoutRect::new(origin.x, origin.y, 0.0, 0.0),
            };
            if let Some(node) = self.get_mut(id) {
                node.layout = rect;
            }
            for &child in self.children(id) {
                stack.push((child, rect.position()));
            }
        }
    }

    /// Position tab headers, floating windows, floating groups and a
    /// placeholder mounted in a tabbed parent.
    fn position_tab_contents(&mut self) {
        let config = self.config().clone();
        let ids: Vec<NodeId> = self.node_ids().collect();

        for id in ids {
            let Some(node) = self.get(id) else { continue };
            match &node.kind {
                NodeKind::PanelGroup(group) => {
                    let origin = match (node.parent, group.floating) {
                        (None, Some(rect)) => rect,
                        (Some(_), _) => node.layout,
                        (None, None) => continue,
                    };
                    let children = node.children.clone();
                    if let Some(node) = self.get_mut(id) {
                        node.layout = origin;
                    }
                    let mut slot = 0.0;
                    for child in children {
                        let rect = match self.kind(child) {
                            Some(NodeKind::Placeholder(p)) => LayoutRect::new(
                                origin.x + p.slot as f32 * config.tab_width
                                    - config.placeholder_thickness / 2.0,
                                origin.y,
                                config.placeholder_thickness,
                                config.header_height,
                            ),
                            _ => {
                                let rect = LayoutRect::new(
                                    origin.x + slot * config.tab_width,
                                    origin.y,
                                    config.tab_width,
                                    config.header_height,
                                );
                                slot += 1.0;
                                rect
                            }
                        };
                        if let Some(child) = self.get_mut(child) {
                            child.layout = rect;
                        }
                    }
                }
                NodeKind::Viewport(viewport) => {
                    let origin = node.layout;
                    let tabs = viewport.tabs.clone();
                    let children = node.children.clone();
                    for child in children {
                        let rect = match self.kind(child) {
                            Some(NodeKind::Window(window)) if window.tabbed => {
                                let slot = tabs.iter().position(|t| *t == child).unwrap_or(0);
                                LayoutRect::new(
                                    origin.x + slot as f32 * config.tab_width,
                                    origin.y,
                                    config.tab_width,
                                    config.tab_bar_height,
                                )
                            }
                            Some(NodeKind::Window(window)) => LayoutRect::new(
                                origin.x + window.x,
                                origin.y + window.y,
                                window.width,
                                if window.minimized {
                                    config.header_height
                                } else {
                                    window.height
                                },
                            ),
                            Some(NodeKind::Placeholder(p)) => match p.orientation {
                                Orientation::Horizontal => LayoutRect::new(
                                    origin.x,
                                    origin.y,
                                    origin.width,
                                    p.size_hint.unwrap_or(config.dock_zone_height),
                                ),
                                Orientation::Vertical => LayoutRect::new(
                                    origin.x + p.slot as f32 * config.tab_width
                                        - config.placeholder_thickness / 2.0,
                                    origin.y,
                                    config.placeholder_thickness,
                                    config.tab_bar_height,
                                ),
                            },
                            _ => continue,
                        };
                        if let Some(child) = self.get_mut(child) {
                            child.layout = rect;
                        }
                    }
                }
                _ => {}
            }
        }
    }

    /// Deepest node under `point`.
    ///
    /// `overlays` are floating panel groups, bottom-most first; they are tested
    /// before the docked tree. `exclude` removes a subtree from hit testing (the
    /// item being dragged, which the ghost stands in for).
    pub fn hit_test(&self, point: Vec2, overlays: &[NodeId], exclude: Option<NodeId>) -> Option<NodeId> {
        profile_function!();
        for &group in overlays.iter().rev() {
            if let Some(hit) = self.hit_node(group, point, exclude) {
                return Some(hit);
            }
        }
        self.hit_node(self.root(), point, exclude)
    }

    fn hit_node(&self, id: NodeId, point: Vec2, exclude: Option<NodeId>) -> Option<NodeId> {
        if Some(id) == exclude {
            return None;
        }
        let node = self.get(id)?;
        if !node.layout.contains(point) {
            return None;
        }
        node.children
            .iter()
            .rev()
            .find_map(|child| self.hit_node(*child, point, exclude))
            .or(Some(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DockingConfig;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 0.5
    }

    #[test]
    fn test_rows_stack_with_filler() {
        let mut tree = DockTree::new(DockingConfig::default().gutter(0.0));
        let root = tree.root();
        let r1 = tree.create_row(root, None).unwrap();
        let r2 = tree.create_row(root, None).unwrap();
        tree.set_size(r1, Some(100.0));
        tree.set_fills_space(r2, true);

        tree.compute_layout(Size::new(800.0, 600.0)).unwrap();

        let l1 = tree.layout(r1).unwrap();
        let l2 = tree.layout(r2).unwrap();
        assert!(approx(l1.y, 0.0) && approx(l1.height, 100.0));
        assert!(approx(l2.y, 100.0) && approx(l2.height, 500.0));
        assert!(approx(l2.width, 800.0));
        assert!(!tree.needs_layout());
    }

    #[test]
    fn test_collapsed_row_is_header_height() {
        let mut tree = DockTree::new(DockingConfig::default().gutter(0.0));
        let root = tree.root();
        let r1 = tree.create_row(root, None).unwrap();
        let r2 = tree.create_row(root, None).unwrap();
        tree.set_size(r1, Some(300.0));
        tree.set_collapsed(r1, true);
        tree.set_fills_space(r2, true);

        tree.compute_layout(Size::new(800.0, 600.0)).unwrap();
        assert!(approx(tree.layout(r1).unwrap().height, 24.0));
        assert!(approx(tree.layout(r2).unwrap().height, 576.0));
    }

    #[test]
    fn test_columns_are_absolute() {
        let mut tree = DockTree::new(DockingConfig::default().gutter(0.0));
        let root = tree.root();
        let r1 = tree.create_row(root, None).unwrap();
        let r2 = tree.create_row(root, None).unwrap();
        tree.set_size(r1, Some(200.0));
        tree.set_fills_space(r2, true);
        let c1 = tree.create_column(r2, None).unwrap();
        let c2 = tree.create_column(r2, None).unwrap();
        tree.set_size(c1, Some(250.0));
        tree.set_fills_space(c2, true);

        tree.compute_layout(Size::new(800.0, 600.0)).unwrap();

        let l2 = tree.layout(c2).unwrap();
        assert!(approx(l2.x, 250.0));
        assert!(approx(l2.y, 200.0));
        assert!(approx(l2.width, 550.0));
    }

    #[test]
    fn test_panels_laid_out_as_tabs() {
        let mut tree = DockTree::default();
        let root = tree.root();
        let row = tree.create_row(root, None).unwrap();
        let column = tree.create_column(row, None).unwrap();
        let group = tree.create_panel_group();
        let a = tree.create_panel("A", 0.0);
        let b = tree.create_panel("B", 0.0);
        tree.add_panel(group, a, None).unwrap();
        tree.add_panel(group, b, None).unwrap();
        tree.add_panel_group(column, group, None).unwrap();
        tree.set_fills_space(row, true);
        tree.set_fills_space(column, true);
        tree.set_fills_space(group, true);

        tree.compute_layout(Size::new(800.0, 600.0)).unwrap();

        let group_rect = tree.layout(group).unwrap();
        let b_rect = tree.layout(b).unwrap();
        assert!(approx(b_rect.x, group_rect.x + 120.0));
        assert!(approx(b_rect.y, group_rect.y));
        assert!(approx(b_rect.height, 24.0));
    }

    #[test]
    fn test_hit_test_prefers_deepest_and_respects_exclude() {
        let mut tree = DockTree::new(DockingConfig::default().gutter(0.0));
        let root = tree.root();
        let row = tree.create_row(root, None).unwrap();
        let column = tree.create_column(row, None).unwrap();
        let group = tree.create_panel_group();
        tree.add_panel_group(column, group, None).unwrap();
        tree.set_fills_space(row, true);
        tree.set_fills_space(column, true);
        tree.set_fills_space(group, true);
        tree.compute_layout(Size::new(400.0, 300.0)).unwrap();

        let point = Vec2::new(200.0, 150.0);
        assert_eq!(tree.hit_test(point, &[], None), Some(group));
        assert_eq!(tree.hit_test(point, &[], Some(group)), Some(column));
        assert_eq!(tree.hit_test(Vec2::new(500.0, 150.0), &[], None), None);
    }

    #[test]
    fn test_floating_overlay_wins_hit_test() {
        let mut tree = DockTree::new(DockingConfig::default().gutter(0.0));
        let root = tree.root();
        let row = tree.create_row(root, None).unwrap();
        tree.set_fills_space(row, true);
        let floating = tree.create_panel_group();
        tree.set_floating(floating, Some(LayoutRect::new(50.0, 50.0, 100.0, 100.0)));
        tree.compute_layout(Size::new(400.0, 300.0)).unwrap();

        assert_eq!(tree.layout(floating), Some(LayoutRect::new(50.0, 50.0, 100.0, 100.0)));
        assert_eq!(tree.hit_test(Vec2::new(60.0, 120.0), &[floating], None), Some(floating));
        assert_eq!(tree.hit_test(Vec2::new(300.0, 120.0), &[floating], None), Some(row));
    }
}
