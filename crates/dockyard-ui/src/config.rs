//! Sizing defaults and thresholds shared by the layout pass, the reconciler
//! and the drop strategies.

/// Height of the band at the top of a viewport that docks a window as its first tab.
pub const DEFAULT_DOCK_ZONE_HEIGHT: f32 = 40.0;

/// Gap between siblings in rows, columns and containers.
pub const DEFAULT_GUTTER: f32 = 4.0;

/// Header height of panel groups, collapsed rows and minimized windows.
pub const DEFAULT_HEADER_HEIGHT: f32 = 24.0;

/// Centralized sizing configuration for a dock tree.
///
/// Set once on [`DockTree`](crate::tree::DockTree) construction; every
/// component reads from the tree's copy.
#[derive(Debug, Clone, PartialEq)]
pub struct DockingConfig {
    /// Height of the viewport top band that triggers "create first tab".
    pub dock_zone_height: f32,
    /// Gap between siblings.
    pub gutter: f32,
    /// Header height (panel group title bar, collapsed rows, minimized windows).
    pub header_height: f32,
    /// Width of one tab header.
    pub tab_width: f32,
    /// Height of the viewport tab bar.
    pub tab_bar_height: f32,
    /// Size given to a non-filling row that has never been laid out.
    pub default_row_height: f32,
    /// Size given to a non-filling column that has never been laid out.
    pub default_column_width: f32,
    /// Size given to a non-filling panel group or viewport that has never been laid out.
    pub default_group_height: f32,
    /// Minimum width of a column with no constrained children.
    pub min_column_width: f32,
    /// Thickness of the placeholder when no size hint is given.
    pub placeholder_thickness: f32,
}

impl Default for DockingConfig {
    fn default() -> Self {
        Self {
            dock_zone_height: DEFAULT_DOCK_ZONE_HEIGHT,
            gutter: DEFAULT_GUTTER,
            header_height: DEFAULT_HEADER_HEIGHT,
            tab_width: 120.0,
            tab_bar_height: 28.0,
            default_row_height: 200.0,
            default_column_width: 300.0,
            default_group_height: 150.0,
            min_column_width: 50.0,
            placeholder_thickness: 6.0,
        }
    }
}

impl DockingConfig {
    /// Create a config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the viewport dock band height.
    pub fn dock_zone_height(mut self, height: f32) -> Self {
        self.dock_zone_height = height;
        self
    }

    /// Set the sibling gap.
    pub fn gutter(mut self, gutter: f32) -> Self {
        self.gutter = gutter;
        self
    }

    /// Set the header height.
    pub fn header_height(mut self, height: f32) -> Self {
        self.header_height = height;
        self
    }

    /// Set the tab header size.
    pub fn tab_size(mut self, width: f32, bar_height: f32) -> Self {
        self.tab_width = width;
        self.tab_bar_height = bar_height;
        self
    }

    /// Set the default sizes used when freezing non-filling siblings.
    pub fn default_sizes(mut self, row_height: f32, column_width: f32, group_height: f32) -> Self {
        self.default_row_height = row_height;
        self.default_column_width = column_width;
        self.default_group_height = group_height;
        self
    }

    /// Set the minimum column width.
    pub fn min_column_width(mut self, width: f32) -> Self {
        self.min_column_width = width;
        self
    }
}
