//! Sibling midpoints captured when a drag enters a zone.

use crate::tree::{DockTree, NodeId};

/// Axis along which siblings are stacked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Axis {
    /// Siblings left to right; compare pointer x.
    Horizontal,
    /// Siblings top to bottom; compare pointer y.
    #[default]
    Vertical,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeometryCacheEntry {
    pub node: NodeId,
    pub midpoint: f32,
    pub index: usize,
}

/// Midpoints of a zone's items, plus the tree version they were taken at.
#[derive(Debug, Clone, Default)]
pub struct GeometryCache {
    entries: Vec<GeometryCacheEntry>,
    axis: Axis,
    version: Option<u64>,
}

impl GeometryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot the midpoints of `items` along `axis`.
    pub fn build(&mut self, tree: &DockTree, items: &[NodeId], axis: Axis) {
        self.axis = axis;
        self.entries = items
            .iter()
            .enumerate()
            .filter_map(|(index, node)| {
                let rect = tree.layout(*node)?;
                let midpoint = match axis {
                    Axis::Horizontal => rect.x + rect.width / 2.0,
                    Axis::Vertical => rect.y + rect.height / 2.0,
                };
                Some(GeometryCacheEntry {
                    node: *node,
                    midpoint,
                    index,
                })
            })
            .collect();
        self.version = Some(tree.structure_version());
        tracing::trace!(entries = self.entries.len(), ?axis, "geometry cache built");
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.version = None;
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn entries(&self) -> &[GeometryCacheEntry] {
        &self.entries
    }

    /// Entry for the item at `index`.
    pub fn entry(&self, index: usize) -> Option<&GeometryCacheEntry> {
        self.entries.iter().find(|e| e.index == index)
    }

    /// Drop index for a pointer coordinate along the cached axis.
    ///
    /// The first entry whose midpoint lies past `coord` wins (`gap_found`);
    /// otherwise the index is one past the last entry (append).
    pub fn find_gap(&self, coord: f32) -> (usize, bool) {
        match self.entries.iter().find(|e| coord < e.midpoint) {
            Some(entry) => (entry.index, true),
            None => (self.entries.len(), false),
        }
    }

    /// Whether the tree changed structurally since the cache was built.
    pub fn is_stale(&self, tree: &DockTree) -> bool {
        self.version
            .is_some_and(|version| version != tree.structure_version())
    }
}
