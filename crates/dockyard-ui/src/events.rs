//! Layout-changed notifications emitted by tree mutators.

use indexmap::IndexSet;

use crate::tree::NodeId;

/// A sibling group changed membership or order.
///
/// Each variant carries the node whose children changed; the
/// [`LayoutService`](crate::layout_service::LayoutService) reconciles exactly
/// that scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayoutEvent {
    /// Rows of a container changed.
    RowsChanged(NodeId),
    /// Columns of a row changed.
    ColumnsChanged(NodeId),
    /// Panel groups or the embedded viewport of a column changed.
    ChildrenChanged(NodeId),
}

impl LayoutEvent {
    /// The node whose sibling group changed.
    pub fn scope(&self) -> NodeId {
        match *self {
            LayoutEvent::RowsChanged(id)
            | LayoutEvent::ColumnsChanged(id)
            | LayoutEvent::ChildrenChanged(id) => id,
        }
    }
}

/// Pending layout events, deduplicated in arrival order.
#[derive(Debug, Clone, Default)]
pub struct LayoutEventQueue {
    pending: IndexSet<LayoutEvent>,
}

impl LayoutEventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an event. Re-queuing an event that is already pending is a no-op.
    pub fn push(&mut self, event: LayoutEvent) {
        self.pending.insert(event);
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LayoutEvent> {
        self.pending.iter()
    }

    /// Take every pending event, leaving the queue empty.
    pub fn drain(&mut self) -> Vec<LayoutEvent> {
        self.pending.drain(..).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_deduplicates_in_order() {
        let mut queue = LayoutEventQueue::new();
        queue.push(LayoutEvent::RowsChanged(NodeId(0)));
        queue.push(LayoutEvent::ColumnsChanged(NodeId(3)));
        queue.push(LayoutEvent::RowsChanged(NodeId(0)));

        assert_eq!(queue.len(), 2);
        assert_eq!(
            queue.drain(),
            vec![
                LayoutEvent::RowsChanged(NodeId(0)),
                LayoutEvent::ColumnsChanged(NodeId(3)),
            ]
        );
        assert!(queue.is_empty());
    }

    #[test]
    fn test_scope() {
        assert_eq!(LayoutEvent::ChildrenChanged(NodeId(7)).scope(), NodeId(7));
    }
}
