//! Optimized collection types for Dockyard.
//!
//! Re-exports hash collections backed by AHash, which are noticeably faster
//! than SipHash for the small integer keys used by the dock tree.

// Re-export optimized hash collections
pub use ahash::{AHashMap as HashMap, AHashSet as HashSet};
