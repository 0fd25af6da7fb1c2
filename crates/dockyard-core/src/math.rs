//! Vector math re-exported from [`glam`].
//!
//! Pointer positions, drag offsets and ghost coordinates are all plain
//! [`Vec2`] values.
//!
//! ```
//! use dockyard_core::math::Vec2;
//!
//! let pointer = Vec2::new(120.0, 48.0);
//! let offset = Vec2::new(20.0, 8.0);
//! assert_eq!(pointer - offset, Vec2::new(100.0, 40.0));
//! ```
//!
//! [`glam`]: https://docs.rs/glam

pub use glam::Vec2;
