//! Dockyard Core
//!
//! Shared foundations for the Dockyard docking toolkit: math and geometry
//! primitives, fast hash collections, logging and profiling setup.

pub mod alloc;
pub mod geometry;
pub mod logging;
pub mod math;
pub mod profiling;
