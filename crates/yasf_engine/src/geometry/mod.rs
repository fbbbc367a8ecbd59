//! Geometry generation
//!
//! Mesh data structures, primitive generators, and the rational surface
//! evaluator used for NURBS patches.

pub mod mesh;
pub mod nurbs;
pub mod primitives;

pub use mesh::{SurfaceMesh, Vertex};
pub use nurbs::ControlNet;
