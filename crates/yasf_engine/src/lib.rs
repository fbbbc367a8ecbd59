//! # YASF Engine
//!
//! A scene-graph construction and surface tessellation library for the YASF
//! scene format.
//!
//! ## Features
//!
//! - **YASF Documents**: Typed serde front end for `{"yasf": {...}}` files
//! - **Scene Graphs**: Recursive instantiation with per-reference instances
//! - **Primitives**: Rectangles, triangles, boxes, cylinders, spheres, polygons
//! - **NURBS**: Rational Bezier patch tessellation with analytic normals
//! - **Lights and LOD**: Light descriptors and distance-switched detail levels
//! - **Fault Tolerance**: Malformed subtrees are skipped and reported, not fatal
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use yasf_engine::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let text = std::fs::read_to_string("scene.json")?;
//!     let document = YasfDocument::from_json(&text)?;
//!     let graph = document.build(BuildOptions::default())?;
//!
//!     for warning in graph.warnings() {
//!         log::warn!("{warning}");
//!     }
//!     println!("{} nodes, {} triangles", graph.len(), graph.triangle_count());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod error;
pub mod foundation;
pub mod geometry;
pub mod materials;
pub mod scene;

pub use error::SceneError;

/// Commonly used types, one import away
pub mod prelude {
    pub use crate::error::SceneError;
    pub use crate::foundation::math::{Mat4, Mat4Ext, Vec2, Vec3, Vec4};
    pub use crate::geometry::nurbs::ControlNet;
    pub use crate::geometry::{SurfaceMesh, Vertex};
    pub use crate::materials::{Material, MaterialId, MaterialRegistry};
    pub use crate::scene::{
        BuildOptions, MaterialInheritance, RenderGraph, RenderNode, SceneGraphBuilder,
        YasfDocument,
    };
}
