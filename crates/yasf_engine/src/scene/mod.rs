//! Scene description and instantiation
//!
//! Bridges the declarative YASF side with the realized render graph:
//!
//! ```text
//! JSON text
//!      |  document (serde front end)
//! YasfDocument + MaterialRegistry
//!      |  builder (recursive instantiation)
//! RenderGraph (arena of RenderNodes)
//! ```
//!
//! The description types mirror the JSON records one to one; the builder
//! walks the node dictionary from a root id, tessellating primitives and
//! expanding every reference into its own instance.

pub mod builder;
pub mod description;
pub mod document;
pub mod node;

pub use builder::{BuildOptions, MaterialInheritance, SceneGraphBuilder};
pub use description::{ChildDesc, NodeDesc, SceneDict, TransformDesc};
pub use document::{GlobalsDesc, MaterialDesc, YasfDocument, YasfFile};
pub use node::{
    Light, LightKind, LodGroup, LodLevel, RenderGraph, RenderNode, RenderNodeKey, ShadowSettings,
};
