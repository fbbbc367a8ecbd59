//! Instantiated render graph
//!
//! The realized counterpart of the scene description: nodes carry resolved
//! transforms, generated meshes, light descriptors, and LOD groups. Nodes
//! live in a slotmap arena owned by the [`RenderGraph`]; parent/child links
//! and the name index are stable keys into that arena.

use std::collections::HashMap;

use slotmap::SlotMap;

use crate::error::SceneError;
use crate::foundation::math::{Mat4, Vec3};
use crate::geometry::SurfaceMesh;
use crate::materials::MaterialId;

slotmap::new_key_type! {
    /// Stable key of a node inside a [`RenderGraph`]
    pub struct RenderNodeKey;
}

/// Light kinds supported by the scene format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightKind {
    /// Omnidirectional light
    Point,
    /// Cone light aimed at a target point
    Spot,
    /// Parallel light (like sunlight)
    Directional,
}

/// Orthographic box for a directional light's shadow frustum
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowFrustum {
    /// Left plane
    pub left: f32,
    /// Right plane
    pub right: f32,
    /// Bottom plane
    pub bottom: f32,
    /// Top plane
    pub top: f32,
}

/// Shadow-casting parameters attached to a light
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowSettings {
    /// Shadow map resolution (square)
    pub map_size: u32,
    /// Shadow camera far plane
    pub far: f32,
    /// Orthographic box, directional lights only
    pub frustum: Option<ShadowFrustum>,
}

/// Non-geometric light descriptor attached to a render node
#[derive(Debug, Clone, PartialEq)]
pub struct Light {
    /// Light kind
    pub kind: LightKind,
    /// World position (unused for directional lights aimed by position)
    pub position: Vec3,
    /// Target point, spot lights only
    pub target: Vec3,
    /// Light color
    pub color: Vec3,
    /// Intensity
    pub intensity: f32,
    /// Attenuation range, point/spot lights
    pub range: f32,
    /// Attenuation decay exponent, point/spot lights
    pub decay: f32,
    /// Cone half-angle in radians, spot lights
    pub angle: f32,
    /// Penumbra fraction, spot lights
    pub penumbra: f32,
    /// Shadow parameters when the light casts shadows
    pub shadow: Option<ShadowSettings>,
}

impl Light {
    /// Create a point light
    pub fn point(position: Vec3, color: Vec3, intensity: f32, range: f32, decay: f32) -> Self {
        Self {
            kind: LightKind::Point,
            position,
            target: Vec3::zeros(),
            color,
            intensity,
            range,
            decay,
            angle: 0.0,
            penumbra: 0.0,
            shadow: None,
        }
    }

    /// Create a spot light
    pub fn spot(
        position: Vec3,
        target: Vec3,
        color: Vec3,
        intensity: f32,
        range: f32,
        decay: f32,
        angle: f32,
        penumbra: f32,
    ) -> Self {
        Self {
            kind: LightKind::Spot,
            position,
            target,
            color,
            intensity,
            range,
            decay,
            angle,
            penumbra,
            shadow: None,
        }
    }

    /// Create a directional light
    pub fn directional(position: Vec3, color: Vec3, intensity: f32) -> Self {
        Self {
            kind: LightKind::Directional,
            position,
            target: Vec3::zeros(),
            color,
            intensity,
            range: 0.0,
            decay: 0.0,
            angle: 0.0,
            penumbra: 0.0,
            shadow: None,
        }
    }

    /// Attach shadow parameters
    #[must_use]
    pub fn with_shadow(mut self, shadow: ShadowSettings) -> Self {
        self.shadow = Some(shadow);
        self
    }
}

/// One level of a LOD group
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LodLevel {
    /// Node displayed at this level
    pub node: RenderNodeKey,
    /// Minimum viewer distance at which this level becomes active
    pub min_distance: f32,
}

/// Declaration-ordered list of LOD levels
///
/// Levels are kept in the order they were declared, which callers are
/// expected to be increasing-distance order; they are not re-sorted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LodGroup {
    /// Levels in declaration order
    pub levels: Vec<LodLevel>,
}

impl LodGroup {
    /// Pick the level active at the given viewer distance
    ///
    /// Returns the last level whose `min_distance` does not exceed
    /// `distance`, or the first level when the viewer is closer than every
    /// threshold.
    pub fn select(&self, distance: f32) -> Option<RenderNodeKey> {
        let mut selected = self.levels.first()?;
        for level in &self.levels {
            if level.min_distance <= distance {
                selected = level;
            }
        }
        Some(selected.node)
    }
}

/// An instantiated node of the render graph
#[derive(Debug, Clone)]
pub struct RenderNode {
    /// Source node id or child key this node was built from
    pub name: String,
    /// Resolved local transform (own transforms then inherited)
    pub transform: Mat4,
    /// Generated geometry, primitives only
    pub mesh: Option<SurfaceMesh>,
    /// Resolved material, primitives only
    pub material: Option<MaterialId>,
    /// Light descriptor, light children only
    pub light: Option<Light>,
    /// LOD switch data, LOD nodes only
    pub lod: Option<LodGroup>,
    /// Child nodes in attachment order
    pub children: Vec<RenderNodeKey>,
}

impl RenderNode {
    /// Create an empty node with an identity transform
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transform: Mat4::identity(),
            mesh: None,
            material: None,
            light: None,
            lod: None,
            children: Vec::new(),
        }
    }

    /// True when this node carries renderable geometry
    pub fn is_geometric(&self) -> bool {
        self.mesh.is_some()
    }
}

/// Fully built render graph: arena, root, and name index
///
/// The name index maps a source node id to the *last-built* instance under
/// that id; earlier instances stay reachable through [`Self::instances`].
#[derive(Debug)]
pub struct RenderGraph {
    pub(crate) nodes: SlotMap<RenderNodeKey, RenderNode>,
    pub(crate) root: RenderNodeKey,
    pub(crate) index: HashMap<String, RenderNodeKey>,
    pub(crate) instances: HashMap<String, Vec<RenderNodeKey>>,
    pub(crate) warnings: Vec<SceneError>,
}

impl RenderGraph {
    /// Key of the root node
    pub fn root(&self) -> RenderNodeKey {
        self.root
    }

    /// Node by key
    pub fn node(&self, key: RenderNodeKey) -> Option<&RenderNode> {
        self.nodes.get(key)
    }

    /// Last-built node instantiated from the given source id
    pub fn find(&self, id: &str) -> Option<&RenderNode> {
        self.index.get(id).and_then(|&key| self.nodes.get(key))
    }

    /// Key of the last-built instance of the given source id
    pub fn key_of(&self, id: &str) -> Option<RenderNodeKey> {
        self.index.get(id).copied()
    }

    /// Every instance built from the given source id, in build order
    pub fn instances(&self, id: &str) -> &[RenderNodeKey] {
        self.instances.get(id).map_or(&[], Vec::as_slice)
    }

    /// Non-fatal problems recorded while building
    pub fn warnings(&self) -> &[SceneError] {
        &self.warnings
    }

    /// Total node count, including lights and placeholders
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when the graph holds no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Total triangle count across all meshes
    pub fn triangle_count(&self) -> usize {
        self.nodes
            .values()
            .filter_map(|n| n.mesh.as_ref())
            .map(SurfaceMesh::triangle_count)
            .sum()
    }

    /// Depth of the tree under the root (a lone root has depth 1)
    pub fn depth(&self) -> usize {
        self.depth_under(self.root)
    }

    fn depth_under(&self, key: RenderNodeKey) -> usize {
        let Some(node) = self.nodes.get(key) else {
            return 0;
        };
        1 + node
            .children
            .iter()
            .map(|&child| self.depth_under(child))
            .max()
            .unwrap_or(0)
    }

    /// Visit every node reachable from the root, depth first
    ///
    /// The callback receives the node key, the node, and its accumulated
    /// world transform (product of ancestor transforms).
    pub fn visit(&self, mut f: impl FnMut(RenderNodeKey, &RenderNode, &Mat4)) {
        self.visit_under(self.root, &Mat4::identity(), &mut f);
    }

    fn visit_under(
        &self,
        key: RenderNodeKey,
        parent_world: &Mat4,
        f: &mut impl FnMut(RenderNodeKey, &RenderNode, &Mat4),
    ) {
        let Some(node) = self.nodes.get(key) else {
            return;
        };
        let world = parent_world * node.transform;
        f(key, node, &world);
        for &child in &node.children {
            self.visit_under(child, &world, f);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lod_select_by_distance() {
        let mut nodes: SlotMap<RenderNodeKey, RenderNode> = SlotMap::with_key();
        let near = nodes.insert(RenderNode::empty("near"));
        let mid = nodes.insert(RenderNode::empty("mid"));
        let far = nodes.insert(RenderNode::empty("far"));

        let group = LodGroup {
            levels: vec![
                LodLevel { node: near, min_distance: 0.0 },
                LodLevel { node: mid, min_distance: 50.0 },
                LodLevel { node: far, min_distance: 200.0 },
            ],
        };

        assert_eq!(group.select(10.0), Some(near));
        assert_eq!(group.select(50.0), Some(mid));
        assert_eq!(group.select(1000.0), Some(far));
        // Closer than every threshold still shows the first level
        assert_eq!(group.select(-1.0), Some(near));
    }

    #[test]
    fn test_empty_lod_group_selects_nothing() {
        assert_eq!(LodGroup::default().select(10.0), None);
    }

    #[test]
    fn test_light_constructors() {
        let light = Light::point(Vec3::new(0.0, 5.0, 0.0), Vec3::new(1.0, 1.0, 1.0), 2.0, 100.0, 2.0);
        assert_eq!(light.kind, LightKind::Point);
        assert!(light.shadow.is_none());

        let shadowed = light.with_shadow(ShadowSettings {
            map_size: 1024,
            far: 250.0,
            frustum: None,
        });
        assert_eq!(shadowed.shadow.unwrap().map_size, 1024);
    }
}
