//! Typed YASF scene description
//!
//! The node dictionary side of the scene format: everything here mirrors the
//! declarative JSON records, before any instantiation happens. Child "type"
//! strings are a closed tagged union so dispatch in the builder is checked at
//! compile time; type strings outside the supported set deserialize to
//! [`ChildDesc::Unknown`] and are reported (and dropped) at build time rather
//! than failing the whole document.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::foundation::math::{Vec2, Vec3};

/// Scene dictionary: node id to node record
pub type SceneDict = HashMap<String, NodeDesc>;

/// 3D amount or position record
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Vec3Desc {
    /// X component
    pub x: f32,
    /// Y component
    pub y: f32,
    /// Z component
    pub z: f32,
}

impl From<Vec3Desc> for Vec3 {
    fn from(v: Vec3Desc) -> Self {
        Vec3::new(v.x, v.y, v.z)
    }
}

/// 2D corner record
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Vec2Desc {
    /// X component
    pub x: f32,
    /// Y component
    pub y: f32,
}

impl From<Vec2Desc> for Vec2 {
    fn from(v: Vec2Desc) -> Self {
        Vec2::new(v.x, v.y)
    }
}

/// RGB color record with components in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorDesc {
    /// Red component
    pub r: f32,
    /// Green component
    pub g: f32,
    /// Blue component
    pub b: f32,
}

impl From<ColorDesc> for Vec3 {
    fn from(c: ColorDesc) -> Self {
        Vec3::new(c.r, c.g, c.b)
    }
}

/// Homogeneous NURBS control point; weight defaults to 1
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlPointDesc {
    /// X coordinate
    pub x: f32,
    /// Y coordinate
    pub y: f32,
    /// Z coordinate
    pub z: f32,
    /// Rational weight
    pub w: f32,
}

impl Default for ControlPointDesc {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
            w: 1.0,
        }
    }
}

/// One declared transform step; rotation amounts are XYZ Euler degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TransformDesc {
    /// Translation by the amount vector
    Translate {
        /// Offset per axis
        amount: Vec3Desc,
    },
    /// Rotation, amounts in degrees per axis
    Rotate {
        /// Euler angles in degrees
        amount: Vec3Desc,
    },
    /// Non-uniform scale
    Scale {
        /// Scale factor per axis
        amount: Vec3Desc,
    },
}

/// Reference to a registered material
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialRef {
    /// Registry key of the referenced material
    #[serde(rename = "materialId")]
    pub material_id: String,
}

/// Distinguishes plain group nodes from LOD nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// Ordinary grouping node
    #[default]
    Group,
    /// Level-of-detail switch node
    Lod,
}

/// One level of a LOD node
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LodLevelDesc {
    /// Id of the node shown at this level
    #[serde(rename = "nodeId")]
    pub node_id: String,
    /// Minimum viewer distance at which this level becomes active
    pub mindist: f32,
    /// Transforms forwarded to the referenced node
    #[serde(default)]
    pub transforms: Vec<TransformDesc>,
}

/// A named node in the scene dictionary
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeDesc {
    /// Group or LOD
    #[serde(rename = "type")]
    pub kind: NodeKind,
    /// Transforms applied in declared order
    pub transforms: Vec<TransformDesc>,
    /// Material set for this node's subtree
    pub materialref: Option<MaterialRef>,
    /// Typed children, keyed by an arbitrary label
    ///
    /// A `BTreeMap` keeps sibling traversal order deterministic across
    /// builds.
    pub children: BTreeMap<String, ChildDesc>,
    /// LOD levels, only meaningful when `kind` is [`NodeKind::Lod`]
    #[serde(rename = "lodNodes")]
    pub lod_nodes: Vec<LodLevelDesc>,
}

/// Reference to another node in the dictionary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeRefDesc {
    /// Id of the referenced node
    #[serde(rename = "nodeId")]
    pub node_id: String,
    /// Transforms forwarded to the referenced node
    #[serde(default)]
    pub transforms: Vec<TransformDesc>,
    /// Material context override for the referenced subtree
    #[serde(default)]
    pub materialref: Option<MaterialRef>,
}

/// Flat quad primitive
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RectangleDesc {
    /// First corner
    pub xy1: Option<Vec2Desc>,
    /// Opposite corner
    pub xy2: Option<Vec2Desc>,
    /// Transforms applied to the primitive
    pub transforms: Vec<TransformDesc>,
    /// Explicit material; falls back to the inherited context
    pub materialref: Option<MaterialRef>,
}

/// Single triangle primitive
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TriangleDesc {
    /// First vertex
    pub xyz1: Option<Vec3Desc>,
    /// Second vertex
    pub xyz2: Option<Vec3Desc>,
    /// Third vertex
    pub xyz3: Option<Vec3Desc>,
    /// Transforms applied to the primitive
    pub transforms: Vec<TransformDesc>,
    /// Explicit material; falls back to the inherited context
    pub materialref: Option<MaterialRef>,
}

/// Axis-aligned box primitive
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BoxDesc {
    /// First corner
    pub xyz1: Option<Vec3Desc>,
    /// Opposite corner
    pub xyz2: Option<Vec3Desc>,
    /// Transforms applied to the primitive
    pub transforms: Vec<TransformDesc>,
    /// Explicit material; falls back to the inherited context
    pub materialref: Option<MaterialRef>,
}

/// Cylinder / frustum primitive
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CylinderDesc {
    /// Bottom radius
    pub base: Option<f32>,
    /// Top radius
    pub top: Option<f32>,
    /// Height along Y
    pub height: Option<f32>,
    /// Radial subdivisions
    pub slices: Option<u32>,
    /// Height subdivisions, default 1
    pub stacks: Option<u32>,
    /// Close the ends with caps
    pub capsclose: bool,
    /// Start angle in radians, default 0
    pub thetastart: Option<f32>,
    /// Angular sweep in radians, default full circle
    pub thetalength: Option<f32>,
    /// Transforms applied to the primitive
    pub transforms: Vec<TransformDesc>,
    /// Explicit material; falls back to the inherited context
    pub materialref: Option<MaterialRef>,
}

/// UV sphere primitive
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SphereDesc {
    /// Sphere radius
    pub radius: Option<f32>,
    /// Azimuthal subdivisions
    pub slices: Option<u32>,
    /// Polar subdivisions
    pub stacks: Option<u32>,
    /// Azimuthal start in radians, default 0
    pub thetastart: Option<f32>,
    /// Azimuthal sweep in radians, default full circle
    pub thetalength: Option<f32>,
    /// Polar start in radians, default 0
    pub phistart: Option<f32>,
    /// Polar sweep in radians, default half circle
    pub philength: Option<f32>,
    /// Transforms applied to the primitive
    pub transforms: Vec<TransformDesc>,
    /// Explicit material; falls back to the inherited context
    pub materialref: Option<MaterialRef>,
}

/// Planar polygon primitive
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PolygonDesc {
    /// Boundary points in declared order
    pub points: Vec<Vec3Desc>,
    /// Transforms applied to the primitive
    pub transforms: Vec<TransformDesc>,
    /// Explicit material; falls back to the inherited context
    pub materialref: Option<MaterialRef>,
}

/// NURBS patch primitive
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NurbsDesc {
    /// Polynomial degree along U
    pub degree_u: Option<usize>,
    /// Polynomial degree along V
    pub degree_v: Option<usize>,
    /// Sample count along U
    pub parts_u: Option<usize>,
    /// Sample count along V
    pub parts_v: Option<usize>,
    /// `(degree_u+1) * (degree_v+1)` control points, row-major
    pub controlpoints: Vec<ControlPointDesc>,
    /// Transforms applied to the primitive
    pub transforms: Vec<TransformDesc>,
    /// Explicit material; falls back to the inherited context
    pub materialref: Option<MaterialRef>,
}

/// Point light child
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PointLightDesc {
    /// Light color
    pub color: ColorDesc,
    /// Intensity, default 1
    pub intensity: f32,
    /// Attenuation range, default 1000
    pub distance: f32,
    /// Attenuation decay exponent, default 2
    pub decay: f32,
    /// World position
    pub position: Vec3Desc,
    /// Enable shadow casting
    pub castshadow: bool,
    /// Shadow map resolution
    pub shadowmapsize: u32,
    /// Shadow camera far plane
    pub shadowfar: f32,
}

impl Default for PointLightDesc {
    fn default() -> Self {
        Self {
            color: ColorDesc::default(),
            intensity: 1.0,
            distance: 1000.0,
            decay: 2.0,
            position: Vec3Desc::default(),
            castshadow: false,
            shadowmapsize: 512,
            shadowfar: 500.0,
        }
    }
}

/// Spot light child
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpotLightDesc {
    /// Light color
    pub color: ColorDesc,
    /// Intensity, default 1
    pub intensity: f32,
    /// Attenuation range, default 1000
    pub distance: f32,
    /// Attenuation decay exponent, default 2
    pub decay: f32,
    /// Cone half-angle in radians
    pub angle: f32,
    /// Penumbra fraction in `[0, 1]`
    pub penumbra: f32,
    /// World position
    pub position: Vec3Desc,
    /// Point the cone aims at
    pub target: Vec3Desc,
    /// Enable shadow casting
    pub castshadow: bool,
    /// Shadow map resolution
    pub shadowmapsize: u32,
    /// Shadow camera far plane
    pub shadowfar: f32,
}

impl Default for SpotLightDesc {
    fn default() -> Self {
        Self {
            color: ColorDesc::default(),
            intensity: 1.0,
            distance: 1000.0,
            decay: 2.0,
            angle: std::f32::consts::FRAC_PI_3,
            penumbra: 1.0,
            position: Vec3Desc::default(),
            target: Vec3Desc::default(),
            castshadow: false,
            shadowmapsize: 512,
            shadowfar: 500.0,
        }
    }
}

/// Directional light child
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectionalLightDesc {
    /// Light color
    pub color: ColorDesc,
    /// Intensity, default 1
    pub intensity: f32,
    /// World position (direction points from here toward the origin)
    pub position: Vec3Desc,
    /// Enable shadow casting
    pub castshadow: bool,
    /// Shadow map resolution
    pub shadowmapsize: u32,
    /// Shadow camera far plane
    pub shadowfar: f32,
    /// Orthographic shadow frustum, left plane
    pub shadowleft: f32,
    /// Orthographic shadow frustum, right plane
    pub shadowright: f32,
    /// Orthographic shadow frustum, bottom plane
    pub shadowbottom: f32,
    /// Orthographic shadow frustum, top plane
    pub shadowtop: f32,
}

impl Default for DirectionalLightDesc {
    fn default() -> Self {
        Self {
            color: ColorDesc::default(),
            intensity: 1.0,
            position: Vec3Desc::default(),
            castshadow: false,
            shadowmapsize: 512,
            shadowfar: 500.0,
            shadowleft: -5.0,
            shadowright: 5.0,
            shadowbottom: -5.0,
            shadowtop: 5.0,
        }
    }
}

/// Closed union of child record types
///
/// The `type` field of a child record selects the variant; unsupported type
/// strings become [`ChildDesc::Unknown`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ChildDesc {
    /// Reference instantiating another dictionary node
    Noderef(NodeRefDesc),
    /// Flat quad
    Rectangle(RectangleDesc),
    /// Single triangle
    Triangle(TriangleDesc),
    /// Axis-aligned box
    Box(BoxDesc),
    /// Cylinder or frustum
    Cylinder(CylinderDesc),
    /// UV sphere
    Sphere(SphereDesc),
    /// Planar polygon
    Polygon(PolygonDesc),
    /// NURBS patch
    Nurbs(NurbsDesc),
    /// Point light
    Pointlight(PointLightDesc),
    /// Spot light
    Spotlight(SpotLightDesc),
    /// Directional light
    Directionallight(DirectionalLightDesc),
    /// Any unrecognized type string; reported and dropped at build time
    #[serde(other)]
    Unknown,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_group_node_with_primitive() {
        let json = r#"{
            "transforms": [
                {"type": "translate", "amount": {"x": 1, "y": 2, "z": 3}},
                {"type": "rotate", "amount": {"y": 90}}
            ],
            "materialref": {"materialId": "wood"},
            "children": {
                "top": {"type": "rectangle", "xy1": {"x": -1, "y": -1}, "xy2": {"x": 1, "y": 1}}
            }
        }"#;
        let node: NodeDesc = serde_json::from_str(json).unwrap();

        assert_eq!(node.kind, NodeKind::Group);
        assert_eq!(node.transforms.len(), 2);
        assert!(matches!(node.transforms[0], TransformDesc::Translate { .. }));
        assert_eq!(node.materialref.unwrap().material_id, "wood");
        assert!(matches!(node.children["top"], ChildDesc::Rectangle(_)));
    }

    #[test]
    fn test_parse_lod_node() {
        let json = r#"{
            "type": "lod",
            "lodNodes": [
                {"nodeId": "near", "mindist": 0},
                {"nodeId": "far", "mindist": 50}
            ]
        }"#;
        let node: NodeDesc = serde_json::from_str(json).unwrap();

        assert_eq!(node.kind, NodeKind::Lod);
        assert_eq!(node.lod_nodes.len(), 2);
        assert_eq!(node.lod_nodes[1].node_id, "far");
    }

    #[test]
    fn test_unknown_child_type_is_tolerated() {
        let json = r#"{"type": "hologram", "radius": 4}"#;
        let child: ChildDesc = serde_json::from_str(json).unwrap();
        assert!(matches!(child, ChildDesc::Unknown));
    }

    #[test]
    fn test_control_point_weight_defaults_to_one() {
        let cp: ControlPointDesc = serde_json::from_str(r#"{"x": 1, "y": 2, "z": 3}"#).unwrap();
        assert_eq!(cp.w, 1.0);
    }

    #[test]
    fn test_light_defaults_match_format() {
        let light: PointLightDesc =
            serde_json::from_str(r#"{"color": {"r": 1, "g": 1, "b": 1}}"#).unwrap();
        assert_eq!(light.intensity, 1.0);
        assert_eq!(light.distance, 1000.0);
        assert_eq!(light.decay, 2.0);
        assert_eq!(light.shadowmapsize, 512);
    }
}
