//! Recursive scene graph instantiation
//!
//! Walks the scene dictionary from a root id and produces a [`RenderGraph`]:
//! groups become empty nodes, primitives are tessellated into meshes, lights
//! become light descriptors, and LOD records become switch groups. A node
//! referenced from several places is instantiated once per reference.
//!
//! Most problems are local: a malformed primitive, a dangling reference, or
//! a missing material drops that child, records a warning on the graph, and
//! leaves the rest of the scene intact. Only a missing root or a document
//! parse failure abort the build.

use std::collections::HashMap;

use serde::Deserialize;
use slotmap::SlotMap;

use crate::error::SceneError;
use crate::foundation::math::{Mat4, Mat4Ext, Vec2, Vec3, Vec4};
use crate::geometry::nurbs::ControlNet;
use crate::geometry::primitives::{self, CylinderParams, SphereParams};
use crate::geometry::SurfaceMesh;
use crate::materials::{MaterialId, MaterialRegistry};
use crate::scene::description::{
    ChildDesc, CylinderDesc, MaterialRef, NodeKind, NurbsDesc, SceneDict, SphereDesc,
    TransformDesc,
};
use crate::scene::node::{
    Light, LodGroup, LodLevel, RenderGraph, RenderNode, RenderNodeKey, ShadowFrustum,
    ShadowSettings,
};

/// How a node's material reference propagates to descendants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaterialInheritance {
    /// Single shared material slot; a material set in one subtree stays
    /// active for siblings visited later. Matches the historical loader.
    #[default]
    Legacy,
    /// Material context is restored when a subtree finishes, so a material
    /// only affects the node that declared it and its descendants.
    Scoped,
}

/// Options controlling a scene graph build
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct BuildOptions {
    /// Material propagation mode
    pub material_inheritance: MaterialInheritance,
}

/// Builds a [`RenderGraph`] from a scene dictionary
///
/// One builder performs one build; construct it fresh via
/// [`SceneGraphBuilder::build`].
pub struct SceneGraphBuilder<'a> {
    dict: &'a SceneDict,
    materials: &'a MaterialRegistry,
    options: BuildOptions,
    nodes: SlotMap<RenderNodeKey, RenderNode>,
    index: HashMap<String, RenderNodeKey>,
    instances: HashMap<String, Vec<RenderNodeKey>>,
    warnings: Vec<SceneError>,
    // Ids currently being instantiated, for reference cycle detection
    in_progress: Vec<String>,
    // Shared material slot, legacy mode only
    current_material: Option<MaterialId>,
}

impl<'a> SceneGraphBuilder<'a> {
    /// Instantiate the dictionary starting at `root_id`
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::UnknownNode`] when `root_id` is not present in
    /// the dictionary. Every other problem is recorded as a warning on the
    /// returned graph.
    pub fn build(
        dict: &'a SceneDict,
        root_id: &str,
        materials: &'a MaterialRegistry,
        options: BuildOptions,
    ) -> Result<RenderGraph, SceneError> {
        if !dict.contains_key(root_id) {
            return Err(SceneError::UnknownNode(root_id.to_string()));
        }

        let mut builder = Self {
            dict,
            materials,
            options,
            nodes: SlotMap::with_key(),
            index: HashMap::new(),
            instances: HashMap::new(),
            warnings: Vec::new(),
            in_progress: Vec::new(),
            current_material: None,
        };

        // The root exists and the reference stack is empty, so this cannot
        // return None.
        let root = builder
            .build_node(root_id, &[], None)
            .ok_or_else(|| SceneError::UnknownNode(root_id.to_string()))?;

        log::debug!(
            "built scene graph from '{}': {} nodes, {} warnings",
            root_id,
            builder.nodes.len(),
            builder.warnings.len()
        );

        Ok(RenderGraph {
            nodes: builder.nodes,
            root,
            index: builder.index,
            instances: builder.instances,
            warnings: builder.warnings,
        })
    }

    /// Instantiate one dictionary node
    ///
    /// `inherited` are transforms forwarded from the referencing record;
    /// they apply after the node's own transforms. `scoped_material` is the
    /// material context in scoped mode and ignored in legacy mode.
    fn build_node(
        &mut self,
        node_id: &str,
        inherited: &[TransformDesc],
        scoped_material: Option<MaterialId>,
    ) -> Option<RenderNodeKey> {
        let Some(desc) = self.dict.get(node_id) else {
            self.warn(SceneError::UnknownNode(node_id.to_string()));
            return None;
        };
        if self.in_progress.iter().any(|id| id == node_id) {
            self.warn(SceneError::CycleDetected(node_id.to_string()));
            return None;
        }
        self.in_progress.push(node_id.to_string());

        // Own transforms apply first, then the forwarded ones.
        let transform = transform_matrix(inherited) * transform_matrix(&desc.transforms);

        let node_material = self.resolve_ref(desc.materialref.as_ref());
        let context = match self.options.material_inheritance {
            MaterialInheritance::Legacy => {
                if node_material.is_some() {
                    self.current_material = node_material;
                }
                self.current_material
            }
            MaterialInheritance::Scoped => node_material.or(scoped_material),
        };

        let mut node = RenderNode::empty(node_id);
        node.transform = transform;

        match desc.kind {
            NodeKind::Lod => {
                let mut levels = Vec::with_capacity(desc.lod_nodes.len());
                for level in &desc.lod_nodes {
                    if let Some(key) = self.build_node(&level.node_id, &level.transforms, context)
                    {
                        levels.push(LodLevel {
                            node: key,
                            min_distance: level.mindist,
                        });
                        node.children.push(key);
                    }
                }
                node.lod = Some(LodGroup { levels });
            }
            NodeKind::Group => {
                // BTreeMap iteration keeps sibling order stable across builds.
                for (child_key, child) in &desc.children {
                    if let Some(key) = self.build_child(node_id, child_key, child, context) {
                        node.children.push(key);
                    }
                }
            }
        }

        self.in_progress.pop();

        let key = self.nodes.insert(node);
        // Last-built instance wins the index slot; earlier ones stay listed.
        self.index.insert(node_id.to_string(), key);
        self.instances
            .entry(node_id.to_string())
            .or_default()
            .push(key);
        Some(key)
    }

    /// Instantiate one child record of a group node
    fn build_child(
        &mut self,
        node_id: &str,
        child_key: &str,
        child: &ChildDesc,
        context: Option<MaterialId>,
    ) -> Option<RenderNodeKey> {
        match child {
            ChildDesc::Noderef(r) => {
                let override_material = self.resolve_ref(r.materialref.as_ref());
                let child_context = match self.options.material_inheritance {
                    MaterialInheritance::Legacy => {
                        if override_material.is_some() {
                            self.current_material = override_material;
                        }
                        self.current_material
                    }
                    MaterialInheritance::Scoped => override_material.or(context),
                };
                self.build_node(&r.node_id, &r.transforms, child_context)
            }
            ChildDesc::Pointlight(l) => {
                let light = Light::point(
                    l.position.into(),
                    l.color.into(),
                    l.intensity,
                    l.distance,
                    l.decay,
                );
                let light = if l.castshadow {
                    light.with_shadow(ShadowSettings {
                        map_size: l.shadowmapsize,
                        far: l.shadowfar,
                        frustum: None,
                    })
                } else {
                    light
                };
                Some(self.insert_light(child_key, light))
            }
            ChildDesc::Spotlight(l) => {
                let light = Light::spot(
                    l.position.into(),
                    l.target.into(),
                    l.color.into(),
                    l.intensity,
                    l.distance,
                    l.decay,
                    l.angle,
                    l.penumbra,
                );
                let light = if l.castshadow {
                    light.with_shadow(ShadowSettings {
                        map_size: l.shadowmapsize,
                        far: l.shadowfar,
                        frustum: None,
                    })
                } else {
                    light
                };
                Some(self.insert_light(child_key, light))
            }
            ChildDesc::Directionallight(l) => {
                let light = Light::directional(l.position.into(), l.color.into(), l.intensity);
                let light = if l.castshadow {
                    light.with_shadow(ShadowSettings {
                        map_size: l.shadowmapsize,
                        far: l.shadowfar,
                        frustum: Some(ShadowFrustum {
                            left: l.shadowleft,
                            right: l.shadowright,
                            bottom: l.shadowbottom,
                            top: l.shadowtop,
                        }),
                    })
                } else {
                    light
                };
                Some(self.insert_light(child_key, light))
            }
            ChildDesc::Nurbs(n) => {
                // A failed patch keeps its slot in the graph as an empty
                // placeholder so sibling layout is unaffected.
                match nurbs_mesh(n) {
                    Ok(mesh) => self.insert_primitive(
                        node_id,
                        child_key,
                        mesh,
                        &n.transforms,
                        n.materialref.as_ref(),
                        context,
                    ),
                    Err(err) => {
                        log::warn!("nurbs '{child_key}' in '{node_id}': {err}");
                        self.warnings.push(err);
                        let mut placeholder = RenderNode::empty(child_key);
                        placeholder.transform = transform_matrix(&n.transforms);
                        Some(self.nodes.insert(placeholder))
                    }
                }
            }
            ChildDesc::Rectangle(r) => {
                let mesh = match (r.xy1, r.xy2) {
                    (Some(a), Some(b)) => Ok(primitives::rectangle(Vec2::from(a), Vec2::from(b))),
                    _ => Err(malformed("rectangle", "xy1 and xy2 are required")),
                };
                self.primitive_child(node_id, child_key, mesh, &r.transforms, r.materialref.as_ref(), context)
            }
            ChildDesc::Triangle(t) => {
                let mesh = match (t.xyz1, t.xyz2, t.xyz3) {
                    (Some(a), Some(b), Some(c)) => {
                        Ok(primitives::triangle(Vec3::from(a), Vec3::from(b), Vec3::from(c)))
                    }
                    _ => Err(malformed("triangle", "xyz1, xyz2 and xyz3 are required")),
                };
                self.primitive_child(node_id, child_key, mesh, &t.transforms, t.materialref.as_ref(), context)
            }
            ChildDesc::Box(b) => {
                let mesh = match (b.xyz1, b.xyz2) {
                    (Some(a), Some(c)) => Ok(primitives::box_from_corners(Vec3::from(a), Vec3::from(c))),
                    _ => Err(malformed("box", "xyz1 and xyz2 are required")),
                };
                self.primitive_child(node_id, child_key, mesh, &b.transforms, b.materialref.as_ref(), context)
            }
            ChildDesc::Cylinder(c) => {
                let mesh = cylinder_mesh(c);
                self.primitive_child(node_id, child_key, mesh, &c.transforms, c.materialref.as_ref(), context)
            }
            ChildDesc::Sphere(s) => {
                let mesh = sphere_mesh(s);
                self.primitive_child(node_id, child_key, mesh, &s.transforms, s.materialref.as_ref(), context)
            }
            ChildDesc::Polygon(p) => {
                let points: Vec<Vec3> = p.points.iter().map(|&v| Vec3::from(v)).collect();
                let mesh = primitives::polygon(&points);
                self.primitive_child(node_id, child_key, mesh, &p.transforms, p.materialref.as_ref(), context)
            }
            ChildDesc::Unknown => {
                self.warn(SceneError::UnknownChildType(child_key.to_string()));
                None
            }
        }
    }

    /// Attach a tessellated primitive, dropping it on mesh or material failure
    fn primitive_child(
        &mut self,
        node_id: &str,
        child_key: &str,
        mesh: Result<SurfaceMesh, SceneError>,
        transforms: &[TransformDesc],
        materialref: Option<&MaterialRef>,
        context: Option<MaterialId>,
    ) -> Option<RenderNodeKey> {
        match mesh {
            Ok(mesh) => {
                self.insert_primitive(node_id, child_key, mesh, transforms, materialref, context)
            }
            Err(err) => {
                log::warn!("child '{child_key}' in '{node_id}': {err}");
                self.warnings.push(err);
                None
            }
        }
    }

    fn insert_primitive(
        &mut self,
        node_id: &str,
        child_key: &str,
        mesh: SurfaceMesh,
        transforms: &[TransformDesc],
        materialref: Option<&MaterialRef>,
        context: Option<MaterialId>,
    ) -> Option<RenderNodeKey> {
        let own = self.resolve_ref(materialref);
        let material = match self.options.material_inheritance {
            MaterialInheritance::Legacy => own.or(self.current_material),
            MaterialInheritance::Scoped => own.or(context),
        };
        let Some(material) = material else {
            self.warn(SceneError::MissingMaterial {
                child: child_key.to_string(),
                node: node_id.to_string(),
            });
            return None;
        };

        let mut node = RenderNode::empty(child_key);
        node.transform = transform_matrix(transforms);
        node.mesh = Some(mesh);
        node.material = Some(material);
        Some(self.nodes.insert(node))
    }

    fn insert_light(&mut self, child_key: &str, light: Light) -> RenderNodeKey {
        let mut node = RenderNode::empty(child_key);
        node.light = Some(light);
        self.nodes.insert(node)
    }

    /// Resolve a material reference against the registry, logging misses
    fn resolve_ref(&self, materialref: Option<&MaterialRef>) -> Option<MaterialId> {
        let r = materialref?;
        let resolved = self.materials.resolve(&r.material_id);
        if resolved.is_none() {
            log::warn!("material '{}' is not registered", r.material_id);
        }
        resolved
    }

    fn warn(&mut self, err: SceneError) {
        log::warn!("{err}");
        self.warnings.push(err);
    }
}

/// Compose an ordered transform list into a single matrix
///
/// Steps multiply left to right, so the last declared step is closest to
/// the geometry.
fn transform_matrix(steps: &[TransformDesc]) -> Mat4 {
    steps
        .iter()
        .fold(Mat4::identity(), |m, step| m * step_matrix(step))
}

fn step_matrix(step: &TransformDesc) -> Mat4 {
    match step {
        TransformDesc::Translate { amount } => Mat4::new_translation(&Vec3::from(*amount)),
        TransformDesc::Rotate { amount } => Mat4::euler_xyz_deg(amount.x, amount.y, amount.z),
        TransformDesc::Scale { amount } => Mat4::new_nonuniform_scaling(&Vec3::from(*amount)),
    }
}

fn malformed(kind: &'static str, reason: &str) -> SceneError {
    SceneError::MalformedPrimitive {
        kind,
        reason: reason.to_string(),
    }
}

fn cylinder_mesh(desc: &CylinderDesc) -> Result<SurfaceMesh, SceneError> {
    let (Some(base), Some(top), Some(height), Some(slices)) =
        (desc.base, desc.top, desc.height, desc.slices)
    else {
        return Err(malformed("cylinder", "base, top, height and slices are required"));
    };
    let params = CylinderParams {
        base_radius: base,
        top_radius: top,
        height,
        slices,
        stacks: desc.stacks.unwrap_or(1),
        caps: desc.capsclose,
        theta_start: desc.thetastart.unwrap_or(0.0),
        theta_length: desc.thetalength.unwrap_or(std::f32::consts::TAU),
    };
    primitives::cylinder(&params)
}

fn sphere_mesh(desc: &SphereDesc) -> Result<SurfaceMesh, SceneError> {
    let (Some(radius), Some(slices), Some(stacks)) = (desc.radius, desc.slices, desc.stacks)
    else {
        return Err(malformed("sphere", "radius, slices and stacks are required"));
    };
    let params = SphereParams {
        radius,
        slices,
        stacks,
        theta_start: desc.thetastart.unwrap_or(0.0),
        theta_length: desc.thetalength.unwrap_or(std::f32::consts::TAU),
        phi_start: desc.phistart.unwrap_or(0.0),
        phi_length: desc.philength.unwrap_or(std::f32::consts::PI),
    };
    primitives::sphere(&params)
}

fn nurbs_mesh(desc: &NurbsDesc) -> Result<SurfaceMesh, SceneError> {
    let (Some(du), Some(dv), Some(pu), Some(pv)) =
        (desc.degree_u, desc.degree_v, desc.parts_u, desc.parts_v)
    else {
        return Err(malformed(
            "nurbs",
            "degree_u, degree_v, parts_u and parts_v are required",
        ));
    };
    let points: Vec<Vec4> = desc
        .controlpoints
        .iter()
        .map(|cp| Vec4::new(cp.x, cp.y, cp.z, cp.w))
        .collect();
    let net = ControlNet::from_flat(points, du, dv)?;
    net.evaluate(pu, pv)
}
