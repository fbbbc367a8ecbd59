//! YASF document front end
//!
//! A complete YASF file is a single JSON object with one top-level `yasf`
//! key holding the `globals`, `materials`, and `graph` sections. This module
//! deserializes the whole document, turns the materials section into a
//! [`MaterialRegistry`], and drives the graph builder from the declared root
//! id. Texture entries stay reference strings; decoding image files is the
//! renderer's job.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::SceneError;
use crate::materials::{Material, MaterialRegistry};
use crate::scene::builder::{BuildOptions, SceneGraphBuilder};
use crate::scene::description::{ColorDesc, SceneDict};
use crate::scene::node::RenderGraph;

/// Top-level wrapper object of a YASF file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YasfFile {
    /// The document payload
    pub yasf: YasfDocument,
}

/// Scene-wide settings from the `globals` section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalsDesc {
    /// Clear color
    pub background: ColorDesc,
    /// Ambient light color
    pub ambient: ColorDesc,
    /// Optional distance fog
    pub fog: Option<FogDesc>,
}

/// Linear fog parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FogDesc {
    /// Fog color
    pub color: ColorDesc,
    /// Distance at which fog starts
    pub near: f32,
    /// Distance at which fog fully occludes
    pub far: f32,
}

impl Default for FogDesc {
    fn default() -> Self {
        Self {
            color: ColorDesc::default(),
            near: 1.0,
            far: 1000.0,
        }
    }
}

/// One entry of the `materials` section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialDesc {
    /// Diffuse color, defaults to white
    pub color: ColorDesc,
    /// Specular color, defaults to mid gray
    pub specular: ColorDesc,
    /// Emissive color, defaults to black
    pub emissive: ColorDesc,
    /// Specular exponent
    pub shininess: f32,
    /// Enable alpha blending
    pub transparent: bool,
    /// Opacity in `[0, 1]`
    pub opacity: f32,
    /// Render both faces
    pub twosided: bool,
    /// Render as wireframe
    pub wireframe: bool,
    /// Flat shading instead of smooth
    pub shading: bool,
    /// Diffuse texture reference
    pub textureref: Option<String>,
    /// Bump map reference
    pub bumpref: Option<String>,
    /// Bump map scale
    pub bumpscale: f32,
    /// Texture repeat length along S
    pub texlength_s: f32,
    /// Texture repeat length along T
    pub texlength_t: f32,
}

impl Default for MaterialDesc {
    fn default() -> Self {
        Self {
            color: ColorDesc { r: 1.0, g: 1.0, b: 1.0 },
            specular: ColorDesc { r: 0.5, g: 0.5, b: 0.5 },
            emissive: ColorDesc::default(),
            shininess: 30.0,
            transparent: false,
            opacity: 1.0,
            twosided: false,
            wireframe: false,
            shading: false,
            textureref: None,
            bumpref: None,
            bumpscale: 1.0,
            texlength_s: 1.0,
            texlength_t: 1.0,
        }
    }
}

impl From<&MaterialDesc> for Material {
    fn from(desc: &MaterialDesc) -> Self {
        Self {
            name: None,
            color: desc.color.into(),
            specular: desc.specular.into(),
            emissive: desc.emissive.into(),
            shininess: desc.shininess,
            transparent: desc.transparent,
            opacity: desc.opacity,
            two_sided: desc.twosided,
            wireframe: desc.wireframe,
            flat_shading: desc.shading,
            texture_ref: desc.textureref.clone(),
            bump_ref: desc.bumpref.clone(),
            bump_scale: desc.bumpscale,
            tex_length_s: desc.texlength_s,
            tex_length_t: desc.texlength_t,
        }
    }
}

/// The `graph` section: a root id plus the node dictionary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphDesc {
    /// Id of the node the scene starts from
    pub rootid: String,
    /// Every other key is a node record
    #[serde(flatten)]
    pub nodes: SceneDict,
}

/// A parsed YASF document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YasfDocument {
    /// Scene-wide settings
    #[serde(default)]
    pub globals: Option<GlobalsDesc>,
    /// Named material definitions
    #[serde(default)]
    pub materials: BTreeMap<String, MaterialDesc>,
    /// The scene graph section
    pub graph: GraphDesc,
}

impl YasfDocument {
    /// Parse a document from JSON text
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::Parse`] when the text is not a valid YASF
    /// document.
    pub fn from_json(text: &str) -> Result<Self, SceneError> {
        let file: YasfFile = serde_json::from_str(text)?;
        Ok(file.yasf)
    }

    /// Build a registry from the `materials` section
    ///
    /// Entries register under their section key, in key order.
    pub fn material_registry(&self) -> MaterialRegistry {
        let mut registry = MaterialRegistry::new();
        for (key, desc) in &self.materials {
            registry.register(key.clone(), Material::from(desc).with_name(key.clone()));
        }
        registry
    }

    /// Instantiate the scene graph declared by this document
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::UnknownNode`] when `graph.rootid` names a node
    /// that is not in the dictionary.
    pub fn build(&self, options: BuildOptions) -> Result<RenderGraph, SceneError> {
        let materials = self.material_registry();
        SceneGraphBuilder::build(&self.graph.nodes, &self.graph.rootid, &materials, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const DOC: &str = r#"{
        "yasf": {
            "globals": {
                "background": {"r": 0.1, "g": 0.1, "b": 0.2},
                "ambient": {"r": 0.3, "g": 0.3, "b": 0.3},
                "fog": {"color": {"r": 1, "g": 1, "b": 1}, "near": 5, "far": 100}
            },
            "materials": {
                "wood": {
                    "color": {"r": 0.6, "g": 0.4, "b": 0.2},
                    "shininess": 10,
                    "textureref": "woodTex"
                },
                "glass": {
                    "color": {"r": 0.9, "g": 0.9, "b": 1.0},
                    "transparent": true,
                    "opacity": 0.4
                }
            },
            "graph": {
                "rootid": "scene",
                "scene": {
                    "materialref": {"materialId": "wood"},
                    "children": {
                        "table_top": {
                            "type": "box",
                            "xyz1": {"x": -1, "y": -0.05, "z": -0.5},
                            "xyz2": {"x": 1, "y": 0.05, "z": 0.5}
                        },
                        "window": {
                            "type": "rectangle",
                            "xy1": {"x": -1, "y": -1},
                            "xy2": {"x": 1, "y": 1},
                            "materialref": {"materialId": "glass"}
                        }
                    }
                }
            }
        }
    }"#;

    #[test]
    fn test_parse_full_document() {
        let doc = YasfDocument::from_json(DOC).unwrap();

        let globals = doc.globals.as_ref().unwrap();
        assert_relative_eq!(globals.background.b, 0.2);
        assert_relative_eq!(globals.fog.as_ref().unwrap().far, 100.0);

        assert_eq!(doc.materials.len(), 2);
        assert_eq!(doc.graph.rootid, "scene");
        assert!(doc.graph.nodes.contains_key("scene"));
    }

    #[test]
    fn test_material_defaults_fill_omitted_fields() {
        let doc = YasfDocument::from_json(DOC).unwrap();
        let wood = &doc.materials["wood"];

        // Unspecified fields take the format's defaults.
        assert_relative_eq!(wood.specular.r, 0.5);
        assert_relative_eq!(wood.opacity, 1.0);
        assert_relative_eq!(wood.shininess, 10.0);

        let registry = doc.material_registry();
        let wood = registry.get_by_key("wood").unwrap();
        assert_eq!(wood.texture_ref.as_deref(), Some("woodTex"));
        assert_relative_eq!(wood.color.x, 0.6);
    }

    #[test]
    fn test_build_from_document() {
        let doc = YasfDocument::from_json(DOC).unwrap();
        let graph = doc.build(BuildOptions::default()).unwrap();

        assert!(graph.warnings().is_empty());
        assert_eq!(graph.len(), 3);

        let registry = doc.material_registry();
        let root = graph.node(graph.root()).unwrap();
        let top = graph.node(root.children[0]).unwrap();
        assert_eq!(top.name, "table_top");
        assert_eq!(top.material, registry.resolve("wood"));
        let window = graph.node(root.children[1]).unwrap();
        assert_eq!(window.material, registry.resolve("glass"));
    }

    #[test]
    fn test_invalid_json_is_a_parse_error() {
        let err = YasfDocument::from_json("{\"yasf\": ").unwrap_err();
        assert!(matches!(err, SceneError::Parse(_)));
    }

    #[test]
    fn test_missing_graph_section_is_a_parse_error() {
        let err = YasfDocument::from_json(r#"{"yasf": {"materials": {}}}"#).unwrap_err();
        assert!(matches!(err, SceneError::Parse(_)));
    }
}
