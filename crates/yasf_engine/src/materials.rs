//! Material definitions and the string-keyed registry
//!
//! The registry is a pure lookup table supplied to the scene graph builder.
//! Texture pixel data is an external collaborator's concern; materials only
//! carry texture reference strings.

use std::collections::HashMap;

use crate::foundation::math::Vec3;

/// Unique identifier for materials
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaterialId(pub u32);

/// Phong-style material resource
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    /// Optional name for debugging
    pub name: Option<String>,
    /// Diffuse color
    pub color: Vec3,
    /// Specular color
    pub specular: Vec3,
    /// Emissive color
    pub emissive: Vec3,
    /// Specular exponent
    pub shininess: f32,
    /// Whether alpha blending applies
    pub transparent: bool,
    /// Opacity in `[0, 1]`
    pub opacity: f32,
    /// Render both faces
    pub two_sided: bool,
    /// Render as wireframe
    pub wireframe: bool,
    /// Flat shading instead of smooth
    pub flat_shading: bool,
    /// Diffuse texture reference, resolved by the renderer
    pub texture_ref: Option<String>,
    /// Bump map reference
    pub bump_ref: Option<String>,
    /// Bump map scale
    pub bump_scale: f32,
    /// Texture repeat length along S
    pub tex_length_s: f32,
    /// Texture repeat length along T
    pub tex_length_t: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            name: None,
            color: Vec3::new(1.0, 1.0, 1.0),
            specular: Vec3::new(0.5, 0.5, 0.5),
            emissive: Vec3::zeros(),
            shininess: 30.0,
            transparent: false,
            opacity: 1.0,
            two_sided: false,
            wireframe: false,
            flat_shading: false,
            texture_ref: None,
            bump_ref: None,
            bump_scale: 1.0,
            tex_length_s: 1.0,
            tex_length_t: 1.0,
        }
    }
}

impl Material {
    /// Create a material with the given diffuse color
    pub fn colored(color: Vec3) -> Self {
        Self {
            color,
            ..Default::default()
        }
    }

    /// Set the material name for debugging
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Attach a diffuse texture reference
    #[must_use]
    pub fn with_texture(mut self, texture: impl Into<String>) -> Self {
        self.texture_ref = Some(texture.into());
        self
    }
}

/// String-keyed material lookup table
///
/// Populated by the caller (or by the YASF document front end) before a
/// build; the builder only performs lookups.
#[derive(Debug, Default)]
pub struct MaterialRegistry {
    materials: HashMap<MaterialId, Material>,
    by_key: HashMap<String, MaterialId>,
    next_id: u32,
}

impl MaterialRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            materials: HashMap::new(),
            by_key: HashMap::new(),
            next_id: 1, // Start from 1, reserve 0 for "no material"
        }
    }

    /// Register a material under a string key, returning its id
    ///
    /// Re-registering a key replaces the stored material but keeps the id.
    pub fn register(&mut self, key: impl Into<String>, material: Material) -> MaterialId {
        let key = key.into();
        if let Some(&id) = self.by_key.get(&key) {
            self.materials.insert(id, material);
            return id;
        }
        let id = MaterialId(self.next_id);
        self.next_id += 1;
        log::debug!("registered material '{}' as {:?}", key, id);
        self.by_key.insert(key, id);
        self.materials.insert(id, material);
        id
    }

    /// Look up the id registered for a key
    pub fn resolve(&self, key: &str) -> Option<MaterialId> {
        self.by_key.get(key).copied()
    }

    /// Get a material by id
    pub fn get(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(&id)
    }

    /// Get a material directly by key
    pub fn get_by_key(&self, key: &str) -> Option<&Material> {
        self.resolve(key).and_then(|id| self.get(id))
    }

    /// Number of registered materials
    pub fn len(&self) -> usize {
        self.materials.len()
    }

    /// True when no materials are registered
    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    /// Iterate over registered keys
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.by_key.keys().map(String::as_str)
    }
}
