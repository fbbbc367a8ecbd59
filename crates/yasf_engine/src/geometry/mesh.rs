//! Mesh representation for generated geometry
//!
//! Backend-agnostic vertex and triangle-list containers. The renderer
//! consuming these is an external collaborator; the only contract is
//! position/normal/UV per vertex plus a triangle index list.

use bytemuck::{Pod, Zeroable};

/// 3D vertex with position, normal, and texture coordinates
///
/// The `#[repr(C)]` layout keeps the struct directly uploadable to GPU
/// vertex buffers.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    /// Position in 3D space
    pub position: [f32; 3],

    /// Normal vector
    pub normal: [f32; 3],

    /// Texture coordinates
    pub tex_coord: [f32; 2],
}

impl Vertex {
    /// Create a new vertex
    pub fn new(position: [f32; 3], normal: [f32; 3], tex_coord: [f32; 2]) -> Self {
        Self {
            position,
            normal,
            tex_coord,
        }
    }
}

/// Triangle mesh produced by a primitive generator or the surface evaluator
///
/// Immutable by convention once produced; owned by the render node that
/// created it.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceMesh {
    /// Vertex data
    pub vertices: Vec<Vertex>,

    /// Index data for triangles, three indices per triangle
    pub indices: Vec<u32>,
}

impl SurfaceMesh {
    /// Create a new mesh from vertex and index data
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        Self { vertices, indices }
    }

    /// Number of vertices in the mesh
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of triangles in the mesh
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// True if the mesh carries no geometry
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.indices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_is_pod() {
        // A vertex must round-trip through raw bytes for GPU upload
        let v = Vertex::new([1.0, 2.0, 3.0], [0.0, 1.0, 0.0], [0.5, 0.5]);
        let bytes: &[u8] = bytemuck::bytes_of(&v);
        assert_eq!(bytes.len(), std::mem::size_of::<Vertex>());
        let back: Vertex = *bytemuck::from_bytes(bytes);
        assert_eq!(back, v);
    }

    #[test]
    fn test_mesh_counts() {
        let vertices = vec![
            Vertex::new([0.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 0.0]),
            Vertex::new([1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [1.0, 0.0]),
            Vertex::new([1.0, 1.0, 0.0], [0.0, 0.0, 1.0], [1.0, 1.0]),
        ];
        let mesh = SurfaceMesh::new(vertices, vec![0, 1, 2]);
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.triangle_count(), 1);
        assert!(!mesh.is_empty());
    }
}
