//! Primitive mesh generators
//!
//! Builds the fixed set of scene-description primitives. Parameter semantics
//! follow the scene format: rectangles and boxes are sized by the absolute
//! corner delta and centered at the origin, cylinders and spheres take
//! angular ranges in radians defaulting to a full revolution.

use crate::error::SceneError;
use crate::foundation::math::{constants, Vec2, Vec3};
use crate::geometry::mesh::{SurfaceMesh, Vertex};

/// Flat axis-aligned quad in the XY plane, facing +Z
///
/// Sized by the absolute delta between the two corners, centered at the
/// origin.
pub fn rectangle(xy1: Vec2, xy2: Vec2) -> SurfaceMesh {
    let hw = (xy2.x - xy1.x).abs() * 0.5;
    let hh = (xy2.y - xy1.y).abs() * 0.5;

    let vertices = vec![
        Vertex::new([-hw, -hh, 0.0], [0.0, 0.0, 1.0], [0.0, 0.0]),
        Vertex::new([hw, -hh, 0.0], [0.0, 0.0, 1.0], [1.0, 0.0]),
        Vertex::new([hw, hh, 0.0], [0.0, 0.0, 1.0], [1.0, 1.0]),
        Vertex::new([-hw, hh, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0]),
    ];
    let indices = vec![0, 1, 2, 2, 3, 0];

    SurfaceMesh::new(vertices, indices)
}

/// Single flat triangle through three points, in declared order
pub fn triangle(p1: Vec3, p2: Vec3, p3: Vec3) -> SurfaceMesh {
    let cross = (p2 - p1).cross(&(p3 - p1));
    let normal = if cross.norm_squared() > 1e-12 {
        cross.normalize()
    } else {
        Vec3::z()
    };
    let n = [normal.x, normal.y, normal.z];

    let vertices = vec![
        Vertex::new([p1.x, p1.y, p1.z], n, [0.0, 0.0]),
        Vertex::new([p2.x, p2.y, p2.z], n, [1.0, 0.0]),
        Vertex::new([p3.x, p3.y, p3.z], n, [0.0, 1.0]),
    ];

    SurfaceMesh::new(vertices, vec![0, 1, 2])
}

/// Axis-aligned box sized by the absolute corner delta, centered at the origin
///
/// Each face carries its own four vertices so normals stay flat per face.
pub fn box_from_corners(c1: Vec3, c2: Vec3) -> SurfaceMesh {
    let hx = (c2.x - c1.x).abs() * 0.5;
    let hy = (c2.y - c1.y).abs() * 0.5;
    let hz = (c2.z - c1.z).abs() * 0.5;

    // (normal, two in-plane axes); vertices wound CCW seen from outside
    let faces: [(Vec3, Vec3, Vec3); 6] = [
        (Vec3::z(), Vec3::x(), Vec3::y()),
        (-Vec3::z(), -Vec3::x(), Vec3::y()),
        (Vec3::x(), -Vec3::z(), Vec3::y()),
        (-Vec3::x(), Vec3::z(), Vec3::y()),
        (Vec3::y(), Vec3::x(), -Vec3::z()),
        (-Vec3::y(), Vec3::x(), Vec3::z()),
    ];
    let half = Vec3::new(hx, hy, hz);

    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);
    for (normal, axis_u, axis_v) in faces {
        let origin = normal.component_mul(&half);
        let u = axis_u.component_mul(&half);
        let v = axis_v.component_mul(&half);
        let base = vertices.len() as u32;
        for (su, sv, tu, tv) in [
            (-1.0, -1.0, 0.0, 0.0),
            (1.0, -1.0, 1.0, 0.0),
            (1.0, 1.0, 1.0, 1.0),
            (-1.0, 1.0, 0.0, 1.0),
        ] {
            let p = origin + su * u + sv * v;
            vertices.push(Vertex::new(
                [p.x, p.y, p.z],
                [normal.x, normal.y, normal.z],
                [tu, tv],
            ));
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
    }

    SurfaceMesh::new(vertices, indices)
}

/// Parameters for [`cylinder`]
#[derive(Debug, Clone, Copy)]
pub struct CylinderParams {
    /// Radius at the bottom of the cylinder
    pub base_radius: f32,
    /// Radius at the top; differing radii produce a frustum
    pub top_radius: f32,
    /// Height along the Y axis, centered at the origin
    pub height: f32,
    /// Radial subdivisions around the axis
    pub slices: u32,
    /// Subdivisions along the height
    pub stacks: u32,
    /// Close the ends with cap fans
    pub caps: bool,
    /// Start angle in radians
    pub theta_start: f32,
    /// Angular sweep in radians
    pub theta_length: f32,
}

impl Default for CylinderParams {
    fn default() -> Self {
        Self {
            base_radius: 1.0,
            top_radius: 1.0,
            height: 1.0,
            slices: 16,
            stacks: 1,
            caps: false,
            theta_start: 0.0,
            theta_length: constants::TAU,
        }
    }
}

/// Lateral surface of a (possibly frustum) cylinder, with optional caps
///
/// # Errors
///
/// Returns [`SceneError::MalformedPrimitive`] for fewer than 3 slices, zero
/// stacks, or a non-positive height.
pub fn cylinder(params: &CylinderParams) -> Result<SurfaceMesh, SceneError> {
    if params.slices < 3 || params.stacks == 0 {
        return Err(SceneError::MalformedPrimitive {
            kind: "cylinder",
            reason: format!(
                "need at least 3 slices and 1 stack, got {}x{}",
                params.slices, params.stacks
            ),
        });
    }
    if !(params.height.is_finite() && params.height > 0.0) {
        return Err(SceneError::MalformedPrimitive {
            kind: "cylinder",
            reason: format!("height must be positive, got {}", params.height),
        });
    }

    let slices = params.slices as usize;
    let stacks = params.stacks as usize;
    let half_height = params.height * 0.5;
    let slope = (params.base_radius - params.top_radius) / params.height;

    let mut vertices = Vec::new();
    let mut indices = Vec::new();

    // Lateral surface: rings bottom to top
    for i in 0..=stacks {
        let t = i as f32 / stacks as f32;
        let y = -half_height + t * params.height;
        let radius = params.base_radius + (params.top_radius - params.base_radius) * t;
        for s in 0..=slices {
            let theta = params.theta_start + params.theta_length * s as f32 / slices as f32;
            let (sin, cos) = theta.sin_cos();
            let normal = Vec3::new(sin, slope, cos).normalize();
            vertices.push(Vertex::new(
                [radius * sin, y, radius * cos],
                [normal.x, normal.y, normal.z],
                [s as f32 / slices as f32, t],
            ));
        }
    }
    let ring = slices + 1;
    for i in 0..stacks {
        for s in 0..slices {
            let a = (i * ring + s) as u32;
            let b = a + 1;
            let c = ((i + 1) * ring + s) as u32 + 1;
            let d = c - 1;
            indices.extend_from_slice(&[a, b, c, a, c, d]);
        }
    }

    if params.caps {
        cylinder_cap(params, -half_height, params.base_radius, false, &mut vertices, &mut indices);
        cylinder_cap(params, half_height, params.top_radius, true, &mut vertices, &mut indices);
    }

    Ok(SurfaceMesh::new(vertices, indices))
}

fn cylinder_cap(
    params: &CylinderParams,
    y: f32,
    radius: f32,
    top: bool,
    vertices: &mut Vec<Vertex>,
    indices: &mut Vec<u32>,
) {
    if radius <= 0.0 {
        return;
    }
    let slices = params.slices as usize;
    let normal = if top { [0.0, 1.0, 0.0] } else { [0.0, -1.0, 0.0] };
    let center = vertices.len() as u32;
    vertices.push(Vertex::new([0.0, y, 0.0], normal, [0.5, 0.5]));
    for s in 0..=slices {
        let theta = params.theta_start + params.theta_length * s as f32 / slices as f32;
        let (sin, cos) = theta.sin_cos();
        vertices.push(Vertex::new(
            [radius * sin, y, radius * cos],
            normal,
            [0.5 + 0.5 * sin, 0.5 + 0.5 * cos],
        ));
    }
    for s in 0..slices as u32 {
        let a = center + 1 + s;
        let b = a + 1;
        if top {
            indices.extend_from_slice(&[center, a, b]);
        } else {
            indices.extend_from_slice(&[center, b, a]);
        }
    }
}

/// Parameters for [`sphere`]
#[derive(Debug, Clone, Copy)]
pub struct SphereParams {
    /// Sphere radius
    pub radius: f32,
    /// Subdivisions around the polar axis
    pub slices: u32,
    /// Subdivisions from pole to pole
    pub stacks: u32,
    /// Azimuthal start angle in radians
    pub theta_start: f32,
    /// Azimuthal sweep in radians
    pub theta_length: f32,
    /// Polar start angle in radians, measured from +Y
    pub phi_start: f32,
    /// Polar sweep in radians
    pub phi_length: f32,
}

impl Default for SphereParams {
    fn default() -> Self {
        Self {
            radius: 1.0,
            slices: 16,
            stacks: 12,
            theta_start: 0.0,
            theta_length: constants::TAU,
            phi_start: 0.0,
            phi_length: constants::PI,
        }
    }
}

/// Standard UV sphere, optionally restricted to partial angle ranges
///
/// # Errors
///
/// Returns [`SceneError::MalformedPrimitive`] for fewer than 3 slices, fewer
/// than 2 stacks, or a non-positive radius.
pub fn sphere(params: &SphereParams) -> Result<SurfaceMesh, SceneError> {
    if params.slices < 3 || params.stacks < 2 {
        return Err(SceneError::MalformedPrimitive {
            kind: "sphere",
            reason: format!(
                "need at least 3 slices and 2 stacks, got {}x{}",
                params.slices, params.stacks
            ),
        });
    }
    if !(params.radius.is_finite() && params.radius > 0.0) {
        return Err(SceneError::MalformedPrimitive {
            kind: "sphere",
            reason: format!("radius must be positive, got {}", params.radius),
        });
    }

    let slices = params.slices as usize;
    let stacks = params.stacks as usize;

    let mut vertices = Vec::with_capacity((stacks + 1) * (slices + 1));
    for i in 0..=stacks {
        let phi = params.phi_start + params.phi_length * i as f32 / stacks as f32;
        let (sin_phi, cos_phi) = phi.sin_cos();
        for s in 0..=slices {
            let theta = params.theta_start + params.theta_length * s as f32 / slices as f32;
            let (sin_theta, cos_theta) = theta.sin_cos();
            let normal = Vec3::new(sin_phi * sin_theta, cos_phi, sin_phi * cos_theta);
            let p = params.radius * normal;
            vertices.push(Vertex::new(
                [p.x, p.y, p.z],
                [normal.x, normal.y, normal.z],
                [
                    s as f32 / slices as f32,
                    1.0 - i as f32 / stacks as f32,
                ],
            ));
        }
    }

    let ring = slices + 1;
    let mut indices = Vec::with_capacity(stacks * slices * 6);
    for i in 0..stacks {
        for s in 0..slices {
            let a = (i * ring + s) as u32;
            let b = ((i + 1) * ring + s) as u32;
            let c = b + 1;
            let d = a + 1;
            indices.extend_from_slice(&[a, b, c, a, c, d]);
        }
    }

    Ok(SurfaceMesh::new(vertices, indices))
}

/// Simple filled planar polygon via fan triangulation
///
/// Points are used in declared order; the shared plane normal comes from
/// Newell's method so slightly non-planar input still gets a stable normal.
///
/// # Errors
///
/// Returns [`SceneError::MalformedPrimitive`] for fewer than 3 boundary
/// points.
pub fn polygon(points: &[Vec3]) -> Result<SurfaceMesh, SceneError> {
    if points.len() < 3 {
        return Err(SceneError::MalformedPrimitive {
            kind: "polygon",
            reason: format!("need at least 3 boundary points, got {}", points.len()),
        });
    }

    let mut newell = Vec3::zeros();
    for (i, p) in points.iter().enumerate() {
        let q = points[(i + 1) % points.len()];
        newell.x += (p.y - q.y) * (p.z + q.z);
        newell.y += (p.z - q.z) * (p.x + q.x);
        newell.z += (p.x - q.x) * (p.y + q.y);
    }
    let normal = if newell.norm_squared() > 1e-12 {
        newell.normalize()
    } else {
        Vec3::z()
    };
    let n = [normal.x, normal.y, normal.z];

    let vertices: Vec<Vertex> = points
        .iter()
        .map(|p| Vertex::new([p.x, p.y, p.z], n, [p.x, p.y]))
        .collect();

    let mut indices = Vec::with_capacity((points.len() - 2) * 3);
    for i in 1..points.len() as u32 - 1 {
        indices.extend_from_slice(&[0, i, i + 1]);
    }

    Ok(SurfaceMesh::new(vertices, indices))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rectangle_size_from_corner_delta() {
        let mesh = rectangle(Vec2::new(3.0, 1.0), Vec2::new(-1.0, 4.0));
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.triangle_count(), 2);
        // |dx| = 4, |dy| = 3, centered at the origin
        let max_x = mesh.vertices.iter().map(|v| v.position[0]).fold(f32::MIN, f32::max);
        let max_y = mesh.vertices.iter().map(|v| v.position[1]).fold(f32::MIN, f32::max);
        assert_relative_eq!(max_x, 2.0);
        assert_relative_eq!(max_y, 1.5);
    }

    #[test]
    fn test_triangle_keeps_declared_order() {
        let mesh = triangle(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        );
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.indices, vec![0, 1, 2]);
        assert_relative_eq!(mesh.vertices[0].normal[2], 1.0);
    }

    #[test]
    fn test_box_structure() {
        let mesh = box_from_corners(Vec3::new(-1.0, -2.0, -3.0), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(mesh.vertex_count(), 24);
        assert_eq!(mesh.triangle_count(), 12);
        // Per-face normals are unit axis vectors
        for v in &mesh.vertices {
            let n = Vec3::from(v.normal);
            assert_relative_eq!(n.norm(), 1.0, epsilon = 1e-6);
        }
        let max_z = mesh.vertices.iter().map(|v| v.position[2]).fold(f32::MIN, f32::max);
        assert_relative_eq!(max_z, 3.0);
    }

    #[test]
    fn test_cylinder_counts() {
        let params = CylinderParams {
            slices: 8,
            stacks: 2,
            ..Default::default()
        };
        let mesh = cylinder(&params).unwrap();
        assert_eq!(mesh.vertex_count(), 3 * 9);
        assert_eq!(mesh.triangle_count(), 2 * 2 * 8);
    }

    #[test]
    fn test_cylinder_caps_add_fans() {
        let open = cylinder(&CylinderParams::default()).unwrap();
        let capped = cylinder(&CylinderParams {
            caps: true,
            ..Default::default()
        })
        .unwrap();
        assert_eq!(
            capped.triangle_count(),
            open.triangle_count() + 2 * 16
        );
    }

    #[test]
    fn test_cylinder_rejects_degenerate_params() {
        let result = cylinder(&CylinderParams {
            slices: 2,
            ..Default::default()
        });
        assert!(matches!(
            result,
            Err(SceneError::MalformedPrimitive { kind: "cylinder", .. })
        ));
    }

    #[test]
    fn test_sphere_counts_and_radius() {
        let params = SphereParams {
            radius: 2.0,
            slices: 8,
            stacks: 6,
            ..Default::default()
        };
        let mesh = sphere(&params).unwrap();
        assert_eq!(mesh.vertex_count(), 7 * 9);
        assert_eq!(mesh.triangle_count(), 2 * 6 * 8);
        for v in &mesh.vertices {
            let p = Vec3::from(v.position);
            assert_relative_eq!(p.norm(), 2.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_sphere_normals_point_outward() {
        let mesh = sphere(&SphereParams::default()).unwrap();
        for v in &mesh.vertices {
            let p = Vec3::from(v.position);
            let n = Vec3::from(v.normal);
            assert!(p.dot(&n) > 0.99);
        }
    }

    #[test]
    fn test_polygon_fan() {
        let points = [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(2.0, 2.0, 0.0),
            Vec3::new(0.0, 2.0, 0.0),
        ];
        let mesh = polygon(&points).unwrap();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.triangle_count(), 2);
        assert_relative_eq!(mesh.vertices[0].normal[2], 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_polygon_needs_three_points() {
        let result = polygon(&[Vec3::zeros(), Vec3::x()]);
        assert!(matches!(
            result,
            Err(SceneError::MalformedPrimitive { kind: "polygon", .. })
        ));
    }
}
