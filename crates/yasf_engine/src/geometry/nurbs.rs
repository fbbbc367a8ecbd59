//! Rational surface evaluator
//!
//! Tessellates tensor-product rational Bézier/B-spline patches into triangle
//! meshes. Scene descriptions always supply `(degree + 1)` control points per
//! parametric direction, which makes the clamped B-spline basis collapse to
//! the Bernstein basis, so evaluation runs directly on Bernstein polynomials.
//!
//! Evaluation is pure: the same control net and sample counts always produce
//! the same mesh.

use crate::error::SceneError;
use crate::foundation::math::{Vec3, Vec4};
use crate::geometry::mesh::{SurfaceMesh, Vertex};

/// Squared length below which a surface normal is considered collapsed
const DEGENERATE_NORMAL_SQ: f32 = 1e-12;

/// Rectangular grid of homogeneous control points for one patch
///
/// Rows run along the U parameter, columns along V. The grid shape is fixed
/// by the polynomial degrees: `(degree_u + 1)` rows of `(degree_v + 1)`
/// points each. Every weight must be strictly positive.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlNet {
    /// Control points in row-major order, `(x, y, z, w)`
    points: Vec<Vec4>,
    degree_u: usize,
    degree_v: usize,
}

impl ControlNet {
    /// Build a control net from a row-major flat list of homogeneous points
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::DegenerateControlNet`] when the point count does
    /// not match `(degree_u + 1) * (degree_v + 1)` or any weight is not a
    /// strictly positive finite number.
    pub fn from_flat(
        points: Vec<Vec4>,
        degree_u: usize,
        degree_v: usize,
    ) -> Result<Self, SceneError> {
        let expected = (degree_u + 1) * (degree_v + 1);
        if points.len() != expected {
            return Err(SceneError::DegenerateControlNet(format!(
                "expected {} control points for degrees {}x{}, got {}",
                expected,
                degree_u,
                degree_v,
                points.len()
            )));
        }
        for (i, p) in points.iter().enumerate() {
            if !(p.w.is_finite() && p.w > 0.0) {
                return Err(SceneError::DegenerateControlNet(format!(
                    "control point {} has non-positive weight {}",
                    i, p.w
                )));
            }
        }
        Ok(Self {
            points,
            degree_u,
            degree_v,
        })
    }

    /// Build a control net from rows of homogeneous points
    ///
    /// # Errors
    ///
    /// Same conditions as [`ControlNet::from_flat`]; additionally fails when
    /// rows have uneven lengths.
    pub fn from_rows(rows: Vec<Vec<Vec4>>, degree_u: usize, degree_v: usize) -> Result<Self, SceneError> {
        let cols = degree_v + 1;
        if rows.len() != degree_u + 1 || rows.iter().any(|r| r.len() != cols) {
            return Err(SceneError::DegenerateControlNet(format!(
                "expected {}x{} control grid for degrees {}x{}",
                degree_u + 1,
                cols,
                degree_u,
                degree_v
            )));
        }
        Self::from_flat(rows.into_iter().flatten().collect(), degree_u, degree_v)
    }

    /// Polynomial degree along U
    pub fn degree_u(&self) -> usize {
        self.degree_u
    }

    /// Polynomial degree along V
    pub fn degree_v(&self) -> usize {
        self.degree_v
    }

    /// Control point at grid position `(row, col)`
    fn point(&self, row: usize, col: usize) -> Vec4 {
        self.points[row * (self.degree_v + 1) + col]
    }

    /// Tessellate the patch into a triangle mesh
    ///
    /// Samples a `(samples_u + 1) x (samples_v + 1)` grid of surface points
    /// over `[0, 1] x [0, 1]` and connects adjacent samples into two
    /// consistently wound triangles per cell. Normals come from the analytic
    /// partial derivatives of the rational surface.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::MalformedPrimitive`] when a sample count is zero.
    pub fn evaluate(&self, samples_u: usize, samples_v: usize) -> Result<SurfaceMesh, SceneError> {
        if samples_u == 0 || samples_v == 0 {
            return Err(SceneError::MalformedPrimitive {
                kind: "nurbs",
                reason: format!(
                    "sample counts must be at least 1, got {}x{}",
                    samples_u, samples_v
                ),
            });
        }

        let mut vertices = Vec::with_capacity((samples_u + 1) * (samples_v + 1));

        // Basis rows along V are reused for every U sample
        let v_rows: Vec<(Vec<f32>, Vec<f32>)> = (0..=samples_v)
            .map(|sv| {
                let v = sv as f32 / samples_v as f32;
                (
                    bernstein(self.degree_v, v),
                    bernstein_derivative(self.degree_v, v),
                )
            })
            .collect();

        for su in 0..=samples_u {
            let u = su as f32 / samples_u as f32;
            let bu = bernstein(self.degree_u, u);
            let dbu = bernstein_derivative(self.degree_u, u);

            for (sv, (bv, dbv)) in v_rows.iter().enumerate() {
                let v = sv as f32 / samples_v as f32;
                vertices.push(self.sample(u, v, &bu, &dbu, bv, dbv));
            }
        }

        let mut indices = Vec::with_capacity(samples_u * samples_v * 6);
        let stride = (samples_v + 1) as u32;
        for su in 0..samples_u as u32 {
            for sv in 0..samples_v as u32 {
                let a = su * stride + sv;
                let b = (su + 1) * stride + sv;
                let c = (su + 1) * stride + sv + 1;
                let d = su * stride + sv + 1;
                // Two CCW triangles per cell, facing along the U x V normal
                indices.extend_from_slice(&[a, b, c, a, c, d]);
            }
        }

        Ok(SurfaceMesh::new(vertices, indices))
    }

    /// Evaluate position and normal at one parameter pair
    fn sample(&self, u: f32, v: f32, bu: &[f32], dbu: &[f32], bv: &[f32], dbv: &[f32]) -> Vertex {
        // Weighted numerator A(u,v), denominator W(u,v), and their partials
        let mut a = Vec3::zeros();
        let mut a_u = Vec3::zeros();
        let mut a_v = Vec3::zeros();
        let mut w = 0.0f32;
        let mut w_u = 0.0f32;
        let mut w_v = 0.0f32;

        for (i, &bui) in bu.iter().enumerate() {
            for (j, &bvj) in bv.iter().enumerate() {
                let cp = self.point(i, j);
                let wp = cp.w * Vec3::new(cp.x, cp.y, cp.z);

                let basis = bui * bvj;
                let basis_u = dbu[i] * bvj;
                let basis_v = bui * dbv[j];

                a += basis * wp;
                a_u += basis_u * wp;
                a_v += basis_v * wp;
                w += basis * cp.w;
                w_u += basis_u * cp.w;
                w_v += basis_v * cp.w;
            }
        }

        // Rational normalization and quotient-rule derivatives:
        // S = A / W, dS = (dA - S * dW) / W
        let position = a / w;
        let tangent_u = (a_u - position * w_u) / w;
        let tangent_v = (a_v - position * w_v) / w;

        let cross = tangent_u.cross(&tangent_v);
        let normal = if cross.norm_squared() > DEGENERATE_NORMAL_SQ {
            cross.normalize()
        } else {
            // Collapsed derivative (degree-0 direction or duplicate points)
            Vec3::z()
        };

        Vertex::new(
            [position.x, position.y, position.z],
            [normal.x, normal.y, normal.z],
            [u, v],
        )
    }
}

/// All Bernstein basis values of the given degree at `u`
///
/// Uses the triangular recurrence (the same scheme as de Casteljau), which is
/// numerically stable for `u` in `[0, 1]`.
fn bernstein(degree: usize, u: f32) -> Vec<f32> {
    let mut basis = vec![0.0f32; degree + 1];
    basis[0] = 1.0;
    for j in 1..=degree {
        let mut saved = 0.0;
        for value in basis.iter_mut().take(j) {
            let term = *value;
            *value = saved + (1.0 - u) * term;
            saved = u * term;
        }
        basis[j] = saved;
    }
    basis
}

/// First derivatives of all Bernstein basis functions at `u`
///
/// `B'(i,n) = n * (B(i-1,n-1) - B(i,n-1))`, with out-of-range lower-degree
/// terms taken as zero.
fn bernstein_derivative(degree: usize, u: f32) -> Vec<f32> {
    if degree == 0 {
        return vec![0.0];
    }
    let lower = bernstein(degree - 1, u);
    let n = degree as f32;
    (0..=degree)
        .map(|i| {
            let left = if i > 0 { lower[i - 1] } else { 0.0 };
            let right = if i < degree { lower[i] } else { 0.0 };
            n * (left - right)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn cp(x: f32, y: f32, z: f32, w: f32) -> Vec4 {
        Vec4::new(x, y, z, w)
    }

    fn bilinear_net() -> ControlNet {
        ControlNet::from_rows(
            vec![
                vec![cp(0.0, 0.0, 0.0, 1.0), cp(0.0, 0.0, 4.0, 1.0)],
                vec![cp(2.0, 6.0, 0.0, 1.0), cp(2.0, 6.0, 4.0, 1.0)],
            ],
            1,
            1,
        )
        .unwrap()
    }

    #[test]
    fn test_mesh_counts_match_sampling() {
        let net = ControlNet::from_flat(vec![cp(0.0, 0.0, 0.0, 1.0); 9], 2, 2).unwrap();
        let mesh = net.evaluate(4, 3).unwrap();
        assert_eq!(mesh.vertex_count(), 5 * 4);
        assert_eq!(mesh.triangle_count(), 2 * 4 * 3);
    }

    #[test]
    fn test_bilinear_midpoint_is_corner_mean() {
        let mesh = bilinear_net().evaluate(2, 2).unwrap();
        // Sample (u, v) = (0.5, 0.5) sits at grid position (1, 1)
        let mid = mesh.vertices[1 * 3 + 1].position;
        assert_relative_eq!(mid[0], 1.0, epsilon = 1e-6);
        assert_relative_eq!(mid[1], 3.0, epsilon = 1e-6);
        assert_relative_eq!(mid[2], 2.0, epsilon = 1e-6);
    }

    #[test]
    fn test_flat_net_has_parallel_normals() {
        // All control points in the z = 0 plane with equal weights
        let net = ControlNet::from_rows(
            vec![
                vec![cp(0.0, 0.0, 0.0, 1.0), cp(0.0, 1.0, 0.0, 1.0), cp(0.0, 2.0, 0.0, 1.0)],
                vec![cp(1.0, 0.0, 0.0, 1.0), cp(1.0, 1.5, 0.0, 1.0), cp(1.0, 2.0, 0.0, 1.0)],
                vec![cp(2.0, 0.0, 0.0, 1.0), cp(2.0, 1.0, 0.0, 1.0), cp(2.0, 2.0, 0.0, 1.0)],
            ],
            2,
            2,
        )
        .unwrap();
        let mesh = net.evaluate(4, 4).unwrap();
        for vertex in &mesh.vertices {
            assert_relative_eq!(vertex.position[2], 0.0, epsilon = 1e-6);
            let n = Vec3::from(vertex.normal);
            assert_relative_eq!(n.dot(&Vec3::z()).abs(), 1.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_heavier_weight_pulls_surface() {
        let uniform = bilinear_net().evaluate(2, 2).unwrap();
        let weighted = ControlNet::from_rows(
            vec![
                vec![cp(0.0, 0.0, 0.0, 1.0), cp(0.0, 0.0, 4.0, 1.0)],
                vec![cp(2.0, 6.0, 0.0, 4.0), cp(2.0, 6.0, 4.0, 4.0)],
            ],
            1,
            1,
        )
        .unwrap()
        .evaluate(2, 2)
        .unwrap();

        // The heavier second row attracts the midpoint in x and y
        let mid = 1 * 3 + 1;
        assert!(weighted.vertices[mid].position[0] > uniform.vertices[mid].position[0]);
        assert!(weighted.vertices[mid].position[1] > uniform.vertices[mid].position[1]);
    }

    #[test]
    fn test_non_positive_weight_rejected() {
        let result = ControlNet::from_flat(
            vec![
                cp(0.0, 0.0, 0.0, 1.0),
                cp(1.0, 0.0, 0.0, 0.0),
                cp(0.0, 1.0, 0.0, 1.0),
                cp(1.0, 1.0, 0.0, 1.0),
            ],
            1,
            1,
        );
        assert!(matches!(result, Err(SceneError::DegenerateControlNet(_))));
    }

    #[test]
    fn test_wrong_grid_shape_rejected() {
        let result = ControlNet::from_flat(vec![cp(0.0, 0.0, 0.0, 1.0); 5], 1, 1);
        assert!(matches!(result, Err(SceneError::DegenerateControlNet(_))));
    }

    #[test]
    fn test_zero_samples_rejected() {
        let result = bilinear_net().evaluate(0, 2);
        assert!(matches!(
            result,
            Err(SceneError::MalformedPrimitive { kind: "nurbs", .. })
        ));
    }

    #[test]
    fn test_duplicate_control_points_do_not_error() {
        // Degenerate geometry is legal; it just collapses the surface
        let net = ControlNet::from_flat(vec![cp(1.0, 1.0, 1.0, 1.0); 4], 1, 1).unwrap();
        let mesh = net.evaluate(2, 2).unwrap();
        assert_eq!(mesh.vertex_count(), 9);
        for vertex in &mesh.vertices {
            assert_relative_eq!(vertex.position[0], 1.0, epsilon = 1e-6);
            // Collapsed derivatives fall back to the +Z normal
            assert_relative_eq!(vertex.normal[2], 1.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_bernstein_partition_of_unity() {
        for &u in &[0.0, 0.25, 0.5, 0.9, 1.0] {
            let sum: f32 = bernstein(3, u).iter().sum();
            assert_relative_eq!(sum, 1.0, epsilon = 1e-6);
            let dsum: f32 = bernstein_derivative(3, u).iter().sum();
            assert_relative_eq!(dsum, 0.0, epsilon = 1e-5);
        }
    }
}
