//! Tetrahedron helpers shared by volume and FEM constraints.

use crate::{Mat3, Vec3};
use pliant_types::Real;

/// Signed volume of the tetrahedron (p0, p1, p2, p3).
///
/// Positive when the vertices are in right-handed order.
#[inline]
pub fn tet_volume(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3) -> Real {
    (1.0 / 6.0) * (p3 - p0).dot((p1 - p0).cross(p2 - p0))
}

/// Edge matrix with columns (p0 - p3, p1 - p3, p2 - p3).
///
/// The deformation gradient of a tet is `F = D · Dm⁻¹` where `D` is this
/// matrix in the current configuration and `Dm` in the rest configuration.
#[inline]
pub fn edge_matrix(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3) -> Mat3 {
    Mat3::from_cols(p0 - p3, p1 - p3, p2 - p3)
}
