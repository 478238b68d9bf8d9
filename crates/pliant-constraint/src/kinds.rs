//! Geometric constraint functions: value and gradient per kind.
//!
//! Each function returns `None` when the configuration is degenerate
//! (zero-length edge, zero-area triangle, collapsed tet). The solver
//! skips such constraints for the current pass without touching state,
//! so no NaN can enter the position buffers.
//!
//! Gradient conventions:
//! - Distance: gradient on point A is the unit vector from B to A.
//! - Area / volume / dihedral: analytic derivative of the scalar
//!   function with respect to each vertex.

use pliant_math::Vec3;
use pliant_types::constants::DEGENERATE_EPS;
use pliant_types::Real;

/// `c = |p0 - p1| - rest_length`, gradients along the edge direction.
pub fn distance(
    p0: Vec3,
    p1: Vec3,
    rest_length: Real,
) -> Option<(Real, [Vec3; 2])> {
    let diff = p0 - p1;
    let len = diff.length();
    if len < DEGENERATE_EPS {
        return None;
    }
    let n = diff / len;
    Some((len - rest_length, [n, -n]))
}

/// `c = area(p0, p1, p2) - rest_area`.
pub fn area(
    p0: Vec3,
    p1: Vec3,
    p2: Vec3,
    rest_area: Real,
) -> Option<(Real, [Vec3; 3])> {
    let e1 = p0 - p1;
    let e2 = p1 - p2;
    let e3 = p2 - p0;

    let n = e1.cross(e2);
    let a = 0.5 * n.length();
    if a < DEGENERATE_EPS {
        return None;
    }
    let n = n / (2.0 * a);

    Some((a - rest_area, [e2.cross(n), e3.cross(n), e1.cross(n)]))
}

/// `c = volume(p0..p3) - rest_volume`, gradients are the scaled face normals.
pub fn volume(
    p0: Vec3,
    p1: Vec3,
    p2: Vec3,
    p3: Vec3,
    rest_volume: Real,
) -> Option<(Real, [Vec3; 4])> {
    const ONE_SIXTH: Real = 1.0 / 6.0;

    let g0 = ONE_SIXTH * (p1 - p2).cross(p3 - p1);
    let g1 = ONE_SIXTH * (p2 - p0).cross(p3 - p0);
    let g2 = ONE_SIXTH * (p3 - p0).cross(p1 - p0);
    let g3 = ONE_SIXTH * (p1 - p0).cross(p2 - p0);

    let v = g3.dot(p3 - p0);

    // A fully collapsed tet has zero gradients; let the weight-sum check
    // in the projection skip it rather than testing every column here.
    if g0.length_squared() < DEGENERATE_EPS
        && g1.length_squared() < DEGENERATE_EPS
        && g2.length_squared() < DEGENERATE_EPS
        && g3.length_squared() < DEGENERATE_EPS
    {
        return None;
    }

    Some((v - rest_volume, [g0, g1, g2, g3]))
}

/// Signed dihedral angle across the edge (p2, p3) between the triangles
/// (p0, p2, p3) and (p1, p3, p2).
///
/// `atan2` is used instead of `acos` so the sign of the fold survives.
pub fn dihedral_angle(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3) -> Option<Real> {
    let e = p3 - p2;
    let l = e.length();
    if l < DEGENERATE_EPS {
        return None;
    }
    let n1 = (p2 - p0).cross(p3 - p0);
    let n2 = (p3 - p1).cross(p2 - p1);
    if n1.length_squared() < DEGENERATE_EPS || n2.length_squared() < DEGENERATE_EPS {
        return None;
    }
    let n1 = n1.normalize();
    let n2 = n2.normalize();
    Some(n1.cross(n2).dot(e).atan2(l * n1.dot(n2)))
}

/// `c = dihedral(p0..p3) - rest_angle` with the analytic angle gradients.
///
/// p0 and p1 are the wing vertices, p2 and p3 the shared edge.
pub fn dihedral(
    p0: Vec3,
    p1: Vec3,
    p2: Vec3,
    p3: Vec3,
    rest_angle: Real,
) -> Option<(Real, [Vec3; 4])> {
    let e = p3 - p2;
    let e1 = p3 - p0;
    let e2 = p0 - p2;
    let e3 = p3 - p1;
    let e4 = p1 - p2;

    let mut n1 = e1.cross(e);
    let mut n2 = e.cross(e3);
    let a1 = n1.length();
    let a2 = n2.length();
    if a1 < DEGENERATE_EPS || a2 < DEGENERATE_EPS {
        return None;
    }
    n1 /= a1;
    n2 /= a2;

    let l = e.length();
    if l < DEGENERATE_EPS {
        return None;
    }

    let g0 = -(l / a1) * n1;
    let g1 = -(l / a2) * n2;
    let g2 = (e.dot(e1) / (a1 * l)) * n1 + (e.dot(e3) / (a2 * l)) * n2;
    let g3 = (e.dot(e2) / (a1 * l)) * n1 + (e.dot(e4) / (a2 * l)) * n2;

    let angle = n1.cross(n2).dot(e).atan2(l * n1.dot(n2));

    Some((angle - rest_angle, [g0, g1, g2, g3]))
}

/// Signed gap of a contact pair along the contact normal.
///
/// `c < 0` means the pair penetrates; the contact constraint only acts
/// in that case (one-sided projection).
pub fn contact_gap(p0: Vec3, p1: Vec3, normal: Vec3) -> (Real, [Vec3; 2]) {
    ((p0 - p1).dot(normal), [normal, -normal])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_at_rest_is_zero() {
        let (c, grads) = distance(Vec3::ZERO, Vec3::X, 1.0).unwrap();
        assert!(c.abs() < 1e-15);
        assert!((grads[0] + Vec3::X).length() < 1e-15);
    }

    #[test]
    fn coincident_points_are_degenerate() {
        assert!(distance(Vec3::ONE, Vec3::ONE, 1.0).is_none());
    }

    #[test]
    fn flat_quad_dihedral_is_zero() {
        // Two coplanar triangles sharing the edge (p2, p3); wings on
        // opposite sides give a signed angle of zero.
        let p2 = Vec3::ZERO;
        let p3 = Vec3::X;
        let p0 = Vec3::new(0.5, 1.0, 0.0);
        let p1 = Vec3::new(0.5, -1.0, 0.0);
        let angle = dihedral_angle(p0, p1, p2, p3).unwrap();
        assert!(angle.abs() < 1e-12);
    }

    #[test]
    fn volume_gradients_sum_to_zero() {
        let (_, g) = volume(
            Vec3::ZERO,
            Vec3::X,
            Vec3::Y,
            Vec3::Z,
            0.0,
        )
        .unwrap();
        let sum = g[0] + g[1] + g[2] + g[3];
        assert!(sum.length() < 1e-14, "net momentum change must be zero");
    }

    #[test]
    fn area_gradients_sum_to_zero() {
        let (_, g) = area(Vec3::ZERO, Vec3::X, Vec3::Y, 0.1).unwrap();
        let sum = g[0] + g[1] + g[2];
        assert!(sum.length() < 1e-14);
    }
}
