//! 3×4 Jacobian block for rigid body constraints.
//!
//! A rigid body constraint row relates the velocities of up to two bodies
//! to a scalar bias. Each body side contributes a linear 3-vector and an
//! angular 3-vector, giving the 3×4 block layout:
//!
//! ```text
//! column 0: linear  (body A)
//! column 1: angular (body A)
//! column 2: linear  (body B)
//! column 3: angular (body B)
//! ```
//!
//! A constraint involving a single body leaves the B columns zero.

use crate::Vec3;

/// Dense 3×4 Jacobian block, stored as four 3-vector columns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Jacobian {
    /// Linear velocity coupling per body side.
    pub linear: [Vec3; 2],
    /// Angular velocity coupling per body side.
    pub angular: [Vec3; 2],
}

impl Jacobian {
    /// The zero Jacobian — a no-op constraint row.
    pub const ZERO: Self = Self {
        linear: [Vec3::ZERO, Vec3::ZERO],
        angular: [Vec3::ZERO, Vec3::ZERO],
    };

    /// Jacobian for a single-body constraint.
    pub fn one_body(linear: Vec3, angular: Vec3) -> Self {
        Self {
            linear: [linear, Vec3::ZERO],
            angular: [angular, Vec3::ZERO],
        }
    }

    /// Jacobian for a two-body constraint.
    pub fn two_body(
        linear_a: Vec3,
        angular_a: Vec3,
        linear_b: Vec3,
        angular_b: Vec3,
    ) -> Self {
        Self {
            linear: [linear_a, linear_b],
            angular: [angular_a, angular_b],
        }
    }

    /// Returns true if every column is (near) zero, i.e. the row is a no-op.
    pub fn is_degenerate(&self) -> bool {
        const EPS2: f64 = 1.0e-24;
        self.linear[0].length_squared() < EPS2
            && self.angular[0].length_squared() < EPS2
            && self.linear[1].length_squared() < EPS2
            && self.angular[1].length_squared() < EPS2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_jacobian_is_degenerate() {
        assert!(Jacobian::ZERO.is_degenerate());
    }

    #[test]
    fn contact_jacobian_is_not_degenerate() {
        let j = Jacobian::one_body(Vec3::Y, Vec3::ZERO);
        assert!(!j.is_degenerate());
    }
}
