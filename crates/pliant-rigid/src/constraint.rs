//! Rigid body constraint rows.
//!
//! Each constraint is one scalar row of the velocity-space system: a
//! 3×4 Jacobian block per body side, a bias velocity `vu` (Baumgarte
//! stabilization), and a range clamping the solved impulse. Rows are
//! built fresh each step from the active interactions and discarded
//! after the solve.
//!
//! Degenerate inputs (zero error axis, zero angular velocity) produce a
//! zero Jacobian row with zero bias, which the solver skips.

use pliant_math::{Jacobian, Quat, Vec3};
use pliant_types::{BodyId, Real};

/// Two-sided impulse range for bilateral constraints.
pub const BILATERAL: (Real, Real) = (Real::NEG_INFINITY, Real::INFINITY);

/// One-sided range for non-penetration: only separating impulses.
pub const UNILATERAL: (Real, Real) = (0.0, Real::INFINITY);

/// One row of the rigid body constraint system.
#[derive(Debug, Clone, Copy)]
pub struct RbdConstraint {
    /// Up to two participating bodies. `None` marks the static
    /// environment side (zero Jacobian columns).
    pub bodies: [Option<BodyId>; 2],
    pub jacobian: Jacobian,
    /// Bias velocity the solved impulse drives the row toward.
    pub vu: Real,
    /// Impulse clamp `[lo, hi]`.
    pub range: (Real, Real),
}

impl RbdConstraint {
    /// Non-penetration contact.
    ///
    /// `normal` points from body B toward body A (the separating
    /// direction for A); `arm_*` are the contact offsets from each
    /// body's center of mass. Either side may be `None` for static
    /// geometry.
    pub fn contact(
        body_a: Option<BodyId>,
        body_b: Option<BodyId>,
        arm_a: Vec3,
        arm_b: Vec3,
        normal: Vec3,
        depth: Real,
        beta: Real,
        dt: Real,
    ) -> Self {
        Self {
            bodies: [body_a, body_b],
            jacobian: Jacobian::two_body(
                normal,
                arm_a.cross(normal),
                -normal,
                -(arm_b.cross(normal)),
            ),
            vu: beta * depth / dt,
            range: UNILATERAL,
        }
    }

    /// Drives a body's orientation toward a fixed target.
    ///
    /// The Jacobian is the rotation axis of the relative quaternion
    /// error; an already-aligned body yields a no-op row.
    pub fn angular_locking(
        body: BodyId,
        current: Quat,
        target: Quat,
        beta: Real,
        dt: Real,
    ) -> Self {
        let relative = (target * current.inverse()).normalize();
        let (axis, angle) = relative.to_axis_angle();
        // to_axis_angle returns angle in [0, 2π]; fold to the short way round.
        let (axis, angle) = if angle > std::f64::consts::PI {
            (-axis, std::f64::consts::TAU - angle)
        } else {
            (axis, angle)
        };
        if angle < 1.0e-9 || !axis.is_finite() {
            return Self::no_op(body);
        }
        Self {
            bodies: [Some(body), None],
            jacobian: Jacobian::one_body(Vec3::ZERO, axis),
            vu: beta * angle / dt,
            range: BILATERAL,
        }
    }

    /// Drives a body's center of mass onto a line.
    pub fn axes_locking(
        body: BodyId,
        position: Vec3,
        axis_point: Vec3,
        axis_dir: Vec3,
        beta: Real,
        dt: Real,
    ) -> Self {
        let dir = axis_dir.normalize_or_zero();
        let offset = position - axis_point;
        let perpendicular = offset - offset.dot(dir) * dir;
        let distance = perpendicular.length();
        if distance < 1.0e-12 {
            return Self::no_op(body);
        }
        Self {
            bodies: [Some(body), None],
            // Impulse along the direction back toward the axis.
            jacobian: Jacobian::one_body(-perpendicular / distance, Vec3::ZERO),
            vu: beta * distance / dt,
            range: BILATERAL,
        }
    }

    /// Bleeds angular energy: removes a `coefficient` fraction of the
    /// current angular speed per step. No positional bias.
    pub fn damping(body: BodyId, angular_velocity: Vec3, coefficient: Real) -> Self {
        let speed = angular_velocity.length();
        if speed < 1.0e-12 {
            return Self::no_op(body);
        }
        Self {
            bodies: [Some(body), None],
            jacobian: Jacobian::one_body(Vec3::ZERO, -angular_velocity / speed),
            // b = (vu − J·u)/dt with J·u = −speed; this choice removes
            // exactly coefficient·speed of angular speed.
            vu: -(1.0 - coefficient) * speed,
            range: BILATERAL,
        }
    }

    /// Couples a point on a deformable mesh to a point on a rigid body.
    ///
    /// The correction targets the midpoint of the pair, so each system
    /// absorbs half the displacement.
    pub fn bary_point_to_point(
        body: BodyId,
        arm: Vec3,
        body_point: Vec3,
        mesh_point: Vec3,
        beta: Real,
        dt: Real,
    ) -> Self {
        let diff = mesh_point - body_point;
        let distance = diff.length();
        if distance < 1.0e-12 {
            return Self::no_op(body);
        }
        let dir = diff / distance;
        Self {
            bodies: [Some(body), None],
            jacobian: Jacobian::one_body(dir, arm.cross(dir)),
            vu: beta * (0.5 * distance) / dt,
            range: BILATERAL,
        }
    }

    /// A degenerate row: zero Jacobian, zero bias. The solver skips it.
    pub fn no_op(body: BodyId) -> Self {
        Self {
            bodies: [Some(body), None],
            jacobian: Jacobian::ZERO,
            vu: 0.0,
            range: BILATERAL,
        }
    }

    /// True if this row cannot produce an impulse.
    pub fn is_degenerate(&self) -> bool {
        self.jacobian.is_degenerate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: Real = 0.01;

    #[test]
    fn contact_row_is_one_sided() {
        let c = RbdConstraint::contact(
            Some(BodyId(0)),
            None,
            -Vec3::Y,
            Vec3::ZERO,
            Vec3::Y,
            0.02,
            0.1,
            DT,
        );
        assert_eq!(c.range, UNILATERAL);
        assert!(c.vu > 0.0);
        assert_eq!(c.jacobian.linear[0], Vec3::Y);
    }

    #[test]
    fn aligned_orientation_yields_no_op_row() {
        let q = Quat::from_rotation_y(0.3);
        let c = RbdConstraint::angular_locking(BodyId(0), q, q, 0.1, DT);
        assert!(c.is_degenerate());
        assert_eq!(c.vu, 0.0);
    }

    #[test]
    fn angular_locking_axis_matches_error_rotation() {
        let target = Quat::from_rotation_z(0.5);
        let c = RbdConstraint::angular_locking(BodyId(0), Quat::IDENTITY, target, 1.0, 1.0);
        assert!((c.jacobian.angular[0] - Vec3::Z).length() < 1e-9);
        assert!((c.vu - 0.5).abs() < 1e-9);
    }

    #[test]
    fn body_on_axis_yields_no_op_row() {
        let c = RbdConstraint::axes_locking(
            BodyId(0),
            Vec3::new(0.0, 3.0, 0.0),
            Vec3::ZERO,
            Vec3::Y,
            0.1,
            DT,
        );
        assert!(c.is_degenerate());
    }

    #[test]
    fn point_coupling_row_targets_half_the_displacement() {
        let c = RbdConstraint::bary_point_to_point(
            BodyId(0),
            Vec3::ZERO,
            Vec3::ZERO,
            Vec3::new(2.0, 0.0, 0.0),
            1.0,
            1.0,
        );
        assert_eq!(c.jacobian.linear[0], Vec3::X);
        assert!((c.vu - 1.0).abs() < 1e-12);
        assert_eq!(c.range, BILATERAL);
    }

    #[test]
    fn coincident_coupling_points_yield_no_op_row() {
        let p = Vec3::new(1.0, 2.0, 3.0);
        let c = RbdConstraint::bary_point_to_point(BodyId(0), Vec3::ZERO, p, p, 0.1, DT);
        assert!(c.is_degenerate());
        assert_eq!(c.vu, 0.0);
    }

    #[test]
    fn zero_spin_damping_is_no_op() {
        let c = RbdConstraint::damping(BodyId(0), Vec3::ZERO, 0.5);
        assert!(c.is_degenerate());
        assert_eq!(c.vu, 0.0);
    }
}
