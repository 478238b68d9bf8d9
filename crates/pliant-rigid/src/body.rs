//! Rigid bodies and their arena.
//!
//! Bodies are created through the owning model's factory and referenced
//! everywhere else by [`BodyId`]. Constraints never hold references
//! into the arena.

use pliant_math::{Mat3, Quat, Vec3};
use pliant_types::{PliantError, PliantResult, Real};

/// One rigid body: mass properties, pose, velocities, force accumulators.
#[derive(Debug, Clone)]
pub struct RigidBody {
    pub position: Vec3,
    pub orientation: Quat,
    pub velocity: Vec3,
    pub angular_velocity: Vec3,

    /// External force accumulator, cleared after each step.
    pub force: Vec3,
    /// External torque accumulator, cleared after each step.
    pub torque: Vec3,

    /// Net constraint reaction from the last solve (readable for
    /// force feedback).
    pub constraint_force: Vec3,
    pub constraint_torque: Vec3,

    mass: Real,
    inv_mass: Real,
    inv_inertia_local: Mat3,
    is_static: bool,
}

impl RigidBody {
    /// A dynamic body with the given mass properties.
    pub fn dynamic(mass: Real, inertia: Mat3, position: Vec3) -> PliantResult<Self> {
        if !(mass > 0.0 && mass.is_finite()) {
            return Err(PliantError::InvalidConfig(format!(
                "rigid body mass must be positive and finite, got {mass}"
            )));
        }
        let det = inertia.determinant();
        if det.abs() < pliant_types::constants::DEGENERATE_EPS {
            return Err(PliantError::InvalidConfig(
                "rigid body inertia tensor is singular".into(),
            ));
        }
        Ok(Self {
            position,
            orientation: Quat::IDENTITY,
            velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            force: Vec3::ZERO,
            torque: Vec3::ZERO,
            constraint_force: Vec3::ZERO,
            constraint_torque: Vec3::ZERO,
            mass,
            inv_mass: 1.0 / mass,
            inv_inertia_local: inertia.inverse(),
            is_static: false,
        })
    }

    /// A static body: infinite mass, never moves, anchors constraints.
    pub fn fixed(position: Vec3) -> Self {
        Self {
            position,
            orientation: Quat::IDENTITY,
            velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            force: Vec3::ZERO,
            torque: Vec3::ZERO,
            constraint_force: Vec3::ZERO,
            constraint_torque: Vec3::ZERO,
            mass: Real::INFINITY,
            inv_mass: 0.0,
            inv_inertia_local: Mat3::ZERO,
            is_static: true,
        }
    }

    pub fn mass(&self) -> Real {
        self.mass
    }

    pub fn inv_mass(&self) -> Real {
        self.inv_mass
    }

    pub fn is_static(&self) -> bool {
        self.is_static
    }

    /// Inverse inertia tensor in world frame: `R · I⁻¹ · Rᵀ`.
    pub fn inv_inertia_world(&self) -> Mat3 {
        let r = Mat3::from_quat(self.orientation);
        r * self.inv_inertia_local * r.transpose()
    }

    /// Accumulate an external force at the center of mass.
    pub fn apply_force(&mut self, force: Vec3) {
        self.force += force;
    }

    /// Accumulate an external torque.
    pub fn apply_torque(&mut self, torque: Vec3) {
        self.torque += torque;
    }

    /// Clear the external accumulators (end of step).
    pub fn clear_forces(&mut self) {
        self.force = Vec3::ZERO;
        self.torque = Vec3::ZERO;
    }
}
