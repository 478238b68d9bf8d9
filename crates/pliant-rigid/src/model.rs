//! The rigid body model: body arena, per-step constraint set, stepping.
//!
//! Step sequence is fixed:
//!
//! 1. compute tentative velocities from external forces and gravity
//! 2. assemble `A = J·M⁻¹·Jᵀ` and `b` from the active constraint rows
//! 3. projected Gauss-Seidel for the clamped impulses
//! 4. apply impulses, integrate pose, discard the constraint rows

use faer::Mat;
use pliant_math::{Quat, Vec3};
use pliant_types::{constants, BodyId, PliantError, PliantResult, Real};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::body::RigidBody;
use crate::constraint::RbdConstraint;
use crate::pgs::PgsSolver;

/// Configuration for a rigid body model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RbdConfig {
    /// Fixed timestep in seconds.
    pub dt: Real,
    /// Gravity acceleration in m/s².
    pub gravity: Vec3,
    /// Maximum PGS sweeps per step.
    pub max_iterations: u32,
    /// PGS convergence tolerance (largest multiplier change per sweep).
    pub epsilon: Real,
    /// Baumgarte stabilization factor β.
    pub baumgarte_beta: Real,
    /// Constraint rows beyond this are dropped with a warning.
    pub max_num_constraints: usize,
    /// Linear velocity damping coefficient in [0, 1].
    pub velocity_damping: Real,
    /// Angular velocity damping coefficient in [0, 1].
    pub angular_damping: Real,
}

impl Default for RbdConfig {
    fn default() -> Self {
        Self {
            dt: constants::DEFAULT_DT,
            gravity: Vec3::new(0.0, -constants::GRAVITY, 0.0),
            max_iterations: 20,
            epsilon: 1.0e-6,
            baumgarte_beta: constants::DEFAULT_BAUMGARTE_BETA,
            max_num_constraints: 4096,
            velocity_damping: 0.0,
            angular_damping: 0.0,
        }
    }
}

impl RbdConfig {
    pub fn validate(&self) -> PliantResult<()> {
        if !(self.dt > 0.0 && self.dt.is_finite()) {
            return Err(PliantError::InvalidConfig(format!(
                "timestep must be positive and finite, got {}",
                self.dt
            )));
        }
        if !(0.0..=1.0).contains(&self.velocity_damping)
            || !(0.0..=1.0).contains(&self.angular_damping)
        {
            return Err(PliantError::InvalidConfig(
                "damping coefficients must be in [0, 1]".into(),
            ));
        }
        if self.baumgarte_beta < 0.0 || self.baumgarte_beta > 1.0 {
            return Err(PliantError::InvalidConfig(format!(
                "Baumgarte beta must be in [0, 1], got {}",
                self.baumgarte_beta
            )));
        }
        Ok(())
    }
}

/// A system of rigid bodies sharing one constraint solve.
#[derive(Debug, Default)]
pub struct RigidBodyModel {
    config: RbdConfig,
    bodies: Vec<RigidBody>,
    constraints: Vec<RbdConstraint>,
}

impl RigidBodyModel {
    pub fn new(config: RbdConfig) -> PliantResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            bodies: Vec::new(),
            constraints: Vec::new(),
        })
    }

    pub fn config(&self) -> &RbdConfig {
        &self.config
    }

    /// Replace the configuration between steps. An invalid config is
    /// rejected and the previous one stays in effect.
    pub fn configure(&mut self, config: RbdConfig) -> PliantResult<()> {
        if let Err(e) = config.validate() {
            warn!(error = %e, "rejected invalid configuration, keeping previous");
            return Err(e);
        }
        self.config = config;
        Ok(())
    }

    /// Add a body to the arena, returning its handle.
    pub fn add_body(&mut self, body: RigidBody) -> BodyId {
        let id = BodyId(self.bodies.len() as u32);
        self.bodies.push(body);
        id
    }

    pub fn body(&self, id: BodyId) -> &RigidBody {
        &self.bodies[id.index()]
    }

    pub fn body_mut(&mut self, id: BodyId) -> &mut RigidBody {
        &mut self.bodies[id.index()]
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Queue a constraint row for this step's solve.
    ///
    /// Rows beyond `max_num_constraints` are dropped with a warning;
    /// they may re-form next step from updated geometry.
    pub fn add_constraint(&mut self, constraint: RbdConstraint) {
        if self.constraints.len() >= self.config.max_num_constraints {
            warn!(
                limit = self.config.max_num_constraints,
                "constraint limit reached, dropping row"
            );
            return;
        }
        self.constraints.push(constraint);
    }

    /// Baumgarte factor and timestep, for building constraint rows.
    pub fn stabilization(&self) -> (Real, Real) {
        (self.config.baumgarte_beta, self.config.dt)
    }

    /// Advance all bodies by one timestep and discard the constraints.
    ///
    /// The three phases are public so a scene driver can wire them into
    /// a task graph individually.
    pub fn step(&mut self) {
        self.compute_tentative_velocities();
        self.solve_constraints();
        self.integrate();
    }

    /// Unconstrained velocity estimate from gravity and the external
    /// accumulators.
    pub fn compute_tentative_velocities(&mut self) {
        let dt = self.config.dt;
        let gravity = self.config.gravity;
        for body in &mut self.bodies {
            if body.is_static() {
                continue;
            }
            body.velocity += dt * (body.inv_mass() * body.force + gravity);
            body.angular_velocity += dt * (body.inv_inertia_world() * body.torque);
        }
    }

    /// Assemble the effective-mass system, run PGS, apply the impulses,
    /// and discard this step's constraint rows.
    pub fn solve_constraints(&mut self) {
        if self.constraints.is_empty() {
            return;
        }
        let dt = self.config.dt;
        let n = self.constraints.len();

        // A[i][j] = Σ over shared bodies of Jᵢ · M⁻¹ · Jⱼᵀ
        let a = Mat::from_fn(n, n, |i, j| {
            let ci = &self.constraints[i];
            let cj = &self.constraints[j];
            let mut sum = 0.0;
            for (si, &body_i) in ci.bodies.iter().enumerate() {
                let Some(body_i) = body_i else { continue };
                for (sj, &body_j) in cj.bodies.iter().enumerate() {
                    if Some(body_i) != body_j {
                        continue;
                    }
                    let body = &self.bodies[body_i.index()];
                    if body.is_static() {
                        continue;
                    }
                    sum += body.inv_mass()
                        * ci.jacobian.linear[si].dot(cj.jacobian.linear[sj])
                        + ci.jacobian.angular[si]
                            .dot(body.inv_inertia_world() * cj.jacobian.angular[sj]);
                }
            }
            sum
        });

        // b[i] = (vu − J·u) / dt with u the tentative velocities
        let mut b = vec![0.0; n];
        let mut ranges = vec![(0.0, 0.0); n];
        for (i, c) in self.constraints.iter().enumerate() {
            let mut ju = 0.0;
            for (side, &body) in c.bodies.iter().enumerate() {
                let Some(body) = body else { continue };
                let body = &self.bodies[body.index()];
                ju += c.jacobian.linear[side].dot(body.velocity)
                    + c.jacobian.angular[side].dot(body.angular_velocity);
            }
            b[i] = (c.vu - ju) / dt;
            ranges[i] = c.range;
        }

        let solver = PgsSolver::new(self.config.max_iterations, self.config.epsilon);
        let lambda = solver.solve(&a, &b, &ranges);

        // Apply impulses and record reactions
        for body in &mut self.bodies {
            body.constraint_force = Vec3::ZERO;
            body.constraint_torque = Vec3::ZERO;
        }
        for (c, &l) in self.constraints.iter().zip(&lambda) {
            for (side, &body) in c.bodies.iter().enumerate() {
                let Some(body) = body else { continue };
                let body = &mut self.bodies[body.index()];
                if body.is_static() {
                    continue;
                }
                let force = c.jacobian.linear[side] * l;
                let torque = c.jacobian.angular[side] * l;
                body.velocity += dt * body.inv_mass() * force;
                let dw = dt * (body.inv_inertia_world() * torque);
                body.angular_velocity += dw;
                body.constraint_force += force;
                body.constraint_torque += torque;
            }
        }
        self.constraints.clear();
    }

    /// Symplectic Euler pose update with normalized quaternion step.
    pub fn integrate(&mut self) {
        let dt = self.config.dt;
        let lin_factor = 1.0 - self.config.velocity_damping;
        let ang_factor = 1.0 - self.config.angular_damping;
        for body in &mut self.bodies {
            if body.is_static() {
                body.clear_forces();
                continue;
            }
            body.velocity *= lin_factor;
            body.angular_velocity *= ang_factor;
            body.position += dt * body.velocity;

            let w = body.angular_velocity;
            if w.length_squared() > 0.0 {
                let dq = Quat::from_xyzw(w.x, w.y, w.z, 0.0) * body.orientation;
                body.orientation = (body.orientation + dq * (0.5 * dt)).normalize();
            }
            body.clear_forces();
        }
    }
}
