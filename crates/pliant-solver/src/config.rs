//! Deformable model configuration.
//!
//! Parameters that control the PBD stepping loop: timestep, iteration
//! count, gravity, damping, fixed nodes, and which structural
//! constraints to generate.

use pliant_constraint::{ConstraintConfig, ProjectionMode};
use pliant_math::Vec3;
use pliant_types::{constants, PliantError, PliantResult, Real};
use serde::{Deserialize, Serialize};

/// Configuration for a PBD deformable model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PbdConfig {
    /// Fixed timestep in seconds.
    pub dt: Real,

    /// Solver iterations per timestep.
    pub iterations: u32,

    /// Gravity acceleration in m/s².
    pub gravity: Vec3,

    /// Velocity damping coefficient in [0, 1].
    /// 0 = no damping, 1 = velocities zeroed every step.
    pub damping: Real,

    /// Mass assigned to every particle (kg). Fixed particles get
    /// infinite mass regardless.
    pub uniform_mass: Real,

    /// Particle indices pinned in place (zero inverse mass).
    pub fixed_nodes: Vec<u32>,

    /// XPBD or legacy per-pass stiffness projection.
    pub mode: ProjectionMode,

    /// Partition constraints for parallel projection.
    pub do_partitioning: bool,

    /// Partitions smaller than this solve sequentially.
    pub min_partition_size: usize,

    /// Which structural constraints to generate from the geometry.
    pub constraints: ConstraintConfig,
}

impl Default for PbdConfig {
    fn default() -> Self {
        Self {
            dt: constants::DEFAULT_DT,
            iterations: constants::DEFAULT_ITERATIONS,
            gravity: Vec3::new(0.0, -constants::GRAVITY, 0.0),
            damping: 0.01,
            uniform_mass: 1.0,
            fixed_nodes: Vec::new(),
            mode: ProjectionMode::Xpbd,
            do_partitioning: true,
            min_partition_size: constants::DEFAULT_MIN_PARTITION_SIZE,
            constraints: ConstraintConfig::default(),
        }
    }
}

impl PbdConfig {
    /// Check the parameter ranges.
    pub fn validate(&self) -> PliantResult<()> {
        if !(self.dt > 0.0 && self.dt.is_finite()) {
            return Err(PliantError::InvalidConfig(format!(
                "timestep must be positive and finite, got {}",
                self.dt
            )));
        }
        if self.iterations == 0 {
            return Err(PliantError::InvalidConfig(
                "iteration count must be at least 1".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.damping) {
            return Err(PliantError::InvalidConfig(format!(
                "damping must be in [0, 1], got {}",
                self.damping
            )));
        }
        if !(self.uniform_mass > 0.0 && self.uniform_mass.is_finite()) {
            return Err(PliantError::InvalidConfig(format!(
                "uniform mass must be positive and finite, got {}",
                self.uniform_mass
            )));
        }
        self.constraints.validate()?;
        Ok(())
    }
}
