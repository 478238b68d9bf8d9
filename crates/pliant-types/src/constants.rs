//! Physical constants and simulation defaults.

use crate::scalar::Real;

/// Gravitational acceleration (m/s²).
pub const GRAVITY: Real = 9.81;

/// Default simulation timestep (seconds). Haptic-rate steps are much
/// shorter; this is the visual-rate default.
pub const DEFAULT_DT: Real = 1.0 / 60.0;

/// Default number of projection iterations per timestep.
pub const DEFAULT_ITERATIONS: u32 = 10;

/// Constraint partitions smaller than this are solved sequentially;
/// tiny groups cost more in scheduling than they gain in parallelism.
pub const DEFAULT_MIN_PARTITION_SIZE: usize = 16;

/// Default Baumgarte stabilization factor for rigid body constraints.
pub const DEFAULT_BAUMGARTE_BETA: Real = 0.05;

/// Epsilon for degenerate geometry detection (zero-length edges,
/// zero-area triangles, zero-volume tets).
pub const DEGENERATE_EPS: Real = 1.0e-12;

/// Epsilon below which a generalized inverse-mass sum is treated as
/// all-fixed and the constraint is skipped.
pub const WEIGHT_SUM_EPS: Real = 1.0e-14;
