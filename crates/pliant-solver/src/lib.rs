//! # pliant-solver
//!
//! The PBD deformable model: per-particle state, the projection loop,
//! and the fixed step sequence (predict, project, update velocities).
//!
//! ## Key Types
//!
//! - [`PbdModel`] — one deformable body: geometry, state, constraints, stepping
//! - [`PbdConfig`] — timestep, iterations, gravity, damping, constraint set
//! - [`ParticleState`] — positions, velocities, masses, virtual contact anchors
//! - [`PbdSolver`] — the projection loop itself

pub mod config;
pub mod model;
pub mod solver;
pub mod state;

pub use config::PbdConfig;
pub use model::PbdModel;
pub use solver::PbdSolver;
pub use state::ParticleState;
