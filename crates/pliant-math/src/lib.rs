//! # pliant-math
//!
//! Linear algebra primitives for the Pliant constraint-solving engine.
//!
//! Provides:
//! - Re-exports of `glam` double-precision types (`Vec3`, `Mat3`, `Quat`)
//! - 3×4 Jacobian block type for rigid body constraints
//! - Tetrahedron helpers (signed volume, edge matrix)

pub mod jacobian;
pub mod tet;

pub use jacobian::Jacobian;

// Re-export glam's f64 types as the canonical math types for Pliant.
// The solver is double precision throughout (see pliant-types::scalar).
pub use glam::{DMat3 as Mat3, DQuat as Quat, DVec3 as Vec3};
