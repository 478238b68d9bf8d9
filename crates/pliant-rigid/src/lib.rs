//! # pliant-rigid
//!
//! Rigid body dynamics: a body arena, per-step velocity-space
//! constraint rows, and a projected Gauss-Seidel solve over the
//! effective-mass system.
//!
//! ## Key Types
//!
//! - [`RigidBodyModel`] — body arena, constraint assembly, stepping
//! - [`RigidBody`] / [`BodyId`](pliant_types::BodyId) — mass properties and pose, handle-addressed
//! - [`RbdConstraint`] — one Jacobian row: contact, locking, damping, coupling
//! - [`PgsSolver`] — clamped Gauss-Seidel over `A = J·M⁻¹·Jᵀ`

pub mod body;
pub mod constraint;
pub mod model;
pub mod pgs;

pub use body::RigidBody;
pub use constraint::{RbdConstraint, BILATERAL, UNILATERAL};
pub use model::{RbdConfig, RigidBodyModel};
pub use pgs::PgsSolver;
