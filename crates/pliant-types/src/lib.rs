//! # pliant-types
//!
//! Shared types, identifiers, error types, and physical constants
//! for the Pliant constraint-solving engine.
//!
//! This crate has zero domain logic — it defines the vocabulary
//! that all other Pliant crates share.

pub mod constants;
pub mod error;
pub mod ids;
pub mod scalar;

pub use error::{PliantError, PliantResult};
pub use ids::{BodyId, ParticleId};
pub use scalar::Real;
