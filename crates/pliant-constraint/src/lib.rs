//! # pliant-constraint
//!
//! The PBD constraint model: tagged-variant constraints over particle
//! handles, XPBD/legacy projection, graph-coloring partitioning, and
//! constraint generation from mesh topology.
//!
//! ## Key Types
//!
//! - [`Constraint`] — one algebraic relation between up to four particles
//! - [`ConstraintKind`] — the variant data (rest length, rest volume, …)
//! - [`ConstraintContainer`] — the live constraint set plus its partition
//! - [`ConstraintConfig`] / [`generate_constraints`] — mesh → constraint list
//! - [`ContactPoint`] — per-frame contact input from external collision detection

pub mod constraint;
pub mod container;
pub mod contact;
pub mod fem;
pub mod generator;
pub mod kinds;

pub use constraint::{Constraint, ConstraintKind, Correction, ProjectionMode};
pub use contact::{ContactPoint, ContactWitness};
pub use container::ConstraintContainer;
pub use fem::{FemConfig, FemMaterial};
pub use generator::{generate_constraints, ConstraintConfig};
