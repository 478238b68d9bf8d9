//! Per-frame contact input from external collision detection.
//!
//! Collision detection lives outside this workspace. Each step it hands
//! the solver a list of [`ContactPoint`]s; the model wraps them into
//! one-sided [`Contact`](crate::ConstraintKind::Contact) constraints
//! (against a virtual fixed particle when the other side is static
//! geometry) and discards them after the solve. Contacts are never
//! persisted across frames.

use pliant_math::Vec3;
use pliant_types::{ParticleId, Real};
use serde::{Deserialize, Serialize};

/// The other side of a contact.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ContactWitness {
    /// Another particle of the same model (self-collision, or a second
    /// deformable sharing the state arrays).
    Particle(ParticleId),
    /// A fixed point on static collision geometry. The model creates a
    /// zero-inverse-mass virtual particle there for the duration of the
    /// step.
    StaticPoint(Vec3),
}

/// One detected contact, as produced by the external collision pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContactPoint {
    /// The penetrating particle.
    pub particle: ParticleId,
    /// What it penetrated.
    pub witness: ContactWitness,
    /// Contact normal, unit length, pointing from the witness toward
    /// the particle (the direction that separates the pair). The
    /// penetration depth follows from the witness placement, so it is
    /// not carried separately.
    pub normal: Vec3,
    /// Compliance of the generated constraint; 0 = hard contact.
    pub compliance: Real,
}

impl ContactPoint {
    /// Hard contact against static geometry.
    pub fn against_static(particle: ParticleId, point: Vec3, normal: Vec3) -> Self {
        Self {
            particle,
            witness: ContactWitness::StaticPoint(point),
            normal,
            compliance: 0.0,
        }
    }
}
