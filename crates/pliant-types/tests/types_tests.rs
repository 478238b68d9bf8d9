//! Integration tests for pliant-types.

use pliant_types::{BodyId, ParticleId, PliantError};

// ─── Id Tests ─────────────────────────────────────────────────

#[test]
fn particle_id_roundtrip() {
    let id = ParticleId::from(42u32);
    assert_eq!(id.index(), 42);
    assert_eq!(id, ParticleId(42));
}

#[test]
fn body_id_distinct_from_particle_id() {
    // Compile-time property really, but make sure the raw values behave.
    let b = BodyId(7);
    assert_eq!(b.index(), 7);
}

#[test]
fn ids_serialize_as_plain_integers() {
    let id = ParticleId(3);
    let json = serde_json::to_string(&id).unwrap();
    assert_eq!(json, "3");
    let back: ParticleId = serde_json::from_str(&json).unwrap();
    assert_eq!(back, id);
}

// ─── Error Tests ──────────────────────────────────────────────

#[test]
fn error_messages_are_descriptive() {
    let err = PliantError::InvalidConfig("damping must be in [0, 1]".into());
    assert!(err.to_string().contains("damping"));
}
