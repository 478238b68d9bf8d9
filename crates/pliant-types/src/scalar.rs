//! Scalar type alias for the simulation.
//!
//! The solver runs in `f64` throughout: constraint projection accumulates
//! many small corrections per step and single precision drifts visibly
//! over long interactive sessions.

/// The floating-point type used throughout the simulation.
pub type Real = f64;
