//! # pliant-mesh
//!
//! Mesh buffers, topology queries, and procedural generators for the
//! Pliant engine.
//!
//! The solver consumes a [`Mesh`] (vertex positions plus line/triangle/
//! tetrahedron connectivity) when generating its structural constraint
//! set. Mesh file I/O lives outside this workspace; the generators here
//! exist for tests and benchmarks.

pub mod generators;
pub mod mesh;
pub mod topology;

pub use mesh::Mesh;
pub use topology::Topology;
