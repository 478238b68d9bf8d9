//! Simulation mesh: vertex positions plus element connectivity.
//!
//! A mesh may carry any combination of line, triangle, and tetrahedron
//! elements. The constraint generator walks whichever element buffers
//! are present (edges from all of them, dihedral pairs from triangles,
//! volume/FEM constraints from tetrahedra).

use pliant_math::Vec3;
use pliant_types::{PliantError, PliantResult};
use serde::{Deserialize, Serialize};

/// A simulation mesh with optional line, surface, and volume connectivity.
///
/// Positions are double precision. Element buffers index into `vertices`.
/// The mesh is immutable after it is bound to a model; per-step vertex
/// motion lives in the model's particle state, not here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Mesh {
    /// Vertex positions in the rest (undeformed) configuration.
    pub vertices: Vec<Vec3>,
    /// Line segments — each `[v0, v1]`.
    pub lines: Vec<[u32; 2]>,
    /// Triangles — each `[v0, v1, v2]`, counter-clockwise winding.
    pub triangles: Vec<[u32; 3]>,
    /// Tetrahedra — each `[v0, v1, v2, v3]`, right-handed order.
    pub tetrahedra: Vec<[u32; 4]>,
}

impl Mesh {
    /// A surface mesh from positions and triangle indices.
    pub fn surface(vertices: Vec<Vec3>, triangles: Vec<[u32; 3]>) -> Self {
        Self {
            vertices,
            triangles,
            ..Default::default()
        }
    }

    /// A volumetric mesh from positions and tetrahedron indices.
    pub fn volumetric(vertices: Vec<Vec3>, tetrahedra: Vec<[u32; 4]>) -> Self {
        Self {
            vertices,
            tetrahedra,
            ..Default::default()
        }
    }

    /// Returns the number of vertices.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Returns true if the mesh has no elements at all (a bare point cloud).
    pub fn has_elements(&self) -> bool {
        !self.lines.is_empty() || !self.triangles.is_empty() || !self.tetrahedra.is_empty()
    }

    /// Checks that every element index is in range.
    pub fn validate(&self) -> PliantResult<()> {
        if self.vertices.is_empty() {
            return Err(PliantError::InvalidMesh("mesh has no vertices".into()));
        }
        let n = self.vertices.len() as u32;
        let out_of_range = self.lines.iter().flatten().chain(
            self.triangles.iter().flatten()).chain(
            self.tetrahedra.iter().flatten()).any(|&i| i >= n);
        if out_of_range {
            return Err(PliantError::InvalidMesh(format!(
                "element index out of range (vertex count {n})"
            )));
        }
        Ok(())
    }
}
