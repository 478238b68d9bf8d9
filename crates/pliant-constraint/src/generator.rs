//! Constraint generation from mesh topology.
//!
//! Walks the element buffers of a mesh and emits the structural
//! constraint set described by a [`ConstraintConfig`]: unique edges →
//! distance, triangles → area, interior edges → dihedral, tets →
//! volume and/or FEM. Rest data is captured from the undeformed vertex
//! positions, once, at generation time.

use pliant_mesh::{Mesh, Topology};
use pliant_types::{PliantError, PliantResult, Real};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::constraint::Constraint;
use crate::container::ConstraintContainer;
use crate::fem::FemConfig;

/// Which structural constraint types to generate and how stiff.
///
/// A `None` entry disables that constraint type. Stiffness doubles as
/// both the legacy per-pass gain and, inverted, the XPBD compliance
/// (`α = 1/k`); FEM elements derive their compliance from the material
/// instead.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConstraintConfig {
    /// Distance constraints on every unique element edge.
    pub distance_stiffness: Option<Real>,
    /// Area constraints on every triangle.
    pub area_stiffness: Option<Real>,
    /// Volume constraints on every tetrahedron.
    pub volume_stiffness: Option<Real>,
    /// Dihedral (bending) constraints on every interior surface edge.
    pub dihedral_stiffness: Option<Real>,
    /// FEM strain constraints on every tetrahedron.
    pub fem: Option<FemConfig>,
}

impl ConstraintConfig {
    /// Check the parameter ranges.
    ///
    /// Stiffness values must be positive and finite; FEM material
    /// parameters are checked by [`FemConfig::validate`].
    pub fn validate(&self) -> PliantResult<()> {
        let named = [
            ("distance", self.distance_stiffness),
            ("area", self.area_stiffness),
            ("volume", self.volume_stiffness),
            ("dihedral", self.dihedral_stiffness),
        ];
        for (name, stiffness) in named {
            if let Some(k) = stiffness {
                if !(k > 0.0 && k.is_finite()) {
                    return Err(PliantError::InvalidConfig(format!(
                        "{name} stiffness must be positive and finite, got {k}"
                    )));
                }
            }
        }
        if let Some(fem) = &self.fem {
            fem.validate()?;
        }
        Ok(())
    }

    /// True if at least one constraint type is enabled.
    pub fn any_enabled(&self) -> bool {
        self.distance_stiffness.is_some()
            || self.area_stiffness.is_some()
            || self.volume_stiffness.is_some()
            || self.dihedral_stiffness.is_some()
            || self.fem.is_some()
    }
}

/// XPBD compliance corresponding to a legacy stiffness value.
fn compliance_of(stiffness: Real) -> Real {
    if stiffness > 0.0 {
        1.0 / stiffness
    } else {
        0.0
    }
}

/// Generate the structural constraint set for a mesh.
///
/// Constraints referencing only fixed particles are still generated;
/// the projection recognizes them as no-ops. Degenerate rest elements
/// (zero-length edges, collapsed tets) are skipped with a warning.
pub fn generate_constraints(
    mesh: &Mesh,
    topology: &Topology,
    config: &ConstraintConfig,
    container: &mut ConstraintContainer,
) {
    let rest = &mesh.vertices;
    let mut skipped = 0usize;

    if let Some(k) = config.distance_stiffness {
        let alpha = compliance_of(k);
        for &[a, b] in &topology.edges {
            if (rest[a as usize] - rest[b as usize]).length_squared() > 0.0 {
                container.add_constraint(Constraint::distance(rest, a, b, k, alpha));
            } else {
                skipped += 1;
            }
        }
    }

    if let Some(k) = config.area_stiffness {
        let alpha = compliance_of(k);
        for &[a, b, c] in &mesh.triangles {
            container.add_constraint(Constraint::area(rest, a, b, c, k, alpha));
        }
    }

    if let Some(k) = config.dihedral_stiffness {
        let alpha = compliance_of(k);
        for ie in &topology.interior_edges {
            match Constraint::dihedral(rest, [ie.wing_a, ie.wing_b], [ie.v0, ie.v1], k, alpha) {
                Some(c) => container.add_constraint(c),
                None => skipped += 1,
            }
        }
    }

    if let Some(k) = config.volume_stiffness {
        let alpha = compliance_of(k);
        for &tet in &mesh.tetrahedra {
            container.add_constraint(Constraint::volume(rest, tet, k, alpha));
        }
    }

    if let Some(fem) = &config.fem {
        for &tet in &mesh.tetrahedra {
            match Constraint::fem_tet(rest, tet, fem) {
                Some(c) => container.add_constraint(c),
                None => skipped += 1,
            }
        }
    }

    if skipped > 0 {
        warn!(skipped, "skipped degenerate rest elements during constraint generation");
    }
}
