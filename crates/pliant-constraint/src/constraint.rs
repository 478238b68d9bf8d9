//! The constraint type and its projection.
//!
//! A [`Constraint`] is one algebraic relation between up to four
//! particles. Variants are a tagged enum rather than a trait hierarchy:
//! the projection loop runs millions of times per second and enum
//! dispatch keeps the data compact and the calls static.

use pliant_math::Vec3;
use pliant_types::constants::WEIGHT_SUM_EPS;
use pliant_types::{ParticleId, Real};
use serde::{Deserialize, Serialize};

use crate::fem::{FemConfig, FemElement};
use crate::kinds;

/// Maximum number of particles a single constraint can reference.
pub const MAX_PARTICLES: usize = 4;

/// How the projection applies stiffness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectionMode {
    /// XPBD: compliance-based multiplier update, accumulated across
    /// iterations; effective stiffness is iteration-count independent.
    Xpbd,
    /// Legacy PBD: per-pass correction scaled by the stiffness factor,
    /// no multiplier accumulation.
    LegacyStiffness,
}

/// Variant data for each constraint kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ConstraintKind {
    /// Two points held at a rest distance.
    Distance { rest_length: Real },
    /// Triangle held at its rest area.
    Area { rest_area: Real },
    /// Tetrahedron held at its rest volume.
    Volume { rest_volume: Real },
    /// Fold angle across a shared triangle edge held at its rest value.
    /// Particles are ordered (wing_a, wing_b, edge_v0, edge_v1).
    Dihedral { rest_angle: Real },
    /// Tetrahedral strain-energy constraint.
    FemTet(FemElement),
    /// One-sided contact along a fixed normal; acts only while
    /// penetrating, never pulls the pair together.
    Contact { normal: Vec3 },
    /// Stitch between two points, usually with zero rest length.
    /// Created by interactive stitching, removed on tear.
    Stitch { rest_length: Real },
}

impl ConstraintKind {
    /// Number of particles this kind references.
    pub fn particle_count(&self) -> usize {
        match self {
            Self::Distance { .. } | Self::Contact { .. } | Self::Stitch { .. } => 2,
            Self::Area { .. } => 3,
            Self::Volume { .. } | Self::Dihedral { .. } | Self::FemTet(_) => 4,
        }
    }
}

/// Position corrections produced by projecting one constraint.
///
/// At most one correction per participating particle. Indices are raw
/// particle indices into the owning state arrays.
#[derive(Debug, Clone, Copy, Default)]
pub struct Correction {
    deltas: [(u32, Vec3); MAX_PARTICLES],
    len: usize,
}

impl Correction {
    fn push(&mut self, particle: u32, delta: Vec3) {
        self.deltas[self.len] = (particle, delta);
        self.len += 1;
    }

    /// Iterate over `(particle_index, delta)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (u32, Vec3)> + '_ {
        self.deltas[..self.len].iter().copied()
    }

    /// True if the projection produced no movement.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// A single PBD constraint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Constraint {
    particles: [ParticleId; MAX_PARTICLES],
    kind: ConstraintKind,
    /// Per-pass gain for legacy stiffness mode, in (0, 1].
    stiffness: Real,
    /// XPBD compliance α; 0 = perfectly rigid.
    compliance: Real,
    /// Accumulated Lagrange multiplier (XPBD only, reset each step).
    lambda: Real,
}

impl Constraint {
    fn new(kind: ConstraintKind, ids: [u32; MAX_PARTICLES], stiffness: Real, compliance: Real) -> Self {
        Self {
            particles: ids.map(ParticleId),
            kind,
            stiffness,
            compliance,
            lambda: 0.0,
        }
    }

    /// Distance constraint at the rest length of the given edge.
    pub fn distance(rest: &[Vec3], i0: u32, i1: u32, stiffness: Real, compliance: Real) -> Self {
        let rest_length = (rest[i0 as usize] - rest[i1 as usize]).length();
        Self::new(
            ConstraintKind::Distance { rest_length },
            [i0, i1, 0, 0],
            stiffness,
            compliance,
        )
    }

    /// Area constraint at the rest area of the given triangle.
    pub fn area(rest: &[Vec3], i0: u32, i1: u32, i2: u32, stiffness: Real, compliance: Real) -> Self {
        let e1 = rest[i1 as usize] - rest[i0 as usize];
        let e2 = rest[i2 as usize] - rest[i0 as usize];
        let rest_area = 0.5 * e1.cross(e2).length();
        Self::new(
            ConstraintKind::Area { rest_area },
            [i0, i1, i2, 0],
            stiffness,
            compliance,
        )
    }

    /// Volume constraint at the rest volume of the given tet.
    pub fn volume(
        rest: &[Vec3],
        ids: [u32; 4],
        stiffness: Real,
        compliance: Real,
    ) -> Self {
        let rest_volume = pliant_math::tet::tet_volume(
            rest[ids[0] as usize],
            rest[ids[1] as usize],
            rest[ids[2] as usize],
            rest[ids[3] as usize],
        );
        Self::new(ConstraintKind::Volume { rest_volume }, ids, stiffness, compliance)
    }

    /// Dihedral constraint at the rest fold angle.
    ///
    /// `wings` are the two off-edge vertices, `edge` the shared edge.
    /// Returns `None` if the rest configuration is degenerate.
    pub fn dihedral(
        rest: &[Vec3],
        wings: [u32; 2],
        edge: [u32; 2],
        stiffness: Real,
        compliance: Real,
    ) -> Option<Self> {
        let rest_angle = kinds::dihedral_angle(
            rest[wings[0] as usize],
            rest[wings[1] as usize],
            rest[edge[0] as usize],
            rest[edge[1] as usize],
        )?;
        Some(Self::new(
            ConstraintKind::Dihedral { rest_angle },
            [wings[0], wings[1], edge[0], edge[1]],
            stiffness,
            compliance,
        ))
    }

    /// FEM tet constraint; `None` for a degenerate rest element.
    pub fn fem_tet(rest: &[Vec3], ids: [u32; 4], config: &FemConfig) -> Option<Self> {
        let elem = FemElement::from_rest_state(
            rest[ids[0] as usize],
            rest[ids[1] as usize],
            rest[ids[2] as usize],
            rest[ids[3] as usize],
            config,
        )?;
        Some(Self::new(
            ConstraintKind::FemTet(elem),
            ids,
            1.0,
            config.compliance(),
        ))
    }

    /// One-sided contact between a penetrating particle and a (possibly
    /// virtual, fixed) witness particle along `normal`.
    pub fn contact(i0: u32, i1: u32, normal: Vec3, compliance: Real) -> Self {
        Self::new(ConstraintKind::Contact { normal }, [i0, i1, 0, 0], 1.0, compliance)
    }

    /// Stitch constraint pulling two points to `rest_length` apart.
    pub fn stitch(i0: u32, i1: u32, rest_length: Real, compliance: Real) -> Self {
        Self::new(
            ConstraintKind::Stitch { rest_length },
            [i0, i1, 0, 0],
            1.0,
            compliance,
        )
    }

    /// The participating particles, in constraint order.
    pub fn particles(&self) -> &[ParticleId] {
        &self.particles[..self.kind.particle_count()]
    }

    /// The variant data.
    pub fn kind(&self) -> &ConstraintKind {
        &self.kind
    }

    /// True for constraints that only push (clamped multiplier).
    pub fn is_one_sided(&self) -> bool {
        matches!(self.kind, ConstraintKind::Contact { .. })
    }

    /// Reset the accumulated multiplier. Called once per step before
    /// the first solver iteration.
    pub fn reset_lambda(&mut self) {
        self.lambda = 0.0;
    }

    /// Constraint violation `c` and per-particle gradients at the given
    /// positions. `None` signals a degenerate configuration: the solver
    /// skips the constraint this pass without modifying state.
    pub fn compute_value_and_gradient(
        &self,
        positions: &[Vec3],
    ) -> Option<(Real, [Vec3; MAX_PARTICLES])> {
        let p = |i: usize| positions[self.particles[i].index()];
        let pad2 = |(c, g): (Real, [Vec3; 2])| (c, [g[0], g[1], Vec3::ZERO, Vec3::ZERO]);
        let pad3 = |(c, g): (Real, [Vec3; 3])| (c, [g[0], g[1], g[2], Vec3::ZERO]);

        match &self.kind {
            ConstraintKind::Distance { rest_length } => {
                kinds::distance(p(0), p(1), *rest_length).map(pad2)
            }
            ConstraintKind::Stitch { rest_length } => {
                // Zero rest length makes coincident points the *solved*
                // state, not a degenerate one.
                let diff = p(0) - p(1);
                let len = diff.length();
                if len < 1.0e-12 {
                    return Some((0.0, [Vec3::ZERO; MAX_PARTICLES]));
                }
                let n = diff / len;
                Some(pad2((len - rest_length, [n, -n])))
            }
            ConstraintKind::Area { rest_area } => {
                kinds::area(p(0), p(1), p(2), *rest_area).map(pad3)
            }
            ConstraintKind::Volume { rest_volume } => {
                kinds::volume(p(0), p(1), p(2), p(3), *rest_volume)
            }
            ConstraintKind::Dihedral { rest_angle } => {
                kinds::dihedral(p(0), p(1), p(2), p(3), *rest_angle)
            }
            ConstraintKind::FemTet(elem) => elem.value_and_gradient(p(0), p(1), p(2), p(3)),
            ConstraintKind::Contact { normal } => {
                Some(pad2(kinds::contact_gap(p(0), p(1), *normal)))
            }
        }
    }

    /// Project this constraint, returning the position corrections.
    ///
    /// Mutates the accumulated multiplier in XPBD mode. Returns `None`
    /// when the constraint is degenerate, inactive (separated contact),
    /// or all its particles are fixed.
    pub fn compute_correction(
        &mut self,
        positions: &[Vec3],
        inv_masses: &[Real],
        dt: Real,
        mode: ProjectionMode,
    ) -> Option<Correction> {
        let (c, grads) = self.compute_value_and_gradient(positions)?;

        // One-sided constraints act only while violated.
        if self.is_one_sided() && c >= 0.0 && self.lambda == 0.0 {
            return None;
        }

        let n = self.kind.particle_count();
        let mut weight_sum = 0.0;
        for i in 0..n {
            weight_sum += inv_masses[self.particles[i].index()] * grads[i].length_squared();
        }
        // All participating points fixed: contributes no correction.
        if weight_sum < WEIGHT_SUM_EPS {
            return None;
        }

        let dlambda = match mode {
            ProjectionMode::Xpbd => {
                let alpha = if dt > 0.0 {
                    self.compliance / (dt * dt)
                } else {
                    0.0
                };
                let mut dl = -(c + alpha * self.lambda) / (weight_sum + alpha);
                if self.is_one_sided() {
                    // Keep the accumulated multiplier non-negative:
                    // contacts push apart, never pull together.
                    dl = dl.max(-self.lambda);
                }
                self.lambda += dl;
                dl
            }
            ProjectionMode::LegacyStiffness => {
                let mut dl = -c * self.stiffness / weight_sum;
                if self.is_one_sided() {
                    dl = dl.max(0.0);
                }
                dl
            }
        };

        if dlambda == 0.0 {
            return None;
        }

        let mut correction = Correction::default();
        for i in 0..n {
            let idx = self.particles[i].index();
            let w = inv_masses[idx];
            if w > 0.0 {
                correction.push(idx as u32, w * dlambda * grads[i]);
            }
        }
        Some(correction)
    }

    /// Project and apply in place (sequential path).
    pub fn project(
        &mut self,
        positions: &mut [Vec3],
        inv_masses: &[Real],
        dt: Real,
        mode: ProjectionMode,
    ) {
        if let Some(correction) = self.compute_correction(positions, inv_masses, dt, mode) {
            for (idx, delta) in correction.iter() {
                positions[idx as usize] += delta;
            }
        }
    }
}
