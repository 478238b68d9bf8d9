//! The projection loop.
//!
//! Each iteration sweeps the structural constraint set, then the
//! per-step contact set. Partition groups are projected in parallel
//! (Jacobi within a group, Gauss-Seidel across groups); the remainder
//! and the contacts are projected sequentially.

use pliant_constraint::{Constraint, ConstraintContainer, Correction, ProjectionMode};
use pliant_types::Real;
use rayon::prelude::*;

use crate::state::ParticleState;

/// Runs the constraint projection for one timestep.
#[derive(Debug, Clone, Copy)]
pub struct PbdSolver {
    pub iterations: u32,
    pub mode: ProjectionMode,
}

impl PbdSolver {
    pub fn new(iterations: u32, mode: ProjectionMode) -> Self {
        Self { iterations, mode }
    }

    /// Project all constraints for one step.
    ///
    /// Resets accumulated multipliers, then runs `iterations` sweeps.
    /// Contacts are projected after the structural set each sweep so
    /// penetration resolution sees the structurally corrected positions.
    pub fn solve(
        &self,
        structural: &mut ConstraintContainer,
        contacts: &mut ConstraintContainer,
        state: &mut ParticleState,
        dt: Real,
    ) {
        for c in structural.constraints_mut() {
            c.reset_lambda();
        }
        for c in contacts.constraints_mut() {
            c.reset_lambda();
        }

        for _ in 0..self.iterations {
            self.sweep(structural, state, dt);

            let (positions, inv_masses) = state.project_split();
            for c in contacts.constraints_mut() {
                c.project(positions, inv_masses, dt, self.mode);
            }
        }
    }

    /// One Gauss-Seidel sweep over the structural constraints.
    fn sweep(&self, container: &mut ConstraintContainer, state: &mut ParticleState, dt: Real) {
        let mode = self.mode;
        let (positions, inv_masses) = state.project_split();

        if !container.is_partitioned() {
            for c in container.constraints_mut() {
                c.project(positions, inv_masses, dt, mode);
            }
            return;
        }

        let (groups, remainder, constraints) = container.split_mut();

        for group in groups {
            // Constraints in a group touch disjoint particles, so their
            // corrections can be computed against a positions snapshot
            // and applied afterwards without ordering effects.
            let mut local: Vec<(usize, Constraint)> =
                group.iter().map(|&ci| (ci, constraints[ci])).collect();

            let corrections: Vec<Option<Correction>> = {
                let snapshot: &[_] = positions;
                local
                    .par_iter_mut()
                    .map(|(_, c)| c.compute_correction(snapshot, inv_masses, dt, mode))
                    .collect()
            };

            for ((ci, c), correction) in local.into_iter().zip(corrections) {
                constraints[ci] = c;
                if let Some(correction) = correction {
                    for (idx, delta) in correction.iter() {
                        positions[idx as usize] += delta;
                    }
                }
            }
        }

        for &ci in remainder {
            constraints[ci].project(positions, inv_masses, dt, mode);
        }
    }
}
