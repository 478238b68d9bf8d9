//! The deformable model: geometry + state + constraints + stepping.
//!
//! A [`PbdModel`] owns everything one deformable object needs to
//! advance in time. The step sequence is fixed:
//!
//! 1. predict positions from velocities and gravity
//! 2. wrap this step's contacts into constraints
//! 3. project constraints for the configured iteration count
//! 4. recover velocities from the position change
//! 5. damp velocities and discard the contacts
//!
//! Configuration updates are validated; an invalid config is rejected
//! and the last valid one stays in effect.

use pliant_constraint::{
    generate_constraints, Constraint, ConstraintContainer, ContactPoint, ContactWitness,
};
use pliant_mesh::{Mesh, Topology};
use pliant_types::{PliantError, PliantResult};
use tracing::{debug, warn};

use crate::config::PbdConfig;
use crate::solver::PbdSolver;
use crate::state::ParticleState;

/// A position-based-dynamics deformable body.
#[derive(Debug, Default)]
pub struct PbdModel {
    config: PbdConfig,
    mesh: Option<Mesh>,
    topology: Option<Topology>,
    state: Option<ParticleState>,
    structural: ConstraintContainer,
    contacts: ConstraintContainer,
    pending_contacts: Vec<ContactPoint>,
    initialized: bool,
}

impl PbdModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the configuration.
    ///
    /// An invalid config is rejected with a warning and the previous
    /// one stays in effect; the error is also returned to the caller.
    pub fn configure(&mut self, config: PbdConfig) -> PliantResult<()> {
        if let Err(e) = config.validate() {
            warn!(error = %e, "rejected invalid configuration, keeping previous");
            return Err(e);
        }
        self.config = config;
        Ok(())
    }

    pub fn config(&self) -> &PbdConfig {
        &self.config
    }

    /// Set the geometry to simulate. Invalidates any prior initialization.
    pub fn set_geometry(&mut self, mesh: Mesh) {
        self.mesh = Some(mesh);
        self.topology = None;
        self.state = None;
        self.structural.clear();
        self.initialized = false;
    }

    /// Build topology, particle state, and the structural constraint
    /// set from the current geometry and configuration.
    pub fn initialize(&mut self) -> PliantResult<()> {
        let mesh = self.mesh.as_ref().ok_or_else(|| {
            PliantError::NotInitialized("no geometry set before initialize".into())
        })?;
        mesh.validate()?;
        self.config.validate()?;

        let topology = Topology::build(mesh);
        self.state = Some(ParticleState::from_mesh(
            mesh,
            self.config.uniform_mass,
            &self.config.fixed_nodes,
        )?);

        self.structural.clear();
        generate_constraints(mesh, &topology, &self.config.constraints, &mut self.structural);
        if self.config.do_partitioning {
            self.structural
                .partition_constraints(self.config.min_partition_size, mesh.vertex_count());
        }

        debug!(
            particles = mesh.vertex_count(),
            constraints = self.structural.len(),
            "initialized deformable model"
        );
        self.topology = Some(topology);
        self.initialized = true;
        Ok(())
    }

    pub fn state(&self) -> Option<&ParticleState> {
        self.state.as_ref()
    }

    pub fn state_mut(&mut self) -> Option<&mut ParticleState> {
        self.state.as_mut()
    }

    pub fn constraints(&self) -> &ConstraintContainer {
        &self.structural
    }

    /// Add a constraint at runtime (stitching, user forces).
    pub fn add_constraint(&mut self, constraint: Constraint) {
        self.structural.add_constraint(constraint);
    }

    /// Remove constraints matching the predicate (cutting, stitch removal).
    pub fn erase_constraints(&mut self, predicate: impl FnMut(&Constraint) -> bool) {
        self.structural.erase_constraints(predicate);
    }

    /// Hand the model this step's detected contacts. Consumed by the
    /// next [`step`](Self::step); never persisted.
    pub fn set_contacts(&mut self, contacts: Vec<ContactPoint>) {
        self.pending_contacts = contacts;
    }

    /// Predict phase: integrate external acceleration, wrap this
    /// step's contacts, and make sure a valid partition exists.
    pub fn predict(&mut self) -> PliantResult<()> {
        if !self.initialized {
            return Err(PliantError::NotInitialized(
                "step called before initialize".into(),
            ));
        }
        let Some(state) = self.state.as_mut() else {
            return Err(PliantError::NotInitialized("particle state missing".into()));
        };
        state.predict(self.config.dt, self.config.gravity);

        // Wrap contacts: static witnesses become per-step fixed anchors.
        self.contacts.clear();
        state.clear_virtual_particles();
        for contact in self.pending_contacts.drain(..) {
            let witness = match contact.witness {
                ContactWitness::Particle(id) => id.0,
                ContactWitness::StaticPoint(p) => state.add_virtual_particle(p),
            };
            self.contacts.add_constraint(Constraint::contact(
                contact.particle.0,
                witness,
                contact.normal,
                contact.compliance,
            ));
        }

        // Runtime constraint edits invalidate the partition; rebuild it.
        if self.config.do_partitioning && !self.structural.is_partitioned() {
            self.structural
                .partition_constraints(self.config.min_partition_size, state.base_count());
        }
        Ok(())
    }

    /// Solve phase: project all constraints for the configured
    /// iteration count.
    pub fn solve(&mut self) -> PliantResult<()> {
        let dt = self.config.dt;
        let solver = PbdSolver::new(self.config.iterations, self.config.mode);
        let state = self.state.as_mut().ok_or_else(|| {
            PliantError::NotInitialized("solve called before initialize".into())
        })?;
        solver.solve(&mut self.structural, &mut self.contacts, state, dt);
        Ok(())
    }

    /// Velocity phase: recover velocities from the projected positions,
    /// damp them, and discard this step's contact anchors.
    pub fn update_velocity(&mut self) -> PliantResult<()> {
        let damping = self.config.damping;
        let dt = self.config.dt;
        let state = self.require_state()?;
        state.update_velocities(dt);
        state.damp_velocities(damping);
        state.clear_virtual_particles();
        Ok(())
    }

    /// Advance the simulation by one timestep: predict, solve, update.
    pub fn step(&mut self) -> PliantResult<()> {
        self.predict()?;
        self.solve()?;
        self.update_velocity()
    }

    fn require_state(&mut self) -> PliantResult<&mut ParticleState> {
        if !self.initialized {
            return Err(PliantError::NotInitialized(
                "step called before initialize".into(),
            ));
        }
        self.state.as_mut().ok_or_else(|| {
            PliantError::NotInitialized("particle state missing".into())
        })
    }
}
