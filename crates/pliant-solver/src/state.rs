//! Per-particle simulation state.
//!
//! Positions, previous positions, velocities, and masses for every
//! particle of a deformable model. Separate from the mesh topology,
//! which is immutable after initialization.
//!
//! The tail of the arrays can hold *virtual* particles: fixed points
//! created for the duration of one step to anchor contact constraints
//! against static geometry. They are cleared before the next step.

use pliant_math::Vec3;
use pliant_mesh::Mesh;
use pliant_types::{PliantError, PliantResult, Real};

/// Mutable per-particle buffers for the PBD loop.
#[derive(Debug, Clone)]
pub struct ParticleState {
    positions: Vec<Vec3>,
    prev_positions: Vec<Vec3>,
    velocities: Vec<Vec3>,
    masses: Vec<Real>,
    inv_masses: Vec<Real>,
    /// Particles `[base_count..]` are per-step virtual anchors.
    base_count: usize,
}

impl ParticleState {
    /// Build state from a mesh, assigning `uniform_mass` to every vertex
    /// and pinning the listed nodes.
    pub fn from_mesh(mesh: &Mesh, uniform_mass: Real, fixed_nodes: &[u32]) -> PliantResult<Self> {
        let n = mesh.vertex_count();
        let mut inv_masses = vec![1.0 / uniform_mass; n];
        for &id in fixed_nodes {
            let idx = id as usize;
            if idx >= n {
                return Err(PliantError::InvalidConfig(format!(
                    "fixed node {id} out of range ({n} particles)"
                )));
            }
            inv_masses[idx] = 0.0;
        }
        Ok(Self {
            positions: mesh.vertices.clone(),
            prev_positions: mesh.vertices.clone(),
            velocities: vec![Vec3::ZERO; n],
            masses: vec![uniform_mass; n],
            inv_masses,
            base_count: n,
        })
    }

    /// Number of particles, including live virtual anchors.
    pub fn particle_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of real (mesh) particles.
    pub fn base_count(&self) -> usize {
        self.base_count
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn positions_mut(&mut self) -> &mut [Vec3] {
        &mut self.positions
    }

    pub fn velocities(&self) -> &[Vec3] {
        &self.velocities
    }

    pub fn velocities_mut(&mut self) -> &mut [Vec3] {
        &mut self.velocities
    }

    pub fn inv_masses(&self) -> &[Real] {
        &self.inv_masses
    }

    /// Split borrow for constraint projection.
    pub fn project_split(&mut self) -> (&mut [Vec3], &[Real]) {
        (&mut self.positions, &self.inv_masses)
    }

    /// Pin a particle in place.
    pub fn fix_particle(&mut self, index: u32) {
        self.inv_masses[index as usize] = 0.0;
        self.velocities[index as usize] = Vec3::ZERO;
    }

    /// Append a fixed anchor particle for this step. Returns its index.
    pub fn add_virtual_particle(&mut self, position: Vec3) -> u32 {
        let idx = self.positions.len() as u32;
        self.positions.push(position);
        self.prev_positions.push(position);
        self.velocities.push(Vec3::ZERO);
        self.masses.push(Real::INFINITY);
        self.inv_masses.push(0.0);
        idx
    }

    /// Drop all virtual anchors, keeping only the mesh particles.
    pub fn clear_virtual_particles(&mut self) {
        self.positions.truncate(self.base_count);
        self.prev_positions.truncate(self.base_count);
        self.velocities.truncate(self.base_count);
        self.masses.truncate(self.base_count);
        self.inv_masses.truncate(self.base_count);
    }

    /// Explicit integration of external acceleration, then position
    /// prediction: `v += dt·g; x_prev = x; x += dt·v`.
    ///
    /// Fixed particles do not move.
    pub fn predict(&mut self, dt: Real, gravity: Vec3) {
        for i in 0..self.positions.len() {
            self.prev_positions[i] = self.positions[i];
            if self.inv_masses[i] > 0.0 {
                self.velocities[i] += dt * gravity;
                self.positions[i] += dt * self.velocities[i];
            }
        }
    }

    /// Recover velocities from the projected positions:
    /// `v = (x − x_prev) / dt`.
    pub fn update_velocities(&mut self, dt: Real) {
        let inv_dt = 1.0 / dt;
        for i in 0..self.positions.len() {
            if self.inv_masses[i] > 0.0 {
                self.velocities[i] = (self.positions[i] - self.prev_positions[i]) * inv_dt;
            }
        }
    }

    /// Apply viscous damping: `v *= (1 − damping)`.
    pub fn damp_velocities(&mut self, damping: Real) {
        let factor = 1.0 - damping;
        for (v, &w) in self.velocities.iter_mut().zip(&self.inv_masses) {
            if w > 0.0 {
                *v *= factor;
            }
        }
    }

    /// Total kinetic energy of the movable particles.
    pub fn kinetic_energy(&self) -> Real {
        let mut energy = 0.0;
        for i in 0..self.base_count {
            if self.inv_masses[i] > 0.0 {
                energy += 0.5 * self.masses[i] * self.velocities[i].length_squared();
            }
        }
        energy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pliant_mesh::generators::line_strip;

    #[test]
    fn fixed_particles_ignore_prediction() {
        let mesh = line_strip(2, 1.0);
        let mut state = ParticleState::from_mesh(&mesh, 1.0, &[0]).unwrap();
        let before = state.positions()[0];
        state.predict(0.1, Vec3::new(0.0, -9.81, 0.0));
        assert_eq!(state.positions()[0], before);
        assert!(state.positions()[1].y < 0.0);
    }

    #[test]
    fn virtual_particles_are_cleared() {
        let mesh = line_strip(2, 1.0);
        let mut state = ParticleState::from_mesh(&mesh, 1.0, &[]).unwrap();
        let idx = state.add_virtual_particle(Vec3::Y);
        assert_eq!(idx, 3);
        assert_eq!(state.inv_masses()[idx as usize], 0.0);
        state.clear_virtual_particles();
        assert_eq!(state.particle_count(), 3);
    }

    #[test]
    fn fixed_node_out_of_range_is_rejected() {
        let mesh = line_strip(2, 1.0);
        assert!(ParticleState::from_mesh(&mesh, 1.0, &[99]).is_err());
    }

    #[test]
    fn velocity_round_trip_through_prediction() {
        let mesh = line_strip(1, 1.0);
        let mut state = ParticleState::from_mesh(&mesh, 1.0, &[]).unwrap();
        let dt = 0.01;
        state.predict(dt, Vec3::ZERO);
        state.update_velocities(dt);
        // No forces, no projection: velocities stay zero.
        for v in state.velocities() {
            assert!(v.length() < 1e-12);
        }
    }
}
