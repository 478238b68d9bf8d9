//! Constraint container with graph-coloring partitioning.
//!
//! The partition groups constraints so that no two constraints in a
//! group share a particle, allowing race-free parallel projection
//! within a group. Groups are solved one after another (Gauss-Seidel
//! across groups, Jacobi within).
//!
//! Uses greedy first-fit graph coloring with multi-word bitmasks for
//! O(1) color lookup. The conflict graph has an edge between two
//! constraints whenever they reference a common particle.

use tracing::debug;

use crate::constraint::Constraint;

/// The live constraint set plus its partition.
///
/// Partitions are invalidated by any mutation and must be recomputed
/// via [`partition_constraints`](Self::partition_constraints) before
/// the next parallel solve; topology changes (cutting, stitching) do
/// exactly that.
#[derive(Debug, Default)]
pub struct ConstraintContainer {
    constraints: Vec<Constraint>,
    /// Disjoint index groups; no two constraints in a group share a particle.
    partitions: Vec<Vec<usize>>,
    /// Leftover constraints from partitions below the size threshold,
    /// solved sequentially. When partitioning is disabled this holds
    /// every constraint.
    remainder: Vec<usize>,
    partitioned: bool,
}

impl ConstraintContainer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a constraint. Invalidates the current partition.
    pub fn add_constraint(&mut self, constraint: Constraint) {
        self.constraints.push(constraint);
        self.clear_partitions();
    }

    /// Remove all constraints matching the predicate (used by cutting and
    /// stitch removal). Invalidates the current partition.
    pub fn erase_constraints(&mut self, mut predicate: impl FnMut(&Constraint) -> bool) {
        self.constraints.retain(|c| !predicate(c));
        self.clear_partitions();
    }

    /// Remove everything. Contact containers are cleared every step.
    pub fn clear(&mut self) {
        self.constraints.clear();
        self.clear_partitions();
    }

    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn constraints_mut(&mut self) -> &mut [Constraint] {
        &mut self.constraints
    }

    /// The current partition groups (empty unless partitioned).
    pub fn partitions(&self) -> &[Vec<usize>] {
        &self.partitions
    }

    /// Indices solved sequentially after the partitioned groups.
    pub fn remainder(&self) -> &[usize] {
        &self.remainder
    }

    /// True if a valid partition is available.
    pub fn is_partitioned(&self) -> bool {
        self.partitioned
    }

    /// Split borrow for the solver loop: partition groups, sequential
    /// remainder, and mutable access to the constraints they index.
    pub fn split_mut(&mut self) -> (&[Vec<usize>], &[usize], &mut [Constraint]) {
        (&self.partitions, &self.remainder, &mut self.constraints)
    }

    /// Drop the partition; everything solves sequentially.
    pub fn clear_partitions(&mut self) {
        self.partitions.clear();
        self.remainder.clear();
        self.partitioned = false;
    }

    /// Partition the constraints by greedy graph coloring.
    ///
    /// Colors whose group ends up smaller than `min_partition_size` are
    /// merged into the sequential remainder — tiny groups cost more in
    /// scheduling than they gain in parallelism.
    pub fn partition_constraints(&mut self, min_partition_size: usize, particle_count: usize) {
        self.clear_partitions();
        let n = self.constraints.len();
        if n == 0 {
            self.partitioned = true;
            return;
        }

        // particle → constraints touching it
        let mut particle_to_constraints: Vec<Vec<usize>> = vec![Vec::new(); particle_count];
        for (ci, c) in self.constraints.iter().enumerate() {
            for pid in c.particles() {
                particle_to_constraints[pid.index()].push(ci);
            }
        }

        // Conflict adjacency: constraints sharing any particle
        let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); n];
        for touching in &particle_to_constraints {
            for i in 0..touching.len() {
                for j in (i + 1)..touching.len() {
                    adjacency[touching[i]].push(touching[j]);
                    adjacency[touching[j]].push(touching[i]);
                }
            }
        }

        // Greedy first-fit coloring with a multi-word bitmask
        let mut colors: Vec<usize> = vec![usize::MAX; n];
        let mut max_color = 0;
        let mut used_mask: Vec<u64> = Vec::new();
        for ci in 0..n {
            used_mask.clear();
            used_mask.resize(max_color / 64 + 1, 0);
            for &neighbor in &adjacency[ci] {
                let c = colors[neighbor];
                if c != usize::MAX {
                    if c / 64 >= used_mask.len() {
                        used_mask.resize(c / 64 + 1, 0);
                    }
                    used_mask[c / 64] |= 1u64 << (c % 64);
                }
            }
            // First zero bit across the words
            let mut color = used_mask.len() * 64;
            for (w, &mask) in used_mask.iter().enumerate() {
                if mask != u64::MAX {
                    color = w * 64 + (!mask).trailing_zeros() as usize;
                    break;
                }
            }
            colors[ci] = color;
            max_color = max_color.max(color);
        }

        // Group by color
        let mut groups: Vec<Vec<usize>> = vec![Vec::new(); max_color + 1];
        for (ci, &color) in colors.iter().enumerate() {
            groups[color].push(ci);
        }

        // Small groups go to the sequential remainder
        for group in groups {
            if group.len() < min_partition_size {
                self.remainder.extend(group);
            } else {
                self.partitions.push(group);
            }
        }
        self.remainder.sort_unstable();

        debug!(
            constraints = n,
            partitions = self.partitions.len(),
            remainder = self.remainder.len(),
            "partitioned constraint set"
        );
        self.partitioned = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pliant_math::Vec3;

    fn chain(n: usize) -> (Vec<Vec3>, ConstraintContainer) {
        let rest: Vec<Vec3> = (0..n).map(|i| Vec3::new(i as f64, 0.0, 0.0)).collect();
        let mut container = ConstraintContainer::new();
        for i in 0..n as u32 - 1 {
            container.add_constraint(Constraint::distance(&rest, i, i + 1, 1.0, 0.0));
        }
        (rest, container)
    }

    #[test]
    fn chain_partitions_into_two_groups() {
        let (rest, mut container) = chain(11);
        container.partition_constraints(1, rest.len());
        // A path graph is 2-colorable: alternating constraints
        assert_eq!(container.partitions().len(), 2);
        assert!(container.remainder().is_empty());
    }

    #[test]
    fn partitions_never_share_a_particle() {
        let (rest, mut container) = chain(20);
        container.partition_constraints(1, rest.len());
        for group in container.partitions() {
            let mut seen = std::collections::HashSet::new();
            for &ci in group {
                for pid in container.constraints()[ci].particles() {
                    assert!(seen.insert(pid.index()), "partition shares particle");
                }
            }
        }
    }

    #[test]
    fn small_groups_fall_back_to_remainder() {
        let (rest, mut container) = chain(4);
        container.partition_constraints(10, rest.len());
        assert!(container.partitions().is_empty());
        assert_eq!(container.remainder().len(), 3);
    }

    #[test]
    fn mutation_invalidates_partition() {
        let (rest, mut container) = chain(5);
        container.partition_constraints(1, rest.len());
        assert!(container.is_partitioned());
        container.add_constraint(Constraint::distance(&rest, 0, 2, 1.0, 0.0));
        assert!(!container.is_partitioned());
    }
}
