//! Mesh topology queries.
//!
//! Builds adjacency data from the element buffers, feeding constraint
//! generation:
//! - Unique edges (from lines, triangles, and tetrahedra) → distance constraints
//! - Interior edges with wing vertices → dihedral constraints

use std::collections::HashMap;

use crate::mesh::Mesh;

/// An interior (non-boundary) surface edge with its two adjacent triangles.
///
/// Used for dihedral constraint generation: the angle between the two
/// triangles across this edge defines the bending energy.
#[derive(Debug, Clone, Copy)]
pub struct InteriorEdge {
    /// Index of vertex A of the shared edge.
    pub v0: u32,
    /// Index of vertex B of the shared edge.
    pub v1: u32,
    /// The "wing" vertex of triangle A (not on the edge).
    pub wing_a: u32,
    /// The "wing" vertex of triangle B (not on the edge).
    pub wing_b: u32,
}

/// Precomputed topology information for a mesh.
///
/// Built once when a mesh is bound to a model, and rebuilt after any
/// topology change (cutting, stitching).
#[derive(Debug, Clone, Default)]
pub struct Topology {
    /// Unique edges as `(v_min, v_max)` pairs, across all element types.
    pub edges: Vec<[u32; 2]>,
    /// Interior surface edges with exactly two adjacent triangles.
    pub interior_edges: Vec<InteriorEdge>,
}

impl Topology {
    /// Build topology from a mesh.
    pub fn build(mesh: &Mesh) -> Self {
        let mut edge_set: HashMap<(u32, u32), ()> = HashMap::new();
        let mut push_edge = |edge_set: &mut HashMap<(u32, u32), ()>, a: u32, b: u32| {
            let key = if a < b { (a, b) } else { (b, a) };
            edge_set.entry(key).or_insert(());
        };

        for &[a, b] in &mesh.lines {
            push_edge(&mut edge_set, a, b);
        }
        for &[a, b, c] in &mesh.triangles {
            push_edge(&mut edge_set, a, b);
            push_edge(&mut edge_set, b, c);
            push_edge(&mut edge_set, c, a);
        }
        for &[a, b, c, d] in &mesh.tetrahedra {
            push_edge(&mut edge_set, a, b);
            push_edge(&mut edge_set, a, c);
            push_edge(&mut edge_set, a, d);
            push_edge(&mut edge_set, b, c);
            push_edge(&mut edge_set, b, d);
            push_edge(&mut edge_set, c, d);
        }

        let mut edges: Vec<[u32; 2]> = edge_set.keys().map(|&(a, b)| [a, b]).collect();
        edges.sort_unstable();

        Self {
            edges,
            interior_edges: Self::find_interior_edges(mesh),
        }
    }

    /// Surface edges shared by exactly two triangles, with their wings.
    fn find_interior_edges(mesh: &Mesh) -> Vec<InteriorEdge> {
        // Key: (min_vertex, max_vertex) to canonicalize edge direction.
        // Value: the wing vertex of each adjacent triangle.
        let mut edge_wings: HashMap<(u32, u32), Vec<u32>> = HashMap::new();

        for &[a, b, c] in &mesh.triangles {
            let tri_edges = [(a, b, c), (b, c, a), (c, a, b)];
            for (v0, v1, wing) in tri_edges {
                let key = if v0 < v1 { (v0, v1) } else { (v1, v0) };
                edge_wings.entry(key).or_default().push(wing);
            }
        }

        let mut interior: Vec<InteriorEdge> = edge_wings
            .into_iter()
            .filter(|(_, wings)| wings.len() == 2)
            .map(|((v0, v1), wings)| InteriorEdge {
                v0,
                v1,
                wing_a: wings[0],
                wing_b: wings[1],
            })
            .collect();
        // Deterministic order regardless of hash iteration
        interior.sort_unstable_by_key(|e| (e.v0, e.v1));
        interior
    }
}
