//! Integration tests for pliant-mesh.

use pliant_math::Vec3;
use pliant_mesh::generators::{line_strip, quad_grid, tet_block};
use pliant_mesh::{Mesh, Topology};

// ─── Mesh Tests ───────────────────────────────────────────────

#[test]
fn validate_rejects_empty_mesh() {
    let mesh = Mesh::default();
    assert!(mesh.validate().is_err());
}

#[test]
fn validate_rejects_out_of_range_indices() {
    let mesh = Mesh::surface(vec![Vec3::ZERO, Vec3::X], vec![[0, 1, 2]]);
    assert!(mesh.validate().is_err());
}

#[test]
fn validate_accepts_well_formed_mesh() {
    let mesh = quad_grid(3, 3, 1.0, 1.0);
    assert!(mesh.validate().is_ok());
    assert!(mesh.has_elements());
}

// ─── Generator Tests ──────────────────────────────────────────

#[test]
fn quad_grid_counts() {
    let mesh = quad_grid(4, 3, 2.0, 1.5);
    assert_eq!(mesh.vertex_count(), 5 * 4);
    assert_eq!(mesh.triangles.len(), 4 * 3 * 2);
}

#[test]
fn tet_block_has_positive_volumes() {
    let mesh = tet_block(2, 2, 2, Vec3::new(1.0, 1.0, 1.0));
    assert_eq!(mesh.vertex_count(), 27);
    assert_eq!(mesh.tetrahedra.len(), 2 * 2 * 2 * 5);

    let mut total = 0.0;
    for &[a, b, c, d] in &mesh.tetrahedra {
        let v = pliant_math::tet::tet_volume(
            mesh.vertices[a as usize],
            mesh.vertices[b as usize],
            mesh.vertices[c as usize],
            mesh.vertices[d as usize],
        );
        assert!(v > 0.0, "tet has non-positive volume {v}");
        total += v;
    }
    // Five tets tile each unit cell exactly
    assert!((total - 1.0).abs() < 1e-12);
}

#[test]
fn line_strip_connectivity() {
    let mesh = line_strip(5, 1.0);
    assert_eq!(mesh.vertex_count(), 6);
    assert_eq!(mesh.lines.len(), 5);
    assert!((mesh.vertices[5].x - 1.0).abs() < 1e-15);
}

// ─── Topology Tests ───────────────────────────────────────────

#[test]
fn grid_edge_count() {
    // 2x2 quad grid: horizontal 2*3 + vertical 2*3 + diagonal 4 = 16 edges
    let mesh = quad_grid(2, 2, 1.0, 1.0);
    let topo = Topology::build(&mesh);
    assert_eq!(topo.edges.len(), 16);
}

#[test]
fn grid_interior_edges_have_two_wings() {
    let mesh = quad_grid(2, 2, 1.0, 1.0);
    let topo = Topology::build(&mesh);
    // Interior edges: each of the 4 quad diagonals plus shared quad borders.
    assert!(!topo.interior_edges.is_empty());
    for ie in &topo.interior_edges {
        assert_ne!(ie.wing_a, ie.wing_b);
        assert_ne!(ie.v0, ie.v1);
    }
}

#[test]
fn tet_edges_are_unique() {
    let mesh = tet_block(1, 1, 1, Vec3::ONE);
    let topo = Topology::build(&mesh);
    for w in topo.edges.windows(2) {
        assert_ne!(w[0], w[1], "duplicate edge in topology");
    }
}
