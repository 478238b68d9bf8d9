//! Procedural mesh generators for benchmarks and testing.
//!
//! These generators produce deterministic, resolution-configurable meshes
//! with consistent winding order.

use pliant_math::Vec3;
use pliant_types::Real;

use crate::mesh::Mesh;

/// Generates a flat rectangular quad grid in the XZ plane at Y=0.
///
/// The grid spans `[-width/2, width/2]` in X and `[-depth/2, depth/2]` in Z.
///
/// # Arguments
/// - `cols` — Number of quads along X (vertex count = cols + 1).
/// - `rows` — Number of quads along Z (vertex count = rows + 1).
/// - `width` — Total width in meters.
/// - `depth` — Total depth in meters.
///
/// # Example
/// ```
/// use pliant_mesh::generators::quad_grid;
/// let mesh = quad_grid(2, 2, 1.0, 1.0);
/// assert_eq!(mesh.vertex_count(), 9);      // 3×3 vertices
/// assert_eq!(mesh.triangles.len(), 8);     // 2×2 quads × 2 tris each
/// ```
pub fn quad_grid(cols: usize, rows: usize, width: Real, depth: Real) -> Mesh {
    let verts_x = cols + 1;
    let verts_z = rows + 1;

    let mut vertices = Vec::with_capacity(verts_x * verts_z);
    let half_w = width / 2.0;
    let half_d = depth / 2.0;

    for j in 0..verts_z {
        for i in 0..verts_x {
            let u = i as Real / cols as Real;
            let v = j as Real / rows as Real;
            vertices.push(Vec3::new(-half_w + u * width, 0.0, -half_d + v * depth));
        }
    }

    let mut triangles = Vec::with_capacity(cols * rows * 2);
    for j in 0..rows {
        for i in 0..cols {
            let i0 = (j * verts_x + i) as u32;
            let i1 = i0 + 1;
            let i2 = i0 + verts_x as u32;
            let i3 = i2 + 1;
            triangles.push([i0, i2, i1]);
            triangles.push([i1, i2, i3]);
        }
    }

    Mesh::surface(vertices, triangles)
}

/// Generates an axis-aligned block of tetrahedra.
///
/// The block spans `[0, dims]` with `(nx, ny, nz)` cells; each cell is
/// split into five tetrahedra with alternating parity so faces of
/// neighboring cells match.
pub fn tet_block(nx: usize, ny: usize, nz: usize, dims: Vec3) -> Mesh {
    let vx = nx + 1;
    let vy = ny + 1;
    let vz = nz + 1;

    let mut vertices = Vec::with_capacity(vx * vy * vz);
    for k in 0..vz {
        for j in 0..vy {
            for i in 0..vx {
                vertices.push(Vec3::new(
                    dims.x * i as Real / nx as Real,
                    dims.y * j as Real / ny as Real,
                    dims.z * k as Real / nz as Real,
                ));
            }
        }
    }

    let vid = |i: usize, j: usize, k: usize| (k * vy * vx + j * vx + i) as u32;

    let mut tetrahedra = Vec::with_capacity(nx * ny * nz * 5);
    for k in 0..nz {
        for j in 0..ny {
            for i in 0..nx {
                // Cube corners
                let c = [
                    vid(i, j, k),
                    vid(i + 1, j, k),
                    vid(i + 1, j + 1, k),
                    vid(i, j + 1, k),
                    vid(i, j, k + 1),
                    vid(i + 1, j, k + 1),
                    vid(i + 1, j + 1, k + 1),
                    vid(i, j + 1, k + 1),
                ];
                // Alternate the five-tet split so shared faces agree
                if (i + j + k) % 2 == 0 {
                    tetrahedra.push([c[0], c[1], c[2], c[5]]);
                    tetrahedra.push([c[0], c[2], c[7], c[5]]);
                    tetrahedra.push([c[0], c[2], c[3], c[7]]);
                    tetrahedra.push([c[0], c[5], c[7], c[4]]);
                    tetrahedra.push([c[2], c[7], c[5], c[6]]);
                } else {
                    tetrahedra.push([c[0], c[1], c[3], c[4]]);
                    tetrahedra.push([c[2], c[3], c[1], c[6]]);
                    tetrahedra.push([c[5], c[6], c[1], c[4]]);
                    tetrahedra.push([c[7], c[6], c[4], c[3]]);
                    tetrahedra.push([c[1], c[6], c[3], c[4]]);
                }
            }
        }
    }

    Mesh::volumetric(vertices, tetrahedra)
}

/// Generates a straight line strip along +X starting at the origin.
pub fn line_strip(segments: usize, length: Real) -> Mesh {
    let mut vertices = Vec::with_capacity(segments + 1);
    for i in 0..=segments {
        vertices.push(Vec3::new(length * i as Real / segments as Real, 0.0, 0.0));
    }
    let lines = (0..segments as u32).map(|i| [i, i + 1]).collect();
    Mesh {
        vertices,
        lines,
        ..Default::default()
    }
}
