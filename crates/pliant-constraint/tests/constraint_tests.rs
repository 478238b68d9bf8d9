//! Integration tests for constraint generation, projection, and partitioning.

use pliant_constraint::{
    generate_constraints, Constraint, ConstraintConfig, ConstraintContainer, FemConfig,
    FemMaterial, ProjectionMode,
};
use pliant_math::Vec3;
use pliant_mesh::generators::{quad_grid, tet_block};
use pliant_mesh::Topology;
use pliant_types::Real;

const DT: Real = 1.0 / 60.0;

fn cloth_config() -> ConstraintConfig {
    ConstraintConfig {
        distance_stiffness: Some(1.0),
        area_stiffness: Some(1.0),
        dihedral_stiffness: Some(0.5),
        ..Default::default()
    }
}

fn volumetric_config() -> ConstraintConfig {
    ConstraintConfig {
        volume_stiffness: Some(1.0),
        fem: Some(FemConfig {
            youngs_modulus: 1000.0,
            poisson_ratio: 0.3,
            material: FemMaterial::StVk,
        }),
        ..Default::default()
    }
}

// ─── Rest-State Residuals ────────────────────────────────────────────────────

#[test]
fn generated_cloth_constraints_are_satisfied_at_rest() {
    let mesh = quad_grid(4, 4, 1.0, 1.0);
    let topo = Topology::build(&mesh);
    let mut container = ConstraintContainer::new();
    generate_constraints(&mesh, &topo, &cloth_config(), &mut container);
    assert!(!container.is_empty());

    for constraint in container.constraints() {
        let (c, _) = constraint
            .compute_value_and_gradient(&mesh.vertices)
            .expect("rest configuration must not be degenerate");
        assert!(c.abs() < 1e-9, "rest residual {c} for {:?}", constraint.kind());
    }
}

#[test]
fn generated_volumetric_constraints_are_satisfied_at_rest() {
    let mesh = tet_block(2, 2, 2, Vec3::ONE);
    let topo = Topology::build(&mesh);
    let mut container = ConstraintContainer::new();
    generate_constraints(&mesh, &topo, &volumetric_config(), &mut container);
    assert_eq!(container.len(), mesh.tetrahedra.len() * 2);

    for constraint in container.constraints() {
        let (c, _) = constraint
            .compute_value_and_gradient(&mesh.vertices)
            .expect("rest configuration must not be degenerate");
        assert!(c.abs() < 1e-9, "rest residual {c} for {:?}", constraint.kind());
    }
}

// ─── Projection ──────────────────────────────────────────────────────────────

#[test]
fn rigid_distance_projection_converges_to_rest_length() {
    let rest = [Vec3::ZERO, Vec3::X];
    let mut constraint = Constraint::distance(&rest, 0, 1, 1.0, 0.0);

    let mut positions = vec![Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0)];
    let inv_masses = vec![0.0, 1.0];
    constraint.reset_lambda();
    for _ in 0..10 {
        constraint.project(&mut positions, &inv_masses, DT, ProjectionMode::Xpbd);
    }
    assert!((positions[1] - Vec3::X).length() < 1e-9);
    assert_eq!(positions[0], Vec3::ZERO);
}

#[test]
fn legacy_stiffness_scales_the_per_pass_correction() {
    let rest = [Vec3::ZERO, Vec3::X];
    let mut constraint = Constraint::distance(&rest, 0, 1, 0.5, 0.0);

    let mut positions = vec![Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0)];
    let inv_masses = vec![0.0, 1.0];
    constraint.project(&mut positions, &inv_masses, DT, ProjectionMode::LegacyStiffness);
    // Half of the full correction: 2.0 → 1.5
    assert!((positions[1].x - 1.5).abs() < 1e-12);
}

#[test]
fn compliant_projection_moves_less_than_rigid() {
    let rest = [Vec3::ZERO, Vec3::X];
    let mut rigid = Constraint::distance(&rest, 0, 1, 1.0, 0.0);
    let mut soft = Constraint::distance(&rest, 0, 1, 1.0, 1.0e-2);

    let inv_masses = vec![0.0, 1.0];
    let mut pos_rigid = vec![Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0)];
    let mut pos_soft = pos_rigid.clone();

    rigid.project(&mut pos_rigid, &inv_masses, DT, ProjectionMode::Xpbd);
    soft.project(&mut pos_soft, &inv_masses, DT, ProjectionMode::Xpbd);

    let rigid_move = (Vec3::new(2.0, 0.0, 0.0) - pos_rigid[1]).length();
    let soft_move = (Vec3::new(2.0, 0.0, 0.0) - pos_soft[1]).length();
    assert!(soft_move < rigid_move);
    assert!(soft_move > 0.0);
}

#[test]
fn all_fixed_constraint_is_a_no_op() {
    let rest = [Vec3::ZERO, Vec3::X];
    let mut constraint = Constraint::distance(&rest, 0, 1, 1.0, 0.0);

    let mut positions = vec![Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0)];
    let before = positions.clone();
    let inv_masses = vec![0.0, 0.0];
    constraint.project(&mut positions, &inv_masses, DT, ProjectionMode::Xpbd);
    assert_eq!(positions, before);
}

#[test]
fn degenerate_configuration_produces_no_nan() {
    let rest = [Vec3::ZERO, Vec3::X];
    let mut constraint = Constraint::distance(&rest, 0, 1, 1.0, 0.0);

    // Coincident points: gradient undefined, projection must skip.
    let mut positions = vec![Vec3::ZERO, Vec3::ZERO];
    let inv_masses = vec![1.0, 1.0];
    constraint.project(&mut positions, &inv_masses, DT, ProjectionMode::Xpbd);
    for p in &positions {
        assert!(p.is_finite());
        assert_eq!(*p, Vec3::ZERO);
    }
}

// ─── Contact ─────────────────────────────────────────────────────────────────

#[test]
fn separated_contact_produces_no_correction() {
    let mut contact = Constraint::contact(0, 1, Vec3::Y, 0.0);
    let positions = vec![Vec3::new(0.0, 0.5, 0.0), Vec3::ZERO];
    let inv_masses = vec![1.0, 0.0];
    assert!(contact
        .compute_correction(&positions, &inv_masses, DT, ProjectionMode::Xpbd)
        .is_none());
}

#[test]
fn penetrating_contact_pushes_out_along_the_normal() {
    let mut contact = Constraint::contact(0, 1, Vec3::Y, 0.0);
    let mut positions = vec![Vec3::new(0.3, -0.2, 0.0), Vec3::ZERO];
    let inv_masses = vec![1.0, 0.0];
    contact.reset_lambda();
    for _ in 0..4 {
        contact.project(&mut positions, &inv_masses, DT, ProjectionMode::Xpbd);
    }
    assert!((positions[0].y - 0.0).abs() < 1e-9);
    // Tangential position untouched: contact acts only along the normal.
    assert!((positions[0].x - 0.3).abs() < 1e-12);
}

// ─── Partitioning ────────────────────────────────────────────────────────────

#[test]
fn grid_partition_is_race_free() {
    let mesh = quad_grid(6, 6, 1.0, 1.0);
    let topo = Topology::build(&mesh);
    let mut container = ConstraintContainer::new();
    generate_constraints(&mesh, &topo, &cloth_config(), &mut container);
    container.partition_constraints(1, mesh.vertex_count());
    assert!(container.is_partitioned());

    let mut covered = 0usize;
    for group in container.partitions() {
        let mut seen = std::collections::HashSet::new();
        for &ci in group {
            for pid in container.constraints()[ci].particles() {
                assert!(seen.insert(pid.index()), "group shares a particle");
            }
        }
        covered += group.len();
    }
    covered += container.remainder().len();
    assert_eq!(covered, container.len());
}

#[test]
fn projection_result_is_identical_with_and_without_partitioning() {
    // Sequential projection in partition order must equal plain sequential
    // order only in the converged limit, so compare converged states.
    let mesh = quad_grid(3, 3, 1.0, 1.0);
    let topo = Topology::build(&mesh);
    let config = ConstraintConfig {
        distance_stiffness: Some(1.0),
        ..Default::default()
    };

    let stretch = |mesh: &pliant_mesh::Mesh| -> Vec<Vec3> {
        mesh.vertices.iter().map(|v| *v * 1.2).collect()
    };
    let inv_masses = vec![1.0; mesh.vertex_count()];

    let run = |partitioned: bool| -> Vec<Vec3> {
        let mut container = ConstraintContainer::new();
        generate_constraints(&mesh, &topo, &config, &mut container);
        if partitioned {
            container.partition_constraints(1, mesh.vertex_count());
        }
        let mut positions = stretch(&mesh);
        for constraint in container.constraints_mut() {
            constraint.reset_lambda();
        }
        for _ in 0..200 {
            for constraint in container.constraints_mut() {
                constraint.project(&mut positions, &inv_masses, DT, ProjectionMode::Xpbd);
            }
        }
        positions
    };

    let plain = run(false);
    let with_partition = run(true);
    for (a, b) in plain.iter().zip(&with_partition) {
        assert!((*a - *b).length() < 1e-6);
    }
}

// ─── Configuration Validation ────────────────────────────────────────────────

#[test]
fn negative_stiffness_is_rejected() {
    let config = ConstraintConfig {
        distance_stiffness: Some(-1.0),
        ..Default::default()
    };
    assert!(config.validate().is_err());

    let config = ConstraintConfig {
        dihedral_stiffness: Some(0.0),
        ..Default::default()
    };
    assert!(config.validate().is_err());

    assert!(cloth_config().validate().is_ok());
    assert!(volumetric_config().validate().is_ok());
}

#[test]
fn incompressible_poisson_ratio_is_rejected() {
    // ν = 0.5 makes the Lamé λ divide by zero; the bound is open.
    let fem = FemConfig {
        youngs_modulus: 1000.0,
        poisson_ratio: 0.5,
        material: FemMaterial::NeoHookean,
    };
    assert!(fem.validate().is_err());

    let fem = FemConfig {
        youngs_modulus: -5.0,
        poisson_ratio: 0.3,
        material: FemMaterial::StVk,
    };
    assert!(fem.validate().is_err());
}

// ─── Serialization ───────────────────────────────────────────────────────────

#[test]
fn constraint_rest_data_round_trips_through_serde() {
    let rest = [Vec3::ZERO, Vec3::new(0.0, 2.0, 0.0)];
    let original = Constraint::distance(&rest, 0, 1, 0.8, 1.25);

    let json = serde_json::to_string(&original).unwrap();
    let back: Constraint = serde_json::from_str(&json).unwrap();
    assert_eq!(back, original);

    // The deserialized constraint projects identically.
    let mut a = vec![Vec3::ZERO, Vec3::new(0.0, 3.0, 0.0)];
    let mut b = a.clone();
    let inv_masses = vec![1.0, 1.0];
    let mut lhs = original;
    let mut rhs = back;
    lhs.project(&mut a, &inv_masses, DT, ProjectionMode::Xpbd);
    rhs.project(&mut b, &inv_masses, DT, ProjectionMode::Xpbd);
    assert_eq!(a, b);
}
