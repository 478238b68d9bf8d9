//! Wiring a deformable model's step phases into the task graph.

use std::sync::{Arc, Mutex};

use pliant_constraint::ConstraintConfig;
use pliant_math::Vec3;
use pliant_mesh::generators::quad_grid;
use pliant_pipeline::TaskGraph;
use pliant_solver::{PbdConfig, PbdModel};

/// The scene driver owns the model behind a lock and exposes each step
/// phase as its own graph node, chained predict → solve → update.
#[test]
fn model_phases_run_as_graph_nodes() {
    let mesh = quad_grid(4, 4, 1.0, 1.0);
    let mut model = PbdModel::new();
    model
        .configure(PbdConfig {
            fixed_nodes: vec![0, 4],
            constraints: ConstraintConfig {
                distance_stiffness: Some(1.0),
                ..Default::default()
            },
            ..Default::default()
        })
        .unwrap();
    model.set_geometry(mesh);
    model.initialize().unwrap();
    let model = Arc::new(Mutex::new(model));

    let mut graph = TaskGraph::new();
    let predict = {
        let model = model.clone();
        graph.add_task("predict", move || {
            model.lock().unwrap().predict().unwrap();
        })
    };
    let solve = {
        let model = model.clone();
        graph.add_task("solve", move || {
            model.lock().unwrap().solve().unwrap();
        })
    };
    let update = {
        let model = model.clone();
        graph.add_task("update velocity", move || {
            model.lock().unwrap().update_velocity().unwrap();
        })
    };
    graph.add_edge(predict, solve).unwrap();
    graph.add_edge(solve, update).unwrap();

    for _ in 0..30 {
        graph.execute().unwrap();
    }

    let model = model.lock().unwrap();
    let state = model.state().unwrap();
    for p in state.positions() {
        assert!(p.is_finite());
    }
    // Pinned corner held, free cloth fell.
    assert_eq!(state.positions()[0], Vec3::new(-0.5, 0.0, -0.5));
    assert!(state.positions()[24].y < 0.0);
}
