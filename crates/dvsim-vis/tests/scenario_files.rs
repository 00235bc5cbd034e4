//! The bundled scenario files load, run and pass verification.

use std::path::PathBuf;

use dvsim_convergence::{check_history, Outcome};
use dvsim_topology::Distance;
use dvsim_vis::{render_report, Scenario};

fn load(name: &str) -> Scenario {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("scenarios")
        .join(name);
    Scenario::load(&path).unwrap()
}

#[test]
fn triangle_file_matches_builtin() {
    assert_eq!(load("triangle.json"), Scenario::reference_triangle());
}

#[test]
fn negative_cycle_file_hits_cap() {
    let scenario = load("negative_cycle.json");
    let history = scenario.run(scenario.engine_config(None)).unwrap();

    assert_eq!(history.outcome(), Outcome::Capped { rounds: 10 });
    assert_eq!(history.len(), 11);
    assert_eq!(check_history(&history), Ok(()));
    assert!(render_report(&scenario, &history).contains("WARNING"));
}

#[test]
fn line_file_converges() {
    let scenario = load("line.json");
    let history = scenario.run(scenario.engine_config(None)).unwrap();

    assert!(history.outcome().is_converged());
    assert_eq!(history.final_route("A", "E").unwrap().distance, Distance::Finite(10));
    assert_eq!(check_history(&history), Ok(()));
}

#[test]
fn one_way_ring_file_converges() {
    let scenario = load("one_way_ring.json");
    let history = scenario.run(scenario.engine_config(None)).unwrap();

    assert_eq!(history.final_route("Y", "X").unwrap().distance, Distance::Finite(2));
    assert!(render_report(&scenario, &history).contains("- Links: X->Y (cost: 1)"));
}
