//! Integration tests for the `example` commands.
use tempfile::tempdir;
use ucsweep::cli::example::extract_example;
use ucsweep::input::load_model;

/// Every bundled example can be extracted and loaded
#[test]
fn test_extract_and_load_examples() {
    let dir = tempdir().unwrap();
    for name in ["toy", "fleet"] {
        let model_dir = dir.path().join(name);
        extract_example(name, &model_dir).unwrap();
        let model = load_model(&model_dir).unwrap();
        assert!(model.num_periods() > 0);
    }
}

/// The fleet example sweeps ten penetration factors for every scenario
#[test]
fn test_fleet_example_contents() {
    let dir = tempdir().unwrap();
    let model_dir = dir.path().join("fleet");
    extract_example("fleet", &model_dir).unwrap();
    let model = load_model(&model_dir).unwrap();

    assert_eq!(model.num_periods(), 168);
    assert_eq!(model.fleet.len(), 8);
    assert_eq!(model.scenarios.len(), 5);
    assert_eq!(model.alphas.len(), 10);
    assert_eq!(model.lambdas().len(), 3);
    assert_eq!(model.designated_plant, Some(4));
}
