use stagehand_core::error::StagingError;
use stagehand_core::plan::{PlanError, StagingPlan, PLAN_FILE_NAME};
use stagehand_core::task_graph::DependencyRecorder;
use tempfile::tempdir;

#[test]
fn relative_base_dir_follows_plan_file() {
    let temp = tempdir().unwrap();
    let plan_path = temp.path().join(PLAN_FILE_NAME);
    std::fs::write(
        &plan_path,
        r#"
        base_dir = "build"

        [[producer]]
        name = "P1"
        output = "p1"

        [[producer]]
        name = "P2"
        output = "p2"

        [[consumer]]
        name = "C"
        producers = ["P1", "P2"]
        "#,
    )
    .unwrap();

    let plan = StagingPlan::load(&plan_path).unwrap();
    assert_eq!(plan.base_dir, Some(temp.path().join("build")));

    let planned = plan.declare().unwrap();
    let dirs = planned
        .coordinator
        .consumer("C")
        .unwrap()
        .resolved_input_dirs()
        .unwrap();
    assert_eq!(dirs[0].path(), temp.path().join("build").join("p1"));
    assert_eq!(dirs[1].path(), temp.path().join("build").join("p2"));

    let mut recorder = DependencyRecorder::default();
    planned.coordinator.bind_into_execution_order(&mut recorder);
    assert_eq!(
        recorder.pairs(),
        vec![
            ("C".to_string(), "P1".to_string()),
            ("C".to_string(), "P2".to_string())
        ]
    );
}

#[test]
fn missing_plan_file() {
    let temp = tempdir().unwrap();
    let err = StagingPlan::load(temp.path().join("nope.toml")).unwrap_err();
    assert!(matches!(
        err.kind(),
        StagingError::Plan(PlanError::Read { .. })
    ));
}

#[test]
fn duplicate_names_in_plan() {
    let temp = tempdir().unwrap();
    let plan_path = temp.path().join(PLAN_FILE_NAME);
    std::fs::write(
        &plan_path,
        r#"
        [[producer]]
        name = "P1"
        output = "a"

        [[producer]]
        name = "P1"
        output = "b"
        "#,
    )
    .unwrap();

    let err = StagingPlan::load(&plan_path).unwrap().declare().unwrap_err();
    assert!(matches!(err.kind(), StagingError::DuplicateName(_)));
}
