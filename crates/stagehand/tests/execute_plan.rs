use clap::Parser;
use stagehand::{execute, StagehandArgs};
use stagehand_core::copy::CopyOutcome;
use stagehand_core::identifier::StepId;
use tempfile::tempdir;

const PLAN: &str = r#"
base_dir = "build"

[[producer]]
name = "copyRestApiSpecs"
output = "restResources/specs"
resources = ["src/yamlRestTest/java", "src/yamlRestTest/resources"]

[[producer]]
name = "copyYamlTests"
output = "restResources/tests"

[[consumer]]
name = "yamlRestTest"
producers = ["copyRestApiSpecs", "copyYamlTests"]
lifecycle = ["check"]
"#;

#[test]
fn runs_plan_and_copies_resources() {
    let temp = tempdir().unwrap();
    let resources = temp.path().join("src/yamlRestTest/resources");
    std::fs::create_dir_all(&resources).unwrap();
    std::fs::write(resources.join("api.json"), "{}").unwrap();
    let plan = temp.path().join("staging.toml");
    std::fs::write(&plan, PLAN).unwrap();

    let plan = plan.to_string_lossy().to_string();
    let args = StagehandArgs::parse_from(["stagehand", "--plan", plan.as_str(), "--copy", "--tree"]);
    let report = execute(&args).unwrap();

    assert_eq!(report.inputs.len(), 1);
    assert_eq!(report.inputs[0].0, "yamlRestTest");
    assert_eq!(
        report.inputs[0].1[0].path(),
        temp.path().join("build/restResources/specs")
    );
    assert_eq!(
        report.copies,
        vec![
            (StepId::new("copyRestApiSpecs").unwrap(), CopyOutcome::Copied { files: 1 }),
            (StepId::new("copyYamlTests").unwrap(), CopyOutcome::NothingToCopy),
        ]
    );
    assert!(temp
        .path()
        .join("build/restResources/specs/api.json")
        .is_file());
    assert_eq!(report.order.last().unwrap(), "check");
    assert_eq!(report.trees.len(), 1);

    let rendered = report.to_string();
    assert!(rendered.contains("execution order:"));
    assert!(rendered.contains("copyYamlTests: nothing to copy"));
}

#[test]
fn unknown_producer_fails() {
    let temp = tempdir().unwrap();
    let plan = temp.path().join("staging.toml");
    std::fs::write(
        &plan,
        r#"
        [[consumer]]
        name = "yamlRestTest"
        producers = ["copyRestApiSpecs"]
        "#,
    )
    .unwrap();

    let plan = plan.to_string_lossy().to_string();
    let args = StagehandArgs::parse_from(["stagehand", "--plan", plan.as_str()]);
    let err = execute(&args).unwrap_err();
    assert!(err.to_string().contains("copyRestApiSpecs"));
}

#[test]
fn copy_skips_listed_but_missing_resources() {
    let temp = tempdir().unwrap();
    std::fs::create_dir_all(temp.path().join("src/yamlRestTest/java")).unwrap();
    let plan = temp.path().join("staging.toml");
    std::fs::write(&plan, PLAN).unwrap();

    let plan = plan.to_string_lossy().to_string();
    let args = StagehandArgs::parse_from(["stagehand", "--plan", plan.as_str(), "--copy"]);
    let report = execute(&args).unwrap();

    assert_eq!(
        report.copies,
        vec![
            (StepId::new("copyRestApiSpecs").unwrap(), CopyOutcome::NothingToCopy),
            (StepId::new("copyYamlTests").unwrap(), CopyOutcome::NothingToCopy),
        ]
    );
    assert!(!temp.path().join("build/restResources/specs").exists());
    assert_eq!(report.order.last().unwrap(), "check");
}
