use stagehand_core::copy::{CopyOutcome, CopyResources};
use stagehand_core::lazy_evaluation::providers::FallibleProvider;
use stagehand_core::lazy_evaluation::ProviderError;
use stagehand_core::prelude::*;
use stagehand_core::source_set::SourceSet;
use stagehand_core::task_graph::{DependencyRecorder, ExecutionGraph};
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::tempdir;

#[test]
fn one_edge_per_declared_pair() {
    let layouts: Vec<(usize, Vec<Vec<usize>>)> = vec![
        (1, vec![vec![0]]),
        (3, vec![vec![0, 1, 2], vec![2], vec![1, 0]]),
        (4, vec![vec![3, 3, 0], vec![], vec![0, 1, 2, 3, 1]]),
    ];

    for (producers, consumers) in layouts {
        let mut coordinator = StagingCoordinator::new();
        for p in 0..producers {
            coordinator
                .declare_producer(format!("p{p}"), PathBuf::from(format!("/out/p{p}")))
                .unwrap();
        }
        let mut expected = vec![];
        for (c, inputs) in consumers.iter().enumerate() {
            let names: Vec<String> = inputs.iter().map(|p| format!("p{p}")).collect();
            coordinator.declare_consumer(format!("c{c}"), &names).unwrap();
            let mut seen = HashSet::new();
            for name in names {
                if seen.insert(name.clone()) {
                    expected.push((format!("c{c}"), name));
                }
            }
        }

        let mut recorder = DependencyRecorder::default();
        let emitted = coordinator.bind_into_execution_order(&mut recorder);
        assert_eq!(emitted, expected.len());
        assert_eq!(recorder.pairs(), expected);
        let unique: HashSet<_> = recorder.pairs().into_iter().collect();
        assert_eq!(unique.len(), recorder.len());
    }
}

#[test]
fn execution_graph_orders_staging_steps() {
    let mut coordinator = StagingCoordinator::new();
    coordinator
        .declare_producer("copyRestApiSpecs", PathBuf::from("/build/specs"))
        .unwrap();
    coordinator
        .declare_producer("copyYamlTests", PathBuf::from("/build/tests"))
        .unwrap();
    let consumer = coordinator
        .declare_consumer("yamlRestTest", ["copyRestApiSpecs", "copyYamlTests"])
        .unwrap();
    coordinator.attach_to_lifecycle("check", &consumer).unwrap();

    let mut graph = ExecutionGraph::new();
    coordinator.bind_into_execution_order(&mut graph);

    let order: Vec<String> = graph
        .execution_order()
        .unwrap()
        .into_iter()
        .map(|s| s.to_string())
        .collect();
    let position = |name: &str| order.iter().position(|s| s == name).unwrap();
    assert!(position("copyRestApiSpecs") < position("yamlRestTest"));
    assert!(position("copyYamlTests") < position("yamlRestTest"));
    assert!(position("yamlRestTest") < position("check"));
}

#[test]
fn concurrent_consumers_share_one_evaluation() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();

    let mut coordinator = StagingCoordinator::new();
    coordinator
        .declare_producer(
            "shared",
            provider!(move || {
                counter.fetch_add(1, Ordering::SeqCst);
                std::thread::sleep(std::time::Duration::from_millis(20));
                PathBuf::from("/out/shared")
            }),
        )
        .unwrap();
    let consumers: Vec<ConsumerHandle> = (0..6)
        .map(|i| coordinator.declare_consumer(format!("c{i}"), ["shared"]).unwrap())
        .collect();

    let handles: Vec<_> = consumers
        .into_iter()
        .map(|consumer| std::thread::spawn(move || consumer.resolved_input_dirs().unwrap()))
        .collect();
    for handle in handles {
        let dirs = handle.join().unwrap();
        assert_eq!(dirs.len(), 1);
        assert_eq!(dirs[0].path(), PathBuf::from("/out/shared"));
    }
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(coordinator.is_frozen());
}

#[test]
fn resolve_all_stops_at_failing_producer() {
    let mut coordinator = StagingCoordinator::new();
    coordinator.declare_producer("ok", PathBuf::from("/out/ok")).unwrap();
    coordinator
        .declare_producer(
            "broken",
            FallibleProvider::new(|| -> Result<PathBuf, ProviderError> {
                Err(ProviderError::new("no build dir"))
            }),
        )
        .unwrap();
    coordinator.declare_consumer("first", ["ok"]).unwrap();
    coordinator.declare_consumer("second", ["ok", "broken"]).unwrap();

    let err = coordinator.resolve_all().unwrap_err();
    assert!(matches!(
        err.kind(),
        StagingError::Provider { producer, .. } if producer == "broken"
    ));
    assert!(coordinator.consumer("first").unwrap().is_resolved());
}

#[test]
fn copy_resources_into_producer_output() {
    let temp = tempdir().unwrap();
    let resources = temp.path().join("src").join("yamlRestTest").join("resources");
    std::fs::create_dir_all(resources.join("rest-api-spec").join("api")).unwrap();
    std::fs::write(resources.join("rest-api-spec/api/search.json"), "{}").unwrap();
    std::fs::write(resources.join("plugin.yml"), "name: test").unwrap();

    let build = temp.path().join("build");
    let mut source_set = SourceSet::default();
    source_set
        .add_resource_dir(temp.path().join("src").join("yamlRestTest").join("java"))
        .add_resource_dir(&resources);

    let mut coordinator = StagingCoordinator::new();
    let out = build.join("restResources");
    let producer = coordinator
        .declare_producer("copyRestApiSpecs", provider!(move || out.clone()))
        .unwrap();
    let consumer = coordinator
        .declare_consumer("yamlRestTest", ["copyRestApiSpecs"])
        .unwrap();

    let copy = CopyResources::for_producer(source_set.resource_dirs(), &producer).unwrap();
    assert_eq!(copy.source(), Some(resources.as_path()));
    assert_eq!(copy.execute().unwrap(), CopyOutcome::Copied { files: 2 });

    let staged = build.join("restResources");
    assert_eq!(
        std::fs::read_to_string(staged.join("rest-api-spec/api/search.json")).unwrap(),
        "{}"
    );
    assert!(staged.join("plugin.yml").is_file());

    source_set.register_outputs(&consumer).unwrap();
    assert_eq!(source_set.output_dirs()[0].path(), staged.as_path());
}

#[test]
fn missing_resources_copy_nothing() {
    let temp = tempdir().unwrap();
    let mut coordinator = StagingCoordinator::new();
    let producer = coordinator
        .declare_producer("copyYamlTests", temp.path().join("out"))
        .unwrap();

    let copy = CopyResources::for_producer(["src/java", "src/other"], &producer).unwrap();
    assert_eq!(copy.source(), None);
    assert_eq!(copy.execute().unwrap(), CopyOutcome::NothingToCopy);
    assert!(!temp.path().join("out").exists());
}

#[test]
fn listed_but_missing_resources_copy_nothing() {
    let temp = tempdir().unwrap();
    let java = temp.path().join("src").join("yamlRestTest").join("java");
    std::fs::create_dir_all(&java).unwrap();
    let resources = temp.path().join("src").join("yamlRestTest").join("resources");

    let mut coordinator = StagingCoordinator::new();
    let producer = coordinator
        .declare_producer("copyRestApiSpecs", temp.path().join("out"))
        .unwrap();

    let copy = CopyResources::for_producer([&java, &resources], &producer).unwrap();
    assert_eq!(copy.source(), None);
    assert_eq!(copy.execute().unwrap(), CopyOutcome::NothingToCopy);
    assert!(!temp.path().join("out").exists());
}
