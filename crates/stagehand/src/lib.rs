//! The stagehand command line front end.
//!
//! Loads a [`StagingPlan`](stagehand_core::plan::StagingPlan), resolves every consumer's inputs,
//! optionally copies resources into producer outputs, and reports the resulting execution order.

#[macro_use]
extern crate log;

use clap::Parser;
use stagehand_core::copy::{CopyOutcome, CopyResources};
use stagehand_core::directory::DirectoryRef;
use stagehand_core::identifier::StepId;
use stagehand_core::logging::LoggingOpts;
use stagehand_core::plan::{StagingPlan, PLAN_FILE_NAME};
use stagehand_core::task_graph::ExecutionGraph;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

/// Stage resource directories and wire them into a task graph
#[derive(Debug, Parser)]
#[clap(name = "stagehand", version)]
pub struct StagehandArgs {
    /// The staging plan to load
    #[clap(short, long, default_value = PLAN_FILE_NAME)]
    plan: PathBuf,

    /// Copy each producer's `resources` directory into its output directory
    #[clap(short, long)]
    copy: bool,

    /// Print the dependency tree below every root step
    #[clap(long)]
    tree: bool,

    #[clap(flatten)]
    logging: LoggingOpts,
}

impl StagehandArgs {
    pub fn logging(&self) -> &LoggingOpts {
        &self.logging
    }
}

/// The outcome of running a staging plan
#[derive(Debug)]
pub struct Report {
    pub inputs: Vec<(StepId, Vec<DirectoryRef>)>,
    pub copies: Vec<(StepId, CopyOutcome)>,
    pub order: Vec<StepId>,
    pub trees: Vec<String>,
}

impl Display for Report {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (consumer, dirs) in &self.inputs {
            writeln!(f, "{}:", consumer)?;
            for dir in dirs {
                writeln!(f, "    {}", dir)?;
            }
        }
        for (producer, outcome) in &self.copies {
            match outcome {
                CopyOutcome::NothingToCopy => writeln!(f, "{}: nothing to copy", producer)?,
                CopyOutcome::Copied { files } => writeln!(f, "{}: copied {} file(s)", producer, files)?,
            }
        }
        let order = self
            .order
            .iter()
            .map(StepId::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        writeln!(f, "execution order: {}", order)?;
        for tree in &self.trees {
            write!(f, "{}", tree)?;
        }
        Ok(())
    }
}

/// Runs the plan described by `args`
pub fn execute(args: &StagehandArgs) -> anyhow::Result<Report> {
    info!("loading staging plan {:?}", args.plan);
    let planned = StagingPlan::load(&args.plan)?.declare()?;
    let coordinator = &planned.coordinator;

    let inputs = coordinator.resolve_all()?;

    let mut copies = vec![];
    if args.copy {
        for (producer, candidates) in &planned.resources {
            let copy = CopyResources::for_producer(candidates, producer)?;
            copies.push((producer.id().clone(), copy.execute()?));
        }
    }

    let mut graph = ExecutionGraph::new();
    let bound = coordinator.bind_into_execution_order(&mut graph);
    info!("bound {} dependencies", bound);
    let order = graph.execution_order()?;

    let trees = if args.tree {
        graph
            .roots()
            .iter()
            .filter_map(|root| graph.render_tree(root))
            .collect()
    } else {
        vec![]
    };

    Ok(Report {
        inputs,
        copies,
        order,
        trees,
    })
}
