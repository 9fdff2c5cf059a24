//! Stagehand stages derived build inputs into lazily computed directories and wires
//! the steps that consume them into a host task graph.
//!
//! The main entry point is the [`StagingCoordinator`](coordinator::StagingCoordinator).
//! Producers are declared with a deferred [`Provider`](lazy_evaluation::Provider) for
//! their output directory, and consumers name the producers they read from.
//!
//! ```
//! # use std::path::PathBuf;
//! use stagehand_core::coordinator::StagingCoordinator;
//! use stagehand_core::task_graph::DependencyRecorder;
//!
//! let mut coordinator = StagingCoordinator::new();
//! coordinator.declare_producer("copyRestApiSpecs", PathBuf::from("/out/specs")).unwrap();
//! coordinator.declare_producer("copyYamlTests", PathBuf::from("/out/tests")).unwrap();
//! let consumer = coordinator
//!     .declare_consumer("yamlRestTest", ["copyRestApiSpecs", "copyYamlTests"])
//!     .unwrap();
//!
//! let dirs = consumer.resolved_input_dirs().unwrap();
//! assert_eq!(dirs[0].path(), PathBuf::from("/out/specs"));
//!
//! let mut recorder = DependencyRecorder::default();
//! coordinator.bind_into_execution_order(&mut recorder);
//! assert_eq!(recorder.len(), 2);
//! ```

#[macro_use]
extern crate static_assertions;

#[macro_use]
extern crate log;

#[macro_use]
extern crate serde;

pub mod coordinator;
pub mod copy;
pub mod directory;
pub mod error;
pub mod identifier;
pub mod lazy_evaluation;
pub mod logging;
pub mod plan;
pub mod resources;
pub mod source_set;
pub mod step;
pub mod task_graph;
pub mod utilities;

pub use coordinator::StagingCoordinator;
pub use directory::DirectoryRef;
pub use error::{StagingError, StagingResult};
pub use identifier::StepId;
pub use step::{ConsumerHandle, ProducerHandle, Step, StepKind};

/// Commonly used types
pub mod prelude {
    pub use crate::coordinator::{DependencyEdge, LifecycleEdge, StagingCoordinator};
    pub use crate::directory::DirectoryRef;
    pub use crate::error::{StagingError, StagingResult};
    pub use crate::identifier::StepId;
    pub use crate::lazy_evaluation::{Provider, ProviderError, ProviderExt};
    pub use crate::provider;
    pub use crate::step::{ConsumerHandle, ProducerHandle, Step, StepKind};
    pub use crate::task_graph::TaskGraphAdapter;
}
