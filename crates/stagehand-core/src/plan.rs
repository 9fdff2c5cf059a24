//! Staging plans describe producers and consumers in a toml file.
//!
//! ```toml
//! base_dir = "build"
//!
//! [[producer]]
//! name = "copyRestApiSpecs"
//! output = "restResources/restApiSpecs"
//! resources = ["src/yamlRestTest/java", "src/yamlRestTest/resources"]
//!
//! [[consumer]]
//! name = "yamlRestTest"
//! producers = ["copyRestApiSpecs"]
//! lifecycle = ["check"]
//! ```
//!
//! Relative output directories are resolved against `base_dir`. When a plan is loaded from a
//! file, `base_dir` and relative resource candidates are resolved against the directory
//! containing the plan file.

use crate::coordinator::StagingCoordinator;
use crate::error::StagingResult;
use crate::lazy_evaluation::ProviderExt;
use crate::provider;
use crate::step::ProducerHandle;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// The default plan file name
pub const PLAN_FILE_NAME: &str = "staging.toml";

#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    #[error("Could not read plan file {path:?}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Invalid staging plan: {0}")]
    Parse(#[from] toml::de::Error),
}

/// A producer entry in a plan
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ProducerPlan {
    pub name: String,
    pub output: PathBuf,
    /// Candidate directories to copy resources from. The first one named `resources` is used.
    #[serde(default)]
    pub resources: Vec<PathBuf>,
}

/// A consumer entry in a plan
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ConsumerPlan {
    pub name: String,
    #[serde(default)]
    pub producers: Vec<String>,
    /// Lifecycle steps, like `check`, that depend on this consumer
    #[serde(default)]
    pub lifecycle: Vec<String>,
}

#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct StagingPlan {
    #[serde(default)]
    pub base_dir: Option<PathBuf>,
    #[serde(default, rename = "producer")]
    pub producers: Vec<ProducerPlan>,
    #[serde(default, rename = "consumer")]
    pub consumers: Vec<ConsumerPlan>,
}

impl FromStr for StagingPlan {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(toml::from_str(s)?)
    }
}

/// A coordinator declared from a plan, along with the resource candidates of each producer.
#[derive(Debug)]
pub struct PlannedStaging {
    pub coordinator: StagingCoordinator,
    pub resources: Vec<(ProducerHandle, Vec<PathBuf>)>,
}

impl StagingPlan {
    /// Loads a plan file. A relative or missing `base_dir`, and relative resource candidates, are
    /// resolved against the file's directory.
    pub fn load(path: impl AsRef<Path>) -> StagingResult<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| PlanError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut plan = Self::from_str(&contents)?;

        let plan_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        plan.base_dir = Some(match plan.base_dir.take() {
            Some(base) => plan_dir.join(base),
            None => plan_dir.clone(),
        });
        for producer in &mut plan.producers {
            for candidate in &mut producer.resources {
                *candidate = plan_dir.join(&*candidate);
            }
        }
        debug!("loaded staging plan {:?} with base dir {:?}", path, plan.base_dir);
        Ok(plan)
    }

    /// Declares every producer, then every consumer and its lifecycle steps, in file order.
    pub fn declare(&self) -> StagingResult<PlannedStaging> {
        let base_dir = self.base_dir.clone().unwrap_or_default();
        let mut coordinator = StagingCoordinator::new();
        let mut resources = vec![];

        for producer in &self.producers {
            let output = producer.output.clone();
            let base = base_dir.clone();
            let handle = coordinator.declare_producer(
                &producer.name,
                provider!(move || base.clone()).map(move |base| base.join(&output)),
            )?;
            resources.push((handle, producer.resources.clone()));
        }

        for consumer in &self.consumers {
            let handle = coordinator.declare_consumer(&consumer.name, &consumer.producers)?;
            for lifecycle in &consumer.lifecycle {
                coordinator.attach_to_lifecycle(lifecycle, &handle)?;
            }
        }

        Ok(PlannedStaging {
            coordinator,
            resources,
        })
    }
}
