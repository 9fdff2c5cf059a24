//! Source sets group the resource directories a test suite reads from with the staged
//! directories that become part of its output.

use crate::directory::DirectoryRef;
use crate::error::StagingResult;
use crate::resources::select_resource_dir;
use crate::step::ConsumerHandle;
use std::path::{Path, PathBuf};

/// The name used for the yaml rest test source set
pub const DEFAULT_SOURCE_SET_NAME: &str = "yamlRestTest";

/// A named set of resource source directories and staged output directories.
#[derive(Debug, Clone)]
pub struct SourceSet {
    name: String,
    resource_dirs: Vec<PathBuf>,
    output_dirs: Vec<DirectoryRef>,
}

impl SourceSet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            resource_dirs: vec![],
            output_dirs: vec![],
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Adds a resource source directory. Order is kept.
    pub fn add_resource_dir(&mut self, dir: impl AsRef<Path>) -> &mut Self {
        self.resource_dirs.push(dir.as_ref().to_path_buf());
        self
    }

    pub fn resource_dirs(&self) -> &[PathBuf] {
        &self.resource_dirs
    }

    /// The first resource source directory named `resources`, if there is one.
    pub fn resource_dir(&self) -> Option<PathBuf> {
        select_resource_dir(&self.resource_dirs)
    }

    /// Appends the consumer's resolved input directories to this source set's outputs, in the
    /// consumer's declaration order. Directories already registered are skipped.
    pub fn register_outputs(&mut self, consumer: &ConsumerHandle) -> StagingResult {
        for dir in consumer.resolved_input_dirs()? {
            if !self.output_dirs.contains(&dir) {
                debug!("source set {} outputs {}", self.name, dir);
                self.output_dirs.push(dir);
            }
        }
        Ok(())
    }

    pub fn output_dirs(&self) -> &[DirectoryRef] {
        &self.output_dirs
    }
}

impl Default for SourceSet {
    fn default() -> Self {
        Self::new(DEFAULT_SOURCE_SET_NAME)
    }
}
