//! Resolved output directories

use crate::identifier::StepId;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};

/// A resolved directory, tagged with the producer that populates it.
///
/// Directory refs are only created once a producer's output provider has been evaluated, and
/// never change afterwards.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct DirectoryRef {
    path: PathBuf,
    built_by: StepId,
}

impl DirectoryRef {
    pub(crate) fn new(path: PathBuf, built_by: StepId) -> Self {
        Self { path, built_by }
    }

    /// The resolved path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The producer step that populates this directory
    pub fn built_by(&self) -> &StepId {
        &self.built_by
    }

    /// Makes this into the inner path
    pub fn into_path(self) -> PathBuf {
        self.path
    }
}

impl Deref for DirectoryRef {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.path
    }
}

impl AsRef<Path> for DirectoryRef {
    fn as_ref(&self) -> &Path {
        &self.path
    }
}

impl Display for DirectoryRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (built by {})", self.path.display(), self.built_by)
    }
}
