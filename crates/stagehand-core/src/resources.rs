//! Selecting the directory resources are staged from.
//!
//! Selection is a first-match scan over an ordered list of candidate paths. Finding nothing is
//! not an error: callers should treat `None` as "nothing to copy".

use crate::utilities::Spec;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// The literal directory name resources are selected by
pub const RESOURCES_DIR_NAME: &str = "resources";

/// A predicate over candidate directories
pub trait DirectorySpec: Spec<Path> + Send + Sync {}

impl<F> DirectorySpec for F where F: Spec<Path> + Send + Sync {}

assert_obj_safe!(DirectorySpec);

/// Accepts paths whose final component is exactly the given name. Case sensitive, and the file
/// system is never consulted.
#[derive(Debug, Clone)]
pub struct NamedDirectory {
    name: String,
}

impl NamedDirectory {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Spec<Path> for NamedDirectory {
    fn accept(&self, value: &Path) -> bool {
        value.file_name() == Some(OsStr::new(&self.name))
    }
}

/// Accepts paths that exist and are directories
#[derive(Debug, Clone, Copy, Default)]
pub struct ExistingDirectory;

impl Spec<Path> for ExistingDirectory {
    fn accept(&self, value: &Path) -> bool {
        value.is_dir()
    }
}

/// Returns the first candidate accepted by `spec`, if any.
pub fn select_first<I, P, S>(candidates: I, spec: S) -> Option<PathBuf>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
    S: DirectorySpec,
{
    let selected = candidates
        .into_iter()
        .find(|candidate| spec.accept(candidate.as_ref()))
        .map(|candidate| candidate.as_ref().to_path_buf());
    match &selected {
        Some(path) => trace!("selected {:?}", path),
        None => trace!("no candidate directory selected"),
    }
    selected
}

/// Returns the first candidate literally named `resources`, if any.
pub fn select_resource_dir<I, P>(candidates: I) -> Option<PathBuf>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    select_first(candidates, NamedDirectory::new(RESOURCES_DIR_NAME))
}
