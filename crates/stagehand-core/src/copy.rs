//! Copies a selected resource directory into a producer's output directory.

use crate::directory::DirectoryRef;
use crate::error::StagingResult;
use crate::resources::{select_first, ExistingDirectory, NamedDirectory, RESOURCES_DIR_NAME};
use crate::step::ProducerHandle;
use crate::utilities::SpecExt;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// What a copy did
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum CopyOutcome {
    /// There was no source directory selected
    NothingToCopy,
    /// Files were copied
    Copied { files: usize },
}

/// Copies every file under `from` into the producer directory `into`, keeping relative paths.
#[derive(Debug, Clone)]
pub struct CopyResources {
    from: Option<PathBuf>,
    into: DirectoryRef,
}

impl CopyResources {
    pub fn new(from: Option<PathBuf>, into: DirectoryRef) -> Self {
        Self { from, into }
    }

    /// Creates a copy from the first candidate that is an existing directory named `resources`
    /// into the producer's output directory, resolving it if needed. Candidates that do not exist
    /// are skipped.
    pub fn for_producer<I, P>(candidates: I, producer: &ProducerHandle) -> StagingResult<Self>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let from = select_first(
            candidates,
            NamedDirectory::new(RESOURCES_DIR_NAME).and(ExistingDirectory),
        );
        let into = producer.output_dir()?;
        Ok(Self::new(from, into))
    }

    pub fn source(&self) -> Option<&Path> {
        self.from.as_deref()
    }

    pub fn destination(&self) -> &DirectoryRef {
        &self.into
    }

    pub fn execute(&self) -> StagingResult<CopyOutcome> {
        let from = match &self.from {
            Some(from) => from,
            None => {
                debug!("{}: no resource directory selected, nothing to copy", self.into.built_by());
                return Ok(CopyOutcome::NothingToCopy);
            }
        };

        fs::create_dir_all(self.into.path())?;
        let mut files = 0;
        for entry in WalkDir::new(from).follow_links(true) {
            let entry = entry.map_err(std::io::Error::from)?;
            let relative = match entry.path().strip_prefix(from) {
                Ok(relative) => relative,
                Err(_) => continue,
            };
            let target = self.into.path().join(relative);
            if entry.file_type().is_dir() {
                fs::create_dir_all(&target)?;
            } else {
                trace!("copying {:?} to {:?}", entry.path(), target);
                fs::copy(entry.path(), &target)?;
                files += 1;
            }
        }
        info!(
            "{}: copied {} file(s) from {:?} into {:?}",
            self.into.built_by(),
            files,
            from,
            self.into.path()
        );
        Ok(CopyOutcome::Copied { files })
    }
}
