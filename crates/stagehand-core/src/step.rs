//! Producer and consumer steps, and the handles used to query them.

use crate::directory::DirectoryRef;
use crate::error::{PayloadError, StagingError, StagingResult};
use crate::identifier::StepId;
use crate::lazy_evaluation::{Memoized, Provider};
use once_cell::sync::OnceCell;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

assert_impl_all!(ProducerHandle: Send, Sync, Clone);
assert_impl_all!(ConsumerHandle: Send, Sync, Clone);

/// Whether a step populates a directory or reads from them
#[derive(Debug, Eq, PartialEq, Copy, Clone, Hash)]
pub enum StepKind {
    Producer,
    Consumer,
}

impl Display for StepKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StepKind::Producer => write!(f, "producer"),
            StepKind::Consumer => write!(f, "consumer"),
        }
    }
}

/// A declared step
#[derive(Debug, Clone)]
pub enum Step {
    Producer(ProducerHandle),
    Consumer(ConsumerHandle),
}

impl Step {
    pub fn id(&self) -> &StepId {
        match self {
            Step::Producer(p) => p.id(),
            Step::Consumer(c) => c.id(),
        }
    }

    pub fn kind(&self) -> StepKind {
        match self {
            Step::Producer(_) => StepKind::Producer,
            Step::Consumer(_) => StepKind::Consumer,
        }
    }

    /// The producers this step reads from. Always empty for producers.
    pub fn inputs(&self) -> Vec<StepId> {
        match self {
            Step::Producer(_) => vec![],
            Step::Consumer(c) => c.producer_ids().cloned().collect(),
        }
    }
}

#[derive(Debug)]
struct ProducerInner {
    id: StepId,
    output: Memoized<PathBuf>,
}

/// A handle to a declared producer.
///
/// Cloning the handle shares the producer, including its memoized output directory.
#[derive(Debug, Clone)]
pub struct ProducerHandle {
    inner: Arc<ProducerInner>,
}

impl ProducerHandle {
    pub(crate) fn new<P: Provider<PathBuf> + 'static>(id: StepId, output: P) -> Self {
        Self {
            inner: Arc::new(ProducerInner {
                id,
                output: Memoized::new(output),
            }),
        }
    }

    pub fn id(&self) -> &StepId {
        &self.inner.id
    }

    /// Gets the directory this producer populates, evaluating its provider on first access.
    ///
    /// # Error
    /// Fails with [`StagingError::Provider`] if the provider failed. The failure is cached, so
    /// the provider is not evaluated again.
    pub fn output_dir(&self) -> StagingResult<DirectoryRef> {
        self.inner
            .output
            .resolve()
            .map(|path| DirectoryRef::new(path.clone(), self.inner.id.clone()))
            .map_err(|source| {
                PayloadError::new(StagingError::Provider {
                    producer: self.inner.id.clone(),
                    source,
                })
            })
    }

    /// Whether the output provider has been evaluated yet
    pub fn is_resolved(&self) -> bool {
        self.inner.output.is_resolved()
    }
}

#[derive(Debug)]
struct ConsumerInner {
    id: StepId,
    producers: Vec<ProducerHandle>,
    frozen: Arc<AtomicBool>,
    inputs: OnceCell<Vec<DirectoryRef>>,
}

/// A handle to a declared consumer.
#[derive(Debug, Clone)]
pub struct ConsumerHandle {
    inner: Arc<ConsumerInner>,
}

impl ConsumerHandle {
    pub(crate) fn new(id: StepId, producers: Vec<ProducerHandle>, frozen: Arc<AtomicBool>) -> Self {
        Self {
            inner: Arc::new(ConsumerInner {
                id,
                producers,
                frozen,
                inputs: OnceCell::new(),
            }),
        }
    }

    pub fn id(&self) -> &StepId {
        &self.inner.id
    }

    /// The producers this consumer reads from, in declaration order
    pub fn producers(&self) -> &[ProducerHandle] {
        &self.inner.producers
    }

    pub fn producer_ids(&self) -> impl Iterator<Item = &StepId> {
        self.inner.producers.iter().map(ProducerHandle::id)
    }

    /// Resolves the output directory of every producer this consumer reads from, in declaration
    /// order.
    ///
    /// The first call freezes the coordinator that declared this consumer. The result is cached,
    /// so every later call returns the same directories without evaluating any provider.
    pub fn resolved_input_dirs(&self) -> StagingResult<Vec<DirectoryRef>> {
        if !self.inner.frozen.swap(true, Ordering::SeqCst) {
            debug!("staging graph frozen by consumer {}", self.inner.id);
        }
        let inputs = self.inner.inputs.get_or_try_init(|| {
            debug!("resolving inputs of consumer {}", self.inner.id);
            self.inner
                .producers
                .iter()
                .map(ProducerHandle::output_dir)
                .collect::<StagingResult<Vec<_>>>()
        })?;
        Ok(inputs.clone())
    }

    /// Whether [`resolved_input_dirs`](Self::resolved_input_dirs) has completed successfully
    pub fn is_resolved(&self) -> bool {
        self.inner.inputs.get().is_some()
    }

    pub(crate) fn same_as(&self, other: &ConsumerHandle) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}
