//! The staging coordinator.
//!
//! Producers must be declared before any consumer that names them. Because forward references
//! are rejected, declaration order is always a valid topological order and the dependency edges
//! can never form a cycle.

use crate::directory::DirectoryRef;
use crate::error::{StagingError, StagingResult};
use crate::identifier::StepId;
use crate::lazy_evaluation::Provider;
use crate::step::{ConsumerHandle, ProducerHandle, Step};
use crate::task_graph::TaskGraphAdapter;
use itertools::Itertools;
use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A consumer depends on a producer
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct DependencyEdge {
    consumer: StepId,
    producer: StepId,
}

impl DependencyEdge {
    pub fn consumer(&self) -> &StepId {
        &self.consumer
    }
    pub fn producer(&self) -> &StepId {
        &self.producer
    }
}

impl Display for DependencyEdge {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.consumer, self.producer)
    }
}

/// A lifecycle step, such as `check`, depends on a consumer
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct LifecycleEdge {
    lifecycle: StepId,
    consumer: StepId,
}

impl LifecycleEdge {
    pub fn lifecycle(&self) -> &StepId {
        &self.lifecycle
    }
    pub fn consumer(&self) -> &StepId {
        &self.consumer
    }
}

/// Declares producers and consumers, and binds the dependencies between them into a host task
/// graph.
#[derive(Debug, Default)]
pub struct StagingCoordinator {
    steps: Vec<Step>,
    index: HashMap<StepId, usize>,
    lifecycle: Vec<LifecycleEdge>,
    frozen: Arc<AtomicBool>,
}

impl StagingCoordinator {
    /// Creates a new, empty coordinator
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a producer whose output directory is given by `output`.
    ///
    /// The provider is not evaluated until the output directory is first requested, and is
    /// evaluated at most once.
    ///
    /// # Error
    /// Fails with [`StagingError::DuplicateName`] if a step with this name already exists.
    pub fn declare_producer<S, P>(&mut self, name: S, output: P) -> StagingResult<ProducerHandle>
    where
        S: AsRef<str>,
        P: Provider<PathBuf> + 'static,
    {
        let id = StepId::new(name)?;
        self.ensure_declarable(&id)?;

        debug!("declaring producer {}", id);
        let handle = ProducerHandle::new(id.clone(), output);
        self.insert(id, Step::Producer(handle.clone()));
        Ok(handle)
    }

    /// Declares a consumer that reads the outputs of `producers`, in the given order.
    ///
    /// A producer named more than once is only kept at its first position.
    ///
    /// # Error
    /// Fails with [`StagingError::UnknownProducer`] if any of the producers has not been
    /// declared yet, and with [`StagingError::DuplicateName`] if the consumer's name is taken.
    pub fn declare_consumer<S, I, N>(&mut self, name: S, producers: I) -> StagingResult<ConsumerHandle>
    where
        S: AsRef<str>,
        I: IntoIterator<Item = N>,
        N: AsRef<str>,
    {
        let id = StepId::new(name)?;
        self.ensure_declarable(&id)?;

        let mut handles: Vec<ProducerHandle> = vec![];
        for producer in producers {
            let producer = StepId::new(producer)?;
            match self.get(&producer) {
                Some(Step::Producer(handle)) => {
                    if handles.iter().any(|h| h.id() == &producer) {
                        debug!("{} names producer {} more than once", id, producer);
                    } else {
                        handles.push(handle.clone());
                    }
                }
                _ => {
                    return Err(StagingError::UnknownProducer {
                        consumer: id,
                        producer,
                    }
                    .into())
                }
            }
        }

        debug!(
            "declaring consumer {} reading from [{}]",
            id,
            handles.iter().map(ProducerHandle::id).join(", ")
        );
        let handle = ConsumerHandle::new(id.clone(), handles, self.frozen.clone());
        self.insert(id, Step::Consumer(handle.clone()));
        Ok(handle)
    }

    /// Makes a lifecycle step, such as `check`, depend on a consumer declared by this
    /// coordinator. Lifecycle steps are not staging steps, they only show up when binding.
    pub fn attach_to_lifecycle<S: AsRef<str>>(
        &mut self,
        lifecycle: S,
        consumer: &ConsumerHandle,
    ) -> StagingResult {
        let lifecycle = StepId::new(lifecycle)?;
        if self.is_frozen() {
            return Err(StagingError::GraphFrozen(lifecycle).into());
        }
        if self.index.contains_key(&lifecycle) {
            return Err(StagingError::DuplicateName(lifecycle).into());
        }
        match self.get(consumer.id()) {
            Some(Step::Consumer(declared)) if declared.same_as(consumer) => {}
            _ => return Err(StagingError::UnknownConsumer(consumer.id().clone()).into()),
        }

        let edge = LifecycleEdge {
            lifecycle,
            consumer: consumer.id().clone(),
        };
        if !self.lifecycle.contains(&edge) {
            debug!("{} depends on {}", edge.lifecycle, edge.consumer);
            self.lifecycle.push(edge);
        }
        Ok(())
    }

    /// Gets a declared step by name
    pub fn get(&self, name: &str) -> Option<&Step> {
        self.index.get(name).map(|&index| &self.steps[index])
    }

    pub fn producer(&self, name: &str) -> Option<&ProducerHandle> {
        match self.get(name) {
            Some(Step::Producer(p)) => Some(p),
            _ => None,
        }
    }

    pub fn consumer(&self, name: &str) -> Option<&ConsumerHandle> {
        match self.get(name) {
            Some(Step::Consumer(c)) => Some(c),
            _ => None,
        }
    }

    /// All declared steps, in declaration order
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn consumers(&self) -> impl Iterator<Item = &ConsumerHandle> {
        self.steps.iter().filter_map(|step| match step {
            Step::Consumer(c) => Some(c),
            Step::Producer(_) => None,
        })
    }

    /// The dependency edges derived from every consumer's declared producers. Consumers appear
    /// in declaration order, and each consumer's producers in the order it named them.
    pub fn edges(&self) -> Vec<DependencyEdge> {
        self.consumers()
            .flat_map(|consumer| {
                consumer.producer_ids().map(move |producer| DependencyEdge {
                    consumer: consumer.id().clone(),
                    producer: producer.clone(),
                })
            })
            .collect()
    }

    pub fn lifecycle_edges(&self) -> &[LifecycleEdge] {
        &self.lifecycle
    }

    /// Prevents any further declarations.
    pub fn freeze(&self) {
        self.frozen.store(true, Ordering::SeqCst);
    }

    /// Whether the coordinator is frozen, either explicitly or because a consumer started
    /// resolving its inputs.
    pub fn is_frozen(&self) -> bool {
        self.frozen.load(Ordering::SeqCst)
    }

    /// Resolves the inputs of every consumer, in declaration order.
    pub fn resolve_all(&self) -> StagingResult<Vec<(StepId, Vec<DirectoryRef>)>> {
        self.consumers()
            .map(|consumer| {
                consumer
                    .resolved_input_dirs()
                    .map(|dirs| (consumer.id().clone(), dirs))
            })
            .collect()
    }

    /// Emits one `add_dependency` call per dependency edge, then one per lifecycle edge.
    ///
    /// Returns the number of calls made.
    pub fn bind_into_execution_order<A>(&self, adapter: &mut A) -> usize
    where
        A: TaskGraphAdapter + ?Sized,
    {
        let mut emitted = 0;
        for edge in self.edges() {
            trace!("binding {}", edge);
            adapter.add_dependency(&edge.consumer, &edge.producer);
            emitted += 1;
        }
        for edge in &self.lifecycle {
            trace!("binding {} -> {}", edge.lifecycle, edge.consumer);
            adapter.add_dependency(&edge.lifecycle, &edge.consumer);
            emitted += 1;
        }
        debug!("bound {} dependencies into execution order", emitted);
        emitted
    }

    fn ensure_declarable(&self, id: &StepId) -> StagingResult {
        if self.is_frozen() {
            return Err(StagingError::GraphFrozen(id.clone()).into());
        }
        if self.index.contains_key(id)
            || self.lifecycle.iter().any(|edge| &edge.lifecycle == id)
        {
            return Err(StagingError::DuplicateName(id.clone()).into());
        }
        Ok(())
    }

    fn insert(&mut self, id: StepId, step: Step) {
        self.index.insert(id, self.steps.len());
        self.steps.push(step);
    }
}
