//! The staging error type, and an error with a payload

use crate::identifier::{InvalidStepName, StepId};
use crate::lazy_evaluation::ProviderError;
use crate::plan::PlanError;
use backtrace::Backtrace;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;
use std::sync::Arc;

/// Errors raised while declaring, resolving or binding staging steps.
#[derive(Debug, thiserror::Error)]
pub enum StagingError {
    #[error("A step named {0} has already been declared")]
    DuplicateName(StepId),
    #[error("Consumer {consumer} references producer {producer} which has not been declared")]
    UnknownProducer { consumer: StepId, producer: StepId },
    #[error("No consumer named {0} was declared by this coordinator")]
    UnknownConsumer(StepId),
    #[error("Can not declare {0}, the staging graph is frozen once a consumer resolves its inputs")]
    GraphFrozen(StepId),
    #[error(transparent)]
    InvalidStepName(#[from] InvalidStepName),
    #[error("Producer {producer} could not provide its output directory")]
    Provider {
        producer: StepId,
        #[source]
        source: Arc<ProviderError>,
    },
    #[error("Cycle detected in execution graph involving {0}")]
    CycleDetected(StepId),
    #[error(transparent)]
    Plan(#[from] PlanError),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// An payload with an error
#[derive(Debug)]
pub struct PayloadError<E> {
    kind: E,
    bt: Backtrace,
}

impl<E> PayloadError<E> {
    /// Create a new payloaded error.
    #[inline]
    pub fn new(error: E) -> Self {
        Self::with_backtrace(error, Backtrace::new())
    }

    /// create a new payload error with a backtrace
    pub fn with_backtrace(kind: E, bt: Backtrace) -> Self {
        Self { kind, bt }
    }

    /// Gets the error kind
    pub fn kind(&self) -> &E {
        &self.kind
    }

    /// Gets the backtrace
    pub fn backtrace(&self) -> &Backtrace {
        &self.bt
    }

    /// Unwraps the payloaded error
    pub fn into_inner(self) -> E {
        self.kind
    }
}

impl<E: Display> Display for PayloadError<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.kind)
    }
}

impl<E: Error + 'static> Error for PayloadError<E> {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.kind.source()
    }
}

impl<E> AsRef<E> for PayloadError<E> {
    fn as_ref(&self) -> &E {
        &self.kind
    }
}

impl<E> From<E> for PayloadError<E> {
    fn from(kind: E) -> Self {
        PayloadError::new(kind)
    }
}

#[macro_export]
macro_rules! payload_from {
    ($from:ty, $ty:ty) => {
        impl From<$from> for $crate::error::PayloadError<$ty>
        where
            $from: Into<$ty>,
        {
            fn from(e: $from) -> Self {
                let err: $ty = e.into();
                $crate::error::PayloadError::new(err)
            }
        }
    };
}

payload_from!(InvalidStepName, StagingError);
payload_from!(PlanError, StagingError);
payload_from!(io::Error, StagingError);

/// A result with a pay-loaded error
pub type Result<T, E> = std::result::Result<T, PayloadError<E>>;

pub type StagingResult<T = ()> = Result<T, StagingError>;
