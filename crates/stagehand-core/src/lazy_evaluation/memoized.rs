//! Providers that are evaluated at most once.

use crate::lazy_evaluation::{Provider, ProviderError};
use once_cell::sync::OnceCell;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

assert_impl_all!(Memoized<std::path::PathBuf>: Send, Sync, Debug);

/// Wraps a provider so that its value is computed on first access and then reused.
///
/// The outcome of the first evaluation is cached whether it succeeds or fails. Concurrent first
/// accesses block on a single evaluation.
pub struct Memoized<T: Clone + Send + Sync> {
    inner: Box<dyn Provider<T>>,
    value: OnceCell<Result<T, Arc<ProviderError>>>,
}

impl<T: Clone + Send + Sync> Memoized<T> {
    pub fn new<P: Provider<T> + 'static>(provider: P) -> Self {
        Self {
            inner: Box::new(provider),
            value: OnceCell::new(),
        }
    }

    /// Gets the memoized value, evaluating the wrapped provider if this is the first access.
    pub fn resolve(&self) -> Result<&T, Arc<ProviderError>> {
        self.value
            .get_or_init(|| {
                trace!("evaluating memoized provider {:?}", self.inner);
                self.inner.fallible_get().map_err(Arc::new)
            })
            .as_ref()
            .map_err(Arc::clone)
    }

    /// Whether the wrapped provider has already been evaluated.
    pub fn is_resolved(&self) -> bool {
        self.value.get().is_some()
    }
}

impl<T: Clone + Send + Sync> Debug for Memoized<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Memoized")
            .field("inner", &self.inner)
            .field("resolved", &self.is_resolved())
            .finish()
    }
}

impl<T: Clone + Send + Sync> Provider<T> for Memoized<T> {
    fn missing_message(&self) -> String {
        self.inner.missing_message()
    }

    fn try_get(&self) -> Option<T> {
        self.resolve().ok().cloned()
    }

    fn fallible_get(&self) -> Result<T, ProviderError> {
        self.resolve()
            .cloned()
            .map_err(|e| ProviderError::with_source(e.message().to_string(), e))
    }
}
