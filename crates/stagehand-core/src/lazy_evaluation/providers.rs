//! Provides implementations of providers

use crate::lazy_evaluation::{Provider, ProviderError};
use std::fmt::{Debug, Formatter};
use std::marker::PhantomData;

/// create a provider with a function
#[macro_export]
macro_rules! provider {
    ($e:expr) => {
        $crate::lazy_evaluation::providers::FnProvider::new($e)
    };
}

/// A provider created from a function
pub struct FnProvider<F, T>
where
    F: Fn() -> T + Send + Sync,
    T: Send + Sync + Clone,
{
    func: F,
    _phantom: PhantomData<fn() -> T>,
}

impl<F, T> Debug for FnProvider<F, T>
where
    F: Fn() -> T + Send + Sync,
    T: Clone + Send + Sync,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "FunctionalProvider")
    }
}

impl<F, T> Provider<T> for FnProvider<F, T>
where
    F: Fn() -> T + Send + Sync,
    T: Send + Sync + Clone,
{
    fn try_get(&self) -> Option<T> {
        Some((self.func)())
    }
}

impl<F, T> FnProvider<F, T>
where
    F: Fn() -> T + Send + Sync,
    T: Send + Sync + Clone,
{
    pub fn new(func: F) -> Self {
        Self {
            func,
            _phantom: PhantomData,
        }
    }
}

/// A provider created from a function that can fail. The function's error is
/// reported from [`fallible_get`](Provider::fallible_get) unchanged.
pub struct FallibleProvider<F, T, E>
where
    F: Fn() -> Result<T, E> + Send + Sync,
    E: Into<ProviderError>,
    T: Send + Sync + Clone,
{
    func: F,
    _phantom: PhantomData<fn() -> (T, E)>,
}

impl<F, T, E> FallibleProvider<F, T, E>
where
    F: Fn() -> Result<T, E> + Send + Sync,
    E: Into<ProviderError>,
    T: Send + Sync + Clone,
{
    pub fn new(func: F) -> Self {
        Self {
            func,
            _phantom: PhantomData,
        }
    }
}

impl<F, T, E> Debug for FallibleProvider<F, T, E>
where
    F: Fn() -> Result<T, E> + Send + Sync,
    E: Into<ProviderError>,
    T: Send + Sync + Clone,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "FallibleProvider")
    }
}

impl<F, T, E> Provider<T> for FallibleProvider<F, T, E>
where
    F: Fn() -> Result<T, E> + Send + Sync,
    E: Into<ProviderError>,
    T: Send + Sync + Clone,
{
    fn try_get(&self) -> Option<T> {
        (self.func)().ok()
    }

    fn fallible_get(&self) -> Result<T, ProviderError> {
        (self.func)().map_err(Into::into)
    }
}

/// Provides methods to map the output of a map to another
#[derive(Clone)]
pub struct Map<T, R, F, P>
where
    T: Send + Sync + Clone,
    R: Send + Sync + Clone,
    F: Fn(T) -> R + Send + Sync,
    P: Provider<T>,
{
    provider: P,
    transform: F,
    _data: PhantomData<fn() -> (T, R)>,
}

impl<T, R, F, P> Debug for Map<T, R, F, P>
where
    F: Fn(T) -> R + Send + Sync,
    P: Provider<T>,
    R: Clone + Send + Sync,
    T: Clone + Send + Sync,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Map<{:?}>", self.provider)
    }
}

impl<T, R, F, P> Provider<R> for Map<T, R, F, P>
where
    T: Send + Sync + Clone,
    R: Send + Sync + Clone,
    F: Fn(T) -> R + Send + Sync,
    P: Provider<T>,
{
    fn missing_message(&self) -> String {
        self.provider.missing_message()
    }

    fn try_get(&self) -> Option<R> {
        self.provider.try_get().map(|v| (self.transform)(v))
    }

    fn fallible_get(&self) -> Result<R, ProviderError> {
        self.provider.fallible_get().map(|v| (self.transform)(v))
    }
}

impl<T, R, F, P> Map<T, R, F, P>
where
    T: Send + Sync + Clone,
    R: Send + Sync + Clone,
    F: Fn(T) -> R + Send + Sync,
    P: Provider<T>,
{
    pub(super) fn new(provider: P, transform: F) -> Self {
        Self {
            provider,
            transform,
            _data: PhantomData,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lazy_evaluation::ProviderExt;
    use std::path::PathBuf;

    #[test]
    fn fallible_provider_surfaces_error() {
        let provider = FallibleProvider::new(|| -> Result<PathBuf, ProviderError> {
            Err(ProviderError::new("build dir not configured"))
        });
        assert_eq!(provider.try_get(), None);
        let err = provider.fallible_get().unwrap_err();
        assert_eq!(err.to_string(), "build dir not configured");
    }

    #[test]
    fn map_keeps_underlying_error() {
        let provider = FallibleProvider::new(|| -> Result<PathBuf, &'static str> {
            Err("no build dir")
        })
        .map(|p| p.join("out"));
        assert_eq!(provider.fallible_get().unwrap_err().message(), "no build dir");
    }
}
