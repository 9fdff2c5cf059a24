//! Lazy evaluation lets a producer defer deciding where its output lives until a consumer asks.
//!
//! The main driving trait that allows for this is [`Provider`](Provider). Objects that
//! implement this trait can try to provide a value of that type. A producer's provider is
//! wrapped in a [`Memoized`](memoized::Memoized) provider when declared, so it is evaluated at
//! most once no matter how many consumers read it.
//!
//! ```
//! # use std::path::PathBuf;
//! use stagehand_core::lazy_evaluation::{Provider, ProviderExt};
//! use stagehand_core::provider;
//!
//! let build_dir = provider!(|| PathBuf::from("/build"));
//! let specs = build_dir.map(|dir| dir.join("restResources"));
//! assert_eq!(specs.try_get(), Some(PathBuf::from("/build/restResources")));
//! ```

pub mod memoized;
pub mod providers;

use crate::lazy_evaluation::providers::Map;
pub use memoized::Memoized;
use std::error::Error;
use std::fmt::Debug;
use std::io;
use std::path::PathBuf;

/// The provider trait represents an object that can produce a value on demand.
///
/// For convenience, several types from the default library implement this trait.
/// - `for<T> Option<T> : Provider<T>`
/// - `PathBuf : Provider<PathBuf>`
pub trait Provider<T: Clone + Send + Sync>: Send + Sync + Debug {
    /// The missing message for this provider
    fn missing_message(&self) -> String {
        String::from("Provider has no value set")
    }

    /// Try to get a value from the provider.
    ///
    /// Will return `Some(v)` if value `v` is available, otherwise `None` is returned.
    ///
    /// # Example
    /// ```
    /// # use stagehand_core::lazy_evaluation::Provider;
    /// use stagehand_core::provider;
    /// let prop = provider!(|| 10);
    /// assert_eq!(prop.try_get(), Some(10));
    ///
    /// // options implement provider
    /// let prop = Option::<usize>::None;
    /// assert_eq!(prop.try_get(), None);
    /// ```
    fn try_get(&self) -> Option<T>;

    /// Tries to get a value from this provider, returning an error if not available.
    ///
    /// The error's message is usually specified by the `missing_message()` method.
    fn fallible_get(&self) -> Result<T, ProviderError> {
        self.try_get()
            .ok_or_else(|| ProviderError::new(self.missing_message()))
    }
}

assert_obj_safe!(Provider<()>);

/// Provides extensions that are not object safe to the Provider trait.
pub trait ProviderExt<T: Clone + Send + Sync>: Provider<T> + Sized {
    /// Creates a provider that can map the output of one provider into some other value.
    ///
    /// `transform`: `fn(T) -> R`
    fn map<R, F>(self, transform: F) -> Map<T, R, F, Self>
    where
        R: Send + Sync + Clone,
        F: Fn(T) -> R + Send + Sync,
    {
        Map::new(self, transform)
    }
}

impl<P, T> ProviderExt<T> for P
where
    T: Clone + Send + Sync,
    P: Provider<T>,
{
}

impl<T: Clone + Send + Sync, P: Provider<T> + ?Sized> Provider<T> for Box<P> {
    fn missing_message(&self) -> String {
        (**self).missing_message()
    }

    fn try_get(&self) -> Option<T> {
        (**self).try_get()
    }

    fn fallible_get(&self) -> Result<T, ProviderError> {
        (**self).fallible_get()
    }
}

impl Provider<PathBuf> for PathBuf {
    fn try_get(&self) -> Option<PathBuf> {
        Some(self.clone())
    }
}

impl<T: Send + Sync + Clone + Debug> Provider<T> for Option<T> {
    fn try_get(&self) -> Option<T> {
        self.clone()
    }
}

/// A value could not be provided
#[derive(Debug, thiserror::Error)]
#[error("{}", message)]
pub struct ProviderError {
    message: String,
    #[source]
    source: Option<Box<dyn Error + Send + Sync>>,
}

impl ProviderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Create a provider error caused by some other error
    pub fn with_source<E>(message: impl Into<String>, source: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<io::Error> for ProviderError {
    fn from(e: io::Error) -> Self {
        let message = e.to_string();
        Self::with_source(message, e)
    }
}

impl From<String> for ProviderError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<&str> for ProviderError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}
