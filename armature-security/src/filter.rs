//! Filter handles and resolution.
//!
//! A filter specifier is resolved once into a [`FilterHandle`] and the
//! handle is cached by the manager. Resolution goes through a
//! [`FilterResolver`]; [`FilterRegistry`] is the default one.

use crate::builtin;
use crate::error::Result;
use crate::manager::SecurityManager;
use crate::pattern::CharClassFilter;
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// A filter object exposing a `clean` operation
pub trait Cleanable: Send + Sync {
    fn clean(&self, value: Value) -> Result<Value>;
}

/// A plain function filter
pub type FilterFn = dyn Fn(Value) -> Result<Value> + Send + Sync;

/// Resolved filter, dispatched on its shape
#[derive(Clone)]
pub enum FilterHandle {
    /// Object with a `clean` operation
    Method(Arc<dyn Cleanable>),
    /// Function of one value
    Callable(Arc<FilterFn>),
    /// Character class stripped from every string
    RawPattern(Arc<CharClassFilter>),
}

impl FilterHandle {
    pub fn method(filter: impl Cleanable + 'static) -> Self {
        FilterHandle::Method(Arc::new(filter))
    }

    pub fn callable<F>(filter: F) -> Self
    where
        F: Fn(Value) -> Result<Value> + Send + Sync + 'static,
    {
        FilterHandle::Callable(Arc::new(filter))
    }

    pub fn pattern(class: &str) -> Result<Self> {
        Ok(FilterHandle::RawPattern(Arc::new(CharClassFilter::new(class)?)))
    }

    /// Run the filter. Errors from the filter itself are returned as-is.
    pub fn apply(&self, value: Value) -> Result<Value> {
        match self {
            FilterHandle::Method(filter) => filter.clean(value),
            FilterHandle::Callable(filter) => filter(value),
            FilterHandle::RawPattern(pattern) => pattern.apply(value),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            FilterHandle::Method(_) => "method",
            FilterHandle::Callable(_) => "callable",
            FilterHandle::RawPattern(_) => "pattern",
        }
    }
}

impl fmt::Debug for FilterHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterHandle::Method(_) => f.write_str("Method(..)"),
            FilterHandle::Callable(_) => f.write_str("Callable(..)"),
            FilterHandle::RawPattern(pattern) => {
                f.debug_tuple("RawPattern").field(&pattern.class()).finish()
            }
        }
    }
}

/// Resolves a lowercase filter name into a handle.
///
/// `Ok(None)` means the name is not a known filter; the manager then treats
/// the specifier as a character class and never asks again. Any `Err` is
/// propagated to the caller of `clean`.
pub trait FilterResolver: Send + Sync {
    fn resolve(&self, name: &str, manager: &SecurityManager) -> Result<Option<FilterHandle>>;
}

impl<F> FilterResolver for F
where
    F: Fn(&str, &SecurityManager) -> Result<Option<FilterHandle>> + Send + Sync,
{
    fn resolve(&self, name: &str, manager: &SecurityManager) -> Result<Option<FilterHandle>> {
        self(name, manager)
    }
}

/// Builds a handle for a registered name
pub type FilterFactory = dyn Fn(&SecurityManager) -> Result<FilterHandle> + Send + Sync;

/// Name → factory map used as the default resolver
pub struct FilterRegistry {
    factories: RwLock<HashMap<String, Arc<FilterFactory>>>,
}

impl FilterRegistry {
    /// Empty registry: every name misses
    pub fn new() -> Self {
        Self {
            factories: RwLock::new(HashMap::new()),
        }
    }

    /// Registry preloaded with `htmlentities`, `strip_tags`, `xss_clean` and `xss`
    pub fn with_builtins() -> Self {
        let registry = Self::new();
        builtin::register(&registry);
        registry
    }

    /// Register a factory. Names are case-insensitive.
    ///
    /// A manager caches misses, so a name registered after a manager has
    /// already failed to resolve it stays a character class for that manager.
    pub fn register<F>(&self, name: &str, factory: F)
    where
        F: Fn(&SecurityManager) -> Result<FilterHandle> + Send + Sync + 'static,
    {
        let name = name.to_lowercase();
        debug!(filter = %name, "Filter factory registered");
        self.factories.write().insert(name, Arc::new(factory));
    }

    /// Register a shared filter object
    pub fn register_cleanable(&self, name: &str, filter: impl Cleanable + 'static) {
        let handle = FilterHandle::method(filter);
        self.register(name, move |_| Ok(handle.clone()));
    }

    /// Register a function filter
    pub fn register_fn<F>(&self, name: &str, filter: F)
    where
        F: Fn(Value) -> Result<Value> + Send + Sync + 'static,
    {
        let handle = FilterHandle::callable(filter);
        self.register(name, move |_| Ok(handle.clone()));
    }

    /// Alias a name to a character class
    pub fn register_pattern(&self, name: &str, class: &str) -> Result<()> {
        let handle = FilterHandle::pattern(class)?;
        self.register(name, move |_| Ok(handle.clone()));
        Ok(())
    }

    pub fn has(&self, name: &str) -> bool {
        self.factories.read().contains_key(&name.to_lowercase())
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.factories.read().keys().cloned().collect();
        names.sort();
        names
    }
}

impl Default for FilterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FilterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterRegistry")
            .field("filters", &self.names())
            .finish()
    }
}

impl FilterResolver for FilterRegistry {
    fn resolve(&self, name: &str, manager: &SecurityManager) -> Result<Option<FilterHandle>> {
        let factory = self.factories.read().get(name).cloned();
        match factory {
            Some(factory) => factory(manager).map(Some),
            None => Ok(None),
        }
    }
}
