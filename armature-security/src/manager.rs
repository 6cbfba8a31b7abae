// Security manager: filter chains, URI cleaning, XSS cleaning, CSRF access

use crate::config::{FilterKind, FilterList, SecurityConfig};
use crate::csrf::{CSRF_SERVICE_KEY, CsrfFactory, CsrfService, SessionProvider};
use crate::error::{Result, SecurityError};
use crate::filter::{FilterHandle, FilterRegistry, FilterResolver};
use crate::html::{self, HtmlSanitizer};
use crate::pattern::CharClassFilter;
use crate::uri::normalize_path;
use crate::value::into_text;
use armature_xss::XssSanitizer;
use once_cell::sync::OnceCell;
use parking_lot::{Mutex, RwLock};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Applies configured filter chains to request and response values.
///
/// Filters are resolved lazily by name and cached for the lifetime of the
/// manager; names that fail to resolve are remembered and used as regex
/// character classes from then on. All caches sit behind locks, so one
/// manager can be shared between request threads.
pub struct SecurityManager {
    config: SecurityConfig,
    resolver: Arc<dyn FilterResolver>,
    html_sanitizer: Option<Arc<dyn HtmlSanitizer>>,
    csrf_factory: Option<Arc<dyn CsrfFactory>>,
    session_provider: Option<Arc<dyn SessionProvider>>,
    filters: RwLock<HashMap<String, FilterHandle>>,
    misses: RwLock<HashSet<String>>,
    patterns: RwLock<HashMap<String, Arc<CharClassFilter>>>,
    cleaned: Mutex<Vec<Value>>,
    csrf: OnceCell<Arc<dyn CsrfService>>,
}

impl SecurityManager {
    /// Manager with the built-in filters and the default HTML sanitizer
    pub fn new(config: SecurityConfig) -> Self {
        Self {
            config,
            resolver: Arc::new(FilterRegistry::with_builtins()),
            html_sanitizer: Some(Arc::new(XssSanitizer::new())),
            csrf_factory: None,
            session_provider: None,
            filters: RwLock::new(HashMap::new()),
            misses: RwLock::new(HashSet::new()),
            patterns: RwLock::new(HashMap::new()),
            cleaned: Mutex::new(Vec::new()),
            csrf: OnceCell::new(),
        }
    }

    /// Replace the filter resolver
    pub fn with_resolver(mut self, resolver: impl FilterResolver + 'static) -> Self {
        self.resolver = Arc::new(resolver);
        self
    }

    /// Share a resolver with other managers
    pub fn with_shared_resolver(mut self, resolver: Arc<dyn FilterResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn with_html_sanitizer(mut self, sanitizer: impl HtmlSanitizer + 'static) -> Self {
        self.html_sanitizer = Some(Arc::new(sanitizer));
        self
    }

    /// Remove the HTML sanitizer; `xss_clean` then fails
    pub fn without_html_sanitizer(mut self) -> Self {
        self.html_sanitizer = None;
        self
    }

    pub fn with_csrf_factory(mut self, factory: impl CsrfFactory + 'static) -> Self {
        self.csrf_factory = Some(Arc::new(factory));
        self
    }

    pub fn with_session_provider(mut self, provider: impl SessionProvider + 'static) -> Self {
        self.session_provider = Some(Arc::new(provider));
        self
    }

    pub fn config(&self) -> &SecurityConfig {
        &self.config
    }

    pub fn html_sanitizer(&self) -> Option<Arc<dyn HtmlSanitizer>> {
        self.html_sanitizer.clone()
    }

    /// Configured value for `key`, or `default`
    pub fn get_config(&self, key: &str, default: Value) -> Value {
        self.config.get(key).unwrap_or(default)
    }

    /// The CSRF service, created on first use.
    ///
    /// Fails with [`SecurityError::ServiceUnavailable`] when no factory or
    /// no session provider was installed. A failed construction is not
    /// cached; the next call tries again.
    pub fn csrf(&self) -> Result<Arc<dyn CsrfService>> {
        self.csrf
            .get_or_try_init(|| {
                let factory = self
                    .csrf_factory
                    .as_ref()
                    .ok_or_else(|| SecurityError::ServiceUnavailable(CSRF_SERVICE_KEY.to_string()))?;
                let sessions = self
                    .session_provider
                    .as_ref()
                    .ok_or_else(|| SecurityError::ServiceUnavailable("session".to_string()))?;

                let session = sessions.session()?;
                let service = factory.create(CSRF_SERVICE_KEY, &self.config, session)?;
                debug!(service = CSRF_SERVICE_KEY, "CSRF service created");
                Ok(service)
            })
            .cloned()
    }

    /// Clean a request URI with the `uri_filter` chain.
    ///
    /// In strict mode dot runs followed by `/` and repeated `/` are
    /// collapsed first.
    pub fn clean_uri(&self, uri: &str, strict: bool) -> Result<String> {
        let uri = if strict {
            normalize_path(uri)
        } else {
            uri.to_string()
        };

        let cleaned = self.clean(Value::String(uri), FilterKind::Uri)?;
        Ok(into_text(cleaned))
    }

    /// Apply the configured chain for `kind`
    pub fn clean(&self, value: Value, kind: FilterKind) -> Result<Value> {
        self.apply(value, self.config.filters(kind))
    }

    /// Apply an explicit chain, in order
    pub fn clean_with(&self, value: Value, filters: impl Into<FilterList>) -> Result<Value> {
        self.apply(value, &filters.into())
    }

    fn apply(&self, mut value: Value, filters: &FilterList) -> Result<Value> {
        for spec in filters {
            if spec.is_empty() {
                continue;
            }

            let handle = match self.handle_for(spec)? {
                Some(handle) => handle,
                None => FilterHandle::RawPattern(self.pattern_for(spec)?),
            };

            trace!(filter = %spec, kind = handle.kind(), "Applying filter");
            value = handle.apply(value)?;
        }

        Ok(value)
    }

    fn handle_for(&self, spec: &str) -> Result<Option<FilterHandle>> {
        let name = spec.to_lowercase();

        if let Some(handle) = self.filters.read().get(&name) {
            trace!(filter = %name, "Filter cache hit");
            return Ok(Some(handle.clone()));
        }
        if self.misses.read().contains(&name) {
            return Ok(None);
        }

        match self.resolver.resolve(&name, self)? {
            Some(handle) => {
                // Another thread may have resolved the same name meanwhile; keep the first.
                let handle = self
                    .filters
                    .write()
                    .entry(name.clone())
                    .or_insert(handle)
                    .clone();
                debug!(filter = %name, kind = handle.kind(), "Filter resolved and cached");
                Ok(Some(handle))
            }
            None => {
                debug!(filter = %name, "Filter not resolvable, using it as a character class");
                self.misses.write().insert(name);
                Ok(None)
            }
        }
    }

    fn pattern_for(&self, spec: &str) -> Result<Arc<CharClassFilter>> {
        if let Some(pattern) = self.patterns.read().get(spec) {
            return Ok(pattern.clone());
        }

        let pattern = Arc::new(CharClassFilter::new(spec)?);
        Ok(self
            .patterns
            .write()
            .entry(spec.to_string())
            .or_insert(pattern)
            .clone())
    }

    /// Tag `input` as already cleaned
    pub fn mark_clean(&self, input: Value) {
        self.cleaned.lock().push(input);
    }

    /// Whether an identical value (same type and content) was tagged
    pub fn is_cleaned(&self, input: &Value) -> bool {
        self.cleaned.lock().contains(input)
    }

    /// Strip markup from every leaf, coercing non-string scalars to strings
    pub fn strip_tags(&self, value: Value) -> Value {
        html::strip_tags(value)
    }

    /// Sanitize every string leaf as HTML in safe mode
    pub fn xss_clean(&self, value: Value) -> Result<Value> {
        let Some(sanitizer) = self.html_sanitizer.as_deref() else {
            warn!("xss_clean called without an HTML sanitizer");
            return Err(SecurityError::SanitizerUnavailable);
        };
        html::xss_clean_with(sanitizer, value)
    }

    /// Lowercase names with a cached handle, sorted
    pub fn loaded_filters(&self) -> Vec<String> {
        let mut names: Vec<String> = self.filters.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Lowercase names that failed to resolve, sorted
    pub fn missed_filters(&self) -> Vec<String> {
        let mut names: Vec<String> = self.misses.read().iter().cloned().collect();
        names.sort();
        names
    }
}

impl Default for SecurityManager {
    fn default() -> Self {
        Self::new(SecurityConfig::default())
    }
}

impl fmt::Debug for SecurityManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecurityManager")
            .field("config", &self.config)
            .field("loaded_filters", &self.loaded_filters())
            .field("missed_filters", &self.missed_filters())
            .field("html_sanitizer", &self.html_sanitizer.is_some())
            .field("csrf", &self.csrf.get().is_some())
            .finish()
    }
}
