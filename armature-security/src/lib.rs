//! Input/output security filtering for Armature.
//!
//! A [`SecurityManager`] applies ordered chains of named filters to request
//! URIs, input values and output values. A filter name is resolved once
//! through a [`FilterResolver`] and cached; a name that does not resolve is
//! treated as a regex character class whose matches are removed from every
//! string.
//!
//! # Example
//!
//! ```
//! use armature_security::{FilterKind, SecurityConfig, SecurityManager};
//! use serde_json::json;
//!
//! let config = SecurityConfig::new()
//!     .with_uri_filter("<>")
//!     .with_input_filter(["strip_tags", "htmlentities"]);
//! let security = SecurityManager::new(config);
//!
//! assert_eq!(security.clean_uri("/a/../<b>", true).unwrap(), "/a/b");
//!
//! let cleaned = security
//!     .clean(json!({ "name": "<b>Tom & Jerry</b>" }), FilterKind::Input)
//!     .unwrap();
//! assert_eq!(cleaned, json!({ "name": "Tom &amp; Jerry" }));
//! ```
//!
//! Custom filters are registered on a [`FilterRegistry`]:
//!
//! ```
//! use armature_security::{FilterRegistry, SecurityManager};
//! use serde_json::{json, Value};
//!
//! let registry = FilterRegistry::with_builtins();
//! registry.register_fn("trim", |value| {
//!     Ok(match value {
//!         Value::String(s) => Value::String(s.trim().to_string()),
//!         other => other,
//!     })
//! });
//!
//! let security = SecurityManager::default().with_resolver(registry);
//! assert_eq!(security.clean_with(json!("  x  "), "TRIM").unwrap(), json!("x"));
//! ```

pub mod builtin;
pub mod config;
pub mod csrf;
pub mod error;
pub mod filter;
pub mod html;
pub mod manager;
pub mod pattern;
pub mod uri;
pub mod value;

pub use config::{FilterKind, FilterList, SecurityConfig};
pub use csrf::{CSRF_SERVICE_KEY, CsrfFactory, CsrfService, Session, SessionProvider};
pub use error::{Result, SecurityError};
pub use filter::{Cleanable, FilterFactory, FilterFn, FilterHandle, FilterRegistry, FilterResolver};
pub use html::{HtmlSanitizer, XSS_CLEAN_OPTIONS};
pub use manager::SecurityManager;
pub use pattern::CharClassFilter;

pub use armature_xss::{SanitizeOptions, XssSanitizer};
