// Security manager configuration

use crate::error::{Result, SecurityError};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::path::Path;
use tracing::{debug, warn};

/// Which configured filter chain to apply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FilterKind {
    Uri,
    #[default]
    Input,
    Output,
}

impl FilterKind {
    /// Canonical configuration key for this chain
    pub fn config_key(&self) -> &'static str {
        match self {
            FilterKind::Uri => "uri_filter",
            FilterKind::Input => "input_filter",
            FilterKind::Output => "output_filter",
        }
    }

    /// Accepts both the snake_case and camelCase spellings
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "uri_filter" | "uriFilter" => Some(FilterKind::Uri),
            "input_filter" | "inputFilter" => Some(FilterKind::Input),
            "output_filter" | "outputFilter" => Some(FilterKind::Output),
            _ => None,
        }
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.config_key())
    }
}

/// Ordered list of filter specifiers.
///
/// Deserializes from a single string, a list of strings or null.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FilterList(Vec<String>);

impl FilterList {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn to_value(&self) -> Value {
        Value::Array(self.0.iter().cloned().map(Value::String).collect())
    }
}

impl<'de> Deserialize<'de> for FilterList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            One(String),
            Many(Vec<String>),
        }

        Ok(match Option::<Repr>::deserialize(deserializer)? {
            None => Self::new(),
            Some(Repr::One(spec)) => Self(vec![spec]),
            Some(Repr::Many(specs)) => Self(specs),
        })
    }
}

impl From<&str> for FilterList {
    fn from(spec: &str) -> Self {
        Self(vec![spec.to_string()])
    }
}

impl From<String> for FilterList {
    fn from(spec: String) -> Self {
        Self(vec![spec])
    }
}

impl From<Vec<String>> for FilterList {
    fn from(specs: Vec<String>) -> Self {
        Self(specs)
    }
}

impl From<Vec<&str>> for FilterList {
    fn from(specs: Vec<&str>) -> Self {
        specs.into_iter().collect()
    }
}

impl From<&[&str]> for FilterList {
    fn from(specs: &[&str]) -> Self {
        specs.iter().copied().collect()
    }
}

impl<const N: usize> From<[&str; N]> for FilterList {
    fn from(specs: [&str; N]) -> Self {
        specs.into_iter().collect()
    }
}

impl<S: Into<String>> FromIterator<S> for FilterList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl<'a> IntoIterator for &'a FilterList {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Security manager configuration.
///
/// The three filter chains default to empty lists; any other key is kept
/// verbatim and can be read back through [`SecurityConfig::get`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Filters applied to request URIs
    #[serde(default, alias = "uriFilter")]
    pub uri_filter: FilterList,

    /// Default filters for input values
    #[serde(default, alias = "inputFilter")]
    pub input_filter: FilterList,

    /// Default filters for output values
    #[serde(default, alias = "outputFilter")]
    pub output_filter: FilterList,

    /// Remaining options, e.g. settings read by a CSRF service
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SecurityConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_uri_filter(mut self, filters: impl Into<FilterList>) -> Self {
        self.uri_filter = filters.into();
        self
    }

    pub fn with_input_filter(mut self, filters: impl Into<FilterList>) -> Self {
        self.input_filter = filters.into();
        self
    }

    pub fn with_output_filter(mut self, filters: impl Into<FilterList>) -> Self {
        self.output_filter = filters.into();
        self
    }

    /// Set an arbitrary option. Filter chain keys are routed to their fields.
    ///
    /// A value that is not a valid filter chain leaves the current chain in
    /// place and is logged; use [`SecurityConfig::try_with_option`] to get
    /// the error instead.
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let key = key.into();
        if let Err(e) = self.set_option(&key, value.into()) {
            warn!(key = %key, error = %e, "Ignoring invalid filter chain option");
        }
        self
    }

    /// Like [`SecurityConfig::with_option`], failing on an invalid filter chain
    pub fn try_with_option(
        mut self,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<Self> {
        self.set_option(&key.into(), value.into())?;
        Ok(self)
    }

    fn set_option(&mut self, key: &str, value: Value) -> Result<()> {
        match FilterKind::from_key(key) {
            Some(kind) => {
                *self.filters_mut(kind) = serde_json::from_value(value)
                    .map_err(|e| SecurityError::Config(format!("invalid {}: {}", kind, e)))?;
            }
            None => {
                self.extra.insert(key.to_string(), value);
            }
        }
        Ok(())
    }

    /// Configured chain for `kind`
    pub fn filters(&self, kind: FilterKind) -> &FilterList {
        match kind {
            FilterKind::Uri => &self.uri_filter,
            FilterKind::Input => &self.input_filter,
            FilterKind::Output => &self.output_filter,
        }
    }

    fn filters_mut(&mut self, kind: FilterKind) -> &mut FilterList {
        match kind {
            FilterKind::Uri => &mut self.uri_filter,
            FilterKind::Input => &mut self.input_filter,
            FilterKind::Output => &mut self.output_filter,
        }
    }

    /// Value stored under `key`; filter chain keys always exist
    pub fn get(&self, key: &str) -> Option<Value> {
        match FilterKind::from_key(key) {
            Some(kind) => Some(self.filters(kind).to_value()),
            None => self.extra.get(key).cloned(),
        }
    }

    /// Build from an already-parsed JSON value
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(Self::default()),
            Value::Object(_) => {
                serde_json::from_value(value).map_err(|e| SecurityError::Config(e.to_string()))
            }
            _ => Err(SecurityError::Config(
                "security configuration must be a table".to_string(),
            )),
        }
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(content)
            .map_err(|e| SecurityError::Config(format!("JSON parse error: {}", e)))?;
        Self::from_value(value)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let toml_value: toml::Value = toml::from_str(content)
            .map_err(|e| SecurityError::Config(format!("TOML parse error: {}", e)))?;
        Self::from_value(serde_json::to_value(toml_value)?)
    }

    /// Load from a `.json` or `.toml` file
    pub fn load_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .map(str::to_lowercase)
            .ok_or_else(|| SecurityError::Config("No file extension found".to_string()))?;

        let content = std::fs::read_to_string(path)?;
        let config = match ext.as_str() {
            "json" => Self::from_json_str(&content)?,
            "toml" => Self::from_toml_str(&content)?,
            other => {
                return Err(SecurityError::Config(format!(
                    "Unsupported format: {}",
                    other
                )));
            }
        };

        debug!(
            path = %path.display(),
            uri_filters = config.uri_filter.len(),
            input_filters = config.input_filter.len(),
            output_filters = config.output_filter.len(),
            "Security configuration loaded"
        );
        Ok(config)
    }
}
