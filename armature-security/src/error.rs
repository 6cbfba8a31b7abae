use thiserror::Error;

#[derive(Error, Debug)]
pub enum SecurityError {
    #[error("Invalid filter pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Filter '{filter}' failed: {message}")]
    FilterFailed { filter: String, message: String },

    #[error("Failed to resolve filter '{filter}': {message}")]
    Resolution { filter: String, message: String },

    #[error("No HTML sanitizer is installed; xss_clean cannot run")]
    SanitizerUnavailable,

    #[error("Service not available: {0}")]
    ServiceUnavailable(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("XSS error: {0}")]
    Xss(#[from] armature_xss::XssError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SecurityError {
    /// Error for a filter that ran and failed.
    pub fn filter_failed(filter: impl Into<String>, message: impl Into<String>) -> Self {
        Self::FilterFailed {
            filter: filter.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SecurityError>;
