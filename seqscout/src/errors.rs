//! Error types for seqscout.
//!
//! Every failure the engine can report is a validation failure: a bad mode
//! name, an empty word separator, or a regex that does not compile. All of
//! them are raised before the first comparison, so a search either returns
//! a complete result or no result at all.
//!
//! ```rust,ignore
//! match seqscout::find(&items, &sequences, &config) {
//!     Ok(output) => // Process output.values,
//!     Err(SearchError::InvalidPattern { pattern, .. }) => // Report the bad regex,
//!     Err(e) => // Handle other errors
//! }
//! ```
//!
//! Hitting a comparison or result budget is not an error; it shows up as
//! [`crate::results::Termination`] in the search statistics.
use thiserror::Error;

/// Result type for search operations
pub type SearchResult<T> = Result<T, SearchError>;

/// Errors that can occur while preparing or running a search
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Invalid match mode: {0}")]
    InvalidMode(String),
    #[error("Word separator must not be empty")]
    EmptyWordSeparator,
    #[error("Invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        source: regex::Error,
    },
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl SearchError {
    pub fn invalid_mode(mode: impl Into<String>) -> Self {
        Self::InvalidMode(mode.into())
    }

    pub fn invalid_pattern(pattern: impl Into<String>, source: regex::Error) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            source,
        }
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}

impl From<config::ConfigError> for SearchError {
    fn from(err: config::ConfigError) -> Self {
        Self::ConfigError(err.to_string())
    }
}
