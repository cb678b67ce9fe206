//! Error types for the table reconstruction library.
//!
//! Only configuration and input problems are errors. A table whose boundaries
//! cannot be found, or a token that cannot be placed in any column, is an
//! expected outcome and is reported through logging and the returned values.

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while building rules or loading inputs.
#[derive(Debug, thiserror::Error)]
#[allow(clippy::enum_variant_names)] // "Invalid" prefix is intentional for clarity
pub enum Error {
    /// A rule pattern is not a valid regular expression
    #[error("Invalid pattern for rule '{label}': {source}")]
    InvalidPattern {
        /// Label of the offending rule
        label: String,
        /// Underlying regex error
        #[source]
        source: regex::Error,
    },

    /// A rule definition is structurally wrong (unknown section type, bad anchor...)
    #[error("Invalid rule '{label}': {reason}")]
    InvalidRule {
        /// Label of the offending rule
        label: String,
        /// Reason for rejection
        reason: String,
    },

    /// A configuration value is out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Two tokens were placed at the same grid position
    #[error("Duplicate grid position ({x}, {y})")]
    DuplicatePosition {
        /// X bucket
        x: i64,
        /// Y bucket
        y: i64,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON decoding or encoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
