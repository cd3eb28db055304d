use thiserror::Error;

/// Errors raised by the dataspot library.
#[derive(Debug, Error)]
pub enum DataspotError {
    /// Input failed validation (bad field list, malformed option values).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Input data could not be interpreted as records.
    #[error("Data error: {0}")]
    Data(String),

    /// A query or pattern filter is invalid.
    #[error("Query error: {0}")]
    Query(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid regex '{pattern}': {source}")]
    Regex {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

impl DataspotError {
    pub fn query(message: impl Into<String>) -> Self {
        DataspotError::Query(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        DataspotError::Validation(message.into())
    }

    pub fn data(message: impl Into<String>) -> Self {
        DataspotError::Data(message.into())
    }

    /// True for errors caused by a bad query or filter value.
    pub fn is_query_error(&self) -> bool {
        matches!(self, DataspotError::Query(_) | DataspotError::Regex { .. })
    }
}

pub type Result<T> = std::result::Result<T, DataspotError>;
