use thiserror::Error;

/// Errors raised while parsing or encoding feed data
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FeedError {
    /// A field could not be interpreted (bad date, non-numeric value, short row)
    #[error("Parse error in field '{field}' ('{raw}'): {reason}")]
    ParseError {
        field: String,
        raw: String,
        reason: String,
    },

    /// The configured value column cannot be resolved against the header
    #[error("Configuration error for column '{column}': {reason}")]
    ConfigurationError { column: String, reason: String },

    /// JSON or binary encoding/decoding failed
    #[error("Serialization error: {message}")]
    SerializationError { message: String },

    /// IO error while reading a feed
    #[error("IO error: {message}")]
    IoError { message: String },
}

/// Result type alias for feed operations
pub type FeedResult<T> = Result<T, FeedError>;

impl FeedError {
    /// Create a parse error for a field and its raw text
    pub fn parse<S1, S2, S3>(field: S1, raw: S2, reason: S3) -> Self
    where
        S1: Into<String>,
        S2: Into<String>,
        S3: Into<String>,
    {
        Self::ParseError {
            field: field.into(),
            raw: raw.into(),
            reason: reason.into(),
        }
    }

    /// Create a configuration error naming the offending column
    pub fn configuration<S1: Into<String>, S2: Into<String>>(column: S1, reason: S2) -> Self {
        Self::ConfigurationError {
            column: column.into(),
            reason: reason.into(),
        }
    }

    /// Create a serialization error with message
    pub fn serialization<S: Into<String>>(message: S) -> Self {
        Self::SerializationError {
            message: message.into(),
        }
    }

    /// Whether a caller can skip the offending line and keep reading
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::ParseError { .. } => true,
            Self::ConfigurationError { .. } => false,
            Self::SerializationError { .. } => false,
            Self::IoError { .. } => false,
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::ParseError { .. } => ErrorSeverity::Warning,
            Self::ConfigurationError { .. } => ErrorSeverity::Error,
            Self::SerializationError { .. } => ErrorSeverity::Error,
            Self::IoError { .. } => ErrorSeverity::Critical,
        }
    }
}

/// Error severity levels for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Warning,
    Error,
    Critical,
}

impl ErrorSeverity {
    /// Convert to tracing level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            Self::Warning => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
            Self::Critical => tracing::Level::ERROR,
        }
    }
}

impl From<serde_json::Error> for FeedError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError {
            message: err.to_string(),
        }
    }
}

impl From<bincode::Error> for FeedError {
    fn from(err: bincode::Error) -> Self {
        Self::SerializationError {
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for FeedError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = FeedError::parse("date", "2021-13-45", "not a date");
        assert_eq!(
            err.to_string(),
            "Parse error in field 'date' ('2021-13-45'): not a date"
        );
        assert!(err.is_recoverable());
        assert_eq!(err.severity(), ErrorSeverity::Warning);

        let err = FeedError::configuration("adj. close", "column not found in header");
        assert_eq!(
            err.to_string(),
            "Configuration error for column 'adj. close': column not found in header"
        );
        assert!(!err.is_recoverable());
        assert_eq!(err.severity(), ErrorSeverity::Error);
    }

    #[test]
    fn test_error_conversions() {
        let json_err = serde_json::from_str::<i32>("invalid json").unwrap_err();
        let feed_err: FeedError = json_err.into();
        assert!(matches!(feed_err, FeedError::SerializationError { .. }));

        let bin_err = bincode::deserialize::<String>(&[0xff]).unwrap_err();
        let feed_err: FeedError = bin_err.into();
        assert!(matches!(feed_err, FeedError::SerializationError { .. }));

        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.csv");
        let feed_err: FeedError = io_err.into();
        assert!(matches!(feed_err, FeedError::IoError { .. }));
        assert_eq!(feed_err.severity(), ErrorSeverity::Critical);
    }

    #[test]
    fn test_severity_levels() {
        assert_eq!(ErrorSeverity::Warning.to_tracing_level(), tracing::Level::WARN);
        assert_eq!(ErrorSeverity::Error.to_tracing_level(), tracing::Level::ERROR);
        assert_eq!(ErrorSeverity::Critical.to_tracing_level(), tracing::Level::ERROR);
    }
}
