//! Error types for the clareia-core library.

use thiserror::Error;

/// Main error type for the clareia library.
#[derive(Error, Debug)]
pub enum ClareiaError {
    /// Statement extraction error (any pipeline stage).
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by the extraction pipeline stages.
///
/// Every stage returns its own variant unchanged; nothing in the pipeline
/// converts one kind into another or replaces it with demo data.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// The service could not be reached (connection failure, timeout).
    #[error("transport error: {0}")]
    Transport(String),

    /// The service answered with a non-success HTTP status.
    #[error("service returned HTTP {status}: {body}")]
    Service { status: u16, body: String },

    /// The response envelope lacks `candidates[0].content.parts[0].text`.
    #[error("malformed response envelope: {0}")]
    MalformedEnvelope(String),

    /// No JSON-like span was found in the reply text.
    #[error("no JSON object found in service reply")]
    NoJsonFound,

    /// A JSON span was found but is not valid JSON.
    #[error("invalid JSON in service reply: {0}")]
    JsonParse(String),

    /// Valid JSON that is missing required top-level fields.
    #[error("schema validation failed: {0}")]
    SchemaValidation(String),
}

impl ExtractionError {
    /// Whether a retry of the same request could succeed.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// HTTP status for service errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Service { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Errors related to configuration loading and resolution.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read or written.
    #[error("failed to access config file: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration file is not valid JSON for the config schema.
    #[error("invalid config file: {0}")]
    Parse(String),

    /// No extraction service endpoint was configured.
    #[error("no extraction service endpoint configured (set service.endpoint or {0})")]
    MissingEndpoint(String),

    /// The credential environment variable is unset or empty.
    #[error("missing API credential: environment variable {0} is not set")]
    MissingCredential(String),

    /// A value is outside its accepted range.
    #[error("invalid value for {field}: {reason}")]
    Invalid { field: String, reason: String },
}

/// Result type for the clareia library.
pub type Result<T> = std::result::Result<T, ClareiaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_error_display() {
        let err = ExtractionError::Service {
            status: 429,
            body: "quota exceeded".to_string(),
        };
        assert_eq!(err.to_string(), "service returned HTTP 429: quota exceeded");
        assert_eq!(err.status(), Some(429));
        assert!(!err.is_transport());
    }

    #[test]
    fn test_extraction_error_converts() {
        let err: ClareiaError = ExtractionError::NoJsonFound.into();
        assert!(matches!(err, ClareiaError::Extraction(ExtractionError::NoJsonFound)));
    }
}
