//! Error types for the Joystick client
//!
//! Separates client-side misconfiguration from remote and transport failures.

use thiserror::Error;

/// Boxed error produced by an [`HttpTransport`](crate::transport::HttpTransport).
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

// == Configuration Error Enum ==
/// Raised while building a configuration or a publish payload.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("API key is not provided.")]
    MissingApiKey,

    #[error("The semantic version [{0}] is incorrect.")]
    InvalidSemVer(String),

    /// Negative TTL given to the builder
    #[error("Cache expiration time must be defined as seconds and must be positive.")]
    InvalidCacheTtl(i64),

    #[error("Description is not provided.")]
    MissingDescription,

    /// Trimmed description length outside 1..=50
    #[error("There must be more than 0 and no more than 50 symbols in the description.")]
    InvalidDescriptionLength(usize),

    #[error("Content is not provided.")]
    MissingContent,

    /// Environment variable present but not parsable
    #[error("Invalid value for {name}: {value}")]
    InvalidEnvValue { name: &'static str, value: String },
}

// == Joystick Error Enum ==
/// Unified error type for every client operation.
#[derive(Error, Debug)]
pub enum JoystickError {
    /// Invalid client settings or publish payload
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// Bad call arguments, detected before any network attempt
    #[error("{0}")]
    InvalidArgument(String),

    /// Remote status in [400, 500), carries the status line
    #[error("{0}")]
    ApiBadRequest(String),

    /// Remote status >= 500, carries the status line
    #[error("{0}")]
    ApiServer(String),

    /// Any other failed exchange: unexpected status, empty or malformed body,
    /// transport I/O failure
    #[error("{message}")]
    ApiUnknown {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// Batch read where the service reported errors for some ids
    #[error("{0}")]
    MultipleContents(String),

    /// Content could not be decoded into the caller's type
    #[error("Unable to convert Joystick response to {target}")]
    Decode {
        target: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// Operation not offered by a request variant
    #[error("{0} is not supported by this endpoint")]
    Unsupported(&'static str),
}

impl JoystickError {
    /// Creates an `ApiUnknown` error without an underlying cause.
    pub fn unknown(message: impl Into<String>) -> Self {
        Self::ApiUnknown {
            message: message.into(),
            source: None,
        }
    }

    /// Creates an `ApiUnknown` error wrapping `source`.
    pub fn unknown_with(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::ApiUnknown {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Maps a non-200 status to the matching remote error.
    pub fn from_status(status: u16, status_line: String) -> Self {
        match status {
            500.. => Self::ApiServer(status_line),
            400..=499 => Self::ApiBadRequest(status_line),
            _ => Self::unknown(status_line),
        }
    }
}

// == Result Type Alias ==
/// Convenience Result type for the Joystick client.
pub type Result<T> = std::result::Result<T, JoystickError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_configuration_error_is_transparent() {
        let err = JoystickError::from(ConfigurationError::MissingApiKey);
        assert_eq!(err.to_string(), "API key is not provided.");
    }

    #[test]
    fn test_sem_ver_message_mentions_value() {
        let err = ConfigurationError::InvalidSemVer("0.1".to_string());
        assert!(err.to_string().contains("[0.1]"));
    }

    #[test]
    fn test_from_status_ranges() {
        assert!(matches!(
            JoystickError::from_status(401, "HTTP/1.1 401 Unauthorized".into()),
            JoystickError::ApiBadRequest(_)
        ));
        assert!(matches!(
            JoystickError::from_status(503, "HTTP/1.1 503".into()),
            JoystickError::ApiServer(_)
        ));
        assert!(matches!(
            JoystickError::from_status(204, "HTTP/1.1 204".into()),
            JoystickError::ApiUnknown { source: None, .. }
        ));
    }

    #[test]
    fn test_unknown_with_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset");
        let err = JoystickError::unknown_with("Unable to complete the request", io);
        assert_eq!(err.to_string(), "Unable to complete the request");
        assert!(err.source().is_some());
    }
}
