use thiserror::Error;

use crate::exception::BatchElementException;

/// Top-level error type for host and manager API calls
///
/// Whole-call failures (bad input, bad configuration, unsupported
/// operations, unexpected plugin failures) each have their own variant.
/// Failures tied to a single element of a batch are carried by
/// [`Error::BatchElement`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Malformed call arguments, detected before the manager is invoked
    #[error("{0}")]
    InputValidation(String),

    /// Invalid or unsupported configuration
    #[error("{0}")]
    Configuration(String),

    /// The manager does not implement the requested operation
    #[error("{0}")]
    NotImplemented(String),

    /// Unexpected failure raised from within a manager implementation
    #[error("{0}")]
    Unhandled(String),

    /// A single element of a batch operation failed
    #[error(transparent)]
    BatchElement(#[from] BatchElementException),
}

/// Result type for host and manager API calls
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Whether this error was caused by invalid input.
    ///
    /// Configuration errors are a refinement of input validation errors.
    pub fn is_input_validation(&self) -> bool {
        matches!(self, Error::InputValidation(_) | Error::Configuration(_))
    }

    /// The batch element exception, if this error carries one
    pub fn as_batch_element(&self) -> Option<&BatchElementException> {
        match self {
            Error::BatchElement(exception) => Some(exception),
            _ => None,
        }
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Unhandled(format!("{:#}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BatchElementError, ElementDetail, ErrorCode};

    #[test]
    fn test_error_display() {
        let errors = vec![
            (Error::InputValidation("bad input".to_string()), "bad input"),
            (Error::Configuration("bad config".to_string()), "bad config"),
            (Error::NotImplemented("not here".to_string()), "not here"),
            (Error::Unhandled("boom".to_string()), "boom"),
        ];

        for (error, expected_msg) in errors {
            assert_eq!(error.to_string(), expected_msg);
        }
    }

    #[test]
    fn test_configuration_is_input_validation() {
        assert!(Error::Configuration("x".to_string()).is_input_validation());
        assert!(Error::InputValidation("x".to_string()).is_input_validation());
        assert!(!Error::Unhandled("x".to_string()).is_input_validation());
        assert!(!Error::NotImplemented("x".to_string()).is_input_validation());
    }

    #[test]
    fn test_batch_element_display_is_exception_message() {
        let exception = BatchElementException::new(
            3,
            BatchElementError::new(ErrorCode::Unknown, "oops"),
            ElementDetail::default(),
        );
        let error: Error = exception.clone().into();

        assert_eq!(error.to_string(), "unknown: oops [index=3]");
        assert_eq!(error.as_batch_element(), Some(&exception));
    }

    #[test]
    fn test_from_anyhow_error() {
        let err = anyhow::anyhow!("connection refused").context("querying asset database");
        let error: Error = err.into();

        match error {
            Error::Unhandled(msg) => {
                assert_eq!(msg, "querying asset database: connection refused");
            }
            _ => panic!("Expected Unhandled variant"),
        }
    }

    #[test]
    fn test_error_clone_and_eq() {
        let original = Error::InputValidation("test".to_string());
        let cloned = original.clone();

        assert_eq!(original, cloned);
        assert_eq!(format!("{:?}", original), format!("{:?}", cloned));
    }
}
