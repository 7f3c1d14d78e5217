//! Exception message construction
//!
//! Every [`BatchElementException`](crate::BatchElementException) displays
//! the message built here, so the format is the same whichever operation
//! raised it:
//!
//! ```text
//! <code name>: <message> [index=<n>] [access=<name>] [entity=<ref>]
//! ```
//!
//! The message is dropped when empty. The access and entity segments are
//! dropped entirely when unavailable.

use crate::{Access, BatchElementError, EntityReference, ErrorCode};

/// Printable name of an error code
pub fn error_code_name(code: ErrorCode) -> &'static str {
    code.name()
}

/// Printable name of an access mode
pub fn access_name(access: Access) -> &'static str {
    access.name()
}

/// Build the message for a failed batch element
pub fn create_batch_element_exception_message(
    error: &BatchElementError,
    index: usize,
    entity_reference: Option<&EntityReference>,
    access: Option<Access>,
) -> String {
    let mut message = format!("{}:", error_code_name(error.code));

    if !error.message.is_empty() {
        message.push(' ');
        message.push_str(&error.message);
    }

    message.push_str(&format!(" [index={}]", index));

    if let Some(access) = access {
        message.push_str(&format!(" [access={}]", access_name(access)));
    }

    if let Some(entity_reference) = entity_reference {
        message.push_str(&format!(" [entity={}]", entity_reference));
    }

    message
}

#[cfg(test)]
mod tests {
    use super::*;

    fn error(code: ErrorCode, message: &str) -> BatchElementError {
        BatchElementError::new(code, message)
    }

    #[test]
    fn test_full_message() {
        let reference = EntityReference::new("testReference");
        let message = create_batch_element_exception_message(
            &error(ErrorCode::MalformedEntityReference, "Error Message"),
            0,
            Some(&reference),
            Some(Access::Read),
        );

        assert_eq!(
            message,
            "malformedEntityReference: Error Message [index=0] [access=read] [entity=testReference]"
        );
    }

    #[test]
    fn test_optional_segments_are_omitted() {
        let reference = EntityReference::new("asset://a");
        let e = error(ErrorCode::EntityResolutionError, "gone");

        assert_eq!(
            create_batch_element_exception_message(&e, 4, None, None),
            "entityResolutionError: gone [index=4]"
        );
        assert_eq!(
            create_batch_element_exception_message(&e, 4, None, Some(Access::Write)),
            "entityResolutionError: gone [index=4] [access=write]"
        );
        assert_eq!(
            create_batch_element_exception_message(&e, 4, Some(&reference), None),
            "entityResolutionError: gone [index=4] [entity=asset://a]"
        );
    }

    #[test]
    fn test_empty_message_is_omitted() {
        let message = create_batch_element_exception_message(
            &error(ErrorCode::InvalidTraitSet, ""),
            2,
            None,
            Some(Access::CreateRelated),
        );

        assert_eq!(message, "invalidTraitSet: [index=2] [access=createRelated]");
    }

    #[test]
    fn test_formatting_is_deterministic() {
        let reference = EntityReference::new("r");
        let e = error(ErrorCode::Unknown, "x");
        let first = create_batch_element_exception_message(&e, 1, Some(&reference), Some(Access::Unknown));
        let second = create_batch_element_exception_message(&e, 1, Some(&reference), Some(Access::Unknown));

        assert_eq!(first, second);
        assert_eq!(first, "unknown: x [index=1] [access=unknown] [entity=r]");
    }
}
