//! Per-element batch errors
//!
//! Most manager operations accept a batch of inputs so that the backend can
//! optimise bulk queries. A catastrophic failure fails the whole call with an
//! [`Error`](crate::Error), but individual elements may also fail while the
//! rest of the batch succeeds. Those per-element failures are reported to the
//! host as a [`BatchElementError`] through the error callback of the call.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Base of the raw numeric range used for batch element error codes
pub const ERROR_CODE_BASE: u32 = 128;

/// Possible classes of per-element error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u32)]
pub enum ErrorCode {
    /// Fallback for uncommon errors
    Unknown = ERROR_CODE_BASE,

    /// The entity reference is not one known to the manager
    InvalidEntityReference = ERROR_CODE_BASE + 1,

    /// The entity reference belongs to the manager but is malformed for
    /// this particular operation
    MalformedEntityReference = ERROR_CODE_BASE + 2,

    /// The reference is valid but the requested access is not permitted
    EntityAccessError = ERROR_CODE_BASE + 3,

    /// The reference is valid but data for the entity cannot be retrieved
    EntityResolutionError = ERROR_CODE_BASE + 4,

    /// The supplied trait data is invalid for the operation
    InvalidTraitsData = ERROR_CODE_BASE + 5,

    /// The trait data supplied as a preflight hint is invalid
    InvalidPreflightHint = ERROR_CODE_BASE + 6,

    /// The supplied trait set is invalid for the operation
    InvalidTraitSet = ERROR_CODE_BASE + 7,
}

impl ErrorCode {
    /// Every error code, in declaration order
    pub const ALL: [ErrorCode; 8] = [
        ErrorCode::Unknown,
        ErrorCode::InvalidEntityReference,
        ErrorCode::MalformedEntityReference,
        ErrorCode::EntityAccessError,
        ErrorCode::EntityResolutionError,
        ErrorCode::InvalidTraitsData,
        ErrorCode::InvalidPreflightHint,
        ErrorCode::InvalidTraitSet,
    ];

    /// Printable name of the code, as used in exception messages
    pub fn name(self) -> &'static str {
        match self {
            ErrorCode::Unknown => "unknown",
            ErrorCode::InvalidEntityReference => "invalidEntityReference",
            ErrorCode::MalformedEntityReference => "malformedEntityReference",
            ErrorCode::EntityAccessError => "entityAccessError",
            ErrorCode::EntityResolutionError => "entityResolutionError",
            ErrorCode::InvalidTraitsData => "invalidTraitsData",
            ErrorCode::InvalidPreflightHint => "invalidPreflightHint",
            ErrorCode::InvalidTraitSet => "invalidTraitSet",
        }
    }

    /// Raw numeric value of the code
    #[inline]
    pub fn raw(self) -> u32 {
        self as u32
    }
}

impl TryFrom<u32> for ErrorCode {
    type Error = u32;

    fn try_from(raw: u32) -> Result<Self, Self::Error> {
        ErrorCode::ALL
            .iter()
            .copied()
            .find(|code| code.raw() == raw)
            .ok_or(raw)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single failed element of a batch operation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BatchElementError {
    /// Class of error, for control flow
    pub code: ErrorCode,

    /// Human-readable detail
    pub message: String,
}

impl BatchElementError {
    /// Create a new batch element error
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Create a batch element error from a raw numeric code.
    ///
    /// Codes outside the known range become [`ErrorCode::Unknown`], with
    /// the offending value recorded in the message.
    pub fn from_raw(code: u32, message: impl Into<String>) -> Self {
        let message = message.into();
        match ErrorCode::try_from(code) {
            Ok(code) => Self { code, message },
            Err(raw) => Self {
                code: ErrorCode::Unknown,
                message: format!("Invalid BatchElementError. Code: {} Message: {}", raw, message),
            },
        }
    }
}

impl fmt::Display for BatchElementError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}
