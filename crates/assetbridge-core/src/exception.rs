//! Batch element exceptions
//!
//! When a host asks for exceptions rather than per-element results, the
//! first [`BatchElementError`] of a batch is converted into a
//! [`BatchElementException`]. The conversion is done in one place,
//! [`BatchElementException::new`], which attaches whatever context the
//! calling operation knows about the failed element.

use std::fmt;

use crate::message::create_batch_element_exception_message;
use crate::{Access, BatchElementError, EntityReference, ErrorCode, TraitSet, TraitsData};

/// Context known about one element of a batch
///
/// Every field is optional since each operation knows different things
/// about its inputs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementDetail {
    /// Reference the element relates to
    pub entity_reference: Option<EntityReference>,
    /// Access mode of the operation
    pub access: Option<Access>,
    /// Trait set involved in the element
    pub trait_set: Option<TraitSet>,
    /// Trait data involved in the element
    pub traits_data: Option<TraitsData>,
}

impl ElementDetail {
    /// Attach an entity reference
    pub fn with_entity_reference(mut self, entity_reference: EntityReference) -> Self {
        self.entity_reference = Some(entity_reference);
        self
    }

    /// Attach an access mode
    pub fn with_access(mut self, access: impl Into<Access>) -> Self {
        self.access = Some(access.into());
        self
    }

    /// Attach a trait set
    pub fn with_trait_set(mut self, trait_set: TraitSet) -> Self {
        self.trait_set = Some(trait_set);
        self
    }

    /// Attach trait data
    pub fn with_traits_data(mut self, traits_data: TraitsData) -> Self {
        self.traits_data = Some(traits_data);
        self
    }
}

/// Extra data carried by an exception, chosen by its error code
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ExceptionPayload {
    /// Nothing beyond the common fields
    #[default]
    None,
    /// The trait set that was rejected
    TraitSet(TraitSet),
    /// The trait data that was rejected
    TraitsData(TraitsData),
}

/// Kind of a batch element exception, one per error code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BatchElementExceptionKind {
    /// [`ErrorCode::Unknown`]
    Unknown,
    /// [`ErrorCode::InvalidEntityReference`]
    InvalidEntityReference,
    /// [`ErrorCode::MalformedEntityReference`]
    MalformedEntityReference,
    /// [`ErrorCode::EntityAccessError`]
    EntityAccessError,
    /// [`ErrorCode::EntityResolutionError`]
    EntityResolutionError,
    /// [`ErrorCode::InvalidTraitsData`]
    InvalidTraitsData,
    /// [`ErrorCode::InvalidPreflightHint`]
    InvalidPreflightHint,
    /// [`ErrorCode::InvalidTraitSet`]
    InvalidTraitSet,
}

impl BatchElementExceptionKind {
    /// Type name of the exception kind
    pub fn name(self) -> &'static str {
        match self {
            Self::Unknown => "UnknownBatchElementException",
            Self::InvalidEntityReference => "InvalidEntityReferenceBatchElementException",
            Self::MalformedEntityReference => "MalformedEntityReferenceBatchElementException",
            Self::EntityAccessError => "EntityAccessErrorBatchElementException",
            Self::EntityResolutionError => "EntityResolutionErrorBatchElementException",
            Self::InvalidTraitsData => "InvalidTraitsDataBatchElementException",
            Self::InvalidPreflightHint => "InvalidPreflightHintBatchElementException",
            Self::InvalidTraitSet => "InvalidTraitSetBatchElementException",
        }
    }

    /// Whether the kind is about the entity reference itself
    pub fn is_entity_reference_error(self) -> bool {
        matches!(
            self,
            Self::InvalidEntityReference
                | Self::MalformedEntityReference
                | Self::EntityAccessError
                | Self::EntityResolutionError
        )
    }
}

impl From<ErrorCode> for BatchElementExceptionKind {
    fn from(code: ErrorCode) -> Self {
        match code {
            ErrorCode::Unknown => Self::Unknown,
            ErrorCode::InvalidEntityReference => Self::InvalidEntityReference,
            ErrorCode::MalformedEntityReference => Self::MalformedEntityReference,
            ErrorCode::EntityAccessError => Self::EntityAccessError,
            ErrorCode::EntityResolutionError => Self::EntityResolutionError,
            ErrorCode::InvalidTraitsData => Self::InvalidTraitsData,
            ErrorCode::InvalidPreflightHint => Self::InvalidPreflightHint,
            ErrorCode::InvalidTraitSet => Self::InvalidTraitSet,
        }
    }
}

impl fmt::Display for BatchElementExceptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A failed batch element, raised as an error
#[derive(Debug, Clone, PartialEq)]
pub struct BatchElementException {
    /// Index of the element within the batch
    pub index: usize,
    /// The error reported by the manager
    pub error: BatchElementError,
    /// Reference the element relates to, if known
    pub entity_reference: Option<EntityReference>,
    /// Access mode of the operation, if it has one
    pub access: Option<Access>,
    /// Code-specific extra data
    pub payload: ExceptionPayload,
    message: String,
}

impl BatchElementException {
    /// Convert a batch element error into an exception for element `index`.
    ///
    /// The trait set in `detail` is kept only for `InvalidTraitSet`, the
    /// trait data only for `InvalidTraitsData` and `InvalidPreflightHint`.
    pub fn new(index: usize, error: BatchElementError, detail: ElementDetail) -> Self {
        let ElementDetail {
            entity_reference,
            access,
            trait_set,
            traits_data,
        } = detail;

        let payload = match error.code {
            ErrorCode::InvalidTraitSet => trait_set.map(ExceptionPayload::TraitSet),
            ErrorCode::InvalidTraitsData | ErrorCode::InvalidPreflightHint => {
                traits_data.map(ExceptionPayload::TraitsData)
            }
            _ => None,
        }
        .unwrap_or_default();

        let message =
            create_batch_element_exception_message(&error, index, entity_reference.as_ref(), access);

        Self {
            index,
            error,
            entity_reference,
            access,
            payload,
            message,
        }
    }

    /// Kind of the exception, derived from the error code
    pub fn kind(&self) -> BatchElementExceptionKind {
        self.error.code.into()
    }

    /// Error code of the underlying error
    pub fn code(&self) -> ErrorCode {
        self.error.code
    }

    /// The formatted exception message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Trait set payload, for `InvalidTraitSet`
    pub fn trait_set(&self) -> Option<&TraitSet> {
        match &self.payload {
            ExceptionPayload::TraitSet(trait_set) => Some(trait_set),
            _ => None,
        }
    }

    /// Trait data payload, for `InvalidTraitsData` and `InvalidPreflightHint`
    pub fn traits_data(&self) -> Option<&TraitsData> {
        match &self.payload {
            ExceptionPayload::TraitsData(traits_data) => Some(traits_data),
            _ => None,
        }
    }
}

impl fmt::Display for BatchElementException {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for BatchElementException {}
