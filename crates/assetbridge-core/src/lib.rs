//!
//! AssetBridge Core - data model and error taxonomy
//!
//! This crate defines the values exchanged between a host application and
//! an asset manager plugin: entity references, trait sets and trait data,
//! calling contexts, access modes, and the per-element batch error model
//! together with its exception counterpart.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Access modes for each family of operation
pub mod access;

/// Per-element batch errors
pub mod batch_element;

/// Calling context shared across an operation chain
pub mod context;

/// Validated entity references
pub mod entity_reference;

/// Error types
pub mod error;

/// Exceptions raised from batch element errors
pub mod exception;

/// Canonical exception message construction
pub mod message;

/// Trait sets and trait property data
pub mod trait_data;

// Re-export key types
pub use access::{
    Access, DefaultEntityAccess, EntityTraitsAccess, PolicyAccess, PublishingAccess,
    RelationsAccess, ResolveAccess,
};
pub use batch_element::{BatchElementError, ErrorCode};
pub use context::{Context, ManagerState, ManagerStatePtr, Retention};
pub use entity_reference::{EntityReference, EntityReferences};
pub use error::{Error, Result};
pub use exception::{BatchElementException, BatchElementExceptionKind, ElementDetail, ExceptionPayload};
pub use trait_data::{InfoDictionary, TraitProperties, TraitSet, TraitSets, TraitsData, TraitsDatas, Value};

/// Identifier of a manager or host implementation, e.g. `org.example.manager`
pub type Identifier = String;
