//! AssetBridge Interfaces
//!
//! This crate defines the contract between a host and a manager plugin:
//! the trait a manager implements, the paging backend it returns for
//! relationship queries, and the host-side types a manager is given to
//! talk back to its host.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Host identity as seen by a manager
pub mod host;

/// Manager plugin interface
pub mod manager;

/// Paging backend for relationship queries
pub mod pager;

/// Re-export key types for convenient usage
pub use host::{Host, HostInterface, HostSession};
pub use manager::{
    BatchElementErrorCallback, Capability, ManagerInterface, StrMap, SuccessCallback,
};
pub use pager::{EntityReferencePagerInterface, EntityReferencePagerInterfacePtr};
