//!
//! AssetBridge Host - the API a host application uses to talk to a manager
//!
//! [`Manager`] wraps a plugin's [`ManagerInterface`](assetbridge_interfaces::ManagerInterface),
//! validates input before the plugin sees it and presents batch results
//! through one of three error policies: raw callbacks, exceptions (the
//! first failed element fails the call) or variants (one `Result` per
//! element). [`ManagerFactory`] finds and instantiates managers.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Default manager configuration
pub mod config;

/// Policy forms of the batch operations
mod conveniences;

/// Manager discovery and instantiation
pub mod factory;

/// Host-side manager wrapper
pub mod manager;

/// Paged relationship query results
pub mod pager;

/// Batch error policies
pub mod policy;

// Re-export key types
pub use crate::config::{DefaultManagerConfig, DEFAULT_MANAGER_CONFIG_ENV_VAR};
pub use factory::{
    ManagerDetail, ManagerFactory, ManagerImplementationFactory, StaticManagerImplementationFactory,
};
pub use manager::{Manager, ENTITY_REFERENCES_MATCH_PREFIX_INFO_KEY};
pub use pager::EntityReferencePager;
pub use policy::{ErrorPolicy, Exception, Variant};
