//! Paging backend for relationship queries
//!
//! A manager returns one of these per element of a paged relationship
//! query. The host wraps it and forwards every call, so implementations
//! may keep server-side cursors open until they are dropped.

use assetbridge_core::{EntityReferences, Result};

use crate::HostSession;

/// Backend of a paged relationship query
pub trait EntityReferencePagerInterface: Send {
    /// Whether another page is available after the current one
    fn has_next(&mut self, host_session: &HostSession) -> Result<bool>;

    /// The current page
    fn get(&mut self, host_session: &HostSession) -> Result<EntityReferences>;

    /// Advance to the next page
    fn next(&mut self, host_session: &HostSession) -> Result<()>;
}

/// Owned paging backend, as handed over by a manager
pub type EntityReferencePagerInterfacePtr = Box<dyn EntityReferencePagerInterface>;
