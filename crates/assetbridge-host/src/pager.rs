//! Paged relationship query results

use std::fmt;
use std::sync::Arc;

use assetbridge_core::{EntityReferences, Result};
use assetbridge_interfaces::{EntityReferencePagerInterfacePtr, HostSession};

/// Host-facing pager over the results of a paged relationship query.
///
/// Every call goes straight to the manager's paging backend; nothing is
/// buffered here. Dropping the pager drops the backend, which lets the
/// manager release any resources held for the query.
pub struct EntityReferencePager {
    pager_interface: EntityReferencePagerInterfacePtr,
    host_session: Arc<HostSession>,
}

impl EntityReferencePager {
    /// Wrap a manager's paging backend
    pub fn new(pager_interface: EntityReferencePagerInterfacePtr, host_session: Arc<HostSession>) -> Self {
        Self {
            pager_interface,
            host_session,
        }
    }

    /// Whether another page is available after the current one
    pub fn has_next(&mut self) -> Result<bool> {
        self.pager_interface.has_next(&self.host_session)
    }

    /// The current page
    pub fn get(&mut self) -> Result<EntityReferences> {
        self.pager_interface.get(&self.host_session)
    }

    /// Advance to the next page
    pub fn next(&mut self) -> Result<()> {
        self.pager_interface.next(&self.host_session)
    }
}

impl fmt::Debug for EntityReferencePager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityReferencePager")
            .field("host_session", &self.host_session)
            .finish_non_exhaustive()
    }
}
