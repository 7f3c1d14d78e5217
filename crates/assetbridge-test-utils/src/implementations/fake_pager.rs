//! In-memory paging backend.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use assetbridge_core::{EntityReferences, Error, Result};
use assetbridge_interfaces::{EntityReferencePagerInterface, HostSession};

/// Paging backend over a fixed list of pages.
///
/// Counts its own drops in a shared counter so tests can check the
/// backend is released.
#[derive(Debug)]
pub struct FakePager {
    pages: Vec<EntityReferences>,
    position: usize,
    released: Arc<AtomicUsize>,
}

impl FakePager {
    /// Creates a pager over `pages`, bumping `released` when dropped.
    pub fn new(pages: Vec<EntityReferences>, released: Arc<AtomicUsize>) -> Self {
        Self {
            pages,
            position: 0,
            released,
        }
    }
}

impl EntityReferencePagerInterface for FakePager {
    fn has_next(&mut self, _host_session: &HostSession) -> Result<bool> {
        Ok(self.position + 1 < self.pages.len())
    }

    fn get(&mut self, _host_session: &HostSession) -> Result<EntityReferences> {
        Ok(self.pages.get(self.position).cloned().unwrap_or_default())
    }

    fn next(&mut self, _host_session: &HostSession) -> Result<()> {
        if self.position >= self.pages.len() {
            return Err(Error::InputValidation("No more pages.".to_string()));
        }
        self.position += 1;
        Ok(())
    }
}

impl Drop for FakePager {
    fn drop(&mut self) {
        self.released.fetch_add(1, Ordering::SeqCst);
    }
}
