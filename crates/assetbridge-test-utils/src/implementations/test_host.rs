//! Minimal host implementation.

use std::sync::Arc;

use assetbridge_core::{Identifier, InfoDictionary};
use assetbridge_interfaces::{HostInterface, HostSession};

/// Host with a fixed identity.
#[derive(Debug, Clone)]
pub struct TestHost {
    identifier: Identifier,
    display_name: String,
}

impl TestHost {
    /// Creates a host with the given identifier.
    pub fn new(identifier: impl Into<Identifier>) -> Self {
        let identifier = identifier.into();
        Self {
            display_name: format!("Test Host ({})", identifier),
            identifier,
        }
    }

    /// Wraps the host into a shared host session.
    pub fn session(self) -> Arc<HostSession> {
        Arc::new(HostSession::new(Arc::new(self)))
    }
}

impl Default for TestHost {
    fn default() -> Self {
        Self::new("org.assetbridge.test.host")
    }
}

impl HostInterface for TestHost {
    fn identifier(&self) -> Identifier {
        self.identifier.clone()
    }

    fn display_name(&self) -> String {
        self.display_name.clone()
    }

    fn info(&self) -> InfoDictionary {
        InfoDictionary::new()
    }
}
