//! Host identity
//!
//! Hosts implement [`HostInterface`]. Managers never see it directly, only
//! through the [`HostSession`] passed to every call.

use std::fmt;
use std::sync::Arc;

use assetbridge_core::{Identifier, InfoDictionary};

/// Interface implemented by a host application
pub trait HostInterface: Send + Sync {
    /// Unique identifier of the host, e.g. `org.example.host`
    fn identifier(&self) -> Identifier;

    /// Human readable name of the host
    fn display_name(&self) -> String;

    /// Arbitrary information about the host
    fn info(&self) -> InfoDictionary {
        InfoDictionary::new()
    }
}

/// Manager-facing wrapper around a [`HostInterface`]
#[derive(Clone)]
pub struct Host {
    host_interface: Arc<dyn HostInterface>,
}

impl Host {
    /// Wrap a host interface
    pub fn new(host_interface: Arc<dyn HostInterface>) -> Self {
        Self { host_interface }
    }

    /// Identifier of the host
    pub fn identifier(&self) -> Identifier {
        self.host_interface.identifier()
    }

    /// Display name of the host
    pub fn display_name(&self) -> String {
        self.host_interface.display_name()
    }

    /// Information about the host
    pub fn info(&self) -> InfoDictionary {
        self.host_interface.info()
    }
}

impl fmt::Debug for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Host")
            .field("identifier", &self.host_interface.identifier())
            .finish()
    }
}

/// Per-host session handed to every manager call
#[derive(Debug, Clone)]
pub struct HostSession {
    host: Host,
}

impl HostSession {
    /// Create a session for a host
    pub fn new(host_interface: Arc<dyn HostInterface>) -> Self {
        Self {
            host: Host::new(host_interface),
        }
    }

    /// The host this session belongs to
    pub fn host(&self) -> &Host {
        &self.host
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assetbridge_core::Value;

    struct TestHost;

    impl HostInterface for TestHost {
        fn identifier(&self) -> Identifier {
            "org.example.host".to_string()
        }

        fn display_name(&self) -> String {
            "Example Host".to_string()
        }
    }

    #[test]
    fn test_session_exposes_host() {
        let session = HostSession::new(Arc::new(TestHost));

        assert_eq!(session.host().identifier(), "org.example.host");
        assert_eq!(session.host().display_name(), "Example Host");
        assert!(session.host().info().is_empty());
    }

    #[test]
    fn test_info_override() {
        struct InfoHost;

        impl HostInterface for InfoHost {
            fn identifier(&self) -> Identifier {
                "org.example.info".to_string()
            }

            fn display_name(&self) -> String {
                "Info".to_string()
            }

            fn info(&self) -> InfoDictionary {
                InfoDictionary::from([("version".to_string(), Value::from(2_i64))])
            }
        }

        let host = Host::new(Arc::new(InfoHost));
        assert_eq!(host.info().get("version"), Some(&Value::Int(2)));
        assert!(format!("{:?}", host).contains("org.example.info"));
    }
}
