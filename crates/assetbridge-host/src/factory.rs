//! Manager discovery and instantiation
//!
//! A [`ManagerImplementationFactory`] knows which manager implementations
//! exist and how to construct them. [`ManagerFactory`] sits on top of it
//! and produces ready-to-use [`Manager`]s for a host.

use std::collections::BTreeMap;
use std::env;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use assetbridge_core::{Error, Identifier, InfoDictionary, Result};
use assetbridge_interfaces::{HostInterface, HostSession, ManagerInterface};

use crate::config::{DefaultManagerConfig, DEFAULT_MANAGER_CONFIG_ENV_VAR};
use crate::manager::Manager;

/// Source of manager implementations
pub trait ManagerImplementationFactory: Send + Sync {
    /// Identifiers of every available manager
    fn identifiers(&self) -> Result<Vec<Identifier>>;

    /// Construct the manager with the given identifier
    fn instantiate(&self, identifier: &str) -> Result<Arc<dyn ManagerInterface>>;
}

type ManagerConstructor = Box<dyn Fn() -> Arc<dyn ManagerInterface> + Send + Sync>;

/// Factory over manager implementations registered in-process
#[derive(Default)]
pub struct StaticManagerImplementationFactory {
    constructors: BTreeMap<Identifier, ManagerConstructor>,
}

impl StaticManagerImplementationFactory {
    /// Create an empty factory
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a constructor for a manager identifier, replacing any
    /// previous registration
    pub fn register<F>(&mut self, identifier: impl Into<Identifier>, constructor: F)
    where
        F: Fn() -> Arc<dyn ManagerInterface> + Send + Sync + 'static,
    {
        self.constructors
            .insert(identifier.into(), Box::new(constructor));
    }

    /// Builder form of [`register`](Self::register)
    pub fn with_manager<F>(mut self, identifier: impl Into<Identifier>, constructor: F) -> Self
    where
        F: Fn() -> Arc<dyn ManagerInterface> + Send + Sync + 'static,
    {
        self.register(identifier, constructor);
        self
    }
}

impl ManagerImplementationFactory for StaticManagerImplementationFactory {
    fn identifiers(&self) -> Result<Vec<Identifier>> {
        Ok(self.constructors.keys().cloned().collect())
    }

    fn instantiate(&self, identifier: &str) -> Result<Arc<dyn ManagerInterface>> {
        let constructor = self.constructors.get(identifier).ok_or_else(|| {
            Error::InputValidation(format!("Manager '{}' is not registered.", identifier))
        })?;
        Ok(constructor())
    }
}

impl fmt::Debug for StaticManagerImplementationFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticManagerImplementationFactory")
            .field("identifiers", &self.constructors.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Summary of an available manager
#[derive(Debug, Clone, PartialEq)]
pub struct ManagerDetail {
    /// Identifier reported by the manager
    pub identifier: Identifier,
    /// Display name of the manager
    pub display_name: String,
    /// Information about the manager
    pub info: InfoDictionary,
}

/// Creates [`Manager`]s for a host
pub struct ManagerFactory {
    host_interface: Arc<dyn HostInterface>,
    implementation_factory: Arc<dyn ManagerImplementationFactory>,
}

impl ManagerFactory {
    /// Create a factory for a host
    pub fn new(
        host_interface: Arc<dyn HostInterface>,
        implementation_factory: Arc<dyn ManagerImplementationFactory>,
    ) -> Self {
        Self {
            host_interface,
            implementation_factory,
        }
    }

    /// Identifiers of every available manager
    pub fn identifiers(&self) -> Result<Vec<Identifier>> {
        self.implementation_factory.identifiers()
    }

    /// Details of every available manager, keyed by identifier.
    ///
    /// Each manager is instantiated, but not initialized, to query it.
    pub fn available_managers(&self) -> Result<BTreeMap<Identifier, ManagerDetail>> {
        let mut details = BTreeMap::new();
        for identifier in self.identifiers()? {
            let manager_interface = self.implementation_factory.instantiate(&identifier)?;
            details.insert(
                identifier,
                ManagerDetail {
                    identifier: manager_interface.identifier(),
                    display_name: manager_interface.display_name(),
                    info: manager_interface.info(),
                },
            );
        }
        Ok(details)
    }

    /// Create an uninitialized manager
    pub fn create_manager(&self, identifier: &str) -> Result<Manager> {
        Self::create_manager_for_interface(identifier, &self.host_interface, &self.implementation_factory)
    }

    /// Create an uninitialized manager for any host
    pub fn create_manager_for_interface(
        identifier: &str,
        host_interface: &Arc<dyn HostInterface>,
        implementation_factory: &Arc<dyn ManagerImplementationFactory>,
    ) -> Result<Manager> {
        let manager_interface = implementation_factory.instantiate(identifier)?;
        let host_session = Arc::new(HostSession::new(host_interface.clone()));
        Ok(Manager::new(manager_interface, host_session))
    }

    /// The default manager for this factory's host. See
    /// [`default_manager_for_interface`](Self::default_manager_for_interface).
    pub fn default_manager(&self) -> Result<Option<Manager>> {
        Self::default_manager_for_interface(&self.host_interface, &self.implementation_factory)
    }

    /// Create and initialize the manager named in the config file given by
    /// `ASSETBRIDGE_DEFAULT_CONFIG`.
    ///
    /// Returns `Ok(None)` if the variable is not set.
    pub fn default_manager_for_interface(
        host_interface: &Arc<dyn HostInterface>,
        implementation_factory: &Arc<dyn ManagerImplementationFactory>,
    ) -> Result<Option<Manager>> {
        let config_path = match env::var_os(DEFAULT_MANAGER_CONFIG_ENV_VAR) {
            Some(path) => path,
            None => {
                debug!(
                    "{} not set, unable to instantiate default manager.",
                    DEFAULT_MANAGER_CONFIG_ENV_VAR
                );
                return Ok(None);
            }
        };

        debug!(
            "Loading default manager config from '{}' [{}]",
            config_path.to_string_lossy(),
            DEFAULT_MANAGER_CONFIG_ENV_VAR
        );

        let config = DefaultManagerConfig::from_file(&config_path)?;
        let mut manager =
            Self::create_manager_for_interface(&config.identifier, host_interface, implementation_factory)?;
        manager.initialize(config.settings)?;
        Ok(Some(manager))
    }
}

impl fmt::Debug for ManagerFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManagerFactory")
            .field("host", &self.host_interface.identifier())
            .finish_non_exhaustive()
    }
}
