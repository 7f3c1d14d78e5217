//! Entity references
//!
//! An entity reference is an opaque string understood by a manager. Hosts
//! should obtain them through the manager's validation gate rather than
//! constructing them from arbitrary strings.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A validated reference to an entity in a manager's asset system
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityReference(String);

/// A batch of entity references
pub type EntityReferences = Vec<EntityReference>;

impl EntityReference {
    /// Wrap a string without validation.
    ///
    /// Intended for manager implementations, which know their own format.
    /// Hosts holding an untrusted string should use
    /// `Manager::create_entity_reference` (or `create_entity_reference_if_valid`)
    /// from `assetbridge-host`, which checks it with the manager first.
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    /// The reference string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the reference, returning the underlying string
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for EntityReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for EntityReference {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
