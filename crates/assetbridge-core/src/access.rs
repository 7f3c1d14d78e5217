//! Access modes
//!
//! Each family of manager operation takes its own access enum so that a
//! mode meant for one operation cannot be passed to another by accident.
//! All of them share the same set of values and convert into the internal
//! [`Access`] used for contexts and exception messages.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Internal access mode shared by every operation-specific access enum
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Access {
    /// Read an existing entity
    Read,
    /// Write to an entity
    Write,
    /// Create a new entity related to an existing one
    CreateRelated,
    /// Intent not known
    #[default]
    Unknown,
}

impl Access {
    /// Printable name, as used in exception messages
    pub fn name(self) -> &'static str {
        match self {
            Access::Read => "read",
            Access::Write => "write",
            Access::CreateRelated => "createRelated",
            Access::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

macro_rules! operation_access {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "camelCase")]
        pub enum $name {
            /// Read an existing entity
            Read,
            /// Write to an entity
            Write,
            /// Create a new entity related to an existing one
            CreateRelated,
            /// Intent not known
            Unknown,
        }

        impl From<$name> for Access {
            fn from(access: $name) -> Self {
                match access {
                    $name::Read => Access::Read,
                    $name::Write => Access::Write,
                    $name::CreateRelated => Access::CreateRelated,
                    $name::Unknown => Access::Unknown,
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(Access::from(*self).name())
            }
        }
    };
}

operation_access!(
    /// Access mode for `resolve`
    ResolveAccess
);
operation_access!(
    /// Access mode for `preflight` and `register`
    PublishingAccess
);
operation_access!(
    /// Access mode for relationship queries
    RelationsAccess
);
operation_access!(
    /// Access mode for management policy queries
    PolicyAccess
);
operation_access!(
    /// Access mode for `entity_traits`
    EntityTraitsAccess
);
operation_access!(
    /// Access mode for `default_entity_reference`
    DefaultEntityAccess
);
