//! Calling context
//!
//! A [`Context`] is created once per logical chain of operations and passed
//! to every call in that chain. It lets the manager correlate calls through
//! its own opaque state.

use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt::Debug;
use std::sync::Arc;

use crate::{Access, TraitsData};

/// How long the host intends to keep data it receives
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Retention {
    /// Data is discarded immediately
    Ignored,
    /// Data is kept for the duration of the operation
    #[default]
    Transient,
    /// Data is kept for the duration of the session
    Session,
    /// Data is stored permanently
    Permanent,
}

/// Opaque state owned by a manager implementation.
///
/// Hosts never inspect it. Managers downcast it back to their own type.
pub trait ManagerState: Any + Send + Sync + Debug {
    /// Convert to Any for downcasting
    fn as_any(&self) -> &dyn Any;
}

/// Shared handle to manager state
pub type ManagerStatePtr = Arc<dyn ManagerState>;

/// Calling context for manager operations
#[derive(Debug, Clone, Default)]
pub struct Context {
    /// Intended access for the operation chain
    pub access: Access,

    /// Intended retention of returned data
    pub retention: Retention,

    /// Description of where in the host the calls originate
    pub locale: TraitsData,

    /// Manager-owned state, if the manager supports stateful contexts
    pub manager_state: Option<ManagerStatePtr>,
}

impl Context {
    /// Create an empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the access is read
    pub fn is_for_read(&self) -> bool {
        self.access == Access::Read
    }

    /// Whether the access is write
    pub fn is_for_write(&self) -> bool {
        self.access == Access::Write
    }

    /// Downcast the manager state to a concrete type
    pub fn state_as<T: ManagerState>(&self) -> Option<&T> {
        self.manager_state
            .as_ref()
            .and_then(|state| state.as_any().downcast_ref::<T>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct TestState(u32);

    impl ManagerState for TestState {
        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[derive(Debug)]
    struct OtherState;

    impl ManagerState for OtherState {
        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[test]
    fn test_defaults() {
        let context = Context::new();

        assert_eq!(context.access, Access::Unknown);
        assert_eq!(context.retention, Retention::Transient);
        assert!(context.locale.is_empty());
        assert!(context.manager_state.is_none());
    }

    #[test]
    fn test_state_downcast() {
        let context = Context {
            manager_state: Some(Arc::new(TestState(7))),
            ..Context::default()
        };

        assert_eq!(context.state_as::<TestState>().map(|s| s.0), Some(7));
        assert!(context.state_as::<OtherState>().is_none());
    }

    #[test]
    fn test_clone_shares_state_and_copies_locale() {
        let mut original = Context::new();
        original.locale.add_trait("host.scene");
        original.manager_state = Some(Arc::new(TestState(1)));

        let mut copy = original.clone();
        copy.locale.add_trait("host.render");

        assert!(!original.locale.has_trait("host.render"));
        let (a, b) = (
            original.manager_state.as_ref().unwrap(),
            copy.manager_state.as_ref().unwrap(),
        );
        assert!(Arc::ptr_eq(a, b));
    }
}
