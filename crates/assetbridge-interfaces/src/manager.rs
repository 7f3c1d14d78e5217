//! Manager plugin interface
//!
//! [`ManagerInterface`] is implemented by asset management systems. Hosts
//! never call it directly; they go through the host-side `Manager`, which
//! validates input and adapts results to the host's preferred error policy.
//!
//! # Batch operations
//!
//! Every batch operation receives a success callback and an error callback.
//! For each index in `[0, N)` the implementation must call exactly one of
//! them exactly once before returning. Indices may be reported in any order.
//! If a callback returns `Err`, the implementation must stop and return that
//! error.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use assetbridge_core::{
    BatchElementError, Context, DefaultEntityAccess, EntityReference, EntityReferences,
    EntityTraitsAccess, Error, Identifier, InfoDictionary, ManagerStatePtr, PolicyAccess,
    PublishingAccess, RelationsAccess, ResolveAccess, Result, TraitSet, TraitsData, TraitsDatas,
};

use crate::{EntityReferencePagerInterfacePtr, HostSession};

/// Success callback of a batch operation, receiving the element index and value
pub type SuccessCallback<'a, T> = dyn FnMut(usize, T) -> Result<()> + 'a;

/// Error callback of a batch operation, receiving the element index and error
pub type BatchElementErrorCallback<'a> = dyn FnMut(usize, BatchElementError) -> Result<()> + 'a;

/// String to string map used for terminology substitution
pub type StrMap = BTreeMap<String, String>;

/// Optional features a manager may support
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Capability {
    /// Can tell whether a string is one of its entity references
    EntityReferenceIdentification,
    /// Answers management policy queries
    ManagementPolicyQueries,
    /// Reports the traits of entities
    EntityTraitIntrospection,
    /// Keeps state in contexts
    StatefulContexts,
    /// Substitutes host terminology
    CustomTerminology,
    /// Resolves trait data for entities
    Resolution,
    /// Supports preflight and register
    Publishing,
    /// Answers relationship queries
    RelationshipQueries,
    /// Answers existence queries
    ExistenceQueries,
    /// Supplies default entity references
    DefaultEntityReferences,
}

impl Capability {
    /// Every capability, in declaration order
    pub const ALL: [Capability; 10] = [
        Capability::EntityReferenceIdentification,
        Capability::ManagementPolicyQueries,
        Capability::EntityTraitIntrospection,
        Capability::StatefulContexts,
        Capability::CustomTerminology,
        Capability::Resolution,
        Capability::Publishing,
        Capability::RelationshipQueries,
        Capability::ExistenceQueries,
        Capability::DefaultEntityReferences,
    ];

    /// Capabilities every manager must support
    pub const REQUIRED: [Capability; 3] = [
        Capability::EntityReferenceIdentification,
        Capability::ManagementPolicyQueries,
        Capability::EntityTraitIntrospection,
    ];

    /// Printable name of the capability
    pub fn name(self) -> &'static str {
        match self {
            Capability::EntityReferenceIdentification => "entityReferenceIdentification",
            Capability::ManagementPolicyQueries => "managementPolicyQueries",
            Capability::EntityTraitIntrospection => "entityTraitIntrospection",
            Capability::StatefulContexts => "statefulContexts",
            Capability::CustomTerminology => "customTerminology",
            Capability::Resolution => "resolution",
            Capability::Publishing => "publishing",
            Capability::RelationshipQueries => "relationshipQueries",
            Capability::ExistenceQueries => "existenceQueries",
            Capability::DefaultEntityReferences => "defaultEntityReferences",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn not_implemented(identifier: &str, operation: &str) -> Error {
    Error::NotImplemented(format!(
        "Manager '{}' does not implement '{}'.",
        identifier, operation
    ))
}

/// Interface implemented by an asset management system
///
/// Methods take `&self`; implementations needing mutable state use
/// interior mutability, since a manager may be shared between hosts.
#[allow(clippy::too_many_arguments)]
pub trait ManagerInterface: Send + Sync {
    /// Unique identifier of the manager, e.g. `org.example.manager`
    fn identifier(&self) -> Identifier;

    /// Human readable name of the manager
    fn display_name(&self) -> String;

    /// Arbitrary information about the manager.
    ///
    /// The key `entityReferencesMatchPrefix` may hold a string prefix that
    /// every entity reference of this manager starts with.
    fn info(&self) -> InfoDictionary {
        InfoDictionary::new()
    }

    /// Current settings of the manager
    fn settings(&self, _host_session: &HostSession) -> InfoDictionary {
        InfoDictionary::new()
    }

    /// Prepare the manager for use with the given settings
    fn initialize(&self, manager_settings: InfoDictionary, host_session: &HostSession) -> Result<()>;

    /// Replace host terminology with the manager's own
    fn update_terminology(&self, terms: StrMap, _host_session: &HostSession) -> Result<StrMap> {
        Ok(terms)
    }

    /// Drop any cached data
    fn flush_caches(&self, _host_session: &HostSession) -> Result<()> {
        Ok(())
    }

    /// Whether the manager supports a capability
    fn has_capability(&self, capability: Capability) -> bool;

    /// Policy of the manager for each trait set, one result per input
    fn management_policy(
        &self,
        trait_sets: &[TraitSet],
        policy_access: PolicyAccess,
        context: &Context,
        host_session: &HostSession,
    ) -> Result<TraitsDatas>;

    /// Create state for a new context
    fn create_state(&self, _host_session: &HostSession) -> Result<ManagerStatePtr> {
        Err(not_implemented(&self.identifier(), "createState"))
    }

    /// Create state for a child context
    fn create_child_state(
        &self,
        _parent_state: &ManagerStatePtr,
        _host_session: &HostSession,
    ) -> Result<ManagerStatePtr> {
        Err(not_implemented(&self.identifier(), "createChildState"))
    }

    /// Serialise state into a token that can restore it later
    fn persistence_token_for_state(
        &self,
        _state: &ManagerStatePtr,
        _host_session: &HostSession,
    ) -> Result<String> {
        Err(not_implemented(&self.identifier(), "persistenceTokenForState"))
    }

    /// Restore state from a persistence token
    fn state_from_persistence_token(
        &self,
        _token: &str,
        _host_session: &HostSession,
    ) -> Result<ManagerStatePtr> {
        Err(not_implemented(&self.identifier(), "stateFromPersistenceToken"))
    }

    /// Whether a string is an entity reference of this manager
    fn is_entity_reference_string(&self, some_string: &str, host_session: &HostSession) -> bool;

    /// Resolve trait data for each entity
    fn resolve(
        &self,
        _entity_references: &[EntityReference],
        _trait_set: &TraitSet,
        _resolve_access: ResolveAccess,
        _context: &Context,
        _host_session: &HostSession,
        _success: &mut SuccessCallback<'_, TraitsData>,
        _error: &mut BatchElementErrorCallback<'_>,
    ) -> Result<()> {
        Err(not_implemented(&self.identifier(), "resolve"))
    }

    /// Prepare each entity for publishing, returning the working reference
    fn preflight(
        &self,
        _entity_references: &[EntityReference],
        _traits_hints: &[TraitsData],
        _publishing_access: PublishingAccess,
        _context: &Context,
        _host_session: &HostSession,
        _success: &mut SuccessCallback<'_, EntityReference>,
        _error: &mut BatchElementErrorCallback<'_>,
    ) -> Result<()> {
        Err(not_implemented(&self.identifier(), "preflight"))
    }

    /// Publish trait data for each entity, returning the final reference
    fn register(
        &self,
        _entity_references: &[EntityReference],
        _entity_traits_datas: &[TraitsData],
        _publishing_access: PublishingAccess,
        _context: &Context,
        _host_session: &HostSession,
        _success: &mut SuccessCallback<'_, EntityReference>,
        _error: &mut BatchElementErrorCallback<'_>,
    ) -> Result<()> {
        Err(not_implemented(&self.identifier(), "register"))
    }

    /// Whether each entity exists
    fn entity_exists(
        &self,
        _entity_references: &[EntityReference],
        _context: &Context,
        _host_session: &HostSession,
        _success: &mut SuccessCallback<'_, bool>,
        _error: &mut BatchElementErrorCallback<'_>,
    ) -> Result<()> {
        Err(not_implemented(&self.identifier(), "entityExists"))
    }

    /// Trait set of each entity
    fn entity_traits(
        &self,
        _entity_references: &[EntityReference],
        _entity_traits_access: EntityTraitsAccess,
        _context: &Context,
        _host_session: &HostSession,
        _success: &mut SuccessCallback<'_, TraitSet>,
        _error: &mut BatchElementErrorCallback<'_>,
    ) -> Result<()> {
        Err(not_implemented(&self.identifier(), "entityTraits"))
    }

    /// Default entity reference for each trait set, if there is one
    fn default_entity_reference(
        &self,
        _trait_sets: &[TraitSet],
        _default_entity_access: DefaultEntityAccess,
        _context: &Context,
        _host_session: &HostSession,
        _success: &mut SuccessCallback<'_, Option<EntityReference>>,
        _error: &mut BatchElementErrorCallback<'_>,
    ) -> Result<()> {
        Err(not_implemented(&self.identifier(), "defaultEntityReference"))
    }

    /// Entities related to each input entity by one relationship
    fn get_with_relationship(
        &self,
        _entity_references: &[EntityReference],
        _relationship_traits_data: &TraitsData,
        _result_trait_set: &TraitSet,
        _relations_access: RelationsAccess,
        _context: &Context,
        _host_session: &HostSession,
        _success: &mut SuccessCallback<'_, EntityReferences>,
        _error: &mut BatchElementErrorCallback<'_>,
    ) -> Result<()> {
        Err(not_implemented(&self.identifier(), "getWithRelationship"))
    }

    /// Entities related to one entity by each of several relationships
    fn get_with_relationships(
        &self,
        _entity_reference: &EntityReference,
        _relationship_traits_datas: &[TraitsData],
        _result_trait_set: &TraitSet,
        _relations_access: RelationsAccess,
        _context: &Context,
        _host_session: &HostSession,
        _success: &mut SuccessCallback<'_, EntityReferences>,
        _error: &mut BatchElementErrorCallback<'_>,
    ) -> Result<()> {
        Err(not_implemented(&self.identifier(), "getWithRelationships"))
    }

    /// Paged form of [`get_with_relationship`](Self::get_with_relationship)
    fn get_with_relationship_paged(
        &self,
        _entity_references: &[EntityReference],
        _relationship_traits_data: &TraitsData,
        _result_trait_set: &TraitSet,
        _page_size: usize,
        _relations_access: RelationsAccess,
        _context: &Context,
        _host_session: &HostSession,
        _success: &mut SuccessCallback<'_, EntityReferencePagerInterfacePtr>,
        _error: &mut BatchElementErrorCallback<'_>,
    ) -> Result<()> {
        Err(not_implemented(&self.identifier(), "getWithRelationshipPaged"))
    }

    /// Paged form of [`get_with_relationships`](Self::get_with_relationships)
    fn get_with_relationships_paged(
        &self,
        _entity_reference: &EntityReference,
        _relationship_traits_datas: &[TraitsData],
        _result_trait_set: &TraitSet,
        _page_size: usize,
        _relations_access: RelationsAccess,
        _context: &Context,
        _host_session: &HostSession,
        _success: &mut SuccessCallback<'_, EntityReferencePagerInterfacePtr>,
        _error: &mut BatchElementErrorCallback<'_>,
    ) -> Result<()> {
        Err(not_implemented(&self.identifier(), "getWithRelationshipsPaged"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HostInterface;
    use std::sync::Arc;

    struct MinimalManager;

    impl ManagerInterface for MinimalManager {
        fn identifier(&self) -> Identifier {
            "org.example.minimal".to_string()
        }

        fn display_name(&self) -> String {
            "Minimal".to_string()
        }

        fn initialize(&self, _settings: InfoDictionary, _hs: &HostSession) -> Result<()> {
            Ok(())
        }

        fn has_capability(&self, capability: Capability) -> bool {
            Capability::REQUIRED.contains(&capability)
        }

        fn management_policy(
            &self,
            trait_sets: &[TraitSet],
            _policy_access: PolicyAccess,
            _context: &Context,
            _hs: &HostSession,
        ) -> Result<TraitsDatas> {
            Ok(vec![TraitsData::new(); trait_sets.len()])
        }

        fn is_entity_reference_string(&self, some_string: &str, _hs: &HostSession) -> bool {
            some_string.starts_with("min://")
        }
    }

    struct TestHost;

    impl HostInterface for TestHost {
        fn identifier(&self) -> Identifier {
            "org.example.host".to_string()
        }

        fn display_name(&self) -> String {
            "Host".to_string()
        }
    }

    fn session() -> HostSession {
        HostSession::new(Arc::new(TestHost))
    }

    #[test]
    fn test_capability_names() {
        assert_eq!(Capability::EntityReferenceIdentification.name(), "entityReferenceIdentification");
        assert_eq!(Capability::DefaultEntityReferences.to_string(), "defaultEntityReferences");
    }

    #[test]
    fn test_defaults() {
        let manager = MinimalManager;
        let hs = session();
        let terms = StrMap::from([("asset".to_string(), "asset".to_string())]);

        assert!(manager.info().is_empty());
        assert!(manager.settings(&hs).is_empty());
        assert_eq!(manager.update_terminology(terms.clone(), &hs), Ok(terms));
        assert_eq!(manager.flush_caches(&hs), Ok(()));
    }

    #[test]
    fn test_unimplemented_batch_operation() {
        let manager = MinimalManager;
        let hs = session();
        let mut calls = 0;

        let result = manager.resolve(
            &[EntityReference::new("min://a")],
            &TraitSet::new(),
            ResolveAccess::Read,
            &Context::new(),
            &hs,
            &mut |_, _| {
                calls += 1;
                Ok(())
            },
            &mut |_, _| Ok(()),
        );

        assert_eq!(
            result,
            Err(Error::NotImplemented(
                "Manager 'org.example.minimal' does not implement 'resolve'.".to_string()
            ))
        );
        assert_eq!(calls, 0);
    }

    #[test]
    fn test_unimplemented_state() {
        let manager = MinimalManager;
        let err = manager.create_state(&session()).unwrap_err();

        assert!(matches!(err, Error::NotImplemented(_)));
    }
}
