//! Host-side manager wrapper
//!
//! [`Manager`] is the single entry point a host uses to talk to a manager
//! plugin. This module holds the lifecycle, context and entity reference
//! methods, and the callback ("primitive") form of every batch operation.
//! The policy forms live alongside in `conveniences`.

use std::sync::Arc;

use tracing::{debug, trace, warn};

use assetbridge_core::{
    Context, DefaultEntityAccess, EntityReference, EntityReferences, EntityTraitsAccess, Error,
    Identifier, InfoDictionary, PolicyAccess, PublishingAccess, RelationsAccess, ResolveAccess,
    Result, TraitSet, TraitsData, TraitsDatas, Value,
};
use assetbridge_interfaces::{
    BatchElementErrorCallback, Capability, EntityReferencePagerInterfacePtr, HostSession,
    ManagerInterface, StrMap, SuccessCallback,
};

use crate::pager::EntityReferencePager;

/// Key of a manager's `info()` holding the prefix shared by all of its
/// entity references
pub const ENTITY_REFERENCES_MATCH_PREFIX_INFO_KEY: &str = "entityReferencesMatchPrefix";

/// Host-facing wrapper around a manager plugin
pub struct Manager {
    manager_interface: Arc<dyn ManagerInterface>,
    host_session: Arc<HostSession>,
    entity_reference_prefix: Option<String>,
}

impl std::fmt::Debug for Manager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Manager")
            .field("identifier", &self.manager_interface.identifier())
            .field("entity_reference_prefix", &self.entity_reference_prefix)
            .finish()
    }
}

impl Manager {
    /// Wrap a manager interface for use by the host of `host_session`
    pub fn new(manager_interface: Arc<dyn ManagerInterface>, host_session: Arc<HostSession>) -> Self {
        Self {
            manager_interface,
            host_session,
            entity_reference_prefix: None,
        }
    }

    /// Identifier of the manager
    pub fn identifier(&self) -> Identifier {
        self.manager_interface.identifier()
    }

    /// Display name of the manager
    pub fn display_name(&self) -> String {
        self.manager_interface.display_name()
    }

    /// Information about the manager
    pub fn info(&self) -> InfoDictionary {
        self.manager_interface.info()
    }

    /// Current settings of the manager
    pub fn settings(&self) -> InfoDictionary {
        self.manager_interface.settings(&self.host_session)
    }

    /// The host session given to every manager call
    pub fn host_session(&self) -> &Arc<HostSession> {
        &self.host_session
    }

    /// Initialize the manager.
    ///
    /// Fails with [`Error::Configuration`] if the manager lacks any of the
    /// capabilities every manager must support. Also picks up the entity
    /// reference prefix advertised in the manager's `info()`, if any.
    pub fn initialize(&mut self, manager_settings: InfoDictionary) -> Result<()> {
        self.entity_reference_prefix = None;
        self.manager_interface
            .initialize(manager_settings, &self.host_session)?;

        let missing: Vec<&str> = Capability::REQUIRED
            .iter()
            .filter(|capability| !self.manager_interface.has_capability(**capability))
            .map(|capability| capability.name())
            .collect();

        if !missing.is_empty() {
            let message = format!(
                "Manager implementation for '{}' does not support the required capabilities: {}",
                self.manager_interface.identifier(),
                missing.join(", ")
            );
            warn!(manager = %self.manager_interface.identifier(), "{}", message);
            return Err(Error::Configuration(message));
        }

        match self
            .manager_interface
            .info()
            .get(ENTITY_REFERENCES_MATCH_PREFIX_INFO_KEY)
        {
            Some(Value::Str(prefix)) => {
                debug!(
                    "Entity reference prefix '{}' provided by manager's info() dict. Subsequent \
                     calls to isEntityReferenceString will use this prefix rather than call the \
                     manager's implementation.",
                    prefix
                );
                self.entity_reference_prefix = Some(prefix.clone());
            }
            Some(_) => {
                warn!("Entity reference prefix given but is an invalid type: should be a string.");
            }
            None => {}
        }

        Ok(())
    }

    /// Whether the manager supports a capability
    pub fn has_capability(&self, capability: Capability) -> bool {
        self.manager_interface.has_capability(capability)
    }

    /// Replace host terminology with the manager's own
    pub fn update_terminology(&self, terms: StrMap) -> Result<StrMap> {
        self.manager_interface
            .update_terminology(terms, &self.host_session)
    }

    /// Ask the manager to drop any cached data
    pub fn flush_caches(&self) -> Result<()> {
        self.manager_interface.flush_caches(&self.host_session)
    }

    /// Policy of the manager for each trait set
    pub fn management_policy(
        &self,
        trait_sets: &[TraitSet],
        policy_access: PolicyAccess,
        context: &Context,
    ) -> Result<TraitsDatas> {
        self.manager_interface
            .management_policy(trait_sets, policy_access, context, &self.host_session)
    }

    /// Create a new context, with manager state if the manager keeps any
    pub fn create_context(&self) -> Result<Context> {
        let mut context = Context::new();
        if self
            .manager_interface
            .has_capability(Capability::StatefulContexts)
        {
            context.manager_state = Some(self.manager_interface.create_state(&self.host_session)?);
        }
        Ok(context)
    }

    /// Create a child of `parent_context`.
    ///
    /// The locale is copied. Manager state is derived from the parent's, if
    /// the parent has any.
    pub fn create_child_context(&self, parent_context: &Context) -> Result<Context> {
        let mut context = Context {
            access: parent_context.access,
            retention: parent_context.retention,
            locale: parent_context.locale.clone(),
            manager_state: None,
        };
        if let Some(parent_state) = &parent_context.manager_state {
            context.manager_state = Some(
                self.manager_interface
                    .create_child_state(parent_state, &self.host_session)?,
            );
        }
        Ok(context)
    }

    /// Token that can restore the manager state of `context` later,
    /// possibly in another process. Empty if the context has no state.
    pub fn persistence_token_for_context(&self, context: &Context) -> Result<String> {
        match &context.manager_state {
            Some(state) => self
                .manager_interface
                .persistence_token_for_state(state, &self.host_session),
            None => Ok(String::new()),
        }
    }

    /// Restore a context from a persistence token
    pub fn context_from_persistence_token(&self, token: &str) -> Result<Context> {
        let mut context = Context::new();
        if !token.is_empty() {
            context.manager_state = Some(
                self.manager_interface
                    .state_from_persistence_token(token, &self.host_session)?,
            );
        }
        Ok(context)
    }

    /// Whether a string is an entity reference of this manager.
    ///
    /// Uses the prefix from the manager's `info()` when one was given
    /// during [`initialize`](Self::initialize).
    pub fn is_entity_reference_string(&self, some_string: &str) -> bool {
        match &self.entity_reference_prefix {
            Some(prefix) => some_string.starts_with(prefix.as_str()),
            None => self
                .manager_interface
                .is_entity_reference_string(some_string, &self.host_session),
        }
    }

    /// Validate a string as an entity reference of this manager
    pub fn create_entity_reference(&self, entity_reference_string: impl Into<String>) -> Result<EntityReference> {
        let entity_reference_string = entity_reference_string.into();
        if !self.is_entity_reference_string(&entity_reference_string) {
            return Err(Error::InputValidation(format!(
                "Invalid entity reference: {}",
                entity_reference_string
            )));
        }
        Ok(EntityReference::new(entity_reference_string))
    }

    /// Validate a string as an entity reference, returning `None` if it is not one
    pub fn create_entity_reference_if_valid(
        &self,
        entity_reference_string: impl Into<String>,
    ) -> Option<EntityReference> {
        let entity_reference_string = entity_reference_string.into();
        self.is_entity_reference_string(&entity_reference_string)
            .then(|| EntityReference::new(entity_reference_string))
    }

    /// Resolve trait data for each entity, reporting through callbacks
    pub fn resolve_with_callbacks(
        &self,
        entity_references: &[EntityReference],
        trait_set: &TraitSet,
        resolve_access: ResolveAccess,
        context: &Context,
        success: &mut SuccessCallback<'_, TraitsData>,
        error: &mut BatchElementErrorCallback<'_>,
    ) -> Result<()> {
        trace!(operation = "resolve", batch_size = entity_references.len(), "Dispatching batch");
        self.manager_interface.resolve(
            entity_references,
            trait_set,
            resolve_access,
            context,
            &self.host_session,
            success,
            error,
        )
    }

    /// Prepare each entity for publishing, reporting through callbacks.
    ///
    /// There must be one traits hint per entity reference.
    pub fn preflight_with_callbacks(
        &self,
        entity_references: &[EntityReference],
        traits_hints: &[TraitsData],
        publishing_access: PublishingAccess,
        context: &Context,
        success: &mut SuccessCallback<'_, EntityReference>,
        error: &mut BatchElementErrorCallback<'_>,
    ) -> Result<()> {
        check_same_length(entity_references.len(), traits_hints.len(), "traits hints")?;
        trace!(operation = "preflight", batch_size = entity_references.len(), "Dispatching batch");
        self.manager_interface.preflight(
            entity_references,
            traits_hints,
            publishing_access,
            context,
            &self.host_session,
            success,
            error,
        )
    }

    /// Publish trait data for each entity, reporting through callbacks.
    ///
    /// There must be one traits data per entity reference, and every
    /// traits data must have the same trait set.
    pub fn register_with_callbacks(
        &self,
        entity_references: &[EntityReference],
        entity_traits_datas: &[TraitsData],
        publishing_access: PublishingAccess,
        context: &Context,
        success: &mut SuccessCallback<'_, EntityReference>,
        error: &mut BatchElementErrorCallback<'_>,
    ) -> Result<()> {
        check_same_length(entity_references.len(), entity_traits_datas.len(), "traits datas")?;
        check_same_trait_set(entity_traits_datas)?;
        trace!(operation = "register", batch_size = entity_references.len(), "Dispatching batch");
        self.manager_interface.register(
            entity_references,
            entity_traits_datas,
            publishing_access,
            context,
            &self.host_session,
            success,
            error,
        )
    }

    /// Whether each entity exists, reporting through callbacks
    pub fn entity_exists_with_callbacks(
        &self,
        entity_references: &[EntityReference],
        context: &Context,
        success: &mut SuccessCallback<'_, bool>,
        error: &mut BatchElementErrorCallback<'_>,
    ) -> Result<()> {
        trace!(operation = "entity_exists", batch_size = entity_references.len(), "Dispatching batch");
        self.manager_interface
            .entity_exists(entity_references, context, &self.host_session, success, error)
    }

    /// Trait set of each entity, reporting through callbacks
    pub fn entity_traits_with_callbacks(
        &self,
        entity_references: &[EntityReference],
        entity_traits_access: EntityTraitsAccess,
        context: &Context,
        success: &mut SuccessCallback<'_, TraitSet>,
        error: &mut BatchElementErrorCallback<'_>,
    ) -> Result<()> {
        trace!(operation = "entity_traits", batch_size = entity_references.len(), "Dispatching batch");
        self.manager_interface.entity_traits(
            entity_references,
            entity_traits_access,
            context,
            &self.host_session,
            success,
            error,
        )
    }

    /// Default entity reference for each trait set, reporting through callbacks
    pub fn default_entity_reference_with_callbacks(
        &self,
        trait_sets: &[TraitSet],
        default_entity_access: DefaultEntityAccess,
        context: &Context,
        success: &mut SuccessCallback<'_, Option<EntityReference>>,
        error: &mut BatchElementErrorCallback<'_>,
    ) -> Result<()> {
        trace!(operation = "default_entity_reference", batch_size = trait_sets.len(), "Dispatching batch");
        self.manager_interface.default_entity_reference(
            trait_sets,
            default_entity_access,
            context,
            &self.host_session,
            success,
            error,
        )
    }

    /// Entities related to each input entity, reporting through callbacks
    #[allow(clippy::too_many_arguments)]
    pub fn get_with_relationship_with_callbacks(
        &self,
        entity_references: &[EntityReference],
        relationship_traits_data: &TraitsData,
        result_trait_set: &TraitSet,
        relations_access: RelationsAccess,
        context: &Context,
        success: &mut SuccessCallback<'_, EntityReferences>,
        error: &mut BatchElementErrorCallback<'_>,
    ) -> Result<()> {
        trace!(operation = "get_with_relationship", batch_size = entity_references.len(), "Dispatching batch");
        self.manager_interface.get_with_relationship(
            entity_references,
            relationship_traits_data,
            result_trait_set,
            relations_access,
            context,
            &self.host_session,
            success,
            error,
        )
    }

    /// Entities related to one entity by each relationship, reporting through callbacks
    #[allow(clippy::too_many_arguments)]
    pub fn get_with_relationships_with_callbacks(
        &self,
        entity_reference: &EntityReference,
        relationship_traits_datas: &[TraitsData],
        result_trait_set: &TraitSet,
        relations_access: RelationsAccess,
        context: &Context,
        success: &mut SuccessCallback<'_, EntityReferences>,
        error: &mut BatchElementErrorCallback<'_>,
    ) -> Result<()> {
        trace!(
            operation = "get_with_relationships",
            batch_size = relationship_traits_datas.len(),
            "Dispatching batch"
        );
        self.manager_interface.get_with_relationships(
            entity_reference,
            relationship_traits_datas,
            result_trait_set,
            relations_access,
            context,
            &self.host_session,
            success,
            error,
        )
    }

    /// Paged form of [`get_with_relationship_with_callbacks`](Self::get_with_relationship_with_callbacks)
    #[allow(clippy::too_many_arguments)]
    pub fn get_with_relationship_paged_with_callbacks(
        &self,
        entity_references: &[EntityReference],
        relationship_traits_data: &TraitsData,
        result_trait_set: &TraitSet,
        page_size: usize,
        relations_access: RelationsAccess,
        context: &Context,
        success: &mut SuccessCallback<'_, EntityReferencePager>,
        error: &mut BatchElementErrorCallback<'_>,
    ) -> Result<()> {
        check_page_size(page_size)?;
        trace!(
            operation = "get_with_relationship_paged",
            batch_size = entity_references.len(),
            page_size,
            "Dispatching batch"
        );
        let host_session = &self.host_session;
        let mut wrap = |index: usize, pager_interface: EntityReferencePagerInterfacePtr| {
            success(index, EntityReferencePager::new(pager_interface, host_session.clone()))
        };
        self.manager_interface.get_with_relationship_paged(
            entity_references,
            relationship_traits_data,
            result_trait_set,
            page_size,
            relations_access,
            context,
            host_session,
            &mut wrap,
            error,
        )
    }

    /// Paged form of [`get_with_relationships_with_callbacks`](Self::get_with_relationships_with_callbacks)
    #[allow(clippy::too_many_arguments)]
    pub fn get_with_relationships_paged_with_callbacks(
        &self,
        entity_reference: &EntityReference,
        relationship_traits_datas: &[TraitsData],
        result_trait_set: &TraitSet,
        page_size: usize,
        relations_access: RelationsAccess,
        context: &Context,
        success: &mut SuccessCallback<'_, EntityReferencePager>,
        error: &mut BatchElementErrorCallback<'_>,
    ) -> Result<()> {
        check_page_size(page_size)?;
        trace!(
            operation = "get_with_relationships_paged",
            batch_size = relationship_traits_datas.len(),
            page_size,
            "Dispatching batch"
        );
        let host_session = &self.host_session;
        let mut wrap = |index: usize, pager_interface: EntityReferencePagerInterfacePtr| {
            success(index, EntityReferencePager::new(pager_interface, host_session.clone()))
        };
        self.manager_interface.get_with_relationships_paged(
            entity_reference,
            relationship_traits_datas,
            result_trait_set,
            page_size,
            relations_access,
            context,
            host_session,
            &mut wrap,
            error,
        )
    }
}

fn check_same_length(references: usize, others: usize, what: &str) -> Result<()> {
    if references != others {
        return Err(Error::InputValidation(format!(
            "Parameter lists must be of the same length: {} entity references vs. {} {}.",
            references, others, what
        )));
    }
    Ok(())
}

fn check_same_trait_set(traits_datas: &[TraitsData]) -> Result<()> {
    let Some((first, rest)) = traits_datas.split_first() else {
        return Ok(());
    };
    let expected = first.trait_set();
    match rest.iter().position(|data| data.trait_set() != expected) {
        Some(position) => Err(Error::InputValidation(format!(
            "Mismatched traits at index {}",
            position + 1
        ))),
        None => Ok(()),
    }
}

fn check_page_size(page_size: usize) -> Result<()> {
    if page_size == 0 {
        return Err(Error::InputValidation("pageSize must be greater than zero.".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_same_length() {
        assert_eq!(check_same_length(2, 2, "traits hints"), Ok(()));
        assert_eq!(
            check_same_length(2, 1, "traits hints"),
            Err(Error::InputValidation(
                "Parameter lists must be of the same length: 2 entity references vs. 1 traits hints."
                    .to_string()
            ))
        );
    }

    #[test]
    fn test_check_page_size() {
        assert_eq!(check_page_size(1), Ok(()));
        assert_eq!(
            check_page_size(0),
            Err(Error::InputValidation("pageSize must be greater than zero.".to_string()))
        );
    }
}
