//! Scripted in-memory manager implementation.
//!
//! Each batch operation replays a fixed script of success and error
//! callbacks, in script order, so tests control exactly which indices are
//! reported and in what order. Every call and every callback delivery is
//! recorded for inspection.

use std::any::Any;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use assetbridge_core::{
    Access, BatchElementError, Context, DefaultEntityAccess, EntityReference, EntityReferences,
    EntityTraitsAccess, Error, Identifier, InfoDictionary, ManagerState, ManagerStatePtr,
    PolicyAccess, PublishingAccess, RelationsAccess, ResolveAccess, Result, TraitSet, TraitsData,
    TraitsDatas, Value,
};
use assetbridge_interfaces::{
    BatchElementErrorCallback, Capability, EntityReferencePagerInterfacePtr, HostSession,
    ManagerInterface, StrMap, SuccessCallback,
};

use super::fake_pager::FakePager;

/// Trait added to every management policy answer of the fake.
pub const MANAGED_TRAIT_ID: &str = "assetbridge:managed";

/// One scripted callback invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply<T> {
    /// Call the success callback for the index with the value.
    Success(usize, T),
    /// Call the error callback for the index with the error.
    Error(usize, BatchElementError),
}

/// A batch operation call received by the fake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    /// Name of the operation.
    pub operation: &'static str,
    /// Number of elements in the batch.
    pub batch_size: usize,
    /// Access mode, for operations taking one.
    pub access: Option<Access>,
}

/// A callback invocation made by the fake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    /// Name of the operation.
    pub operation: &'static str,
    /// Element index reported.
    pub index: usize,
    /// Whether the success callback (rather than the error callback) was used.
    pub success: bool,
    /// Whether the callback returned `Ok`.
    pub accepted: bool,
}

/// Manager state handed out by the fake.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FakeState {
    /// Unique id of the state.
    pub id: String,
    /// Id of the state this one was derived from.
    pub parent: Option<String>,
}

impl ManagerState for FakeState {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[derive(Debug, Default)]
struct Script {
    resolve: Vec<Reply<TraitsData>>,
    preflight: Vec<Reply<EntityReference>>,
    register: Vec<Reply<EntityReference>>,
    entity_exists: Vec<Reply<bool>>,
    entity_traits: Vec<Reply<TraitSet>>,
    default_entity_reference: Vec<Reply<Option<EntityReference>>>,
    get_with_relationship: Vec<Reply<EntityReferences>>,
    get_with_relationships: Vec<Reply<EntityReferences>>,
    get_with_relationship_paged: Vec<Reply<Vec<EntityReferences>>>,
    get_with_relationships_paged: Vec<Reply<Vec<EntityReferences>>>,
}

/// Scripted fake manager.
#[derive(Debug)]
pub struct FakeManagerInterface {
    identifier: Identifier,
    display_name: String,
    info: InfoDictionary,
    capabilities: Vec<Capability>,
    reference_prefix: String,
    terminology: StrMap,
    swallow_callback_errors: bool,
    batch_failure: Option<Error>,
    script: Script,
    settings: Mutex<InfoDictionary>,
    calls: Mutex<Vec<RecordedCall>>,
    deliveries: Mutex<Vec<Delivery>>,
    state_calls: Mutex<Vec<&'static str>>,
    reference_checks: AtomicUsize,
    next_state_id: AtomicUsize,
    flushes: AtomicUsize,
    released_pagers: Arc<AtomicUsize>,
}

impl FakeManagerInterface {
    /// Creates a fake with every capability, recognising references
    /// starting with `fake://`.
    pub fn new(identifier: impl Into<Identifier>) -> Self {
        let identifier = identifier.into();
        Self {
            display_name: format!("Fake Manager ({})", identifier),
            identifier,
            info: InfoDictionary::new(),
            capabilities: Capability::ALL.to_vec(),
            reference_prefix: "fake://".to_string(),
            terminology: StrMap::new(),
            swallow_callback_errors: false,
            batch_failure: None,
            script: Script::default(),
            settings: Mutex::new(InfoDictionary::new()),
            calls: Mutex::new(Vec::new()),
            deliveries: Mutex::new(Vec::new()),
            state_calls: Mutex::new(Vec::new()),
            reference_checks: AtomicUsize::new(0),
            next_state_id: AtomicUsize::new(0),
            flushes: AtomicUsize::new(0),
            released_pagers: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Sets the display name.
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }

    /// Adds an `info()` entry.
    pub fn with_info(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.info.insert(key.into(), value.into());
        self
    }

    /// Replaces the supported capabilities.
    pub fn with_capabilities(mut self, capabilities: impl IntoIterator<Item = Capability>) -> Self {
        self.capabilities = capabilities.into_iter().collect();
        self
    }

    /// Removes one capability.
    pub fn without_capability(mut self, capability: Capability) -> Self {
        self.capabilities.retain(|c| *c != capability);
        self
    }

    /// Sets the prefix `is_entity_reference_string` checks for.
    pub fn with_reference_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.reference_prefix = prefix.into();
        self
    }

    /// Adds a terminology substitution.
    pub fn with_terminology(mut self, term: impl Into<String>, replacement: impl Into<String>) -> Self {
        self.terminology.insert(term.into(), replacement.into());
        self
    }

    /// Keeps delivering scripted callbacks even after one returns `Err`,
    /// as a misbehaving manager would.
    pub fn swallowing_callback_errors(mut self) -> Self {
        self.swallow_callback_errors = true;
        self
    }

    /// Fails every batch operation with `error` before any callback.
    pub fn failing_batches_with(mut self, error: Error) -> Self {
        self.batch_failure = Some(error);
        self
    }

    /// Scripts `resolve`.
    pub fn with_resolve(mut self, replies: Vec<Reply<TraitsData>>) -> Self {
        self.script.resolve = replies;
        self
    }

    /// Scripts `preflight`.
    pub fn with_preflight(mut self, replies: Vec<Reply<EntityReference>>) -> Self {
        self.script.preflight = replies;
        self
    }

    /// Scripts `register`.
    pub fn with_register(mut self, replies: Vec<Reply<EntityReference>>) -> Self {
        self.script.register = replies;
        self
    }

    /// Scripts `entity_exists`.
    pub fn with_entity_exists(mut self, replies: Vec<Reply<bool>>) -> Self {
        self.script.entity_exists = replies;
        self
    }

    /// Scripts `entity_traits`.
    pub fn with_entity_traits(mut self, replies: Vec<Reply<TraitSet>>) -> Self {
        self.script.entity_traits = replies;
        self
    }

    /// Scripts `default_entity_reference`.
    pub fn with_default_entity_reference(mut self, replies: Vec<Reply<Option<EntityReference>>>) -> Self {
        self.script.default_entity_reference = replies;
        self
    }

    /// Scripts `get_with_relationship`.
    pub fn with_get_with_relationship(mut self, replies: Vec<Reply<EntityReferences>>) -> Self {
        self.script.get_with_relationship = replies;
        self
    }

    /// Scripts `get_with_relationships`.
    pub fn with_get_with_relationships(mut self, replies: Vec<Reply<EntityReferences>>) -> Self {
        self.script.get_with_relationships = replies;
        self
    }

    /// Scripts `get_with_relationship_paged`; each success carries the pages
    /// of a [`FakePager`].
    pub fn with_get_with_relationship_paged(mut self, replies: Vec<Reply<Vec<EntityReferences>>>) -> Self {
        self.script.get_with_relationship_paged = replies;
        self
    }

    /// Scripts `get_with_relationships_paged`; each success carries the pages
    /// of a [`FakePager`].
    pub fn with_get_with_relationships_paged(mut self, replies: Vec<Reply<Vec<EntityReferences>>>) -> Self {
        self.script.get_with_relationships_paged = replies;
        self
    }

    /// Batch operation calls received so far.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    /// Callback invocations made so far.
    pub fn deliveries(&self) -> Vec<Delivery> {
        self.deliveries.lock().clone()
    }

    /// State methods called so far, by name.
    pub fn state_calls(&self) -> Vec<&'static str> {
        self.state_calls.lock().clone()
    }

    /// Number of `is_entity_reference_string` calls.
    pub fn reference_checks(&self) -> usize {
        self.reference_checks.load(Ordering::SeqCst)
    }

    /// Number of `flush_caches` calls.
    pub fn flush_count(&self) -> usize {
        self.flushes.load(Ordering::SeqCst)
    }

    /// Number of pagers handed out and since dropped.
    pub fn released_pagers(&self) -> usize {
        self.released_pagers.load(Ordering::SeqCst)
    }

    fn record(&self, operation: &'static str, batch_size: usize, access: Option<Access>) {
        self.calls.lock().push(RecordedCall {
            operation,
            batch_size,
            access,
        });
    }

    fn next_state(&self, parent: Option<String>) -> FakeState {
        let id = self.next_state_id.fetch_add(1, Ordering::SeqCst) + 1;
        FakeState {
            id: format!("state-{}", id),
            parent,
        }
    }

    fn deliver<T: Clone>(
        &self,
        operation: &'static str,
        replies: &[Reply<T>],
        success: &mut SuccessCallback<'_, T>,
        error: &mut BatchElementErrorCallback<'_>,
    ) -> Result<()> {
        self.deliver_mapped(operation, replies, T::clone, success, error)
    }

    fn deliver_mapped<T, U>(
        &self,
        operation: &'static str,
        replies: &[Reply<T>],
        map: impl Fn(&T) -> U,
        success: &mut SuccessCallback<'_, U>,
        error: &mut BatchElementErrorCallback<'_>,
    ) -> Result<()> {
        if let Some(failure) = &self.batch_failure {
            return Err(failure.clone());
        }

        for reply in replies {
            let (index, succeeded, outcome) = match reply {
                Reply::Success(index, value) => (*index, true, success(*index, map(value))),
                Reply::Error(index, batch_error) => (*index, false, error(*index, batch_error.clone())),
            };

            self.deliveries.lock().push(Delivery {
                operation,
                index,
                success: succeeded,
                accepted: outcome.is_ok(),
            });

            if let Err(err) = outcome {
                if !self.swallow_callback_errors {
                    return Err(err);
                }
            }
        }
        Ok(())
    }

    fn pager(&self, pages: &[EntityReferences]) -> EntityReferencePagerInterfacePtr {
        Box::new(FakePager::new(pages.to_vec(), self.released_pagers.clone()))
    }

    fn downcast_state<'a>(&self, state: &'a ManagerStatePtr) -> Result<&'a FakeState> {
        state
            .as_any()
            .downcast_ref::<FakeState>()
            .ok_or_else(|| Error::InputValidation("Manager state was not created by this manager.".to_string()))
    }
}

impl ManagerInterface for FakeManagerInterface {
    fn identifier(&self) -> Identifier {
        self.identifier.clone()
    }

    fn display_name(&self) -> String {
        self.display_name.clone()
    }

    fn info(&self) -> InfoDictionary {
        self.info.clone()
    }

    fn settings(&self, _host_session: &HostSession) -> InfoDictionary {
        self.settings.lock().clone()
    }

    fn initialize(&self, manager_settings: InfoDictionary, _host_session: &HostSession) -> Result<()> {
        *self.settings.lock() = manager_settings;
        Ok(())
    }

    fn update_terminology(&self, mut terms: StrMap, _host_session: &HostSession) -> Result<StrMap> {
        for (term, value) in terms.iter_mut() {
            if let Some(replacement) = self.terminology.get(term) {
                *value = replacement.clone();
            }
        }
        Ok(terms)
    }

    fn flush_caches(&self, _host_session: &HostSession) -> Result<()> {
        self.flushes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn has_capability(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }

    fn management_policy(
        &self,
        trait_sets: &[TraitSet],
        policy_access: PolicyAccess,
        _context: &Context,
        _host_session: &HostSession,
    ) -> Result<TraitsDatas> {
        self.record("management_policy", trait_sets.len(), Some(policy_access.into()));
        Ok(trait_sets
            .iter()
            .map(|_| TraitsData::with_traits([MANAGED_TRAIT_ID]))
            .collect())
    }

    fn create_state(&self, _host_session: &HostSession) -> Result<ManagerStatePtr> {
        self.state_calls.lock().push("create_state");
        Ok(Arc::new(self.next_state(None)))
    }

    fn create_child_state(
        &self,
        parent_state: &ManagerStatePtr,
        _host_session: &HostSession,
    ) -> Result<ManagerStatePtr> {
        self.state_calls.lock().push("create_child_state");
        let parent = self.downcast_state(parent_state)?;
        Ok(Arc::new(self.next_state(Some(parent.id.clone()))))
    }

    fn persistence_token_for_state(
        &self,
        state: &ManagerStatePtr,
        _host_session: &HostSession,
    ) -> Result<String> {
        self.state_calls.lock().push("persistence_token_for_state");
        let state = self.downcast_state(state)?;
        serde_json::to_string(state).map_err(|e| Error::Unhandled(e.to_string()))
    }

    fn state_from_persistence_token(
        &self,
        token: &str,
        _host_session: &HostSession,
    ) -> Result<ManagerStatePtr> {
        self.state_calls.lock().push("state_from_persistence_token");
        let state: FakeState = serde_json::from_str(token)
            .map_err(|e| Error::InputValidation(format!("Invalid persistence token: {}", e)))?;
        Ok(Arc::new(state))
    }

    fn is_entity_reference_string(&self, some_string: &str, _host_session: &HostSession) -> bool {
        self.reference_checks.fetch_add(1, Ordering::SeqCst);
        some_string.starts_with(self.reference_prefix.as_str())
    }

    fn resolve(
        &self,
        entity_references: &[EntityReference],
        _trait_set: &TraitSet,
        resolve_access: ResolveAccess,
        _context: &Context,
        _host_session: &HostSession,
        success: &mut SuccessCallback<'_, TraitsData>,
        error: &mut BatchElementErrorCallback<'_>,
    ) -> Result<()> {
        self.record("resolve", entity_references.len(), Some(resolve_access.into()));
        self.deliver("resolve", &self.script.resolve, success, error)
    }

    fn preflight(
        &self,
        entity_references: &[EntityReference],
        _traits_hints: &[TraitsData],
        publishing_access: PublishingAccess,
        _context: &Context,
        _host_session: &HostSession,
        success: &mut SuccessCallback<'_, EntityReference>,
        error: &mut BatchElementErrorCallback<'_>,
    ) -> Result<()> {
        self.record("preflight", entity_references.len(), Some(publishing_access.into()));
        self.deliver("preflight", &self.script.preflight, success, error)
    }

    fn register(
        &self,
        entity_references: &[EntityReference],
        _entity_traits_datas: &[TraitsData],
        publishing_access: PublishingAccess,
        _context: &Context,
        _host_session: &HostSession,
        success: &mut SuccessCallback<'_, EntityReference>,
        error: &mut BatchElementErrorCallback<'_>,
    ) -> Result<()> {
        self.record("register", entity_references.len(), Some(publishing_access.into()));
        self.deliver("register", &self.script.register, success, error)
    }

    fn entity_exists(
        &self,
        entity_references: &[EntityReference],
        _context: &Context,
        _host_session: &HostSession,
        success: &mut SuccessCallback<'_, bool>,
        error: &mut BatchElementErrorCallback<'_>,
    ) -> Result<()> {
        self.record("entity_exists", entity_references.len(), None);
        self.deliver("entity_exists", &self.script.entity_exists, success, error)
    }

    fn entity_traits(
        &self,
        entity_references: &[EntityReference],
        entity_traits_access: EntityTraitsAccess,
        _context: &Context,
        _host_session: &HostSession,
        success: &mut SuccessCallback<'_, TraitSet>,
        error: &mut BatchElementErrorCallback<'_>,
    ) -> Result<()> {
        self.record("entity_traits", entity_references.len(), Some(entity_traits_access.into()));
        self.deliver("entity_traits", &self.script.entity_traits, success, error)
    }

    fn default_entity_reference(
        &self,
        trait_sets: &[TraitSet],
        default_entity_access: DefaultEntityAccess,
        _context: &Context,
        _host_session: &HostSession,
        success: &mut SuccessCallback<'_, Option<EntityReference>>,
        error: &mut BatchElementErrorCallback<'_>,
    ) -> Result<()> {
        self.record("default_entity_reference", trait_sets.len(), Some(default_entity_access.into()));
        self.deliver(
            "default_entity_reference",
            &self.script.default_entity_reference,
            success,
            error,
        )
    }

    fn get_with_relationship(
        &self,
        entity_references: &[EntityReference],
        _relationship_traits_data: &TraitsData,
        _result_trait_set: &TraitSet,
        relations_access: RelationsAccess,
        _context: &Context,
        _host_session: &HostSession,
        success: &mut SuccessCallback<'_, EntityReferences>,
        error: &mut BatchElementErrorCallback<'_>,
    ) -> Result<()> {
        self.record("get_with_relationship", entity_references.len(), Some(relations_access.into()));
        self.deliver("get_with_relationship", &self.script.get_with_relationship, success, error)
    }

    fn get_with_relationships(
        &self,
        _entity_reference: &EntityReference,
        relationship_traits_datas: &[TraitsData],
        _result_trait_set: &TraitSet,
        relations_access: RelationsAccess,
        _context: &Context,
        _host_session: &HostSession,
        success: &mut SuccessCallback<'_, EntityReferences>,
        error: &mut BatchElementErrorCallback<'_>,
    ) -> Result<()> {
        self.record(
            "get_with_relationships",
            relationship_traits_datas.len(),
            Some(relations_access.into()),
        );
        self.deliver("get_with_relationships", &self.script.get_with_relationships, success, error)
    }

    fn get_with_relationship_paged(
        &self,
        entity_references: &[EntityReference],
        _relationship_traits_data: &TraitsData,
        _result_trait_set: &TraitSet,
        _page_size: usize,
        relations_access: RelationsAccess,
        _context: &Context,
        _host_session: &HostSession,
        success: &mut SuccessCallback<'_, EntityReferencePagerInterfacePtr>,
        error: &mut BatchElementErrorCallback<'_>,
    ) -> Result<()> {
        self.record(
            "get_with_relationship_paged",
            entity_references.len(),
            Some(relations_access.into()),
        );
        self.deliver_mapped(
            "get_with_relationship_paged",
            &self.script.get_with_relationship_paged,
            |pages| self.pager(pages),
            success,
            error,
        )
    }

    fn get_with_relationships_paged(
        &self,
        _entity_reference: &EntityReference,
        relationship_traits_datas: &[TraitsData],
        _result_trait_set: &TraitSet,
        _page_size: usize,
        relations_access: RelationsAccess,
        _context: &Context,
        _host_session: &HostSession,
        success: &mut SuccessCallback<'_, EntityReferencePagerInterfacePtr>,
        error: &mut BatchElementErrorCallback<'_>,
    ) -> Result<()> {
        self.record(
            "get_with_relationships_paged",
            relationship_traits_datas.len(),
            Some(relations_access.into()),
        );
        self.deliver_mapped(
            "get_with_relationships_paged",
            &self.script.get_with_relationships_paged,
            |pages| self.pager(pages),
            success,
            error,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TestHost;
    use assert_matches::assert_matches;
    use assetbridge_core::ErrorCode;

    #[test]
    fn test_replays_script_in_order() {
        let fake = FakeManagerInterface::new("org.example.fake").with_entity_exists(vec![
            Reply::Success(1, true),
            Reply::Error(0, BatchElementError::new(ErrorCode::Unknown, "x")),
        ]);
        let hs = TestHost::default().session();
        let mut seen = Vec::new();
        let mut errors = Vec::new();

        fake.entity_exists(
            &[EntityReference::new("fake://a"), EntityReference::new("fake://b")],
            &Context::new(),
            &hs,
            &mut |index, value| {
                seen.push((index, value));
                Ok(())
            },
            &mut |index, _| {
                errors.push(index);
                Ok(())
            },
        )
        .unwrap();

        assert_eq!(seen, vec![(1, true)]);
        assert_eq!(errors, vec![0]);
        assert_eq!(fake.calls()[0].batch_size, 2);
        assert_eq!(fake.deliveries().len(), 2);
    }

    #[test]
    fn test_state_round_trip() {
        let fake = FakeManagerInterface::new("org.example.fake");
        let hs = TestHost::default().session();

        let state = fake.create_state(&hs).unwrap();
        let token = fake.persistence_token_for_state(&state, &hs).unwrap();
        let restored = fake.state_from_persistence_token(&token, &hs).unwrap();

        assert_eq!(
            restored.as_any().downcast_ref::<FakeState>(),
            state.as_any().downcast_ref::<FakeState>()
        );
        assert_matches!(
            fake.state_from_persistence_token("not json", &hs),
            Err(Error::InputValidation(_))
        );
    }
}
