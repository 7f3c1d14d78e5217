use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use assert_matches::assert_matches;
use tracing_test::traced_test;

use assetbridge_core::{
    Access, Context, EntityReference, Error, InfoDictionary, PolicyAccess, Result, TraitSet,
    TraitsData, TraitsDatas, Value,
};
use assetbridge_host::{Manager, ENTITY_REFERENCES_MATCH_PREFIX_INFO_KEY};
use assetbridge_interfaces::{Capability, HostSession, ManagerInterface, StrMap};
use assetbridge_test_utils::implementations::MANAGED_TRAIT_ID;
use assetbridge_test_utils::{FakeManagerInterface, FakeState, TestHost};

// Logs are captured by `traced_test`, so this binary never installs its
// own subscriber.

fn setup(fake: FakeManagerInterface) -> (Arc<FakeManagerInterface>, Manager) {
    let fake = Arc::new(fake);
    let manager = Manager::new(fake.clone(), TestHost::default().session());
    (fake, manager)
}

#[test]
fn test_identity_is_forwarded() {
    let (_fake, manager) = setup(
        FakeManagerInterface::new("org.example.fake")
            .with_display_name("Example")
            .with_info("version", "1.2"),
    );

    assert_eq!(manager.identifier(), "org.example.fake");
    assert_eq!(manager.display_name(), "Example");
    assert_eq!(manager.info().get("version"), Some(&Value::from("1.2")));
    assert_eq!(manager.host_session().host().identifier(), "org.assetbridge.test.host");
}

#[test]
fn test_initialize_passes_settings() {
    let (_fake, mut manager) = setup(FakeManagerInterface::new("org.example.fake"));
    let settings = InfoDictionary::from([
        ("library".to_string(), Value::from("/tmp/library")),
        ("verbose".to_string(), Value::from(true)),
    ]);

    manager.initialize(settings.clone()).unwrap();

    assert_eq!(manager.settings(), settings);
}

#[traced_test]
#[test]
fn test_initialize_rejects_missing_capabilities() {
    let (_fake, mut manager) = setup(
        FakeManagerInterface::new("org.example.fake")
            .without_capability(Capability::EntityReferenceIdentification)
            .without_capability(Capability::EntityTraitIntrospection),
    );

    let result = manager.initialize(InfoDictionary::new());

    assert_eq!(
        result,
        Err(Error::Configuration(
            "Manager implementation for 'org.example.fake' does not support the required \
             capabilities: entityReferenceIdentification, entityTraitIntrospection"
                .to_string()
        ))
    );
    assert!(logs_contain("does not support the required capabilities"));
}

#[test]
fn test_optional_capabilities_are_not_required() {
    let (_fake, mut manager) = setup(
        FakeManagerInterface::new("org.example.fake").with_capabilities(Capability::REQUIRED),
    );

    assert_eq!(manager.initialize(InfoDictionary::new()), Ok(()));
    assert!(!manager.has_capability(Capability::Publishing));
    assert!(manager.has_capability(Capability::ManagementPolicyQueries));
}

#[traced_test]
#[test]
fn test_prefix_from_info_skips_manager() {
    let (fake, mut manager) = setup(
        FakeManagerInterface::new("org.example.fake")
            .with_info(ENTITY_REFERENCES_MATCH_PREFIX_INFO_KEY, "fake://"),
    );

    manager.initialize(InfoDictionary::new()).unwrap();

    assert!(logs_contain(
        "Entity reference prefix 'fake://' provided by manager's info() dict."
    ));
    assert!(manager.is_entity_reference_string("fake://asset"));
    assert!(!manager.is_entity_reference_string("other://asset"));
    assert_eq!(fake.reference_checks(), 0);
}

#[traced_test]
#[test]
fn test_prefix_of_wrong_type_is_ignored() {
    let (fake, mut manager) = setup(
        FakeManagerInterface::new("org.example.fake")
            .with_info(ENTITY_REFERENCES_MATCH_PREFIX_INFO_KEY, 3i64),
    );

    manager.initialize(InfoDictionary::new()).unwrap();

    assert!(logs_contain(
        "Entity reference prefix given but is an invalid type: should be a string."
    ));
    assert!(manager.is_entity_reference_string("fake://asset"));
    assert_eq!(fake.reference_checks(), 1);
}

/// Manager advertising a prefix, whose capabilities can be withdrawn
#[derive(Default)]
struct WithdrawingManager {
    withdrawn: AtomicBool,
    reference_checks: AtomicUsize,
}

impl ManagerInterface for WithdrawingManager {
    fn identifier(&self) -> String {
        "org.example.withdrawing".to_string()
    }

    fn display_name(&self) -> String {
        "Withdrawing".to_string()
    }

    fn info(&self) -> InfoDictionary {
        InfoDictionary::from([(
            ENTITY_REFERENCES_MATCH_PREFIX_INFO_KEY.to_string(),
            Value::from("withdrawing://"),
        )])
    }

    fn initialize(&self, _settings: InfoDictionary, _hs: &HostSession) -> Result<()> {
        Ok(())
    }

    fn has_capability(&self, _capability: Capability) -> bool {
        !self.withdrawn.load(Ordering::SeqCst)
    }

    fn management_policy(
        &self,
        trait_sets: &[TraitSet],
        _access: PolicyAccess,
        _context: &Context,
        _hs: &HostSession,
    ) -> Result<TraitsDatas> {
        Ok(vec![TraitsData::new(); trait_sets.len()])
    }

    fn is_entity_reference_string(&self, _some_string: &str, _hs: &HostSession) -> bool {
        self.reference_checks.fetch_add(1, Ordering::SeqCst);
        false
    }
}

#[test]
fn test_failed_reinitialize_drops_prefix() {
    let plugin = Arc::new(WithdrawingManager::default());
    let mut manager = Manager::new(plugin.clone(), TestHost::default().session());

    manager.initialize(InfoDictionary::new()).unwrap();
    assert!(manager.is_entity_reference_string("withdrawing://asset"));
    assert_eq!(plugin.reference_checks.load(Ordering::SeqCst), 0);

    plugin.withdrawn.store(true, Ordering::SeqCst);
    assert_matches!(manager.initialize(InfoDictionary::new()), Err(Error::Configuration(_)));

    assert!(!manager.is_entity_reference_string("withdrawing://asset"));
    assert_eq!(plugin.reference_checks.load(Ordering::SeqCst), 1);
}

#[test]
fn test_reference_check_uses_manager_without_prefix() {
    let (fake, manager) = setup(FakeManagerInterface::new("org.example.fake"));

    assert!(manager.is_entity_reference_string("fake://asset"));
    assert!(!manager.is_entity_reference_string("/some/path"));
    assert_eq!(fake.reference_checks(), 2);
}

#[test]
fn test_create_entity_reference() {
    let (_fake, manager) = setup(FakeManagerInterface::new("org.example.fake"));

    assert_eq!(
        manager.create_entity_reference("fake://asset"),
        Ok(EntityReference::new("fake://asset"))
    );
    assert_eq!(
        manager.create_entity_reference("bogus"),
        Err(Error::InputValidation("Invalid entity reference: bogus".to_string()))
    );
    assert_eq!(
        manager.create_entity_reference_if_valid("fake://asset"),
        Some(EntityReference::new("fake://asset"))
    );
    assert_eq!(manager.create_entity_reference_if_valid("bogus"), None);
}

#[test]
fn test_create_context_with_state() {
    let (fake, manager) = setup(FakeManagerInterface::new("org.example.fake"));

    let context = manager.create_context().unwrap();

    assert_eq!(context.access, Access::Unknown);
    assert_eq!(
        context.state_as::<FakeState>().map(|state| state.id.as_str()),
        Some("state-1")
    );
    assert_eq!(fake.state_calls(), vec!["create_state"]);
}

#[test]
fn test_create_context_without_stateful_capability() {
    let (fake, manager) = setup(
        FakeManagerInterface::new("org.example.fake").without_capability(Capability::StatefulContexts),
    );

    let context = manager.create_context().unwrap();

    assert!(context.manager_state.is_none());
    assert!(fake.state_calls().is_empty());
}

#[test]
fn test_child_context_derives_state_and_copies_locale() {
    let (fake, manager) = setup(FakeManagerInterface::new("org.example.fake"));
    let mut parent = manager.create_context().unwrap();
    parent.access = Access::Write;
    parent.locale.set_trait_property("test:locale", "application", "compositor");

    let child = manager.create_child_context(&parent).unwrap();

    assert_eq!(child.access, Access::Write);
    assert_eq!(child.locale, parent.locale);
    assert_eq!(
        child.state_as::<FakeState>(),
        Some(&FakeState {
            id: "state-2".to_string(),
            parent: Some("state-1".to_string()),
        })
    );
    assert_eq!(fake.state_calls(), vec!["create_state", "create_child_state"]);
}

#[test]
fn test_child_of_stateless_context_has_no_state() {
    let (fake, manager) = setup(FakeManagerInterface::new("org.example.fake"));

    let child = manager.create_child_context(&Context::new()).unwrap();

    assert!(child.manager_state.is_none());
    assert!(fake.state_calls().is_empty());
}

#[test]
fn test_persistence_token_round_trip() {
    let (_fake, manager) = setup(FakeManagerInterface::new("org.example.fake"));
    let context = manager.create_context().unwrap();

    let token = manager.persistence_token_for_context(&context).unwrap();
    let restored = manager.context_from_persistence_token(&token).unwrap();

    assert!(!token.is_empty());
    assert_eq!(restored.state_as::<FakeState>(), context.state_as::<FakeState>());
}

#[test]
fn test_empty_persistence_token() {
    let (fake, manager) = setup(FakeManagerInterface::new("org.example.fake"));

    let token = manager.persistence_token_for_context(&Context::new()).unwrap();
    let restored = manager.context_from_persistence_token(&token).unwrap();

    assert_eq!(token, "");
    assert!(restored.manager_state.is_none());
    assert!(fake.state_calls().is_empty());
}

#[test]
fn test_invalid_persistence_token() {
    let (_fake, manager) = setup(FakeManagerInterface::new("org.example.fake"));

    let result = manager.context_from_persistence_token("{not a token");

    assert_matches!(result, Err(Error::InputValidation(msg)) if msg.starts_with("Invalid persistence token"));
}

#[test]
fn test_update_terminology() {
    let (_fake, manager) = setup(FakeManagerInterface::new("org.example.fake").with_terminology("asset", "shot"));
    let terms = StrMap::from([
        ("asset".to_string(), "asset".to_string()),
        ("publish".to_string(), "publish".to_string()),
    ]);

    let updated = manager.update_terminology(terms).unwrap();

    assert_eq!(updated.get("asset").map(String::as_str), Some("shot"));
    assert_eq!(updated.get("publish").map(String::as_str), Some("publish"));
}

#[test]
fn test_flush_caches() {
    let (fake, manager) = setup(FakeManagerInterface::new("org.example.fake"));

    manager.flush_caches().unwrap();
    manager.flush_caches().unwrap();

    assert_eq!(fake.flush_count(), 2);
}

#[test]
fn test_management_policy() {
    let (fake, manager) = setup(FakeManagerInterface::new("org.example.fake"));
    let trait_sets: Vec<TraitSet> = vec![
        ["a".to_string()].into_iter().collect(),
        ["b".to_string(), "c".to_string()].into_iter().collect(),
    ];

    let policies = manager
        .management_policy(&trait_sets, PolicyAccess::Write, &Context::new())
        .unwrap();

    assert_eq!(policies.len(), 2);
    assert!(policies.iter().all(|policy| policy.has_trait(MANAGED_TRAIT_ID)));
    assert_eq!(fake.calls()[0].access, Some(Access::Write));
}
