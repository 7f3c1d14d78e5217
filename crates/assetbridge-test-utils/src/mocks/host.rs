//! Mock implementation of the HostInterface trait.

use assetbridge_core::{Identifier, InfoDictionary};
use assetbridge_interfaces::HostInterface;
use mockall::mock;

mock! {
    pub HostInterface {}

    impl HostInterface for HostInterface {
        fn identifier(&self) -> Identifier;
        fn display_name(&self) -> String;
        fn info(&self) -> InfoDictionary;
    }
}

/// Creates a mock host answering identity queries any number of times.
pub fn create_mock_host_interface(identifier: &str, display_name: &str) -> MockHostInterface {
    let mut mock = MockHostInterface::new();
    let identifier = identifier.to_string();
    let display_name = display_name.to_string();

    mock.expect_identifier()
        .returning(move || identifier.clone());
    mock.expect_display_name()
        .returning(move || display_name.clone());
    mock.expect_info().returning(InfoDictionary::new);

    mock
}
