//! Mock implementation of the EntityReferencePagerInterface trait.

use assetbridge_core::{EntityReferences, Result};
use assetbridge_interfaces::{EntityReferencePagerInterface, HostSession};
use mockall::mock;

mock! {
    pub PagerInterface {}

    impl EntityReferencePagerInterface for PagerInterface {
        fn has_next(&mut self, host_session: &HostSession) -> Result<bool>;
        fn get(&mut self, host_session: &HostSession) -> Result<EntityReferences>;
        fn next(&mut self, host_session: &HostSession) -> Result<()>;
    }
}

/// Creates a mock pager serving `pages` in order, with each backend call
/// expected exactly as many times as a host walking every page makes it.
pub fn create_mock_pager_interface(pages: Vec<EntityReferences>) -> MockPagerInterface {
    let mut mock = MockPagerInterface::new();
    let page_count = pages.len();
    let mut seq = mockall::Sequence::new();

    for (position, page) in pages.into_iter().enumerate() {
        mock.expect_get()
            .times(1)
            .in_sequence(&mut seq)
            .returning(move |_| Ok(page.clone()));
        let more = position + 1 < page_count;
        mock.expect_has_next()
            .times(1)
            .in_sequence(&mut seq)
            .returning(move |_| Ok(more));
        if more {
            mock.expect_next()
                .times(1)
                .in_sequence(&mut seq)
                .returning(|_| Ok(()));
        }
    }

    mock
}
