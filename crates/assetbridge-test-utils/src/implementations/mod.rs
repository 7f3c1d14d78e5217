//! Test implementations (fakes) of the AssetBridge interfaces.
//!
//! These implementations behave like a small in-memory manager and host,
//! with scripted batch replies, for higher-fidelity testing than mocks.

pub mod fake_manager;
pub mod fake_pager;
pub mod test_host;

// Re-export all implementations for easy access
pub use fake_manager::*;
pub use fake_pager::*;
pub use test_host::*;
