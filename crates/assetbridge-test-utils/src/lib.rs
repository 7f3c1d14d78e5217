//! Testing utilities for AssetBridge.
//!
//! This crate provides mocks of the plugin-facing interfaces, a scripted
//! fake manager implementation and logging setup for tests.

pub mod implementations;
pub mod logging;
pub mod mocks;

/// Re-export commonly used types for convenience
pub use mockall;

pub use implementations::{FakeManagerInterface, FakePager, FakeState, Reply, TestHost};
pub use logging::init_test_logging;
