//! Mock implementations of the AssetBridge interfaces.
//!
//! Use these where a test needs to set exact expectations on calls.
//! For scripted end-to-end behaviour prefer the fakes in
//! [`implementations`](crate::implementations).

pub mod host;
pub mod pager;

// Re-export all mocks and their creator functions for easy access
pub use host::*;
pub use pager::*;
