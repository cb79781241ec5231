//! Engine test support utilities
//!
//! Shared helpers for the engine's integration tests: unified logging
//! initialization and unique test identities.

pub mod logging;
pub mod unique_helpers;
