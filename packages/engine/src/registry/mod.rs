//! Concurrent ownership of live sessions.

pub mod session_registry;

pub use session_registry::SessionRegistry;
