#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod config;
pub mod domain;
pub mod errors;
pub mod registry;
pub mod telemetry;
pub mod utils;

#[cfg(test)]
pub mod test_bootstrap;

// Re-exports for public API
pub use config::EngineConfig;
pub use domain::{
    Card, CardId, CardKind, CardLocation, Color, Direction, Event, EventKind, MemberView,
    PlayerId, Session, SessionSnapshot, SessionStatus,
};
pub use errors::{DomainError, ErrorCode};
pub use registry::SessionRegistry;
pub use telemetry::init_tracing;

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    test_bootstrap::logging::init();
}
