//! Helpers for generating unique test identities
//!
//! Tests in one binary share a process, so player ids come from a global
//! counter to keep sessions from colliding on membership.

use std::sync::atomic::{AtomicI64, Ordering};

static NEXT_PLAYER_ID: AtomicI64 = AtomicI64::new(1_000);

/// Next unused player id.
///
/// # Examples
/// ```
/// use engine_test_support::unique_helpers::unique_player_id;
///
/// let a = unique_player_id();
/// let b = unique_player_id();
/// assert_ne!(a, b);
/// ```
pub fn unique_player_id() -> i64 {
    NEXT_PLAYER_ID.fetch_add(1, Ordering::Relaxed)
}

/// `n` distinct player ids in increasing order.
pub fn unique_player_ids(n: usize) -> Vec<i64> {
    let first = NEXT_PLAYER_ID.fetch_add(n as i64, Ordering::Relaxed);
    (first..first + n as i64).collect()
}
