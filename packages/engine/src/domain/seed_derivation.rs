//! RNG seed derivation for deterministic shuffles.
//!
//! A session stores one base seed; every shuffle derives its own seed from
//! it, so replaying the same operations against the same seed reproduces the
//! same card order.

/// Derive the seed for the `shuffle_no`-th shuffle of a session.
///
/// Shuffle 0 is the opening shuffle at game start; later numbers are
/// discard-pile reshuffles.
pub fn derive_shuffle_seed(session_seed: u64, shuffle_no: u32) -> u64 {
    // SplitMix64 finaliser over (seed + golden-ratio stride * n) keeps nearby
    // shuffle numbers far apart in seed space.
    let mut z = session_seed
        .wrapping_add(0x9E37_79B9_7F4A_7C15u64.wrapping_mul(u64::from(shuffle_no) + 1));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
