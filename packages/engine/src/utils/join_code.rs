//! Join code generation for sessions.
//!
//! Join codes are short strings over Crockford's Base32 alphabet, so they
//! read aloud without ambiguity.

use rand::distr::{Distribution, Uniform};
use rand::Rng;

const CROCKFORD: &[u8] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ"; // no I, L, O, U

/// Generate a join code of `len` characters from the thread RNG.
///
/// # Example
/// ```
/// use uno_engine::utils::join_code::generate_join_code;
///
/// let code = generate_join_code(6);
/// assert_eq!(code.len(), 6);
/// ```
pub fn generate_join_code(len: usize) -> String {
    generate_join_code_with(&mut rand::rng(), len)
}

/// Generate a join code from a caller-supplied RNG.
pub fn generate_join_code_with<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    let dist = match Uniform::new(0, CROCKFORD.len()) {
        Ok(dist) => dist,
        Err(_) => return String::new(),
    };
    (0..len)
        .map(|_| CROCKFORD[dist.sample(rng)] as char)
        .collect()
}

/// Whether `code` could have come from this generator.
pub fn is_well_formed(code: &str) -> bool {
    !code.is_empty() && code.bytes().all(|b| CROCKFORD.contains(&b))
}
