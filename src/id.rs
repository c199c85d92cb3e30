//! Short random identifiers for new book records.
//!
//! Identifiers are drawn from the 64-character URL-safe alphabet
//! (`A-Z a-z 0-9 _ -`) using the operating system's CSPRNG. At the default
//! length of 8 that is 48 bits of entropy, which is plenty for a collection
//! that lives in a single JSON file.

use rand::rngs::OsRng;
use rand::Rng;

/// Default identifier length.
pub const ID_LENGTH: usize = 8;

/// URL-safe alphabet. Every character can appear in a path segment unescaped.
pub const ALPHABET: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789_-";

/// Generate an identifier of [`ID_LENGTH`] characters.
pub fn generate() -> String {
    generate_with_len(ID_LENGTH)
}

/// Generate an identifier of `len` characters.
pub fn generate_with_len(len: usize) -> String {
    let mut rng = OsRng;
    (0..len)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}
