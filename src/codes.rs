//! Short code generation

use rand::Rng;

/// Characters a short code is made of
pub const ALPHABET: &[u8; 62] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Length of a short code when nothing else is configured
pub const DEFAULT_LENGTH: usize = 6;

/// Generate a random short code of `length` characters
///
/// Every character is drawn independently from [`ALPHABET`](ALPHABET), there is no
/// uniqueness guarantee
pub fn generate(length: usize) -> String {
    let mut rng = rand::rng();

    (0..length)
        .map(|_| char::from(ALPHABET[rng.random_range(0..ALPHABET.len())]))
        .collect()
}
