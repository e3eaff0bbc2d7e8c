//! Join code generation.
//!
//! Group join codes are short strings drawn from an alphabet without the
//! easily confused characters `0`, `1`, `I` and `O`.

use rand::seq::IndexedRandom;

pub const BASE_ALPHABET: &str = "23456789ABCDEFGHJKLMNPQRSTUVWXYZ";
pub const SPECIALS: &str = "!@#$%&*?";
pub const DEFAULT_ALPHABET: &str = "23456789ABCDEFGHJKLMNPQRSTUVWXYZ!@#$%&*?";
pub const DEFAULT_CODE_LENGTH: usize = 4;

/// Generates a random join code of `length` characters.
///
/// Characters are picked uniformly from `alphabet` with the thread-local
/// CSPRNG. An empty alphabet falls back to [`DEFAULT_ALPHABET`].
pub fn generate_code(length: usize, alphabet: &str) -> String {
    let alphabet = if alphabet.is_empty() {
        DEFAULT_ALPHABET
    } else {
        alphabet
    };
    let chars: Vec<char> = alphabet.chars().collect();
    let mut rng = rand::rng();

    (0..length)
        .filter_map(|_| chars.choose(&mut rng).copied())
        .collect()
}

/// Generates `count` codes; asking for zero still yields one.
pub fn generate_codes(count: usize, length: usize, alphabet: &str) -> Vec<String> {
    (0..count.max(1))
        .map(|_| generate_code(length, alphabet))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_alphabet_is_base_plus_specials() {
        assert_eq!(DEFAULT_ALPHABET, format!("{}{}", BASE_ALPHABET, SPECIALS));
    }

    #[test]
    fn base_alphabet_has_no_ambiguous_chars() {
        for c in ['0', '1', 'I', 'O'] {
            assert!(!BASE_ALPHABET.contains(c));
        }
    }
}
