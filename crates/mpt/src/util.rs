//! Utilities for `lode-mpt`

use alloy_primitives::B256;
use alloy_trie::Nibbles;

/// Unpack node path to nibbles.
///
/// ## Takes
/// - `first` - first nibble of the path if it is odd. Must be <= 0x0F, or will create invalid
///   nibbles.
/// - `rest` - rest of the nibbles packed
///
/// ## Returns
/// - `Nibbles` - unpacked nibbles
pub(crate) fn unpack_path_to_nibbles(first: Option<u8>, rest: &[u8]) -> Nibbles {
    let rest = Nibbles::unpack(rest);
    Nibbles::from_iter_unchecked(first.into_iter().chain(rest.to_vec()))
}

/// Widens a reference into a 32-byte word: short references are right-padded with
/// zeros, longer ones are cut to their first 32 bytes.
///
/// Inlined nodes are compared against parent references in this widened form, so the
/// padding convention has to match on both the producing and the checking side.
pub(crate) fn to_word(reference: &[u8]) -> B256 {
    let mut word = B256::ZERO;
    if reference.len() >= 32 {
        word.copy_from_slice(&reference[..32]);
    } else {
        word[..reference.len()].copy_from_slice(reference);
    }
    word
}
