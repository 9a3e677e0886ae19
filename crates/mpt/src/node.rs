//! This module contains the [ProofNode] type, which represents a node carried by a
//! Merkle-Patricia Trie proof.

use crate::{
    errors::{ProofError, ProofResult},
    rlp,
    util::{to_word, unpack_path_to_nibbles},
};
use alloc::{vec, vec::Vec};
use alloy_primitives::{keccak256, Bytes, B256};
use alloy_rlp::EMPTY_STRING_CODE;
use alloy_trie::Nibbles;

/// The number of elements in an RLP encoded branch node.
const BRANCH_LIST_LENGTH: usize = 17;

/// The number of elements in an RLP encoded leaf or extension node.
const LEAF_OR_EXTENSION_LIST_LENGTH: usize = 2;

/// The index of a branch node's value slot.
const BRANCH_VALUE_INDEX: usize = 16;

/// Prefix for even-nibbled extension node paths.
const PREFIX_EXTENSION_EVEN: u8 = 0;

/// Prefix for odd-nibbled extension node paths.
const PREFIX_EXTENSION_ODD: u8 = 1;

/// Prefix for even-nibbled leaf node paths.
const PREFIX_LEAF_EVEN: u8 = 2;

/// Prefix for odd-nibbled leaf node paths.
const PREFIX_LEAF_ODD: u8 = 3;

/// Nibble bit width.
const NIBBLE_WIDTH: usize = 4;

/// The shape of a [ProofNode], derived from its element count and, for 2-item nodes,
/// the high nibble of its hex-prefixed path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// A 17-item node: 16 child slots indexed by nibble plus a trailing value slot.
    Branch,
    /// A 2-item pointer node whose path is shared by every descendant.
    Extension,
    /// A 2-item node holding the value stored at the remaining path.
    Leaf,
}

/// A [ProofNode] is a single node carried by a Merkle-Patricia Trie proof. It pairs
/// the node's canonical RLP encoding with the raw encodings of its list elements, so
/// a walk can follow child references and an update can splice elements without
/// re-interpreting the rest of the node.
///
/// Child references obey the trie's size rule: an element shorter than 32 bytes on
/// the wire holds an inlined child encoding, a longer one holds the 32-byte keccak
/// digest of the child wrapped in a byte string. [ProofNode::element_id] and
/// [ProofNode::reference] apply this rule from the two sides of the parent/child
/// boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProofNode {
    /// The canonical RLP encoding of the node.
    encoded: Bytes,
    /// The raw encoding (header + payload) of each list element.
    elements: Vec<Bytes>,
}

impl ProofNode {
    /// Decodes a node from its RLP encoding.
    ///
    /// ## Takes
    /// - `encoded` - The node's RLP encoding
    ///
    /// ## Returns
    /// - `Ok(Self)` - The decoded node
    /// - `Err(_)` - The encoding is not a 2-item or 17-item list
    pub fn decode(encoded: &[u8]) -> ProofResult<Self> {
        let elements = rlp::split_list(encoded)?;
        if elements.len() != BRANCH_LIST_LENGTH && elements.len() != LEAF_OR_EXTENSION_LIST_LENGTH
        {
            return Err(ProofError::MalformedProof);
        }
        Ok(Self { encoded: Bytes::copy_from_slice(encoded), elements })
    }

    /// Assembles a node from already-encoded elements.
    pub(crate) fn from_elements(elements: Vec<Bytes>) -> Self {
        let encoded = rlp::encode_list(&elements);
        Self { encoded, elements }
    }

    /// The node's canonical RLP encoding.
    pub fn encoded(&self) -> &Bytes {
        &self.encoded
    }

    /// Classifies the node: 17 elements make a branch, 2 elements make a leaf or
    /// extension depending on the high nibble of the path.
    ///
    /// ## Returns
    /// - `Ok(NodeKind)` - The node's shape
    /// - `Err(_)` - The path is empty or its prefix nibble is unknown
    pub fn kind(&self) -> ProofResult<NodeKind> {
        if self.elements.len() == BRANCH_LIST_LENGTH {
            return Ok(NodeKind::Branch);
        }

        let path = rlp::payload(&self.elements[0])?;
        let first_nibble = *path.first().ok_or(ProofError::InvalidNodePrefix)? >> NIBBLE_WIDTH;
        match first_nibble {
            PREFIX_EXTENSION_EVEN | PREFIX_EXTENSION_ODD => Ok(NodeKind::Extension),
            PREFIX_LEAF_EVEN | PREFIX_LEAF_ODD => Ok(NodeKind::Leaf),
            _ => Err(ProofError::InvalidNodePrefix),
        }
    }

    /// The full nibble-expanded path of a 2-item node, hex prefix included.
    pub fn path(&self) -> ProofResult<Nibbles> {
        Ok(Nibbles::unpack(rlp::payload(&self.elements[0])?))
    }

    /// The key of a 2-item node: its path with the hex prefix (and the pad nibble of
    /// even paths) removed.
    pub fn key(&self) -> ProofResult<Nibbles> {
        let path = rlp::payload(&self.elements[0])?;
        let first_byte = *path.first().ok_or(ProofError::InvalidNodePrefix)?;
        let first = match first_byte >> NIBBLE_WIDTH {
            PREFIX_EXTENSION_ODD | PREFIX_LEAF_ODD => Some(first_byte & 0x0F),
            PREFIX_EXTENSION_EVEN | PREFIX_LEAF_EVEN => None,
            _ => return Err(ProofError::InvalidNodePrefix),
        };
        Ok(unpack_path_to_nibbles(first, &path[1..]))
    }

    /// The node's value: the payload of its final element. For a branch this is the
    /// value slot, for a 2-item node the second element.
    ///
    /// Fails when the final element is an inlined child list rather than a string.
    pub fn value(&self) -> ProofResult<&[u8]> {
        rlp::payload(&self.elements[self.elements.len() - 1])
    }

    /// The reference a parent holds for the element at `index`, widened to a word:
    /// the element's own encoding when it is shorter than 32 bytes on the wire,
    /// otherwise its payload (the embedded digest).
    pub fn element_id(&self, index: usize) -> ProofResult<B256> {
        let element = &self.elements[index];
        if element.len() < 32 {
            Ok(to_word(element))
        } else {
            Ok(to_word(rlp::payload(element)?))
        }
    }

    /// The reference a parent would hold for this node: its encoding verbatim when
    /// shorter than 32 bytes, otherwise its keccak digest.
    pub fn reference(&self) -> Bytes {
        reference_of(&self.encoded)
    }

    /// Creates a leaf node storing `value` at the path `key`.
    pub fn leaf(key: &Nibbles, value: &[u8]) -> Self {
        let path = alloy_trie::nodes::encode_path_leaf(key, true);
        Self::from_elements(vec![rlp::encode_bytes(path.as_slice()), rlp::encode_bytes(value)])
    }

    /// Creates an extension node covering `key` and pointing at `reference` — a
    /// 32-byte digest or a short raw child encoding, written as a byte string either
    /// way.
    pub fn extension(key: &Nibbles, reference: &[u8]) -> Self {
        let path = alloy_trie::nodes::encode_path_leaf(key, false);
        Self::from_elements(vec![rlp::encode_bytes(path.as_slice()), rlp::encode_bytes(reference)])
    }

    /// Creates a branch node with all 16 child slots and the value slot empty.
    pub fn empty_branch() -> Self {
        Self::from_elements(vec![
            Bytes::from_static(&[EMPTY_STRING_CODE]);
            BRANCH_LIST_LENGTH
        ])
    }

    /// Returns a copy of this branch node with its value slot replaced.
    pub fn with_branch_value(&self, value: &[u8]) -> Self {
        let mut elements = self.elements.clone();
        elements[BRANCH_VALUE_INDEX] = rlp::encode_bytes(value);
        Self::from_elements(elements)
    }

    /// Returns a copy of this branch node with the child slot at `index` replaced.
    ///
    /// A reference shorter than 32 bytes is a raw child encoding and is embedded
    /// verbatim; a 32-byte digest is written as a byte string.
    pub fn with_branch_child(&self, index: usize, reference: &[u8]) -> Self {
        let mut elements = self.elements.clone();
        elements[index] = if reference.len() < 32 {
            Bytes::copy_from_slice(reference)
        } else {
            rlp::encode_bytes(reference)
        };
        Self::from_elements(elements)
    }
}

/// The parent-side reference for an encoded node or value: the bytes themselves when
/// shorter than 32, otherwise their keccak digest.
pub(crate) fn reference_of(encoded: &[u8]) -> Bytes {
    if encoded.len() < 32 {
        Bytes::copy_from_slice(encoded)
    } else {
        Bytes::copy_from_slice(keccak256(encoded).as_slice())
    }
}
