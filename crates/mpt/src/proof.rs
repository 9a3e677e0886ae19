//! Proof-driven trie operations: walking a proof toward a key, verifying inclusion
//! and exclusion, point lookups, and computing the root produced by writing a
//! key/value pair through a proof.

use crate::{
    errors::{ProofError, ProofResult},
    node::{reference_of, NodeKind, ProofNode},
    rlp,
    util::to_word,
};
use alloc::vec::Vec;
use alloy_primitives::{b256, keccak256, Bytes, B256};
use alloy_trie::{Nibbles, EMPTY_ROOT_HASH};

/// The walk sentinel for "no further reference": the RLP empty string widened to a
/// word. A nil branch slot resolves to exactly this reference, so following one reads
/// as a dead end.
const NULL_REFERENCE: B256 =
    b256!("8000000000000000000000000000000000000000000000000000000000000000");

/// The largest supported key, bounded by the fixed capacity of [Nibbles].
const MAX_KEY_BYTES: usize = 32;

/// The outcome of walking a proof toward a key.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Walk {
    /// The number of proof elements the walk consumed.
    path_length: usize,
    /// The key nibbles left unmatched when the walk stopped.
    remainder: Nibbles,
    /// Whether the walk stopped because the next reference is the empty string.
    dead_end: bool,
}

/// Verifies that `proof` proves `value` is stored at `key` in the trie committed to
/// by `root`.
///
/// ## Returns
/// - `Ok(bool)` - Whether the proof shows the key present with exactly this value
/// - `Err(_)` - The proof cannot be interpreted against this root
pub fn verify_inclusion_proof(
    key: &[u8],
    value: &[u8],
    proof: &[u8],
    root: B256,
) -> ProofResult<bool> {
    verify_proof(key, value, proof, root, true)
}

/// Verifies that `proof` proves `key` does not map to `value` in the trie committed
/// to by `root` — either the key is absent, or it holds a different value.
///
/// ## Returns
/// - `Ok(bool)` - Whether the proof shows the pair excluded
/// - `Err(_)` - The proof cannot be interpreted against this root
pub fn verify_exclusion_proof(
    key: &[u8],
    value: &[u8],
    proof: &[u8],
    root: B256,
) -> ProofResult<bool> {
    verify_proof(key, value, proof, root, false)
}

/// Looks `key` up in the trie committed to by `root`.
///
/// ## Returns
/// - `Ok(Some(_))` - The value stored at the key
/// - `Ok(None)` - The proof shows the key absent
/// - `Err(_)` - The proof proves neither presence nor absence
pub fn get(key: &[u8], proof: &[u8], root: B256) -> ProofResult<Option<Bytes>> {
    let nodes = parse_proof(proof)?;
    let walk = walk_path(&nodes, &key_nibbles(key)?, root)?;

    if walk.remainder.is_empty() {
        Ok(Some(Bytes::copy_from_slice(nodes[walk.path_length - 1].value()?)))
    } else if walk.dead_end {
        Ok(None)
    } else {
        Err(ProofError::InvalidProof)
    }
}

/// Computes the root produced by writing `value` at `key`, given a proof of the
/// key's current position against `root`.
///
/// The proof must reach either the key itself or a dead end; deletion (writing a
/// tombstone) is not expressible through this operation.
pub fn update(key: &[u8], value: &[u8], proof: &[u8], root: B256) -> ProofResult<B256> {
    let key = key_nibbles(key)?;

    // Writing into the empty trie needs no proof: the result is a single leaf.
    if root == EMPTY_ROOT_HASH {
        return Ok(keccak256(ProofNode::leaf(&key, value).encoded()));
    }

    let nodes = parse_proof(proof)?;
    let walk = walk_path(&nodes, &key, root)?;
    let tail = replacement_tail(&nodes[walk.path_length - 1], &walk.remainder, value)?;

    let mut path = Vec::with_capacity(walk.path_length - 1 + tail.len());
    path.extend_from_slice(&nodes[..walk.path_length - 1]);
    path.extend(tail);
    fold_root(&path, &key)
}

/// The root of the trie holding exactly one `key`/`value` pair.
pub fn single_node_root(key: &[u8], value: &[u8]) -> ProofResult<B256> {
    Ok(keccak256(ProofNode::leaf(&key_nibbles(key)?, value).encoded()))
}

/// Expands a key into nibbles, rejecting keys beyond the supported bound.
fn key_nibbles(key: &[u8]) -> ProofResult<Nibbles> {
    if key.len() > MAX_KEY_BYTES {
        return Err(ProofError::KeyTooLong);
    }
    Ok(Nibbles::unpack(key))
}

/// Parses the outer proof list into its nodes. The proof is an RLP list whose
/// elements are byte strings, each wrapping the encoding of one node along the path
/// from the root toward the key.
fn parse_proof(proof: &[u8]) -> ProofResult<Vec<ProofNode>> {
    let elements = rlp::split_list(proof)?;
    if elements.is_empty() {
        return Err(ProofError::MalformedProof);
    }
    elements.iter().map(|element| ProofNode::decode(rlp::payload(element)?)).collect()
}

/// Shared body of the two verification entry points.
fn verify_proof(
    key: &[u8],
    value: &[u8],
    proof: &[u8],
    root: B256,
    inclusion: bool,
) -> ProofResult<bool> {
    let nodes = parse_proof(proof)?;
    let walk = walk_path(&nodes, &key_nibbles(key)?, root)?;

    let exists = walk.remainder.is_empty();
    let matches = if exists { nodes[walk.path_length - 1].value()? == value } else { false };

    if inclusion {
        Ok(matches)
    } else {
        Ok((exists && !matches) || (!exists && walk.dead_end))
    }
}

/// Walks the proof toward `key`, checking every element against the reference held
/// by its parent.
///
/// Nibbles consumed by a branch or extension are charged when the *next* proof
/// element is consumed, so a walk whose proof ends at a branch or extension leaves
/// those nibbles in the remainder. A leaf's exact hit is charged immediately.
fn walk_path(nodes: &[ProofNode], key: &Nibbles, root: B256) -> ProofResult<Walk> {
    let mut current_ref = root;
    let mut cursor = 0usize;
    let mut pending = 0usize;
    let mut path_length = 0usize;

    for (i, node) in nodes.iter().enumerate() {
        cursor += pending;
        pending = 0;
        path_length = i + 1;

        if i == 0 {
            if keccak256(node.encoded()) != root {
                return Err(ProofError::InvalidRoot);
            }
        } else if node.encoded().len() >= 32 {
            if keccak256(node.encoded()) != current_ref {
                return Err(ProofError::InvalidProof);
            }
        } else if to_word(node.encoded()) != current_ref {
            return Err(ProofError::InvalidProof);
        }

        match node.kind()? {
            NodeKind::Branch => {
                if cursor == key.len() {
                    // The walk landed on the branch's value slot.
                    break;
                }
                let slot = key.get(cursor).ok_or(ProofError::InvalidProof)? as usize;
                current_ref = node.element_id(slot)?;
                pending = 1;
            }
            NodeKind::Leaf => {
                let node_key = node.key()?;
                let remainder = key.slice(cursor..);
                let shared = remainder.common_prefix_length(&node_key);
                if shared == node_key.len() && shared == remainder.len() {
                    // Exact hit: this leaf holds the key's value.
                    cursor += shared;
                }
                current_ref = NULL_REFERENCE;
                break;
            }
            NodeKind::Extension => {
                let node_key = node.key()?;
                let remainder = key.slice(cursor..);
                let shared = remainder.common_prefix_length(&node_key);
                if shared == 0 {
                    // The key diverges before this extension; nothing below can
                    // match it.
                    current_ref = NULL_REFERENCE;
                    break;
                }
                current_ref = node.element_id(1)?;
                pending = shared;
            }
        }
    }

    Ok(Walk {
        path_length,
        remainder: key.slice(cursor..),
        dead_end: current_ref == NULL_REFERENCE,
    })
}

/// Builds the nodes replacing the walked path's last element, at most three: an
/// extension over newly shared nibbles, a branch, and a leaf for the written pair.
fn replacement_tail(
    last: &ProofNode,
    remainder: &Nibbles,
    value: &[u8],
) -> ProofResult<Vec<ProofNode>> {
    let mut tail = Vec::with_capacity(3);
    let kind = last.kind()?;

    if remainder.is_empty() && kind == NodeKind::Leaf {
        // Exact hit on a leaf: overwrite its value.
        tail.push(ProofNode::leaf(&last.key()?, value));
    } else if kind == NodeKind::Branch {
        if remainder.is_empty() {
            // The walk landed on the branch itself: overwrite its value slot.
            tail.push(last.with_branch_value(value));
        } else {
            // The branch has a free slot for the key: hang a new leaf off it. The
            // slot index is the remainder's first nibble, wired in by the fold.
            tail.push(last.clone());
            tail.push(ProofNode::leaf(&remainder.slice(1..), value));
        }
    } else {
        // The last node is a leaf or extension whose key diverges from the
        // remainder: split it with a branch, behind an extension when nibbles are
        // shared.
        let mut node_key = last.key()?;
        let mut remainder = *remainder;
        let shared = node_key.common_prefix_length(&remainder);

        if shared != 0 {
            // The extension's reference is a placeholder; the fold rewrites it to
            // the branch built below.
            tail.push(ProofNode::extension(&node_key.slice(..shared), &reference_of(value)));
            node_key = node_key.slice(shared..);
            remainder = remainder.slice(shared..);
        }

        let mut branch = ProofNode::empty_branch();

        if node_key.is_empty() {
            // The old node's value moves into the branch's value slot.
            branch = branch.with_branch_value(last.value()?);
        } else {
            let slot = node_key.get(0).ok_or(ProofError::InvalidProof)? as usize;
            let node_key = node_key.slice(1..);
            if !node_key.is_empty() || kind == NodeKind::Leaf {
                let moved = ProofNode::leaf(&node_key, last.value()?);
                branch = branch.with_branch_child(slot, &moved.reference());
            } else {
                // A one-nibble extension dissolves: its reference drops straight
                // into the slot.
                branch = branch.with_branch_child(slot, last.value()?);
            }
        }

        if remainder.is_empty() {
            branch = branch.with_branch_value(value);
            tail.push(branch);
        } else {
            tail.push(branch);
            tail.push(ProofNode::leaf(&remainder.slice(1..), value));
        }
    }

    Ok(tail)
}

/// Folds a rebuilt path from the leaf back to the root, rewiring each parent to the
/// reference of the node rebuilt below it, and trimming the key by the nibbles each
/// node consumes.
fn fold_root(path: &[ProofNode], key: &Nibbles) -> ProofResult<B256> {
    let mut key = *key;
    let mut previous: Option<Bytes> = None;
    let mut root_node: Option<ProofNode> = None;

    for node in path.iter().rev() {
        let mut node = node.clone();
        match node.kind()? {
            NodeKind::Leaf => {
                key = trim_consumed(&key, node.key()?.len())?;
            }
            NodeKind::Extension => {
                let node_key = node.key()?;
                key = trim_consumed(&key, node_key.len())?;
                if let Some(reference) = &previous {
                    node = ProofNode::extension(&node_key, reference);
                }
            }
            NodeKind::Branch => {
                if let Some(reference) = &previous {
                    let index = key.len().checked_sub(1).ok_or(ProofError::InvalidProof)?;
                    let slot = key.get(index).ok_or(ProofError::InvalidProof)? as usize;
                    key = key.slice(..index);
                    node = node.with_branch_child(slot, reference);
                }
            }
        }
        previous = Some(node.reference());
        root_node = Some(node);
    }

    let root_node = root_node.ok_or(ProofError::MalformedProof)?;
    Ok(keccak256(root_node.encoded()))
}

/// Drops `count` nibbles from the tail of `key`, rejecting proofs whose rebuilt path
/// would consume more nibbles than the key holds.
fn trim_consumed(key: &Nibbles, count: usize) -> ProofResult<Nibbles> {
    let length = key.len().checked_sub(count).ok_or(ProofError::InvalidProof)?;
    Ok(key.slice(..length))
}
