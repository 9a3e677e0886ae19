//! Secure-trie entry points: the same proof operations with keys keccak-hashed
//! before they are matched, as state and storage tries do.

use crate::errors::ProofResult;
use alloy_primitives::{keccak256, Bytes, B256};

/// Verifies an inclusion proof for the keccak image of `key`.
pub fn verify_inclusion_proof(
    key: &[u8],
    value: &[u8],
    proof: &[u8],
    root: B256,
) -> ProofResult<bool> {
    crate::proof::verify_inclusion_proof(keccak256(key).as_slice(), value, proof, root)
}

/// Verifies an exclusion proof for the keccak image of `key`.
pub fn verify_exclusion_proof(
    key: &[u8],
    value: &[u8],
    proof: &[u8],
    root: B256,
) -> ProofResult<bool> {
    crate::proof::verify_exclusion_proof(keccak256(key).as_slice(), value, proof, root)
}

/// Looks up the keccak image of `key`.
pub fn get(key: &[u8], proof: &[u8], root: B256) -> ProofResult<Option<Bytes>> {
    crate::proof::get(keccak256(key).as_slice(), proof, root)
}

/// Computes the root produced by writing `value` at the keccak image of `key`.
pub fn update(key: &[u8], value: &[u8], proof: &[u8], root: B256) -> ProofResult<B256> {
    crate::proof::update(keccak256(key).as_slice(), value, proof, root)
}

/// The root of the trie holding exactly one pair under the keccak image of `key`.
pub fn single_node_root(key: &[u8], value: &[u8]) -> ProofResult<B256> {
    crate::proof::single_node_root(keccak256(key).as_slice(), value)
}
