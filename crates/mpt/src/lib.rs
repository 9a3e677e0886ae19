//! Stateless verification and application of Merkle-Patricia Trie proofs.
//!
//! Every operation in this crate is a pure function of its arguments: a key, a value,
//! an RLP-encoded proof (the ordered list of nodes from the root toward the key, as
//! produced by Ethereum-style proof servers), and a 32-byte keccak-256 root. The
//! engine verifies inclusion and exclusion proofs against the root, looks values up,
//! and computes the root that results from inserting or overwriting a single
//! key/value pair — without ever materializing or storing the trie.
//!
//! Node hashing is keccak-256 throughout, and child references follow the standard
//! size rule: nodes whose encoding is at least 32 bytes are referenced by digest,
//! shorter nodes are inlined into their parent.
//!
//! The [`secure`] module exposes the same operations over keccak-hashed keys.
#![cfg_attr(not(test), no_std)]

extern crate alloc;

mod errors;
pub use errors::{ProofError, ProofResult};

mod node;
pub use node::{NodeKind, ProofNode};

mod proof;
pub use proof::{get, single_node_root, update, verify_exclusion_proof, verify_inclusion_proof};

pub mod secure;

mod rlp;
mod util;

#[cfg(test)]
mod test_util;

pub use alloy_trie::EMPTY_ROOT_HASH;
