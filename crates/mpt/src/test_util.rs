//! Test-only helpers: a reference trie that produces real roots and RLP-encoded
//! proofs for the engine to consume.

use crate::rlp;
use alloc::{collections::BTreeMap, vec::Vec};
use alloy_primitives::{Bytes, B256};
use alloy_trie::{proof::ProofRetainer, HashBuilder, Nibbles};

/// A reference trie over sorted leaves, built with [HashBuilder]. It hands out the
/// canonical root and, for any target key, the ordered node list a proof server
/// would return — present keys get inclusion proofs, absent keys get the path down
/// to the point of divergence.
#[derive(Debug, Clone, Default)]
pub(crate) struct ReferenceTrie {
    entries: BTreeMap<Nibbles, Vec<u8>>,
}

impl ReferenceTrie {
    pub(crate) fn insert(&mut self, key: &[u8], value: &[u8]) {
        self.entries.insert(Nibbles::unpack(key), value.to_vec());
    }

    pub(crate) fn root(&self) -> B256 {
        let mut hb = HashBuilder::default();
        for (path, value) in &self.entries {
            hb.add_leaf(*path, value);
        }
        hb.root()
    }

    /// Builds the RLP-encoded proof for `key`: the retained nodes on the path toward
    /// it, ordered root-first and wrapped into the outer list.
    pub(crate) fn proof(&self, key: &[u8]) -> Bytes {
        let target = Nibbles::unpack(key);
        let retainer = ProofRetainer::new(vec![target]);
        let mut hb = HashBuilder::default().with_proof_retainer(retainer);
        for (path, value) in &self.entries {
            hb.add_leaf(*path, value);
        }
        hb.root();

        let mut nodes = hb
            .take_proof_nodes()
            .into_inner()
            .into_iter()
            .filter(|(path, _)| path.len() <= target.len() && target.slice(..path.len()) == *path)
            .collect::<Vec<_>>();
        nodes.sort_by_key(|(path, _)| path.len());
        encode_proof(nodes.into_iter().map(|(_, node)| node))
    }
}

/// Wraps node encodings into the outer proof shape: an RLP list of byte strings,
/// root node first.
pub(crate) fn encode_proof(nodes: impl IntoIterator<Item = Bytes>) -> Bytes {
    let elements = nodes.into_iter().map(|node| rlp::encode_bytes(&node)).collect::<Vec<_>>();
    rlp::encode_list(&elements)
}
