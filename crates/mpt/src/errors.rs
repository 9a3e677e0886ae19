//! Error types for proof verification and application.

/// An error produced while interpreting or applying a trie proof.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProofError {
    /// The first proof element does not hash to the expected root.
    #[error("first proof element does not hash to the trie root")]
    InvalidRoot,
    /// A proof element does not match the reference held by its parent, or the proof
    /// stops short of the position it claims to prove.
    #[error("proof element does not match its parent reference")]
    InvalidProof,
    /// The proof or one of its nodes is not well-formed RLP.
    #[error("rlp error: {0}")]
    Rlp(#[from] alloy_rlp::Error),
    /// A proof element is not a 2-item or 17-item list, or the proof is empty.
    #[error("proof element is not a 2 or 17 item list")]
    MalformedProof,
    /// A 2-item node's path does not start with a known hex-prefix nibble.
    #[error("unknown hex-prefix nibble in node path")]
    InvalidNodePrefix,
    /// The key exceeds the 32 byte bound of fixed-capacity nibble paths.
    #[error("key exceeds 32 bytes")]
    KeyTooLong,
}

/// A `Result` type alias over [ProofError].
pub type ProofResult<T> = Result<T, ProofError>;
