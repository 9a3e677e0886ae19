//! Helpers for viewing and producing the RLP shapes used by trie nodes.
//!
//! The grammar itself belongs to `alloy-rlp`; this module adds the raw item views a
//! proof walk needs. Proof nodes are RLP lists whose elements may hold either a child
//! digest (a byte string) or an inlined child (a nested list), so elements are kept as
//! their full on-the-wire encodings and payloads are stripped on demand.

use crate::errors::ProofResult;
use alloc::vec::Vec;
use alloy_primitives::Bytes;
use alloy_rlp::{Buf, Encodable, Header};

/// Splits an RLP list into the full encodings (header + payload) of its elements.
///
/// ## Takes
/// - `buf` - The RLP stream holding the list
///
/// ## Returns
/// - `Ok(Vec<Bytes>)` - The raw encoding of each element, in order
/// - `Err(_)` - The stream is not exactly one well-formed list
pub(crate) fn split_list(buf: &[u8]) -> ProofResult<Vec<Bytes>> {
    let mut stream = buf;
    let header = Header::decode(&mut stream)?;
    if !header.list {
        return Err(alloy_rlp::Error::UnexpectedString.into());
    }
    if stream.len() != header.payload_length {
        return Err(alloy_rlp::Error::UnexpectedLength.into());
    }

    let mut elements = Vec::new();
    while !stream.is_empty() {
        let element_length = {
            let mut peek = stream;
            let element = Header::decode(&mut peek)?;
            element.length() + element.payload_length
        };
        if element_length > stream.len() {
            return Err(alloy_rlp::Error::InputTooShort.into());
        }
        elements.push(Bytes::copy_from_slice(&stream[..element_length]));
        stream.advance(element_length);
    }
    Ok(elements)
}

/// Returns the payload of a string item, stripping its header.
///
/// ## Takes
/// - `item` - The full encoding of a single item
///
/// ## Returns
/// - `Ok(&[u8])` - The payload bytes
/// - `Err(_)` - The item is a list
pub(crate) fn payload(item: &[u8]) -> ProofResult<&[u8]> {
    let mut stream = item;
    let header = Header::decode(&mut stream)?;
    if header.list {
        return Err(alloy_rlp::Error::UnexpectedList.into());
    }
    Ok(&stream[..header.payload_length])
}

/// Canonically encodes a byte string.
pub(crate) fn encode_bytes(data: &[u8]) -> Bytes {
    let mut out = Vec::with_capacity(data.len() + 4);
    data.encode(&mut out);
    out.into()
}

/// Concatenates already-encoded elements and prepends the list header.
pub(crate) fn encode_list(elements: &[Bytes]) -> Bytes {
    let payload_length = elements.iter().map(|element| element.len()).sum();
    let mut out = Vec::with_capacity(payload_length + 4);
    Header { list: true, payload_length }.encode(&mut out);
    for element in elements {
        out.extend_from_slice(element);
    }
    out.into()
}
