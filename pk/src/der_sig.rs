//! DER `SEQUENCE { r INTEGER, s INTEGER }` signature framing (RFC 3279
//! §2.2.2 / RFC 5480), shared by DSA, ECDSA, and GOST-DSA (spec.md §4.4).
//! RSA and EdDSA signatures are fixed-width instead and never touch this
//! module.

use crate::error::{Error, Result};
use alloc::vec::Vec;
use gtls_asn1::der::{decode, encode, encode_unsigned_integer};
use gtls_asn1::{Arena, Node, NodeId, NodeValue, Tag};

/// Encode `r`/`s` (big-endian magnitude, arbitrary width, no sign byte
/// required from the caller) as a DER `SEQUENCE { r, s }`.
pub fn encode_signature(r: &[u8], s: &[u8]) -> Result<Vec<u8>> {
    let mut arena = Arena::new();
    let seq = arena.push(Node::new("sig".into(), Tag::Sequence));
    push_integer(&mut arena, seq, "r", r);
    push_integer(&mut arena, seq, "s", s);
    Ok(encode(&arena, seq)?)
}

fn push_integer(arena: &mut Arena, parent: NodeId, name: &str, magnitude_be: &[u8]) {
    let mut node = Node::new(name.into(), Tag::Integer);
    node.value = NodeValue::Bytes(encode_unsigned_integer(magnitude_be));
    let id = arena.push(node);
    arena.append_child(parent, id);
}

/// Decode a DER `SEQUENCE { r INTEGER, s INTEGER }`, returning each
/// component as minimal-length big-endian magnitude bytes (a leading
/// `0x00` sign-disambiguation byte, if present, is stripped).
pub fn decode_signature(der: &[u8]) -> Result<(Vec<u8>, Vec<u8>)> {
    let (arena, root) = decode(der)?;
    if arena.get(root).tag != Tag::Sequence {
        return Err(Error::MalformedSignature);
    }
    let mut children = arena.children(root);
    let r_id = children.next().ok_or(Error::MalformedSignature)?;
    let s_id = children.next().ok_or(Error::MalformedSignature)?;
    if children.next().is_some() {
        return Err(Error::MalformedSignature);
    }
    if arena.get(r_id).tag != Tag::Integer || arena.get(s_id).tag != Tag::Integer {
        return Err(Error::MalformedSignature);
    }
    let r = strip_sign_byte(arena.get(r_id).value.as_bytes().ok_or(Error::MalformedSignature)?);
    let s = strip_sign_byte(arena.get(s_id).value.as_bytes().ok_or(Error::MalformedSignature)?);
    Ok((r, s))
}

fn strip_sign_byte(bytes: &[u8]) -> Vec<u8> {
    if bytes.len() > 1 && bytes[0] == 0x00 && bytes[1] & 0x80 != 0 {
        bytes[1..].to_vec()
    } else {
        bytes.to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_der() {
        let r = [0x01, 0x02, 0x03];
        let s = [0xFF, 0x00, 0x10]; // high bit set, needs a sign byte on the wire
        let der = encode_signature(&r, &s).unwrap();
        let (r2, s2) = decode_signature(&der).unwrap();
        assert_eq!(r2, r);
        assert_eq!(s2, s);
    }

    #[test]
    fn rejects_trailing_component() {
        let mut arena = Arena::new();
        let seq = arena.push(Node::new("sig".into(), Tag::Sequence));
        push_integer(&mut arena, seq, "r", &[1]);
        push_integer(&mut arena, seq, "s", &[2]);
        push_integer(&mut arena, seq, "extra", &[3]);
        let der = encode(&arena, seq).unwrap();
        assert!(decode_signature(&der).is_err());
    }
}
