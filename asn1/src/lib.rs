//! Arena-based ASN.1 DER codec with a tree-structured type model and
//! schema templates (`SPEC_FULL.md` §4.2).
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![allow(clippy::module_inception)]

extern crate alloc;

#[macro_use]
mod fmt;

pub mod der;
pub mod error;
pub mod node;
pub mod path;
pub mod schema;
pub mod tag;

pub use error::{DecodeError, EncodeError, Error, Result, SchemaError};
pub use node::{Arena, Node, NodeId, NodeValue};
pub use schema::{array2tree, TemplateEntry};
pub use tag::{Class, NodeFlags, Tag};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::der::{decode, encode};

    fn int_node(arena: &mut Arena, parent: NodeId, name: &str, n: i128) -> NodeId {
        let mut node = Node::new(name.into(), Tag::Integer);
        node.value = NodeValue::Bytes(der::encode_integer_i128(n));
        let id = arena.push(node);
        arena.append_child(parent, id);
        id
    }

    /// S2: `SEQUENCE { INTEGER 1, INTEGER -1 }` -> `30 06 02 01 01 02 01 FF`.
    #[test]
    fn s2_sequence_of_two_integers() {
        let mut arena = Arena::new();
        let seq = arena.push(Node::new("seq".into(), Tag::Sequence));
        int_node(&mut arena, seq, "a", 1);
        int_node(&mut arena, seq, "b", -1);
        let der = encode(&arena, seq).unwrap();
        assert_eq!(der, [0x30, 0x06, 0x02, 0x01, 0x01, 0x02, 0x01, 0xFF]);
    }

    /// S5: SET OF with children `04 01 05`, `04 01 02`, `04 01 09` sorts to
    /// ascending bytewise order.
    #[test]
    fn s5_set_of_bytewise_order() {
        let mut arena = Arena::new();
        let set_of = arena.push(Node::new("set_of".into(), Tag::SetOf));
        for (name, byte) in [("a", 5u8), ("b", 2u8), ("c", 9u8)] {
            let mut node = Node::new(name.into(), Tag::OctetString);
            node.value = NodeValue::Bytes(alloc::vec![byte]);
            let id = arena.push(node);
            arena.append_child(set_of, id);
        }
        let der = encode(&arena, set_of).unwrap();
        // each child DER is `04 01 xx`; expect ascending order 02, 05, 09.
        let expected: alloc::vec::Vec<u8> =
            [0x04, 0x01, 0x02, 0x04, 0x01, 0x05, 0x04, 0x01, 0x09].to_vec();
        assert_eq!(der[2..], expected[..]);
    }

    #[test]
    fn integer_minimal_two_complement() {
        assert_eq!(der::encode_integer_i128(0), [0x00]);
        assert_eq!(der::encode_integer_i128(1), [0x01]);
        assert_eq!(der::encode_integer_i128(-1), [0xFF]);
        assert_eq!(der::encode_integer_i128(127), [0x7F]);
        assert_eq!(der::encode_integer_i128(128), [0x00, 0x80]);
        assert_eq!(der::encode_integer_i128(-128), [0x80]);
    }

    #[test]
    fn decode_then_encode_sequence_roundtrips() {
        let input = [0x30, 0x06, 0x02, 0x01, 0x01, 0x02, 0x01, 0xFF];
        let (arena, root) = decode(&input).unwrap();
        let der = encode(&arena, root).unwrap();
        assert_eq!(der, input);
    }

    #[test]
    fn decode_rejects_trailing_bytes() {
        let input = [0x02, 0x01, 0x01, 0x00];
        assert!(decode(&input).is_err());
    }

    #[test]
    fn decode_rejects_non_minimal_length() {
        // length 5 encoded as `81 05` instead of the minimal `05`.
        let input = [0x04, 0x81, 0x05, 1, 2, 3, 4, 5];
        assert!(matches!(
            decode(&input),
            Err(Error::Decode(DecodeError::NonMinimalLength))
        ));
    }
}
