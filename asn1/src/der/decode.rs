//! DER decoding mirrors `encode`'s recursive tree walk, with strict bound
//! checking on every length (spec.md §4.2).
//!
//! Decoding does not require a pre-compiled schema tree: a caller hands a
//! byte slice and gets back a fresh `Arena` whose structure mirrors the
//! input (SEQUENCE/SET/SET OF nodes get the universal tag that was
//! actually on the wire; leaves get their raw content bytes). A schema-
//! guided decode (matching leaves against expected types) is layered on
//! top by `gtls-pk`, which already knows the expected shape of a
//! `SEQUENCE { r INTEGER, s INTEGER }` signature or an SPKI.

use crate::error::{DecodeError, Result};
use crate::fmt::trace;
use crate::node::{Arena, Node, NodeId, NodeValue};
use crate::tag::{Class, Tag};
use alloc::string::String;
use alloc::vec::Vec;

fn tag_from_universal(class: Class, number: u32, constructed: bool) -> core::result::Result<Tag, DecodeError> {
    if class != Class::Universal {
        // Context/application/private tags decode as opaque ANY; the
        // caller (schema-guided decode in `gtls-pk`/`gtls-helloext`)
        // re-interprets them against the expected EXPLICIT/IMPLICIT shape.
        return Ok(Tag::Any);
    }
    Ok(match number {
        1 => Tag::Boolean,
        2 => Tag::Integer,
        3 => Tag::BitString,
        4 => Tag::OctetString,
        5 => Tag::Null,
        6 => Tag::ObjectId,
        10 => Tag::Enumerated,
        12 => Tag::Utf8String,
        16 => {
            if constructed {
                Tag::Sequence
            } else {
                return Err(DecodeError::TagMismatch);
            }
        }
        17 => {
            if constructed {
                Tag::Set
            } else {
                return Err(DecodeError::TagMismatch);
            }
        }
        18 => Tag::NumericString,
        19 => Tag::PrintableString,
        20 => Tag::TeletexString,
        22 => Tag::Ia5String,
        23 => Tag::UtcTime,
        24 => Tag::GeneralizedTime,
        26 => Tag::VisibleString,
        27 => Tag::GeneralString,
        _ => Tag::Any,
    })
}

/// Decode one DER TLV at `input`'s start into a fresh node, recursing into
/// children for constructed types. Returns `(node_id, bytes_consumed)`.
fn decode_one(arena: &mut Arena, input: &[u8], name: &str) -> core::result::Result<(NodeId, usize), DecodeError> {
    let (class, constructed, tag_number, tag_len) = super::primitives::decode_tag(input)?;
    let rest = &input[tag_len..];
    let (len, len_len) = super::primitives::decode_length(rest)?;
    let header = tag_len + len_len;
    let content = rest.get(len_len..len_len + len).ok_or(DecodeError::LengthOverrun)?;

    let tag = tag_from_universal(class, tag_number, constructed)?;
    let mut node = Node::new(String::from(name), tag);

    if constructed && matches!(tag, Tag::Sequence | Tag::Set) {
        let id = arena.push(node);
        let mut offset = 0usize;
        let mut index = 0usize;
        while offset < content.len() {
            let (child, consumed) = decode_one(arena, &content[offset..], &alloc::format!("?{index}"))?;
            arena.append_child(id, child);
            offset += consumed;
            index += 1;
        }
        return Ok((id, header + len));
    }

    match tag {
        Tag::Boolean => {
            if content.len() != 1 {
                return Err(DecodeError::InvalidValue);
            }
            if content[0] != 0x00 && content[0] != 0xFF {
                return Err(DecodeError::InvalidValue);
            }
        }
        Tag::Null => {
            if !content.is_empty() {
                return Err(DecodeError::InvalidValue);
            }
        }
        Tag::Integer | Tag::Enumerated => {
            if content.is_empty() {
                return Err(DecodeError::InvalidValue);
            }
            if content.len() > 1 {
                let redundant_zero = content[0] == 0x00 && content[1] & 0x80 == 0;
                let redundant_ff = content[0] == 0xFF && content[1] & 0x80 != 0;
                if redundant_zero || redundant_ff {
                    return Err(DecodeError::NonMinimalLength);
                }
            }
        }
        Tag::BitString => {
            if content.is_empty() || content[0] > 7 {
                return Err(DecodeError::InvalidValue);
            }
        }
        _ => {}
    }

    node.value = NodeValue::Bytes(content.to_vec());
    let id = arena.push(node);
    trace!("decoded leaf node");
    Ok((id, header + len))
}

/// Decode a complete DER buffer with no trailing bytes permitted (spec.md
/// §4.2, §8 property 3: `decode(encode(T)) = T` up to SET canonicalisation).
pub fn decode(input: &[u8]) -> Result<(Arena, NodeId)> {
    let mut arena = Arena::new();
    let (root, consumed) = decode_one(&mut arena, input, "root")?;
    if consumed != input.len() {
        return Err(DecodeError::TrailingBytes.into());
    }
    Ok((arena, root))
}

/// Stateful wrapper mirroring `Encoder` (see `encode.rs`).
pub struct Decoder;

impl Decoder {
    pub fn decode(input: &[u8]) -> Result<(Arena, NodeId)> {
        decode(input)
    }
}
