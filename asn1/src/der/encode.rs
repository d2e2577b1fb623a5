//! DER encoding: a depth-first walk over the node tree (spec.md §9 Design
//! Note: "rewrite as mutually recursive functions over ASN.1 type" — the
//! alternative to the reference's explicit DOWN/RIGHT/UP goto cursor that
//! this crate takes, since Rust's call stack already gives us the
//! traversal state for free).

use crate::error::{EncodeError, Result};
use crate::fmt::trace;
use crate::node::{Arena, NodeId, NodeValue};
use crate::tag::{Class, NodeFlags, Tag};
use alloc::vec::Vec;

/// Two's complement, minimal length, leading `0x00` only to disambiguate
/// sign (spec.md §4.2's INTEGER/ENUMERATED rule). Used both for schema
/// INTEGER defaults (`schema.rs`) and for runtime `write_value` INTEGER
/// writes.
pub fn encode_integer_i128(n: i128) -> Vec<u8> {
    if n == 0 {
        return alloc::vec![0u8];
    }
    let be = n.to_be_bytes();
    let mut start = 0;
    while start < be.len() - 1 {
        let b = be[start];
        let next = be[start + 1];
        // Strip redundant sign-extension bytes: an all-0x00 byte followed
        // by a non-negative next byte, or an all-0xFF byte followed by a
        // negative next byte, is redundant.
        if (b == 0x00 && next & 0x80 == 0) || (b == 0xFF && next & 0x80 != 0) {
            start += 1;
        } else {
            break;
        }
    }
    be[start..].to_vec()
}

/// Minimal unsigned two's-complement encoding for raw (already-unsigned)
/// integer bytes, used when a node's value was written as raw magnitude
/// rather than an `i128` (RSA moduli, EC coordinates serialized via
/// `write_value`'s "raw two's complement" path, spec.md §4.2).
pub fn encode_unsigned_integer(magnitude_be: &[u8]) -> Vec<u8> {
    if magnitude_be.is_empty() {
        return alloc::vec![0u8];
    }
    let start = magnitude_be.iter().position(|&b| b != 0).unwrap_or(magnitude_be.len() - 1);
    if magnitude_be[start] & 0x80 != 0 {
        let mut out = alloc::vec![0u8];
        out.extend_from_slice(&magnitude_be[start..]);
        return out;
    }
    magnitude_be[start..].to_vec()
}

/// Encode the subtree rooted at `id` as DER, returning the full byte
/// sequence (tag + length + content). Two-pass sizing (spec.md §4.2) is
/// implemented by `encode_into`: this function always computes the whole
/// buffer, and `encode_into` reports `BufferTooSmall { required }` rather
/// than writing a truncated prefix when the caller's buffer is too small.
pub fn encode(arena: &Arena, id: NodeId) -> Result<Vec<u8>> {
    let node = arena.get(id);
    trace!("encoding node");

    let content = match node.tag {
        Tag::Sequence => encode_sequence_children(arena, id)?,
        Tag::Set => encode_set(arena, id)?,
        Tag::SequenceOf => encode_sequence_children(arena, id)?,
        Tag::SetOf => encode_set_of(arena, id)?,
        Tag::Choice => return encode_choice(arena, id),
        _ => encode_leaf(node)?,
    };

    let universal_tag = node
        .tag
        .universal_number()
        .ok_or(EncodeError::MissingValue)?;
    let mut der = wrap_tag_length(Class::Universal, universal_tag, node.tag.is_constructed(), &content)?;

    // EXPLICIT tagging: re-wrap the already-complete universal encoding in
    // a constructed context-specific (or APPLICATION/PRIVATE) tag (spec.md
    // §4.2: "a placeholder is consumed at entry; on leaving the node, the
    // encoded length of the child content is spliced in"). IMPLICIT
    // tagging instead *replaces* the universal tag outright.
    if node.flags.contains(NodeFlags::CONST_TAG) {
        let tag_number = node.tag_number.unwrap_or(0);
        let class = if node.flags.contains(NodeFlags::CONST_APPLICATION) {
            Class::Application
        } else if node.flags.contains(NodeFlags::CONST_PRIVATE) {
            Class::Private
        } else {
            Class::ContextSpecific
        };
        if node.flags.contains(NodeFlags::CONST_IMPLICIT) {
            der = wrap_tag_length(class, tag_number, node.tag.is_constructed(), &content)?;
        } else {
            der = wrap_tag_length(class, tag_number, true, &der)?;
        }
    }

    Ok(der)
}

fn wrap_tag_length(class: Class, tag: u32, constructed: bool, content: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(content.len() + 8);
    super::primitives::encode_tag(class, tag, constructed, &mut out)?;
    super::primitives::encode_length(content.len(), &mut out)?;
    out.extend_from_slice(content);
    Ok(out)
}

fn encode_sequence_children(arena: &Arena, id: NodeId) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    for child in arena.children(id) {
        if is_absent_default(arena, child) || is_absent_optional(arena, child) {
            continue;
        }
        out.extend(encode(arena, child)?);
    }
    Ok(out)
}

/// `SEQUENCE`'s DEFAULT omission rule (`SPEC_FULL.md` §4.2's supplement
/// from `element.c`'s `_asn1_delete_not_used`): a DEFAULT-valued OPTIONAL
/// field absent at encode time, whose (absent) value equals the
/// schema-declared default, is simply never emitted — true canonical DER.
fn is_absent_default(arena: &Arena, id: NodeId) -> bool {
    let node = arena.get(id);
    node.flags.contains(NodeFlags::CONST_DEFAULT) && matches!(node.value, NodeValue::Empty)
}

fn is_absent_optional(arena: &Arena, id: NodeId) -> bool {
    let node = arena.get(id);
    node.flags.contains(NodeFlags::CONST_OPTION) && matches!(node.value, NodeValue::Empty) && node.down.is_none()
}

/// SET: reorder the encoded children by ascending `(class << 6 | tag)` key
/// (spec.md §4.2, §6: canonical SET child ordering by class-shifted-tag).
fn encode_set(arena: &Arena, id: NodeId) -> Result<Vec<u8>> {
    let mut entries: Vec<(u8, Vec<u8>)> = Vec::new();
    for child in arena.children(id) {
        if is_absent_default(arena, child) || is_absent_optional(arena, child) {
            continue;
        }
        let der = encode(arena, child)?;
        let key = *der.first().ok_or(EncodeError::MissingValue)?;
        entries.push((key, der));
    }
    entries.sort_by_key(|(key, _)| *key);
    Ok(entries.into_iter().flat_map(|(_, der)| der).collect())
}

/// SET OF: reorder by bytewise ascending comparison of each child's full
/// DER encoding; a shorter run that is a strict prefix of a longer one
/// sorts first (spec.md §4.2, §6).
fn encode_set_of(arena: &Arena, id: NodeId) -> Result<Vec<u8>> {
    let mut entries: Vec<Vec<u8>> = arena
        .children(id)
        .map(|child| encode(arena, child))
        .collect::<Result<_>>()?;
    entries.sort();
    Ok(entries.into_iter().flatten().collect())
}

/// CHOICE: encode the single selected alternative with no additional
/// framing (spec.md §4.2) — there can be only one remaining child after
/// `write_value`'s CHOICE-selection deletes the unselected siblings.
fn encode_choice(arena: &Arena, id: NodeId) -> Result<Vec<u8>> {
    let selected = arena.get(id).down.ok_or(EncodeError::MissingValue)?;
    encode(arena, selected)
}

fn encode_leaf(node: &crate::node::Node) -> Result<Vec<u8>> {
    let bytes = node.value.as_bytes().ok_or(EncodeError::MissingValue)?;
    match node.tag {
        Tag::Boolean => Ok(alloc::vec![if bytes.first() == Some(&0) { 0x00 } else { 0xFF }]),
        Tag::Null => Ok(Vec::new()),
        Tag::ObjectId | Tag::Integer | Tag::Enumerated | Tag::OctetString => Ok(bytes.to_vec()),
        Tag::BitString => Ok(bytes.to_vec()), // already `unused_bits || octets` per write_value
        _ => Ok(bytes.to_vec()),
    }
}

/// Two-pass sizing mode (spec.md §4.2): if `buf` is too small, nothing is
/// written and the required size is reported via `EncodeError::BufferTooSmall`.
pub fn encode_into(arena: &Arena, id: NodeId, buf: &mut [u8]) -> Result<usize> {
    let der = encode(arena, id)?;
    if der.len() > buf.len() {
        return Err(EncodeError::BufferTooSmall { required: der.len() }.into());
    }
    buf[..der.len()].copy_from_slice(&der);
    Ok(der.len())
}

/// Thin stateful wrapper some callers (e.g. `gtls-helloext`'s SPKI
/// serialization) prefer over the free functions, mirroring this
/// workspace's small-struct-over-bare-function style elsewhere (e.g.
/// `gtls-ecmath`'s `Modulus`).
pub struct Encoder<'a> {
    arena: &'a Arena,
}

impl<'a> Encoder<'a> {
    pub fn new(arena: &'a Arena) -> Self {
        Encoder { arena }
    }

    pub fn encode(&self, id: NodeId) -> Result<Vec<u8>> {
        encode(self.arena, id)
    }
}
