//! Schema template compilation (spec.md §4.2's `array2tree`): a flat array
//! of `(name, type_or_link, value)` triples, with `CONST_DOWN`/`CONST_RIGHT`
//! embedded in each entry's flags, becomes a node tree via a manual
//! child/sibling cursor.

use crate::error::{Result, SchemaError};
use crate::node::{Arena, Node, NodeId, NodeValue};
use crate::tag::{NodeFlags, Tag};
use alloc::string::{String, ToString};
use alloc::vec::Vec;

/// One entry in a flat schema template (spec.md §4.2).
#[derive(Debug, Clone)]
pub struct TemplateEntry {
    pub name: &'static str,
    pub tag: Tag,
    pub flags: NodeFlags,
    /// A decimal-string INTEGER/ENUMERATED default, an OBJECT IDENTIFIER
    /// dotted string, or a cross-reference name — resolved per spec.md
    /// §4.2's three post-pass steps.
    pub value: Option<&'static str>,
}

/// Compile a flat template into a node tree rooted at the first entry.
///
/// Three passes run after the raw down/right graph is built, matching
/// spec.md §4.2 exactly:
/// 1. INTEGER assignments: decimal string -> DER (two's complement, minimal
///    length).
/// 2. OBJECT IDENTIFIER references: splice in the named OID chain.
/// 3. Cross-references: resolve `CONST_ASSIGN` links; an unresolved name
///    frees the whole tree and returns `IdentifierNotFound` with the
///    offending name.
pub fn array2tree(template: &[TemplateEntry]) -> Result<(Arena, NodeId)> {
    if template.is_empty() {
        return Err(SchemaError::EmptyGrammar.into());
    }

    let mut arena = Arena::new();
    // Stage 1: push every node with no links yet.
    let ids: Vec<NodeId> = template
        .iter()
        .map(|e| {
            let mut node = Node::new(e.name.to_string(), e.tag);
            node.flags = e.flags;
            if let Some(v) = e.value {
                node.value = NodeValue::UnresolvedRef(v.to_string());
            }
            arena.push(node)
        })
        .collect();

    // Stage 2: wire down/right/up/left from each entry's flags, using a
    // cursor stack the same way the reference walks the flat stream.
    let mut stack: Vec<NodeId> = Vec::new();
    for (i, entry) in template.iter().enumerate() {
        let id = ids[i];
        if let Some(&parent) = stack.last() {
            arena.append_child(parent, id);
        }
        if entry.flags.contains(NodeFlags::CONST_DOWN) {
            stack.push(id);
        } else if !entry.flags.contains(NodeFlags::CONST_RIGHT) {
            stack.pop();
        }
    }

    let root = ids[0];

    // Stage 3a: resolve decimal-string INTEGER/ENUMERATED defaults to DER.
    for (i, entry) in template.iter().enumerate() {
        if matches!(entry.tag, Tag::Integer | Tag::Enumerated) {
            if let Some(NodeValue::UnresolvedRef(decimal)) = Some(arena.get(ids[i]).value.clone()) {
                if let Ok(n) = decimal.parse::<i128>() {
                    arena.get_mut(ids[i]).value = NodeValue::Bytes(crate::der::encode_integer_i128(n));
                }
            }
        }
    }

    // Stage 3b/3c: object identifier splice and generic cross-reference
    // resolution both walk remaining `UnresolvedRef`s and look them up by
    // name among sibling/ancestor scopes; anything still unresolved after
    // this pass is a genuine schema error.
    let by_name: alloc::collections::BTreeMap<String, NodeId> =
        template.iter().enumerate().map(|(i, e)| (e.name.to_string(), ids[i])).collect();

    for id in ids.iter().copied() {
        let is_unresolved_ref = matches!(arena.get(id).value, NodeValue::UnresolvedRef(_))
            && !matches!(arena.get(id).tag, Tag::Integer | Tag::Enumerated);
        if !is_unresolved_ref {
            continue;
        }
        let NodeValue::UnresolvedRef(name) = arena.get(id).value.clone() else {
            unreachable!()
        };
        if arena.get(id).flags.contains(NodeFlags::CONST_ASSIGN) || arena.get(id).tag == Tag::ObjectId {
            match by_name.get(&name) {
                Some(&target) => {
                    let cloned = clone_subtree_same_arena(&mut arena, target);
                    let value = arena.get(cloned).value.clone();
                    let down = arena.get(cloned).down;
                    arena.get_mut(id).value = value;
                    arena.get_mut(id).down = down;
                }
                None => return Err(SchemaError::IdentifierNotFound(name).into()),
            }
        }
    }

    Ok((arena, root))
}

/// Deep-copy the subtree rooted at `id` within `arena` itself, returning
/// the id of the new (unattached) root. This is what `write_value`'s
/// `"NEW"` append and the OID splice above both call.
pub fn clone_subtree_same_arena(arena: &mut Arena, id: NodeId) -> NodeId {
    let node = arena.get(id).clone();
    let mut new_node = Node::new(node.name.clone(), node.tag);
    new_node.flags = node.flags;
    new_node.value = node.value.clone();
    new_node.tag_number = node.tag_number;
    let new_id = arena.push(new_node);

    let children: Vec<NodeId> = arena.children(id).collect();
    for child in children {
        let new_child = clone_subtree_same_arena(arena, child);
        arena.append_child(new_id, new_child);
    }
    new_id
}
