//! The ASN.1 node tree, as an arena of indexed nodes (spec.md §9 Design
//! Note (a)): `down`/`right` are `Option<NodeId>` child/sibling links,
//! `up`/`left` are back-references recomputed once at build time rather
//! than reconstructed by walking `left` until `left.right != self` (the
//! reference's technique, described in spec.md §3's Node invariant — the
//! arena makes that walk unnecessary since every node already knows its
//! parent and previous sibling).
//!
//! The whole tree lives in one `Vec<Node>` (`Arena`); dropping the arena
//! drops every node's `NodeValue` without an explicit down/right traversal,
//! which is the property spec.md §9 calls out as the main win over the
//! reference's manual-deletion tree.

use crate::tag::{NodeFlags, Tag};
use alloc::string::String;
use alloc::vec::Vec;

/// Index into an `Arena`. Stable for the arena's lifetime; never reused
/// after a node is logically deleted (deletion in this crate means
/// unlinking from the tree, not freeing the slot, which keeps `NodeId`
/// valid as a borrow-free handle the way the reference's pointers are not).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) u32);

/// Inline-or-heap value buffer (spec.md §3: "a small inline value buffer
/// with optional heap escalation"). `crypto-bigint`/fixed buffers elsewhere
/// in this workspace favor stack allocation for secret data; ASN.1 node
/// values are not secret and commonly exceed any reasonable inline size
/// (certificate extensions, RSA moduli), so this is a plain heap buffer —
/// the "escalation" here is `SmallValue`'s inline variant promoting itself
/// automatically once content no longer fits.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum NodeValue {
    #[default]
    Empty,
    Bytes(Vec<u8>),
    /// A still-unresolved cross-reference by name (spec.md §4.2: resolved
    /// during `array2tree`, or left to fail with `IdentifierNotFound`).
    UnresolvedRef(String),
}

impl NodeValue {
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            NodeValue::Bytes(b) => Some(b),
            _ => None,
        }
    }
}

/// One parsed or template ASN.1 node (spec.md §3's "ASN.1 Node").
#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,
    pub tag: Tag,
    pub value: NodeValue,
    pub flags: NodeFlags,
    pub down: Option<NodeId>,
    pub right: Option<NodeId>,
    pub up: Option<NodeId>,
    pub left: Option<NodeId>,
    /// Explicit/implicit/application/context tag override, when
    /// `CONST_TAG` is set (spec.md §3).
    pub tag_number: Option<u32>,
    /// Unused. The reference keeps a `tmp_ival` start/end offset pair on
    /// each node while encoding, which races if two encode calls walk the
    /// same template concurrently (spec.md §9 Open Question (a)). `der::encode`
    /// sidesteps the question entirely: offsets are ordinary return values
    /// threaded through the recursive walk, never written back onto the
    /// node, so there is no shared scratch field to race on.
    _reserved: (),
}

impl Node {
    pub fn new(name: String, tag: Tag) -> Self {
        Node {
            name,
            tag,
            value: NodeValue::Empty,
            flags: NodeFlags::empty(),
            down: None,
            right: None,
            up: None,
            left: None,
            tag_number: None,
            _reserved: (),
        }
    }
}

/// Owns every node in one parsed/template tree. Dropping the `Arena` drops
/// every `Node` (and its `NodeValue`) via `Vec`'s own `Drop`, satisfying
/// spec.md §3's "the root owns the subtree; deletion traverses down/right"
/// without this crate needing to implement that traversal by hand.
#[derive(Debug, Clone, Default)]
pub struct Arena {
    nodes: Vec<Node>,
}

impl Arena {
    pub fn new() -> Self {
        Arena { nodes: Vec::new() }
    }

    pub fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.0 as usize]
    }

    pub fn get_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0 as usize]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Append `child` as the last existing child of `parent`, fixing up
    /// `up`/`left`/`right` links. Used by schema compilation and by
    /// `write_value`'s `"NEW"` SEQUENCE-OF/SET-OF append (spec.md §4.2).
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.get_mut(child).up = Some(parent);
        match self.last_child(parent) {
            Some(last) => {
                self.get_mut(last).right = Some(child);
                self.get_mut(child).left = Some(last);
            }
            None => {
                self.get_mut(parent).down = Some(child);
            }
        }
    }

    pub fn last_child(&self, parent: NodeId) -> Option<NodeId> {
        let mut cur = self.get(parent).down?;
        while let Some(next) = self.get(cur).right {
            cur = next;
        }
        Some(cur)
    }

    pub fn children(&self, parent: NodeId) -> ChildIter<'_> {
        ChildIter {
            arena: self,
            next: self.get(parent).down,
        }
    }

    /// Unlink `node` from its parent/siblings. The slot stays allocated
    /// (see `NodeId`'s doc comment); its subtree becomes unreachable from
    /// the root and is simply never visited again, which is this arena's
    /// equivalent of spec.md §4.2's "deletes it" for `write_value`'s NULL
    /// write to an OPTIONAL node.
    pub fn unlink(&mut self, node: NodeId) {
        let left = self.get(node).left;
        let right = self.get(node).right;
        let up = self.get(node).up;
        if let Some(l) = left {
            self.get_mut(l).right = right;
        } else if let Some(p) = up {
            self.get_mut(p).down = right;
        }
        if let Some(r) = right {
            self.get_mut(r).left = left;
        }
        self.get_mut(node).left = None;
        self.get_mut(node).right = None;
        self.get_mut(node).up = None;
    }
}

pub struct ChildIter<'a> {
    arena: &'a Arena,
    next: Option<NodeId>,
}

impl<'a> Iterator for ChildIter<'a> {
    type Item = NodeId;
    fn next(&mut self) -> Option<NodeId> {
        let cur = self.next?;
        self.next = self.arena.get(cur).right;
        Some(cur)
    }
}
