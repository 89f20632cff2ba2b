//! The OID trie.
//!
//! Nodes live in an arena (`Vec<Node>`) addressed by [`NodeId`] handles; a
//! node stores its parent handle inline, so child-to-parent walks need no
//! shared ownership and the whole structure is plain owned data. The arena is
//! mutable while the resolver runs and frozen inside the
//! [`Mib`](crate::mib::Mib) afterwards.
//!
//! Children are kept in a `BTreeMap` keyed by arc, which makes sibling
//! iteration deterministic without a separate sorted cache.
use std::collections::BTreeMap;

use crate::entities::{CapabilityId, ComplianceId, GroupId, NotificationId, ObjectId};
use crate::module::ModuleId;
use crate::oid::Oid;

// ---------------------------------------------------------------------------
// Handles and kinds
// ---------------------------------------------------------------------------

/// Handle to a node in the OID trie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// What a node represents once semantic analysis has run.
///
/// `Internal` covers unnamed glue arcs as well as module identities, object
/// identities and plain value assignments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Internal,
    Scalar,
    Table,
    Row,
    Column,
    Notification,
    Group,
    Compliance,
    Capability,
}

// ---------------------------------------------------------------------------
// Node
// ---------------------------------------------------------------------------

/// One node of the OID trie.
///
/// The five entity references are mutually independent: different modules
/// may attach, say, an object and a group to the same OID. At most one of
/// each is ever set, and each points to a record whose own node reference
/// points back here.
#[derive(Debug, Clone)]
pub struct Node {
    /// The arc this node carries under its parent. The pseudo-root's arc is
    /// 0 and never observable through [`OidTree::oid`].
    pub arc: u32,
    /// The parent handle; `None` only for the pseudo-root.
    pub parent: Option<NodeId>,
    /// Children keyed by arc. Keys are unique by construction.
    pub children: BTreeMap<u32, NodeId>,
    /// The registered name, if any module named this node.
    pub name: Option<String>,
    /// The module whose assignment won this node.
    pub module: Option<ModuleId>,
    /// Node classification.
    pub kind: NodeKind,
    pub object: Option<ObjectId>,
    pub notification: Option<NotificationId>,
    pub group: Option<GroupId>,
    pub compliance: Option<ComplianceId>,
    pub capability: Option<CapabilityId>,
}

impl Node {
    fn new(arc: u32, parent: Option<NodeId>) -> Self {
        Self {
            arc,
            parent,
            children: BTreeMap::new(),
            name: None,
            module: None,
            kind: NodeKind::Internal,
            object: None,
            notification: None,
            group: None,
            compliance: None,
            capability: None,
        }
    }
}

// ---------------------------------------------------------------------------
// OidTree
// ---------------------------------------------------------------------------

/// The arena-backed OID trie. Index 0 is the anonymous pseudo-root.
#[derive(Debug, Clone)]
pub struct OidTree {
    nodes: Vec<Node>,
}

impl OidTree {
    /// Creates a tree holding only the pseudo-root.
    pub fn new() -> Self {
        Self { nodes: vec![Node::new(0, None)] }
    }

    /// The pseudo-root handle.
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Total number of nodes, including the pseudo-root.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// `true` when only the pseudo-root exists.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Borrows a node.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    /// Returns the existing child of `parent` for `arc`, or creates an
    /// `Internal` one.
    pub fn get_or_create_child(&mut self, parent: NodeId, arc: u32) -> NodeId {
        if let Some(&child) = self.nodes[parent.index()].children.get(&arc) {
            return child;
        }
        let child = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node::new(arc, Some(parent)));
        self.nodes[parent.index()].children.insert(arc, child);
        child
    }

    /// Returns the child of `parent` for `arc`, if present.
    pub fn child(&self, parent: NodeId, arc: u32) -> Option<NodeId> {
        self.nodes[parent.index()].children.get(&arc).copied()
    }

    /// Finds a direct child of `parent` by its registered name.
    pub fn child_named(&self, parent: NodeId, name: &str) -> Option<NodeId> {
        self.nodes[parent.index()]
            .children
            .values()
            .copied()
            .find(|&c| self.nodes[c.index()].name.as_deref() == Some(name))
    }

    /// Recovers a node's OID by walking to the root. The root yields the
    /// empty OID.
    pub fn oid(&self, id: NodeId) -> Oid {
        let mut arcs = Vec::new();
        let mut cur = id;
        while let Some(parent) = self.nodes[cur.index()].parent {
            arcs.push(self.nodes[cur.index()].arc);
            cur = parent;
        }
        arcs.reverse();
        Oid::new(arcs)
    }

    /// Walks `oid` from the root, requiring every arc to match.
    pub fn find(&self, oid: &Oid) -> Option<NodeId> {
        let mut cur = self.root();
        for &arc in oid.arcs() {
            cur = self.child(cur, arc)?;
        }
        Some(cur)
    }

    /// Returns the deepest node reachable along a prefix of `oid`, or `None`
    /// when not even the first arc matches. An exact match returns the node
    /// itself.
    pub fn longest_prefix(&self, oid: &Oid) -> Option<NodeId> {
        let mut cur = self.root();
        let mut deepest = None;
        for &arc in oid.arcs() {
            match self.child(cur, arc) {
                Some(child) => {
                    cur = child;
                    deepest = Some(child);
                }
                None => break,
            }
        }
        deepest
    }

    /// Lazy depth-first traversal of the subtree rooted at `id`, in arc
    /// order, starting with `id` itself.
    pub fn subtree(&self, id: NodeId) -> Subtree<'_> {
        Subtree { tree: self, stack: vec![id] }
    }

    /// Checks the structural invariants: every child's parent handle points
    /// back at the node that lists it, and arcs match the child-map keys.
    /// Returns the first violation found.
    pub fn check_parent_links(&self) -> Result<(), String> {
        for (index, node) in self.nodes.iter().enumerate() {
            for (&arc, &child) in &node.children {
                let c = &self.nodes[child.index()];
                if c.parent != Some(NodeId(index as u32)) {
                    return Err(format!(
                        "child {child:?} of node {index} has parent {:?}",
                        c.parent
                    ));
                }
                if c.arc != arc {
                    return Err(format!(
                        "child {child:?} keyed by arc {arc} carries arc {}",
                        c.arc
                    ));
                }
            }
        }
        Ok(())
    }
}

impl Default for OidTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Depth-first iterator over a subtree. See [`OidTree::subtree`].
pub struct Subtree<'a> {
    tree: &'a OidTree,
    stack: Vec<NodeId>,
}

impl Iterator for Subtree<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        // Push in reverse arc order so the smallest arc pops first.
        let children = &self.tree.nodes[id.index()].children;
        self.stack.extend(children.values().rev().copied());
        Some(id)
    }
}
