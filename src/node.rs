//! Node records and the arena that owns them.
//!
//! Ordered trees store their nodes in a [`NodeArena`] and link them with
//! [`NodeId`] handles. A node's `left`/`right` handles are owning in the
//! logical sense (a node is reachable only through its parent or the root),
//! while `parent` is a plain back-reference used for upward walks.
//!
//! # Examples
//!
//! ```rust
//! use treeviz::node::{Color, Node, NodeArena};
//!
//! let mut arena = NodeArena::new();
//! let id = arena.allocate(Node::new(5));
//! assert_eq!(arena[id].key(), 5);
//! assert_eq!(arena[id].color(), Color::Red);
//!
//! arena.release(id);
//! assert!(arena.get(id).is_none());
//! ```

use std::fmt;
use std::ops::{Index, IndexMut};

use crate::Key;

// =============================================================================
// NodeId
// =============================================================================

/// Handle to a node slot in a [`NodeArena`].
///
/// Handles are stable for the lifetime of the node. Released slots are
/// recycled, so a handle must not be used after its node was removed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeId(usize);

impl NodeId {
    /// Creates a handle from a raw slot index.
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the raw slot index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "#{}", self.0)
    }
}

// =============================================================================
// Color
// =============================================================================

/// The color tag carried by every node.
///
/// Only the red-black variants give it meaning. Fresh nodes are red.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Color {
    /// Red node (the default).
    #[default]
    Red,
    /// Black node.
    Black,
}

impl Color {
    /// Returns the other color.
    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Self::Red => Self::Black,
            Self::Black => Self::Red,
        }
    }
}

// =============================================================================
// Node
// =============================================================================

/// A single tree node.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Node {
    pub(crate) key: Key,
    pub(crate) left: Option<NodeId>,
    pub(crate) right: Option<NodeId>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) color: Color,
}

impl Node {
    /// Creates a detached red node.
    #[must_use]
    pub const fn new(key: Key) -> Self {
        Self {
            key,
            left: None,
            right: None,
            parent: None,
            color: Color::Red,
        }
    }

    /// Creates a detached node with the given color.
    #[must_use]
    pub const fn with_color(key: Key, color: Color) -> Self {
        Self {
            key,
            left: None,
            right: None,
            parent: None,
            color,
        }
    }

    /// Returns the node's key.
    #[must_use]
    pub const fn key(&self) -> Key {
        self.key
    }

    /// Returns the left child handle.
    #[must_use]
    pub const fn left(&self) -> Option<NodeId> {
        self.left
    }

    /// Returns the right child handle.
    #[must_use]
    pub const fn right(&self) -> Option<NodeId> {
        self.right
    }

    /// Returns the parent handle.
    #[must_use]
    pub const fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Returns the node's color.
    #[must_use]
    pub const fn color(&self) -> Color {
        self.color
    }

    /// Returns `true` if the node has no children.
    #[must_use]
    pub const fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    /// Returns `true` if the node is red.
    #[must_use]
    pub fn is_red(&self) -> bool {
        self.color == Color::Red
    }
}

// =============================================================================
// NodeArena
// =============================================================================

/// Slot storage for tree nodes.
///
/// Indexing with a released handle panics; use [`NodeArena::get`] for a
/// checked lookup.
#[derive(Clone, Debug, Default)]
pub struct NodeArena {
    slots: Vec<Option<Node>>,
    free: Vec<usize>,
    len: usize,
}

impl NodeArena {
    /// Creates an empty arena.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            len: 0,
        }
    }

    /// Stores a node and returns its handle, reusing a released slot if any.
    pub fn allocate(&mut self, node: Node) -> NodeId {
        self.len += 1;
        if let Some(index) = self.free.pop() {
            self.slots[index] = Some(node);
            NodeId(index)
        } else {
            self.slots.push(Some(node));
            NodeId(self.slots.len() - 1)
        }
    }

    /// Removes a node and returns it. Released handles yield `None`.
    pub fn release(&mut self, id: NodeId) -> Option<Node> {
        let node = self.slots.get_mut(id.0)?.take()?;
        self.free.push(id.0);
        self.len -= 1;
        Some(node)
    }

    /// Returns the node behind `id`, if it is live.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    /// Returns the node behind `id` mutably, if it is live.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slots.get_mut(id.0).and_then(Option::as_mut)
    }

    /// Returns the number of live nodes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no node is live.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Drops every node.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.len = 0;
    }

    /// Iterates over live nodes in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_ref().map(|node| (NodeId(index), node)))
    }
}

impl Index<NodeId> for NodeArena {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Self::Output {
        match self.get(id) {
            Some(node) => node,
            None => panic!("node handle {id} is not live"),
        }
    }
}

impl IndexMut<NodeId> for NodeArena {
    fn index_mut(&mut self, id: NodeId) -> &mut Self::Output {
        match self.get_mut(id) {
            Some(node) => node,
            None => panic!("node handle {id} is not live"),
        }
    }
}
