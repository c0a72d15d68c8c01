//! Renderer-facing snapshots.
//!
//! A [`Frame`] is an owned copy of everything a renderer needs to draw one
//! structure at one instant. Engines capture a frame at each checkpoint so a
//! recorded step can be shown after the structure moved on.

use kurbo::Point;

use crate::Key;
use crate::graph::VertexId;
use crate::node::{Color, NodeId};

/// A snapshot of one structure.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Frame {
    /// Nothing to draw.
    #[default]
    Empty,
    /// An ordered tree, or a heap drawn through its tree view.
    Tree(TreeFrame),
    /// A graph with per-vertex traversal state.
    Graph(GraphFrame),
}

impl Frame {
    /// Returns the tree snapshot, if this is one.
    #[must_use]
    pub const fn as_tree(&self) -> Option<&TreeFrame> {
        match self {
            Self::Tree(tree) => Some(tree),
            _ => None,
        }
    }

    /// Returns the graph snapshot, if this is one.
    #[must_use]
    pub const fn as_graph(&self) -> Option<&GraphFrame> {
        match self {
            Self::Graph(graph) => Some(graph),
            _ => None,
        }
    }
}

// =============================================================================
// Tree frames
// =============================================================================

/// A tree-shaped snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TreeFrame {
    /// Handle of the root node.
    pub root: Option<NodeId>,
    /// Reachable nodes in pre-order.
    pub nodes: Vec<FrameNode>,
}

impl TreeFrame {
    /// Looks up a node of the snapshot by handle.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&FrameNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    /// Returns the root's key.
    #[must_use]
    pub fn root_key(&self) -> Option<Key> {
        self.root.and_then(|id| self.node(id)).map(|node| node.key)
    }

    /// Returns the keys in in-order sequence.
    #[must_use]
    pub fn in_order_keys(&self) -> Vec<Key> {
        let mut keys = Vec::with_capacity(self.nodes.len());
        let mut pending: Vec<&FrameNode> = Vec::new();
        let mut current = self.root.and_then(|id| self.node(id));
        loop {
            while let Some(node) = current {
                pending.push(node);
                current = node.left.and_then(|id| self.node(id));
            }
            let Some(node) = pending.pop() else {
                break;
            };
            keys.push(node.key);
            current = node.right.and_then(|id| self.node(id));
        }
        keys
    }
}

/// One node of a [`TreeFrame`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FrameNode {
    /// Stable identity for animation.
    pub id: NodeId,
    /// The node's key.
    pub key: Key,
    /// The node's color tag.
    pub color: Color,
    /// Left child handle.
    pub left: Option<NodeId>,
    /// Right child handle.
    pub right: Option<NodeId>,
}

// =============================================================================
// Graph frames
// =============================================================================

/// Traversal state of a vertex at the time of a snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VertexState {
    /// Not reached yet.
    #[default]
    Unvisited,
    /// Enqueued by BFS but not processed.
    Discovered,
    /// Currently being visited.
    Active,
    /// Processed (BFS) or backtracked from (DFS).
    Done,
}

/// A graph snapshot.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GraphFrame {
    /// Every vertex.
    pub vertices: Vec<FrameVertex>,
    /// Every undirected edge once, lower id first.
    pub edges: Vec<(VertexId, VertexId)>,
}

impl GraphFrame {
    /// Returns the state of a vertex in this snapshot.
    #[must_use]
    pub fn state_of(&self, id: VertexId) -> Option<VertexState> {
        self.vertices
            .iter()
            .find(|vertex| vertex.id == id)
            .map(|vertex| vertex.state)
    }
}

/// One vertex of a [`GraphFrame`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FrameVertex {
    /// The vertex handle.
    pub id: VertexId,
    /// The vertex key.
    pub key: Key,
    /// Layout position.
    pub position: Point,
    /// Traversal state.
    pub state: VertexState,
}
