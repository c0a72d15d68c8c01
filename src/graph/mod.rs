//! Undirected graphs with traversal and layout.
//!
//! A [`Graph`] stores vertices in insertion order and an adjacency list per
//! vertex. Edges are undirected, deduplicated and never loop back to their
//! own vertex. Vertex identity is the [`VertexId`]; keys are labels and may
//! repeat.
//!
//! # Examples
//!
//! ```rust
//! use kurbo::Point;
//! use treeviz::graph::Graph;
//! use treeviz::step::Trace;
//!
//! let mut graph = Graph::new();
//! let ids: Vec<_> = (1..=4).map(|key| graph.add_vertex(key, Point::ORIGIN)).collect();
//! for pair in ids.windows(2) {
//!     graph.add_edge(pair[0], pair[1]);
//! }
//!
//! let traversal = graph.bfs(Some(1), &mut Trace::headless()).unwrap();
//! assert_eq!(traversal.order, vec![1, 2, 3, 4]);
//! ```

use std::fmt;

use kurbo::Point;
use smallvec::SmallVec;

use crate::Key;
use crate::frame::{Frame, FrameVertex, GraphFrame, VertexState};

mod generate;
mod layout;
mod traversal;

pub use generate::GraphConfig;
pub use layout::LayoutConfig;
pub use traversal::{GraphTraversal, StartFallback};

/// Neighbor list of one vertex.
pub type Neighbors = SmallVec<[VertexId; 4]>;

// =============================================================================
// VertexId
// =============================================================================

/// Handle to a vertex of a [`Graph`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VertexId(usize);

impl VertexId {
    /// Creates a handle from a raw index.
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the raw index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for VertexId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "v{}", self.0)
    }
}

// =============================================================================
// Vertex
// =============================================================================

/// A labelled, positioned vertex.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vertex {
    /// The vertex label.
    pub key: Key,
    /// Layout position.
    pub position: Point,
}

// =============================================================================
// Graph
// =============================================================================

/// An undirected, unweighted graph.
#[derive(Clone, Debug, Default)]
pub struct Graph {
    vertices: Vec<Vertex>,
    adjacency: Vec<Neighbors>,
}

impl Graph {
    /// Creates an empty graph.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            vertices: Vec::new(),
            adjacency: Vec::new(),
        }
    }

    /// Adds a vertex without edges.
    pub fn add_vertex(&mut self, key: Key, position: Point) -> VertexId {
        self.vertices.push(Vertex { key, position });
        self.adjacency.push(Neighbors::new());
        VertexId(self.vertices.len() - 1)
    }

    /// Connects two vertices in both directions.
    ///
    /// Returns `false` and leaves the graph unchanged for a self loop, an
    /// existing edge or an unknown handle.
    pub fn add_edge(&mut self, first: VertexId, second: VertexId) -> bool {
        if first == second
            || first.0 >= self.vertices.len()
            || second.0 >= self.vertices.len()
            || self.adjacency[first.0].contains(&second)
        {
            return false;
        }
        self.adjacency[first.0].push(second);
        self.adjacency[second.0].push(first);
        true
    }

    /// Returns the vertex behind `id`.
    #[must_use]
    pub fn vertex(&self, id: VertexId) -> Option<&Vertex> {
        self.vertices.get(id.0)
    }

    /// Returns the neighbors of `id` in edge insertion order.
    #[must_use]
    pub fn neighbors(&self, id: VertexId) -> &[VertexId] {
        self.adjacency
            .get(id.0)
            .map(|neighbors| neighbors.as_slice())
            .unwrap_or_default()
    }

    /// Iterates over every vertex with its handle.
    pub fn vertices(&self) -> impl Iterator<Item = (VertexId, &Vertex)> {
        self.vertices
            .iter()
            .enumerate()
            .map(|(index, vertex)| (VertexId(index), vertex))
    }

    /// Iterates over every edge once, lower handle first.
    pub fn edges(&self) -> impl Iterator<Item = (VertexId, VertexId)> + '_ {
        self.adjacency
            .iter()
            .enumerate()
            .flat_map(|(index, neighbors)| {
                neighbors
                    .iter()
                    .filter(move |neighbor| neighbor.0 > index)
                    .map(move |&neighbor| (VertexId(index), neighbor))
            })
    }

    /// Returns the number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Returns the number of undirected edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(SmallVec::len).sum::<usize>() / 2
    }

    /// Returns the first vertex labelled `key`.
    #[must_use]
    pub fn find_by_key(&self, key: Key) -> Option<VertexId> {
        self.vertices
            .iter()
            .position(|vertex| vertex.key == key)
            .map(VertexId)
    }

    /// Returns `true` if the graph has no vertices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Removes every vertex and edge.
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.adjacency.clear();
    }

    /// Lists each vertex key with its sorted neighbor keys, ordered by key.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use kurbo::Point;
    /// use treeviz::graph::Graph;
    ///
    /// let mut graph = Graph::new();
    /// let three = graph.add_vertex(3, Point::ORIGIN);
    /// let one = graph.add_vertex(1, Point::ORIGIN);
    /// let two = graph.add_vertex(2, Point::ORIGIN);
    /// graph.add_edge(one, three);
    /// graph.add_edge(one, two);
    ///
    /// assert_eq!(
    ///     graph.adjacency_listing(),
    ///     vec![(1, vec![2, 3]), (2, vec![1]), (3, vec![1])]
    /// );
    /// ```
    #[must_use]
    pub fn adjacency_listing(&self) -> Vec<(Key, Vec<Key>)> {
        let mut listing: Vec<(Key, Vec<Key>)> = self
            .vertices
            .iter()
            .zip(&self.adjacency)
            .map(|(vertex, neighbors)| {
                let mut keys: Vec<Key> = neighbors
                    .iter()
                    .map(|neighbor| self.vertices[neighbor.0].key)
                    .collect();
                keys.sort_unstable();
                (vertex.key, keys)
            })
            .collect();
        listing.sort_by_key(|(key, _)| *key);
        listing
    }

    /// Captures the graph with every vertex unvisited.
    #[must_use]
    pub fn frame(&self) -> Frame {
        if self.is_empty() {
            return Frame::Empty;
        }
        self.frame_with(&[])
    }

    /// Captures the graph with per-vertex states; missing states are
    /// [`VertexState::Unvisited`].
    fn frame_with(&self, states: &[VertexState]) -> Frame {
        let vertices = self
            .vertices()
            .map(|(id, vertex)| FrameVertex {
                id,
                key: vertex.key,
                position: vertex.position,
                state: states.get(id.0).copied().unwrap_or_default(),
            })
            .collect();
        Frame::Graph(GraphFrame {
            vertices,
            edges: self.edges().collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn triangle() -> (Graph, [VertexId; 3]) {
        let mut graph = Graph::new();
        let ids = [1, 2, 3].map(|key| graph.add_vertex(key, Point::ORIGIN));
        graph.add_edge(ids[0], ids[1]);
        graph.add_edge(ids[1], ids[2]);
        graph.add_edge(ids[2], ids[0]);
        (graph, ids)
    }

    #[rstest]
    fn test_edges_are_symmetric() {
        let (graph, ids) = triangle();
        assert_eq!(graph.edge_count(), 3);
        assert!(graph.neighbors(ids[0]).contains(&ids[1]));
        assert!(graph.neighbors(ids[1]).contains(&ids[0]));
    }

    #[rstest]
    fn test_duplicate_and_self_edges_are_rejected() {
        let (mut graph, ids) = triangle();
        assert!(!graph.add_edge(ids[0], ids[1]));
        assert!(!graph.add_edge(ids[1], ids[0]));
        assert!(!graph.add_edge(ids[2], ids[2]));
        assert!(!graph.add_edge(ids[0], VertexId::new(9)));
        assert_eq!(graph.edge_count(), 3);
    }

    #[rstest]
    fn test_edges_listed_once() {
        let (graph, ids) = triangle();
        let edges: Vec<_> = graph.edges().collect();
        assert_eq!(
            edges,
            vec![(ids[0], ids[1]), (ids[0], ids[2]), (ids[1], ids[2])]
        );
    }

    #[rstest]
    fn test_find_by_key_returns_first_match() {
        let mut graph = Graph::new();
        let first = graph.add_vertex(5, Point::ORIGIN);
        let _second = graph.add_vertex(5, Point::ORIGIN);
        assert_eq!(graph.find_by_key(5), Some(first));
        assert_eq!(graph.find_by_key(6), None);
    }

    #[rstest]
    fn test_frame_marks_vertices_unvisited() {
        let (graph, ids) = triangle();
        let frame = graph.frame();
        let frame = frame.as_graph().unwrap();
        assert_eq!(frame.state_of(ids[2]), Some(VertexState::Unvisited));
        assert_eq!(frame.edges.len(), 3);
    }

    #[rstest]
    fn test_unknown_vertex_has_no_neighbors() {
        assert!(Graph::new().neighbors(VertexId::new(0)).is_empty());
    }
}
