//! Breadth- and depth-first traversal.

use std::collections::VecDeque;

use crate::Key;
use crate::error::StructureError;
use crate::frame::VertexState;
use crate::step::{Focus, Operation, Trace};

use super::{Graph, VertexId};

/// Reports that a requested start key was absent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StartFallback {
    /// The key that was asked for.
    pub requested: Key,
    /// The key the traversal started from instead.
    pub used: Key,
}

/// Result of a BFS or DFS run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GraphTraversal {
    /// Keys in visiting order.
    pub order: Vec<Key>,
    /// The vertex the traversal started from.
    pub start: VertexId,
    /// Set when the requested start was absent.
    pub fallback: Option<StartFallback>,
}

impl Graph {
    /// Breadth-first traversal.
    ///
    /// Vertices are marked at enqueue time, so each is enqueued once. Every
    /// dequeued vertex records a `Visit` emitting its key; every newly
    /// enqueued neighbor records a `Discover`.
    ///
    /// `start` selects the first vertex with that key. Without a key the
    /// traversal starts at the first vertex; an absent key falls back to it
    /// and the result carries a [`StartFallback`].
    ///
    /// # Errors
    ///
    /// Returns [`StructureError::EmptyStructure`] for an empty graph.
    pub fn bfs(
        &self,
        start: Option<Key>,
        trace: &mut Trace,
    ) -> Result<GraphTraversal, StructureError> {
        let (start, fallback) = self.resolve_start("bfs", start)?;
        let mut states = vec![VertexState::Unvisited; self.vertex_count()];
        let mut order = Vec::with_capacity(states.len());
        let mut queue = VecDeque::from([start]);
        states[start.0] = VertexState::Discovered;

        while let Some(id) = queue.pop_front() {
            states[id.0] = VertexState::Active;
            let key = self.vertices[id.0].key;
            order.push(key);
            trace.visit(Operation::Visit, [Focus::Vertex(id)], key, || {
                self.frame_with(&states)
            });

            for &neighbor in self.neighbors(id) {
                if states[neighbor.0] == VertexState::Unvisited {
                    states[neighbor.0] = VertexState::Discovered;
                    queue.push_back(neighbor);
                    trace.record(
                        Operation::Discover,
                        [Focus::Vertex(neighbor), Focus::Vertex(id)],
                        || self.frame_with(&states),
                    );
                }
            }
            states[id.0] = VertexState::Done;
        }

        trace.settle(|| self.frame_with(&states));
        Ok(GraphTraversal {
            order,
            start,
            fallback,
        })
    }

    /// Depth-first traversal.
    ///
    /// Each vertex records a `Visit` on arrival and a `Backtrack` once all
    /// its neighbors are exhausted. Start selection follows
    /// [`bfs`](Self::bfs).
    ///
    /// # Errors
    ///
    /// Returns [`StructureError::EmptyStructure`] for an empty graph.
    pub fn dfs(
        &self,
        start: Option<Key>,
        trace: &mut Trace,
    ) -> Result<GraphTraversal, StructureError> {
        let (start, fallback) = self.resolve_start("dfs", start)?;
        let mut states = vec![VertexState::Unvisited; self.vertex_count()];
        let mut order = Vec::with_capacity(states.len());
        self.descend(start, &mut states, &mut order, trace);

        trace.settle(|| self.frame_with(&states));
        Ok(GraphTraversal {
            order,
            start,
            fallback,
        })
    }

    fn descend(
        &self,
        id: VertexId,
        states: &mut [VertexState],
        order: &mut Vec<Key>,
        trace: &mut Trace,
    ) {
        states[id.0] = VertexState::Active;
        let key = self.vertices[id.0].key;
        order.push(key);
        trace.visit(Operation::Visit, [Focus::Vertex(id)], key, || {
            self.frame_with(&*states)
        });

        for &neighbor in self.neighbors(id) {
            if states[neighbor.0] == VertexState::Unvisited {
                self.descend(neighbor, states, order, trace);
            }
        }

        states[id.0] = VertexState::Done;
        trace.record(Operation::Backtrack, [Focus::Vertex(id)], || {
            self.frame_with(&*states)
        });
    }

    fn resolve_start(
        &self,
        operation: &'static str,
        requested: Option<Key>,
    ) -> Result<(VertexId, Option<StartFallback>), StructureError> {
        let Some(first) = self.vertices.first() else {
            return Err(StructureError::empty(operation));
        };
        let Some(requested) = requested else {
            return Ok((VertexId(0), None));
        };
        match self.find_by_key(requested) {
            Some(id) => Ok((id, None)),
            None => {
                tracing::warn!(
                    requested,
                    used = first.key,
                    "start vertex not found, falling back"
                );
                Ok((
                    VertexId(0),
                    Some(StartFallback {
                        requested,
                        used: first.key,
                    }),
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Point;
    use rstest::rstest;

    /// 1 - 2 - 4
    /// |
    /// 3 - 5
    fn sample() -> Graph {
        let mut graph = Graph::new();
        let ids: Vec<VertexId> = (1..=5)
            .map(|key| graph.add_vertex(key, Point::ORIGIN))
            .collect();
        for (first, second) in [(0, 1), (0, 2), (1, 3), (2, 4)] {
            graph.add_edge(ids[first], ids[second]);
        }
        graph
    }

    #[rstest]
    fn test_bfs_visits_by_layer() {
        let mut trace = Trace::headless();
        let traversal = sample().bfs(Some(1), &mut trace).unwrap();
        assert_eq!(traversal.order, vec![1, 2, 3, 4, 5]);
        assert_eq!(traversal.fallback, None);
        assert_eq!(trace.output(), &[1, 2, 3, 4, 5]);
        let discoveries = trace
            .operations()
            .filter(|operation| *operation == Operation::Discover)
            .count();
        assert_eq!(discoveries, 4);
    }

    #[rstest]
    fn test_dfs_goes_deep_first() {
        let mut trace = Trace::headless();
        let traversal = sample().dfs(Some(1), &mut trace).unwrap();
        assert_eq!(traversal.order, vec![1, 2, 4, 3, 5]);
        let backtracks = trace
            .operations()
            .filter(|operation| *operation == Operation::Backtrack)
            .count();
        assert_eq!(backtracks, 5);
    }

    #[rstest]
    fn test_missing_start_falls_back_to_first_vertex() {
        let traversal = sample().dfs(Some(42), &mut Trace::headless()).unwrap();
        assert_eq!(
            traversal.fallback,
            Some(StartFallback {
                requested: 42,
                used: 1,
            })
        );
        assert_eq!(traversal.order[0], 1);
    }

    #[rstest]
    fn test_no_start_uses_first_vertex_silently() {
        let traversal = sample().bfs(None, &mut Trace::headless()).unwrap();
        assert_eq!(traversal.start, VertexId::new(0));
        assert_eq!(traversal.fallback, None);
    }

    #[rstest]
    fn test_unreachable_vertices_are_skipped() {
        let mut graph = sample();
        graph.add_vertex(6, Point::ORIGIN);
        let traversal = graph.bfs(Some(6), &mut Trace::headless()).unwrap();
        assert_eq!(traversal.order, vec![6]);
    }

    #[rstest]
    #[case::bfs(true)]
    #[case::dfs(false)]
    fn test_empty_graph_is_rejected(#[case] breadth_first: bool) {
        let graph = Graph::new();
        let mut trace = Trace::headless();
        let result = if breadth_first {
            graph.bfs(Some(1), &mut trace)
        } else {
            graph.dfs(Some(1), &mut trace)
        };
        assert!(matches!(
            result,
            Err(StructureError::EmptyStructure { .. })
        ));
        assert!(trace.is_empty());
    }

    #[rstest]
    fn test_settled_frame_marks_all_reached_done() {
        let mut trace = Trace::new();
        let graph = sample();
        graph.bfs(None, &mut trace).unwrap();
        let frame = trace.settled().and_then(|frame| frame.as_graph()).unwrap();
        assert!(
            frame
                .vertices
                .iter()
                .all(|vertex| vertex.state == VertexState::Done)
        );
    }
}
