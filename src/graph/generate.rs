//! Random graph generation.

use kurbo::{Point, Size, Vec2};
use rand::Rng;

use super::{Graph, VertexId};

/// Parameters of [`Graph::random`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GraphConfig {
    /// Fewest vertices generated.
    pub min_vertices: usize,
    /// Most vertices generated.
    pub max_vertices: usize,
    /// Chance that any unordered pair is connected.
    pub edge_probability: f64,
    /// Drawing surface; vertices start near its center.
    pub canvas: Size,
    /// Side of the square around the center that start positions fall in.
    pub jitter: f64,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            min_vertices: 7,
            max_vertices: 12,
            edge_probability: 0.2,
            canvas: Size::new(800.0, 600.0),
            jitter: 50.0,
        }
    }
}

impl GraphConfig {
    /// Sets the canvas.
    #[must_use]
    pub const fn with_canvas(mut self, canvas: Size) -> Self {
        self.canvas = canvas;
        self
    }
}

impl Graph {
    /// Generates a random graph.
    ///
    /// Vertices are keyed `1..=N` and placed around the canvas center. Each
    /// unordered pair is connected with `edge_probability`; afterwards every
    /// vertex still without an edge is connected to a random other vertex,
    /// so no vertex is isolated once `N >= 2`. Positions are not laid out;
    /// call [`layout`](Self::layout) afterwards.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rand::SeedableRng;
    /// use rand::rngs::StdRng;
    /// use treeviz::graph::{Graph, GraphConfig};
    ///
    /// let mut rng = StdRng::seed_from_u64(7);
    /// let graph = Graph::random(&mut rng, &GraphConfig::default());
    ///
    /// assert!((7..=12).contains(&graph.vertex_count()));
    /// assert!(graph.vertices().all(|(id, _)| !graph.neighbors(id).is_empty()));
    /// ```
    pub fn random<R>(rng: &mut R, config: &GraphConfig) -> Self
    where
        R: Rng,
    {
        let low = config.min_vertices.min(config.max_vertices);
        let high = config.min_vertices.max(config.max_vertices);
        let count = rng.random_range(low..=high);
        let center = Point::new(config.canvas.width / 2.0, config.canvas.height / 2.0);
        let probability = config.edge_probability.clamp(0.0, 1.0);

        let mut graph = Self::new();
        for key in (1..).take(count) {
            let offset = Vec2::new(
                (rng.random::<f64>() - 0.5) * config.jitter,
                (rng.random::<f64>() - 0.5) * config.jitter,
            );
            graph.add_vertex(key, center + offset);
        }

        for first in 0..count {
            for second in first + 1..count {
                if rng.random_bool(probability) {
                    graph.add_edge(VertexId(first), VertexId(second));
                }
            }
        }

        if count >= 2 {
            for index in 0..count {
                if graph.adjacency[index].is_empty() {
                    let mut other = rng.random_range(0..count - 1);
                    if other >= index {
                        other += 1;
                    }
                    graph.add_edge(VertexId(index), VertexId(other));
                }
            }
        }

        tracing::debug!(
            vertices = graph.vertex_count(),
            edges = graph.edge_count(),
            "generated random graph"
        );
        graph
    }
}
