//! Force-directed placement.

use kurbo::{Point, Size, Vec2};

use super::Graph;

/// Parameters of [`Graph::layout`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayoutConfig {
    /// Number of relaxation rounds.
    pub iterations: usize,
    /// Multiplier on the ideal edge length `sqrt(area / n)`.
    pub spring_scale: f64,
    /// Pull toward the canvas center per round.
    pub centering: f64,
    /// Longest move of a vertex in one round.
    pub max_displacement: f64,
    /// Distance kept free along every canvas border.
    pub margin: f64,
    /// Drawing surface.
    pub canvas: Size,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            iterations: 200,
            spring_scale: 0.6,
            centering: 0.05,
            max_displacement: 30.0,
            margin: 80.0,
            canvas: Size::new(800.0, 600.0),
        }
    }
}

impl LayoutConfig {
    /// Sets the canvas.
    #[must_use]
    pub const fn with_canvas(mut self, canvas: Size) -> Self {
        self.canvas = canvas;
        self
    }

    /// Returns the range a coordinate is clamped to along one axis.
    fn bounds(&self, extent: f64) -> (f64, f64) {
        if extent > 2.0 * self.margin {
            (self.margin, extent - self.margin)
        } else {
            (extent / 2.0, extent / 2.0)
        }
    }
}

impl Graph {
    /// Relaxes vertex positions with a spring model.
    ///
    /// Every pair repels with `k² / d`, every edge attracts with `d² / k`
    /// and each vertex is pulled toward the canvas center. A round's
    /// displacement is computed from the previous positions, capped at
    /// `max_displacement` and the result clamped inside the margins.
    /// Coincident vertices are treated as one unit apart.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use kurbo::Point;
    /// use treeviz::graph::{Graph, LayoutConfig};
    ///
    /// let mut graph = Graph::new();
    /// let first = graph.add_vertex(1, Point::new(400.0, 300.0));
    /// let second = graph.add_vertex(2, Point::new(401.0, 300.0));
    /// graph.add_edge(first, second);
    /// graph.layout(&LayoutConfig::default());
    ///
    /// let a = graph.vertex(first).unwrap().position;
    /// let b = graph.vertex(second).unwrap().position;
    /// assert!(a.distance(b) > 1.0);
    /// ```
    #[allow(clippy::cast_precision_loss)]
    pub fn layout(&mut self, config: &LayoutConfig) {
        let count = self.vertices.len();
        if count == 0 {
            return;
        }

        let Size { width, height } = config.canvas;
        let spring = (width * height / count as f64).sqrt() * config.spring_scale;
        let center = Point::new(width / 2.0, height / 2.0);
        let (min_x, max_x) = config.bounds(width);
        let (min_y, max_y) = config.bounds(height);
        let edges: Vec<(usize, usize)> = self
            .edges()
            .map(|(first, second)| (first.0, second.0))
            .collect();

        let mut displacement = vec![Vec2::ZERO; count];
        for _ in 0..config.iterations {
            displacement.fill(Vec2::ZERO);

            for first in 0..count {
                for second in first + 1..count {
                    let (direction, distance) = self.separation(first, second);
                    let push = direction * (spring * spring / distance);
                    displacement[first] += push;
                    displacement[second] -= push;
                }
            }

            for &(first, second) in &edges {
                let (direction, distance) = self.separation(first, second);
                let pull = direction * (distance * distance / spring);
                displacement[first] -= pull;
                displacement[second] += pull;
            }

            for (vertex, shift) in self.vertices.iter_mut().zip(&displacement) {
                let mut shift = *shift - (vertex.position - center) * config.centering;
                let length = shift.hypot();
                if length > config.max_displacement {
                    shift = shift * (config.max_displacement / length);
                }
                let moved = vertex.position + shift;
                vertex.position = Point::new(
                    moved.x.clamp(min_x, max_x),
                    moved.y.clamp(min_y, max_y),
                );
            }
        }
    }

    /// Returns the unit-scaled offset from `second` to `first` and the
    /// distance between them, with zero distance read as one.
    fn separation(&self, first: usize, second: usize) -> (Vec2, f64) {
        let delta = self.vertices[first].position - self.vertices[second].position;
        let distance = delta.hypot();
        let distance = if distance > 0.0 { distance } else { 1.0 };
        (delta / distance, distance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphConfig;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rstest::rstest;

    #[rstest]
    #[case(3)]
    #[case(11)]
    fn test_layout_keeps_vertices_inside_margin(#[case] seed: u64) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut graph = Graph::random(&mut rng, &GraphConfig::default());
        let config = LayoutConfig::default();
        graph.layout(&config);

        for (_, vertex) in graph.vertices() {
            let Point { x, y } = vertex.position;
            assert!((80.0..=720.0).contains(&x), "x = {x}");
            assert!((80.0..=520.0).contains(&y), "y = {y}");
        }
    }

    #[rstest]
    fn test_coincident_vertices_separate() {
        let mut graph = Graph::new();
        graph.add_vertex(1, Point::new(400.0, 300.0));
        graph.add_vertex(2, Point::new(400.0, 300.0));
        graph.add_vertex(3, Point::new(410.0, 300.0));
        graph.layout(&LayoutConfig::default());

        let positions: Vec<Point> = graph
            .vertices()
            .map(|(_, vertex)| vertex.position)
            .collect();
        assert!(positions.iter().all(|point| point.is_finite()));
        assert!(positions[0].distance(positions[2]) > 10.0);
    }

    #[rstest]
    fn test_tiny_canvas_collapses_to_center() {
        let mut graph = Graph::new();
        graph.add_vertex(1, Point::new(10.0, 10.0));
        let config = LayoutConfig::default().with_canvas(Size::new(100.0, 100.0));
        graph.layout(&config);
        let only = graph.vertices().next().unwrap().1;
        assert_eq!(only.position, Point::new(50.0, 50.0));
    }

    #[rstest]
    fn test_empty_graph_layout_is_noop() {
        let mut graph = Graph::new();
        graph.layout(&LayoutConfig::default());
        assert!(graph.is_empty());
    }
}
