//! The session facade a presentation layer drives.
//!
//! A [`Visualizer`] owns the current structure, the step controller, the
//! playback channel and a random number generator. Every run-initiating
//! operation records a trace against the structure, then plays it back while
//! still holding the structure, so a second run started meanwhile fails with
//! [`VisualizerError::RunInProgress`].
//!
//! # Examples
//!
//! ```rust
//! use treeviz::config::VisualizerConfig;
//! use treeviz::kind::StructureKind;
//! use treeviz::session::Visualizer;
//! use treeviz::step::StepDelays;
//! use treeviz::tree::TraversalOrder;
//!
//! # tokio::runtime::Builder::new_current_thread().enable_time().build().unwrap().block_on(async {
//! let config = VisualizerConfig::default()
//!     .with_kind(StructureKind::Avl)
//!     .with_delays(StepDelays::instant());
//! let visualizer = Visualizer::new(config);
//!
//! for key in [10, 20, 30] {
//!     visualizer.insert(key).await.unwrap();
//! }
//! let report = visualizer.traverse(TraversalOrder::PreOrder).await.unwrap();
//! assert_eq!(report.output, vec![20, 10, 30]);
//! # });
//! ```

use std::fmt;

use parking_lot::Mutex;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
use static_assertions::assert_impl_all;
use tokio::sync::{Mutex as AsyncMutex, MutexGuard, watch};

use crate::Key;
use crate::config::VisualizerConfig;
use crate::error::{StructureError, VisualizerError};
use crate::frame::Frame;
use crate::graph::{Graph, StartFallback};
use crate::heap::Heap;
use crate::kind::StructureKind;
use crate::stats::Statistics;
use crate::step::{Focus, Operation, Playback, Player, StepController, StepMode, Trace};
use crate::tree::{OrderedTree, TraversalOrder};

// =============================================================================
// Structure
// =============================================================================

/// The structure currently hosted by a session.
#[derive(Clone, Debug)]
pub enum Structure {
    /// One of the four ordered tree variants.
    Tree(OrderedTree),
    /// A min- or max-heap.
    Heap(Heap),
    /// An undirected graph.
    Graph(Graph),
}

impl Structure {
    /// Creates the empty structure for `kind`.
    #[must_use]
    pub fn for_kind(kind: StructureKind) -> Self {
        if let Some(variant) = kind.variant() {
            Self::Tree(OrderedTree::new(variant))
        } else if let Some(mode) = kind.heap_mode() {
            Self::Heap(Heap::new(mode))
        } else {
            Self::Graph(Graph::new())
        }
    }

    /// Returns the hosted kind.
    #[must_use]
    pub fn kind(&self) -> StructureKind {
        match self {
            Self::Tree(tree) => tree.variant().into(),
            Self::Heap(heap) => heap.mode().into(),
            Self::Graph(_) => StructureKind::Graph,
        }
    }

    /// Returns tree statistics; graphs have none.
    #[must_use]
    pub fn statistics(&self) -> Option<Statistics> {
        match self {
            Self::Tree(tree) => Some(tree.statistics()),
            Self::Heap(heap) => Some(heap.statistics()),
            Self::Graph(_) => None,
        }
    }

    /// Captures a snapshot.
    #[must_use]
    pub fn frame(&self) -> Frame {
        match self {
            Self::Tree(tree) => tree.frame(),
            Self::Heap(heap) => heap.frame(),
            Self::Graph(graph) => graph.frame(),
        }
    }
}

// =============================================================================
// Reports
// =============================================================================

/// Something the user should be told that is not an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Notice {
    /// A graph traversal started somewhere other than requested.
    StartFallback(StartFallback),
}

impl fmt::Display for Notice {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StartFallback(StartFallback { requested, used }) => write!(
                formatter,
                "node {requested} not found, starting from {used}"
            ),
        }
    }
}

/// Summary of a finished run.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunReport {
    /// Emitted output tokens, such as traversal order.
    pub output: Vec<Key>,
    /// Number of checkpoints played.
    pub steps: usize,
    /// Whether the structure changed.
    pub changed: bool,
    /// Statistics after the run, for trees and heaps.
    pub statistics: Option<Statistics>,
    /// A notice for the user.
    pub notice: Option<Notice>,
}

#[derive(Clone, Copy, Debug)]
struct Outcome {
    changed: bool,
    notice: Option<Notice>,
}

impl Outcome {
    const UNCHANGED: Self = Self {
        changed: false,
        notice: None,
    };

    const CHANGED: Self = Self {
        changed: true,
        notice: None,
    };
}

// =============================================================================
// Visualizer
// =============================================================================

/// A visualizer session.
///
/// All methods take `&self`; share a session across tasks with an `Arc`.
#[derive(Debug)]
pub struct Visualizer {
    config: VisualizerConfig,
    structure: AsyncMutex<Structure>,
    kind: Mutex<StructureKind>,
    player: Player,
    rng: Mutex<StdRng>,
}

assert_impl_all!(Visualizer: Send, Sync);

impl Visualizer {
    /// Creates a session hosting an empty structure of `config.kind`.
    #[must_use]
    pub fn new(config: VisualizerConfig) -> Self {
        let rng = config
            .seed
            .map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64);
        let controller = StepController::new(config.step_mode);
        Self {
            structure: AsyncMutex::new(Structure::for_kind(config.kind)),
            kind: Mutex::new(config.kind),
            player: Player::new(controller, config.delays),
            rng: Mutex::new(rng),
            config,
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &VisualizerConfig {
        &self.config
    }

    // =========================================================================
    // Runs
    // =========================================================================

    /// Inserts `key` into a tree or heap.
    ///
    /// Inserting a key a tree already holds is ignored and reported as
    /// unchanged.
    ///
    /// # Errors
    ///
    /// - [`VisualizerError::RunInProgress`] while another run plays
    /// - [`StructureError::Unsupported`] for graphs
    pub async fn insert(&self, key: Key) -> Result<RunReport, VisualizerError> {
        self.run("insert", |structure, trace, _| match structure {
            Structure::Tree(tree) => tree.insert(key, trace).map(|_| Outcome::CHANGED),
            Structure::Heap(heap) => {
                heap.insert(key, trace);
                Ok(Outcome::CHANGED)
            }
            Structure::Graph(_) => Err(StructureError::unsupported("insert", StructureKind::Graph)),
        })
        .await
    }

    /// Deletes `key` from a tree, or extracts the root of a heap.
    ///
    /// Heaps ignore `key`.
    ///
    /// # Errors
    ///
    /// - [`VisualizerError::RunInProgress`] while another run plays
    /// - [`StructureError::Unsupported`] for red-black trees and graphs
    /// - [`StructureError::EmptyStructure`] or [`StructureError::KeyNotFound`]
    pub async fn delete(&self, key: Key) -> Result<RunReport, VisualizerError> {
        self.run("delete", |structure, trace, _| match structure {
            Structure::Tree(tree) => tree.delete(key, trace).map(|()| Outcome::CHANGED),
            Structure::Heap(heap) => heap.extract_root(trace).map(|_| Outcome::CHANGED),
            Structure::Graph(_) => Err(StructureError::unsupported("delete", StructureKind::Graph)),
        })
        .await
    }

    /// Searches a tree for `key`.
    ///
    /// A miss still plays the probed path before failing.
    ///
    /// # Errors
    ///
    /// - [`VisualizerError::RunInProgress`] while another run plays
    /// - [`StructureError::Unsupported`] for heaps and graphs
    /// - [`StructureError::EmptyStructure`] or [`StructureError::KeyNotFound`]
    pub async fn search(&self, key: Key) -> Result<RunReport, VisualizerError> {
        self.run("search", |structure, trace, _| {
            Self::tree_of(structure, "search")?
                .search(key, trace)
                .map(|_| Outcome::UNCHANGED)
        })
        .await
    }

    /// Traverses a tree in `order`; the report's output holds the keys.
    ///
    /// # Errors
    ///
    /// - [`VisualizerError::RunInProgress`] while another run plays
    /// - [`StructureError::Unsupported`] for heaps and graphs
    /// - [`StructureError::EmptyStructure`] on an empty tree
    pub async fn traverse(&self, order: TraversalOrder) -> Result<RunReport, VisualizerError> {
        self.run("traverse", |structure, trace, _| {
            Self::tree_of(structure, "traverse")?
                .traverse(order, trace)
                .map(|_| Outcome::UNCHANGED)
        })
        .await
    }

    /// Rebuilds a tree into minimal height.
    ///
    /// # Errors
    ///
    /// - [`VisualizerError::RunInProgress`] while another run plays
    /// - [`StructureError::Unsupported`] for heaps and graphs
    pub async fn rebuild_balanced(&self) -> Result<RunReport, VisualizerError> {
        self.run("rebuild", |structure, trace, _| {
            let tree = Self::tree_of(structure, "rebuild")?;
            tree.rebuild_balanced(trace);
            Ok(Outcome {
                changed: !tree.is_empty(),
                notice: None,
            })
        })
        .await
    }

    /// Replaces a heap's contents with `values` and heapifies.
    ///
    /// # Errors
    ///
    /// - [`VisualizerError::RunInProgress`] while another run plays
    /// - [`StructureError::Unsupported`] for trees and graphs
    pub async fn build_heap(&self, values: Vec<Key>) -> Result<RunReport, VisualizerError> {
        self.run("build heap", move |structure, trace, _| {
            Self::heap_of(structure, "build heap")?.build(values, trace);
            Ok(Outcome::CHANGED)
        })
        .await
    }

    /// Builds a heap from random values in `1..=random_max`.
    ///
    /// # Errors
    ///
    /// Same as [`build_heap`](Self::build_heap).
    pub async fn build_random_heap(&self) -> Result<RunReport, VisualizerError> {
        let (count, max) = (self.config.random_count, self.config.random_max);
        self.run("build heap", move |structure, trace, rng| {
            let heap = Self::heap_of(structure, "build heap")?;
            let values: Vec<Key> = (0..count).map(|_| rng.random_range(1..=max)).collect();
            heap.build(values, trace);
            Ok(Outcome::CHANGED)
        })
        .await
    }

    /// Clears the structure, then inserts distinct random keys from
    /// `1..=random_max` one at a time, playing each insertion as its own run.
    ///
    /// # Errors
    ///
    /// - [`VisualizerError::RunInProgress`] while another run plays
    /// - [`StructureError::Unsupported`] for graphs
    pub async fn random_fill(&self) -> Result<RunReport, VisualizerError> {
        let mut structure = self.acquire()?;
        if matches!(*structure, Structure::Graph(_)) {
            return Err(StructureError::unsupported("random fill", StructureKind::Graph).into());
        }
        *structure = Structure::for_kind(structure.kind());

        let keys = {
            let mut pool: Vec<Key> = (1..=self.config.random_max).collect();
            pool.shuffle(&mut *self.rng.lock());
            pool.truncate(self.config.random_count);
            pool
        };
        tracing::debug!(count = keys.len(), "random fill started");

        let mut report = RunReport::default();
        for key in keys {
            let mut trace = Trace::new();
            let inserted = match &mut *structure {
                Structure::Tree(tree) => tree.insert(key, &mut trace).is_ok(),
                Structure::Heap(heap) => {
                    heap.insert(key, &mut trace);
                    true
                }
                Structure::Graph(_) => false,
            };
            self.player.play(&trace).await;
            report.steps += trace.len();
            report.changed |= inserted;
        }
        report.statistics = structure.statistics();
        Ok(report)
    }

    /// Replaces the graph with a random one and lays it out.
    ///
    /// # Errors
    ///
    /// - [`VisualizerError::RunInProgress`] while another run plays
    /// - [`StructureError::Unsupported`] for trees and heaps
    pub async fn generate_graph(&self) -> Result<RunReport, VisualizerError> {
        let (graph_config, layout) = (self.config.graph, self.config.layout);
        self.run("generate graph", move |structure, trace, rng| {
            let graph = Self::graph_of(structure, "generate graph")?;
            *graph = Graph::random(rng, &graph_config);
            graph.layout(&layout);
            let focus = graph.vertices().map(|(id, _)| Focus::Vertex(id));
            trace.record(Operation::Load, focus, || graph.frame());
            trace.settle(|| graph.frame());
            Ok(Outcome::CHANGED)
        })
        .await
    }

    /// Breadth-first traversal of the graph from `start`.
    ///
    /// # Errors
    ///
    /// - [`VisualizerError::RunInProgress`] while another run plays
    /// - [`StructureError::Unsupported`] for trees and heaps
    /// - [`StructureError::EmptyStructure`] on an empty graph
    pub async fn bfs(&self, start: Option<Key>) -> Result<RunReport, VisualizerError> {
        self.run("bfs", |structure, trace, _| {
            let traversal = Self::graph_of(structure, "bfs")?.bfs(start, trace)?;
            Ok(Outcome {
                changed: false,
                notice: traversal.fallback.map(Notice::StartFallback),
            })
        })
        .await
    }

    /// Depth-first traversal of the graph from `start`.
    ///
    /// # Errors
    ///
    /// Same as [`bfs`](Self::bfs).
    pub async fn dfs(&self, start: Option<Key>) -> Result<RunReport, VisualizerError> {
        self.run("dfs", |structure, trace, _| {
            let traversal = Self::graph_of(structure, "dfs")?.dfs(start, trace)?;
            Ok(Outcome {
                changed: false,
                notice: traversal.fallback.map(Notice::StartFallback),
            })
        })
        .await
    }

    /// Records a trace with `body`, plays it, then reports.
    ///
    /// The recorded steps are played even when `body` fails, so a search
    /// miss still shows its path.
    async fn run<F>(&self, operation: &'static str, body: F) -> Result<RunReport, VisualizerError>
    where
        F: FnOnce(&mut Structure, &mut Trace, &mut StdRng) -> Result<Outcome, StructureError>,
    {
        let mut structure = self.acquire()?;
        let mut trace = Trace::new();
        let outcome = {
            let mut rng = self.rng.lock();
            body(&mut *structure, &mut trace, &mut *rng)
        };

        tracing::debug!(
            operation,
            kind = %structure.kind(),
            steps = trace.len(),
            "run started"
        );
        self.player.play(&trace).await;
        let statistics = structure.statistics();
        drop(structure);

        let outcome = match outcome {
            Ok(outcome) => outcome,
            Err(error) if error.is_silent() => {
                tracing::debug!(operation, %error, "ignored");
                Outcome::UNCHANGED
            }
            Err(error) => {
                tracing::debug!(operation, %error, "run failed");
                return Err(error.into());
            }
        };
        tracing::debug!(operation, changed = outcome.changed, "run finished");

        let steps = trace.len();
        let (_, output, _) = trace.into_parts();
        Ok(RunReport {
            output,
            steps,
            changed: outcome.changed,
            statistics,
            notice: outcome.notice,
        })
    }

    fn acquire(&self) -> Result<MutexGuard<'_, Structure>, VisualizerError> {
        self.structure
            .try_lock()
            .map_err(|_| VisualizerError::RunInProgress)
    }

    fn tree_of<'a>(
        structure: &'a mut Structure,
        operation: &'static str,
    ) -> Result<&'a mut OrderedTree, StructureError> {
        match structure {
            Structure::Tree(tree) => Ok(tree),
            other => Err(StructureError::unsupported(operation, other.kind())),
        }
    }

    fn heap_of<'a>(
        structure: &'a mut Structure,
        operation: &'static str,
    ) -> Result<&'a mut Heap, StructureError> {
        match structure {
            Structure::Heap(heap) => Ok(heap),
            other => Err(StructureError::unsupported(operation, other.kind())),
        }
    }

    fn graph_of<'a>(
        structure: &'a mut Structure,
        operation: &'static str,
    ) -> Result<&'a mut Graph, StructureError> {
        match structure {
            Structure::Graph(graph) => Ok(graph),
            other => Err(StructureError::unsupported(operation, other.kind())),
        }
    }

    // =========================================================================
    // Session state
    // =========================================================================

    /// Discards the current structure and hosts an empty one of `kind`.
    ///
    /// # Errors
    ///
    /// Returns [`VisualizerError::RunInProgress`] while a run plays.
    pub fn switch_kind(&self, kind: StructureKind) -> Result<(), VisualizerError> {
        let mut structure = self.acquire()?;
        *structure = Structure::for_kind(kind);
        *self.kind.lock() = kind;
        tracing::info!(%kind, "switched structure kind");
        Ok(())
    }

    /// Empties the current structure, keeping its kind.
    ///
    /// # Errors
    ///
    /// Returns [`VisualizerError::RunInProgress`] while a run plays.
    pub fn clear(&self) -> Result<(), VisualizerError> {
        let mut structure = self.acquire()?;
        *structure = Structure::for_kind(structure.kind());
        tracing::debug!("cleared structure");
        Ok(())
    }

    /// Returns the hosted kind. Available during runs.
    #[must_use]
    pub fn kind(&self) -> StructureKind {
        *self.kind.lock()
    }

    /// Returns the statistics of a tree or heap.
    ///
    /// # Errors
    ///
    /// Returns [`VisualizerError::RunInProgress`] while a run plays.
    pub fn statistics(&self) -> Result<Option<Statistics>, VisualizerError> {
        Ok(self.acquire()?.statistics())
    }

    /// Captures the structure.
    ///
    /// During a run this is the frame of the checkpoint being shown.
    ///
    /// # Errors
    ///
    /// Returns [`VisualizerError::RunInProgress`] if a run plays and no
    /// checkpoint frame has been published yet.
    pub fn frame(&self) -> Result<Frame, VisualizerError> {
        if let Ok(structure) = self.structure.try_lock() {
            return Ok(structure.frame());
        }
        match &*self.player.subscribe().borrow() {
            Playback::Step { step, .. } => step.frame.clone().ok_or(VisualizerError::RunInProgress),
            Playback::Settled(frame) => Ok(Frame::clone(frame)),
            Playback::Idle => Err(VisualizerError::RunInProgress),
        }
    }

    /// Returns the graph's adjacency listing.
    ///
    /// # Errors
    ///
    /// - [`VisualizerError::RunInProgress`] while a run plays
    /// - [`StructureError::Unsupported`] for trees and heaps
    pub fn adjacency_listing(&self) -> Result<Vec<(Key, Vec<Key>)>, VisualizerError> {
        let mut structure = self.acquire()?;
        Ok(Self::graph_of(&mut *structure, "adjacency listing")?.adjacency_listing())
    }

    // =========================================================================
    // Stepping
    // =========================================================================

    /// Switches between timed and manual stepping, also mid-run.
    pub fn set_mode(&self, mode: StepMode) {
        self.player.controller().set_mode(mode);
    }

    /// Returns the step mode.
    #[must_use]
    pub fn mode(&self) -> StepMode {
        self.player.controller().mode()
    }

    /// Releases the pending manual step; see [`StepController::advance`].
    pub fn advance(&self) -> bool {
        self.player.controller().advance()
    }

    /// Returns `true` while a manual step waits.
    #[must_use]
    pub fn is_waiting(&self) -> bool {
        self.player.controller().is_waiting()
    }

    /// Returns a receiver for playback updates.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Playback> {
        self.player.subscribe()
    }

    /// Returns the step controller.
    #[must_use]
    pub const fn controller(&self) -> &StepController {
        self.player.controller()
    }
}

impl Default for Visualizer {
    fn default() -> Self {
        Self::new(VisualizerConfig::default())
    }
}
