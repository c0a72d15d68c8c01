//! # treeviz
//!
//! A step-by-step visualization engine for classic data structures.
//!
//! ## Overview
//!
//! The crate implements the algorithmic core of an animated data structure
//! visualizer. Every algorithm records a checkpoint for each comparison,
//! swap, rotation, recolor or visit, and a player replays those checkpoints
//! either on a timer or one manual step at a time.
//!
//! - **Ordered trees**: BST, AVL, Red-Black and Left-Leaning Red-Black trees
//!   stored in a node arena ([`tree`])
//! - **Heaps**: array-backed Min/Max binary heaps with a derived tree view
//!   ([`heap`])
//! - **Graphs**: undirected graphs with random generation, BFS/DFS and a
//!   force-directed layout ([`graph`])
//! - **Stepping**: checkpoint traces, the suspension primitive and playback
//!   ([`step`])
//! - **Session**: the facade a presentation layer drives ([`session`])
//!
//! ## Feature Flags
//!
//! - `serde`: `Serialize`/`Deserialize` for frames, steps and configuration
//! - `cli`: the headless `treeviz` command-line driver
//! - `full`: Enable all features
//!
//! ## Example
//!
//! ```rust
//! use treeviz::prelude::*;
//!
//! let mut tree = OrderedTree::new(Variant::Avl);
//! let mut trace = Trace::headless();
//! for key in [10, 20, 30] {
//!     tree.insert(key, &mut trace).unwrap();
//! }
//!
//! let root = tree.root().and_then(|id| tree.node(id)).map(|node| node.key());
//! assert_eq!(root, Some(20));
//! assert_eq!(tree.height(), 2);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Prelude module for convenient imports.
///
/// Re-exports commonly used types and traits.
///
/// # Usage
///
/// ```rust
/// use treeviz::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::*;
    pub use crate::error::*;
    pub use crate::frame::*;
    pub use crate::graph::*;
    pub use crate::heap::*;
    pub use crate::kind::*;
    pub use crate::node::*;
    pub use crate::session::*;
    pub use crate::stats::*;
    pub use crate::step::*;
    pub use crate::tree::*;
}

pub mod config;
pub mod error;
pub mod frame;
pub mod graph;
pub mod heap;
pub mod kind;
pub mod node;
pub mod session;
pub mod stats;
pub mod step;
pub mod tree;

/// The key type stored by every structure.
///
/// Only totally ordered numeric keys are supported.
pub type Key = i64;
