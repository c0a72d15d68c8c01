//! Checkpoints, suspension and playback.
//!
//! Engines never sleep or wait themselves. They record a [`Step`] into a
//! [`Trace`] at every checkpoint, each step carrying the operation name, the
//! highlighted elements and a [`Frame`](crate::frame::Frame) snapshot. A
//! [`Player`] then replays the trace, publishing each step on a single-slot
//! channel and suspending through a [`StepController`] that resolves either
//! on a timer or on a manual advance signal.
//!
//! # Examples
//!
//! ```rust
//! use treeviz::step::{Player, StepController, StepDelays, StepMode, Trace};
//! use treeviz::tree::{OrderedTree, Variant};
//!
//! # tokio::runtime::Builder::new_current_thread().enable_time().build().unwrap().block_on(async {
//! let mut tree = OrderedTree::new(Variant::RedBlack);
//! let mut trace = Trace::new();
//! for key in [1, 2, 3] {
//!     tree.insert(key, &mut trace).unwrap();
//! }
//!
//! let player = Player::new(StepController::new(StepMode::Timed), StepDelays::instant());
//! player.play(&trace).await;
//! # });
//! ```

mod controller;
mod delays;
mod operation;
mod player;
mod trace;

pub use controller::StepController;
pub use controller::StepMode;
pub use delays::StepDelays;
pub use operation::Direction;
pub use operation::Foci;
pub use operation::Focus;
pub use operation::Operation;
pub use operation::RotationCase;
pub use player::Playback;
pub use player::Player;
pub use trace::Step;
pub use trace::Trace;
