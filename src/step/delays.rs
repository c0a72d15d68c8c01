//! Timed-mode pacing.

use std::time::Duration;

use super::operation::Operation;

/// Per-operation delays used in timed mode.
///
/// The defaults reproduce a comfortable on-screen pace; `speed` divides every
/// delay, so `speed = 2.0` plays twice as fast.
///
/// # Examples
///
/// ```rust
/// use std::time::Duration;
/// use treeviz::step::{Operation, StepDelays};
///
/// let delays = StepDelays::default().with_speed(2.0);
/// assert_eq!(delays.for_operation(Operation::Visit), Duration::from_millis(400));
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StepDelays {
    /// New element attached.
    pub place: Duration,
    /// Search comparison.
    pub probe: Duration,
    /// Traversal visit.
    pub visit: Duration,
    /// Heap comparison.
    pub compare: Duration,
    /// Heap swap.
    pub swap: Duration,
    /// Rotations, recolors and color flips.
    pub rebalance: Duration,
    /// Successor copy or removal.
    pub remove: Duration,
    /// Wholesale reload.
    pub load: Duration,
    /// Build-heap index.
    pub heapify: Duration,
    /// BFS discovery.
    pub discover: Duration,
    /// DFS backtrack.
    pub backtrack: Duration,
    /// Divides every delay.
    pub speed: f64,
}

impl Default for StepDelays {
    fn default() -> Self {
        Self {
            place: Duration::from_millis(500),
            probe: Duration::from_millis(500),
            visit: Duration::from_millis(800),
            compare: Duration::from_millis(300),
            swap: Duration::from_millis(500),
            rebalance: Duration::from_millis(1500),
            remove: Duration::from_millis(500),
            load: Duration::from_millis(1000),
            heapify: Duration::from_millis(800),
            discover: Duration::from_millis(400),
            backtrack: Duration::from_millis(400),
            speed: 1.0,
        }
    }
}

impl StepDelays {
    /// Delays that are all zero, for tests and headless batch runs.
    #[must_use]
    pub fn instant() -> Self {
        Self {
            place: Duration::ZERO,
            probe: Duration::ZERO,
            visit: Duration::ZERO,
            compare: Duration::ZERO,
            swap: Duration::ZERO,
            rebalance: Duration::ZERO,
            remove: Duration::ZERO,
            load: Duration::ZERO,
            heapify: Duration::ZERO,
            discover: Duration::ZERO,
            backtrack: Duration::ZERO,
            speed: 1.0,
        }
    }

    /// Sets the speed factor. Non-positive or non-finite values are ignored.
    #[must_use]
    pub fn with_speed(mut self, speed: f64) -> Self {
        if is_valid_speed(speed) {
            self.speed = speed;
        }
        self
    }

    /// Returns the timed-mode delay after a checkpoint of `operation`.
    ///
    /// A `speed` field that is non-positive or non-finite counts as `1.0`;
    /// a quotient too large for a [`Duration`] saturates.
    #[must_use]
    pub fn for_operation(&self, operation: Operation) -> Duration {
        let base = match operation {
            Operation::Place => self.place,
            Operation::Probe => self.probe,
            Operation::Visit => self.visit,
            Operation::Compare => self.compare,
            Operation::Swap => self.swap,
            Operation::Rotate { .. } | Operation::Recolor | Operation::FlipColors => {
                self.rebalance
            }
            Operation::Replace | Operation::Remove => self.remove,
            Operation::Load => self.load,
            Operation::Heapify => self.heapify,
            Operation::Discover => self.discover,
            Operation::Backtrack => self.backtrack,
        };
        if !is_valid_speed(self.speed) {
            return base;
        }
        Duration::try_from_secs_f64(base.as_secs_f64() / self.speed).unwrap_or(Duration::MAX)
    }
}

fn is_valid_speed(speed: f64) -> bool {
    speed.is_finite() && speed > 0.0
}
