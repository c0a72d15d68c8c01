//! Playback of recorded traces.

use std::sync::Arc;

use tokio::sync::watch;

use crate::frame::Frame;

use super::controller::StepController;
use super::delays::StepDelays;
use super::trace::{Step, Trace};

/// What the renderer should show right now.
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Playback {
    /// No run has been played yet.
    #[default]
    Idle,
    /// A checkpoint of the current run.
    Step {
        /// Zero-based position within the run.
        index: usize,
        /// Number of checkpoints in the run.
        total: usize,
        /// The checkpoint.
        step: Arc<Step>,
    },
    /// The run finished; the frame shows the final structure.
    Settled(Arc<Frame>),
}

impl Playback {
    /// Returns the checkpoint, if one is showing.
    #[must_use]
    pub fn step(&self) -> Option<&Step> {
        match self {
            Self::Step { step, .. } => Some(step),
            _ => None,
        }
    }
}

/// Publishes recorded checkpoints one at a time.
///
/// Each checkpoint is written to a single-slot [`watch`] channel and then the
/// player suspends through its [`StepController`]. Subscribers always see the
/// latest checkpoint; a slow renderer skips intermediate ones rather than
/// queueing them.
#[derive(Debug)]
pub struct Player {
    controller: StepController,
    delays: StepDelays,
    sender: watch::Sender<Playback>,
}

impl Player {
    /// Creates a player.
    #[must_use]
    pub fn new(controller: StepController, delays: StepDelays) -> Self {
        let (sender, _) = watch::channel(Playback::Idle);
        Self {
            controller,
            delays,
            sender,
        }
    }

    /// Returns a receiver for playback updates.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Playback> {
        self.sender.subscribe()
    }

    /// Returns the controller used for suspensions.
    #[must_use]
    pub const fn controller(&self) -> &StepController {
        &self.controller
    }

    /// Returns the timed-mode delays.
    #[must_use]
    pub const fn delays(&self) -> &StepDelays {
        &self.delays
    }

    /// Plays every checkpoint of `trace`, then publishes the settled frame.
    ///
    /// Always runs to completion.
    pub async fn play(&self, trace: &Trace) {
        let total = trace.len();
        for (index, step) in trace.steps().iter().enumerate() {
            tracing::trace!(
                index,
                total,
                operation = %step.operation,
                "checkpoint"
            );
            self.sender.send_replace(Playback::Step {
                index,
                total,
                step: Arc::new(step.clone()),
            });
            self.controller
                .suspend(self.delays.for_operation(step.operation))
                .await;
        }
        if let Some(frame) = trace.settled() {
            self.sender
                .send_replace(Playback::Settled(Arc::new(frame.clone())));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::step::{Focus, Operation, StepMode};
    use rstest::rstest;
    use std::time::Duration;

    fn sample_trace() -> Trace {
        let mut trace = Trace::new();
        trace.record(Operation::Compare, [Focus::Slot(1), Focus::Slot(0)], || Frame::Empty);
        trace.record(Operation::Swap, [Focus::Slot(0)], || Frame::Empty);
        trace.settle(|| Frame::Empty);
        trace
    }

    #[rstest]
    #[tokio::test(start_paused = true)]
    async fn test_timed_playback_waits_per_operation() {
        let player = Player::new(StepController::new(StepMode::Timed), StepDelays::default());
        let start = tokio::time::Instant::now();
        player.play(&sample_trace()).await;
        assert_eq!(start.elapsed(), Duration::from_millis(300 + 500));
    }

    #[rstest]
    #[tokio::test(start_paused = true)]
    async fn test_playback_ends_settled() {
        let player = Player::new(StepController::new(StepMode::Timed), StepDelays::instant());
        let receiver = player.subscribe();
        player.play(&sample_trace()).await;
        assert_eq!(*receiver.borrow(), Playback::Settled(Arc::new(Frame::Empty)));
    }

    #[rstest]
    #[tokio::test]
    async fn test_manual_playback_advances_one_step_per_signal() {
        let controller = StepController::new(StepMode::Manual);
        let player = Player::new(controller.clone(), StepDelays::default());
        let mut receiver = player.subscribe();
        let trace = sample_trace();

        let driver = async {
            let mut seen = Vec::new();
            while seen.len() < 2 {
                while !controller.is_waiting() {
                    tokio::task::yield_now().await;
                }
                let index = match &*receiver.borrow_and_update() {
                    Playback::Step { index, .. } => *index,
                    other => panic!("unexpected playback state {other:?}"),
                };
                seen.push(index);
                assert!(controller.advance());
            }
            seen
        };

        let ((), seen) = tokio::join!(player.play(&trace), driver);
        assert_eq!(seen, vec![0, 1]);
    }
}
