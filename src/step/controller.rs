//! The suspension primitive.
//!
//! A [`StepController`] decides how a checkpoint is resolved. In
//! [`StepMode::Timed`] a suspension sleeps for the hinted duration. In
//! [`StepMode::Manual`] it parks on a single-slot channel until
//! [`StepController::advance`] fires. The mode can change at any time;
//! switching to timed while a manual suspension is pending releases it.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use static_assertions::assert_impl_all;
use tokio::sync::oneshot;

/// How suspensions are resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StepMode {
    /// Resolve after the hinted delay.
    #[default]
    Timed,
    /// Resolve on an explicit advance signal.
    Manual,
}

#[derive(Debug, Default)]
struct State {
    mode: StepMode,
    pending: Option<oneshot::Sender<()>>,
}

/// Shared handle to the global step mode and the pending suspension.
///
/// Cloning yields another handle to the same controller.
///
/// # Examples
///
/// ```rust
/// use std::time::Duration;
/// use treeviz::step::{StepController, StepMode};
///
/// # tokio::runtime::Builder::new_current_thread().enable_time().build().unwrap().block_on(async {
/// let controller = StepController::new(StepMode::Timed);
/// controller.suspend(Duration::from_millis(1)).await;
///
/// // Nothing is pending, so the signal is dropped.
/// assert!(!controller.advance());
/// # });
/// ```
#[derive(Clone, Debug, Default)]
pub struct StepController {
    state: Arc<Mutex<State>>,
}

assert_impl_all!(StepController: Send, Sync, Clone);

impl StepController {
    /// Creates a controller in the given mode.
    #[must_use]
    pub fn new(mode: StepMode) -> Self {
        Self {
            state: Arc::new(Mutex::new(State {
                mode,
                pending: None,
            })),
        }
    }

    /// Returns the current mode.
    #[must_use]
    pub fn mode(&self) -> StepMode {
        self.state.lock().mode
    }

    /// Changes the mode.
    ///
    /// Leaving manual mode releases a pending suspension.
    pub fn set_mode(&self, mode: StepMode) {
        let released = {
            let mut state = self.state.lock();
            state.mode = mode;
            match mode {
                StepMode::Timed => state.pending.take(),
                StepMode::Manual => None,
            }
        };
        if let Some(sender) = released {
            tracing::debug!("switched to timed mode, releasing pending step");
            let _ = sender.send(());
        }
    }

    /// Releases the pending manual suspension.
    ///
    /// Returns `false` when nothing is pending; the signal is then dropped,
    /// not queued for the next suspension.
    pub fn advance(&self) -> bool {
        let pending = self.state.lock().pending.take();
        pending.is_some_and(|sender| sender.send(()).is_ok())
    }

    /// Returns `true` while a manual suspension waits for [`advance`](Self::advance).
    #[must_use]
    pub fn is_waiting(&self) -> bool {
        self.state
            .lock()
            .pending
            .as_ref()
            .is_some_and(|sender| !sender.is_closed())
    }

    /// Suspends the caller at a checkpoint.
    ///
    /// `hint` is the timed-mode delay and is ignored in manual mode.
    pub async fn suspend(&self, hint: Duration) {
        let receiver = {
            let mut state = self.state.lock();
            match state.mode {
                StepMode::Timed => None,
                StepMode::Manual => {
                    let (sender, receiver) = oneshot::channel();
                    state.pending = Some(sender);
                    Some(receiver)
                }
            }
        };

        match receiver {
            None => tokio::time::sleep(hint).await,
            // A dropped sender counts as a release too.
            Some(receiver) => {
                let _ = receiver.await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    async fn wait_until_parked(controller: &StepController) {
        while !controller.is_waiting() {
            tokio::task::yield_now().await;
        }
    }

    #[rstest]
    fn test_default_mode_is_timed() {
        assert_eq!(StepController::default().mode(), StepMode::Timed);
    }

    #[rstest]
    fn test_advance_without_pending_is_dropped() {
        let controller = StepController::new(StepMode::Manual);
        assert!(!controller.advance());
        assert!(!controller.is_waiting());
    }

    #[rstest]
    #[tokio::test(start_paused = true)]
    async fn test_timed_suspend_sleeps_for_hint() {
        let controller = StepController::new(StepMode::Timed);
        let start = tokio::time::Instant::now();
        controller.suspend(Duration::from_millis(800)).await;
        assert_eq!(start.elapsed(), Duration::from_millis(800));
    }

    #[rstest]
    #[tokio::test]
    async fn test_manual_suspend_waits_for_advance() {
        let controller = StepController::new(StepMode::Manual);
        let waiter = controller.clone();
        let handle = tokio::spawn(async move { waiter.suspend(Duration::from_secs(3600)).await });

        wait_until_parked(&controller).await;
        assert!(!handle.is_finished());
        assert!(controller.advance());
        handle.await.unwrap();
        assert!(!controller.is_waiting());
    }

    #[rstest]
    #[tokio::test]
    async fn test_switching_to_timed_releases_pending() {
        let controller = StepController::new(StepMode::Manual);
        let waiter = controller.clone();
        let handle = tokio::spawn(async move { waiter.suspend(Duration::from_secs(3600)).await });

        wait_until_parked(&controller).await;
        controller.set_mode(StepMode::Timed);
        handle.await.unwrap();
        assert_eq!(controller.mode(), StepMode::Timed);
    }
}
