//! Checkpoint recording.

use crate::Key;
use crate::frame::Frame;

use super::operation::{Foci, Focus, Operation};

/// One recorded checkpoint.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Step {
    /// What happens at this checkpoint.
    pub operation: Operation,
    /// The highlighted elements.
    pub focus: Foci,
    /// The output token emitted at this checkpoint, if any.
    pub emitted: Option<Key>,
    /// The structure as it looked when the checkpoint was recorded.
    pub frame: Option<Frame>,
}

impl Step {
    /// Returns the first highlighted element.
    #[must_use]
    pub fn primary_focus(&self) -> Option<Focus> {
        self.focus.first().copied()
    }
}

/// An ordered log of checkpoints produced by one engine operation.
///
/// Engines call [`Trace::record`] at every comparison, swap, rotation,
/// recolor or visit. Frames are produced lazily: a headless trace never
/// calls the frame closure.
///
/// # Examples
///
/// ```rust
/// use treeviz::frame::Frame;
/// use treeviz::step::{Focus, Operation, Trace};
///
/// let mut trace = Trace::new();
/// trace.visit(Operation::Visit, [Focus::Slot(0)], 7, || Frame::Empty);
///
/// assert_eq!(trace.len(), 1);
/// assert_eq!(trace.output(), &[7]);
/// assert_eq!(trace.steps()[0].frame, Some(Frame::Empty));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Trace {
    steps: Vec<Step>,
    output: Vec<Key>,
    settled: Option<Frame>,
    capture: bool,
}

impl Trace {
    /// Creates a trace that captures a frame per checkpoint.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            steps: Vec::new(),
            output: Vec::new(),
            settled: None,
            capture: true,
        }
    }

    /// Creates a trace that records checkpoints without frames.
    #[must_use]
    pub const fn headless() -> Self {
        Self {
            steps: Vec::new(),
            output: Vec::new(),
            settled: None,
            capture: false,
        }
    }

    /// Records a checkpoint.
    pub fn record<I, F>(&mut self, operation: Operation, focus: I, frame: F)
    where
        I: IntoIterator<Item = Focus>,
        F: FnOnce() -> Frame,
    {
        self.push(operation, focus, None, frame);
    }

    /// Records a checkpoint that emits an output token.
    pub fn visit<I, F>(&mut self, operation: Operation, focus: I, key: Key, frame: F)
    where
        I: IntoIterator<Item = Focus>,
        F: FnOnce() -> Frame,
    {
        self.output.push(key);
        self.push(operation, focus, Some(key), frame);
    }

    /// Stores the frame shown once playback has finished.
    pub fn settle<F>(&mut self, frame: F)
    where
        F: FnOnce() -> Frame,
    {
        if self.capture {
            self.settled = Some(frame());
        }
    }

    /// Returns the recorded checkpoints.
    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Returns the emitted output tokens.
    #[must_use]
    pub fn output(&self) -> &[Key] {
        &self.output
    }

    /// Returns the final frame, if one was settled.
    #[must_use]
    pub const fn settled(&self) -> Option<&Frame> {
        self.settled.as_ref()
    }

    /// Returns the number of checkpoints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns `true` if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Iterates over the operations in recording order.
    pub fn operations(&self) -> impl Iterator<Item = Operation> + '_ {
        self.steps.iter().map(|step| step.operation)
    }

    /// Splits the trace into its steps, output and settled frame.
    #[must_use]
    pub fn into_parts(self) -> (Vec<Step>, Vec<Key>, Option<Frame>) {
        (self.steps, self.output, self.settled)
    }

    fn push<I, F>(&mut self, operation: Operation, focus: I, emitted: Option<Key>, frame: F)
    where
        I: IntoIterator<Item = Focus>,
        F: FnOnce() -> Frame,
    {
        let frame = self.capture.then(frame);
        self.steps.push(Step {
            operation,
            focus: focus.into_iter().collect(),
            emitted,
            frame,
        });
    }
}

impl Default for Trace {
    fn default() -> Self {
        Self::new()
    }
}
