//! Error types.
//!
//! Failures are local and recoverable: every operation checks its
//! preconditions before the first mutation, so an `Err` always means the
//! structure is exactly as it was before the call.
//!
//! - [`StructureError`]: rejected engine operations
//! - [`VisualizerError`]: session-level failures
//! - [`InvariantViolation`]: reported by the `validate` methods
//! - [`ConfigError`]: configuration parsing failures

use thiserror::Error;

use crate::Key;
use crate::kind::StructureKind;

// =============================================================================
// StructureError
// =============================================================================

/// Represents a rejected operation on a structure.
///
/// # Examples
///
/// ```rust
/// use treeviz::error::StructureError;
///
/// let error = StructureError::KeyNotFound { key: 42 };
/// assert_eq!(error.to_string(), "key 42 was not found");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructureError {
    /// The key is already present; duplicates are never inserted.
    #[error("key {key} is already present")]
    DuplicateKey {
        /// The rejected key.
        key: Key,
    },

    /// A search or delete missed.
    #[error("key {key} was not found")]
    KeyNotFound {
        /// The missing key.
        key: Key,
    },

    /// The operation needs at least one element.
    #[error("cannot {operation} an empty structure")]
    EmptyStructure {
        /// The attempted operation.
        operation: &'static str,
    },

    /// The selected structure kind does not implement the operation.
    #[error("{operation} is not supported for {kind}")]
    Unsupported {
        /// The attempted operation.
        operation: &'static str,
        /// The structure kind that rejected it.
        kind: StructureKind,
    },
}

impl StructureError {
    /// Creates an [`StructureError::EmptyStructure`] error.
    #[must_use]
    pub const fn empty(operation: &'static str) -> Self {
        Self::EmptyStructure { operation }
    }

    /// Creates an [`StructureError::Unsupported`] error.
    #[must_use]
    pub const fn unsupported(operation: &'static str, kind: StructureKind) -> Self {
        Self::Unsupported { operation, kind }
    }

    /// Returns `true` when the failure should not be surfaced to the user.
    ///
    /// Duplicate inserts are silently ignored.
    #[must_use]
    pub const fn is_silent(&self) -> bool {
        matches!(self, Self::DuplicateKey { .. })
    }
}

// =============================================================================
// VisualizerError
// =============================================================================

/// Represents a failure of a [`Visualizer`](crate::session::Visualizer) call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VisualizerError {
    /// The engine rejected the operation.
    #[error(transparent)]
    Structure(#[from] StructureError),

    /// Another run still owns the structure.
    #[error("another run is still in progress")]
    RunInProgress,
}

// =============================================================================
// InvariantViolation
// =============================================================================

/// Describes the first broken invariant found by a `validate` method.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    /// A key is not strictly between its in-order neighbours.
    #[error("key {key} breaks the search-tree ordering")]
    OutOfOrder {
        /// The misplaced key.
        key: Key,
    },

    /// A child's parent handle does not point back at its parent.
    #[error("node {key} has a stale parent handle")]
    BrokenParentLink {
        /// The child's key.
        key: Key,
    },

    /// An AVL node's subtree heights differ by more than one.
    #[error("node {key} has balance factor {balance}")]
    Unbalanced {
        /// The unbalanced node's key.
        key: Key,
        /// `height(left) - height(right)`.
        balance: isize,
    },

    /// The root of a red-black tree is red.
    #[error("the root is red")]
    RedRoot,

    /// A red node has a red child.
    #[error("red node {key} has a red child")]
    DoubleRed {
        /// The red parent's key.
        key: Key,
    },

    /// Two paths below a node see a different number of black nodes.
    #[error("black height differs below node {key}")]
    BlackHeightMismatch {
        /// The node whose subtrees disagree.
        key: Key,
    },

    /// A left-leaning red-black node has a red right child.
    #[error("node {key} leans right")]
    RightLeaningRed {
        /// The parent of the red right child.
        key: Key,
    },

    /// A heap child precedes its parent under the heap mode.
    #[error("heap order is broken at index {index}")]
    HeapOrder {
        /// The index of the offending child.
        index: usize,
    },
}

// =============================================================================
// ConfigError
// =============================================================================

/// Represents a configuration value that could not be used.
///
/// # Examples
///
/// ```rust
/// use treeviz::error::ConfigError;
///
/// let error = ConfigError::invalid_value("TREEVIZ_SPEED", "must be positive");
/// assert_eq!(error.to_string(), "Invalid value for TREEVIZ_SPEED: must be positive");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A value was present but could not be parsed or is out of range.
    #[error("Invalid value for {key}: {message}")]
    InvalidValue {
        /// The setting name.
        key: String,
        /// Description of why the value is invalid.
        message: String,
    },
}

impl ConfigError {
    /// Creates an [`ConfigError::InvalidValue`] error.
    #[must_use]
    pub fn invalid_value(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_structure_error_display() {
        assert_eq!(
            StructureError::DuplicateKey { key: 7 }.to_string(),
            "key 7 is already present"
        );
        assert_eq!(
            StructureError::empty("search").to_string(),
            "cannot search an empty structure"
        );
        assert_eq!(
            StructureError::unsupported("delete", StructureKind::RedBlack).to_string(),
            "delete is not supported for RBT"
        );
    }

    #[rstest]
    fn test_only_duplicates_are_silent() {
        assert!(StructureError::DuplicateKey { key: 1 }.is_silent());
        assert!(!StructureError::KeyNotFound { key: 1 }.is_silent());
        assert!(!StructureError::empty("extract").is_silent());
    }

    #[rstest]
    fn test_visualizer_error_is_transparent() {
        let error = VisualizerError::from(StructureError::KeyNotFound { key: 3 });
        assert_eq!(error.to_string(), "key 3 was not found");
        assert_eq!(
            VisualizerError::RunInProgress.to_string(),
            "another run is still in progress"
        );
    }

    #[rstest]
    fn test_invariant_violation_display() {
        let violation = InvariantViolation::Unbalanced { key: 10, balance: -2 };
        assert_eq!(violation.to_string(), "node 10 has balance factor -2");
    }

    #[rstest]
    fn test_error_trait_objects() {
        let _: &dyn std::error::Error = &StructureError::KeyNotFound { key: 0 };
        let _: &dyn std::error::Error = &ConfigError::invalid_value("key", "message");
    }
}
