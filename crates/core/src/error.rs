//! Error taxonomy: fatal configuration errors caught at build time,
//! "never happens" invariant violations, and tick failures.
//!
//! Presence relocation to an absent neighbor is not an error at all; the
//! call reports whether it moved and nothing else.

use std::error::Error;
use std::fmt;

use crate::cell::CellState;
use crate::grid::Direction;

/// Fatal configuration problems, raised at build/registration time and
/// never mid-tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Grid dimensions must both be positive.
    ZeroDimension {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },
    /// A reachable state has no registered rule.
    MissingRule {
        /// The uncovered state.
        state: CellState,
    },
    /// A tuning parameter is outside its valid range.
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// What was wrong with it.
        reason: String,
    },
    /// A coordinate lies outside the grid.
    CoordOutOfBounds {
        /// Requested row.
        row: u32,
        /// Requested column.
        col: u32,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroDimension { width, height } => {
                write!(f, "grid dimensions must be positive, got {width}x{height}")
            }
            Self::MissingRule { state } => {
                write!(f, "no rule registered for state {state:?}")
            }
            Self::InvalidParameter { name, reason } => {
                write!(f, "invalid parameter '{name}': {reason}")
            }
            Self::CoordOutOfBounds { row, col } => {
                write!(f, "coordinate ({row}, {col}) is outside the grid")
            }
        }
    }
}

impl Error for ConfigError {}

/// Structural guarantees that hold by construction. A violation means the
/// engine or grid has a bug; the current tick is abandoned without
/// committing anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    /// A cardinal link is not mirrored by the cell it points at.
    AdjacencyAsymmetry {
        /// Flat index of the offending cell.
        index: u32,
        /// The unmirrored link direction.
        direction: Direction,
    },
    /// A diagonal derivation disagrees between its two cardinal paths
    /// (north-then-east versus east-then-north, and so on).
    DiagonalMismatch {
        /// Flat index of the offending cell.
        index: u32,
        /// The inconsistent diagonal.
        direction: Direction,
    },
    /// Evaluation reached a cell that was never given a value.
    UnsetCell {
        /// Flat index of the uninitialized cell.
        index: u32,
    },
    /// Evaluation reached a state with no rule despite table validation.
    UnruledState {
        /// The uncovered state.
        state: CellState,
    },
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AdjacencyAsymmetry { index, direction } => {
                write!(
                    f,
                    "cell {index}: {direction:?} link is not mirrored by its neighbor"
                )
            }
            Self::DiagonalMismatch { index, direction } => {
                write!(
                    f,
                    "cell {index}: {direction:?} derivation disagrees between cardinal paths"
                )
            }
            Self::UnsetCell { index } => {
                write!(f, "cell {index} has no value; the grid was never initialized")
            }
            Self::UnruledState { state } => {
                write!(f, "state {state:?} reached evaluation without a rule")
            }
        }
    }
}

impl Error for InvariantViolation {}

/// Failure of a single tick. The grid is left at the last fully committed
/// tick; there is no retry and no partial commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepError {
    /// An invariant was violated mid-tick.
    Invariant(InvariantViolation),
}

impl fmt::Display for StepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Invariant(violation) => write!(f, "tick aborted: {violation}"),
        }
    }
}

impl Error for StepError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Invariant(violation) => Some(violation),
        }
    }
}

impl From<InvariantViolation> for StepError {
    fn from(violation: InvariantViolation) -> Self {
        Self::Invariant(violation)
    }
}
