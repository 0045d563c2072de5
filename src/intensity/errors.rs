use thiserror::Error;

use crate::{Intensity, Position};

/// Errors reported by [`IntensityStore`](super::IntensityStore) operations.
///
/// Every variant is raised before the breakpoint map is touched, so a rejected
/// call never leaves partial state behind.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IntensityError {
    /// An operand could not be read as an integer.
    #[error("'{field}' must be an integer, got {input:?}")]
    InvalidType { field: &'static str, input: String },

    /// The half-open range `[from, to)` is empty or inverted.
    #[error("'from' must be less than 'to' (from = {from}, to = {to})")]
    InvalidRange { from: Position, to: Position },

    /// Adding the amount would push an intensity outside the integer range.
    #[error("intensity at position {position} overflows when adding {amount}")]
    Overflow {
        position: Position,
        amount: Intensity,
    },

    /// A loaded breakpoint map ends on a non-zero value, so the function
    /// never returns to 0 and has no right edge.
    #[error("breakpoint map must end on a zero edge, found {value} at position {position}")]
    MissingEdge {
        position: Position,
        value: Intensity,
    },
}
