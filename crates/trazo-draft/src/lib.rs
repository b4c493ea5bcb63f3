#![warn(missing_docs)]

//! Polyline drafting for the trazo kernel.
//!
//! Owns the ordered list of committed draft points: appending under
//! validity rules, undo, closed-loop detection, and length/area
//! measurement. The numeric-override input fields that can replace a
//! snapped coordinate live here too.
//!
//! The engine is deliberately ignorant of snapping: it receives fully
//! resolved target positions and either accepts or rejects them. A
//! rejection is a normal outcome of cursor motion, not a fault.

mod fields;
mod polyline;

pub use fields::{FieldSet, InputField};
pub use polyline::{CommitOutcome, DraftPoint, DraftState, MeasureKind, Polyline};

use thiserror::Error;

/// Errors from explicit drafting operations.
///
/// Commit rejections are not errors (see [`CommitOutcome`]); these
/// arise only from operations that make no sense in the current
/// state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    /// The polyline has no points to finalize or export.
    #[error("polyline is empty")]
    EmptyPolyline,
}
