//! swivel-pipeline: Tool-transition stage for parsed G-code paths (sans-IO).
//!
//! Takes the independent cutting paths produced by the G-code parser and
//! turns them into one executable sequence for a directional cutting head:
//!
//! path sequencing -> transition synthesis -> rotation synthesis
//!
//! Paths are reordered greedily by travel distance, preferring paths whose
//! start heading continues the tool's current heading. Each path is wrapped
//! with travel/plunge/retract moves, and when the heading changes too much
//! a rotation maneuver in the staging area is prepended.
//!
//! This crate has **no I/O dependencies** -- it operates on in-memory path
//! data and returns structured results. Parsing and rendering G-code text
//! live elsewhere.

pub mod angle;
pub mod diagnostics;
pub mod element;
pub mod rotation;
pub mod sequence;
pub mod transition;
pub mod types;

pub use diagnostics::SequenceDiagnostics;
pub use element::{ArcDirection, MoveKind, PathElement};
pub use types::{
    Path, PathFile, Point, TransitionConfig, TransitionError, TransitionResult, Truncation,
};

/// Reorder the paths of `file` and insert the tool-transition moves.
///
/// The returned [`TransitionResult`] holds a new [`PathFile`] whose paths
/// replace the input paths wholesale, together with diagnostics. If the
/// iteration guard trips, the output is missing paths and
/// [`TransitionResult::truncation`] says how many.
///
/// # Steps
///
/// 1. Validate the configuration and the input paths
/// 2. Pair every path with its reverse
/// 3. Greedily place paths, preferring heading continuity
/// 4. Wrap each placed path with travel, plunge and retract moves
/// 5. Prepend a rotation maneuver where the heading changes too much
///
/// # Errors
///
/// Returns [`TransitionError::InvalidConfig`] if `config` fails validation.
/// Returns [`TransitionError::EmptyPath`] if a path has no elements.
/// Returns [`TransitionError::NonFiniteCoordinate`] if a path contains NaN
/// or infinite coordinates.
pub fn add_tool_transitions(
    file: PathFile,
    config: &TransitionConfig,
) -> Result<TransitionResult, TransitionError> {
    config.validate()?;
    sequence::sequence_paths(file.paths, config)
}
