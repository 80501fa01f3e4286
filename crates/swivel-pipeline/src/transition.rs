//! Transition synthesis: approach, plunge and retract moves around a cut.
//!
//! A raw cutting path only describes the tool-down geometry. To make it
//! executable the tool has to travel (lifted) to the start of the cut,
//! plunge, follow the cut and lift again at the end.

use crate::element::{MoveKind, PathElement};
use crate::types::{Path, Point};

/// Number of elements added by [`wrap_with_transitions`].
pub const TRANSITION_ELEMENTS: usize = 3;

/// Wrap a cutting path with the moves needed to execute it.
///
/// The path's elements become
/// `[travel(from -> start), plunge(start), <cut>, retract(end)]`.
/// The travel is a rapid move with the tool lifted; plunge and retract are
/// zero-length feed moves that only change the tool state.
///
/// Empty paths are left untouched.
pub fn wrap_with_transitions(path: &mut Path, from: Point) {
    let (Some(start), Some(end)) = (path.start_point(), path.end_point()) else {
        return;
    };

    let start_up = start.with_tool_down(false);
    let start_down = start.with_tool_down(true);
    let end_up = end.with_tool_down(false);
    let end_down = end.with_tool_down(true);

    let mut elements = Vec::with_capacity(path.len() + TRANSITION_ELEMENTS);
    elements.push(PathElement::line(
        MoveKind::Rapid,
        from.with_tool_down(false),
        start_up,
    ));
    elements.push(PathElement::line(MoveKind::Linear, start_up, start_down));
    elements.append(&mut path.elements);
    elements.push(PathElement::line(MoveKind::Linear, end_down, end_up));

    path.elements = elements;
}
