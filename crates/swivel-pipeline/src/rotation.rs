//! Rotation synthesis: re-orient a directional tool in the staging area.
//!
//! A tangential or drag knife cannot turn on the spot inside the work. When
//! the next cut starts with a heading too far from the current one, the tool
//! is taken to a staging circle off the workpiece, lowered, and swept along
//! a counter-clockwise arc so that it leaves the arc pointing (almost) the
//! way the next cut starts.
//!
//! The point on the staging circle for heading `θ` sits at polar angle
//! `θ - π/2` around the staging center: the counter-clockwise tangent there
//! points along `θ`.

use std::f64::consts::{FRAC_PI_2, PI};

use crate::element::{ArcDirection, MoveKind, PathElement};
use crate::types::{Point, TransitionConfig};

/// Number of elements produced by [`rotation_maneuver`].
pub const ROTATION_ELEMENTS: usize = 4;

/// Extra rotation applied to the target heading.
pub const TARGET_ANGLE_OFFSET: f64 = PI / 16.0;

/// Point on the staging circle whose counter-clockwise tangent is `heading`.
#[must_use]
pub fn staging_point(heading: f64, config: &TransitionConfig) -> Point {
    let center = config.tool_orientation_change_area;
    let radius = config.tool_rotation_radius;
    let polar = heading - FRAC_PI_2;
    Point::up(
        radius.mul_add(polar.cos(), center.x),
        radius.mul_add(polar.sin(), center.y),
    )
}

/// Build the maneuver that turns the tool from `last_angle` to
/// `target_angle`.
///
/// Returns `[travel, plunge, arc, retract]`: a rapid move from `from` to the
/// staging point for `last_angle`, a plunge there, a `G03` arc around the
/// staging center to the staging point for `target_angle + π/16`, and a
/// retract at the arc's end.
#[must_use]
pub fn rotation_maneuver(
    from: Point,
    last_angle: f64,
    target_angle: f64,
    config: &TransitionConfig,
) -> [PathElement; ROTATION_ELEMENTS] {
    let entry_up = staging_point(last_angle, config);
    let entry_down = entry_up.with_tool_down(true);
    let exit_up = staging_point(target_angle + TARGET_ANGLE_OFFSET, config);
    let exit_down = exit_up.with_tool_down(true);
    let center = config.tool_orientation_change_area.with_tool_down(true);

    [
        PathElement::line(MoveKind::Rapid, from.with_tool_down(false), entry_up),
        PathElement::line(MoveKind::Linear, entry_up, entry_down),
        PathElement::arc(ArcDirection::CounterClockwise, entry_down, exit_down, center),
        PathElement::line(MoveKind::Linear, exit_down, exit_up),
    ]
}
