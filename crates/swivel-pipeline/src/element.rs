//! Path elements: straight moves and circular arcs.
//!
//! Every element exposes the same four accessors -- start point, end point,
//! start heading and end heading -- regardless of its geometric kind.
//! Headings are in radians and are **not** normalized; callers comparing
//! headings must handle wraparound themselves (see [`crate::angle`]).

use std::f64::consts::FRAC_PI_2;

use serde::{Deserialize, Serialize};

use crate::types::Point;

/// How a straight move is executed by the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveKind {
    /// Positioning move with the tool lifted (`G00`).
    Rapid,
    /// Feed move (`G01`): cuts, plunges and retracts.
    Linear,
}

/// Rotation direction of a circular arc.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArcDirection {
    /// `G02`.
    Clockwise,
    /// `G03`.
    CounterClockwise,
}

impl ArcDirection {
    /// The opposite rotation direction.
    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Self::Clockwise => Self::CounterClockwise,
            Self::CounterClockwise => Self::Clockwise,
        }
    }

    /// Offset from the outward radius angle to the direction of travel.
    const fn tangent_offset(self) -> f64 {
        match self {
            Self::Clockwise => -FRAC_PI_2,
            Self::CounterClockwise => FRAC_PI_2,
        }
    }
}

/// A single geometric element of a [`Path`](crate::Path).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PathElement {
    /// Straight move from `start` to `end`.
    Line {
        /// Rapid or feed move.
        kind: MoveKind,
        /// Start point.
        start: Point,
        /// End point.
        end: Point,
    },
    /// Circular arc from `start` to `end` around `center`.
    Arc {
        /// Rotation direction.
        direction: ArcDirection,
        /// Start point.
        start: Point,
        /// End point.
        end: Point,
        /// Arc center.
        center: Point,
    },
}

impl PathElement {
    /// Create a straight move.
    #[must_use]
    pub const fn line(kind: MoveKind, start: Point, end: Point) -> Self {
        Self::Line { kind, start, end }
    }

    /// Create a circular arc.
    #[must_use]
    pub const fn arc(direction: ArcDirection, start: Point, end: Point, center: Point) -> Self {
        Self::Arc {
            direction,
            start,
            end,
            center,
        }
    }

    /// Point where the element begins.
    #[must_use]
    pub const fn start(&self) -> Point {
        match *self {
            Self::Line { start, .. } | Self::Arc { start, .. } => start,
        }
    }

    /// Point where the element ends.
    #[must_use]
    pub const fn end(&self) -> Point {
        match *self {
            Self::Line { end, .. } | Self::Arc { end, .. } => end,
        }
    }

    /// Heading (radians) of travel leaving the start point.
    ///
    /// A zero-length line (plunge or retract) reports `0.0`.
    #[must_use]
    pub fn start_angle(&self) -> f64 {
        match *self {
            Self::Line { start, end, .. } => start.heading_to(end),
            Self::Arc {
                direction,
                start,
                center,
                ..
            } => center.heading_to(start) + direction.tangent_offset(),
        }
    }

    /// Heading (radians) of travel arriving at the end point.
    #[must_use]
    pub fn end_angle(&self) -> f64 {
        match *self {
            Self::Line { start, end, .. } => start.heading_to(end),
            Self::Arc {
                direction,
                end,
                center,
                ..
            } => center.heading_to(end) + direction.tangent_offset(),
        }
    }

    /// The same geometry traversed in the opposite direction.
    ///
    /// Headings of the reversed element point the opposite way.
    #[must_use]
    pub const fn reversed(&self) -> Self {
        match *self {
            Self::Line { kind, start, end } => Self::Line {
                kind,
                start: end,
                end: start,
            },
            Self::Arc {
                direction,
                start,
                end,
                center,
            } => Self::Arc {
                direction: direction.flipped(),
                start: end,
                end: start,
                center,
            },
        }
    }

    /// Returns `true` if every coordinate of the element is finite.
    #[must_use]
    pub const fn is_finite(&self) -> bool {
        match *self {
            Self::Line { start, end, .. } => start.is_finite() && end.is_finite(),
            Self::Arc {
                start, end, center, ..
            } => start.is_finite() && end.is_finite() && center.is_finite(),
        }
    }
}
