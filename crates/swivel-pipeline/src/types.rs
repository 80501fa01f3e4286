//! Shared types for the swivel tool-transition stage.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::diagnostics::SequenceDiagnostics;
use crate::element::PathElement;

/// A planar point with the tool state at that point.
///
/// Travel distance only ever looks at `x` and `y`; the `tool_down` flag
/// never affects distances.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal position.
    pub x: f64,
    /// Vertical position.
    pub y: f64,
    /// Whether the tool is engaged with the work surface.
    pub tool_down: bool,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64, tool_down: bool) -> Self {
        Self { x, y, tool_down }
    }

    /// Create a point with the tool lifted.
    #[must_use]
    pub const fn up(x: f64, y: f64) -> Self {
        Self::new(x, y, false)
    }

    /// Create a point with the tool engaged.
    #[must_use]
    pub const fn down(x: f64, y: f64) -> Self {
        Self::new(x, y, true)
    }

    /// The same location with the given tool state.
    #[must_use]
    pub const fn with_tool_down(self, tool_down: bool) -> Self {
        Self { tool_down, ..self }
    }

    /// Squared Euclidean distance to another point in the XY plane.
    #[must_use]
    pub fn distance_squared(self, other: Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx.mul_add(dx, dy * dy)
    }

    /// Euclidean distance to another point in the XY plane.
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        self.distance_squared(other).sqrt()
    }

    /// Heading (radians) of the direction from `self` towards `other`.
    #[must_use]
    pub fn heading_to(self, other: Self) -> f64 {
        (other.y - self.y).atan2(other.x - self.x)
    }

    /// Returns `true` if both coordinates are finite.
    #[must_use]
    pub const fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// One continuous tool-down cut: an ordered sequence of elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Path {
    /// Elements in traversal order.
    pub elements: Vec<PathElement>,
}

impl Path {
    /// Create a new path from its elements.
    #[must_use]
    pub const fn new(elements: Vec<PathElement>) -> Self {
        Self { elements }
    }

    /// Returns `true` if the path has no elements.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Number of elements.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.elements.len()
    }

    /// First element, if any.
    #[must_use]
    pub fn first(&self) -> Option<&PathElement> {
        self.elements.first()
    }

    /// Last element, if any.
    #[must_use]
    pub fn last(&self) -> Option<&PathElement> {
        self.elements.last()
    }

    /// Start point of the first element.
    #[must_use]
    pub fn start_point(&self) -> Option<Point> {
        self.first().map(PathElement::start)
    }

    /// End point of the last element.
    #[must_use]
    pub fn end_point(&self) -> Option<Point> {
        self.last().map(PathElement::end)
    }

    /// Heading leaving the start of the path.
    #[must_use]
    pub fn start_angle(&self) -> Option<f64> {
        self.first().map(PathElement::start_angle)
    }

    /// The same cut traversed from its end back to its start.
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self::new(self.elements.iter().rev().map(PathElement::reversed).collect())
    }
}

/// Container for the paths of a parsed G-code file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PathFile {
    /// Paths in cutting order.
    pub paths: Vec<Path>,
}

impl PathFile {
    /// Create a new path file.
    #[must_use]
    pub const fn new(paths: Vec<Path>) -> Self {
        Self { paths }
    }
}

/// Configuration for the tool-transition stage.
///
/// The angular limit is stored in radians but accepted and serialized in
/// degrees (`angular_limit_degrees`).
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionConfig {
    angular_limit: f64,

    /// Center of the staging area where rotation maneuvers are performed.
    pub tool_orientation_change_area: Point,

    /// Radius of the staging circle.
    pub tool_rotation_radius: f64,

    /// Maximum number of placement iterations before the sequencer gives up
    /// and truncates its output.
    pub iteration_limit: usize,
}

impl TransitionConfig {
    /// Default angular limit in degrees (`π/8`).
    pub const DEFAULT_ANGULAR_LIMIT_DEGREES: f64 = 22.5;
    /// Default staging-area center X.
    pub const DEFAULT_STAGING_X: f64 = 5.0;
    /// Default staging-area center Y.
    pub const DEFAULT_STAGING_Y: f64 = 5.0;
    /// Default staging circle radius.
    pub const DEFAULT_TOOL_ROTATION_RADIUS: f64 = 5.0;
    /// Default iteration guard.
    pub const DEFAULT_ITERATION_LIMIT: usize = 300_000;

    /// Smallest effective angular limit (1°), applied even when a smaller
    /// limit is configured.
    pub const MIN_ANGULAR_LIMIT: f64 = PI / 180.0;

    /// Angular limit in radians.
    #[must_use]
    pub const fn angular_limit(&self) -> f64 {
        self.angular_limit
    }

    /// Angular limit in degrees.
    #[must_use]
    pub fn angular_limit_degrees(&self) -> f64 {
        self.angular_limit.to_degrees()
    }

    /// Set the angular limit from a value in degrees.
    pub fn set_angular_limit_degrees(&mut self, degrees: f64) {
        self.angular_limit = degrees.to_radians();
    }

    /// Builder-style variant of [`set_angular_limit_degrees`](Self::set_angular_limit_degrees).
    #[must_use]
    pub fn with_angular_limit_degrees(mut self, degrees: f64) -> Self {
        self.set_angular_limit_degrees(degrees);
        self
    }

    /// Builder-style setter for [`tool_orientation_change_area`](Self::tool_orientation_change_area).
    #[must_use]
    pub const fn with_tool_orientation_change_area(mut self, center: Point) -> Self {
        self.tool_orientation_change_area = center;
        self
    }

    /// Builder-style setter for [`tool_rotation_radius`](Self::tool_rotation_radius).
    #[must_use]
    pub const fn with_tool_rotation_radius(mut self, radius: f64) -> Self {
        self.tool_rotation_radius = radius;
        self
    }

    /// Builder-style setter for [`iteration_limit`](Self::iteration_limit).
    #[must_use]
    pub const fn with_iteration_limit(mut self, limit: usize) -> Self {
        self.iteration_limit = limit;
        self
    }

    /// Threshold actually used by the continuity search:
    /// `max(1°, angular_limit)`.
    #[must_use]
    pub fn continuity_threshold(&self) -> f64 {
        self.angular_limit.max(Self::MIN_ANGULAR_LIMIT)
    }

    /// Check the configuration for values the sequencer cannot work with.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError::InvalidConfig`] if the angular limit is
    /// negative or not finite, the staging center is not finite, the
    /// rotation radius is not a positive finite number, or the iteration
    /// limit is zero.
    pub fn validate(&self) -> Result<(), TransitionError> {
        if !self.angular_limit.is_finite() || self.angular_limit < 0.0 {
            return Err(TransitionError::InvalidConfig(format!(
                "angular limit must be a non-negative finite angle, got {}°",
                self.angular_limit_degrees(),
            )));
        }
        if !self.tool_orientation_change_area.is_finite() {
            return Err(TransitionError::InvalidConfig(
                "tool orientation change area must have finite coordinates".to_string(),
            ));
        }
        if !self.tool_rotation_radius.is_finite() || self.tool_rotation_radius <= 0.0 {
            return Err(TransitionError::InvalidConfig(format!(
                "tool rotation radius must be positive, got {}",
                self.tool_rotation_radius,
            )));
        }
        if self.iteration_limit == 0 {
            return Err(TransitionError::InvalidConfig(
                "iteration limit must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            angular_limit: Self::DEFAULT_ANGULAR_LIMIT_DEGREES.to_radians(),
            tool_orientation_change_area: Point::down(
                Self::DEFAULT_STAGING_X,
                Self::DEFAULT_STAGING_Y,
            ),
            tool_rotation_radius: Self::DEFAULT_TOOL_ROTATION_RADIUS,
            iteration_limit: Self::DEFAULT_ITERATION_LIMIT,
        }
    }
}

/// Serde-compatible proxy for `TransitionConfig`.
///
/// Exposes the angular limit in degrees. Missing fields fall back to the
/// defaults so partial JSON configs are accepted.
#[derive(Serialize, Deserialize)]
#[serde(default)]
struct TransitionConfigProxy {
    angular_limit_degrees: f64,
    tool_orientation_change_area: Point,
    tool_rotation_radius: f64,
    iteration_limit: usize,
}

impl Default for TransitionConfigProxy {
    fn default() -> Self {
        let config = TransitionConfig::default();
        Self {
            angular_limit_degrees: config.angular_limit_degrees(),
            tool_orientation_change_area: config.tool_orientation_change_area,
            tool_rotation_radius: config.tool_rotation_radius,
            iteration_limit: config.iteration_limit,
        }
    }
}

impl Serialize for TransitionConfig {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        TransitionConfigProxy {
            angular_limit_degrees: self.angular_limit_degrees(),
            tool_orientation_change_area: self.tool_orientation_change_area,
            tool_rotation_radius: self.tool_rotation_radius,
            iteration_limit: self.iteration_limit,
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for TransitionConfig {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let proxy = TransitionConfigProxy::deserialize(deserializer)?;
        Ok(Self {
            angular_limit: proxy.angular_limit_degrees.to_radians(),
            tool_orientation_change_area: proxy.tool_orientation_change_area,
            tool_rotation_radius: proxy.tool_rotation_radius,
            iteration_limit: proxy.iteration_limit,
        })
    }
}

/// Record of a run that hit the iteration guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Truncation {
    /// Iteration at which the guard tripped.
    pub iterations: usize,
    /// Number of input paths missing from the output, including the one
    /// that was being placed when the guard tripped.
    pub dropped_paths: usize,
}

/// Result of running the tool-transition stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionResult {
    /// The path file with its paths reordered and enriched.
    pub file: PathFile,

    /// Counters collected while sequencing.
    pub diagnostics: SequenceDiagnostics,

    /// `Some` when the iteration guard tripped and paths were dropped.
    pub truncation: Option<Truncation>,
}

impl TransitionResult {
    /// Returns `true` if the output is missing paths because the iteration
    /// guard tripped.
    #[must_use]
    pub const fn is_truncated(&self) -> bool {
        self.truncation.is_some()
    }
}

/// Errors that can occur while adding tool transitions.
#[derive(Debug, thiserror::Error)]
pub enum TransitionError {
    /// An input path had no elements.
    #[error("path {index} has no elements")]
    EmptyPath {
        /// Position of the path in the input file.
        index: usize,
    },

    /// An input path contained a NaN or infinite coordinate.
    #[error("path {index} contains a non-finite coordinate")]
    NonFiniteCoordinate {
        /// Position of the path in the input file.
        index: usize,
    },

    /// Stage configuration is invalid.
    #[error("invalid transition configuration: {0}")]
    InvalidConfig(String),
}
