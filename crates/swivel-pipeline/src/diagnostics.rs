//! Sequencing diagnostics: counts and distances collected during a run.
//!
//! Every call to [`add_tool_transitions`](crate::add_tool_transitions)
//! fills a [`SequenceDiagnostics`] alongside the transformed path file.
//! They are intended for tuning the angular limit and staging-area
//! parameters against real jobs.

use serde::{Deserialize, Serialize};

use crate::element::{MoveKind, PathElement};
use crate::types::Path;

/// Diagnostics collected from a single sequencing run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SequenceDiagnostics {
    /// Number of paths in the input file.
    pub input_paths: usize,
    /// Number of paths in the output file.
    pub output_paths: usize,
    /// Placement iterations performed.
    pub iterations: usize,
    /// Paths that needed a rotation maneuver in the staging area.
    pub rotation_count: usize,
    /// Paths placed by the continuity search (no rotation needed).
    pub continuity_matches: usize,
    /// Paths placed in reverse direction.
    pub reversed_paths: usize,
    /// Total length of rapid (tool-up) travel moves.
    pub travel_distance: f64,
    /// Cutting elements across the input paths.
    pub cut_elements: usize,
    /// Elements across the output paths, synthesized moves included.
    pub emitted_elements: usize,
}

impl SequenceDiagnostics {
    /// Fraction of placed paths that avoided a rotation maneuver.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn continuity_ratio(&self) -> f64 {
        let placed = self.rotation_count + self.continuity_matches;
        if placed == 0 {
            0.0
        } else {
            self.continuity_matches as f64 / placed as f64
        }
    }

    /// Format diagnostics as a human-readable report.
    #[must_use]
    pub fn report(&self) -> String {
        let mut lines = Vec::new();

        lines.push(format!("Sequencing Diagnostics Report\n{}", "=".repeat(60)));
        lines.push(format!(
            "Paths: {} in -> {} out ({} iterations)",
            self.input_paths, self.output_paths, self.iterations,
        ));
        lines.push(String::new());

        lines.push(format!("{:<24} {:>12}", "Metric", "Value"));
        lines.push("-".repeat(40));
        lines.push(format!("{:<24} {:>12}", "Rotation maneuvers", self.rotation_count));
        lines.push(format!(
            "{:<24} {:>12}",
            "Continuity matches", self.continuity_matches,
        ));
        lines.push(format!(
            "{:<24} {:>11.1}%",
            "Continuity ratio",
            self.continuity_ratio() * 100.0,
        ));
        lines.push(format!("{:<24} {:>12}", "Reversed paths", self.reversed_paths));
        lines.push(format!(
            "{:<24} {:>12.3}",
            "Travel distance", self.travel_distance,
        ));
        lines.push(format!(
            "{:<24} {:>12}",
            "Elements",
            format!("{}->{}", self.cut_elements, self.emitted_elements),
        ));

        lines.join("\n")
    }
}

/// Total length of the rapid moves in a set of paths.
pub(crate) fn travel_distance(paths: &[Path]) -> f64 {
    paths
        .iter()
        .flat_map(|path| &path.elements)
        .filter_map(|element| match *element {
            PathElement::Line {
                kind: MoveKind::Rapid,
                start,
                end,
            } => Some(start.distance(end)),
            _ => None,
        })
        .sum()
}

/// Total elements across a set of paths.
pub(crate) fn total_elements(paths: &[Path]) -> usize {
    paths.iter().map(Path::len).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Point;

    #[test]
    fn travel_distance_counts_only_rapids() {
        let paths = vec![Path::new(vec![
            PathElement::line(MoveKind::Rapid, Point::up(0.0, 0.0), Point::up(3.0, 4.0)),
            PathElement::line(MoveKind::Linear, Point::up(3.0, 4.0), Point::down(3.0, 4.0)),
            PathElement::line(MoveKind::Linear, Point::down(3.0, 4.0), Point::down(13.0, 4.0)),
        ])];
        assert!((travel_distance(&paths) - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn total_elements_sums_paths() {
        let element =
            PathElement::line(MoveKind::Linear, Point::down(0.0, 0.0), Point::down(1.0, 0.0));
        let paths = vec![Path::new(vec![element; 3]), Path::new(vec![element; 2])];
        assert_eq!(total_elements(&paths), 5);
    }

    #[test]
    fn continuity_ratio_handles_empty_run() {
        let diag = SequenceDiagnostics::default();
        assert!(diag.continuity_ratio().abs() < f64::EPSILON);
    }

    #[test]
    fn continuity_ratio_computes() {
        let diag = SequenceDiagnostics {
            rotation_count: 1,
            continuity_matches: 3,
            ..SequenceDiagnostics::default()
        };
        assert!((diag.continuity_ratio() - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn report_produces_nonempty_string() {
        let diag = SequenceDiagnostics {
            input_paths: 4,
            output_paths: 4,
            iterations: 4,
            rotation_count: 2,
            continuity_matches: 2,
            reversed_paths: 1,
            travel_distance: 42.5,
            cut_elements: 10,
            emitted_elements: 34,
        };
        let report = diag.report();
        assert!(report.contains("Sequencing Diagnostics Report"));
        assert!(report.contains("Rotation maneuvers"));
        assert!(report.contains("10->34"));
        assert!(report.contains("50.0%"));
    }
}
