//! Path sequencing: choose the cutting order and direction of every path.
//!
//! Greedy nearest-neighbor heuristic with an angular-continuity preference.
//! Each input path may be cut in either direction, so the working set holds
//! every path together with its reverse twin. On every iteration the
//! working set is re-sorted by distance from the tool's position and:
//!
//! 1. the nearest candidate whose start heading is within the continuity
//!    threshold of the tool's current heading is taken as-is, or
//! 2. failing that, the nearest candidate overall is taken and the tool is
//!    re-oriented in the staging area first (see [`crate::rotation`]).
//!
//! The chosen candidate and its twin leave the working set together, so
//! exactly one direction of every path is emitted.

use tracing::{debug, trace, warn};

use crate::angle::{continuity_distance, opposite};
use crate::diagnostics::{self, SequenceDiagnostics};
use crate::rotation::rotation_maneuver;
use crate::transition::wrap_with_transitions;
use crate::types::{
    Path, PathFile, Point, TransitionConfig, TransitionError, TransitionResult, Truncation,
};

/// Index of a candidate in [`Candidates`].
type CandidateId = usize;

/// One direction of one input path, with the geometry the sequencer
/// queries on every iteration cached up front.
#[derive(Debug)]
struct Candidate {
    path: Path,
    start: Point,
    end: Point,
    start_angle: f64,
}

impl Candidate {
    /// Returns `None` for an empty path.
    fn new(path: Path) -> Option<Self> {
        let start = path.start_point()?;
        let end = path.end_point()?;
        let start_angle = path.start_angle()?;
        Some(Self {
            path,
            start,
            end,
            start_angle,
        })
    }
}

/// Arena of all candidates plus the reverse-twin index.
///
/// Ids `0..n` are the input paths in input order, ids `n..2n` their
/// reverses. The twin relation is stored explicitly and is symmetric.
#[derive(Debug)]
struct Candidates {
    entries: Vec<Candidate>,
    twins: Vec<CandidateId>,
    original_count: usize,
}

impl Candidates {
    /// Build the arena, rejecting empty paths and non-finite geometry.
    fn new(paths: Vec<Path>) -> Result<Self, TransitionError> {
        let original_count = paths.len();
        let mut forward = Vec::with_capacity(original_count);
        let mut reverse = Vec::with_capacity(original_count);

        for (index, path) in paths.into_iter().enumerate() {
            if !path.elements.iter().all(|element| element.is_finite()) {
                return Err(TransitionError::NonFiniteCoordinate { index });
            }
            let reversed = path.reversed();
            let (Some(f), Some(r)) = (Candidate::new(path), Candidate::new(reversed)) else {
                return Err(TransitionError::EmptyPath { index });
            };
            forward.push(f);
            reverse.push(r);
        }

        let mut entries = forward;
        entries.append(&mut reverse);

        let twins = (0..entries.len())
            .map(|id| {
                if id < original_count {
                    id + original_count
                } else {
                    id - original_count
                }
            })
            .collect();

        Ok(Self {
            entries,
            twins,
            original_count,
        })
    }

    fn twin(&self, id: CandidateId) -> CandidateId {
        self.twins[id]
    }

    const fn is_reverse(&self, id: CandidateId) -> bool {
        id >= self.original_count
    }
}

/// Mutable state of one sequencing run.
struct Sequencer<'a> {
    config: &'a TransitionConfig,
    candidates: Candidates,
    working: Vec<CandidateId>,
    last_position: Point,
    last_angle: Option<f64>,
    iterations: usize,
    output: Vec<Path>,
    diagnostics: SequenceDiagnostics,
}

impl<'a> Sequencer<'a> {
    fn new(candidates: Candidates, config: &'a TransitionConfig) -> Self {
        let working = (0..candidates.entries.len()).collect();
        let diagnostics = SequenceDiagnostics {
            input_paths: candidates.original_count,
            cut_elements: candidates.entries[..candidates.original_count]
                .iter()
                .map(|c| c.path.len())
                .sum(),
            ..SequenceDiagnostics::default()
        };
        Self {
            config,
            output: Vec::with_capacity(candidates.original_count),
            candidates,
            working,
            last_position: Point::up(0.0, 0.0),
            last_angle: None,
            iterations: 0,
            diagnostics,
        }
    }

    /// Sort the working set by distance from the tool, nearest first.
    ///
    /// The sort is stable: equally distant candidates keep their previous
    /// relative order.
    fn sort_working_set(&mut self) {
        let entries = &self.candidates.entries;
        let origin = self.last_position;
        self.working.sort_by(|&a, &b| {
            entries[a]
                .start
                .distance(origin)
                .total_cmp(&entries[b].start.distance(origin))
        });
    }

    /// Position in the sorted working set of the nearest candidate that can
    /// be cut without re-orienting the tool.
    fn continuity_match(&self) -> Option<usize> {
        let last_angle = self.last_angle?;
        let threshold = self.config.continuity_threshold();
        self.working.iter().position(|&id| {
            continuity_distance(self.candidates.entries[id].start_angle, last_angle) < threshold
        })
    }

    /// Place paths until the working set is empty or the iteration guard
    /// trips.
    fn run(mut self) -> TransitionResult {
        let mut truncation = None;

        while !self.working.is_empty() {
            self.sort_working_set();

            let (position, rotate) = match self.continuity_match() {
                Some(position) => (position, false),
                None => (0, true),
            };
            let id = self.working.remove(position);
            let twin = self.candidates.twin(id);
            self.working.retain(|&other| other != twin);

            self.iterations += 1;
            if self.iterations > self.config.iteration_limit {
                self.candidates.entries[id].path.elements.clear();
                let dropped_paths = self.candidates.original_count - self.output.len();
                warn!(
                    iterations = self.iterations,
                    dropped_paths,
                    "iteration limit reached, truncating sequenced output"
                );
                truncation = Some(Truncation {
                    iterations: self.iterations,
                    dropped_paths,
                });
                break;
            }

            self.place(id, rotate);
        }

        self.finish(truncation)
    }

    /// Enrich candidate `id` with its transition moves and append it to the
    /// output.
    fn place(&mut self, id: CandidateId, rotate: bool) {
        let reversed = self.candidates.is_reverse(id);
        let candidate = &mut self.candidates.entries[id];
        let mut path = Path::new(std::mem::take(&mut candidate.path.elements));
        let path_starting_angle = candidate.start_angle;
        let from = self.last_position;
        self.last_position = candidate.end.with_tool_down(false);

        let maneuver = rotate.then(|| {
            let last_angle = *self
                .last_angle
                .get_or_insert_with(|| opposite(path_starting_angle));
            rotation_maneuver(from, last_angle, path_starting_angle, self.config)
        });

        // After a rotation the tool approaches the cut from the staging area.
        let approach_from = maneuver
            .as_ref()
            .and_then(|elements| elements.last())
            .map_or(from, |retract| retract.end());
        wrap_with_transitions(&mut path, approach_from);
        if let Some(maneuver) = maneuver {
            let mut elements = maneuver.to_vec();
            elements.append(&mut path.elements);
            path.elements = elements;
        }

        // The last element is the retract; the one before it ends the cut.
        if let Some(cut_end) = path.elements.iter().rev().nth(1) {
            self.last_angle = Some(cut_end.end_angle());
        }

        if rotate {
            self.diagnostics.rotation_count += 1;
        } else {
            self.diagnostics.continuity_matches += 1;
        }
        if reversed {
            self.diagnostics.reversed_paths += 1;
        }
        trace!(
            iteration = self.iterations,
            candidate = id,
            reversed,
            rotate,
            elements = path.len(),
            "placed path"
        );

        self.output.push(path);
    }

    fn finish(mut self, truncation: Option<Truncation>) -> TransitionResult {
        self.diagnostics.output_paths = self.output.len();
        self.diagnostics.iterations = self.iterations;
        self.diagnostics.travel_distance = diagnostics::travel_distance(&self.output);
        self.diagnostics.emitted_elements = diagnostics::total_elements(&self.output);

        debug!(
            input_paths = self.diagnostics.input_paths,
            output_paths = self.diagnostics.output_paths,
            rotations = self.diagnostics.rotation_count,
            travel = self.diagnostics.travel_distance,
            "sequencing complete"
        );

        TransitionResult {
            file: PathFile::new(self.output),
            diagnostics: self.diagnostics,
            truncation,
        }
    }
}

/// Reorder `paths` and insert the tool-transition moves between them.
///
/// # Errors
///
/// Returns [`TransitionError::EmptyPath`] if a path has no elements and
/// [`TransitionError::NonFiniteCoordinate`] if a path contains NaN or
/// infinite coordinates.
pub fn sequence_paths(
    paths: Vec<Path>,
    config: &TransitionConfig,
) -> Result<TransitionResult, TransitionError> {
    let candidates = Candidates::new(paths)?;
    Ok(Sequencer::new(candidates, config).run())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::f64::consts::PI;

    use super::*;
    use crate::element::{MoveKind, PathElement};
    use crate::rotation::{ROTATION_ELEMENTS, staging_point};
    use crate::transition::TRANSITION_ELEMENTS;

    fn cut(x0: f64, y0: f64, x1: f64, y1: f64) -> PathElement {
        PathElement::line(MoveKind::Linear, Point::down(x0, y0), Point::down(x1, y1))
    }

    fn segment(x0: f64, y0: f64, x1: f64, y1: f64) -> Path {
        Path::new(vec![cut(x0, y0, x1, y1)])
    }

    /// The cutting elements of an emitted path (everything between the
    /// plunge and the retract).
    fn cut_elements(path: &Path, original_len: usize) -> &[PathElement] {
        let end = path.len() - 1;
        &path.elements[end - original_len..end]
    }

    #[test]
    fn empty_input_returns_empty() {
        let result = sequence_paths(vec![], &TransitionConfig::default()).unwrap();
        assert!(result.file.paths.is_empty());
        assert!(result.truncation.is_none());
        assert_eq!(result.diagnostics.iterations, 0);
    }

    #[test]
    fn nearer_path_chosen_first() {
        let far = segment(10.0, 0.0, 11.0, 0.0);
        let near = segment(1.0, 0.0, 2.0, 0.0);
        let result = sequence_paths(vec![far, near.clone()], &TransitionConfig::default()).unwrap();

        assert_eq!(result.file.paths.len(), 2);
        assert_eq!(cut_elements(&result.file.paths[0], 1), near.elements.as_slice());
    }

    #[test]
    fn single_path_gets_rotation_and_transitions() {
        let path = Path::new(vec![
            cut(1.0, 1.0, 2.0, 1.0),
            cut(2.0, 1.0, 2.0, 2.0),
            cut(2.0, 2.0, 3.0, 2.0),
        ]);
        let result = sequence_paths(vec![path.clone()], &TransitionConfig::default()).unwrap();

        assert_eq!(result.file.paths.len(), 1);
        let emitted = &result.file.paths[0];
        assert_eq!(
            emitted.len(),
            path.len() + ROTATION_ELEMENTS + TRANSITION_ELEMENTS,
        );
        assert_eq!(cut_elements(emitted, 3), path.elements.as_slice());
        assert_eq!(result.diagnostics.rotation_count, 1);
    }

    #[test]
    fn first_rotation_starts_from_opposite_heading() {
        // Heading 0, so the tool is assumed to face π before the first cut.
        let result =
            sequence_paths(vec![segment(1.0, 1.0, 4.0, 1.0)], &TransitionConfig::default())
                .unwrap();
        let emitted = &result.file.paths[0];
        let config = TransitionConfig::default();

        assert_eq!(emitted.elements[0].start(), Point::up(0.0, 0.0));
        let entry = staging_point(PI, &config);
        let arc_start = emitted.elements[2].start();
        assert!((arc_start.x - entry.x).abs() < 1e-9);
        assert!((arc_start.y - entry.y).abs() < 1e-9);
        assert!(matches!(emitted.elements[2], PathElement::Arc { .. }));
    }

    #[test]
    fn approach_follows_rotation_exit() {
        let result =
            sequence_paths(vec![segment(1.0, 1.0, 4.0, 1.0)], &TransitionConfig::default())
                .unwrap();
        let elements = &result.file.paths[0].elements;
        let retract = elements[ROTATION_ELEMENTS - 1];
        let travel = elements[ROTATION_ELEMENTS];
        assert_eq!(travel.start(), retract.end());
        assert_eq!(travel.end(), Point::up(1.0, 1.0));
    }

    #[test]
    fn continuity_preferred_over_distance() {
        let first = segment(0.0, 0.0, 1.0, 0.0);
        let aligned = segment(5.0, 0.0, 6.0, 0.1);
        let perpendicular = segment(1.0, 1.0, 1.0, 2.0);
        let result = sequence_paths(
            vec![first.clone(), aligned.clone(), perpendicular],
            &TransitionConfig::default(),
        )
        .unwrap();

        let paths = &result.file.paths;
        assert_eq!(paths.len(), 3);
        assert_eq!(cut_elements(&paths[0], 1), first.elements.as_slice());
        assert_eq!(cut_elements(&paths[1], 1), aligned.elements.as_slice());
        // No rotation for the aligned path: travel, plunge, cut, retract.
        assert_eq!(paths[1].len(), 1 + TRANSITION_ELEMENTS);
        assert_eq!(paths[1].elements[0].start(), Point::up(1.0, 0.0));
        assert_eq!(paths[2].len(), 1 + TRANSITION_ELEMENTS + ROTATION_ELEMENTS);

        assert_eq!(result.diagnostics.rotation_count, 2);
        assert_eq!(result.diagnostics.continuity_matches, 1);
    }

    #[test]
    fn reverse_twin_chosen_when_it_continues_the_heading() {
        let first = segment(0.0, 0.0, 1.0, 0.0);
        let backwards = segment(10.0, 0.0, 2.0, 0.0);
        let result =
            sequence_paths(vec![first, backwards.clone()], &TransitionConfig::default()).unwrap();

        let second = &result.file.paths[1];
        assert_eq!(second.len(), 1 + TRANSITION_ELEMENTS);
        assert_eq!(
            cut_elements(second, 1),
            backwards.reversed().elements.as_slice()
        );
        assert_eq!(result.diagnostics.reversed_paths, 1);
    }

    #[test]
    fn zero_angular_limit_forces_rotation_on_heading_change() {
        let config = TransitionConfig::default().with_angular_limit_degrees(0.0);
        let paths = vec![
            segment(0.0, 0.0, 1.0, 0.0),
            segment(2.0, 0.0, 2.0, 1.0),
            segment(3.0, 1.0, 4.0, 2.0),
        ];
        let result = sequence_paths(paths, &config).unwrap();

        assert_eq!(result.diagnostics.rotation_count, 3);
        for path in &result.file.paths {
            assert_eq!(path.len(), 1 + TRANSITION_ELEMENTS + ROTATION_ELEMENTS);
        }
    }

    #[test]
    fn each_path_emitted_exactly_once_in_one_direction() {
        let paths: Vec<Path> = (0..8)
            .map(|i| {
                let x = f64::from(i) * 3.0;
                segment(x, f64::from(i % 3), x + 1.0, 2.0)
            })
            .collect();
        let result = sequence_paths(paths.clone(), &TransitionConfig::default()).unwrap();

        assert_eq!(result.file.paths.len(), paths.len());
        for original in &paths {
            let reversed = original.reversed();
            let occurrences = result
                .file
                .paths
                .iter()
                .filter(|emitted| {
                    let cut = cut_elements(emitted, 1);
                    cut == original.elements.as_slice() || cut == reversed.elements.as_slice()
                })
                .count();
            assert_eq!(occurrences, 1);
        }
    }

    #[test]
    fn iteration_guard_truncates_output() {
        let paths: Vec<Path> = (0..5)
            .map(|i| {
                let x = f64::from(i) * 10.0;
                segment(x, 0.0, x + 1.0, 0.0)
            })
            .collect();
        let config = TransitionConfig::default().with_iteration_limit(2);
        let result = sequence_paths(paths, &config).unwrap();

        assert_eq!(result.file.paths.len(), 2);
        assert_eq!(
            result.truncation,
            Some(Truncation {
                iterations: 3,
                dropped_paths: 3,
            })
        );
        assert_eq!(result.diagnostics.output_paths, 2);
    }

    #[test]
    fn rejects_empty_path() {
        let paths = vec![segment(0.0, 0.0, 1.0, 0.0), Path::new(vec![])];
        let err = sequence_paths(paths, &TransitionConfig::default()).unwrap_err();
        assert!(matches!(err, TransitionError::EmptyPath { index: 1 }));
    }

    #[test]
    fn rejects_non_finite_coordinates() {
        let paths = vec![segment(0.0, f64::NAN, 1.0, 0.0)];
        let err = sequence_paths(paths, &TransitionConfig::default()).unwrap_err();
        assert!(matches!(err, TransitionError::NonFiniteCoordinate { index: 0 }));
    }

    #[test]
    fn twins_are_symmetric() {
        let candidates = Candidates::new(vec![
            segment(0.0, 0.0, 1.0, 0.0),
            segment(2.0, 0.0, 3.0, 0.0),
            segment(4.0, 0.0, 5.0, 0.0),
        ])
        .unwrap();
        for id in 0..candidates.entries.len() {
            let twin = candidates.twin(id);
            assert_ne!(twin, id);
            assert_eq!(candidates.twin(twin), id);
            assert_ne!(candidates.is_reverse(id), candidates.is_reverse(twin));
        }
    }
}
