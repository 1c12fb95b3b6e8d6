//! Joint-probability thresholding and ranking.

use crate::candidate::{sort_candidates_desc, Candidate};
use crate::grid::{BoxGrid, RawOutput};
use crate::util::{GridYoloError, GridYoloResult};
#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// How a kept candidate's class is chosen.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ClassAssignment {
    /// The class whose joint probability is being kept and ranked.
    #[default]
    JointProbability,
    /// The lowest class index that passed the threshold for the same box.
    ///
    /// Every passing class still yields its own candidate with its own
    /// probability, but all of them share this label. Matches detectors that
    /// take the argmax of the boolean threshold mask along the class axis.
    FirstPassing,
}

/// Collects every `(row, col, k, class)` whose joint probability reaches
/// `threshold`, ordered by descending probability.
///
/// Quadruples are visited in row-major `(row, col, k, class)` order and the
/// sort is stable, so equal probabilities keep that order.
pub fn rank_candidates(
    raw: &RawOutput<'_>,
    boxes: &BoxGrid,
    threshold: f32,
    assignment: ClassAssignment,
) -> GridYoloResult<Vec<Candidate>> {
    check_layouts(raw, boxes)?;

    let mut candidates = Vec::new();
    for cell in 0..raw.layout().num_cells() {
        collect_cell(raw, boxes, cell, threshold, assignment, &mut candidates);
    }

    sort_candidates_desc(&mut candidates);
    Ok(candidates)
}

/// Parallel variant of [`rank_candidates`] computing cells on the rayon pool.
///
/// Per-cell results are concatenated in cell order before the stable sort, so
/// the output is identical to the sequential version.
#[cfg(feature = "rayon")]
pub fn rank_candidates_par(
    raw: &RawOutput<'_>,
    boxes: &BoxGrid,
    threshold: f32,
    assignment: ClassAssignment,
) -> GridYoloResult<Vec<Candidate>> {
    check_layouts(raw, boxes)?;

    let per_cell: Vec<Vec<Candidate>> = (0..raw.layout().num_cells())
        .into_par_iter()
        .map(|cell| {
            let mut out = Vec::new();
            collect_cell(raw, boxes, cell, threshold, assignment, &mut out);
            out
        })
        .collect();

    let mut candidates: Vec<Candidate> = per_cell.into_iter().flatten().collect();
    sort_candidates_desc(&mut candidates);
    Ok(candidates)
}

fn check_layouts(raw: &RawOutput<'_>, boxes: &BoxGrid) -> GridYoloResult<()> {
    if raw.layout() != boxes.layout() {
        return Err(GridYoloError::LayoutMismatch);
    }
    Ok(())
}

fn collect_cell(
    raw: &RawOutput<'_>,
    boxes: &BoxGrid,
    cell: usize,
    threshold: f32,
    assignment: ClassAssignment,
    out: &mut Vec<Candidate>,
) {
    let class_probs = raw.cell_class_probs(cell);
    let confidences = raw.cell_confidences(cell);
    let cell_boxes = boxes.cell_boxes(cell);

    for (&confidence, bbox) in confidences.iter().zip(cell_boxes) {
        let Some(first_passing) = class_probs
            .iter()
            .position(|&class_prob| class_prob * confidence >= threshold)
        else {
            continue;
        };

        for (class_id, &class_prob) in class_probs.iter().enumerate().skip(first_passing) {
            let probability = class_prob * confidence;
            if probability < threshold || probability.is_nan() {
                continue;
            }
            let class_id = match assignment {
                ClassAssignment::JointProbability => class_id,
                ClassAssignment::FirstPassing => first_passing,
            };
            out.push(Candidate {
                class_id,
                bbox: *bbox,
                probability,
            });
        }
    }
}
