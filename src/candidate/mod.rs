//! Candidate detections: thresholding, ranking and suppression.

use crate::geometry::BBox;

pub(crate) mod nms;
pub(crate) mod rank;

/// A thresholded `(class, box, probability)` triple awaiting suppression.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Candidate {
    /// Index into the configured class names.
    pub class_id: usize,
    /// Box in model-space pixels.
    pub bbox: BBox,
    /// Joint probability `P(class | object) * P(object)`.
    pub probability: f32,
}

/// Sorts by descending probability; equal probabilities keep their order.
pub(crate) fn sort_candidates_desc(candidates: &mut [Candidate]) {
    candidates.sort_by(|a, b| b.probability.total_cmp(&a.probability));
}
