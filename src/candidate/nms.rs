//! Greedy IoU non-maximum suppression over ranked candidates.

use crate::candidate::Candidate;
use crate::trace::trace_debug;

/// Which candidate pairs may suppress each other.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SuppressionPolicy {
    /// A higher-ranked box suppresses overlapping boxes of any class.
    #[default]
    CrossClass,
    /// Only boxes of the same class suppress each other.
    PerClass,
}

/// Suppresses candidates that overlap a higher-ranked active candidate.
///
/// `candidates` must already be ranked. Walking in order, each candidate that
/// is still active and has a non-zero probability deactivates every later
/// candidate whose IoU with it exceeds `iou_threshold`. The survivors are
/// returned in their original order; candidates with probability `<= 0` never
/// survive.
pub fn suppress(
    candidates: &[Candidate],
    iou_threshold: f32,
    policy: SuppressionPolicy,
) -> Vec<Candidate> {
    let mut removed = vec![false; candidates.len()];

    for (i, kept) in candidates.iter().enumerate() {
        if removed[i] || kept.probability == 0.0 {
            continue;
        }
        for (j, other) in candidates.iter().enumerate().skip(i + 1) {
            if removed[j] {
                continue;
            }
            if policy == SuppressionPolicy::PerClass && other.class_id != kept.class_id {
                continue;
            }
            let overlap = kept.bbox.iou(&other.bbox);
            if overlap > iou_threshold {
                trace_debug!("suppressed", by = i, index = j, iou = overlap);
                removed[j] = true;
            }
        }
    }

    candidates
        .iter()
        .zip(removed)
        .filter(|(candidate, removed)| !removed && candidate.probability > 0.0)
        .map(|(candidate, _)| *candidate)
        .collect()
}
