//! Property checks over seeded random network outputs.

use gridyolo::lowlevel::{rank_candidates, suppress};
use gridyolo::{
    iou, Candidate, ClassAssignment, DetectorConfig, GridLayout, Interpreter, RawOutput,
    SuppressionPolicy,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const SEEDS: [u64; 6] = [1, 7, 42, 1234, 9001, 65535];

fn random_raw(rng: &mut StdRng, layout: GridLayout) -> Vec<f32> {
    let mut data = vec![0.0f32; layout.output_len()];
    for value in data.iter_mut() {
        *value = rng.random_range(0.0..1.0);
    }
    data
}

fn is_subsequence(needle: &[Candidate], haystack: &[Candidate]) -> bool {
    let mut rest = haystack.iter();
    needle.iter().all(|n| rest.any(|h| h == n))
}

#[test]
fn ranked_candidates_are_bounded_sorted_and_above_threshold() {
    let layout = GridLayout::new(7, 2, 20, 448).unwrap();
    let threshold = 0.35;
    for seed in SEEDS {
        let mut rng = StdRng::seed_from_u64(seed);
        let data = random_raw(&mut rng, layout);
        let raw = RawOutput::new(layout, &data).unwrap();
        let boxes = raw.decode_boxes();

        let ranked =
            rank_candidates(&raw, &boxes, threshold, ClassAssignment::JointProbability).unwrap();
        assert!(ranked.len() <= layout.max_candidates());
        assert!(ranked.iter().all(|c| c.probability >= threshold));
        assert!(ranked.iter().all(|c| c.class_id < layout.num_classes()));
        assert!(ranked
            .windows(2)
            .all(|pair| pair[0].probability >= pair[1].probability));
    }
}

#[test]
fn survivors_never_overlap_beyond_threshold() {
    let layout = GridLayout::new(7, 2, 20, 448).unwrap();
    let iou_threshold = 0.5;
    for seed in SEEDS {
        let mut rng = StdRng::seed_from_u64(seed);
        let data = random_raw(&mut rng, layout);
        let raw = RawOutput::new(layout, &data).unwrap();
        let boxes = raw.decode_boxes();
        let ranked =
            rank_candidates(&raw, &boxes, 0.3, ClassAssignment::JointProbability).unwrap();

        let kept = suppress(&ranked, iou_threshold, SuppressionPolicy::CrossClass);
        assert!(is_subsequence(&kept, &ranked));
        for (i, a) in kept.iter().enumerate() {
            for b in kept.iter().skip(i + 1) {
                assert!(iou(&a.bbox, &b.bbox) <= iou_threshold);
            }
        }

        let kept_per_class = suppress(&ranked, iou_threshold, SuppressionPolicy::PerClass);
        assert!(is_subsequence(&kept_per_class, &ranked));
        for (i, a) in kept_per_class.iter().enumerate() {
            for b in kept_per_class.iter().skip(i + 1) {
                if a.class_id == b.class_id {
                    assert!(iou(&a.bbox, &b.bbox) <= iou_threshold);
                }
            }
        }
    }
}

#[test]
fn suppression_is_idempotent_on_random_outputs() {
    let layout = GridLayout::new(7, 2, 20, 448).unwrap();
    for seed in SEEDS {
        let mut rng = StdRng::seed_from_u64(seed);
        let data = random_raw(&mut rng, layout);
        let raw = RawOutput::new(layout, &data).unwrap();
        let boxes = raw.decode_boxes();
        let ranked = rank_candidates(&raw, &boxes, 0.2, ClassAssignment::FirstPassing).unwrap();

        for policy in [SuppressionPolicy::CrossClass, SuppressionPolicy::PerClass] {
            let once = suppress(&ranked, 0.45, policy);
            let twice = suppress(&once, 0.45, policy);
            assert_eq!(once, twice);
        }
    }
}

#[test]
fn interpreter_is_deterministic_across_calls() {
    let interpreter = Interpreter::new(DetectorConfig::default()).unwrap();
    let mut rng = StdRng::seed_from_u64(3);
    let data = random_raw(&mut rng, interpreter.layout());

    let first = interpreter.detect_raw(&data, 1920, 1080).unwrap();
    let second = interpreter.detect_raw(&data, 1920, 1080).unwrap();
    assert!(!first.is_empty());
    assert_eq!(first, second);
}
