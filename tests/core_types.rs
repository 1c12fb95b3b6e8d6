use gridyolo::{
    iou, BBox, DetectorConfig, GridLayout, GridYoloError, InputTensor, Interpreter, RawOutput,
};

#[test]
fn iou_of_box_with_itself_is_one() {
    let boxes = [
        BBox::new(10.0, 20.0, 4.0, 8.0),
        BBox::new(224.0, 224.0, 100.0, 50.0),
        BBox::new(3.0, 5.0, 2.0, 4.0),
    ];
    for bbox in boxes {
        assert!((iou(&bbox, &bbox) - 1.0).abs() < 1e-6);
    }
}

#[test]
fn iou_is_symmetric() {
    let a = BBox::new(100.0, 100.0, 80.0, 60.0);
    let b = BBox::new(130.0, 90.0, 50.0, 90.0);
    assert!(iou(&a, &b) > 0.0);
    assert_eq!(iou(&a, &b), iou(&b, &a));
}

#[test]
fn iou_of_disjoint_boxes_is_zero() {
    let a = BBox::new(10.0, 10.0, 10.0, 10.0);
    let b = BBox::new(100.0, 10.0, 10.0, 10.0);
    let c = BBox::new(10.0, 100.0, 10.0, 10.0);
    assert_eq!(iou(&a, &b), 0.0);
    assert_eq!(iou(&a, &c), 0.0);
}

#[test]
fn iou_of_zero_area_boxes_is_zero() {
    let a = BBox::new(10.0, 10.0, 0.0, 0.0);
    let b = BBox::new(10.0, 10.0, 0.0, 5.0);
    assert_eq!(iou(&a, &b), 0.0);
    assert_eq!(iou(&a, &a), 0.0);
}

#[test]
fn iou_matches_hand_computed_overlap() {
    // Intersection 140 x 50 over union 2 * 170 * 50 - 7000.
    let a = BBox::new(100.0, 100.0, 170.0, 50.0);
    let b = BBox::new(130.0, 100.0, 170.0, 50.0);
    assert!((a.iou(&b) - 0.7).abs() < 1e-6);
}

#[test]
fn raw_output_rejects_wrong_length() {
    let layout = GridLayout::new(7, 2, 20, 448).unwrap();
    let data = vec![0.0f32; 1469];
    let err = RawOutput::new(layout, &data).err().unwrap();
    assert_eq!(
        err,
        GridYoloError::OutputSizeMismatch {
            expected: 1470,
            got: 1469,
        }
    );
}

#[test]
fn raw_output_accessors_follow_segment_strides() {
    let layout = GridLayout::new(2, 2, 3, 64).unwrap();
    let data: Vec<f32> = (0..layout.output_len()).map(|v| v as f32).collect();
    let raw = RawOutput::new(layout, &data).unwrap();

    // Class probabilities: (row * S + col) * C + class.
    assert_eq!(raw.class_prob(0, 0, 0), Some(0.0));
    assert_eq!(raw.class_prob(1, 0, 2), Some(8.0));
    assert_eq!(raw.class_prob(1, 1, 2), Some(11.0));

    // Confidences start after 2 * 2 * 3 = 12 values.
    assert_eq!(raw.confidence(0, 0, 0), Some(12.0));
    assert_eq!(raw.confidence(0, 1, 1), Some(15.0));
    assert_eq!(raw.confidence(1, 1, 1), Some(19.0));

    // Boxes start after 12 + 8 = 20 values, four per box.
    assert_eq!(raw.raw_box(0, 0, 0), Some([20.0, 21.0, 22.0, 23.0]));
    assert_eq!(raw.raw_box(1, 1, 1), Some([48.0, 49.0, 50.0, 51.0]));

    assert_eq!(raw.class_prob(2, 0, 0), None);
    assert_eq!(raw.class_prob(0, 0, 3), None);
    assert_eq!(raw.confidence(0, 0, 2), None);
    assert_eq!(raw.raw_box(0, 2, 0), None);
}

#[test]
fn layout_rejects_zero_sizes() {
    let cases = [
        ((0, 2, 20, 448), "grid_side"),
        ((7, 0, 20, 448), "boxes_per_cell"),
        ((7, 2, 0, 448), "num_classes"),
        ((7, 2, 20, 0), "image_size"),
    ];
    for ((s, b, c, size), field) in cases {
        match GridLayout::new(s, b, c, size) {
            Err(GridYoloError::InvalidConfig { field: got, .. }) => assert_eq!(got, field),
            other => panic!("expected InvalidConfig for {field}, got {other:?}"),
        }
    }
}

#[test]
fn default_config_is_the_voc_deployment() {
    let cfg = DetectorConfig::default();
    let layout = cfg.validate().unwrap();
    assert_eq!(layout.output_len(), 1470);
    assert_eq!(cfg.class_names.len(), 20);
    assert_eq!(cfg.class_names[14], "person");
    assert_eq!(cfg.probability_threshold, 0.1);
    assert_eq!(cfg.iou_threshold, 0.5);
}

#[test]
fn config_rejects_out_of_range_thresholds() {
    for bad in [-0.1f32, 1.5, f32::NAN, f32::INFINITY] {
        let err = DetectorConfig::default()
            .with_thresholds(bad, 0.5)
            .validate()
            .err()
            .unwrap();
        assert_eq!(
            err,
            GridYoloError::InvalidConfig {
                field: "probability_threshold",
                reason: "must be within [0, 1]",
            }
        );

        let err = DetectorConfig::default()
            .with_thresholds(0.1, bad)
            .validate()
            .err()
            .unwrap();
        assert!(matches!(
            err,
            GridYoloError::InvalidConfig {
                field: "iou_threshold",
                ..
            }
        ));
    }
}

#[test]
fn config_rejects_class_name_count_mismatch() {
    let cfg = DetectorConfig {
        num_classes: 3,
        ..DetectorConfig::default()
    };
    let err = Interpreter::new(cfg).err().unwrap();
    assert_eq!(
        err,
        GridYoloError::InvalidConfig {
            field: "class_names",
            reason: "length must equal num_classes",
        }
    );
}

#[test]
fn with_class_names_updates_class_count() {
    let cfg = DetectorConfig::default().with_class_names(["cat", "dog"]);
    assert_eq!(cfg.num_classes, 2);
    assert_eq!(cfg.validate().unwrap().output_len(), 7 * 7 * 2 + 7 * 7 * 2 + 7 * 7 * 2 * 4);
}

#[test]
fn input_tensor_checks_nhwc_length() {
    let tensor = InputTensor::zeros(4).unwrap();
    assert_eq!(tensor.shape(), [1, 4, 4, 3]);
    assert_eq!(tensor.as_slice().len(), 48);

    let err = InputTensor::new(vec![0.0; 47], 4).err().unwrap();
    assert_eq!(
        err,
        GridYoloError::InputSizeMismatch {
            expected: 48,
            got: 47,
        }
    );
}
