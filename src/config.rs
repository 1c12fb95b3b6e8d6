//! Deployment configuration for the detection pipeline.
//!
//! All options are fixed per deployment. `DetectorConfig::validate` runs when
//! an [`Interpreter`](crate::Interpreter) is built, so bad values are reported
//! up front rather than on the first frame.

use crate::candidate::nms::SuppressionPolicy;
use crate::candidate::rank::ClassAssignment;
use crate::grid::GridLayout;
use crate::util::{GridYoloError, GridYoloResult};

/// Pascal VOC class names, in the order the reference model was trained on.
pub const VOC_CLASSES: [&str; 20] = [
    "aeroplane",
    "bicycle",
    "bird",
    "boat",
    "bottle",
    "bus",
    "car",
    "cat",
    "chair",
    "cow",
    "diningtable",
    "dog",
    "horse",
    "motorbike",
    "person",
    "pottedplant",
    "sheep",
    "sofa",
    "train",
    "tvmonitor",
];

/// Pipeline configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct DetectorConfig {
    /// Grid side length `S`.
    pub grid_side: usize,
    /// Boxes predicted per cell `B`.
    pub boxes_per_cell: usize,
    /// Number of classes `C`.
    pub num_classes: usize,
    /// Side of the square model input in pixels.
    pub image_size: u32,
    /// Minimum joint probability for a candidate to be kept.
    pub probability_threshold: f32,
    /// IoU above which a lower-ranked candidate is suppressed.
    pub iou_threshold: f32,
    /// Class labels, `num_classes` long.
    pub class_names: Vec<String>,
    /// Label choice when several classes pass for one box.
    pub class_assignment: ClassAssignment,
    /// Cross-class or per-class suppression.
    pub suppression: SuppressionPolicy,
    /// Rank candidates on the rayon pool (requires the `rayon` feature).
    pub parallel: bool,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            grid_side: 7,
            boxes_per_cell: 2,
            num_classes: VOC_CLASSES.len(),
            image_size: 448,
            probability_threshold: 0.1,
            iou_threshold: 0.5,
            class_names: VOC_CLASSES.iter().map(|name| name.to_string()).collect(),
            class_assignment: ClassAssignment::default(),
            suppression: SuppressionPolicy::default(),
            parallel: false,
        }
    }
}

impl DetectorConfig {
    /// Replaces the class list and updates `num_classes` to match.
    pub fn with_class_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.class_names = names.into_iter().map(Into::into).collect();
        self.num_classes = self.class_names.len();
        self
    }

    pub fn with_thresholds(mut self, probability_threshold: f32, iou_threshold: f32) -> Self {
        self.probability_threshold = probability_threshold;
        self.iou_threshold = iou_threshold;
        self
    }

    pub fn with_suppression(mut self, suppression: SuppressionPolicy) -> Self {
        self.suppression = suppression;
        self
    }

    pub fn with_class_assignment(mut self, class_assignment: ClassAssignment) -> Self {
        self.class_assignment = class_assignment;
        self
    }

    /// Checks every field and returns the resulting grid layout.
    pub fn validate(&self) -> GridYoloResult<GridLayout> {
        let layout = GridLayout::new(
            self.grid_side,
            self.boxes_per_cell,
            self.num_classes,
            self.image_size,
        )?;
        check_unit_interval("probability_threshold", self.probability_threshold)?;
        check_unit_interval("iou_threshold", self.iou_threshold)?;
        if self.class_names.len() != self.num_classes {
            return Err(GridYoloError::InvalidConfig {
                field: "class_names",
                reason: "length must equal num_classes",
            });
        }
        Ok(layout)
    }
}

fn check_unit_interval(field: &'static str, value: f32) -> GridYoloResult<()> {
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(GridYoloError::InvalidConfig {
            field,
            reason: "must be within [0, 1]",
        });
    }
    Ok(())
}
