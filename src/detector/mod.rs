//! Detection pipeline: decode, rank, suppress, rescale.
//!
//! [`Interpreter`] is the stateless post-processing half and works on raw
//! output vectors directly. [`Detector`] pairs it with an
//! [`InferenceBackend`] to go from a normalized image tensor to detections in
//! original image pixels.

mod input;

pub use input::{InferenceBackend, InputTensor};

use crate::candidate::nms::suppress;
#[cfg(feature = "rayon")]
use crate::candidate::rank::rank_candidates_par;
use crate::candidate::rank::rank_candidates;
use crate::candidate::Candidate;
use crate::config::DetectorConfig;
use crate::geometry::BBox;
use crate::grid::{BoxGrid, GridLayout, RawOutput};
use crate::rescale::rescale_detections;
use crate::trace::{trace_event, trace_span};
use crate::util::{GridYoloError, GridYoloResult};

/// Final detection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Detection {
    /// Index into the configured class names.
    pub class_id: usize,
    /// Box in model space or original image pixels, depending on the stage.
    pub bbox: BBox,
    /// Joint class probability.
    pub probability: f32,
}

impl From<Candidate> for Detection {
    fn from(value: Candidate) -> Self {
        Self {
            class_id: value.class_id,
            bbox: value.bbox,
            probability: value.probability,
        }
    }
}

/// Stateless interpreter of raw region-grid output.
#[derive(Clone, Debug)]
pub struct Interpreter {
    config: DetectorConfig,
    layout: GridLayout,
}

impl Interpreter {
    /// Validates `config` and builds an interpreter.
    pub fn new(config: DetectorConfig) -> GridYoloResult<Self> {
        let layout = config.validate()?;
        Ok(Self { config, layout })
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    pub fn layout(&self) -> GridLayout {
        self.layout
    }

    /// Label of `detection`, if its class id is in range.
    pub fn label(&self, detection: &Detection) -> Option<&str> {
        self.config
            .class_names
            .get(detection.class_id)
            .map(String::as_str)
    }

    /// Decodes, ranks and suppresses one raw output vector.
    ///
    /// Boxes are returned in model space, ordered by descending probability.
    pub fn interpret(&self, raw: &[f32]) -> GridYoloResult<Vec<Detection>> {
        let _span = trace_span!("interpret", len = raw.len()).entered();

        let raw = RawOutput::new(self.layout, raw)?;
        let boxes = raw.decode_boxes();
        let ranked = self.rank(&raw, &boxes)?;
        trace_event!("ranked_candidates", count = ranked.len());

        let kept = suppress(&ranked, self.config.iou_threshold, self.config.suppression);
        trace_event!("kept_candidates", count = kept.len());

        Ok(kept.into_iter().map(Detection::from).collect())
    }

    /// Interprets `raw` and rescales the result to an `img_w x img_h` image.
    pub fn detect_raw(&self, raw: &[f32], img_w: u32, img_h: u32) -> GridYoloResult<Vec<Detection>> {
        if img_w == 0 || img_h == 0 {
            return Err(GridYoloError::InvalidImageSize {
                width: img_w,
                height: img_h,
            });
        }
        let mut detections = self.interpret(raw)?;
        rescale_detections(&mut detections, self.layout.image_size(), img_w, img_h)?;
        Ok(detections)
    }

    fn rank(&self, raw: &RawOutput<'_>, boxes: &BoxGrid) -> GridYoloResult<Vec<Candidate>> {
        let threshold = self.config.probability_threshold;
        let assignment = self.config.class_assignment;
        #[cfg(feature = "rayon")]
        if self.config.parallel {
            return rank_candidates_par(raw, boxes, threshold, assignment);
        }
        rank_candidates(raw, boxes, threshold, assignment)
    }
}

/// Interpreter bound to an inference backend.
pub struct Detector<B> {
    interpreter: Interpreter,
    backend: B,
}

impl<B: InferenceBackend> Detector<B> {
    /// Validates `config` and wraps `backend`.
    pub fn new(config: DetectorConfig, backend: B) -> GridYoloResult<Self> {
        Ok(Self {
            interpreter: Interpreter::new(config)?,
            backend,
        })
    }

    pub fn interpreter(&self) -> &Interpreter {
        &self.interpreter
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn into_backend(self) -> B {
        self.backend
    }

    /// Runs inference on `input` and returns detections in original image
    /// pixels for an `img_w x img_h` source image.
    ///
    /// An empty vector means nothing passed the probability threshold.
    pub fn detect(
        &mut self,
        input: &InputTensor,
        img_w: u32,
        img_h: u32,
    ) -> GridYoloResult<Vec<Detection>> {
        let layout = self.interpreter.layout();
        let _span = trace_span!("detect", width = img_w, height = img_h).entered();

        if input.image_size() != layout.image_size() {
            return Err(GridYoloError::InputSizeMismatch {
                expected: layout.input_len(),
                got: input.as_slice().len(),
            });
        }

        let raw = self.backend.infer(input)?;
        self.interpreter.detect_raw(&raw, img_w, img_h)
    }
}
