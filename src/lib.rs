//! gridyolo interprets the output of region-grid object detectors.
//!
//! A YOLO v1 style network divides its square input into an `S x S` grid and
//! emits, per cell, `C` class probabilities, `B` box confidences and `B` encoded
//! boxes as one flat vector. This crate decodes that vector into model-space
//! boxes, ranks `(class, box)` pairs by joint probability, removes overlapping
//! boxes with greedy IoU suppression and rescales the survivors to the original
//! image. Model execution stays behind the [`InferenceBackend`] trait.
//!
//! Optional features: `rayon` parallelizes candidate ranking, `tracing` emits
//! spans and events, `image-io` converts decoded images into input tensors.

mod candidate;
pub mod config;
pub mod detector;
pub mod geometry;
pub mod grid;
#[cfg(feature = "image-io")]
pub mod image;
pub mod lowlevel;
pub mod rescale;
mod trace;
pub mod util;

pub use candidate::nms::SuppressionPolicy;
pub use candidate::rank::ClassAssignment;
pub use candidate::Candidate;
pub use config::{DetectorConfig, VOC_CLASSES};
pub use detector::{Detection, Detector, InferenceBackend, InputTensor, Interpreter};
pub use geometry::{iou, BBox};
pub use grid::{BoxGrid, GridLayout, RawOutput};
pub use rescale::{rescale_detections, ScaleFactors};
pub use util::{GridYoloError, GridYoloResult};
