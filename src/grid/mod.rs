//! Grid layout and zero-copy views over the raw network output.
//!
//! The network emits one flat vector made of three consecutive segments:
//!
//! 1. class probabilities, `S x S x C`, P(class | object in cell);
//! 2. box confidences, `S x S x B`, P(object) per predicted box;
//! 3. box geometry, `S x S x B x 4`, `(x_offset, y_offset, sqrt(w), sqrt(h))`.
//!
//! `RawOutput` borrows that vector and exposes each segment through strided
//! accessors. Only the decoded geometry (`BoxGrid`) is materialized.

use crate::geometry::BBox;
use crate::util::{GridYoloError, GridYoloResult};

/// Values per encoded box: `x_offset, y_offset, sqrt(w), sqrt(h)`.
pub const BOX_PARAMS: usize = 4;

/// Shape of a region-grid detector output.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridLayout {
    grid_side: usize,
    boxes_per_cell: usize,
    num_classes: usize,
    image_size: u32,
    class_probs_len: usize,
    confidences_len: usize,
    boxes_len: usize,
}

impl GridLayout {
    /// Builds a layout, rejecting zero sizes and lengths that overflow `usize`.
    pub fn new(
        grid_side: usize,
        boxes_per_cell: usize,
        num_classes: usize,
        image_size: u32,
    ) -> GridYoloResult<Self> {
        if grid_side == 0 {
            return Err(GridYoloError::InvalidConfig {
                field: "grid_side",
                reason: "must be positive",
            });
        }
        if boxes_per_cell == 0 {
            return Err(GridYoloError::InvalidConfig {
                field: "boxes_per_cell",
                reason: "must be positive",
            });
        }
        if num_classes == 0 {
            return Err(GridYoloError::InvalidConfig {
                field: "num_classes",
                reason: "must be positive",
            });
        }
        if image_size == 0 {
            return Err(GridYoloError::InvalidConfig {
                field: "image_size",
                reason: "must be positive",
            });
        }

        let overflow = GridYoloError::InvalidConfig {
            field: "grid_side",
            reason: "output length overflows usize",
        };
        let cells = grid_side
            .checked_mul(grid_side)
            .ok_or_else(|| overflow.clone())?;
        let class_probs_len = cells
            .checked_mul(num_classes)
            .ok_or_else(|| overflow.clone())?;
        let confidences_len = cells
            .checked_mul(boxes_per_cell)
            .ok_or_else(|| overflow.clone())?;
        let boxes_len = confidences_len
            .checked_mul(BOX_PARAMS)
            .ok_or_else(|| overflow.clone())?;
        class_probs_len
            .checked_add(confidences_len)
            .and_then(|v| v.checked_add(boxes_len))
            .ok_or(overflow)?;

        Ok(Self {
            grid_side,
            boxes_per_cell,
            num_classes,
            image_size,
            class_probs_len,
            confidences_len,
            boxes_len,
        })
    }

    /// Grid side length `S`.
    pub fn grid_side(&self) -> usize {
        self.grid_side
    }

    /// Boxes predicted per cell `B`.
    pub fn boxes_per_cell(&self) -> usize {
        self.boxes_per_cell
    }

    /// Number of classes `C`.
    pub fn num_classes(&self) -> usize {
        self.num_classes
    }

    /// Side of the square model input in pixels.
    pub fn image_size(&self) -> u32 {
        self.image_size
    }

    /// Number of grid cells, `S * S`.
    pub fn num_cells(&self) -> usize {
        self.grid_side * self.grid_side
    }

    /// Number of predicted boxes, `S * S * B`.
    pub fn num_boxes(&self) -> usize {
        self.confidences_len
    }

    /// Upper bound on the number of candidates, `S * S * B * C`.
    pub fn max_candidates(&self) -> usize {
        self.confidences_len.saturating_mul(self.num_classes)
    }

    /// Length of the class-probability segment.
    pub fn class_probs_len(&self) -> usize {
        self.class_probs_len
    }

    /// Length of the confidence segment.
    pub fn confidences_len(&self) -> usize {
        self.confidences_len
    }

    /// Length of the box geometry segment.
    pub fn boxes_len(&self) -> usize {
        self.boxes_len
    }

    /// Total raw output length, `S*S*C + S*S*B + S*S*B*4`.
    pub fn output_len(&self) -> usize {
        self.class_probs_len + self.confidences_len + self.boxes_len
    }

    /// Number of values in a `1 x image_size x image_size x 3` input tensor.
    pub fn input_len(&self) -> usize {
        let side = self.image_size as usize;
        side.saturating_mul(side).saturating_mul(3)
    }

    fn cell_index(&self, row: usize, col: usize) -> Option<usize> {
        if row >= self.grid_side || col >= self.grid_side {
            return None;
        }
        Some(row * self.grid_side + col)
    }
}

/// Borrowed view of one raw output vector.
#[derive(Clone, Copy, Debug)]
pub struct RawOutput<'a> {
    layout: GridLayout,
    data: &'a [f32],
}

impl<'a> RawOutput<'a> {
    /// Wraps `data`, failing if its length does not match `layout`.
    pub fn new(layout: GridLayout, data: &'a [f32]) -> GridYoloResult<Self> {
        let expected = layout.output_len();
        if data.len() != expected {
            return Err(GridYoloError::OutputSizeMismatch {
                expected,
                got: data.len(),
            });
        }
        Ok(Self { layout, data })
    }

    pub fn layout(&self) -> GridLayout {
        self.layout
    }

    /// Returns the full backing slice.
    pub fn as_slice(&self) -> &'a [f32] {
        self.data
    }

    /// Class-probability segment, `S x S x C` row-major.
    pub fn class_probs(&self) -> &'a [f32] {
        &self.data[..self.layout.class_probs_len]
    }

    /// Confidence segment, `S x S x B` row-major.
    pub fn confidences(&self) -> &'a [f32] {
        let start = self.layout.class_probs_len;
        &self.data[start..start + self.layout.confidences_len]
    }

    /// Encoded geometry segment, `S x S x B x 4` row-major.
    pub fn encoded_boxes(&self) -> &'a [f32] {
        &self.data[self.layout.class_probs_len + self.layout.confidences_len..]
    }

    /// P(class | object) for cell `(row, col)`.
    pub fn class_prob(&self, row: usize, col: usize, class: usize) -> Option<f32> {
        if class >= self.layout.num_classes {
            return None;
        }
        let cell = self.layout.cell_index(row, col)?;
        self.cell_class_probs(cell).get(class).copied()
    }

    /// P(object) for box `k` of cell `(row, col)`.
    pub fn confidence(&self, row: usize, col: usize, k: usize) -> Option<f32> {
        if k >= self.layout.boxes_per_cell {
            return None;
        }
        let cell = self.layout.cell_index(row, col)?;
        self.cell_confidences(cell).get(k).copied()
    }

    /// Encoded `(x_offset, y_offset, sqrt(w), sqrt(h))` for box `k` of cell `(row, col)`.
    pub fn raw_box(&self, row: usize, col: usize, k: usize) -> Option<[f32; BOX_PARAMS]> {
        if k >= self.layout.boxes_per_cell {
            return None;
        }
        let cell = self.layout.cell_index(row, col)?;
        let start = (cell * self.layout.boxes_per_cell + k) * BOX_PARAMS;
        let values = self.encoded_boxes().get(start..start + BOX_PARAMS)?;
        Some([values[0], values[1], values[2], values[3]])
    }

    /// Class probabilities of the flat cell index `row * S + col`.
    pub(crate) fn cell_class_probs(&self, cell: usize) -> &'a [f32] {
        let n = self.layout.num_classes;
        self.class_probs()
            .get(cell * n..(cell + 1) * n)
            .unwrap_or(&[])
    }

    /// Box confidences of the flat cell index `row * S + col`.
    pub(crate) fn cell_confidences(&self, cell: usize) -> &'a [f32] {
        let n = self.layout.boxes_per_cell;
        self.confidences()
            .get(cell * n..(cell + 1) * n)
            .unwrap_or(&[])
    }

    /// Decodes every predicted box into model-space pixels.
    ///
    /// The column index offsets x and the row index offsets y; widths and
    /// heights are squared before scaling.
    pub fn decode_boxes(&self) -> BoxGrid {
        let side = self.layout.grid_side as f32;
        let image_size = self.layout.image_size as f32;
        let per_cell = self.layout.boxes_per_cell;

        let boxes = self
            .encoded_boxes()
            .chunks_exact(BOX_PARAMS)
            .enumerate()
            .map(|(idx, raw)| {
                let cell = idx / per_cell;
                let row = (cell / self.layout.grid_side) as f32;
                let col = (cell % self.layout.grid_side) as f32;
                BBox {
                    cx: (raw[0] + col) / side * image_size,
                    cy: (raw[1] + row) / side * image_size,
                    width: raw[2] * raw[2] * image_size,
                    height: raw[3] * raw[3] * image_size,
                }
            })
            .collect();

        BoxGrid {
            layout: self.layout,
            boxes,
        }
    }
}

/// Decoded boxes for every `(row, col, k)`, in model-space pixels.
#[derive(Clone, Debug, PartialEq)]
pub struct BoxGrid {
    layout: GridLayout,
    boxes: Vec<BBox>,
}

impl BoxGrid {
    pub fn layout(&self) -> GridLayout {
        self.layout
    }

    /// Returns box `k` of cell `(row, col)`.
    pub fn get(&self, row: usize, col: usize, k: usize) -> Option<&BBox> {
        if k >= self.layout.boxes_per_cell {
            return None;
        }
        let cell = self.layout.cell_index(row, col)?;
        self.boxes.get(cell * self.layout.boxes_per_cell + k)
    }

    /// All boxes in `(row, col, k)` row-major order.
    pub fn as_slice(&self) -> &[BBox] {
        &self.boxes
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    pub(crate) fn cell_boxes(&self, cell: usize) -> &[BBox] {
        let n = self.layout.boxes_per_cell;
        self.boxes.get(cell * n..(cell + 1) * n).unwrap_or(&[])
    }
}
