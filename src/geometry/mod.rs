//! Axis-aligned boxes in center/size form and their overlap measure.
//!
//! Boxes are stored as `(cx, cy, width, height)`. The coordinate frame is
//! whatever the caller uses: model space (a square of side `image_size`) while
//! the pipeline runs, original image pixels after rescaling.

/// Axis-aligned bounding box in center/size form.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BBox {
    /// Horizontal center.
    pub cx: f32,
    /// Vertical center.
    pub cy: f32,
    /// Width, non-negative.
    pub width: f32,
    /// Height, non-negative.
    pub height: f32,
}

impl BBox {
    /// Creates a box from its center and size.
    #[inline]
    pub fn new(cx: f32, cy: f32, width: f32, height: f32) -> Self {
        Self {
            cx,
            cy,
            width,
            height,
        }
    }

    /// Creates a box from its `(x1, y1, x2, y2)` corners.
    #[inline]
    pub fn from_corners(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        let width = x2 - x1;
        let height = y2 - y1;
        Self {
            cx: x1 + width / 2.0,
            cy: y1 + height / 2.0,
            width,
            height,
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.cx - self.width / 2.0
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.cx + self.width / 2.0
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.cy - self.height / 2.0
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.cy + self.height / 2.0
    }

    /// Returns `(x1, y1, x2, y2)`.
    #[inline]
    pub fn to_corners(&self) -> [f32; 4] {
        [self.left(), self.top(), self.right(), self.bottom()]
    }

    #[inline]
    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    /// Returns the box with x-quantities scaled by `sx` and y-quantities by `sy`.
    #[inline]
    pub fn scaled(&self, sx: f32, sy: f32) -> Self {
        Self {
            cx: self.cx * sx,
            cy: self.cy * sy,
            width: self.width * sx,
            height: self.height * sy,
        }
    }

    /// Intersection over union with `other`. See [`iou`].
    #[inline]
    pub fn iou(&self, other: &BBox) -> f32 {
        iou(self, other)
    }
}

/// Computes intersection over union of two boxes.
///
/// A negative overlap along either axis means the boxes do not intersect.
/// Returns `0.0` when the union is not positive, which happens when both boxes
/// have zero area.
pub fn iou(a: &BBox, b: &BBox) -> f32 {
    let overlap_x = a.right().min(b.right()) - a.left().max(b.left());
    let overlap_y = a.bottom().min(b.bottom()) - a.top().max(b.top());

    let intersection = if overlap_x < 0.0 || overlap_y < 0.0 {
        0.0
    } else {
        overlap_x * overlap_y
    };

    let union = a.area() + b.area() - intersection;
    if union > 0.0 {
        intersection / union
    } else {
        0.0
    }
}
