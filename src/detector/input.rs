//! Normalized model input and the inference collaborator seam.

use crate::util::{GridYoloError, GridYoloResult};

/// Normalized NHWC image tensor of shape `1 x image_size x image_size x 3`.
///
/// Values are expected in `[-1, 1]`. Only the length is checked; the range is
/// the caller's contract with its inference backend.
#[derive(Clone, Debug, PartialEq)]
pub struct InputTensor {
    data: Vec<f32>,
    image_size: u32,
}

impl InputTensor {
    pub fn new(data: Vec<f32>, image_size: u32) -> GridYoloResult<Self> {
        let side = image_size as usize;
        let expected = side.saturating_mul(side).saturating_mul(3);
        if image_size == 0 || data.len() != expected {
            return Err(GridYoloError::InputSizeMismatch {
                expected,
                got: data.len(),
            });
        }
        Ok(Self { data, image_size })
    }

    /// Tensor of zeros (mid-gray after normalization).
    pub fn zeros(image_size: u32) -> GridYoloResult<Self> {
        let side = image_size as usize;
        Self::new(vec![0.0; side.saturating_mul(side).saturating_mul(3)], image_size)
    }

    pub fn image_size(&self) -> u32 {
        self.image_size
    }

    /// Returns `[1, image_size, image_size, 3]`.
    pub fn shape(&self) -> [usize; 4] {
        let side = self.image_size as usize;
        [1, side, side, 3]
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<f32> {
        self.data
    }
}

/// External model runner producing one raw output vector per input.
///
/// Implementations own weights, sessions and any threading. The returned vector
/// is validated against the configured grid layout by the caller.
pub trait InferenceBackend {
    fn infer(&mut self, input: &InputTensor) -> GridYoloResult<Vec<f32>>;
}

impl<F> InferenceBackend for F
where
    F: FnMut(&InputTensor) -> GridYoloResult<Vec<f32>>,
{
    fn infer(&mut self, input: &InputTensor) -> GridYoloResult<Vec<f32>> {
        self(input)
    }
}
