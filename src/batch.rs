//! Host-boundary batching.
//!
//! Downstream pipelines consume images as batches: `[N, H, W, C]` for colour
//! and `[N, H, W]` for masks. A selection is always a single image, so it is
//! wrapped as a batch of one. The selector itself never deals in batches.

use crate::select::DecodedImage;
use serde::Serialize;

/// A dense row-major `f32` tensor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tensor {
    pub shape: Vec<usize>,
    #[serde(skip)]
    pub data: Vec<f32>,
}

impl Tensor {
    /// Number of elements implied by the shape.
    pub fn len(&self) -> usize {
        self.shape.iter().product()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A decoded selection as a batch of one: `image` is `[1, H, W, 3]`,
/// `mask` is `[1, H, W]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchedImage {
    pub image: Tensor,
    pub mask: Tensor,
}

impl From<DecodedImage> for BatchedImage {
    fn from(decoded: DecodedImage) -> Self {
        let (height, width) = (decoded.height() as usize, decoded.width() as usize);
        let (rgb, mask) = decoded.into_planes();
        Self {
            image: Tensor {
                shape: vec![1, height, width, 3],
                data: rgb.into_raw(),
            },
            mask: Tensor {
                shape: vec![1, height, width],
                data: mask.into_raw(),
            },
        }
    }
}
