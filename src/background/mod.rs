mod knn;
mod sampler;

pub use knn::KnnSubtractor;
pub use sampler::{prime_background, SampleReport, SamplerSettings};

use anyhow::Result;
use image::{GrayImage, RgbImage};

/// How strongly a frame updates the background estimate
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LearningRate {
    /// Let the model pick a rate from its history length
    Auto,
    /// Blend each frame in with this weight, in `0.0..=1.0`
    Fixed(f64),
    /// Do not update the model at all
    Frozen,
}

impl LearningRate {
    /// OpenCV encoding: negative selects automatic, zero disables learning
    pub fn as_opencv(self) -> f64 {
        match self {
            Self::Auto => -1.0,
            Self::Fixed(rate) => rate,
            Self::Frozen => 0.0,
        }
    }
}

/// Trait for background subtraction models
/// Allows swapping the OpenCV subtractor for an in-process fake in tests
pub trait BackgroundModel {
    /// Feed a frame and return its foreground mask
    ///
    /// # Returns
    /// * Mask with the frame's dimensions, 255 where the pixel differs from
    ///   the background and 0 elsewhere
    fn apply(&mut self, frame: &RgbImage, rate: LearningRate) -> Result<GrayImage>;
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opencv_rate_encoding() {
        assert_eq!(LearningRate::Auto.as_opencv(), -1.0);
        assert_eq!(LearningRate::Fixed(0.01).as_opencv(), 0.01);
        assert_eq!(LearningRate::Frozen.as_opencv(), 0.0);
    }
}
