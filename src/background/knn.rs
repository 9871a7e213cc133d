use super::{BackgroundModel, LearningRate};
use crate::convert;
use anyhow::{Context, Result};
use image::{GrayImage, RgbImage};
use opencv::core::{Mat, Ptr};
use opencv::prelude::*;
use opencv::video::{self, BackgroundSubtractorKNN};

/// OpenCV's K-nearest-neighbours background subtractor
///
/// Shadow detection is off, so the mask only ever holds 0 and 255.
pub struct KnnSubtractor {
    subtractor: Ptr<BackgroundSubtractorKNN>,
    foreground: Mat,
}

impl KnnSubtractor {
    /// # Arguments
    /// * `history` - Number of recent frames that shape the model
    /// * `dist2_threshold` - Squared distance beyond which a pixel is foreground
    pub fn new(history: i32, dist2_threshold: f64) -> Result<Self> {
        tracing::info!(
            "Creating KNN background subtractor (history={}, threshold={})",
            history,
            dist2_threshold
        );

        let subtractor = video::create_background_subtractor_knn(history, dist2_threshold, false)
            .context("Failed to create KNN background subtractor")?;

        Ok(Self {
            subtractor,
            foreground: Mat::default(),
        })
    }
}

impl BackgroundModel for KnnSubtractor {
    fn apply(&mut self, frame: &RgbImage, rate: LearningRate) -> Result<GrayImage> {
        let _span = tracing::debug_span!("knn_apply").entered();

        let bgr = convert::rgb_to_bgr_mat(frame)?;
        self.subtractor
            .apply(&bgr, &mut self.foreground, rate.as_opencv())
            .context("Background subtraction failed")?;

        convert::mat_to_gray(&self.foreground)
    }
}
