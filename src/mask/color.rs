use super::{MaskError, RegionMask};
use crate::annotation::Selection;
use image::{GrayImage, Luma, RgbImage};

/// Width of the accepted colour band, in standard deviations
pub const DEFAULT_SPREAD: f64 = 2.0;

/// Per-channel colour statistics of a sampled patch
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelStats {
    pub mean: [f64; 3],
    pub std_dev: [f64; 3],
}

impl ChannelStats {
    /// Population mean and standard deviation over the part of `selection`
    /// that lies inside `frame`
    pub fn sample(frame: &RgbImage, selection: &Selection) -> Result<Self, MaskError> {
        let x_end = selection.x.saturating_add(selection.width).min(frame.width());
        let y_end = selection.y.saturating_add(selection.height).min(frame.height());
        if selection.x >= x_end || selection.y >= y_end {
            return Err(MaskError::EmptySample);
        }

        let mut sum = [0.0f64; 3];
        let mut sum_sq = [0.0f64; 3];
        for y in selection.y..y_end {
            for x in selection.x..x_end {
                let pixel = frame.get_pixel(x, y);
                for c in 0..3 {
                    let v = f64::from(pixel[c]);
                    sum[c] += v;
                    sum_sq[c] += v * v;
                }
            }
        }

        let n = f64::from((x_end - selection.x) * (y_end - selection.y));
        let mean = sum.map(|s| s / n);
        let mut std_dev = [0.0; 3];
        for c in 0..3 {
            std_dev[c] = (sum_sq[c] / n - mean[c] * mean[c]).max(0.0).sqrt();
        }

        Ok(Self { mean, std_dev })
    }

    /// Inclusive `[mean - spread*std, mean + spread*std]` test on every channel
    pub fn accepts(&self, pixel: [u8; 3], spread: f64) -> bool {
        (0..3).all(|c| {
            let v = f64::from(pixel[c]);
            let band = spread * self.std_dev[c];
            v >= self.mean[c] - band && v <= self.mean[c] + band
        })
    }
}

/// Classify every frame pixel as field when its colour matches the sampled
/// grass patch
pub fn field_mask_from_sample(
    frame: &RgbImage,
    selection: &Selection,
    spread: f64,
) -> Result<RegionMask, MaskError> {
    let stats = ChannelStats::sample(frame, selection)?;
    tracing::info!(
        "Field colour mean={:.1?} std={:.1?}",
        stats.mean,
        stats.std_dev
    );

    let mask = GrayImage::from_fn(frame.width(), frame.height(), |x, y| {
        let accepted = stats.accepts(frame.get_pixel(x, y).0, spread);
        Luma([if accepted { 255 } else { 0 }])
    });

    Ok(RegionMask::from_binary(mask))
}
