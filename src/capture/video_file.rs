use super::FrameSource;
use crate::convert;
use anyhow::{bail, Context, Result};
use image::RgbImage;
use opencv::core::Mat;
use opencv::prelude::*;
use opencv::videoio::{self, VideoCapture};
use std::path::{Path, PathBuf};

/// Video file decoded through OpenCV. The handle is released on drop.
pub struct VideoFileSource {
    capture: VideoCapture,
    path: PathBuf,
    frame: Mat,
    width: u32,
    height: u32,
}

impl VideoFileSource {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let name = path
            .to_str()
            .with_context(|| format!("Video path {} is not valid UTF-8", path.display()))?;

        let capture = VideoCapture::from_file(name, videoio::CAP_ANY)
            .with_context(|| format!("Failed to open video {}", path.display()))?;
        if !capture.is_opened()? {
            bail!("Failed to open video {}", path.display());
        }

        let width = capture.get(videoio::CAP_PROP_FRAME_WIDTH)? as u32;
        let height = capture.get(videoio::CAP_PROP_FRAME_HEIGHT)? as u32;
        let frames = capture.get(videoio::CAP_PROP_FRAME_COUNT)?;
        let fps = capture.get(videoio::CAP_PROP_FPS)?;

        tracing::info!(
            "Opened {} ({}x{}, {} frames at {:.1} fps)",
            path.display(),
            width,
            height,
            frames,
            fps
        );

        Ok(Self {
            capture,
            path: path.to_path_buf(),
            frame: Mat::default(),
            width,
            height,
        })
    }
}

impl FrameSource for VideoFileSource {
    fn read_frame(&mut self) -> Result<Option<RgbImage>> {
        let _span = tracing::debug_span!("decode").entered();

        let ok = self
            .capture
            .read(&mut self.frame)
            .with_context(|| format!("Failed to read frame from {}", self.path.display()))?;
        if !ok || self.frame.empty() {
            return Ok(None);
        }

        convert::bgr_mat_to_rgb(&self.frame).map(Some)
    }

    fn skip_frame(&mut self) -> Result<bool> {
        let ok = self
            .capture
            .grab()
            .with_context(|| format!("Failed to read frame from {}", self.path.display()))?;
        Ok(ok)
    }

    fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

impl Drop for VideoFileSource {
    fn drop(&mut self) {
        tracing::debug!("Releasing {}", self.path.display());
        if let Err(err) = self.capture.release() {
            tracing::warn!("Failed to release {}: {}", self.path.display(), err);
        }
    }
}
