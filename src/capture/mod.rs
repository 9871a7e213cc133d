mod video_file;
mod webcam;

pub use video_file::VideoFileSource;
pub use webcam::WebcamCapture;

use anyhow::Result;
use image::RgbImage;

/// Trait for sequential frame sources
pub trait FrameSource {
    /// Decode the next frame, or `None` once the stream is exhausted
    fn read_frame(&mut self) -> Result<Option<RgbImage>>;

    /// Advance past one frame without handing it out.
    /// Returns `false` at end of stream.
    fn skip_frame(&mut self) -> Result<bool> {
        Ok(self.read_frame()?.is_some())
    }

    /// Get the resolution of produced frames
    fn resolution(&self) -> (u32, u32);
}

impl<S: FrameSource + ?Sized> FrameSource for Box<S> {
    fn read_frame(&mut self) -> Result<Option<RgbImage>> {
        (**self).read_frame()
    }

    fn skip_frame(&mut self) -> Result<bool> {
        (**self).skip_frame()
    }

    fn resolution(&self) -> (u32, u32) {
        (**self).resolution()
    }
}
