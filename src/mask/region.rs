use super::MaskError;
use crate::annotation::{Point, Polygon};
use image::{GrayImage, Luma, Rgb, RgbImage};

const INSIDE: u8 = 255;

/// Frame-sized binary mask of the playing field: 255 inside, 0 outside
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionMask {
    mask: GrayImage,
}

impl RegionMask {
    /// Rasterize with the even-odd rule, sampling each pixel at its centre
    pub fn from_polygon(polygon: &Polygon, width: u32, height: u32) -> Self {
        let _span = tracing::debug_span!("rasterize").entered();
        Self {
            mask: scanline_fill(polygon.points(), width, height),
        }
    }

    /// Any non-zero pixel counts as inside
    pub(crate) fn from_binary(mut mask: GrayImage) -> Self {
        for pixel in mask.pixels_mut() {
            if pixel[0] != 0 {
                pixel[0] = INSIDE;
            }
        }
        Self { mask }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.mask.dimensions()
    }

    pub fn contains(&self, x: u32, y: u32) -> bool {
        x < self.mask.width() && y < self.mask.height() && self.mask.get_pixel(x, y)[0] == INSIDE
    }

    /// Number of pixels inside the region
    pub fn coverage(&self) -> u64 {
        self.mask.pixels().filter(|p| p[0] == INSIDE).count() as u64
    }

    /// Bitwise AND of a foreground mask with the region
    pub fn intersect(&self, foreground: &GrayImage) -> Result<GrayImage, MaskError> {
        self.check_dimensions(foreground.dimensions())?;

        let mut out = foreground.clone();
        for (value, region) in out.pixels_mut().zip(self.mask.pixels()) {
            value[0] &= region[0];
        }
        Ok(out)
    }

    /// Black out every frame pixel outside the region
    pub fn apply_to_frame(&self, frame: &RgbImage) -> Result<RgbImage, MaskError> {
        self.check_dimensions(frame.dimensions())?;

        let mut out = frame.clone();
        for (x, y, pixel) in out.enumerate_pixels_mut() {
            if !self.contains(x, y) {
                *pixel = Rgb([0, 0, 0]);
            }
        }
        Ok(out)
    }

    fn check_dimensions(&self, actual: (u32, u32)) -> Result<(), MaskError> {
        let expected = self.mask.dimensions();
        if expected != actual {
            return Err(MaskError::DimensionMismatch { expected, actual });
        }
        Ok(())
    }
}

fn scanline_fill(points: &[Point], width: u32, height: u32) -> GrayImage {
    let mut mask = GrayImage::new(width, height);
    let mut crossings: Vec<f64> = Vec::with_capacity(points.len());

    for y in 0..height {
        let yc = f64::from(y) + 0.5;
        crossings.clear();

        for (i, a) in points.iter().enumerate() {
            let b = points[(i + 1) % points.len()];
            let (ay, by) = (f64::from(a.y), f64::from(b.y));
            // Half-open on y so shared vertices are counted once
            if (ay > yc) != (by > yc) {
                let t = (yc - ay) / (by - ay);
                crossings.push(f64::from(a.x) + t * f64::from(b.x - a.x));
            }
        }
        crossings.sort_by(f64::total_cmp);

        for span in crossings.chunks_exact(2) {
            let start = (span[0] - 0.5).ceil().max(0.0);
            let end = (span[1] - 0.5).ceil().min(f64::from(width));
            if start >= end {
                continue;
            }
            for x in start as u32..end as u32 {
                mask.put_pixel(x, y, Luma([INSIDE]));
            }
        }
    }

    mask
}
