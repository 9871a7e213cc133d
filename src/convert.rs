//! Conversions between OpenCV matrices and `image` buffers.
//!
//! OpenCV works in BGR order; everything downstream of here is RGB.

use anyhow::{bail, Context, Result};
use image::{GrayImage, RgbImage};
use opencv::core::{Mat, Scalar, CV_8UC1, CV_8UC3};
use opencv::imgproc;
use opencv::prelude::*;

pub fn bgr_mat_to_rgb(mat: &Mat) -> Result<RgbImage> {
    if mat.typ() != CV_8UC3 {
        bail!("Expected an 8-bit 3-channel frame, got type {}", mat.typ());
    }

    let mut rgb = Mat::default();
    imgproc::cvt_color_def(mat, &mut rgb, imgproc::COLOR_BGR2RGB)?;

    let (width, height) = (rgb.cols() as u32, rgb.rows() as u32);
    let data = rgb.data_bytes()?.to_vec();
    RgbImage::from_raw(width, height, data).context("Frame buffer does not match its dimensions")
}

pub fn rgb_to_bgr_mat(image: &RgbImage) -> Result<Mat> {
    let (width, height) = image.dimensions();
    let mut rgb =
        Mat::new_rows_cols_with_default(height as i32, width as i32, CV_8UC3, Scalar::all(0.0))?;
    rgb.data_bytes_mut()?.copy_from_slice(image.as_raw());

    let mut bgr = Mat::default();
    imgproc::cvt_color_def(&rgb, &mut bgr, imgproc::COLOR_RGB2BGR)?;
    Ok(bgr)
}

pub fn gray_to_mat(mask: &GrayImage) -> Result<Mat> {
    let (width, height) = mask.dimensions();
    let mut mat =
        Mat::new_rows_cols_with_default(height as i32, width as i32, CV_8UC1, Scalar::all(0.0))?;
    mat.data_bytes_mut()?.copy_from_slice(mask.as_raw());
    Ok(mat)
}

pub fn mat_to_gray(mat: &Mat) -> Result<GrayImage> {
    if mat.typ() != CV_8UC1 {
        bail!("Expected an 8-bit single-channel mask, got type {}", mat.typ());
    }

    let (width, height) = (mat.cols() as u32, mat.rows() as u32);
    let data = if mat.is_continuous() {
        mat.data_bytes()?.to_vec()
    } else {
        let packed = mat.try_clone()?;
        packed.data_bytes()?.to_vec()
    };
    GrayImage::from_raw(width, height, data).context("Mask buffer does not match its dimensions")
}
