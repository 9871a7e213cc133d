mod color;
mod region;

pub use color::{field_mask_from_sample, DEFAULT_SPREAD};
pub use region::RegionMask;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MaskError {
    #[error("mask is {expected:?} but the image is {actual:?}")]
    DimensionMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },

    #[error("sample rectangle does not overlap the frame")]
    EmptySample,
}
