//! Pixel buffer domain, public API.
//!
//! An [`Image`] owns a tightly packed, top-to-bottom pixel buffer.
//! Cropping replaces that buffer wholesale; nothing here aliases pixels.

mod buffer;
mod crop;

pub use buffer::{Image, ImageError, PixelLayout};
pub use crop::{crop, crop_in_place, CropError, CropRect, CROP_MARGIN_X, CROP_MARGIN_Y};

pub(crate) use buffer::try_alloc_zeroed;
