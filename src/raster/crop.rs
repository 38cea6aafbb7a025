//! Pure region cropping logic, the functional core.
//!
//! Takes pixel data in, returns pixel data out. No I/O.

use super::buffer::{try_alloc_zeroed, Image};

/// Columns that must remain to the right of the requested rectangle.
pub const CROP_MARGIN_X: u32 = 48;

/// Rows that must remain below the requested rectangle.
pub const CROP_MARGIN_Y: u32 = 32;

/// Requested crop rectangle in source pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CropRect {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Checks the rectangle plus the right/bottom margins against the image size.
    ///
    /// On success returns the effective `(width, height)`, clamped to what
    /// is left of the image past the origin.
    pub fn fit(&self, image_width: u32, image_height: u32) -> Result<(u32, u32), CropError> {
        let reach_x = u64::from(self.x) + u64::from(self.width) + u64::from(CROP_MARGIN_X);
        let reach_y = u64::from(self.y) + u64::from(self.height) + u64::from(CROP_MARGIN_Y);
        if reach_x > u64::from(image_width) || reach_y > u64::from(image_height) {
            return Err(CropError::InvalidRegion {
                requested: *self,
                image_size: (image_width, image_height),
            });
        }

        let width = (image_width - self.x).min(self.width);
        let height = (image_height - self.y).min(self.height);
        Ok((width, height))
    }
}

/// Copies `rect` out of `image` into a new, tightly packed image.
///
/// The source is never modified.
pub fn crop(image: &Image, rect: CropRect) -> Result<Image, CropError> {
    let (width, height) = rect.fit(image.width(), image.height())?;

    let bpp = image.layout().bytes_per_pixel();
    let dst_stride = width as usize * bpp;
    let len = dst_stride * height as usize;
    let mut pixels = try_alloc_zeroed(len).map_err(|_| CropError::OutOfMemory { bytes: len })?;

    let src_stride = image.row_stride();
    let src_offset = rect.x as usize * bpp;
    let src_rows = image
        .pixels()
        .chunks_exact(src_stride.max(1))
        .skip(rect.y as usize);

    if dst_stride > 0 {
        for (dst, src) in pixels.chunks_exact_mut(dst_stride).zip(src_rows) {
            dst.copy_from_slice(&src[src_offset..src_offset + dst_stride]);
        }
    }

    log::debug!(
        "[CROP] {}x{} at {},{} from {}x{} ({})",
        width,
        height,
        rect.x,
        rect.y,
        image.width(),
        image.height(),
        image.layout()
    );

    Image::from_raw(width, height, image.layout(), pixels)
        .map_err(|e| CropError::Internal(e.to_string()))
}

/// Crops `image` in place: on success it owns the cropped buffer and the
/// old one is dropped. On failure `image` is left exactly as it was.
pub fn crop_in_place(image: &mut Image, rect: CropRect) -> Result<(), CropError> {
    let cropped = crop(image, rect)?;
    *image = cropped;
    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum CropError {
    #[error(
        "Cannot crop image to: cx: {}, cy: {}, width: {}, height: {} \
         (image is {}x{}, needs {}px right and {}px bottom margin)",
        requested.x, requested.y, requested.width, requested.height,
        image_size.0, image_size.1, CROP_MARGIN_X, CROP_MARGIN_Y
    )]
    InvalidRegion {
        requested: CropRect,
        image_size: (u32, u32),
    },

    #[error("Out of memory allocating {bytes} bytes for the cropped image")]
    OutOfMemory { bytes: usize },

    #[error("Cropped buffer inconsistent with its geometry: {0}")]
    Internal(String),
}
