//! Flat pixel buffer addressed as rows of fixed-size pixels.

use std::collections::TryReserveError;
use std::fmt;

/// How a single pixel is stored in an [`Image`] buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PixelLayout {
    /// One 8-bit luminance byte.
    Gray8,
    /// Three 8-bit samples: red, green, blue.
    Rgb8,
    /// Three 16-bit big-endian samples: red, green, blue.
    Rgb16,
}

impl PixelLayout {
    /// RGB layout for a decoded PNG of the given bit depth.
    ///
    /// Depths up to 8 are expanded to one byte per sample, 16 keeps two.
    pub fn rgb_for_bit_depth(bit_depth: u8) -> Self {
        if bit_depth > 8 {
            Self::Rgb16
        } else {
            Self::Rgb8
        }
    }

    /// Size of one pixel in bytes.
    #[inline]
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            Self::Gray8 => 1,
            Self::Rgb8 => 3,
            Self::Rgb16 => 6,
        }
    }

    /// Bits per sample.
    #[inline]
    pub const fn bit_depth(self) -> u8 {
        match self {
            Self::Gray8 | Self::Rgb8 => 8,
            Self::Rgb16 => 16,
        }
    }
}

impl fmt::Display for PixelLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Gray8 => "8-bit gray",
            Self::Rgb8 => "8-bit RGB",
            Self::Rgb16 => "16-bit RGB",
        };
        f.write_str(name)
    }
}

/// A decoded image: dimensions, pixel layout, and the pixels themselves.
///
/// `pixels.len()` is always exactly `width * height * layout.bytes_per_pixel()`.
#[derive(Clone, PartialEq, Eq)]
pub struct Image {
    width: u32,
    height: u32,
    layout: PixelLayout,
    pixels: Vec<u8>,
}

impl Image {
    /// Wraps an existing buffer, checking that its length matches the geometry.
    pub fn from_raw(
        width: u32,
        height: u32,
        layout: PixelLayout,
        pixels: Vec<u8>,
    ) -> Result<Self, ImageError> {
        let expected = buffer_len(width, height, layout)
            .ok_or(ImageError::TooLarge { width, height })?;
        if pixels.len() != expected {
            return Err(ImageError::InvalidBuffer {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            layout,
            pixels,
        })
    }

    /// Allocates a zero-filled image, failing instead of aborting when memory is short.
    pub fn try_new(width: u32, height: u32, layout: PixelLayout) -> Result<Self, ImageError> {
        let len = buffer_len(width, height, layout).ok_or(ImageError::TooLarge { width, height })?;
        let pixels = try_alloc_zeroed(len).map_err(|_| ImageError::OutOfMemory { bytes: len })?;
        Ok(Self {
            width,
            height,
            layout,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn layout(&self) -> PixelLayout {
        self.layout
    }

    /// Bytes per row. Rows carry no padding.
    pub fn row_stride(&self) -> usize {
        self.width as usize * self.layout.bytes_per_pixel()
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    /// Gives up the buffer.
    pub fn into_raw(self) -> Vec<u8> {
        self.pixels
    }

    /// Bytes of row `y`, or `None` past the last row.
    pub fn row(&self, y: u32) -> Option<&[u8]> {
        if y >= self.height {
            return None;
        }
        let stride = self.row_stride();
        let start = y as usize * stride;
        Some(&self.pixels[start..start + stride])
    }

    /// Iterates rows top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> + '_ {
        let stride = self.row_stride().max(1);
        self.pixels.chunks_exact(stride).take(self.height as usize)
    }

    /// Bytes of the pixel at `(x, y)`, or `None` when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<&[u8]> {
        if x >= self.width {
            return None;
        }
        let bpp = self.layout.bytes_per_pixel();
        let row = self.row(y)?;
        let start = x as usize * bpp;
        Some(&row[start..start + bpp])
    }
}

impl fmt::Debug for Image {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Image")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("layout", &self.layout)
            .field("bytes", &self.pixels.len())
            .finish()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("Pixel buffer holds {actual} bytes, geometry needs {expected}")]
    InvalidBuffer { expected: usize, actual: usize },

    #[error("Image dimensions {width}x{height} overflow the address space")]
    TooLarge { width: u32, height: u32 },

    #[error("Out of memory allocating {bytes} bytes of pixels")]
    OutOfMemory { bytes: usize },
}

fn buffer_len(width: u32, height: u32, layout: PixelLayout) -> Option<usize> {
    (width as usize)
        .checked_mul(height as usize)?
        .checked_mul(layout.bytes_per_pixel())
}

/// Zero-filled byte buffer whose allocation failure is reported, not fatal.
pub(crate) fn try_alloc_zeroed(len: usize) -> Result<Vec<u8>, TryReserveError> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)?;
    buf.resize(len, 0);
    Ok(buf)
}
