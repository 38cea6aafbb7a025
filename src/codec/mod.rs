//! PNG file I/O: the infrastructure layer around the `png` crate.
//!
//! Decoding always yields RGB ([`PixelLayout::Rgb8`] or
//! [`PixelLayout::Rgb16`]); encoding writes unfiltered, non-interlaced PNG.
//!
//! [`PixelLayout::Rgb8`]: crate::raster::PixelLayout::Rgb8
//! [`PixelLayout::Rgb16`]: crate::raster::PixelLayout::Rgb16

mod decode;
mod encode;

pub use decode::{decode_png, has_png_signature};
pub use encode::encode_png;

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("\"{}\" is not a valid png file", path.display())]
    NotAPng { path: PathBuf },

    #[error("Cannot open \"{}\": {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot create \"{}\": {source}", path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Image read failed: {0}")]
    Decode(#[from] png::DecodingError),

    #[error("Image write failed: {0}")]
    Encode(#[from] png::EncodingError),

    #[error("Image write failed: {0}")]
    Write(#[source] std::io::Error),

    #[error("Cannot encode an empty {width}x{height} image")]
    EmptyImage { width: u32, height: u32 },

    #[error("Out of memory allocating {bytes} bytes while decoding")]
    OutOfMemory { bytes: usize },
}
