//! SSD dump: packed 5/6/5 colour for panel frame buffers.
//!
//! The dump is headerless: `width * height` little-endian `u16` values in
//! row-major order.

mod dump;
mod quantize;

pub use dump::write_dump;
pub use quantize::{quantize, rgb_to_ssd, unpack};

use std::path::PathBuf;

use crate::raster::PixelLayout;

#[derive(Debug, thiserror::Error)]
pub enum SsdError {
    #[error("SSD output needs 8-bit RGB pixels, image is {layout}")]
    UnsupportedFormat { layout: PixelLayout },

    #[error("Out of memory allocating {bytes} bytes for SSD pixels")]
    OutOfMemory { bytes: usize },

    #[error("Cannot write file \"{}\": {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
