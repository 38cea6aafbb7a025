//! pngcrop: crop a rectangle out of a PNG.
//!
//! Wires together:
//! - PNG decode/encode (codec/)
//! - Pixel buffers and the cropper (raster/)
//! - RGB565 "SSD" quantization and dump (ssd/)
//! - Command line and request validation (cli.rs)
//! - Row progress reporting (progress.rs)

pub mod cli;
pub mod codec;
pub mod error;
pub mod progress;
pub mod raster;
pub mod ssd;

pub use cli::{Args, CropRequest};
pub use error::{Error, ErrorKind};
pub use progress::{ConsoleProgress, ProgressObserver, Silent, Stage};
pub use raster::{CropRect, Image, PixelLayout, CROP_MARGIN_X, CROP_MARGIN_Y};

use std::time::Instant;

/// What a successful [`run`] produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CropSummary {
    pub width: u32,
    pub height: u32,
    pub layout: PixelLayout,
    /// Number of packed pixels written to the SSD dump, if one was requested.
    pub ssd_pixels: Option<usize>,
}

/// Decode, crop, re-encode, and optionally dump packed pixels.
///
/// The SSD capability check happens before anything is written, so a
/// request that cannot produce its dump leaves no output behind.
pub fn run(
    request: &CropRequest,
    observer: &mut dyn ProgressObserver,
) -> Result<CropSummary, Error> {
    let start = Instant::now();

    let mut image = codec::decode_png(&request.input, observer)?;
    let decoded = (image.width(), image.height());
    let decode_ms = start.elapsed().as_millis();

    raster::crop_in_place(&mut image, request.rect)?;

    let packed = match &request.ssd {
        Some(path) => Some((path, ssd::quantize(&image)?)),
        None => None,
    };

    let encode_start = Instant::now();
    codec::encode_png(&image, &request.output, observer)?;
    let encode_ms = encode_start.elapsed().as_millis();

    if let Some((path, values)) = &packed {
        ssd::write_dump(path, values)?;
    }

    log::info!(
        "Cropped region ({}x{} at {},{}) of {}x{} in {}ms (decode {}ms, encode {}ms)",
        image.width(),
        image.height(),
        request.rect.x,
        request.rect.y,
        decoded.0,
        decoded.1,
        start.elapsed().as_millis(),
        decode_ms,
        encode_ms
    );

    Ok(CropSummary {
        width: image.width(),
        height: image.height(),
        layout: image.layout(),
        ssd_pixels: packed.map(|(_, values)| values.len()),
    })
}
