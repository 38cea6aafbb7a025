//! [`Image`] to PNG, row by row.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use super::CodecError;
use crate::progress::{ProgressObserver, Stage, StageScope};
use crate::raster::{Image, PixelLayout};

/// Writes `image` to `path` as a PNG with the same size and bit depth.
///
/// Rows are stored unfiltered and without interlacing. A partially
/// written file is removed when encoding fails.
pub fn encode_png(
    image: &Image,
    path: &Path,
    observer: &mut dyn ProgressObserver,
) -> Result<(), CodecError> {
    if image.width() == 0 || image.height() == 0 {
        return Err(CodecError::EmptyImage {
            width: image.width(),
            height: image.height(),
        });
    }

    let mut file = File::create(path).map_err(|source| CodecError::Create {
        path: path.to_path_buf(),
        source,
    })?;

    let result = write_png(image, &mut file, observer);
    drop(file);

    if result.is_err() {
        if let Err(e) = std::fs::remove_file(path) {
            log::warn!("[PNG] Could not remove partial {}: {}", path.display(), e);
        }
    } else {
        log::info!(
            "[PNG] Wrote {} ({}x{}, {})",
            path.display(),
            image.width(),
            image.height(),
            image.layout()
        );
    }
    result
}

fn write_png<W: Write>(
    image: &Image,
    out: W,
    observer: &mut dyn ProgressObserver,
) -> Result<(), CodecError> {
    let (color, depth) = match image.layout() {
        PixelLayout::Gray8 => (png::ColorType::Grayscale, png::BitDepth::Eight),
        PixelLayout::Rgb8 => (png::ColorType::Rgb, png::BitDepth::Eight),
        PixelLayout::Rgb16 => (png::ColorType::Rgb, png::BitDepth::Sixteen),
    };

    let mut encoder = png::Encoder::new(out, image.width(), image.height());
    encoder.set_color(color);
    encoder.set_depth(depth);
    encoder.set_compression(png::Compression::Default);
    encoder.set_filter(png::FilterType::NoFilter);
    encoder.set_adaptive_filter(png::AdaptiveFilterType::NonAdaptive);
    let mut writer = encoder.write_header()?;

    let mut scope = StageScope::begin(observer, Stage::Encode, image.height());
    {
        let mut stream = writer.stream_writer()?;
        for (done, row) in image.rows().enumerate() {
            stream.write_all(row).map_err(CodecError::Write)?;
            scope.row_done(done as u32 + 1);
        }
        stream.finish()?;
    }
    writer.finish()?;
    scope.complete();

    Ok(())
}
