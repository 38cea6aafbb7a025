//! PNG to [`Image`] with colour normalisation to RGB.

use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use image::ImageFormat;

use super::CodecError;
use crate::progress::{ProgressObserver, Stage, StageScope};
use crate::raster::{try_alloc_zeroed, Image, PixelLayout};

/// Length of the PNG file signature.
const SIGNATURE_LEN: usize = 8;

/// True if `header` starts with the PNG signature.
pub fn has_png_signature(header: &[u8]) -> bool {
    header.len() >= SIGNATURE_LEN
        && matches!(
            image::guess_format(&header[..SIGNATURE_LEN]),
            Ok(ImageFormat::Png)
        )
}

/// Decodes the PNG at `path`.
///
/// Palette and sub-byte gray images are expanded, gray is replicated into
/// R, G and B, alpha is dropped. 16-bit images stay 16-bit.
pub fn decode_png(path: &Path, observer: &mut dyn ProgressObserver) -> Result<Image, CodecError> {
    let file = File::open(path).map_err(|source| CodecError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = BufReader::new(file);

    let mut signature = [0u8; SIGNATURE_LEN];
    if reader.read_exact(&mut signature).is_err() || !has_png_signature(&signature) {
        return Err(CodecError::NotAPng {
            path: path.to_path_buf(),
        });
    }
    reader.rewind().map_err(|source| CodecError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let mut decoder = png::Decoder::new(reader);
    decoder.set_transformations(png::Transformations::EXPAND);
    let mut png_reader = decoder.read_info()?;

    let (width, height) = {
        let info = png_reader.info();
        (info.width, info.height)
    };
    let (color_type, bit_depth) = png_reader.output_color_type();
    let channels = color_type.samples();
    let sample_bytes = if bit_depth == png::BitDepth::Sixteen { 2 } else { 1 };
    let layout = PixelLayout::rgb_for_bit_depth(bit_depth as u8);

    log::info!(
        "[PNG] {}: {}x{} {:?} {}-bit as {}",
        path.display(),
        width,
        height,
        color_type,
        bit_depth as u8,
        layout
    );
    observer.image_info(width, height, layout.bit_depth());

    let frame_len = png_reader.output_buffer_size();
    let mut frame = try_alloc_zeroed(frame_len)
        .map_err(|_| CodecError::OutOfMemory { bytes: frame_len })?;

    let mut scope = StageScope::begin(observer, Stage::Decode, height);
    let frame_info = png_reader.next_frame(&mut frame)?;

    let mut image = Image::try_new(width, height, layout).map_err(|_| CodecError::OutOfMemory {
        bytes: width as usize * height as usize * layout.bytes_per_pixel(),
    })?;
    let dst_stride = image.row_stride();
    if dst_stride > 0 && frame_info.line_size > 0 {
        let src_rows = frame.chunks_exact(frame_info.line_size);
        let dst_rows = image.pixels_mut().chunks_exact_mut(dst_stride);
        for (done, (src, dst)) in src_rows.zip(dst_rows).enumerate() {
            normalize_row(src, dst, channels, sample_bytes);
            scope.row_done(done as u32 + 1);
        }
    }
    scope.complete();

    Ok(image)
}

/// Converts one row of gray, gray+alpha, RGB or RGBA samples into RGB.
fn normalize_row(src: &[u8], dst: &mut [u8], channels: usize, sample_bytes: usize) {
    let src_pixel = channels * sample_bytes;
    let dst_pixel = 3 * sample_bytes;
    for (s, d) in src.chunks_exact(src_pixel).zip(dst.chunks_exact_mut(dst_pixel)) {
        if channels < 3 {
            let gray = &s[..sample_bytes];
            for sample in d.chunks_exact_mut(sample_bytes) {
                sample.copy_from_slice(gray);
            }
        } else {
            d.copy_from_slice(&s[..dst_pixel]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::Silent;

    #[test]
    fn signature_check() {
        assert!(has_png_signature(b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR"));
        assert!(!has_png_signature(b"\x89PNG\r\n"));
        assert!(!has_png_signature(b"GIF89a\0\0\0\0"));
    }

    #[test]
    fn gray_rows_are_replicated() {
        let src = [10u8, 20, 30];
        let mut dst = [0u8; 9];
        normalize_row(&src, &mut dst, 1, 1);
        assert_eq!(dst, [10, 10, 10, 20, 20, 20, 30, 30, 30]);
    }

    #[test]
    fn gray_alpha_sixteen_bit_keeps_sample_pairs() {
        let src = [0x12u8, 0x34, 0xff, 0xff];
        let mut dst = [0u8; 6];
        normalize_row(&src, &mut dst, 2, 2);
        assert_eq!(dst, [0x12, 0x34, 0x12, 0x34, 0x12, 0x34]);
    }

    #[test]
    fn rgba_rows_drop_alpha() {
        let src = [1u8, 2, 3, 255, 4, 5, 6, 0];
        let mut dst = [0u8; 6];
        normalize_row(&src, &mut dst, 4, 1);
        assert_eq!(dst, [1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn non_png_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fake.png");
        std::fs::write(&path, b"GIF89a not really a png").unwrap();

        let result = decode_png(&path, &mut Silent);
        assert!(matches!(result, Err(CodecError::NotAPng { .. })));
    }

    #[test]
    fn short_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("short.png");
        std::fs::write(&path, b"\x89PN").unwrap();

        let result = decode_png(&path, &mut Silent);
        assert!(matches!(result, Err(CodecError::NotAPng { .. })));
    }

    #[test]
    fn missing_file_is_an_open_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = decode_png(&dir.path().join("absent.png"), &mut Silent);
        assert!(matches!(result, Err(CodecError::Open { .. })));
    }
}
