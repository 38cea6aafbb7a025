use super::SsdError;
use crate::raster::{Image, PixelLayout};

/// Packs one 8-bit RGB pixel as `RRRRR GGGGGG BBBBB`.
///
/// Each channel is scaled linearly and truncated: red and blue by 31/255,
/// green by 63/255.
#[inline]
pub const fn rgb_to_ssd(r: u8, g: u8, b: u8) -> u16 {
    let r5 = (r as u32 * 31 / 255) & 0x1f;
    let g6 = (g as u32 * 63 / 255) & 0x3f;
    let b5 = (b as u32 * 31 / 255) & 0x1f;
    ((r5 << 11) | (g6 << 5) | b5) as u16
}

/// Splits a packed value back into its `(r5, g6, b5)` fields.
#[inline]
pub const fn unpack(value: u16) -> (u8, u8, u8) {
    (
        (value >> 11) as u8 & 0x1f,
        (value >> 5) as u8 & 0x3f,
        value as u8 & 0x1f,
    )
}

/// Packs every pixel of an 8-bit RGB image, row-major.
pub fn quantize(image: &Image) -> Result<Vec<u16>, SsdError> {
    if image.layout() != PixelLayout::Rgb8 {
        return Err(SsdError::UnsupportedFormat {
            layout: image.layout(),
        });
    }

    let count = image.width() as usize * image.height() as usize;
    let mut out = Vec::new();
    out.try_reserve_exact(count)
        .map_err(|_| SsdError::OutOfMemory { bytes: count * 2 })?;
    out.extend(
        image
            .pixels()
            .chunks_exact(3)
            .map(|px| rgb_to_ssd(px[0], px[1], px[2])),
    );

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pure_red() {
        assert_eq!(rgb_to_ssd(255, 0, 0), 0xf800);
        assert_eq!(unpack(0xf800), (31, 0, 0));
    }

    #[test]
    fn primaries_and_extremes() {
        assert_eq!(rgb_to_ssd(0, 255, 0), 0x07e0);
        assert_eq!(rgb_to_ssd(0, 0, 255), 0x001f);
        assert_eq!(rgb_to_ssd(255, 255, 255), 0xffff);
        assert_eq!(rgb_to_ssd(0, 0, 0), 0x0000);
    }

    #[test]
    fn channels_truncate() {
        // 254 * 31 / 255 = 30.88, 128 * 63 / 255 = 31.62
        assert_eq!(unpack(rgb_to_ssd(254, 128, 9)), (30, 31, 1));
        assert_eq!(unpack(rgb_to_ssd(8, 4, 8)), (0, 0, 0));
    }

    #[test]
    fn ranking_is_preserved_per_channel() {
        for g in [0u8, 77, 255] {
            for b in [0u8, 130, 255] {
                let mut prev = unpack(rgb_to_ssd(0, g, b));
                for r in 1..=255u8 {
                    let cur = unpack(rgb_to_ssd(r, g, b));
                    assert!(cur.0 >= prev.0, "red {r} ranked below {}", r - 1);
                    assert_eq!((cur.1, cur.2), (prev.1, prev.2));
                    prev = cur;
                }
            }
        }
        for v in 1..=255u8 {
            assert!(unpack(rgb_to_ssd(0, v, 0)).1 >= unpack(rgb_to_ssd(0, v - 1, 0)).1);
            assert!(unpack(rgb_to_ssd(0, 0, v)).2 >= unpack(rgb_to_ssd(0, 0, v - 1)).2);
        }
    }

    #[test]
    fn output_is_row_major() {
        let pixels = vec![
            255, 0, 0, 0, 255, 0, // row 0
            0, 0, 255, 255, 255, 255, // row 1
            0, 0, 0, 255, 0, 0, // row 2
        ];
        let img = Image::from_raw(2, 3, PixelLayout::Rgb8, pixels).unwrap();

        let out = quantize(&img).unwrap();
        assert_eq!(out, [0xf800, 0x07e0, 0x001f, 0xffff, 0x0000, 0xf800]);
    }

    #[test]
    fn gray_image_is_unsupported() {
        let img = Image::from_raw(4, 4, PixelLayout::Gray8, vec![0; 16]).unwrap();
        let result = quantize(&img);
        assert!(matches!(
            result,
            Err(SsdError::UnsupportedFormat {
                layout: PixelLayout::Gray8
            })
        ));
    }

    #[test]
    fn sixteen_bit_image_is_unsupported() {
        let img = Image::from_raw(2, 2, PixelLayout::Rgb16, vec![0; 24]).unwrap();
        assert!(matches!(
            quantize(&img),
            Err(SsdError::UnsupportedFormat { .. })
        ));
    }
}
