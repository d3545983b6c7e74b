// Decoding of 16-color planar bitmap graphics into RGBA pixel buffers
use crate::common::{Palette, PixelBuffer};
use crate::error::DecodeError;

// Planar data comes in 8-pixel chunks, one byte per bit plane. Masked chunks
// carry a transparency plane ahead of the four color planes.
const MASKED_CHUNK_BYTES: usize = 5;
const OPAQUE_CHUNK_BYTES: usize = 4;

pub const SCREEN_WIDTH: u32 = 320;
pub const SCREEN_HEIGHT: u32 = 200;
const SCREEN_PLANE_BYTES: usize = (SCREEN_WIDTH as usize * SCREEN_HEIGHT as usize) / 8;
pub const SCREEN_DATA_BYTES: usize = SCREEN_PLANE_BYTES * 4;
const SCREEN_ROW_BYTES: usize = SCREEN_WIDTH as usize / 8;

// Byte length of one tile with the given dimensions.
pub const fn tile_bytes(width: u32, height: u32, has_mask: bool) -> usize {
    let chunk_bytes = if has_mask {
        MASKED_CHUNK_BYTES
    } else {
        OPAQUE_CHUNK_BYTES
    };
    height as usize * (width / 8) as usize * chunk_bytes
}

// Decode a planar tile or sprite frame. Chunk byte order is fixed:
// [mask,] blue, green, red, intensity. A zero mask bit leaves the pixel fully
// transparent; without a mask plane every pixel is opaque.
pub fn decode_tile(
    data: &[u8],
    width: u32,
    height: u32,
    has_mask: bool,
    palette: &Palette,
) -> Result<PixelBuffer, DecodeError> {
    assert!(
        width > 0 && width % 8 == 0,
        "tile width must be a positive multiple of 8"
    );
    assert!(height > 0, "tile height must be positive");

    let chunk_bytes = if has_mask {
        MASKED_CHUNK_BYTES
    } else {
        OPAQUE_CHUNK_BYTES
    };
    let chunks_per_row = (width / 8) as usize;
    let expected = tile_bytes(width, height, has_mask);
    if data.len() < expected {
        return Err(DecodeError::TruncatedData {
            width,
            height,
            expected,
            actual: data.len(),
        });
    }

    let mut out = PixelBuffer::new(width, height);
    let mut offset = 0;
    for y in 0..height as usize {
        for chunk in 0..chunks_per_row {
            let mask = if has_mask { data[offset] } else { 0xFF };
            let planes = if has_mask {
                &data[offset + 1..offset + 5]
            } else {
                &data[offset..offset + 4]
            };
            for i in 0..8 {
                // Bit 7 is the leftmost pixel of the chunk.
                let bit = 7 - i;
                if (mask >> bit) & 1 == 0 {
                    // Transparent pixel: RGBA stays zeroed.
                    continue;
                }
                let c0 = (planes[0] >> bit) & 1;
                let c1 = (planes[1] >> bit) & 1;
                let c2 = (planes[2] >> bit) & 1;
                let c3 = (planes[3] >> bit) & 1;
                let color = c0 | (c1 << 1) | (c2 << 2) | (c3 << 3);
                let (r, g, b) = palette.colors[color as usize];
                let px = (y * width as usize + chunk * 8 + i) * 4;
                out.data[px] = r;
                out.data[px + 1] = g;
                out.data[px + 2] = b;
                out.data[px + 3] = 0xFF;
            }
            offset += chunk_bytes;
        }
    }
    Ok(out)
}

// Decode a 320x200 full-screen image: four contiguous 8,000-byte planes in
// order blue, green, red, intensity. This format has no transparency plane.
pub fn decode_planar_screen(data: &[u8], palette: &Palette) -> Result<PixelBuffer, DecodeError> {
    if data.len() != SCREEN_DATA_BYTES {
        return Err(DecodeError::InvalidSize {
            expected: SCREEN_DATA_BYTES,
            actual: data.len(),
        });
    }

    let (blue, rest) = data.split_at(SCREEN_PLANE_BYTES);
    let (green, rest) = rest.split_at(SCREEN_PLANE_BYTES);
    let (red, intensity) = rest.split_at(SCREEN_PLANE_BYTES);

    let mut out = PixelBuffer::new(SCREEN_WIDTH, SCREEN_HEIGHT);
    for y in 0..SCREEN_HEIGHT as usize {
        for x in 0..SCREEN_WIDTH as usize {
            let byte = y * SCREEN_ROW_BYTES + x / 8;
            let bit = 7 - (x % 8);
            let c0 = (blue[byte] >> bit) & 1;
            let c1 = (green[byte] >> bit) & 1;
            let c2 = (red[byte] >> bit) & 1;
            let c3 = (intensity[byte] >> bit) & 1;
            let color = c0 | (c1 << 1) | (c2 << 2) | (c3 << 3);
            let (r, g, b) = palette.colors[color as usize];
            let px = (y * SCREEN_WIDTH as usize + x) * 4;
            out.data[px] = r;
            out.data[px + 1] = g;
            out.data[px + 2] = b;
            out.data[px + 3] = 0xFF;
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::EGA_COLORS;

    fn pixel(image: &PixelBuffer, x: usize, y: usize) -> (u8, u8, u8, u8) {
        let i = (y * image.width as usize + x) * 4;
        (
            image.data[i],
            image.data[i + 1],
            image.data[i + 2],
            image.data[i + 3],
        )
    }

    #[test]
    fn ega_palette_table() {
        assert_eq!(EGA_COLORS[0], (0, 0, 0));
        assert_eq!(EGA_COLORS[1], (0, 0, 170));
        assert_eq!(EGA_COLORS[14], (255, 255, 85));
        assert_eq!(EGA_COLORS[15], (255, 255, 255));
    }

    #[test]
    fn tile_blue_row() {
        // One 8x1 chunk: mask all-opaque, blue plane fully set.
        let data = [0xFF, 0xFF, 0x00, 0x00, 0x00];
        let image = decode_tile(&data, 8, 1, true, &Palette::default()).unwrap();
        assert_eq!(image.data.len(), 8 * 4);
        for x in 0..8 {
            assert_eq!(pixel(&image, x, 0), (0, 0, 170, 255));
        }
    }

    #[test]
    fn tile_mask_clears_chunk() {
        // Mask byte 0: all 8 pixels transparent no matter the color planes.
        let data = [0x00, 0xFF, 0xFF, 0xFF, 0xFF];
        let image = decode_tile(&data, 8, 1, true, &Palette::default()).unwrap();
        for x in 0..8 {
            assert_eq!(pixel(&image, x, 0), (0, 0, 0, 0));
        }
    }

    #[test]
    fn tile_partial_mask() {
        // Mask 0xF0: left four pixels opaque, right four transparent.
        let data = [0xF0, 0xFF, 0x00, 0x00, 0x00];
        let image = decode_tile(&data, 8, 1, true, &Palette::default()).unwrap();
        for x in 0..4 {
            assert_eq!(pixel(&image, x, 0), (0, 0, 170, 255));
        }
        for x in 4..8 {
            assert_eq!(pixel(&image, x, 0), (0, 0, 0, 0));
        }
    }

    #[test]
    fn tile_without_mask_is_opaque() {
        let data = [0x00, 0x00, 0x00, 0x00];
        let image = decode_tile(&data, 8, 1, false, &Palette::default()).unwrap();
        for x in 0..8 {
            assert_eq!(pixel(&image, x, 0), (0, 0, 0, 255));
        }
    }

    #[test]
    fn tile_combines_all_planes() {
        // All four color planes set: index 15 (white).
        let data = [0xFF; 5];
        let image = decode_tile(&data, 8, 1, true, &Palette::default()).unwrap();
        assert_eq!(pixel(&image, 0, 0), (255, 255, 255, 255));
        assert_eq!(pixel(&image, 7, 0), (255, 255, 255, 255));
    }

    #[test]
    fn tile_bit7_is_leftmost() {
        // Only bit 7 set in the green plane: pixel 0 green, pixel 1 black.
        let data = [0xFF, 0x00, 0x80, 0x00, 0x00];
        let image = decode_tile(&data, 8, 1, true, &Palette::default()).unwrap();
        assert_eq!(pixel(&image, 0, 0), (0, 170, 0, 255));
        assert_eq!(pixel(&image, 1, 0), (0, 0, 0, 255));
    }

    #[test]
    fn tile_16x16_layout() {
        // 16 rows of 2 chunks of 5 bytes. Second chunk of the first row set
        // to red, everything else transparent.
        let mut data = vec![0u8; tile_bytes(16, 16, true)];
        data[5] = 0xFF; // mask
        data[8] = 0xFF; // red plane
        let image = decode_tile(&data, 16, 16, true, &Palette::default()).unwrap();
        assert_eq!(image.data.len(), 16 * 16 * 4);
        assert_eq!(pixel(&image, 0, 0), (0, 0, 0, 0));
        assert_eq!(pixel(&image, 8, 0), (170, 0, 0, 255));
        assert_eq!(pixel(&image, 15, 0), (170, 0, 0, 255));
        assert_eq!(pixel(&image, 8, 1), (0, 0, 0, 0));
    }

    #[test]
    fn tile_truncated() {
        let data = [0xFF; 100];
        let err = decode_tile(&data, 16, 16, true, &Palette::default()).unwrap_err();
        assert_eq!(
            err,
            DecodeError::TruncatedData {
                width: 16,
                height: 16,
                expected: 160,
                actual: 100
            }
        );
    }

    #[test]
    fn tile_decode_is_pure() {
        let data = [0xA5, 0x12, 0x34, 0x56, 0x78];
        let pal = Palette::default();
        let a = decode_tile(&data, 8, 1, true, &pal).unwrap();
        let b = decode_tile(&data, 8, 1, true, &pal).unwrap();
        assert_eq!(a.data, b.data);
    }

    #[test]
    fn tile_palette_substitution() {
        let mut pal = Palette::default();
        pal.colors[1] = (1, 2, 3);
        let data = [0xFF, 0xFF, 0x00, 0x00, 0x00];
        let image = decode_tile(&data, 8, 1, true, &pal).unwrap();
        assert_eq!(pixel(&image, 0, 0), (1, 2, 3, 255));
    }

    #[test]
    fn screen_all_zero() {
        let data = vec![0u8; SCREEN_DATA_BYTES];
        let image = decode_planar_screen(&data, &Palette::default()).unwrap();
        assert_eq!(image.width, 320);
        assert_eq!(image.height, 200);
        assert_eq!(image.data.len(), 320 * 200 * 4);
        for px in image.data.chunks(4) {
            assert_eq!(px, [0, 0, 0, 255]);
        }
    }

    #[test]
    fn screen_wrong_size() {
        let err = decode_planar_screen(&[0u8; 100], &Palette::default()).unwrap_err();
        assert_eq!(
            err,
            DecodeError::InvalidSize {
                expected: 32000,
                actual: 100
            }
        );
    }

    #[test]
    fn screen_plane_addressing() {
        // Set the intensity bit of pixel (13, 7): plane byte 7*40 + 1, bit 2.
        let mut data = vec![0u8; SCREEN_DATA_BYTES];
        data[3 * SCREEN_PLANE_BYTES + 7 * SCREEN_ROW_BYTES + 1] = 1 << 2;
        let image = decode_planar_screen(&data, &Palette::default()).unwrap();
        // Intensity alone is color index 8 (dark gray).
        assert_eq!(pixel(&image, 13, 7), (85, 85, 85, 255));
        assert_eq!(pixel(&image, 12, 7), (0, 0, 0, 255));
        assert_eq!(pixel(&image, 14, 7), (0, 0, 0, 255));
    }
}
