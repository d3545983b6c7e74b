use crate::graphics::{self, SCREEN_DATA_BYTES};
use crate::level::LEVEL_GRID_BYTES;

const MASKED_TILE_BYTES: usize = graphics::tile_bytes(16, 16, true);
const OPAQUE_TILE_BYTES: usize = graphics::tile_bytes(16, 16, false);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    // 320x200 full-screen planar image
    FullScreen,
    // Consecutive fixed-size planar tiles
    TileSet {
        tile_width: u32,
        tile_height: u32,
        masked: bool,
    },
    // Level file with a trailing 128x90 cell grid
    Level,
}

// Best-effort classification by file size alone. Precedence matters: a
// 32,000-byte file is also a multiple of 160 and 128, and any file big enough
// to hold a grid is taken as a level. Ambiguous files can be decoded through
// the explicit per-format commands instead.
pub fn sniff(len: usize) -> Option<AssetKind> {
    if len == SCREEN_DATA_BYTES {
        Some(AssetKind::FullScreen)
    } else if len >= LEVEL_GRID_BYTES {
        Some(AssetKind::Level)
    } else if len > 0 && len % MASKED_TILE_BYTES == 0 {
        Some(AssetKind::TileSet {
            tile_width: 16,
            tile_height: 16,
            masked: true,
        })
    } else if len > 0 && len % OPAQUE_TILE_BYTES == 0 {
        Some(AssetKind::TileSet {
            tile_width: 16,
            tile_height: 16,
            masked: false,
        })
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn screen_size_wins() {
        assert_eq!(sniff(32_000), Some(AssetKind::FullScreen));
    }

    #[test]
    fn level_floor() {
        assert_eq!(sniff(23_040), Some(AssetKind::Level));
        assert_eq!(sniff(23_040 + 771), Some(AssetKind::Level));
    }

    #[test]
    fn masked_tiles() {
        assert_eq!(
            sniff(160 * 50),
            Some(AssetKind::TileSet {
                tile_width: 16,
                tile_height: 16,
                masked: true,
            })
        );
    }

    #[test]
    fn unmasked_tiles() {
        assert_eq!(
            sniff(128 * 3),
            Some(AssetKind::TileSet {
                tile_width: 16,
                tile_height: 16,
                masked: false,
            })
        );
    }

    #[test]
    fn masked_beats_unmasked_when_both_divide() {
        // 640 = 4 * 160 = 5 * 128
        assert_eq!(
            sniff(640),
            Some(AssetKind::TileSet {
                tile_width: 16,
                tile_height: 16,
                masked: true,
            })
        );
    }

    #[test]
    fn unrecognized() {
        assert_eq!(sniff(0), None);
        assert_eq!(sniff(7), None);
        assert_eq!(sniff(161), None);
    }
}
