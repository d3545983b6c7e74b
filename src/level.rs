// Decoding of level files into a fixed 128x90 grid of tile/sprite cells
use std::sync::Mutex;

use once_cell::sync::Lazy;
use serde::Serialize;

use crate::error::DecodeError;

pub const LEVEL_WIDTH: u32 = 128;
pub const LEVEL_HEIGHT: u32 = 90;
pub const LEVEL_CELLS: usize = (LEVEL_WIDTH * LEVEL_HEIGHT) as usize;
pub const LEVEL_GRID_BYTES: usize = LEVEL_CELLS * 2;

// Cells at or above this value are sprite identifiers, stored as-is. Cells
// below it are tile memory offsets (tile index * 32).
pub const SPRITE_ID_MIN: u16 = 0x3000;
const TILE_OFFSET_STEP: u16 = 32;

#[derive(Clone, Serialize, Debug)]
pub struct LevelGrid {
    pub name: String,
    pub grid: Vec<u16>,
    pub width: u32,
    pub height: u32,
}

impl LevelGrid {
    // The same test consumers must apply to tell cell kinds apart.
    pub fn is_sprite(value: u16) -> bool {
        value >= SPRITE_ID_MIN
    }
}

static LAST_LOADED: Lazy<Mutex<Option<LevelGrid>>> = Lazy::new(|| Mutex::new(None));

// Most recently loaded grid, last-write-wins under concurrent loads. Callers
// needing determinism should use the value returned by load_level instead.
pub fn last_loaded() -> Option<LevelGrid> {
    LAST_LOADED.lock().unwrap().clone()
}

pub fn load_level(name: &str, raw: &[u8]) -> Result<LevelGrid, DecodeError> {
    if raw.len() < LEVEL_GRID_BYTES {
        return Err(DecodeError::FileTooSmall {
            expected: LEVEL_GRID_BYTES,
            actual: raw.len(),
        });
    }

    // The variable-length header is not interpreted; the grid is always the
    // trailing 23,040 bytes of the file.
    let grid_start = raw.len() - LEVEL_GRID_BYTES;
    let mut grid = Vec::with_capacity(LEVEL_CELLS);
    for i in 0..LEVEL_CELLS {
        let offset = grid_start + i * 2;
        let value = raw[offset] as u16 | (raw[offset + 1] as u16) << 8;
        if LevelGrid::is_sprite(value) {
            grid.push(value);
        } else {
            // Truncating integer division; offsets are multiples of 32 in
            // well-formed data, but odd values must round down.
            grid.push(value / TILE_OFFSET_STEP);
        }
    }

    let level = LevelGrid {
        name: name.to_string(),
        grid,
        width: LEVEL_WIDTH,
        height: LEVEL_HEIGHT,
    };
    *LAST_LOADED.lock().unwrap() = Some(level.clone());
    Ok(level)
}
