use serde::{Deserialize, Serialize};

pub type ColorValue = u8; // Color channel value (0-255)
pub type ColorIdx = u8; // Index into 16-color palette (0-15)

pub type ColorRGB = (ColorValue, ColorValue, ColorValue);

// The standard 16-color EGA palette, indexed by IRGB bits
// (intensity = 8, red = 4, green = 2, blue = 1).
pub const EGA_COLORS: [ColorRGB; 16] = [
    (0, 0, 0),       // black
    (0, 0, 170),     // blue
    (0, 170, 0),     // green
    (0, 170, 170),   // cyan
    (170, 0, 0),     // red
    (170, 0, 170),   // magenta
    (170, 85, 0),    // brown
    (170, 170, 170), // light gray
    (85, 85, 85),    // dark gray
    (85, 85, 255),   // light blue
    (85, 255, 85),   // light green
    (85, 255, 255),  // light cyan
    (255, 85, 85),   // light red
    (255, 85, 255),  // light magenta
    (255, 255, 85),  // yellow
    (255, 255, 255), // white
];

#[derive(Serialize, Deserialize, Clone)]
pub struct Palette {
    pub name: String,
    pub colors: [ColorRGB; 16],
}

impl Default for Palette {
    fn default() -> Self {
        Palette {
            name: "EGA".to_string(),
            colors: EGA_COLORS,
        }
    }
}

// Decoded image: RGBA, 4 bytes per pixel, row-major.
#[derive(Debug)]
pub struct PixelBuffer {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl PixelBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        PixelBuffer {
            data: vec![0; width as usize * height as usize * 4],
            width,
            height,
        }
    }
}
