use std::{
    fs,
    io::BufWriter,
    path::Path,
};

use anyhow::{Context, Result};
use itertools::Itertools;
use json_pretty_compact::PrettyCompactFormatter;
use log::info;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{json, Serializer};

use crate::common::{Palette, PixelBuffer};
use crate::level::LevelGrid;

fn save_json<T: Serialize>(path: &Path, data: &T) -> Result<()> {
    info!("Saving {}", path.display());
    let formatter = PrettyCompactFormatter::new();
    let mut data_bytes = vec![];
    let mut ser = Serializer::with_formatter(&mut data_bytes, formatter);
    data.serialize(&mut ser).unwrap();
    fs::create_dir_all(path.parent().context("invalid parent directory")?)?;
    fs::write(path, &data_bytes)?;
    Ok(())
}

fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    info!("Loading {}", path.display());
    let data_bytes = std::fs::read(path)?;
    let data: T = serde_json::from_slice(&data_bytes)?;
    Ok(data)
}

// Raw bytes of one asset file, read in full before any decoding happens.
pub fn read_asset(path: &Path) -> Result<Vec<u8>> {
    info!("Reading {}", path.display());
    let data = fs::read(path).with_context(|| format!("unable to read {}", path.display()))?;
    Ok(data)
}

// A replacement 16-color table, swapped in for the built-in EGA palette.
pub fn load_palette(path: &Path) -> Result<Palette> {
    let pal: Palette = load_json(path)
        .with_context(|| format!("unable to load palette from {}", path.display()))?;
    Ok(pal)
}

pub fn save_png(path: &Path, image: &PixelBuffer) -> Result<()> {
    info!("Saving {}", path.display());
    fs::create_dir_all(path.parent().context("invalid parent directory")?)?;
    let file = fs::File::create(path)?;
    let mut encoder = png::Encoder::new(BufWriter::new(file), image.width, image.height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(&image.data)?;
    Ok(())
}

pub fn save_level_json(path: &Path, level: &LevelGrid) -> Result<()> {
    let rows = level
        .grid
        .chunks(level.width as usize)
        .map(|row| row.to_vec())
        .collect_vec();
    save_json(
        path,
        &json!({
            "name": level.name,
            "width": level.width,
            "height": level.height,
            "rows": rows,
        }),
    )
}
