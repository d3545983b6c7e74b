use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use itertools::Itertools;
use log::{error, info, warn};

use ega_asset_viewer::{
    catalog::{self, AssetKind},
    common::{Palette, PixelBuffer},
    graphics, level, persist,
};

#[derive(Parser, Debug)]
#[command(about = "Decode EGA planar graphics and level grids to PNG/JSON")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Decode a 320x200 full-screen planar image to PNG
    Screen {
        file: PathBuf,
        #[arg(long)]
        out: PathBuf,
        /// JSON file with a replacement 16-color palette
        #[arg(long)]
        palette: Option<PathBuf>,
    },
    /// Decode a planar tile set to a PNG sheet
    Tiles {
        file: PathBuf,
        #[arg(long)]
        out: PathBuf,
        #[arg(long, default_value_t = 16)]
        tile_width: u32,
        #[arg(long, default_value_t = 16)]
        tile_height: u32,
        /// Tiles carry no transparency plane (4 bytes per chunk)
        #[arg(long)]
        no_mask: bool,
        /// Tiles per row in the output sheet
        #[arg(long, default_value_t = 16)]
        columns: u32,
        #[arg(long)]
        palette: Option<PathBuf>,
    },
    /// Decode a level file to JSON
    Level {
        file: PathBuf,
        #[arg(long)]
        out: PathBuf,
    },
    /// Classify and export every recognized file in a directory
    Scan {
        dir: PathBuf,
        #[arg(long)]
        out: PathBuf,
        #[arg(long)]
        palette: Option<PathBuf>,
    },
}

fn active_palette(path: &Option<PathBuf>) -> Result<Palette> {
    match path {
        Some(p) => {
            let pal = persist::load_palette(p)?;
            info!("Using palette \"{}\"", pal.name);
            Ok(pal)
        }
        None => Ok(Palette::default()),
    }
}

fn asset_name(path: &Path) -> String {
    match path.file_stem() {
        Some(stem) => stem.to_string_lossy().to_string(),
        None => "asset".to_string(),
    }
}

fn export_screen(file: &Path, out: &Path, palette: &Palette) -> Result<()> {
    let data = persist::read_asset(file)?;
    let image = graphics::decode_planar_screen(&data, palette)?;
    persist::save_png(out, &image)
}

fn export_tiles(
    file: &Path,
    out: &Path,
    tile_width: u32,
    tile_height: u32,
    has_mask: bool,
    columns: u32,
    palette: &Palette,
) -> Result<()> {
    let data = persist::read_asset(file)?;
    let tile_bytes = graphics::tile_bytes(tile_width, tile_height, has_mask);
    let chunks = data.chunks_exact(tile_bytes);
    if !chunks.remainder().is_empty() {
        warn!(
            "{}: ignoring {} trailing bytes (not a whole tile)",
            file.display(),
            chunks.remainder().len()
        );
    }
    let mut tiles = vec![];
    for chunk in chunks {
        tiles.push(graphics::decode_tile(
            chunk,
            tile_width,
            tile_height,
            has_mask,
            palette,
        )?);
    }
    if tiles.is_empty() {
        bail!("{}: no complete tiles to decode", file.display());
    }
    info!("Decoded {} tiles from {}", tiles.len(), file.display());
    let sheet = tile_sheet(&tiles, columns);
    persist::save_png(out, &sheet)
}

// Compose decoded tiles into one sheet image, left-to-right, top-to-bottom.
fn tile_sheet(tiles: &[PixelBuffer], columns: u32) -> PixelBuffer {
    let tile_width = tiles[0].width;
    let tile_height = tiles[0].height;
    let columns = columns.clamp(1, tiles.len() as u32);
    let rows = (tiles.len() as u32).div_ceil(columns);
    let mut sheet = PixelBuffer::new(tile_width * columns, tile_height * rows);
    let row_bytes = (tile_width * 4) as usize;
    for (i, tile) in tiles.iter().enumerate() {
        let ox = (i as u32 % columns) * tile_width;
        let oy = (i as u32 / columns) * tile_height;
        for y in 0..tile_height {
            let src = y as usize * row_bytes;
            let dst = (((oy + y) * sheet.width + ox) * 4) as usize;
            sheet.data[dst..dst + row_bytes].copy_from_slice(&tile.data[src..src + row_bytes]);
        }
    }
    sheet
}

fn export_level(file: &Path, out: &Path) -> Result<()> {
    let data = persist::read_asset(file)?;
    let grid = level::load_level(&asset_name(file), &data)?;
    persist::save_level_json(out, &grid)
}

fn scan(dir: &Path, out: &Path, palette: &Palette) -> Result<()> {
    let pattern = format!("{}/*", dir.display());
    let mut exported = 0;
    let mut failed = 0;
    for path in glob::glob(&pattern)?.flatten().sorted() {
        if !path.is_file() {
            continue;
        }
        let len = fs_len(&path)?;
        let Some(kind) = catalog::sniff(len) else {
            info!("{}: unrecognized size {}, skipping", path.display(), len);
            continue;
        };
        let name = asset_name(&path);
        let result = match kind {
            AssetKind::FullScreen => export_screen(&path, &out.join(format!("{name}.png")), palette),
            AssetKind::TileSet {
                tile_width,
                tile_height,
                masked,
            } => export_tiles(
                &path,
                &out.join(format!("{name}.png")),
                tile_width,
                tile_height,
                masked,
                16,
                palette,
            ),
            AssetKind::Level => export_level(&path, &out.join(format!("{name}.json"))),
        };
        match result {
            Ok(()) => exported += 1,
            Err(e) => {
                error!("{}: {:#}", path.display(), e);
                failed += 1;
            }
        }
    }
    info!("Exported {} assets ({} failed)", exported, failed);
    if exported == 0 {
        bail!("no recognized assets in {}", dir.display());
    }
    Ok(())
}

fn fs_len(path: &Path) -> Result<usize> {
    Ok(std::fs::metadata(path)?.len() as usize)
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    match args.command {
        Command::Screen { file, out, palette } => {
            let pal = active_palette(&palette)?;
            export_screen(&file, &out, &pal)
        }
        Command::Tiles {
            file,
            out,
            tile_width,
            tile_height,
            no_mask,
            columns,
            palette,
        } => {
            let pal = active_palette(&palette)?;
            export_tiles(&file, &out, tile_width, tile_height, !no_mask, columns, &pal)
        }
        Command::Level { file, out } => export_level(&file, &out),
        Command::Scan { dir, out, palette } => {
            let pal = active_palette(&palette)?;
            scan(&dir, &out, &pal)
        }
    }
}
