//! PNG preview sheets of scaled tiles.

use anyhow::{Context, Result};
use std::path::Path;
use tilescale::assemble::AssembledTile;

/// Side length of a scaled tile in pixels.
const TILE_PIXELS: usize = 16;

/// Largest sheet written, in pixels (one byte each).
const MAX_SHEET_PIXELS: usize = 1 << 28;

/// Write all tiles as a grid on a white background, foreground in black.
pub fn write_sheet_png(
    tiles: &[AssembledTile<'_>],
    scale: usize,
    spacing: usize,
    columns: usize,
    path: &Path,
) -> Result<()> {
    anyhow::ensure!(scale > 0, "scale must be at least 1");
    anyhow::ensure!(!tiles.is_empty(), "no tiles to render");

    let cols = columns.clamp(1, tiles.len());
    let rows = tiles.len().div_ceil(cols);

    let too_large =
        || anyhow::anyhow!("sheet size overflows at scale {scale}, spacing {spacing}");
    let cell = TILE_PIXELS.checked_mul(scale).ok_or_else(too_large)?;
    let spacing_px = spacing.checked_mul(scale).ok_or_else(too_large)?;

    // Spacing also runs along the outer edges.
    let extent = |count: usize| -> Option<usize> {
        count
            .checked_mul(cell)?
            .checked_add((count + 1).checked_mul(spacing_px)?)
    };
    let img_width = extent(cols).ok_or_else(too_large)?;
    let img_height = extent(rows).ok_or_else(too_large)?;
    anyhow::ensure!(
        u32::try_from(img_width).is_ok() && u32::try_from(img_height).is_ok(),
        "sheet of {}x{} pixels is too large for PNG",
        img_width,
        img_height
    );
    let area = img_width.checked_mul(img_height).ok_or_else(too_large)?;
    anyhow::ensure!(
        area <= MAX_SHEET_PIXELS,
        "sheet of {}x{} pixels is too large, limit is {} pixels",
        img_width,
        img_height,
        MAX_SHEET_PIXELS
    );

    let mut pixels = vec![255u8; area];

    for (idx, t) in tiles.iter().enumerate() {
        let x_off = spacing_px + (idx % cols) * (cell + spacing_px);
        let y_off = spacing_px + (idx / cols) * (cell + spacing_px);

        for y in 0..TILE_PIXELS {
            for x in 0..TILE_PIXELS {
                if !t.tile.pixel(x, y) {
                    continue;
                }
                let ox = x_off + x * scale;
                let oy = y_off + y * scale;
                for sy in 0..scale {
                    let row = (oy + sy) * img_width;
                    pixels[row + ox..row + ox + scale].fill(0);
                }
            }
        }
    }

    write_grayscale_png(path, &pixels, img_width, img_height)
}

fn write_grayscale_png(path: &Path, pixels: &[u8], width: usize, height: usize) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    let w = std::io::BufWriter::new(file);

    let mut encoder = png::Encoder::new(w, width as u32, height as u32);
    encoder.set_color(png::ColorType::Grayscale);
    encoder.set_depth(png::BitDepth::Eight);

    let mut writer = encoder
        .write_header()
        .with_context(|| format!("writing PNG header for {}", path.display()))?;
    writer
        .write_image_data(pixels)
        .with_context(|| format!("writing PNG data for {}", path.display()))?;

    Ok(())
}
