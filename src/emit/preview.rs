// src/emit/preview.rs

//! PNG contact sheet of packed glyphs, 16 per row on a dark background.

use crate::glyph::PackedGlyph;
use crate::search::FontPlan;
use anyhow::{Context, Result};
use image::{Rgba, RgbaImage};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

pub const PREVIEW_COLUMNS: usize = 16;
pub const PREVIEW_MARGIN: usize = 4;
pub const PREVIEW_BACKGROUND: Rgba<u8> = Rgba([30, 30, 30, 255]);

/// Display colour for a reconstructed intensity; `None` lets the
/// background show through.
fn preview_color(intensity: u8) -> Option<Rgba<u8>> {
    match intensity {
        220..=255 => Some(Rgba([255, 255, 255, 255])),
        150..=219 => Some(Rgba([255, 0, 0, 255])),
        80..=149 => Some(Rgba([200, 200, 200, 255])),
        _ => None,
    }
}

/// Sheet size for `count` cells of `cell_width × cell_height`.
pub fn sheet_size(count: usize, cell_width: usize, cell_height: usize) -> (u32, u32) {
    let rows = count.div_ceil(PREVIEW_COLUMNS);
    let width = PREVIEW_COLUMNS * (cell_width + PREVIEW_MARGIN) + PREVIEW_MARGIN;
    let height = rows * (cell_height + PREVIEW_MARGIN) + PREVIEW_MARGIN;
    (width as u32, height as u32)
}

pub fn compose_preview(glyphs: &[PackedGlyph], cell_width: usize, cell_height: usize) -> RgbaImage {
    let (width, height) = sheet_size(glyphs.len(), cell_width, cell_height);
    let mut sheet = RgbaImage::from_pixel(width, height, PREVIEW_BACKGROUND);

    for (index, glyph) in glyphs.iter().enumerate() {
        let origin_x = PREVIEW_MARGIN + (index % PREVIEW_COLUMNS) * (cell_width + PREVIEW_MARGIN);
        let origin_y = PREVIEW_MARGIN + (index / PREVIEW_COLUMNS) * (cell_height + PREVIEW_MARGIN);
        let intensities = glyph.intensities();

        for y in 0..glyph.height.min(cell_height) {
            for x in 0..glyph.width.min(cell_width) {
                if let Some(color) = preview_color(intensities[y * glyph.width + x]) {
                    sheet.put_pixel((origin_x + x) as u32, (origin_y + y) as u32, color);
                }
            }
        }
    }
    sheet
}

pub fn preview_file_name(width: usize, height: usize, plan: &FontPlan) -> String {
    match plan.axes {
        Some(axes) => format!(
            "preview_{}x{}_size{}_wdth{}_wght{}.png",
            width,
            height,
            plan.pixel_size,
            axes.width.round() as i32,
            axes.weight.round() as i32
        ),
        None => format!("preview_{}x{}_size{}.png", width, height, plan.pixel_size),
    }
}

/// Compose and save the sheet into `dir`, returning the file path.
pub fn save_preview(
    dir: &Path,
    plan: &FontPlan,
    glyphs: &[PackedGlyph],
    cell_width: usize,
    cell_height: usize,
) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create preview directory {}", dir.display()))?;
    let path = dir.join(preview_file_name(cell_width, cell_height, plan));
    compose_preview(glyphs, cell_width, cell_height)
        .save(&path)
        .with_context(|| format!("Failed to save preview {}", path.display()))?;
    info!("PreviewEmitter: saved {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quantize::pack_nibbles;
    use crate::rasterizer::AxisCoords;

    fn glyph(ch: char, levels: &[u8], width: usize, height: usize) -> PackedGlyph {
        PackedGlyph::new(ch, width, height, pack_nibbles(levels))
    }

    #[test_log::test]
    fn test_sheet_dimensions_follow_grid() {
        assert_eq!(sheet_size(13, 12, 24), (16 * 16 + 4, 28 + 4));
        assert_eq!(sheet_size(16, 8, 16), (16 * 12 + 4, 20 + 4));
        assert_eq!(sheet_size(17, 8, 16), (16 * 12 + 4, 2 * 20 + 4));

        let glyphs: Vec<PackedGlyph> = "0123456789- :0123"
            .chars()
            .map(|ch| glyph(ch, &[0; 8 * 16], 8, 16))
            .collect();
        let image = compose_preview(&glyphs, 8, 16);
        assert_eq!(image.dimensions(), (196, 44));
    }

    #[test_log::test]
    fn test_levels_map_to_preview_colours() {
        let g = glyph('0', &[0xF, 0x8, 0x7, 0x0], 2, 2);
        let image = compose_preview(&[g], 2, 2);
        assert_eq!(*image.get_pixel(4, 4), Rgba([255, 255, 255, 255]));
        assert_eq!(*image.get_pixel(5, 4), Rgba([200, 200, 200, 255]));
        assert_eq!(*image.get_pixel(4, 5), Rgba([200, 200, 200, 255]));
        assert_eq!(*image.get_pixel(5, 5), PREVIEW_BACKGROUND);
        assert_eq!(*image.get_pixel(0, 0), PREVIEW_BACKGROUND);
    }

    #[test_log::test]
    fn test_mid_intensities_are_red() {
        assert_eq!(preview_color(0xA * 17), Some(Rgba([255, 0, 0, 255])));
        assert_eq!(preview_color(0x4 * 17), None);
    }

    #[test_log::test]
    fn test_second_cell_is_offset() {
        let glyphs = vec![glyph('0', &[0x0; 4], 2, 2), glyph('1', &[0xF; 4], 2, 2)];
        let image = compose_preview(&glyphs, 2, 2);
        assert_eq!(*image.get_pixel(4, 4), PREVIEW_BACKGROUND);
        assert_eq!(*image.get_pixel(10, 4), Rgba([255, 255, 255, 255]));
    }

    #[test_log::test]
    fn test_preview_file_names() {
        let plain = FontPlan {
            pixel_size: 20,
            axes: None,
        };
        assert_eq!(preview_file_name(12, 24, &plain), "preview_12x24_size20.png");
        let varied = FontPlan {
            pixel_size: 14,
            axes: Some(AxisCoords::new(70.0, 300.0)),
        };
        assert_eq!(
            preview_file_name(8, 16, &varied),
            "preview_8x16_size14_wdth70_wght300.png"
        );
    }
}
