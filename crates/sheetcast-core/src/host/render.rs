//! Raster preview of a cell grid.
//!
//! In-process hosts have no UI to photograph, so "copy as picture" draws the
//! selection instead: a gridded sheet with greeked cell contents (a bar
//! standing in for each cell's text, sized by its length).

use image::{Rgba, RgbaImage};
use sheetcast_engine::{CellGrid, CellValue};

pub const CELL_WIDTH: u32 = 64;
pub const CELL_HEIGHT: u32 = 20;

const MAX_ROWS: usize = 2_000;
const MAX_COLS: usize = 256;

const PADDING: u32 = 4;
const GLYPH_WIDTH: u32 = 6;
const BAR_HEIGHT: u32 = 6;

const BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);
const GRID_LINE: Rgba<u8> = Rgba([218, 220, 224, 255]);
const TEXT_BAR: Rgba<u8> = Rgba([60, 64, 67, 255]);
const NUMBER_BAR: Rgba<u8> = Rgba([26, 115, 232, 255]);

/// Render a grid as a picture. Text is left-aligned and numbers are
/// right-aligned, as a spreadsheet shows them. Returns a zero-sized image
/// for an empty grid.
pub fn render_snapshot(grid: &CellGrid) -> RgbaImage {
    let rows = grid.rows().min(MAX_ROWS) as u32;
    let cols = grid.cols().min(MAX_COLS) as u32;
    if rows == 0 || cols == 0 {
        return RgbaImage::new(0, 0);
    }

    let width = cols * CELL_WIDTH + 1;
    let height = rows * CELL_HEIGHT + 1;
    let mut image = RgbaImage::from_pixel(width, height, BACKGROUND);

    for x in (0..width).step_by(CELL_WIDTH as usize) {
        for y in 0..height {
            image.put_pixel(x, y, GRID_LINE);
        }
    }
    for y in (0..height).step_by(CELL_HEIGHT as usize) {
        for x in 0..width {
            image.put_pixel(x, y, GRID_LINE);
        }
    }

    for (r, row) in grid.iter_rows().take(rows as usize).enumerate() {
        for (c, cell) in row.iter().take(cols as usize).enumerate() {
            let (color, right_aligned) = match cell {
                CellValue::Empty => continue,
                CellValue::Text(s) if s.is_empty() => continue,
                CellValue::Text(_) => (TEXT_BAR, false),
                CellValue::Number(_) => (NUMBER_BAR, true),
            };
            let chars = cell.display().chars().count() as u32;
            let bar = (chars * GLYPH_WIDTH).clamp(GLYPH_WIDTH, CELL_WIDTH - 2 * PADDING);

            let left = c as u32 * CELL_WIDTH;
            let top = r as u32 * CELL_HEIGHT;
            let x0 = if right_aligned {
                left + CELL_WIDTH - PADDING - bar
            } else {
                left + PADDING
            };
            let y0 = top + (CELL_HEIGHT - BAR_HEIGHT) / 2;
            for y in y0..y0 + BAR_HEIGHT {
                for x in x0..x0 + bar {
                    image.put_pixel(x, y, color);
                }
            }
        }
    }

    image
}
