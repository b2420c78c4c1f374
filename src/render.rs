//! Board rendering
//!
//! Draws the current state of a [`GridEngine`]: cell backgrounds, every tile
//! at its animated position and scale, and the score line. Purely read-only
//! with respect to the game.
//!
//! ```rust
//! let renderer = BoardRenderer::new(layout);
//! renderer.render(&mut canvas, &engine)?;
//! ```

use crate::board::{GridEngine, Tile};
use crate::config::GRID_SIZE;
use crate::layout::BoardLayout;
use crate::text::{draw_simple_text, draw_text_centered, text_width, GLYPH_HEIGHT};
use sdl2::pixels::Color;
use sdl2::rect::Rect;
use sdl2::render::Canvas;
use sdl2::video::Window;

/// Largest font pixel size used for tile values (35px tall glyphs on a 90px tile)
const MAX_VALUE_SCALE: u32 = 5;

/// Share of the tile width a value's text may occupy
const VALUE_WIDTH_RATIO: f32 = 0.8;

/// Background colour of a tile holding `value`; anything past 2048 reuses the 2048 colour
pub fn tile_color(value: u32) -> Color {
    match value {
        2 => Color::RGB(238, 228, 218),
        4 => Color::RGB(237, 224, 200),
        8 => Color::RGB(242, 177, 121),
        16 => Color::RGB(245, 149, 99),
        32 => Color::RGB(246, 124, 95),
        64 => Color::RGB(246, 94, 59),
        128 => Color::RGB(237, 207, 114),
        256 => Color::RGB(237, 204, 97),
        512 => Color::RGB(237, 200, 80),
        1024 => Color::RGB(237, 197, 63),
        _ => Color::RGB(237, 194, 46),
    }
}

/// Font pixel size for a value's text on a tile `tile_px` wide, 0 if it would be unreadable
pub fn value_text_scale(value: u32, tile_px: f32) -> u32 {
    let unit_width = text_width(&value.to_string(), 1) as f32;
    let fit = (tile_px * VALUE_WIDTH_RATIO / unit_width).floor() as u32;
    fit.min(MAX_VALUE_SCALE)
}

#[derive(Debug, Clone)]
pub struct BoardStyle {
    pub background_color: Color,
    pub empty_cell_color: Color,
    /// Text on 2 and 4 tiles, and the score
    pub dark_text_color: Color,
    /// Text on every tile from 8 upward
    pub light_text_color: Color,
    pub score_position: (i32, i32),
    pub score_scale: u32,
}

impl Default for BoardStyle {
    fn default() -> Self {
        BoardStyle {
            background_color: Color::RGB(187, 173, 160),
            empty_cell_color: Color::RGB(205, 193, 180),
            dark_text_color: Color::RGB(119, 110, 101),
            light_text_color: Color::RGB(249, 246, 242),
            score_position: (20, 10),
            score_scale: 4,
        }
    }
}

pub struct BoardRenderer {
    layout: BoardLayout,
    style: BoardStyle,
}

impl BoardRenderer {
    pub fn new(layout: BoardLayout) -> Self {
        BoardRenderer {
            layout,
            style: BoardStyle::default(),
        }
    }

    /// Clear the frame and draw the whole board plus score
    pub fn render(&self, canvas: &mut Canvas<Window>, engine: &GridEngine) -> Result<(), String> {
        canvas.set_draw_color(self.style.background_color);
        canvas.clear();

        self.render_cells(canvas)?;
        for tile in engine.tiles() {
            self.render_tile(canvas, tile)?;
        }
        self.render_score(canvas, engine.score())
    }

    fn render_cells(&self, canvas: &mut Canvas<Window>) -> Result<(), String> {
        let size = self.layout.tile_size;
        canvas.set_draw_color(self.style.empty_cell_color);
        for row in 0..GRID_SIZE {
            for col in 0..GRID_SIZE {
                let origin = self.layout.cell_origin(row, col);
                canvas.fill_rect(Rect::new(origin.x as i32, origin.y as i32, size, size))?;
            }
        }
        Ok(())
    }

    /// Draw one tile centred on its animated position, sized by its scale
    fn render_tile(&self, canvas: &mut Canvas<Window>, tile: &Tile) -> Result<(), String> {
        let visual = &tile.visual;
        let origin = visual
            .position
            .unwrap_or_else(|| self.layout.cell_origin(tile.row, tile.col));

        let full = self.layout.tile_size as f32;
        let size = full * visual.scale;
        if size < 1.0 {
            return Ok(());
        }

        let center_x = origin.x + full / 2.0;
        let center_y = origin.y + full / 2.0;
        let half = size / 2.0;

        canvas.set_draw_color(tile_color(tile.value));
        canvas.fill_rect(Rect::new(
            (center_x - half).round() as i32,
            (center_y - half).round() as i32,
            size.round() as u32,
            size.round() as u32,
        ))?;

        let scale = value_text_scale(tile.value, size);
        if scale == 0 {
            return Ok(());
        }
        let color = if tile.value <= 4 {
            self.style.dark_text_color
        } else {
            self.style.light_text_color
        };
        draw_text_centered(
            canvas,
            &tile.value.to_string(),
            center_x as i32,
            center_y as i32,
            color,
            scale,
        )
    }

    fn render_score(&self, canvas: &mut Canvas<Window>, score: u32) -> Result<(), String> {
        let (x, y) = self.style.score_position;
        // Vertically centre the line in the strip above the board
        let strip = self.layout.top_offset as i32;
        let line_height = (GLYPH_HEIGHT * self.style.score_scale) as i32;
        let y = y.max((strip - line_height) / 2);
        draw_simple_text(
            canvas,
            &format!("SCORE: {}", score),
            x,
            y,
            self.style.dark_text_color,
            self.style.score_scale,
        )
    }
}
