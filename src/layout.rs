//! Board pixel geometry
//!
//! Maps logical `(row, col)` cells to the pixel position of their top-left
//! corner. Both the animation layer (as the easing target) and the renderer
//! use it, so tiles always land exactly on the cell backgrounds.

use crate::config::BoardConfig;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Point { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoardLayout {
    pub tile_size: u32,
    pub gap: u32,
    pub top_offset: u32,
}

impl BoardLayout {
    pub fn new(config: &BoardConfig) -> Self {
        BoardLayout {
            tile_size: config.tile_size,
            gap: config.gap,
            top_offset: config.top_offset,
        }
    }

    /// Offset of cell `index` along one axis: tiles before it plus one gap per tile up to it
    fn axis_coord(&self, index: usize) -> f32 {
        let index = index as u32;
        (index * self.tile_size + (index + 1) * self.gap) as f32
    }

    /// Top-left pixel of a cell
    pub fn cell_origin(&self, row: usize, col: usize) -> Point {
        Point::new(
            self.axis_coord(col),
            self.axis_coord(row) + self.top_offset as f32,
        )
    }
}

impl Default for BoardLayout {
    fn default() -> Self {
        BoardLayout::new(&BoardConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_cell_sits_one_gap_in() {
        let layout = BoardLayout::default();
        assert_eq!(layout.cell_origin(0, 0), Point::new(10.0, 60.0));
    }

    #[test]
    fn test_cells_are_tile_plus_gap_apart() {
        let layout = BoardLayout::default();
        let a = layout.cell_origin(1, 2);
        let b = layout.cell_origin(2, 3);
        assert_eq!(b.x - a.x, 100.0);
        assert_eq!(b.y - a.y, 100.0);
        assert_eq!(layout.cell_origin(3, 3), Point::new(310.0, 360.0));
    }
}
