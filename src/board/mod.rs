//! The logical 2048 board
//!
//! - `direction`: the four push directions and cell traversal order
//! - `tile`: tile data, visual state and the arena that stores it
//! - `grid`: `GridEngine`, which slides, merges and spawns tiles

pub mod direction;
pub mod grid;
pub mod tile;

pub use direction::Direction;
pub use grid::GridEngine;
pub use tile::{ScalePhase, Tile, TileVisual};
