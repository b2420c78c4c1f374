//! Screen-space GUI
//!
//! Elements drawn at fixed screen positions on top of the board.
//!
//! - [`GameOverScreen`] - translucent overlay with the final score and restart hint

pub mod game_over_screen;

pub use game_over_screen::GameOverScreen;
