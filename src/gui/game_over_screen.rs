//! Game Over Screen Component
//!
//! Washes the finished board with a translucent overlay and shows the final
//! message plus the restart hint. The board stays visible underneath.

use crate::text::draw_text_centered;
use sdl2::pixels::Color;
use sdl2::render::Canvas;
use sdl2::video::Window;

/// Configuration for game over screen appearance
#[derive(Debug, Clone)]
pub struct GameOverScreenStyle {
    pub overlay_color: Color,

    /// Overlay opacity (0-255)
    pub overlay_alpha: u8,

    pub title_color: Color,
    pub title_scale: u32,

    pub instruction_color: Color,
    pub instruction_scale: u32,
}

impl Default for GameOverScreenStyle {
    fn default() -> Self {
        GameOverScreenStyle {
            overlay_color: Color::RGB(238, 228, 218),
            overlay_alpha: 180,
            title_color: Color::RGB(119, 110, 101),
            title_scale: 5,
            instruction_color: Color::RGB(119, 110, 101),
            instruction_scale: 2,
        }
    }
}

/// Overlay shown while the board is stuck
///
/// ```rust
/// let game_over_screen = GameOverScreen::new();
///
/// // In render loop, after the board
/// if engine.is_game_over() {
///     game_over_screen.render(&mut canvas, engine.score())?;
/// }
/// ```
pub struct GameOverScreen {
    style: GameOverScreenStyle,
}

impl GameOverScreen {
    pub fn new() -> Self {
        GameOverScreen {
            style: GameOverScreenStyle::default(),
        }
    }

    pub fn render(&self, canvas: &mut Canvas<Window>, final_score: u32) -> Result<(), String> {
        let overlay = self.style.overlay_color;
        canvas.set_blend_mode(sdl2::render::BlendMode::Blend);
        canvas.set_draw_color(Color::RGBA(overlay.r, overlay.g, overlay.b, self.style.overlay_alpha));
        canvas.fill_rect(None)?;
        canvas.set_blend_mode(sdl2::render::BlendMode::None);

        // Logical size (game coordinates), not the physical window size
        let (width, height) = canvas.logical_size();
        let center_x = (width / 2) as i32;
        let center_y = (height / 2) as i32;

        draw_text_centered(
            canvas,
            "GAME OVER",
            center_x,
            center_y - 20,
            self.style.title_color,
            self.style.title_scale,
        )?;

        draw_text_centered(
            canvas,
            &format!("SCORE: {}", final_score),
            center_x,
            center_y + 20,
            self.style.instruction_color,
            self.style.instruction_scale,
        )?;

        draw_text_centered(
            canvas,
            "PRESS 'R' TO RESTART",
            center_x,
            center_y + 50,
            self.style.instruction_color,
            self.style.instruction_scale,
        )
    }
}

impl Default for GameOverScreen {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::text_width;

    #[test]
    fn test_default_style_is_translucent() {
        let screen = GameOverScreen::new();
        assert_eq!(screen.style.overlay_alpha, 180);
    }

    #[test]
    fn test_messages_fit_default_window() {
        let style = GameOverScreenStyle::default();
        assert!(text_width("GAME OVER", style.title_scale) < 410);
        assert!(text_width("PRESS 'R' TO RESTART", style.instruction_scale) < 410);
    }
}
