// Game session
//
// Owns the board, its animation and the screens drawn over it, and routes
// player actions to them. One session lives for the whole process; restarts
// reset the board in place.

use crate::animation::AnimationController;
use crate::board::GridEngine;
use crate::config::GameConfig;
use crate::gui::GameOverScreen;
use crate::input_system::GameAction;
use crate::layout::BoardLayout;
use crate::render::BoardRenderer;
use log::{debug, info};
use sdl2::render::Canvas;
use sdl2::video::Window;
use std::time::Duration;

use super::LoopControl;

pub struct Game {
    engine: GridEngine,
    animation: AnimationController,
    renderer: BoardRenderer,
    game_over_screen: GameOverScreen,
}

impl Game {
    pub fn new(config: &GameConfig) -> Self {
        Self::with_engine(GridEngine::new(&config.spawn), config)
    }

    pub fn with_engine(engine: GridEngine, config: &GameConfig) -> Self {
        let layout = BoardLayout::new(&config.board);
        Game {
            engine,
            animation: AnimationController::new(config.animation.clone(), layout),
            renderer: BoardRenderer::new(layout),
            game_over_screen: GameOverScreen::new(),
        }
    }

    pub fn engine(&self) -> &GridEngine {
        &self.engine
    }

    pub fn is_game_over(&self) -> bool {
        self.engine.is_game_over()
    }

    pub fn apply_action(&mut self, action: GameAction) -> LoopControl {
        match action {
            GameAction::Move(direction) => {
                let outcome = self.engine.move_tiles(direction);
                if let Some(tile) = outcome.spawned.and_then(|id| self.engine.tile(id)) {
                    debug!("Spawned {} at ({}, {})", tile.value, tile.row, tile.col);
                }
            }
            GameAction::Restart => self.reset(),
            GameAction::Quit => {
                debug!("Quit requested");
                return LoopControl::Quit;
            }
        }
        LoopControl::Continue
    }

    /// Start over with a fresh board
    pub fn reset(&mut self) {
        info!("Restarting (previous score {})", self.engine.score());
        self.engine.reset();
    }

    /// Advance tile animations by `elapsed`
    pub fn update(&mut self, elapsed: Duration) {
        self.animation.update(&mut self.engine, elapsed);
    }

    pub fn render(&self, canvas: &mut Canvas<Window>) -> Result<(), String> {
        self.renderer.render(canvas, &self.engine)?;
        if self.engine.is_game_over() {
            self.game_over_screen.render(canvas, self.engine.score())?;
        }
        Ok(())
    }
}
