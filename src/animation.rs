//! Tile animation
//!
//! The board jumps straight to its new logical state when a move resolves;
//! this module makes the screen catch up over the following frames. Each
//! tile's drawn position eases toward its cell (covering a fixed fraction of
//! the remaining distance per frame) and its scale grows in after a spawn or
//! settles back down after a merge pop.
//!
//! Everything is driven by elapsed time converted into "reference frames",
//! so the same motion plays at any frame rate and tests can step it by hand.

use crate::board::{GridEngine, ScalePhase, TileVisual};
use crate::config::AnimationSettings;
use crate::layout::{BoardLayout, Point};
use std::time::Duration;

/// Move `current` toward `target`, shrinking the gap by `(1 - blend)` per frame
///
/// Snaps onto `target` once the gap is below `epsilon`, so the approach
/// always finishes instead of creeping forever.
pub fn ease_toward(current: f32, target: f32, blend: f32, frames: f32, epsilon: f32) -> f32 {
    let remaining = (target - current) * (1.0 - blend).powf(frames);
    if remaining.abs() < epsilon {
        target
    } else {
        target - remaining
    }
}

/// Move `current` toward `target` by at most `step`, never overshooting
pub fn approach(current: f32, target: f32, step: f32) -> f32 {
    if current < target {
        (current + step).min(target)
    } else {
        (current - step).max(target)
    }
}

/// Drives tile visuals toward the logical board each frame
pub struct AnimationController {
    settings: AnimationSettings,
    layout: BoardLayout,
}

impl AnimationController {
    pub fn new(settings: AnimationSettings, layout: BoardLayout) -> Self {
        AnimationController { settings, layout }
    }

    /// Advance every tile by `elapsed` wall-clock time
    pub fn update(&self, engine: &mut GridEngine, elapsed: Duration) {
        let frames = elapsed.as_secs_f32() * self.settings.reference_fps;
        self.advance(engine, frames);
    }

    /// Advance every tile by exactly one reference frame
    #[cfg(test)]
    pub fn step_frame(&self, engine: &mut GridEngine) {
        self.advance(engine, 1.0);
    }

    fn advance(&self, engine: &mut GridEngine, frames: f32) {
        if frames <= 0.0 {
            return;
        }
        for (row, col, visual) in engine.visuals_mut() {
            self.animate_tile(row, col, visual, frames);
        }
    }

    /// Advance one tile's visual state toward the cell at `(row, col)`
    pub fn animate_tile(&self, row: usize, col: usize, visual: &mut TileVisual, frames: f32) {
        let target = self.layout.cell_origin(row, col);
        let s = &self.settings;

        match visual.position {
            None => {
                // New tiles appear in place; only their scale animates
                visual.position = Some(target);
                if visual.phase == ScalePhase::Popping {
                    visual.scale = s.pop_scale;
                }
            }
            Some(current) => {
                visual.position = Some(Point::new(
                    ease_toward(current.x, target.x, s.blend, frames, s.snap_epsilon),
                    ease_toward(current.y, target.y, s.blend, frames, s.snap_epsilon),
                ));
            }
        }

        match visual.phase {
            ScalePhase::Growing => {
                visual.scale = approach(visual.scale, 1.0, s.grow_step * frames);
                if visual.scale >= 1.0 {
                    visual.phase = ScalePhase::Settled;
                }
            }
            ScalePhase::Popping => {
                visual.scale = approach(visual.scale, 1.0, s.pop_decay * frames);
                if visual.scale <= 1.0 {
                    visual.phase = ScalePhase::Settled;
                }
            }
            ScalePhase::Settled => {}
        }
    }
}
