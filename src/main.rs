use log::info;
use std::time::{Duration, Instant};

mod animation;
mod board;
mod config;
mod game;
mod gui;
mod input_system;
mod layout;
mod render;
mod text;

use config::GameConfig;
use game::{Game, LoopControl};
use input_system::InputSystem;

fn main() -> Result<(), String> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = GameConfig::load_or_default();

    let sdl_context = sdl2::init()?;
    let video_subsystem = sdl_context.video()?;

    let window = video_subsystem
        .window(&config.window.title, config.window.width, config.window.height)
        .position_centered()
        .build()
        .map_err(|e| e.to_string())?;

    let mut canvas = window.into_canvas().build().map_err(|e| e.to_string())?;

    // Draw in fixed game coordinates regardless of the physical window size
    canvas
        .set_logical_size(config.window.width, config.window.height)
        .map_err(|e| e.to_string())?;

    let mut event_pump = sdl_context.event_pump()?;

    let mut game = Game::new(&config);
    let mut input_system = InputSystem::new(&config.input);
    let frame_budget = Duration::from_secs_f64(1.0 / f64::from(config.window.target_fps));

    info!("Controls: arrows/WASD or mouse swipe to move, R to restart, Esc to quit");

    let mut last_frame = Instant::now();
    'running: loop {
        let frame_start = Instant::now();
        let elapsed = frame_start.duration_since(last_frame);
        last_frame = frame_start;

        input_system.update_context(game.is_game_over());
        for action in input_system.poll_events(&mut event_pump) {
            if game.apply_action(action) == LoopControl::Quit {
                break 'running;
            }
        }

        game.update(elapsed);

        game.render(&mut canvas)?;
        canvas.present();

        let spent = frame_start.elapsed();
        if spent < frame_budget {
            std::thread::sleep(frame_budget - spent);
        }
    }

    info!("Final score: {}", game.engine().score());
    Ok(())
}
