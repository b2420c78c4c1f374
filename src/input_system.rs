use crate::board::Direction;
use crate::config::InputConfig;
use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use sdl2::mouse::MouseButton;
use sdl2::EventPump;

/// Actions the player can perform
///
/// Raw SDL2 input is translated into these so the game loop never looks at
/// key codes or mouse coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    Move(Direction),
    Restart,
    Quit,
}

/// Input context determines which actions are available
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputContext {
    /// Tiles can be pushed by keys or swipes
    Playing,
    /// Game-over overlay is up; only restart and quit work
    GameOver,
}

/// Direction of a mouse drag, if it was long enough to count as a swipe
///
/// Either axis has to travel strictly more than `min_distance`. The longer
/// axis wins; a tie counts as vertical.
pub fn swipe_direction(dx: i32, dy: i32, min_distance: i32) -> Option<Direction> {
    if dx.abs() <= min_distance && dy.abs() <= min_distance {
        return None;
    }

    if dx.abs() > dy.abs() {
        Some(if dx > 0 { Direction::Right } else { Direction::Left })
    } else {
        Some(if dy > 0 { Direction::Down } else { Direction::Up })
    }
}

/// Tracks a left-button drag from press to release
#[derive(Debug, Clone)]
pub struct SwipeTracker {
    start: Option<(i32, i32)>,
    min_distance: i32,
}

impl SwipeTracker {
    pub fn new(min_distance: i32) -> Self {
        SwipeTracker {
            start: None,
            min_distance,
        }
    }

    pub fn begin(&mut self, x: i32, y: i32) {
        self.start = Some((x, y));
    }

    /// Finish the drag at `(x, y)`; `None` if no drag was active or it was too short
    pub fn finish(&mut self, x: i32, y: i32) -> Option<Direction> {
        let (start_x, start_y) = self.start.take()?;
        swipe_direction(x - start_x, y - start_y, self.min_distance)
    }

    pub fn cancel(&mut self) {
        self.start = None;
    }
}

/// InputSystem processes SDL2 events and produces GameActions
///
/// Each frame:
/// 1. `update_context()` with the current game state
/// 2. `poll_events()` drains SDL2's queue
/// 3. The returned actions are applied by the game loop
pub struct InputSystem {
    pub context: InputContext,
    swipe: SwipeTracker,
}

impl InputSystem {
    pub fn new(config: &InputConfig) -> Self {
        InputSystem {
            context: InputContext::Playing,
            swipe: SwipeTracker::new(config.min_swipe_distance),
        }
    }

    pub fn update_context(&mut self, game_over: bool) {
        self.context = if game_over {
            InputContext::GameOver
        } else {
            InputContext::Playing
        };

        // A drag started before the game ended must not fire after a restart
        if self.context == InputContext::GameOver {
            self.swipe.cancel();
        }
    }

    /// Process SDL2 events and return the actions to apply this frame
    pub fn poll_events(&mut self, event_pump: &mut EventPump) -> Vec<GameAction> {
        let mut actions = Vec::new();

        for event in event_pump.poll_iter() {
            match event {
                Event::Quit { .. } => {
                    actions.push(GameAction::Quit);
                }
                Event::KeyDown {
                    keycode: Some(key),
                    repeat,
                    ..
                } => {
                    self.handle_key_event(key, repeat, &mut actions);
                }
                Event::MouseButtonDown {
                    mouse_btn, x, y, ..
                } => {
                    self.handle_mouse_down(mouse_btn, x, y);
                }
                Event::MouseButtonUp {
                    mouse_btn, x, y, ..
                } => {
                    self.handle_mouse_up(mouse_btn, x, y, &mut actions);
                }
                _ => {}
            }
        }

        actions
    }

    /// Handle keyboard key press events
    ///
    /// Auto-repeat from a held key is dropped: one physical press, one action.
    fn handle_key_event(&self, key: Keycode, repeat: bool, actions: &mut Vec<GameAction>) {
        if repeat {
            return;
        }
        self.handle_keydown(key, actions);
    }

    fn handle_keydown(&self, key: Keycode, actions: &mut Vec<GameAction>) {
        match self.context {
            InputContext::Playing => self.handle_playing_keys(key, actions),
            InputContext::GameOver => self.handle_game_over_keys(key, actions),
        }
    }

    fn handle_playing_keys(&self, key: Keycode, actions: &mut Vec<GameAction>) {
        match key {
            Keycode::Left | Keycode::A => actions.push(GameAction::Move(Direction::Left)),
            Keycode::Right | Keycode::D => actions.push(GameAction::Move(Direction::Right)),
            Keycode::Up | Keycode::W => actions.push(GameAction::Move(Direction::Up)),
            Keycode::Down | Keycode::S => actions.push(GameAction::Move(Direction::Down)),
            Keycode::R => actions.push(GameAction::Restart),
            Keycode::Escape => actions.push(GameAction::Quit),
            _ => {}
        }
    }

    fn handle_game_over_keys(&self, key: Keycode, actions: &mut Vec<GameAction>) {
        match key {
            Keycode::R => actions.push(GameAction::Restart),
            Keycode::Escape => actions.push(GameAction::Quit),
            _ => {}
        }
    }

    fn handle_mouse_down(&mut self, button: MouseButton, x: i32, y: i32) {
        if button == MouseButton::Left && self.context == InputContext::Playing {
            self.swipe.begin(x, y);
        }
    }

    fn handle_mouse_up(&mut self, button: MouseButton, x: i32, y: i32, actions: &mut Vec<GameAction>) {
        if button != MouseButton::Left {
            return;
        }
        if self.context != InputContext::Playing {
            self.swipe.cancel();
            return;
        }
        if let Some(direction) = self.swipe.finish(x, y) {
            actions.push(GameAction::Move(direction));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> InputSystem {
        InputSystem::new(&InputConfig::default())
    }

    #[test]
    fn test_input_system_creation() {
        let input = input();
        assert_eq!(input.context, InputContext::Playing);
    }

    #[test]
    fn test_swipe_below_threshold_ignored() {
        assert_eq!(swipe_direction(50, 0, 50), None);
        assert_eq!(swipe_direction(-30, 40, 50), None);
    }

    #[test]
    fn test_swipe_dominant_axis() {
        assert_eq!(swipe_direction(120, 40, 50), Some(Direction::Right));
        assert_eq!(swipe_direction(-120, 40, 50), Some(Direction::Left));
        assert_eq!(swipe_direction(20, 80, 50), Some(Direction::Down));
        assert_eq!(swipe_direction(20, -80, 50), Some(Direction::Up));
        // Short axis below threshold doesn't matter once the other exceeds it
        assert_eq!(swipe_direction(51, 0, 50), Some(Direction::Right));
    }

    #[test]
    fn test_swipe_tie_is_vertical() {
        assert_eq!(swipe_direction(60, 60, 50), Some(Direction::Down));
        assert_eq!(swipe_direction(60, -60, 50), Some(Direction::Up));
    }

    #[test]
    fn test_swipe_tracker_needs_start() {
        let mut tracker = SwipeTracker::new(50);
        assert_eq!(tracker.finish(200, 0), None);

        tracker.begin(100, 100);
        assert_eq!(tracker.finish(10, 110), Some(Direction::Left));
        // The drag is consumed once finished
        assert_eq!(tracker.finish(300, 110), None);
    }

    #[test]
    fn test_mouse_drag_produces_move() {
        let mut input = input();
        let mut actions = Vec::new();
        input.handle_mouse_down(MouseButton::Left, 200, 200);
        input.handle_mouse_up(MouseButton::Left, 200, 300, &mut actions);
        assert_eq!(actions, vec![GameAction::Move(Direction::Down)]);
    }

    #[test]
    fn test_right_button_drag_ignored() {
        let mut input = input();
        let mut actions = Vec::new();
        input.handle_mouse_down(MouseButton::Right, 200, 200);
        input.handle_mouse_up(MouseButton::Right, 400, 200, &mut actions);
        assert!(actions.is_empty());
    }

    #[test]
    fn test_game_over_cancels_pending_swipe() {
        let mut input = input();
        let mut actions = Vec::new();
        input.handle_mouse_down(MouseButton::Left, 200, 200);
        input.update_context(true);
        input.update_context(false);
        input.handle_mouse_up(MouseButton::Left, 400, 200, &mut actions);
        assert!(actions.is_empty());
    }

    #[test]
    fn test_playing_keys() {
        let input = input();
        let mut actions = Vec::new();
        input.handle_keydown(Keycode::Left, &mut actions);
        input.handle_keydown(Keycode::D, &mut actions);
        input.handle_keydown(Keycode::W, &mut actions);
        input.handle_keydown(Keycode::Down, &mut actions);
        input.handle_keydown(Keycode::R, &mut actions);
        input.handle_keydown(Keycode::Q, &mut actions);
        assert_eq!(
            actions,
            vec![
                GameAction::Move(Direction::Left),
                GameAction::Move(Direction::Right),
                GameAction::Move(Direction::Up),
                GameAction::Move(Direction::Down),
                GameAction::Restart,
            ]
        );
    }

    #[test]
    fn test_held_key_moves_once() {
        let input = input();
        let mut actions = Vec::new();
        input.handle_key_event(Keycode::Left, false, &mut actions);
        input.handle_key_event(Keycode::Left, true, &mut actions);
        input.handle_key_event(Keycode::Left, true, &mut actions);
        input.handle_key_event(Keycode::R, true, &mut actions);
        assert_eq!(actions, vec![GameAction::Move(Direction::Left)]);
    }

    #[test]
    fn test_game_over_only_allows_restart_and_quit() {
        let mut input = input();
        input.update_context(true);
        assert_eq!(input.context, InputContext::GameOver);

        let mut actions = Vec::new();
        input.handle_keydown(Keycode::Left, &mut actions);
        input.handle_keydown(Keycode::R, &mut actions);
        input.handle_keydown(Keycode::Escape, &mut actions);
        assert_eq!(actions, vec![GameAction::Restart, GameAction::Quit]);
    }
}
