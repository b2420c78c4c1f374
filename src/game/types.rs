// Shared enums used by the game loop

/// Whether the main loop should keep running after handling an action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Quit,
}
