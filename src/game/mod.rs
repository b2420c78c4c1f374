// Game module - the running session and the types the main loop uses
//
// - session.rs: Game struct (board + animation + screens, action handling)
// - types.rs: Shared enums

pub mod session;
pub mod types;

pub use session::Game;
pub use types::*;
