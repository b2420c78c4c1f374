//! Startup configuration
//!
//! All tunables live in [`GameConfig`]. Values are read once at launch from
//! `<config dir>/tile-merge-2048/config.json` when that file exists; every
//! field falls back to its default, so a partial file is fine.
//!
//! ```json
//! {
//!     "animation": { "blend": 0.25 },
//!     "input": { "min_swipe_distance": 80 }
//! }
//! ```

use log::{info, warn};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Board dimension (cells per side)
pub const GRID_SIZE: usize = 4;

/// Total number of cells on the board
pub const CELL_COUNT: usize = GRID_SIZE * GRID_SIZE;

const CONFIG_DIR_NAME: &str = "tile-merge-2048";
const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
    /// Fixed update rate of the main loop
    pub target_fps: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        WindowConfig {
            width: 410,
            height: 520,
            title: "2048 Animated".to_string(),
            target_fps: 60,
        }
    }
}

/// Pixel geometry of the board
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub tile_size: u32,
    pub gap: u32,
    /// Space reserved above the board for the score line
    pub top_offset: u32,
}

impl Default for BoardConfig {
    fn default() -> Self {
        BoardConfig {
            tile_size: 90,
            gap: 10,
            top_offset: 50,
        }
    }
}

/// Tile animation tuning, expressed per reference frame
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AnimationSettings {
    /// Fraction of the remaining distance covered each frame
    pub blend: f32,
    /// Distance (pixels) under which a tile snaps onto its target
    pub snap_epsilon: f32,
    /// Scale gained per frame while a tile grows in
    pub grow_step: f32,
    /// Scale a freshly merged tile starts at
    pub pop_scale: f32,
    /// Scale lost per frame while a merged tile settles back to 1.0
    pub pop_decay: f32,
    /// Frame rate the per-frame values above are tuned for
    pub reference_fps: f32,
}

impl Default for AnimationSettings {
    fn default() -> Self {
        AnimationSettings {
            blend: 1.0 / 3.0,
            snap_epsilon: 1.0,
            grow_step: 0.2,
            pop_scale: 1.2,
            pop_decay: 0.05,
            reference_fps: 60.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Mouse travel (pixels) a drag must exceed on either axis to count as a swipe
    pub min_swipe_distance: i32,
}

impl Default for InputConfig {
    fn default() -> Self {
        InputConfig {
            min_swipe_distance: 50,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    /// Chance that a spawned tile is a 4 instead of a 2
    pub four_probability: f64,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        SpawnConfig {
            four_probability: 0.1,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub window: WindowConfig,
    pub board: BoardConfig,
    pub animation: AnimationSettings,
    pub input: InputConfig,
    pub spawn: SpawnConfig,
}

impl GameConfig {
    /// Parse and validate a config file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Default location of the user config file, if the platform has a config dir
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Load the user config, falling back to defaults
    ///
    /// A missing file is normal. A broken one is reported and ignored so the
    /// game still starts.
    pub fn load_or_default() -> Self {
        let Some(path) = Self::default_path() else {
            warn!("No config directory on this platform, using defaults");
            return GameConfig::default();
        };

        if !path.exists() {
            info!("No config at {}, using defaults", path.display());
            return GameConfig::default();
        }

        match Self::load_from_file(&path) {
            Ok(config) => {
                info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                warn!("Ignoring config at {}: {}", path.display(), e);
                GameConfig::default()
            }
        }
    }

    /// The grid (tiles plus one more gap than tiles) and its top offset must fit the window
    fn check_board_fits(&self) -> Result<(), ConfigError> {
        let board = &self.board;
        let count = GRID_SIZE as u32;
        let span = board
            .tile_size
            .checked_mul(count)
            .and_then(|tiles| board.gap.checked_mul(count + 1)?.checked_add(tiles));
        let height = span.and_then(|span| span.checked_add(board.top_offset));

        match (span, height) {
            (Some(span), Some(height)) if span <= self.window.width && height <= self.window.height => Ok(()),
            _ => Err(ConfigError::Invalid(format!(
                "board ({} px tiles, {} px gaps, {} px top offset) does not fit a {}x{} window",
                board.tile_size, board.gap, board.top_offset, self.window.width, self.window.height
            ))),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let anim = &self.animation;
        if !(anim.blend > 0.0 && anim.blend <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "animation.blend must be in (0, 1], got {}",
                anim.blend
            )));
        }
        if anim.snap_epsilon < 0.0 {
            return Err(ConfigError::Invalid("animation.snap_epsilon must not be negative".into()));
        }
        if anim.grow_step <= 0.0 || anim.pop_decay <= 0.0 {
            return Err(ConfigError::Invalid(
                "animation.grow_step and animation.pop_decay must be positive".into(),
            ));
        }
        if anim.pop_scale < 1.0 {
            return Err(ConfigError::Invalid("animation.pop_scale must be at least 1.0".into()));
        }
        if anim.reference_fps <= 0.0 {
            return Err(ConfigError::Invalid("animation.reference_fps must be positive".into()));
        }
        if !(0.0..=1.0).contains(&self.spawn.four_probability) {
            return Err(ConfigError::Invalid(format!(
                "spawn.four_probability must be in [0, 1], got {}",
                self.spawn.four_probability
            )));
        }
        if self.window.target_fps == 0 {
            return Err(ConfigError::Invalid("window.target_fps must be positive".into()));
        }
        if self.board.tile_size == 0 {
            return Err(ConfigError::Invalid("board.tile_size must be positive".into()));
        }
        self.check_board_fits()?;
        if self.input.min_swipe_distance < 0 {
            return Err(ConfigError::Invalid("input.min_swipe_distance must not be negative".into()));
        }
        Ok(())
    }
}

/// Error types for config loading
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Invalid(msg) => write!(f, "Invalid config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::Io(err)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err)
    }
}
