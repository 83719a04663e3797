use serde::{Deserialize, Serialize};

use crate::types::GridCell;

/// Smallest playable board.
pub const MIN_BOARD_SIZE: u32 = 3;
/// Largest board; keeps the free-cell scan for food placement bounded.
pub const MAX_BOARD_SIZE: u32 = 256;

/// Session configuration. The board size is the primary knob; everything
/// else has a default derived from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Board edge length in cells.
    pub size: u32,
    /// Seed for food placement.
    pub seed: u64,
    /// Render-space distance between neighbouring cells. Defaults to
    /// `2 / size` so the field spans [-1, 1].
    pub pitch: Option<f32>,
    /// Multiplies the tick interval: 2.0 ticks twice as slowly.
    pub speed_factor: f32,
    /// Static cells that kill the snake on contact.
    pub obstacles: Vec<GridCell>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            size: 10,
            seed: 42,
            pitch: None,
            speed_factor: 1.0,
            obstacles: Vec::new(),
        }
    }
}

/// Errors from configuration loading and validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("board size {0} is too small (minimum {min})", min = MIN_BOARD_SIZE)]
    SizeTooSmall(u32),
    #[error("board size {0} is too large (maximum {max})", max = MAX_BOARD_SIZE)]
    SizeTooLarge(u32),
    #[error("cell pitch must be positive and finite, got {0}")]
    InvalidPitch(f32),
    #[error("speed factor must be positive and finite, got {0}")]
    InvalidSpeedFactor(f32),
    #[error("obstacle {cell} lies outside the {size}x{size} board")]
    ObstacleOutOfBounds { cell: GridCell, size: u32 },
    #[error("obstacle {0} covers the spawn cell")]
    ObstacleOnSpawn(GridCell),
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_yaml::Error),
}

impl GameConfig {
    /// Default configuration for a board of the given size.
    pub fn with_size(size: u32) -> Self {
        Self {
            size,
            ..Self::default()
        }
    }

    /// Parse a YAML document. Missing fields take their defaults.
    /// The result is not validated.
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Check every field. Must pass before any entity is constructed.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.size < MIN_BOARD_SIZE {
            return Err(ConfigError::SizeTooSmall(self.size));
        }
        if self.size > MAX_BOARD_SIZE {
            return Err(ConfigError::SizeTooLarge(self.size));
        }
        if let Some(pitch) = self.pitch {
            if !(pitch.is_finite() && pitch > 0.0) {
                return Err(ConfigError::InvalidPitch(pitch));
            }
        }
        if !(self.speed_factor.is_finite() && self.speed_factor > 0.0) {
            return Err(ConfigError::InvalidSpeedFactor(self.speed_factor));
        }
        let center = self.center();
        for &cell in &self.obstacles {
            if !cell.in_bounds(self.size) {
                return Err(ConfigError::ObstacleOutOfBounds {
                    cell,
                    size: self.size,
                });
            }
            if cell == center {
                return Err(ConfigError::ObstacleOnSpawn(cell));
            }
        }
        Ok(())
    }

    /// Spawn cell: the middle of the board, rounded down.
    pub fn center(&self) -> GridCell {
        let c = (self.size / 2) as i32;
        GridCell::new(c, c)
    }

    pub fn pitch(&self) -> f32 {
        self.pitch.unwrap_or(2.0 / self.size as f32)
    }
}
