//! Shared grid types and configuration for the snake3d engine.
//!
//! # Invariants
//! - A `GameConfig` is validated before any entity is built from it.

mod config;
mod types;

pub use config::{ConfigError, GameConfig, MAX_BOARD_SIZE, MIN_BOARD_SIZE};
pub use types::{Direction, GridCell};
