//! Game kernel: authoritative game state, tick clock, entities and the
//! interpolation that turns discrete ticks into continuous poses.
//!
//! # Invariants
//! - The snake's committed position changes at most once per elapsed tick interval.
//! - A queued turn never reverses the committed heading.
//! - After `k` feedings since the last reset the trail holds `k` cells and
//!   the snake's scene graph holds `k` body nodes.
//! - Food never sits on the snake or an obstacle after a successful placement.
//! - All state mutations flow through `Game` operations and are logged.

pub mod board;
pub mod clock;
pub mod food;
pub mod game;
pub mod interp;
pub mod snake;

pub use board::Board;
pub use clock::GameClock;
pub use food::{Food, Placement};
pub use game::{EntityMeshes, FramePose, Game, GameError, GameEvent, GamePhase, SpeedLevel};
pub use interp::{GridProjection, interpolate_angle, interpolate_position};
pub use snake::{Collision, DeathCause, Snake, SnakeMeshes, SnakePose};
