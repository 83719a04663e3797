//! Developer tooling: game inspector and a greedy autopilot for headless runs.
//!
//! # Invariants
//! - Tools only read game state; the autopilot acts through the same
//!   `queue_direction` a player would.

mod autopilot;
mod inspector;

pub use autopilot::Autopilot;
pub use inspector::{GameInspector, GameSummary, SnakeInfo};

pub fn crate_info() -> &'static str {
    concat!("snake3d-tools v", env!("CARGO_PKG_VERSION"))
}
