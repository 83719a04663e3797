//! Player input: keys, actions and the controller that applies them.
//!
//! # Invariants
//! - The game only ever sees actions; keys are resolved through `KeyBindings`.
//! - Move actions are refused while a turn is in flight.

pub mod action;
pub mod bindings;
pub mod controller;
pub mod script;

pub use action::Action;
pub use bindings::{Key, KeyBindings};
pub use controller::{Controller, Response};
pub use script::{InputScript, ScriptEntry};

#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("unknown key `{0}`")]
    UnknownKey(String),
    #[error("script entry `{0}` has no `time:key` separator")]
    MissingSeparator(String),
    #[error("script entry `{0}` has an invalid time")]
    BadTime(String),
}
