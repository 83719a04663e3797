use snake3d_kernel::{Game, GamePhase, SpeedLevel};
use snake3d_render::Camera;

use crate::action::Action;
use crate::bindings::{Key, KeyBindings};

/// What the front end should do after an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Response {
    Continue,
    Quit,
}

/// Maps actions onto the game and camera.
#[derive(Debug, Clone, Default)]
pub struct Controller {
    bindings: KeyBindings,
}

impl Controller {
    pub fn new(bindings: KeyBindings) -> Self {
        Self { bindings }
    }

    pub fn bindings(&self) -> &KeyBindings {
        &self.bindings
    }

    /// Look up `key` and apply its action. Unbound keys are ignored.
    pub fn handle_key(&self, game: &mut Game, camera: &mut Camera, key: Key) -> Response {
        match self.bindings.action_for(key) {
            Some(action) => self.apply(game, camera, action),
            None => {
                tracing::trace!(%key, "unbound key");
                Response::Continue
            }
        }
    }

    pub fn apply(&self, game: &mut Game, camera: &mut Camera, action: Action) -> Response {
        tracing::trace!(?action, phase = ?game.phase(), "action");
        match action {
            Action::MoveLeft | Action::MoveRight | Action::MoveUp | Action::MoveDown => {
                if let Some(dir) = action.direction() {
                    game.queue_direction(dir);
                }
            }
            Action::Confirm => {
                game.confirm();
            }
            Action::TogglePauseOrQuit => match game.phase() {
                GamePhase::Running => {
                    game.pause();
                }
                GamePhase::SpeedSelect => {
                    game.cancel_speed_select();
                }
                GamePhase::Paused | GamePhase::Dead | GamePhase::Won => {
                    tracing::info!("quit requested");
                    return Response::Quit;
                }
            },
            Action::CycleCameraMode => {
                camera.cycle_mode();
            }
            Action::AdjustSpeed(notches) => {
                game.adjust_speed(notches);
            }
            Action::EnterSpeedSelect => {
                game.open_speed_select();
            }
            Action::SelectSpeed(digit) => {
                if let Some(level) = SpeedLevel::from_digit(digit) {
                    game.select_speed(level);
                }
            }
        }
        Response::Continue
    }
}
