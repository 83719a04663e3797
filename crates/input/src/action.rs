use snake3d_common::Direction;

/// A high-level player action.
///
/// The game and camera consume actions, never raw key events, so any front
/// end (window, script, autopilot) drives the same logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    MoveLeft,
    MoveRight,
    MoveUp,
    MoveDown,
    /// Start, resume or restart.
    Confirm,
    /// Pause a running game; quit from anywhere else.
    TogglePauseOrQuit,
    CycleCameraMode,
    /// Scroll-wheel speed change; positive is faster.
    AdjustSpeed(i32),
    EnterSpeedSelect,
    /// Digit chosen on the speed-select screen.
    SelectSpeed(u8),
}

impl Action {
    /// The heading requested by a move action.
    pub fn direction(self) -> Option<Direction> {
        match self {
            Action::MoveLeft => Some(Direction::Left),
            Action::MoveRight => Some(Direction::Right),
            Action::MoveUp => Some(Direction::Up),
            Action::MoveDown => Some(Direction::Down),
            _ => None,
        }
    }

    pub fn from_direction(dir: Direction) -> Option<Self> {
        match dir {
            Direction::Left => Some(Action::MoveLeft),
            Direction::Right => Some(Action::MoveRight),
            Direction::Up => Some(Action::MoveUp),
            Direction::Down => Some(Action::MoveDown),
            Direction::None => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn moves_map_to_directions() {
        for dir in Direction::CARDINALS {
            let action = Action::from_direction(dir).unwrap();
            assert_eq!(action.direction(), Some(dir));
        }
        assert_eq!(Action::from_direction(Direction::None), None);
        assert_eq!(Action::Confirm.direction(), None);
    }
}
