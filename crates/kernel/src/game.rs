use glam::Vec3;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use snake3d_common::{ConfigError, Direction, GameConfig, GridCell};
use snake3d_scene::{DrawableHandle, SceneError, SceneNode};
use std::collections::HashSet;

use crate::board::Board;
use crate::clock::GameClock;
use crate::food::{Food, Placement};
use crate::snake::{Collision, DeathCause, Snake, SnakeMeshes};

/// Top-level state of a session. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    #[default]
    Paused,
    Running,
    Dead,
    Won,
    SpeedSelect,
}

/// Player-facing speed presets offered on the speed-select screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SpeedLevel {
    Slow,
    #[default]
    Normal,
    Fast,
}

impl SpeedLevel {
    /// Tick interval multiplier for this preset.
    pub fn factor(self) -> f32 {
        match self {
            SpeedLevel::Slow => 2.0,
            SpeedLevel::Normal => 1.0,
            SpeedLevel::Fast => 0.5,
        }
    }

    /// Map the digit keys 1, 2 and 3 to a preset.
    pub fn from_digit(digit: u8) -> Option<Self> {
        match digit {
            1 => Some(SpeedLevel::Slow),
            2 => Some(SpeedLevel::Normal),
            3 => Some(SpeedLevel::Fast),
            _ => None,
        }
    }
}

/// A record produced by every state change of the game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Started { size: u32, seed: u64, food: GridCell },
    Paused { tick: u64 },
    Resumed { tick: u64 },
    Ticked { tick: u64, head: GridCell },
    Turned { tick: u64, direction: Direction },
    Ate { tick: u64, cell: GridCell, segments: usize },
    Died { tick: u64, cause: DeathCause, segments: usize },
    Won { tick: u64, segments: usize },
    Restarted,
    SpeedChanged { factor: f32 },
}

/// Geometry handles for the dynamic entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityMeshes {
    pub head: DrawableHandle,
    pub body: DrawableHandle,
    pub food: DrawableHandle,
}

impl Default for EntityMeshes {
    fn default() -> Self {
        Self {
            head: DrawableHandle(0),
            body: DrawableHandle(1),
            food: DrawableHandle(2),
        }
    }
}

/// World-space poses for the current frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FramePose {
    pub head: Vec3,
    pub heading_degrees: f32,
    pub food: Vec3,
    pub progress: f32,
}

#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("no free cell to place food on")]
    NoFreeCell,
    #[error(transparent)]
    Scene(#[from] SceneError),
}

/// The authoritative game state.
///
/// All mutations go through explicit operations and are recorded in an
/// append-only event log. Given the same configuration and the same
/// sequence of operations and timestamps, a game replays identically.
#[derive(Debug, Clone)]
pub struct Game {
    config: GameConfig,
    board: Board,
    clock: GameClock,
    phase: GamePhase,
    input_locked: bool,
    snake: Snake,
    food: Food,
    rng: StdRng,
    time: f64,
    events: Vec<GameEvent>,
}

impl Game {
    /// Validate `config` and build a paused game with default mesh handles.
    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        Self::with_meshes(config, EntityMeshes::default())
    }

    pub fn with_meshes(config: GameConfig, meshes: EntityMeshes) -> Result<Self, GameError> {
        config.validate()?;
        let board = Board::from_config(&config);
        let snake = Snake::new(
            &board,
            SnakeMeshes {
                head: meshes.head,
                body: meshes.body,
            },
        );
        let mut food = Food::new(&board, meshes.food, board.center());
        let mut rng = StdRng::seed_from_u64(config.seed);
        let occupied: HashSet<GridCell> = snake.occupied().collect();
        let Placement::Placed(cell) = food.relocate(&board, &occupied, &mut rng) else {
            return Err(GameError::NoFreeCell);
        };
        tracing::info!(size = config.size, seed = config.seed, food = %cell, "game created");

        Ok(Self {
            clock: GameClock::new(config.size, config.speed_factor),
            events: vec![GameEvent::Started {
                size: config.size,
                seed: config.seed,
                food: cell,
            }],
            config,
            board,
            phase: GamePhase::Paused,
            input_locked: false,
            snake,
            food,
            rng,
            time: 0.0,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn clock(&self) -> &GameClock {
        &self.clock
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    pub fn is_paused(&self) -> bool {
        self.phase == GamePhase::Paused
    }

    pub fn is_dead(&self) -> bool {
        self.phase == GamePhase::Dead
    }

    pub fn is_won(&self) -> bool {
        self.phase == GamePhase::Won
    }

    /// True while an accepted turn waits for the next tick.
    pub fn input_locked(&self) -> bool {
        self.input_locked
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn food(&self) -> &Food {
        &self.food
    }

    /// Wall-clock time of the latest `advance`.
    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn tick_count(&self) -> u64 {
        self.clock.tick_count()
    }

    /// Segments eaten since the last reset.
    pub fn score(&self) -> usize {
        self.snake.segments()
    }

    /// Scene sub-graphs of the dynamic entities, snake first.
    pub fn models(&self) -> [&SceneNode; 2] {
        [self.snake.model(), self.food.model()]
    }

    /// Read-only access to the event log.
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Drain and return the event log.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Feed the wall-clock time in seconds. Performs at most one tick and
    /// returns its collision outcome.
    pub fn advance(&mut self, now: f64) -> Option<Collision> {
        self.time = now;
        let running = self.is_running();
        self.clock.advance(now, running);
        self.food.spin(now as f32);
        if running && self.clock.take_due_tick() {
            Some(self.step())
        } else {
            None
        }
    }

    /// Move the snake one cell and resolve collisions. Does nothing outside
    /// `Running`.
    pub fn step(&mut self) -> Collision {
        if !self.is_running() {
            return Collision::None;
        }
        self.snake.tick();
        self.input_locked = false;
        self.clock.record_tick();
        let tick = self.clock.tick_count();
        tracing::debug!(tick, head = %self.snake.position(), "tick");
        self.events.push(GameEvent::Ticked {
            tick,
            head: self.snake.position(),
        });

        let collision = self.snake.check_collision(&self.board, self.food.position());
        match collision {
            Collision::Dead(cause) => self.kill(cause),
            Collision::Ate => self.feed(),
            Collision::None => {}
        }
        collision
    }

    /// Queue a turn for the next tick. Refused outside `Running`, while a
    /// previous turn is in flight, or when it would reverse the snake.
    pub fn queue_direction(&mut self, dir: Direction) -> bool {
        if !self.is_running() || self.input_locked {
            return false;
        }
        if !self.snake.queue_direction(dir, self.clock.progress()) {
            return false;
        }
        self.input_locked = true;
        self.events.push(GameEvent::Turned {
            tick: self.clock.tick_count(),
            direction: dir,
        });
        true
    }

    /// Start or resume play. A won game is reset first.
    pub fn confirm(&mut self) -> bool {
        match self.phase {
            GamePhase::Paused | GamePhase::Dead => {}
            GamePhase::Won => self.reset_entities(),
            GamePhase::Running | GamePhase::SpeedSelect => return false,
        }
        self.resume();
        true
    }

    /// Pause a running game. Returns false if it was not running.
    pub fn pause(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        self.phase = GamePhase::Paused;
        tracing::info!(tick = self.clock.tick_count(), "paused");
        self.events.push(GameEvent::Paused {
            tick: self.clock.tick_count(),
        });
        true
    }

    /// Leave the speed-select screen without choosing.
    pub fn cancel_speed_select(&mut self) -> bool {
        if self.phase != GamePhase::SpeedSelect {
            return false;
        }
        self.phase = GamePhase::Paused;
        true
    }

    pub fn open_speed_select(&mut self) -> bool {
        match self.phase {
            GamePhase::Running | GamePhase::Paused | GamePhase::Dead => {
                self.phase = GamePhase::SpeedSelect;
                tracing::info!("speed select");
                true
            }
            GamePhase::Won | GamePhase::SpeedSelect => false,
        }
    }

    /// Apply a preset and resume. Only valid on the speed-select screen.
    pub fn select_speed(&mut self, level: SpeedLevel) -> bool {
        if self.phase != GamePhase::SpeedSelect {
            return false;
        }
        let factor = self.clock.set_speed_factor(level.factor());
        tracing::info!(?level, factor, "speed selected");
        self.events.push(GameEvent::SpeedChanged { factor });
        self.resume();
        true
    }

    /// Scroll-style speed change, valid in any phase. Positive is faster.
    pub fn adjust_speed(&mut self, notches: i32) -> f32 {
        let factor = self.clock.adjust_speed(notches);
        tracing::debug!(notches, factor, "speed adjusted");
        self.events.push(GameEvent::SpeedChanged { factor });
        factor
    }

    /// Recompute the interpolated poses and push them into the scene graph.
    pub fn update_poses(&mut self) -> Result<FramePose, GameError> {
        let progress = self.clock.progress();
        let pose = self.snake.render_pose(progress);
        self.snake.sync_scene(&pose)?;
        tracing::trace!(progress, angle = pose.angle_degrees, "poses updated");
        Ok(FramePose {
            head: self.board.to_world(pose.position, self.snake.head_height()),
            heading_degrees: pose.angle_degrees,
            food: self.food.world_position(),
            progress,
        })
    }

    /// Head and trail cells.
    pub fn occupied(&self) -> HashSet<GridCell> {
        self.snake.occupied().collect()
    }

    fn resume(&mut self) {
        self.phase = GamePhase::Running;
        tracing::info!(tick = self.clock.tick_count(), "running");
        self.events.push(GameEvent::Resumed {
            tick: self.clock.tick_count(),
        });
    }

    fn feed(&mut self) {
        let cell = self.snake.position();
        self.snake.on_ate();
        let segments = self.snake.segments();
        tracing::info!(%cell, segments, "ate");
        self.events.push(GameEvent::Ate {
            tick: self.clock.tick_count(),
            cell,
            segments,
        });
        self.relocate_food();
    }

    fn kill(&mut self, cause: DeathCause) {
        let segments = self.snake.segments();
        tracing::info!(?cause, segments, head = %self.snake.position(), "died");
        self.events.push(GameEvent::Died {
            tick: self.clock.tick_count(),
            cause,
            segments,
        });
        self.snake.on_death(self.board.center());
        self.input_locked = false;
        self.clock.reset_tick();
        self.relocate_food();
        if !matches!(self.phase, GamePhase::Won | GamePhase::Paused) {
            self.phase = GamePhase::Dead;
        }
    }

    fn win(&mut self) {
        self.phase = GamePhase::Won;
        let segments = self.snake.segments();
        tracing::info!(segments, "board filled");
        self.events.push(GameEvent::Won {
            tick: self.clock.tick_count(),
            segments,
        });
    }

    fn relocate_food(&mut self) {
        let occupied = self.occupied();
        if self.food.relocate(&self.board, &occupied, &mut self.rng) == Placement::Exhausted {
            self.win();
        }
    }

    fn reset_entities(&mut self) {
        self.snake.on_death(self.board.center());
        self.input_locked = false;
        self.clock.reset_tick();
        self.phase = GamePhase::Paused;
        self.events.push(GameEvent::Restarted);
        self.relocate_food();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running(config: GameConfig) -> Game {
        let mut game = Game::new(config).unwrap();
        assert!(game.confirm());
        game
    }

    #[test]
    fn new_game_is_paused_with_food_off_the_snake() {
        let game = Game::new(GameConfig::default()).unwrap();
        assert_eq!(game.phase(), GamePhase::Paused);
        assert_eq!(game.snake().position(), GridCell::new(5, 5));
        assert_ne!(game.food().position(), game.snake().position());
        assert!(matches!(game.events()[0], GameEvent::Started { size: 10, .. }));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let err = Game::new(GameConfig::with_size(2)).unwrap_err();
        assert!(matches!(err, GameError::Config(ConfigError::SizeTooSmall(2))));
    }

    #[test]
    fn fully_blocked_board_has_no_food_cell() {
        let mut config = GameConfig::with_size(3);
        config.obstacles = (0..3)
            .flat_map(|y| (0..3).map(move |x| GridCell::new(x, y)))
            .filter(|c| *c != GridCell::new(1, 1))
            .collect();
        assert!(matches!(Game::new(config), Err(GameError::NoFreeCell)));
    }

    #[test]
    fn straight_move() {
        let mut game = running(GameConfig::default());
        game.food.place(&game.board, GridCell::new(0, 0));
        game.snake.place(GridCell::new(5, 5), Direction::Right);
        assert_eq!(game.step(), Collision::None);
        assert_eq!(game.snake().position(), GridCell::new(6, 5));
        assert_eq!(game.snake().next_position(), GridCell::new(7, 5));
        assert_eq!(game.score(), 0);
        assert_eq!(game.tick_count(), 1);
    }

    #[test]
    fn turns_are_locked_until_the_tick() {
        let mut game = running(GameConfig::default());
        game.snake.place(GridCell::new(5, 5), Direction::Right);
        assert!(game.queue_direction(Direction::Up));
        assert!(game.input_locked());
        assert!(!game.queue_direction(Direction::Down));
        game.step();
        assert!(!game.input_locked());
        assert!(game.queue_direction(Direction::Right));
    }

    #[test]
    fn repeating_the_heading_leaves_input_open() {
        let mut game = running(GameConfig::default());
        game.snake.place(GridCell::new(5, 5), Direction::Right);
        let logged = game.events().len();
        assert!(!game.queue_direction(Direction::Right));
        assert!(!game.input_locked());
        assert_eq!(game.events().len(), logged);
        assert!(game.queue_direction(Direction::Up));
        assert_eq!(game.snake().queued_heading(), Direction::Up);
    }

    #[test]
    fn reversal_is_refused() {
        let mut game = running(GameConfig::default());
        game.snake.place(GridCell::new(5, 5), Direction::Right);
        assert!(!game.queue_direction(Direction::Left));
        assert!(!game.input_locked());
        assert_eq!(game.snake().queued_heading(), Direction::Right);
    }

    #[test]
    fn input_is_ignored_while_paused() {
        let mut game = Game::new(GameConfig::default()).unwrap();
        assert!(!game.queue_direction(Direction::Up));
        assert_eq!(game.step(), Collision::None);
        assert_eq!(game.tick_count(), 0);
    }

    #[test]
    fn feeding_grows_and_moves_food() {
        let mut game = running(GameConfig::default());
        game.snake.place(GridCell::new(2, 5), Direction::Right);
        game.food.place(&game.board, GridCell::new(4, 5));
        assert_eq!(game.step(), Collision::None);
        assert_eq!(game.step(), Collision::Ate);
        assert_eq!(game.score(), 1);
        assert!(!game.occupied().contains(&game.food().position()));
        assert!(game.events().iter().any(|e| matches!(e, GameEvent::Ate { segments: 1, .. })));
    }

    #[test]
    fn trail_length_matches_feedings() {
        let mut game = running(GameConfig::default());
        game.snake.place(GridCell::new(0, 0), Direction::Right);
        for k in 1..=4 {
            game.feed();
            assert_eq!(game.snake().trail().len(), k);
            assert_eq!(game.snake().model().child_count(), k + 1);
        }
    }

    #[test]
    fn running_into_own_trail_kills() {
        let mut game = running(GameConfig::default());
        game.food.place(&game.board, GridCell::new(0, 9));
        game.snake.place(GridCell::new(2, 2), Direction::Right);
        for _ in 0..4 {
            game.snake.on_ate();
        }
        assert_eq!(game.step(), Collision::None);
        for dir in [Direction::Down, Direction::Left, Direction::Up] {
            assert!(game.queue_direction(dir));
            assert_eq!(game.step(), Collision::None);
        }
        assert_eq!(game.step(), Collision::Dead(DeathCause::Trail));
        assert!(game.is_dead());
        assert_eq!(game.score(), 0);
        assert_eq!(game.snake().position(), game.board().center());
        assert_eq!(game.snake().heading(), Direction::None);
    }

    #[test]
    fn leaving_the_board_kills_and_confirm_resumes() {
        let mut game = running(GameConfig::default());
        game.food.place(&game.board, GridCell::new(0, 0));
        game.snake.place(GridCell::new(9, 5), Direction::Right);
        assert_eq!(game.step(), Collision::Dead(DeathCause::OutOfBounds));
        assert!(game.is_dead());
        assert!(!game.queue_direction(Direction::Up));
        assert!(game.confirm());
        assert!(game.is_running());
    }

    #[test]
    fn obstacle_kills() {
        let mut config = GameConfig::default();
        config.obstacles = vec![GridCell::new(7, 5)];
        let mut game = running(config);
        game.food.place(&game.board, GridCell::new(0, 0));
        game.snake.place(GridCell::new(6, 5), Direction::Right);
        assert_eq!(game.step(), Collision::Dead(DeathCause::Obstacle));
    }

    #[test]
    fn filling_a_bare_board_wins() {
        let mut game = running(GameConfig::with_size(3));
        game.snake.place(GridCell::new(1, 1), Direction::Up);
        // spawned on food: the centre stays occupied as the tail
        game.feed();

        // the turn for each move is queued one tick ahead
        let route = [
            Some(Direction::Left),
            Some(Direction::Down),
            None,
            Some(Direction::Right),
            None,
            Some(Direction::Up),
            None,
            None,
        ];
        for (i, turn) in route.into_iter().enumerate() {
            assert!(game.is_running(), "stopped before move {i}");
            let ahead = game.snake().next_position();
            game.food.place(&game.board, ahead);
            if let Some(dir) = turn {
                assert!(game.queue_direction(dir));
            }
            assert_eq!(game.step(), Collision::Ate);
            assert_eq!(game.occupied().len(), i + 2);
        }

        assert!(game.is_won());
        assert_eq!(game.snake().position(), GridCell::new(2, 0));
        assert_eq!(game.occupied().len(), 9);
        let trail: HashSet<GridCell> = game.snake().trail().iter().copied().collect();
        assert_eq!(trail.len(), 8);
        assert_eq!(game.score(), 9);
        assert!(matches!(game.events().last(), Some(GameEvent::Won { segments: 9, .. })));

        assert!(game.confirm());
        assert!(game.is_running());
        assert_eq!(game.score(), 0);
        assert!(game.events().iter().any(|e| matches!(e, GameEvent::Restarted)));
        assert_ne!(game.food().position(), game.snake().position());
    }

    #[test]
    fn position_changes_at_most_once_per_interval() {
        let mut game = running(GameConfig::default());
        game.queue_direction(Direction::Right);
        let interval = game.clock().tick_interval();
        let mut last = game.snake().position();
        let mut last_change: Option<f64> = None;
        for frame in 0..600 {
            let now = frame as f64 / 60.0;
            let ticked = game.advance(now).is_some();
            if game.snake().position() != last {
                assert!(ticked);
                if let Some(prev) = last_change {
                    assert!(now - prev >= interval - 1e-9);
                }
                last_change = Some(now);
                last = game.snake().position();
            }
            if game.is_dead() {
                game.confirm();
            }
        }
        assert!(game.tick_count() as f64 <= 10.0 / interval);
    }

    #[test]
    fn pause_freezes_ticks() {
        let mut game = running(GameConfig::default());
        assert!(game.pause());
        for frame in 0..600 {
            assert!(game.advance(frame as f64 / 60.0).is_none());
        }
        assert_eq!(game.tick_count(), 0);
        assert!(!game.pause());
    }

    #[test]
    fn speed_select_sets_factor_and_resumes() {
        let mut game = Game::new(GameConfig::default()).unwrap();
        assert!(!game.select_speed(SpeedLevel::Fast));
        assert!(game.open_speed_select());
        assert_eq!(game.phase(), GamePhase::SpeedSelect);
        assert!(game.select_speed(SpeedLevel::Fast));
        assert!(game.is_running());
        assert_eq!(game.clock().speed_factor(), 0.5);
        assert_eq!(SpeedLevel::from_digit(1), Some(SpeedLevel::Slow));
        assert_eq!(SpeedLevel::from_digit(4), None);
    }

    #[test]
    fn scroll_adjusts_speed_in_any_phase() {
        let mut game = Game::new(GameConfig::default()).unwrap();
        let before = game.clock().tick_interval();
        game.adjust_speed(2);
        assert!(game.clock().tick_interval() < before);
    }

    #[test]
    fn update_poses_follows_progress() {
        let mut game = running(GameConfig::default());
        game.food.place(&game.board, GridCell::new(0, 0));
        game.snake.place(GridCell::new(5, 5), Direction::Right);
        game.advance(0.0);
        let start = game.update_poses().unwrap();
        let half = game.clock().tick_interval() / 2.0;
        game.advance(half);
        let mid = game.update_poses().unwrap();
        assert!(mid.progress > start.progress);
        assert!(mid.head.x > start.head.x);
        assert_eq!(mid.heading_degrees, 270.0);
        let head_draw = game.snake().model().collect_draws(glam::Mat4::IDENTITY)[0];
        assert!(head_draw.origin().abs_diff_eq(mid.head, 1e-5));
    }

    #[test]
    fn same_seed_same_food() {
        let a = Game::new(GameConfig::default()).unwrap();
        let b = Game::new(GameConfig::default()).unwrap();
        assert_eq!(a.food().position(), b.food().position());
    }

    #[test]
    fn events_can_be_drained() {
        let mut game = running(GameConfig::default());
        assert!(game.pause());
        let events = game.drain_events();
        assert_eq!(events.len(), 3);
        assert!(matches!(events[2], GameEvent::Paused { tick: 0 }));
        assert!(game.events().is_empty());
    }
}
