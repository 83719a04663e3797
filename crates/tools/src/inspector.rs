use snake3d_common::{Direction, GridCell};
use snake3d_kernel::{Game, GamePhase};
use std::fmt;

/// Game inspector for developer tooling.
///
/// Read-only queries against the game state for debugging and CLI output.
pub struct GameInspector;

impl GameInspector {
    /// Produce a summary of the game state.
    pub fn summary(game: &Game) -> GameSummary {
        GameSummary {
            phase: game.phase(),
            size: game.board().size(),
            seed: game.config().seed,
            tick: game.tick_count(),
            score: game.score(),
            head: game.snake().position(),
            food: game.food().position(),
            tick_interval: game.clock().tick_interval(),
            speed_factor: game.clock().speed_factor(),
            pending_events: game.events().len(),
        }
    }

    pub fn inspect_snake(game: &Game) -> SnakeInfo {
        let snake = game.snake();
        SnakeInfo {
            head: snake.position(),
            next: snake.next_position(),
            heading: snake.heading(),
            queued: snake.queued_heading(),
            trail: snake.trail().iter().copied().collect(),
        }
    }

    /// ASCII map of the board: `@` head, `o` trail, `*` food, `#` obstacle.
    pub fn occupancy_map(game: &Game) -> String {
        let board = game.board();
        let size = board.size() as i32;
        let head = game.snake().position();
        let food = game.food().position();
        let trail = game.snake().trail();
        let mut out = String::with_capacity(((size + 1) * size) as usize);
        for y in 0..size {
            for x in 0..size {
                let cell = GridCell::new(x, y);
                let c = if cell == head {
                    '@'
                } else if trail.contains(&cell) {
                    'o'
                } else if cell == food {
                    '*'
                } else if board.is_obstacle(cell) {
                    '#'
                } else {
                    '.'
                };
                out.push(c);
            }
            out.push('\n');
        }
        out
    }
}

/// Summary of game state for the inspector.
#[derive(Debug, Clone)]
pub struct GameSummary {
    pub phase: GamePhase,
    pub size: u32,
    pub seed: u64,
    pub tick: u64,
    pub score: usize,
    pub head: GridCell,
    pub food: GridCell,
    pub tick_interval: f64,
    pub speed_factor: f32,
    pub pending_events: usize,
}

impl fmt::Display for GameSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Game: phase={:?} size={} seed={} tick={} score={} head={} food={} interval={:.3}s factor={:.2} pending_events={}",
            self.phase,
            self.size,
            self.seed,
            self.tick,
            self.score,
            self.head,
            self.food,
            self.tick_interval,
            self.speed_factor,
            self.pending_events
        )
    }
}

/// Detailed info about the snake.
#[derive(Debug, Clone)]
pub struct SnakeInfo {
    pub head: GridCell,
    pub next: GridCell,
    pub heading: Direction,
    pub queued: Direction,
    pub trail: Vec<GridCell>,
}

impl fmt::Display for SnakeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Snake head={} next={} heading={:?} queued={:?} trail=[",
            self.head, self.next, self.heading, self.queued
        )?;
        for (i, cell) in self.trail.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{cell}")?;
        }
        f.write_str("]")
    }
}
