use snake3d_common::{Direction, GridCell};
use snake3d_kernel::Game;

/// Greedy driver for headless runs.
///
/// Picks the heading for the cell after the one already in flight: the
/// turn must not reverse the committed heading, should not step onto a
/// wall, obstacle or the body, and otherwise closes the Manhattan distance
/// to the food. Not a solver; it can trap itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct Autopilot;

impl Autopilot {
    /// Best heading to queue now, or `None` if the queued one is already best.
    pub fn choose(&self, game: &Game) -> Option<Direction> {
        let snake = game.snake();
        let from = snake.next_position();
        let food = game.food().position();
        let heading = snake.heading();

        let best = Direction::CARDINALS
            .into_iter()
            .filter(|d| !d.is_anti_parallel(heading))
            .map(|d| {
                let to = from.step(d);
                let safe = is_safe(game, to);
                // keep going straight when it is as good as turning
                let straight = d == heading;
                (d, safe, to.manhattan(food), straight)
            })
            .min_by_key(|&(_, safe, distance, straight)| (!safe, distance, !straight))
            .map(|(d, ..)| d)?;
        tracing::trace!(?best, %from, %food, "autopilot");

        (best != snake.queued_heading()).then_some(best)
    }
}

fn is_safe(game: &Game, cell: GridCell) -> bool {
    let board = game.board();
    let snake = game.snake();
    board.contains(cell)
        && !board.is_obstacle(cell)
        && cell != snake.position()
        && cell != snake.next_position()
        && !snake.trail().contains(&cell)
}
