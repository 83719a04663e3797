use glam::{Mat4, Vec3};
use rand::Rng;
use snake3d_common::GridCell;
use snake3d_scene::{DrawableHandle, SceneNode};
use std::collections::HashSet;

use crate::board::Board;

/// Food cube edge, in half-pitch units.
const FOOD_SCALE: f32 = 1.0;

/// Outcome of a relocation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Placed(GridCell),
    /// No free cell remains; the food stays where it was.
    Exhausted,
}

/// The single piece of food on the board.
#[derive(Debug, Clone)]
pub struct Food {
    position: GridCell,
    board_scale: f32,
    half_pitch: f32,
    lift: Vec3,
    model: SceneNode,
}

impl Food {
    /// Food at `position`; callers normally follow with `relocate`.
    pub fn new(board: &Board, mesh: DrawableHandle, position: GridCell) -> Self {
        let half_pitch = board.pitch() / 2.0;
        let model = SceneNode::new("food_tr").with_child(SceneNode::leaf(
            "food",
            Mat4::from_scale(Vec3::splat(FOOD_SCALE * half_pitch)),
            mesh,
        ));
        let mut food = Self {
            position,
            board_scale: board.world_scale(),
            half_pitch,
            lift: board.projection().project(position).extend(half_pitch),
            model,
        };
        food.spin(0.0);
        food
    }

    pub fn position(&self) -> GridCell {
        self.position
    }

    pub fn model(&self) -> &SceneNode {
        &self.model
    }

    /// Move to a uniformly chosen free cell. Cells are scanned row-major so a
    /// seeded `rng` reproduces the same sequence.
    pub fn relocate<R: Rng + ?Sized>(
        &mut self,
        board: &Board,
        excluded: &HashSet<GridCell>,
        rng: &mut R,
    ) -> Placement {
        let free = board.free_cells(excluded);
        if free.is_empty() {
            tracing::info!(cells = board.cell_count(), "no free cell left for food");
            return Placement::Exhausted;
        }
        let cell = free[rng.random_range(0..free.len())];
        self.position = cell;
        self.lift = board.projection().project(cell).extend(self.half_pitch);
        tracing::debug!(%cell, candidates = free.len(), "food relocated");
        Placement::Placed(cell)
    }

    /// Rotate the food about Z by `time` radians.
    pub fn spin(&mut self, time: f32) {
        self.model.set_transform(
            Mat4::from_scale(Vec3::splat(self.board_scale))
                * Mat4::from_translation(self.lift)
                * Mat4::from_rotation_z(time),
        );
    }

    /// World-space centre of the food.
    pub fn world_position(&self) -> Vec3 {
        self.lift * self.board_scale
    }

    #[cfg(test)]
    pub(crate) fn place(&mut self, board: &Board, cell: GridCell) {
        self.position = cell;
        self.lift = board.projection().project(cell).extend(self.half_pitch);
    }
}
