use glam::{Vec2, Vec3};
use snake3d_common::{GameConfig, GridCell};
use std::collections::{BTreeSet, HashSet};

use crate::interp::GridProjection;

/// The fixed play field: its size, static obstacles and the mapping from
/// cells to render space.
#[derive(Debug, Clone)]
pub struct Board {
    size: u32,
    obstacles: BTreeSet<GridCell>,
    projection: GridProjection,
}

impl Board {
    pub fn new(size: u32, pitch: f32, obstacles: impl IntoIterator<Item = GridCell>) -> Self {
        Self {
            size,
            obstacles: obstacles.into_iter().collect(),
            projection: GridProjection::new(size, pitch),
        }
    }

    /// Build from an already validated configuration.
    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(config.size, config.pitch(), config.obstacles.iter().copied())
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn cell_count(&self) -> usize {
        (self.size as usize) * (self.size as usize)
    }

    pub fn center(&self) -> GridCell {
        let c = (self.size / 2) as i32;
        GridCell::new(c, c)
    }

    pub fn contains(&self, cell: GridCell) -> bool {
        cell.in_bounds(self.size)
    }

    pub fn is_obstacle(&self, cell: GridCell) -> bool {
        self.obstacles.contains(&cell)
    }

    pub fn obstacles(&self) -> &BTreeSet<GridCell> {
        &self.obstacles
    }

    pub fn projection(&self) -> &GridProjection {
        &self.projection
    }

    pub fn pitch(&self) -> f32 {
        self.projection.pitch
    }

    /// Uniform scale applied to every entity so the field plus a one-cell
    /// border fits the unit view volume.
    pub fn world_scale(&self) -> f32 {
        self.size as f32 / (self.size as f32 + 2.0)
    }

    /// Lift a render-space point to world space at height `z`.
    pub fn to_world(&self, point: Vec2, z: f32) -> Vec3 {
        point.extend(z) * self.world_scale()
    }

    /// Every cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = GridCell> + use<> {
        let size = self.size as i32;
        (0..size).flat_map(move |y| (0..size).map(move |x| GridCell::new(x, y)))
    }

    /// Cells that are neither obstacles nor in `excluded`, row-major.
    pub fn free_cells(&self, excluded: &HashSet<GridCell>) -> Vec<GridCell> {
        self.cells()
            .filter(|c| !self.obstacles.contains(c) && !excluded.contains(c))
            .collect()
    }
}
