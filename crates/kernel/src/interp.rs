use glam::Vec2;
use snake3d_common::GridCell;

/// Affine map from grid cells to render space.
///
/// The field is centred on the origin, `pitch` apart per cell; grid-down
/// maps to render -Y.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridProjection {
    pub size: u32,
    pub pitch: f32,
}

impl GridProjection {
    pub fn new(size: u32, pitch: f32) -> Self {
        Self { size, pitch }
    }

    pub fn project(&self, cell: GridCell) -> Vec2 {
        let half = (self.size as f32 - 1.0) / 2.0;
        Vec2::new(
            self.pitch * (cell.x as f32 - half),
            self.pitch * (half - cell.y as f32),
        )
    }
}

/// Linear blend between the render-space positions of two cells.
///
/// `t = elapsed / per_transition` is not clamped; callers keep
/// `elapsed <= per_transition`. A zero-length transition renders at `from`.
pub fn interpolate_position(
    projection: &GridProjection,
    from: GridCell,
    to: GridCell,
    elapsed: f32,
    per_transition: f32,
) -> Vec2 {
    let start = projection.project(from);
    if per_transition <= 0.0 {
        return start;
    }
    start.lerp(projection.project(to), elapsed / per_transition)
}

/// Linear blend between two heading angles in degrees.
///
/// Only quarter-turn headings are produced by the game, so the blend runs
/// directly in value except across the 0/270 seam: 0 -> 270 runs through
/// -90 and 270 -> 0 runs through 360. A zero-length transition returns `from`.
pub fn interpolate_angle(from: f32, to: f32, elapsed: f32, per_transition: f32) -> f32 {
    if per_transition <= 0.0 {
        return from;
    }
    let (start, end) = if from == 0.0 && to == 270.0 {
        (0.0, -90.0)
    } else if from == 270.0 && to == 0.0 {
        (270.0, 360.0)
    } else {
        (from, to)
    };
    let t = elapsed / per_transition;
    start + (end - start) * t
}
