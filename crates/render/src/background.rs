use glam::{Mat4, Vec3};
use snake3d_kernel::Board;
use snake3d_scene::{DrawableHandle, SceneNode};
use std::sync::Arc;

use crate::context::LightParams;

/// Geometry for the static world.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackgroundMeshes {
    pub floor: DrawableHandle,
    pub wall: DrawableHandle,
    pub lamp: DrawableHandle,
}

/// Floor, border walls and four corner lamps around the play field.
///
/// Built once from the board; nothing here changes during a session. The
/// lamp geometry is a single shared sub-graph placed at each corner.
#[derive(Debug, Clone)]
pub struct Background {
    model: SceneNode,
    lamps: [Vec3; 4],
}

impl Background {
    pub fn new(board: &Board, meshes: BackgroundMeshes) -> Self {
        let scale = board.world_scale();
        let pitch = board.pitch();
        let extent = board.size() as f32 * pitch / 2.0;
        let thickness = pitch / 2.0;
        let height = pitch;
        let span = 2.0 * (extent + thickness);
        let offset = extent + thickness / 2.0;

        let mut model = SceneNode::new("background")
            .with_transform(Mat4::from_scale(Vec3::splat(scale)))
            .with_child(SceneNode::leaf(
                "floor",
                Mat4::from_scale(Vec3::new(2.0 * extent, 2.0 * extent, 1.0)),
                meshes.floor,
            ));

        let walls = [
            ("wall_north", Vec3::new(0.0, offset, 0.0), Vec3::new(span, thickness, height)),
            ("wall_south", Vec3::new(0.0, -offset, 0.0), Vec3::new(span, thickness, height)),
            ("wall_east", Vec3::new(offset, 0.0, 0.0), Vec3::new(thickness, span, height)),
            ("wall_west", Vec3::new(-offset, 0.0, 0.0), Vec3::new(thickness, span, height)),
        ];
        for (name, at, size) in walls {
            model.add_child(SceneNode::leaf(
                name,
                Mat4::from_translation(at + Vec3::Z * height / 2.0) * Mat4::from_scale(size),
                meshes.wall,
            ));
        }

        let lamp = Arc::new(SceneNode::leaf(
            "lamp",
            Mat4::from_scale(Vec3::splat(thickness)),
            meshes.lamp,
        ));
        let lamp_z = height + thickness / 2.0;
        let corners = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)];
        let mut lamps = [Vec3::ZERO; 4];
        for (i, (sx, sy)) in corners.into_iter().enumerate() {
            let local = Vec3::new(sx * offset, sy * offset, lamp_z);
            lamps[i] = local * scale;
            let mut holder = SceneNode::new(format!("lamp_tr_{i}"))
                .with_transform(Mat4::from_translation(local));
            holder.add_shared(Arc::clone(&lamp));
            model.add_child(holder);
        }

        tracing::debug!(size = board.size(), nodes = model.node_count(), "background built");
        Self { model, lamps }
    }

    pub fn model(&self) -> &SceneNode {
        &self.model
    }

    /// World-space lamp positions, counter-clockwise from the south-west corner.
    pub fn lamp_positions(&self) -> &[Vec3; 4] {
        &self.lamps
    }

    /// One point light per lamp.
    pub fn lights(&self) -> impl Iterator<Item = LightParams> + '_ {
        self.lamps.iter().map(|&p| LightParams::at(p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use snake3d_common::GameConfig;

    fn meshes() -> BackgroundMeshes {
        BackgroundMeshes {
            floor: DrawableHandle(10),
            wall: DrawableHandle(11),
            lamp: DrawableHandle(12),
        }
    }

    #[test]
    fn draws_floor_walls_and_lamps() {
        let board = Board::from_config(&GameConfig::default());
        let bg = Background::new(&board, meshes());
        let draws = bg.model().collect_draws(Mat4::IDENTITY);
        let count = |h| draws.iter().filter(|d| d.drawable == h).count();
        assert_eq!(count(DrawableHandle(10)), 1);
        assert_eq!(count(DrawableHandle(11)), 4);
        assert_eq!(count(DrawableHandle(12)), 4);
    }

    #[test]
    fn lamps_share_geometry_at_distinct_corners() {
        let board = Board::from_config(&GameConfig::with_size(6));
        let bg = Background::new(&board, meshes());
        let lamp_draws: Vec<Vec3> = bg
            .model()
            .collect_draws(Mat4::IDENTITY)
            .into_iter()
            .filter(|d| d.drawable == DrawableHandle(12))
            .map(|d| d.origin())
            .collect();
        for (drawn, expected) in lamp_draws.iter().zip(bg.lamp_positions()) {
            assert!(drawn.abs_diff_eq(*expected, 1e-5));
        }
        assert_eq!(bg.lights().count(), 4);
    }

    #[test]
    fn field_fits_inside_the_unit_view() {
        for size in [3, 10, 40] {
            let board = Board::from_config(&GameConfig::with_size(size));
            let bg = Background::new(&board, meshes());
            for lamp in bg.lamp_positions() {
                assert!(lamp.x.abs() <= 1.0 && lamp.y.abs() <= 1.0, "{size}: {lamp}");
            }
        }
    }
}
