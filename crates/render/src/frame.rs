use glam::Mat4;
use snake3d_kernel::Game;
use snake3d_scene::DrawItem;

use crate::background::Background;
use crate::camera::Camera;
use crate::context::{LightArray, LightParams, RenderContext, RenderError};

/// One composed frame: the shading context plus the ordered draw list.
#[derive(Debug, Clone)]
pub struct Frame {
    pub context: RenderContext,
    pub draws: Vec<DrawItem>,
}

/// Recompute poses, point the camera and flatten the scene for rendering.
///
/// Draw order is background, snake, food.
pub fn compose_frame(
    game: &mut Game,
    camera: &mut Camera,
    background: &Background,
) -> Result<Frame, RenderError> {
    let _span = tracing::info_span!("compose_frame", tick = game.tick_count()).entered();

    camera.observe(game.phase());
    let pose = game.update_poses()?;
    let (projection, view) = camera.projection_and_view(pose.head, pose.heading_degrees);

    let mut lights = LightArray::new();
    for light in background.lights() {
        lights.push(light)?;
    }
    lights.push(LightParams::at(pose.food))?;

    let mut draws = Vec::new();
    background.model().append_draws(Mat4::IDENTITY, &mut draws);
    for model in game.models() {
        model.append_draws(Mat4::IDENTITY, &mut draws);
    }
    tracing::trace!(draws = draws.len(), lights = lights.len(), "frame composed");

    Ok(Frame {
        context: RenderContext {
            projection,
            view,
            eye: camera.last_eye(),
            head: pose.head,
            heading_degrees: pose.heading_degrees,
            food: pose.food,
            lights,
            mode: camera.mode(),
            phase: game.phase(),
            time: game.time(),
        },
        draws,
    })
}
