use snake3d_kernel::EntityMeshes;
use snake3d_scene::DrawableHandle;

use crate::background::BackgroundMeshes;
use crate::frame::Frame;

/// Geometry the game asks the rendering collaborator for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    /// Unit square centred on the origin in the XY plane, with its texture
    /// repeated `repeat` times along each edge.
    Quad { repeat: u32 },
    /// Unit cube centred on the origin.
    Cube { color: [f32; 3] },
}

/// Turns shapes into drawable handles.
pub trait GeometryUploader {
    fn upload(&mut self, shape: Shape) -> DrawableHandle;
}

/// Renderer-agnostic interface.
///
/// A renderer consumes a composed frame and produces output. It never
/// touches the game; game truth is kernel-owned.
pub trait Renderer {
    type Output;

    fn render(&self, frame: &Frame) -> Self::Output;
}

/// Handles for everything the game draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StandardMeshes {
    pub entities: EntityMeshes,
    pub background: BackgroundMeshes,
}

/// Upload the game's geometry in a fixed order.
pub fn upload_standard_meshes<U: GeometryUploader + ?Sized>(
    uploader: &mut U,
    board_size: u32,
) -> StandardMeshes {
    let entities = EntityMeshes {
        head: uploader.upload(Shape::Cube {
            color: [0.2, 0.8, 0.2],
        }),
        body: uploader.upload(Shape::Cube {
            color: [0.1, 0.5, 0.1],
        }),
        food: uploader.upload(Shape::Cube {
            color: [0.9, 0.2, 0.2],
        }),
    };
    let background = BackgroundMeshes {
        floor: uploader.upload(Shape::Quad { repeat: board_size }),
        wall: uploader.upload(Shape::Cube {
            color: [0.45, 0.45, 0.45],
        }),
        lamp: uploader.upload(Shape::Cube {
            color: [1.0, 0.9, 0.5],
        }),
    };
    StandardMeshes {
        entities,
        background,
    }
}

/// Text renderer for the CLI, logs and tests.
///
/// Produces a human-readable listing of the frame: camera, lights and one
/// line per draw item.
#[derive(Debug, Default)]
pub struct DebugTextRenderer {
    shapes: Vec<Shape>,
}

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shape(&self, handle: DrawableHandle) -> Option<&Shape> {
        usize::try_from(handle.0).ok().and_then(|i| self.shapes.get(i))
    }

    fn shape_name(&self, handle: DrawableHandle) -> &'static str {
        match self.shape(handle) {
            Some(Shape::Quad { .. }) => "quad",
            Some(Shape::Cube { .. }) => "cube",
            None => "?",
        }
    }
}

impl GeometryUploader for DebugTextRenderer {
    fn upload(&mut self, shape: Shape) -> DrawableHandle {
        self.shapes.push(shape);
        DrawableHandle(self.shapes.len() as u64 - 1)
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, frame: &Frame) -> String {
        let ctx = &frame.context;
        let mut out = String::new();
        out.push_str(&format!(
            "=== Frame (phase={:?}, camera={:?}, t={:.2}) ===\n",
            ctx.phase, ctx.mode, ctx.time
        ));
        out.push_str(&format!(
            "Eye: ({:.2}, {:.2}, {:.2})  Head: ({:.2}, {:.2}, {:.2}) heading={:.0}\n",
            ctx.eye.x, ctx.eye.y, ctx.eye.z, ctx.head.x, ctx.head.y, ctx.head.z, ctx.heading_degrees
        ));
        out.push_str(&format!(
            "Food: ({:.2}, {:.2}, {:.2})  Lights: {}\n",
            ctx.food.x,
            ctx.food.y,
            ctx.food.z,
            ctx.lights.len()
        ));
        out.push_str(&format!("Draws: {}\n", frame.draws.len()));
        for item in &frame.draws {
            let p = item.origin();
            out.push_str(&format!(
                "  [{:>3} {:<4}] pos=({:.2}, {:.2}, {:.2})\n",
                item.drawable.0,
                self.shape_name(item.drawable),
                p.x,
                p.y,
                p.z
            ));
        }
        out
    }
}
