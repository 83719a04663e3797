//! Rendering adapter: camera, static world and frame composition.
//!
//! # Invariants
//! - Rendering never mutates game truth beyond pushing interpolated poses
//!   into the entities' own scene nodes.
//! - The light array never exceeds `MAX_LIGHTS` entries.
//!
//! The `Renderer` trait is the seam to a real GPU backend; the debug text
//! renderer stands in for it in the CLI and tests.

mod background;
mod camera;
mod context;
mod frame;
mod renderer;

pub use background::{Background, BackgroundMeshes};
pub use camera::{Camera, CameraMode, heading_forward};
pub use context::{LightArray, LightParams, MAX_LIGHTS, RenderContext, RenderError};
pub use frame::{Frame, compose_frame};
pub use renderer::{
    DebugTextRenderer, GeometryUploader, Renderer, Shape, StandardMeshes, upload_standard_meshes,
};
